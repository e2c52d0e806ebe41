//! Workflow controllers behind each catalog view.
//!
//! Controllers own their view state and a [`crate::Notices`] queue. Remote
//! calls go through a shared [`crate::CatalogGateway`]; mutations are always
//! followed by a full reload rather than a local patch.

/// Tag/source management over one vocabulary collection.
pub mod collection;
/// Create/edit form for a single problem.
pub mod form;
/// Problem catalog listing and deletion.
pub mod list;
/// Image upload and extraction workflow.
pub mod upload;
/// Read-only detail view of one problem.
pub mod view;

pub use collection::{InlineEdit, ManagedCollection};
pub use form::{FormMode, FormState, ProblemFields, ProblemForm};
pub use list::CatalogList;
pub use upload::{UploadState, UploadWorkflow};
pub use view::{render_problem, ProblemView};

/// Result of an operation gated by user confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; no remote call was made.
    Declined,
    /// The remote delete succeeded and the listing was reloaded.
    Deleted,
}
