//! Problem catalog listing and deletion.

use super::DeleteOutcome;
use crate::error::CatalogError;
use crate::feedback::{Confirm, Notice, Notices};
use crate::gateway::CatalogGateway;
use crate::models::{EntityId, Problem};
use std::sync::Arc;

pub const DELETE_PROBLEM_PROMPT: &str = "Are you sure you want to delete this problem?";
pub const EMPTY_CATALOG_TEXT: &str = "No problems found.";

/// Lists problems and deletes them on confirmation.
pub struct CatalogList {
    gateway: Arc<dyn CatalogGateway>,
    problems: Vec<Problem>,
    notices: Notices,
}

impl CatalogList {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gateway,
            problems: Vec::new(),
            notices: Notices::default(),
        }
    }

    /// Replace the displayed problems with the server's current list.
    ///
    /// # Errors
    /// Returns the gateway failure; the displayed list is left unchanged.
    pub async fn load(&mut self) -> Result<(), CatalogError> {
        match self.gateway.list_problems().await {
            Ok(problems) => {
                tracing::debug!(count = problems.len(), "problem list loaded");
                self.problems = problems;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch problems");
                self.notices.error(err.user_message("Failed to fetch problems."));
                Err(err)
            }
        }
    }

    /// Delete `id` after explicit confirmation, then reload from the server.
    ///
    /// # Errors
    /// Returns the delete failure; the list is not touched in that case.
    pub async fn delete(
        &mut self,
        id: EntityId,
        confirm: &mut dyn Confirm,
    ) -> Result<DeleteOutcome, CatalogError> {
        if !confirm.confirm(DELETE_PROBLEM_PROMPT) {
            tracing::debug!(id, "problem delete declined");
            return Ok(DeleteOutcome::Declined);
        }
        if let Err(err) = self.gateway.delete_problem(id).await {
            tracing::warn!(id, error = %err, "failed to delete problem");
            self.notices.error(err.user_message("Failed to delete problem."));
            return Err(err);
        }
        tracing::info!(id, "problem deleted");
        self.notices.success("Problem deleted successfully.");
        // Reload failures are reported through notices; the delete itself stands.
        let _ = self.load().await;
        Ok(DeleteOutcome::Deleted)
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}
