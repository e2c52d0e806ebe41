//! Read-only detail view of one problem.

use crate::error::CatalogError;
use crate::feedback::{Notice, Notices};
use crate::gateway::CatalogGateway;
use crate::models::{EntityId, Problem};
use crate::text::join_keywords;
use std::fmt::Write as _;
use std::sync::Arc;

pub struct ProblemView {
    gateway: Arc<dyn CatalogGateway>,
    problem: Option<Problem>,
    notices: Notices,
}

impl ProblemView {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gateway,
            problem: None,
            notices: Notices::default(),
        }
    }

    /// Fetch `id` and hold it for display.
    ///
    /// # Errors
    /// Returns the gateway failure; any previously shown problem is kept.
    pub async fn load(&mut self, id: EntityId) -> Result<&Problem, CatalogError> {
        match self.gateway.get_problem(id).await {
            Ok(problem) => {
                let problem: &Problem = self.problem.insert(problem);
                Ok(problem)
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "failed to fetch problem details");
                self.notices
                    .error(err.user_message("Failed to fetch problem details."));
                Err(err)
            }
        }
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    /// Plain-text rendering of the loaded problem, or the loading placeholder.
    pub fn render(&self) -> String {
        match self.problem.as_ref() {
            Some(problem) => render_problem(problem),
            None => "Loading...".to_string(),
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}

fn optional(value: Option<&String>) -> &str {
    value.map(String::as_str).unwrap_or("")
}

/// Detail text for a problem; the content body is passed through untouched.
pub fn render_problem(problem: &Problem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", problem.title);
    let _ = writeln!(out, "Difficulty: {}", problem.difficulty);
    let _ = writeln!(out, "Estimated Time: {}", optional(problem.estimated_time.as_ref()));
    let _ = writeln!(out, "Keywords: {}", join_keywords(&problem.keywords));
    let _ = writeln!(out, "Author: {}", optional(problem.author.as_ref()));
    let _ = writeln!(out, "Status: {}", problem.status);
    let _ = writeln!(out, "Tags: {}", problem.tag_names().join(", "));
    let _ = writeln!(out, "Sources: {}", problem.source_names().join(", "));
    let _ = writeln!(out, "LaTeX Content:");
    out.push_str(optional(problem.latex_content.as_ref()));
    if let Some(solution) = problem.solution_text.as_ref().filter(|s| !s.trim().is_empty()) {
        let _ = write!(out, "\nSolution:\n{}", solution);
    }
    out
}
