//! Shared test-only helpers for problemdeck_core.

use crate::error::CatalogError;
use crate::gateway::CatalogGateway;
use crate::models::{
    DeleteAck, Difficulty, EntityId, ImageCandidate, Problem, ProblemPayload, ProblemStatus,
    VocabEntry,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Failure injected into a [`MemoryGateway`] operation.
#[derive(Debug, Clone)]
pub(crate) enum FailOn {
    Remote { status: u16, message: Option<String> },
    Transport,
}

impl FailOn {
    pub(crate) fn remote(status: u16, message: Option<&str>) -> Self {
        Self::Remote {
            status,
            message: message.map(str::to_string),
        }
    }

    fn to_error(&self) -> CatalogError {
        match self {
            Self::Remote { status, message } => CatalogError::Remote {
                status: *status,
                message: message.clone(),
            },
            Self::Transport => CatalogError::Transport("connection refused".to_string()),
        }
    }
}

#[derive(Default)]
struct MemoryState {
    problems: Vec<Problem>,
    tags: Vec<VocabEntry>,
    sources: Vec<VocabEntry>,
    next_id: EntityId,
    calls: Vec<String>,
    failures: HashMap<&'static str, FailOn>,
    uploads: Vec<String>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }

    fn entries_named(&mut self, names: &[String], source: bool) -> Vec<VocabEntry> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let pool = if source { &self.sources } else { &self.tags };
            let existing = pool.iter().find(|entry| &entry.name == name).cloned();
            let entry = match existing {
                Some(entry) => entry,
                None => {
                    let entry = VocabEntry::new(self.allocate_id(), name.clone());
                    if source {
                        self.sources.push(entry.clone());
                    } else {
                        self.tags.push(entry.clone());
                    }
                    entry
                }
            };
            resolved.push(entry);
        }
        resolved
    }

    fn problem_from_payload(&mut self, id: EntityId, payload: &ProblemPayload) -> Problem {
        Problem {
            id,
            title: payload.title.clone(),
            difficulty: payload.difficulty,
            estimated_time: Some(payload.estimated_time.clone()),
            keywords: payload.keywords.clone(),
            author: Some(payload.author.clone()),
            solution_text: Some(payload.solution_text.clone()),
            status: payload.status,
            latex_content: Some(payload.latex_content.clone()),
            tags: self.entries_named(&payload.tags, false),
            sources: self.entries_named(&payload.sources, true),
        }
    }
}

/// In-memory [`CatalogGateway`] that records every call it receives.
#[derive(Default)]
pub(crate) struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub(crate) fn with_vocabulary(tags: &[&str], sources: &[&str]) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.state();
            for name in tags {
                let id = state.allocate_id();
                state.tags.push(VocabEntry::new(id, *name));
            }
            for name in sources {
                let id = state.allocate_id();
                state.sources.push(VocabEntry::new(id, *name));
            }
        }
        gateway
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory gateway lock")
    }

    fn enter(&self, op: &'static str) -> Result<MutexGuard<'_, MemoryState>, CatalogError> {
        let mut state = self.state();
        state.calls.push(op.to_string());
        match state.failures.get(op) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(state),
        }
    }

    pub(crate) fn fail_on(&self, op: &'static str, failure: FailOn) {
        self.state().failures.insert(op, failure);
    }

    pub(crate) fn clear_failure(&self, op: &'static str) {
        self.state().failures.remove(op);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub(crate) fn count(&self, op: &str) -> usize {
        self.state().calls.iter().filter(|call| call.as_str() == op).count()
    }

    pub(crate) fn tag_id(&self, name: &str) -> EntityId {
        self.state()
            .tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.id)
            .expect("tag present")
    }

    pub(crate) fn source_id(&self, name: &str) -> EntityId {
        self.state()
            .sources
            .iter()
            .find(|source| source.name == name)
            .map(|source| source.id)
            .expect("source present")
    }

    /// Simulate another actor deleting a tag behind the client's back.
    pub(crate) fn remove_tag_externally(&self, id: EntityId) {
        self.state().tags.retain(|tag| tag.id != id);
    }

    pub(crate) fn seed_problem(&self, payload: &ProblemPayload) -> Problem {
        let mut state = self.state();
        let id = state.allocate_id();
        let problem = state.problem_from_payload(id, payload);
        state.problems.push(problem.clone());
        problem
    }

    pub(crate) fn stored_problem(&self, id: EntityId) -> Option<Problem> {
        self.state().problems.iter().find(|p| p.id == id).cloned()
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.state().uploads.clone()
    }
}

fn not_found(what: &str) -> CatalogError {
    CatalogError::Remote {
        status: 404,
        message: Some(format!("{} not found", what)),
    }
}

fn rename_entry(entries: &mut [VocabEntry], id: EntityId, name: &str, label: &str) -> Result<VocabEntry, CatalogError> {
    if entries.iter().any(|entry| entry.id != id && entry.name == name) {
        return Err(CatalogError::Remote {
            status: 400,
            message: Some(format!("Another {} with this name already exists", label)),
        });
    }
    let entry = entries
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or_else(|| not_found(label))?;
    entry.name = name.to_string();
    Ok(entry.clone())
}

#[async_trait]
impl CatalogGateway for MemoryGateway {
    async fn list_problems(&self) -> Result<Vec<Problem>, CatalogError> {
        Ok(self.enter("list_problems")?.problems.clone())
    }

    async fn get_problem(&self, id: EntityId) -> Result<Problem, CatalogError> {
        let state = self.enter("get_problem")?;
        state
            .problems
            .iter()
            .find(|problem| problem.id == id)
            .cloned()
            .ok_or_else(|| not_found("Problem"))
    }

    async fn create_problem(&self, payload: &ProblemPayload) -> Result<Problem, CatalogError> {
        let mut state = self.enter("create_problem")?;
        let id = state.allocate_id();
        let problem = state.problem_from_payload(id, payload);
        state.problems.push(problem.clone());
        Ok(problem)
    }

    async fn update_problem(&self, id: EntityId, payload: &ProblemPayload) -> Result<Problem, CatalogError> {
        let mut state = self.enter("update_problem")?;
        let index = state
            .problems
            .iter()
            .position(|problem| problem.id == id)
            .ok_or_else(|| not_found("Problem"))?;
        let problem = state.problem_from_payload(id, payload);
        state.problems[index] = problem.clone();
        Ok(problem)
    }

    async fn delete_problem(&self, id: EntityId) -> Result<DeleteAck, CatalogError> {
        let mut state = self.enter("delete_problem")?;
        let before = state.problems.len();
        state.problems.retain(|problem| problem.id != id);
        if state.problems.len() == before {
            return Err(not_found("Problem"));
        }
        Ok(DeleteAck {
            message: Some("Problem deleted successfully".to_string()),
        })
    }

    async fn list_tags(&self) -> Result<Vec<VocabEntry>, CatalogError> {
        Ok(self.enter("list_tags")?.tags.clone())
    }

    async fn create_tag(&self, name: &str) -> Result<VocabEntry, CatalogError> {
        let mut state = self.enter("create_tag")?;
        if state.tags.iter().any(|tag| tag.name == name) {
            return Err(CatalogError::Remote {
                status: 400,
                message: Some("Tag already exists".to_string()),
            });
        }
        let entry = VocabEntry::new(state.allocate_id(), name);
        state.tags.push(entry.clone());
        Ok(entry)
    }

    async fn update_tag(&self, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError> {
        let mut state = self.enter("update_tag")?;
        rename_entry(&mut state.tags, id, name, "tag")
    }

    async fn delete_tag(&self, id: EntityId) -> Result<DeleteAck, CatalogError> {
        let mut state = self.enter("delete_tag")?;
        state.tags.retain(|tag| tag.id != id);
        Ok(DeleteAck::default())
    }

    async fn list_sources(&self) -> Result<Vec<VocabEntry>, CatalogError> {
        Ok(self.enter("list_sources")?.sources.clone())
    }

    async fn create_source(&self, name: &str) -> Result<VocabEntry, CatalogError> {
        let mut state = self.enter("create_source")?;
        if state.sources.iter().any(|source| source.name == name) {
            return Err(CatalogError::Remote {
                status: 400,
                message: Some("Source already exists".to_string()),
            });
        }
        let entry = VocabEntry::new(state.allocate_id(), name);
        state.sources.push(entry.clone());
        Ok(entry)
    }

    async fn update_source(&self, id: EntityId, name: &str) -> Result<VocabEntry, CatalogError> {
        let mut state = self.enter("update_source")?;
        rename_entry(&mut state.sources, id, name, "source")
    }

    async fn delete_source(&self, id: EntityId) -> Result<DeleteAck, CatalogError> {
        let mut state = self.enter("delete_source")?;
        state.sources.retain(|source| source.id != id);
        Ok(DeleteAck::default())
    }

    async fn submit_image(&self, image: &ImageCandidate) -> Result<Problem, CatalogError> {
        let mut state = self.enter("submit_image")?;
        image.read_content()?;
        state.uploads.push(image.file_name().to_string());
        let id = state.allocate_id();
        let problem = Problem {
            id,
            title: "Converted Problem".to_string(),
            difficulty: Difficulty::Medium,
            estimated_time: Some("20 minutes".to_string()),
            keywords: vec!["Converted".to_string(), "OCR".to_string(), "LaTeX".to_string()],
            author: Some("Automated System".to_string()),
            solution_text: Some(String::new()),
            status: ProblemStatus::Unsolved,
            latex_content: Some(format!("\\text{{extracted from {}}}", image.file_name())),
            tags: Vec::new(),
            sources: Vec::new(),
        };
        state.problems.push(problem.clone());
        Ok(problem)
    }
}

/// Minimal valid payload used as a starting point by controller tests.
pub(crate) fn payload(title: &str, difficulty: Difficulty) -> ProblemPayload {
    ProblemPayload {
        title: title.to_string(),
        difficulty,
        estimated_time: String::new(),
        keywords: Vec::new(),
        author: String::new(),
        solution_text: String::new(),
        status: ProblemStatus::Unsolved,
        latex_content: String::new(),
        tags: Vec::new(),
        sources: Vec::new(),
    }
}

/// Gateway with tags `calculus, limits, series` and sources `Putnam, Spivak`.
pub(crate) fn sample_gateway() -> MemoryGateway {
    MemoryGateway::with_vocabulary(&["calculus", "limits", "series"], &["Putnam", "Spivak"])
}
