//! In-process ProblemDeck API stub for gateway integration tests.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use problemdeck_core::models::{
    DeleteAck, Difficulty, EntityId, Problem, ProblemPayload, ProblemStatus, VocabEntry,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadRecord {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Default)]
pub(crate) struct StubState {
    pub problems: Vec<Problem>,
    pub tags: Vec<VocabEntry>,
    pub sources: Vec<VocabEntry>,
    pub uploads: Vec<UploadRecord>,
    pub requests: Vec<String>,
    next_id: EntityId,
    fail_next: Option<ApiError>,
}

impl StubState {
    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }

    fn entries_for(&mut self, names: &[String], sources: bool) -> Vec<VocabEntry> {
        let mut resolved = Vec::new();
        for name in names {
            let pool = if sources { &self.sources } else { &self.tags };
            if let Some(entry) = pool.iter().find(|entry| &entry.name == name) {
                resolved.push(entry.clone());
                continue;
            }
            let entry = VocabEntry::new(self.allocate_id(), name.clone());
            if sources {
                self.sources.push(entry.clone());
            } else {
                self.tags.push(entry.clone());
            }
            resolved.push(entry);
        }
        resolved
    }

    fn build_problem(&mut self, id: EntityId, payload: ProblemPayload) -> Problem {
        Problem {
            id,
            title: payload.title,
            difficulty: payload.difficulty,
            estimated_time: Some(payload.estimated_time),
            keywords: payload.keywords,
            author: Some(payload.author),
            solution_text: Some(payload.solution_text),
            status: payload.status,
            latex_content: Some(payload.latex_content),
            tags: self.entries_for(&payload.tags, false),
            sources: self.entries_for(&payload.sources, true),
        }
    }
}

type Shared = Arc<Mutex<StubState>>;

enum ApiError {
    Json(StatusCode, String),
    Html(StatusCode, String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Json(status, message) => (status, Json(json!({ "error": message }))).into_response(),
            Self::Html(status, page) => (status, Html(page)).into_response(),
        }
    }
}

fn enter<'a>(state: &'a Shared, request: &str) -> Result<MutexGuard<'a, StubState>, ApiError> {
    let mut guard = state.lock().expect("stub state lock");
    guard.requests.push(request.to_string());
    if let Some(failure) = guard.fail_next.take() {
        return Err(failure);
    }
    Ok(guard)
}

fn not_found(what: &str) -> ApiError {
    ApiError::Json(StatusCode::NOT_FOUND, format!("{} not found", what))
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

async fn list_problems(State(state): State<Shared>) -> Result<Json<Vec<Problem>>, ApiError> {
    Ok(Json(enter(&state, "GET /problems/")?.problems.clone()))
}

async fn create_problem(
    State(state): State<Shared>,
    Json(payload): Json<ProblemPayload>,
) -> Result<(StatusCode, Json<Problem>), ApiError> {
    let mut guard = enter(&state, "POST /problems/")?;
    let id = guard.allocate_id();
    let problem = guard.build_problem(id, payload);
    guard.problems.push(problem.clone());
    Ok((StatusCode::CREATED, Json(problem)))
}

async fn get_problem(
    State(state): State<Shared>,
    Path(id): Path<EntityId>,
) -> Result<Json<Problem>, ApiError> {
    let guard = enter(&state, &format!("GET /problems/{}", id))?;
    guard
        .problems
        .iter()
        .find(|problem| problem.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Problem"))
}

async fn update_problem(
    State(state): State<Shared>,
    Path(id): Path<EntityId>,
    Json(payload): Json<ProblemPayload>,
) -> Result<Json<Problem>, ApiError> {
    let mut guard = enter(&state, &format!("PUT /problems/{}", id))?;
    let index = guard
        .problems
        .iter()
        .position(|problem| problem.id == id)
        .ok_or_else(|| not_found("Problem"))?;
    let problem = guard.build_problem(id, payload);
    guard.problems[index] = problem.clone();
    Ok(Json(problem))
}

async fn delete_problem(
    State(state): State<Shared>,
    Path(id): Path<EntityId>,
) -> Result<Json<DeleteAck>, ApiError> {
    let mut guard = enter(&state, &format!("DELETE /problems/{}", id))?;
    let before = guard.problems.len();
    guard.problems.retain(|problem| problem.id != id);
    if guard.problems.len() == before {
        return Err(not_found("Problem"));
    }
    Ok(Json(DeleteAck {
        message: Some("Problem deleted successfully".to_string()),
    }))
}

fn pool(guard: &mut StubState, sources: bool) -> &mut Vec<VocabEntry> {
    if sources {
        &mut guard.sources
    } else {
        &mut guard.tags
    }
}

fn label(sources: bool) -> &'static str {
    if sources {
        "Source"
    } else {
        "Tag"
    }
}

fn list_entries(state: &Shared, sources: bool) -> Result<Json<Vec<VocabEntry>>, ApiError> {
    let mut guard = enter(state, &format!("GET /{}/", if sources { "sources" } else { "tags" }))?;
    Ok(Json(pool(&mut guard, sources).clone()))
}

fn create_entry(state: &Shared, sources: bool, name: String) -> Result<(StatusCode, Json<VocabEntry>), ApiError> {
    let mut guard = enter(state, &format!("POST /{}/", if sources { "sources" } else { "tags" }))?;
    if name.trim().is_empty() {
        return Err(ApiError::Json(StatusCode::BAD_REQUEST, format!("{} name is required", label(sources))));
    }
    if pool(&mut guard, sources).iter().any(|entry| entry.name == name) {
        return Err(ApiError::Json(StatusCode::BAD_REQUEST, format!("{} already exists", label(sources))));
    }
    let entry = VocabEntry::new(guard.allocate_id(), name);
    pool(&mut guard, sources).push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

fn rename_entry(state: &Shared, sources: bool, id: EntityId, name: String) -> Result<Json<VocabEntry>, ApiError> {
    let route = if sources { "sources" } else { "tags" };
    let mut guard = enter(state, &format!("PUT /{}/{}", route, id))?;
    let entries = pool(&mut guard, sources);
    let entry = entries
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or_else(|| not_found(label(sources)))?;
    entry.name = name;
    Ok(Json(entry.clone()))
}

fn delete_entry(state: &Shared, sources: bool, id: EntityId) -> Result<StatusCode, ApiError> {
    let route = if sources { "sources" } else { "tags" };
    let mut guard = enter(state, &format!("DELETE /{}/{}", route, id))?;
    pool(&mut guard, sources).retain(|entry| entry.id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tags(State(state): State<Shared>) -> Result<Json<Vec<VocabEntry>>, ApiError> {
    list_entries(&state, false)
}

async fn create_tag(
    State(state): State<Shared>,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<VocabEntry>), ApiError> {
    create_entry(&state, false, body.name)
}

async fn update_tag(
    State(state): State<Shared>,
    Path(id): Path<EntityId>,
    Json(body): Json<NameBody>,
) -> Result<Json<VocabEntry>, ApiError> {
    rename_entry(&state, false, id, body.name)
}

async fn delete_tag(State(state): State<Shared>, Path(id): Path<EntityId>) -> Result<StatusCode, ApiError> {
    delete_entry(&state, false, id)
}

async fn list_sources(State(state): State<Shared>) -> Result<Json<Vec<VocabEntry>>, ApiError> {
    list_entries(&state, true)
}

async fn create_source(
    State(state): State<Shared>,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<VocabEntry>), ApiError> {
    create_entry(&state, true, body.name)
}

async fn update_source(
    State(state): State<Shared>,
    Path(id): Path<EntityId>,
    Json(body): Json<NameBody>,
) -> Result<Json<VocabEntry>, ApiError> {
    rename_entry(&state, true, id, body.name)
}

async fn delete_source(State(state): State<Shared>, Path(id): Path<EntityId>) -> Result<StatusCode, ApiError> {
    delete_entry(&state, true, id)
}

async fn upload_problem(
    State(state): State<Shared>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Problem>), ApiError> {
    let mut records = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Json(StatusCode::BAD_REQUEST, err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::Json(StatusCode::BAD_REQUEST, err.to_string()))?;
        records.push(UploadRecord {
            field: name,
            file_name,
            content_type,
            size: bytes.len(),
        });
    }

    let mut guard = enter(&state, "POST /upload_problem/")?;
    guard.uploads.extend(records.iter().cloned());
    let Some(image) = records.into_iter().find(|record| record.field == "image") else {
        return Err(ApiError::Json(StatusCode::BAD_REQUEST, "No image part in the request".to_string()));
    };
    let id = guard.allocate_id();
    let problem = Problem {
        id,
        title: "Converted Problem".to_string(),
        difficulty: Difficulty::Medium,
        estimated_time: Some("20 minutes".to_string()),
        keywords: vec!["Converted".to_string(), "OCR".to_string(), "LaTeX".to_string()],
        author: Some("Automated System".to_string()),
        solution_text: None,
        status: ProblemStatus::Unsolved,
        latex_content: Some(format!(
            "\\text{{extracted from {}}}",
            image.file_name.unwrap_or_default()
        )),
        tags: Vec::new(),
        sources: Vec::new(),
    };
    guard.problems.push(problem.clone());
    Ok((StatusCode::CREATED, Json(problem)))
}

/// Running stub bound to an ephemeral localhost port.
pub(crate) struct StubServer {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub(crate) async fn start() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new()
            .route("/api/problems/", get(list_problems).post(create_problem))
            .route(
                "/api/problems/:id",
                get(get_problem).put(update_problem).delete(delete_problem),
            )
            .route("/api/tags/", get(list_tags).post(create_tag))
            .route("/api/tags/:id", put(update_tag).delete(delete_tag))
            .route("/api/sources/", get(list_sources).post(create_source))
            .route("/api/sources/:id", put(update_source).delete(delete_source))
            .route("/api/upload_problem/", post(upload_problem))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
            handle,
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state lock")
    }

    /// Make the next request fail with `status` and a JSON `error` body.
    pub(crate) fn fail_next(&self, status: StatusCode, message: &str) {
        self.state().fail_next = Some(ApiError::Json(status, message.to_string()));
    }

    /// Make the next request fail with `status` and an HTML error page.
    pub(crate) fn fail_next_with_page(&self, status: StatusCode, page: &str) {
        self.state().fail_next = Some(ApiError::Html(status, page.to_string()));
    }

    pub(crate) fn seed_tag(&self, name: &str) -> VocabEntry {
        let mut state = self.state();
        let entry = VocabEntry::new(state.allocate_id(), name);
        state.tags.push(entry.clone());
        entry
    }

    pub(crate) fn seed_source(&self, name: &str) -> VocabEntry {
        let mut state = self.state();
        let entry = VocabEntry::new(state.allocate_id(), name);
        state.sources.push(entry.clone());
        entry
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
