pub mod pages;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use pages::{error_page, Pages};
use serde_json::json;
use solutions_core::{Solution, SolutionId, SolutionStore, SolutionSummary, StoreError, REQUIRED_FIELDS};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SolutionStore>,
    pub pages: Arc<Pages>,
}

pub fn build_app<P: AsRef<std::path::Path>>(solutions_dir: P) -> Result<Router> {
    let store = SolutionStore::open(solutions_dir)?;
    let stored = solutions_core::store::list_ids(store.root())?.len();
    tracing::info!(dir = %store.root().display(), stored, "solution store ready");
    let app_state = AppState { store: Arc::new(store), pages: Arc::new(Pages::new()?) };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(home))
        .route("/solution/:id", get(solution_page))
        .route("/compose", get(compose_form).post(compose_submit))
        .route("/api/solutions", get(api_list))
        .route("/api/solution/:id", get(api_solution))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

/// Handler failure rendered as an HTML error page.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let status = if e.is_not_found() { StatusCode::NOT_FOUND } else { StatusCode::INTERNAL_SERVER_ERROR };
        Self { status, message: e.to_string() }
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(e: handlebars::RenderError) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: e.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, error_page(&self.status.to_string(), &self.message)).into_response()
    }
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let solutions = state.store.list_summaries()?;
    Ok(state.pages.render("index", "Solutions", &json!({ "solutions": solutions }))?)
}

pub async fn solution_page(State(state): State<AppState>, Path(id): Path<SolutionId>) -> Result<Html<String>, AppError> {
    let solution = state.store.retrieve(id)?;
    // required fields get their own headings; everything else is listed below them
    let extra: BTreeMap<&str, &str> = solution.fields().filter(|(k, _)| !REQUIRED_FIELDS.contains(k)).collect();
    let title = format!("Solution #{id}");
    Ok(state.pages.render("solution", &title, &json!({ "id": id, "solution": solution, "extra": extra }))?)
}

pub async fn compose_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(state.pages.render("compose", "New solution", &json!({}))?)
}

pub async fn compose_submit(State(state): State<AppState>, Form(solution): Form<Solution>) -> Result<Redirect, AppError> {
    let id = state.store.store(&solution)?;
    Ok(Redirect::to(&format!("/solution/{id}")))
}

pub async fn api_list(State(state): State<AppState>) -> Result<Json<Vec<SolutionSummary>>, AppError> {
    Ok(Json(state.store.list_summaries()?))
}

pub async fn api_solution(State(state): State<AppState>, Path(id): Path<SolutionId>) -> Result<Json<Solution>, AppError> {
    Ok(Json(state.store.retrieve(id)?))
}
