//! Page and JSON API routes.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::SharedState;
use super::page::{PageView, render_page};
use crate::compare::{Availability, Comparison};
use crate::gallery;

// ============================================================================
// Page
// ============================================================================

pub fn page_routes() -> Router<SharedState> {
    Router::new().route("/", get(show_page).post(submit_page))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Gallery index. Kept as text so a bad value falls back to a blank form.
    pub example: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub question: String,
}

async fn show_page(State(state): State<SharedState>, Query(query): Query<PageQuery>) -> Html<String> {
    let (context, question) = query
        .example
        .as_deref()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .and_then(gallery::example)
        .map(|e| (e.context, e.question))
        .unwrap_or(("", ""));

    Html(render_page(
        &state.comparator,
        &PageView {
            context,
            question,
            comparison: None,
        },
    ))
}

async fn submit_page(State(state): State<SharedState>, Form(form): Form<AskForm>) -> Html<String> {
    tracing::debug!(question = %form.question, "comparing models");
    let comparison = state.comparator.compare(&form.context, &form.question).await;

    Html(render_page(
        &state.comparator,
        &PageView {
            context: &form.context,
            question: &form.question,
            comparison: Some(&comparison),
        },
    ))
}

// ============================================================================
// JSON API
// ============================================================================

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/answer", post(answer))
        .route("/api/models", get(list_models))
        .route("/health", get(health))
}

async fn answer(State(state): State<SharedState>, Json(req): Json<AskForm>) -> Json<Comparison> {
    tracing::debug!(question = %req.question, "comparing models (api)");
    Json(state.comparator.compare(&req.context, &req.question).await)
}

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub label: String,
    pub repo_id: String,
    pub params: String,
    pub f1: String,
    pub exact_match: String,
    pub color: String,
    pub availability: Availability,
}

async fn list_models(State(state): State<SharedState>) -> Json<Vec<ModelEntry>> {
    let comparator = &state.comparator;
    let entries = comparator
        .registry()
        .iter()
        .map(|m| ModelEntry {
            label: m.label.clone(),
            repo_id: m.repo_id.clone(),
            params: m.params.clone(),
            f1: m.f1.clone(),
            exact_match: m.exact_match.clone(),
            color: m.color.clone(),
            availability: comparator.availability(&m.label),
        })
        .collect();
    Json(entries)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models_ready: usize,
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        models_ready: state.comparator.ready_count(),
    })
}
