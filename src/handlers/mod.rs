pub mod consent;
pub mod pages;
pub mod photo;
pub mod result;
pub mod session;
pub mod survey;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

use crate::state::AppState;
use crate::wizard::WizardStep;
use session::SessionHandle;

/// Room for multipart boundaries and headers on top of the photo itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(UPLOAD_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/photo", get(photo::show).post(photo::upload))
        .route("/survey", get(survey::show).post(survey::submit))
        .route("/consent", get(consent::show).post(consent::submit))
        .route("/result", get(result::show).post(result::run))
        .route("/restart", post(restart))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn index() -> Redirect {
    Redirect::to(WizardStep::Photo.path())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.len(),
    }))
}

async fn restart(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::resolve(&state, &headers);
    state.sessions.restart(session.id);
    session.finish(Redirect::to(WizardStep::Photo.path()))
}
