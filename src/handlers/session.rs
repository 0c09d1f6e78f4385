use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "persona_session";

pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// The wizard session for one request. A cookie is attached to the response
/// only when the session was created by this request.
#[derive(Debug, Clone, Copy)]
pub struct SessionHandle {
    pub id: Uuid,
    created: bool,
}

impl SessionHandle {
    pub fn resolve(state: &AppState, headers: &HeaderMap) -> Self {
        let (id, created) = state.sessions.resolve(session_from_headers(headers));
        Self { id, created }
    }

    pub fn finish(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.created {
            let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}
