use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FieldEdit, ProfileDraft};
use super::extract::ProfileExtractor;
use super::session::{
    AssessmentService, AssessmentSession, SessionError, SessionId, SessionStore, StoreError,
};

/// Router builder exposing the HTTP endpoints for the assessment flow.
/// Sessions are held in process; the store only sees completed assessments.
pub fn assessment_router<X, S>(service: Arc<AssessmentService<X, S>>) -> Router
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    let state = RouterState {
        service,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<X, S>))
        .route("/api/v1/assessments/:session_id", get(view_handler::<X, S>))
        .route(
            "/api/v1/assessments/:session_id/fields",
            patch(edit_handler::<X, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/save",
            post(save_handler::<X, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/reset",
            post(reset_handler::<X, S>),
        )
        .with_state(state)
}

pub(crate) struct RouterState<X, S> {
    service: Arc<AssessmentService<X, S>>,
    sessions: Arc<Mutex<HashMap<String, AssessmentSession>>>,
}

impl<X, S> Clone for RouterState<X, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    profile: Option<ProfileDraft>,
}

pub(crate) async fn submit_handler<X, S>(
    State(state): State<RouterState<X, S>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    let mut session = state.service.open_session();
    let result = match (request.description, request.profile) {
        (Some(description), None) => state.service.submit_text(&mut session, &description),
        (None, Some(draft)) => state.service.submit_form(&mut session, draft),
        _ => {
            let payload = json!({
                "error": "provide exactly one of `description` or `profile`",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let view = session.review_view();
    let id = session.id.0.clone();
    let Ok(mut sessions) = state.sessions.lock() else {
        return poisoned_response();
    };
    sessions.insert(id, session);

    match result {
        Ok(()) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(&error, view),
    }
}

pub(crate) async fn view_handler<X, S>(
    State(state): State<RouterState<X, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    let Ok(sessions) = state.sessions.lock() else {
        return poisoned_response();
    };
    match sessions.get(&session_id) {
        Some(session) => (StatusCode::OK, axum::Json(session.review_view())).into_response(),
        None => unknown_session(&session_id),
    }
}

pub(crate) async fn edit_handler<X, S>(
    State(state): State<RouterState<X, S>>,
    Path(session_id): Path<String>,
    axum::Json(edit): axum::Json<FieldEdit>,
) -> Response
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    let Ok(mut sessions) = state.sessions.lock() else {
        return poisoned_response();
    };
    let Some(session) = sessions.get_mut(&session_id) else {
        return unknown_session(&session_id);
    };
    match state.service.edit_field(session, edit) {
        Ok(()) => (StatusCode::OK, axum::Json(session.review_view())).into_response(),
        Err(error) => {
            let view = session.review_view();
            error_response(&error, view)
        }
    }
}

pub(crate) async fn save_handler<X, S>(
    State(state): State<RouterState<X, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    let Ok(mut sessions) = state.sessions.lock() else {
        return poisoned_response();
    };
    let Some(session) = sessions.get_mut(&session_id) else {
        return unknown_session(&session_id);
    };
    match state.service.save(session) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => {
            let view = session.review_view();
            error_response(&error, view)
        }
    }
}

pub(crate) async fn reset_handler<X, S>(
    State(state): State<RouterState<X, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    X: ProfileExtractor + 'static,
    S: SessionStore + 'static,
{
    let Ok(mut sessions) = state.sessions.lock() else {
        return poisoned_response();
    };
    let Some(session) = sessions.get_mut(&session_id) else {
        return unknown_session(&session_id);
    };
    session.reset();
    (StatusCode::OK, axum::Json(session.review_view())).into_response()
}

fn error_response(error: &SessionError, view: super::session::ReviewView) -> Response {
    let status = match error {
        SessionError::Validation(_) | SessionError::Extraction(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SessionError::InvalidState { .. } | SessionError::Store(StoreError::Conflict) => {
            StatusCode::CONFLICT
        }
        SessionError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
        "session": view,
    });
    (status, axum::Json(payload)).into_response()
}

fn unknown_session(session_id: &str) -> Response {
    let payload = json!({
        "error": format!("unknown session {session_id}"),
        "session_id": SessionId(session_id.to_string()),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn poisoned_response() -> Response {
    let payload = json!({ "error": "session table unavailable" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
