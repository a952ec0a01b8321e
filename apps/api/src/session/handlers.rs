//! Axum route handlers for the session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::dispatch::{dispatch, present};
use crate::session::machine::Action;
use crate::session::view::View;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub view: View,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let (session_id, session) = state.sessions.create().await;
    info!(
        "Opened session {session_id} ({} active)",
        state.sessions.len().await
    );
    let view = present(&state, &*session.lock().await).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse { session_id, view })))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    let view = present(&state, &*session.lock().await).await?;
    Ok(Json(SessionResponse {
        session_id: id,
        view,
    }))
}

/// POST /api/v1/sessions/:id/actions
pub async fn handle_session_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(action): Json<Action>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    let mut session = session.lock().await;
    dispatch(&state, &mut session, action).await?;
    let view = present(&state, &session).await?;
    Ok(Json(SessionResponse {
        session_id: id,
        view,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!("Closed session {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}
