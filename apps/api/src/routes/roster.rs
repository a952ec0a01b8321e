use axum::{extract::State, Json};

use crate::state::AppState;

/// GET /api/v1/roster
/// Returns the names candidates may pick from, sorted.
pub async fn roster_handler(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.roster.names())
}
