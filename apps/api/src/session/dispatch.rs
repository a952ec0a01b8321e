use tracing::debug;

use crate::errors::AppError;
use crate::session::machine::{Action, Effect, Screen, Session};
use crate::session::view::{render, PanelData, View};
use crate::state::AppState;

/// Runs one action against a session: transition, store work, commit.
///
/// The transition is applied to a copy and only committed once the store work
/// succeeded, so a failing action leaves the session untouched.
pub async fn dispatch(state: &AppState, session: &mut Session, action: Action) -> Result<(), AppError> {
    let kind = action.kind();
    let mut next = session.clone();
    let effect = next.apply(action, &state.roster, &state.config.admin_password)?;

    match effect {
        Effect::None => {}
        Effect::Submit(submission) => {
            state
                .store
                .upsert_submission(&submission.name, &submission.email, submission.mode)
                .await?;
            next.submission_recorded(state.config.celebration_pause);
        }
        Effect::SaveReview { candidate, review } => {
            state.store.update_review(&candidate, &review).await?;
            next.review_saved(&candidate);
        }
    }

    debug!("Action {kind}: {} -> {}", session.screen, next.screen);
    *session = next;
    Ok(())
}

/// Loads whatever the current screen shows and renders it.
pub async fn present(state: &AppState, session: &Session) -> Result<View, AppError> {
    let panel = if session.screen == Screen::AdminPanel {
        load_panel(state, session).await?
    } else {
        PanelData::default()
    };
    Ok(render(session, &state.roster, &panel))
}

async fn load_panel(state: &AppState, session: &Session) -> Result<PanelData, AppError> {
    let candidate_names = state.store.list_names().await?;
    let recent_updates = state.store.list_recent_updates().await?;
    let selected = match &session.selected_candidate {
        Some(name) => state.store.get_details(name).await?,
        None => None,
    };
    Ok(PanelData {
        candidate_names,
        recent_updates,
        selected,
    })
}
