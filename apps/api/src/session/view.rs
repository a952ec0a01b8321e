//! Serialisable view model. `render` is a pure function of the session and the
//! data the dispatcher loaded for it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::interview::{InterviewMode, InterviewRecord, InterviewStatus, RecentUpdate};
use crate::roster::Roster;
use crate::session::machine::{Notice, NoticeLevel, Screen, Session};

pub const CANDIDATE_TITLE: &str = "Tech and Support Coordinator Role for Sabrang 2025";
pub const LOGIN_TITLE: &str = "Admin Login";
pub const PANEL_TITLE: &str = "Admin Panel: Candidate Interview Details";
pub const NO_CANDIDATES: &str = "No candidates found in the database.";

/// Store data shown on the admin panel.
#[derive(Debug, Clone, Default)]
pub struct PanelData {
    pub candidate_names: Vec<String>,
    pub recent_updates: Vec<RecentUpdate>,
    pub selected: Option<InterviewRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum View {
    Main(CandidateFormView),
    AdminLogin(AdminLoginView),
    AdminPanel(AdminPanelView),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateFormView {
    pub title: &'static str,
    /// The empty option first, then the sorted roster.
    pub name_options: Vec<String>,
    pub selected_name: String,
    pub email: String,
    pub email_read_only: bool,
    pub mode_options: Vec<InterviewMode>,
    pub selected_mode: Option<InterviewMode>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminLoginView {
    pub title: &'static str,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminPanelView {
    pub title: &'static str,
    pub candidates: Vec<String>,
    pub recent_updates: Vec<RecentUpdate>,
    pub editor: Option<ReviewEditor>,
    pub notice: Option<Notice>,
}

/// Pre-filled review form for the selected candidate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewEditor {
    pub candidate: String,
    pub status_options: Vec<InterviewStatus>,
    pub status: InterviewStatus,
    pub good_points: String,
    pub bad_points: String,
    pub overall: String,
    pub interview_mode: Option<InterviewMode>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn render(session: &Session, roster: &Roster, panel: &PanelData) -> View {
    match session.screen {
        Screen::Main => View::Main(CandidateFormView {
            title: CANDIDATE_TITLE,
            name_options: std::iter::once(String::new())
                .chain(roster.names().into_iter().map(String::from))
                .collect(),
            selected_name: session.name.clone(),
            email: session.email.clone(),
            email_read_only: true,
            mode_options: InterviewMode::ALL.to_vec(),
            selected_mode: session.mode,
            notice: session.notice.clone(),
        }),
        Screen::AdminLogin => View::AdminLogin(AdminLoginView {
            title: LOGIN_TITLE,
            notice: session.notice.clone(),
        }),
        Screen::AdminPanel => View::AdminPanel(render_panel(session, panel)),
    }
}

fn render_panel(session: &Session, panel: &PanelData) -> AdminPanelView {
    let mut candidates = panel.candidate_names.clone();
    candidates.sort();

    // A session notice wins over the empty-table warning.
    let notice = session.notice.clone().or_else(|| {
        candidates.is_empty().then(|| Notice {
            level: NoticeLevel::Warning,
            message: NO_CANDIDATES.to_string(),
            celebration: None,
        })
    });

    let editor = session
        .selected_candidate
        .as_ref()
        .map(|candidate| editor_for(candidate, panel.selected.as_ref()));

    AdminPanelView {
        title: PANEL_TITLE,
        candidates,
        recent_updates: panel.recent_updates.clone(),
        editor,
        notice,
    }
}

fn editor_for(candidate: &str, record: Option<&InterviewRecord>) -> ReviewEditor {
    ReviewEditor {
        candidate: candidate.to_string(),
        status_options: InterviewStatus::ALL.to_vec(),
        status: record.map(|r| r.interview_status).unwrap_or_default(),
        good_points: record.and_then(|r| r.good_points.clone()).unwrap_or_default(),
        bad_points: record.and_then(|r| r.bad_points.clone()).unwrap_or_default(),
        overall: record.and_then(|r| r.overall.clone()).unwrap_or_default(),
        interview_mode: record.map(|r| r.interview_mode),
        last_updated: record.and_then(|r| r.last_updated),
    }
}
