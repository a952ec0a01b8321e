//! Three-screen navigation state machine.
//!
//! `Session::apply` is pure: it validates an action against the current screen,
//! updates the ephemeral form state and returns the store work the action needs.
//! The dispatcher runs that work and then calls the matching completion method.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::models::interview::{InterviewMode, Review};
use crate::roster::{title_case, Roster};

pub const SUBMIT_SUCCESS: &str = "🎉 Submission successful! See you at the interview.";
pub const SUBMIT_INCOMPLETE: &str = "Please select a name and choose an interview mode, or contact Suryaansh.";
pub const LOGIN_SUCCESS: &str = "Logged in successfully!";
pub const LOGIN_FAILED: &str = "Invalid username or password.";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Main,
    AdminLogin,
    AdminPanel,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Screen::Main => "main",
            Screen::AdminLogin => "admin_login",
            Screen::AdminPanel => "admin_panel",
        })
    }
}

/// A user interaction, as posted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SelectName {
        name: String,
    },
    SelectMode {
        mode: InterviewMode,
    },
    Submit,
    OpenAdminLogin,
    Login {
        #[serde(default)]
        username: Option<String>,
        password: String,
    },
    Back,
    Logout,
    SelectCandidate {
        name: String,
    },
    SaveReview(Review),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SelectName { .. } => "select_name",
            Action::SelectMode { .. } => "select_mode",
            Action::Submit => "submit",
            Action::OpenAdminLogin => "open_admin_login",
            Action::Login { .. } => "login",
            Action::Back => "back",
            Action::Logout => "logout",
            Action::SelectCandidate { .. } => "select_candidate",
            Action::SaveReview(_) => "save_review",
        }
    }

    fn requires_admin(&self) -> bool {
        matches!(
            self,
            Action::Logout | Action::SelectCandidate { .. } | Action::SaveReview(_)
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Visual effect played alongside a successful submission.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Celebration {
    pub effect: &'static str,
    pub duration_ms: u64,
}

/// One-shot inline message; cleared by the next action.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration: Option<Celebration>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Notice {
            level,
            message: message.into(),
            celebration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub mode: InterviewMode,
}

/// Store work requested by an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Submit(Submission),
    SaveReview { candidate: String, review: Review },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub screen: Screen,
    pub name: String,
    pub email: String,
    pub mode: Option<InterviewMode>,
    pub admin_logged_in: bool,
    pub selected_candidate: Option<String>,
    pub notice: Option<Notice>,
}

impl Session {
    pub fn apply(
        &mut self,
        action: Action,
        roster: &Roster,
        admin_password: &str,
    ) -> Result<Effect, AppError> {
        if action.requires_admin() && !self.admin_logged_in {
            return Err(AppError::Forbidden);
        }
        self.notice = None;

        match (self.screen, action) {
            (Screen::Main, Action::SelectName { name }) => {
                self.select_name(&name, roster);
                Ok(Effect::None)
            }
            (Screen::Main, Action::SelectMode { mode }) => {
                self.mode = Some(mode);
                Ok(Effect::None)
            }
            (Screen::Main, Action::Submit) => Ok(self.submission()),
            (Screen::Main, Action::OpenAdminLogin) => {
                self.screen = Screen::AdminLogin;
                Ok(Effect::None)
            }
            (Screen::AdminLogin, Action::Login { password, .. }) => {
                if password == admin_password {
                    self.admin_logged_in = true;
                    self.screen = Screen::AdminPanel;
                    self.notice = Some(Notice::new(NoticeLevel::Success, LOGIN_SUCCESS));
                } else {
                    warn!("Rejected admin login attempt");
                    self.notice = Some(Notice::new(NoticeLevel::Error, LOGIN_FAILED));
                }
                Ok(Effect::None)
            }
            (Screen::AdminLogin, Action::Back) => {
                self.screen = Screen::Main;
                Ok(Effect::None)
            }
            (Screen::AdminPanel, Action::Logout) => {
                *self = Session::default();
                Ok(Effect::None)
            }
            (Screen::AdminPanel, Action::SelectCandidate { name }) => {
                self.selected_candidate = Some(name).filter(|n| !n.is_empty());
                Ok(Effect::None)
            }
            (Screen::AdminPanel, Action::SaveReview(review)) => match &self.selected_candidate {
                Some(candidate) => Ok(Effect::SaveReview {
                    candidate: candidate.clone(),
                    review,
                }),
                None => Err(AppError::Validation(
                    "Select a candidate before saving a review".to_string(),
                )),
            },
            (screen, action) => Err(AppError::Validation(format!(
                "Action '{}' is not available on the {screen} screen",
                action.kind()
            ))),
        }
    }

    /// Resets the candidate form after the store accepted a submission.
    pub fn submission_recorded(&mut self, celebrate_for: Duration) {
        self.name.clear();
        self.email.clear();
        self.mode = None;
        let celebration = (!celebrate_for.is_zero()).then(|| Celebration {
            effect: "snow",
            duration_ms: u64::try_from(celebrate_for.as_millis()).unwrap_or(u64::MAX),
        });
        self.notice = Some(Notice {
            celebration,
            ..Notice::new(NoticeLevel::Success, SUBMIT_SUCCESS)
        });
    }

    pub fn review_saved(&mut self, candidate: &str) {
        self.notice = Some(Notice::new(
            NoticeLevel::Success,
            format!("Details for {candidate} saved successfully!"),
        ));
    }

    fn select_name(&mut self, name: &str, roster: &Roster) {
        let name = title_case(name.trim());
        self.email = roster.lookup(&name).unwrap_or_default().to_string();
        self.name = name;
    }

    fn submission(&mut self) -> Effect {
        match self.mode {
            Some(mode) if !self.name.is_empty() && !self.email.is_empty() => {
                Effect::Submit(Submission {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    mode,
                })
            }
            _ => {
                self.notice = Some(Notice::new(NoticeLevel::Error, SUBMIT_INCOMPLETE));
                Effect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::InterviewStatus;

    const PASSWORD: &str = "s3cret";

    fn apply(session: &mut Session, action: Action) -> Result<Effect, AppError> {
        session.apply(action, &Roster::default(), PASSWORD)
    }

    fn logged_in() -> Session {
        let mut s = Session::default();
        apply(&mut s, Action::OpenAdminLogin).unwrap();
        apply(
            &mut s,
            Action::Login {
                username: None,
                password: PASSWORD.into(),
            },
        )
        .unwrap();
        s
    }

    #[test]
    fn test_initial_state_is_main() {
        let s = Session::default();
        assert_eq!(s.screen, Screen::Main);
        assert!(!s.admin_logged_in);
        assert!(s.name.is_empty());
    }

    #[test]
    fn test_select_name_autofills_email() {
        let mut s = Session::default();
        apply(&mut s, Action::SelectName { name: "mahim gupta".into() }).unwrap();
        assert_eq!(s.name, "Mahim Gupta");
        assert_eq!(s.email, "mahimgupta@jklu.edu.in");

        apply(&mut s, Action::SelectName { name: "".into() }).unwrap();
        assert!(s.name.is_empty());
        assert!(s.email.is_empty());
    }

    #[test]
    fn test_submit_produces_effect_with_roster_email() {
        let mut s = Session::default();
        apply(&mut s, Action::SelectName { name: "Mahim Gupta".into() }).unwrap();
        apply(&mut s, Action::SelectMode { mode: InterviewMode::Online }).unwrap();
        let effect = apply(&mut s, Action::Submit).unwrap();
        assert_eq!(
            effect,
            Effect::Submit(Submission {
                name: "Mahim Gupta".into(),
                email: "mahimgupta@jklu.edu.in".into(),
                mode: InterviewMode::Online,
            })
        );
        assert!(s.notice.is_none());
    }

    #[test]
    fn test_submit_without_mode_is_rejected_inline() {
        let mut s = Session::default();
        apply(&mut s, Action::SelectName { name: "Mahim Gupta".into() }).unwrap();
        let before = s.clone();
        let effect = apply(&mut s, Action::Submit).unwrap();
        assert_eq!(effect, Effect::None);
        let notice = s.notice.clone().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, SUBMIT_INCOMPLETE);
        assert_eq!(s.name, before.name);
        assert_eq!(s.screen, Screen::Main);
    }

    #[test]
    fn test_submit_with_off_roster_name_is_rejected_inline() {
        let mut s = Session::default();
        apply(&mut s, Action::SelectName { name: "Somebody Else".into() }).unwrap();
        apply(&mut s, Action::SelectMode { mode: InterviewMode::Offline }).unwrap();
        assert!(s.email.is_empty());
        assert_eq!(apply(&mut s, Action::Submit).unwrap(), Effect::None);
        assert_eq!(s.notice.unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_submission_recorded_resets_form_and_celebrates() {
        let mut s = Session::default();
        apply(&mut s, Action::SelectName { name: "Yash Mishra".into() }).unwrap();
        apply(&mut s, Action::SelectMode { mode: InterviewMode::Online }).unwrap();
        s.submission_recorded(Duration::from_secs(7));
        assert!(s.name.is_empty());
        assert!(s.email.is_empty());
        assert_eq!(s.mode, None);
        assert_eq!(s.screen, Screen::Main);
        let notice = s.notice.unwrap();
        assert_eq!(notice.message, SUBMIT_SUCCESS);
        assert_eq!(
            notice.celebration,
            Some(Celebration {
                effect: "snow",
                duration_ms: 7000
            })
        );
    }

    #[test]
    fn test_zero_pause_skips_celebration() {
        let mut s = Session::default();
        s.submission_recorded(Duration::ZERO);
        assert_eq!(s.notice.unwrap().celebration, None);
    }

    #[test]
    fn test_wrong_password_stays_on_login() {
        let mut s = Session::default();
        apply(&mut s, Action::OpenAdminLogin).unwrap();
        assert_eq!(s.screen, Screen::AdminLogin);
        apply(
            &mut s,
            Action::Login {
                username: Some("admin".into()),
                password: "guess".into(),
            },
        )
        .unwrap();
        assert_eq!(s.screen, Screen::AdminLogin);
        assert!(!s.admin_logged_in);
        assert_eq!(s.notice.unwrap().message, LOGIN_FAILED);
    }

    #[test]
    fn test_correct_password_opens_panel() {
        let s = logged_in();
        assert_eq!(s.screen, Screen::AdminPanel);
        assert!(s.admin_logged_in);
        assert_eq!(s.notice.unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn test_back_returns_to_main() {
        let mut s = Session::default();
        apply(&mut s, Action::OpenAdminLogin).unwrap();
        apply(&mut s, Action::Back).unwrap();
        assert_eq!(s.screen, Screen::Main);
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut s = logged_in();
        s.name = "Mahim Gupta".into();
        apply(&mut s, Action::SelectCandidate { name: "Mahim Gupta".into() }).unwrap();
        apply(&mut s, Action::Logout).unwrap();
        assert_eq!(s, Session::default());
    }

    #[test]
    fn test_admin_actions_need_login() {
        let mut s = Session::default();
        assert!(matches!(
            apply(&mut s, Action::SelectCandidate { name: "Mahim Gupta".into() }),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(apply(&mut s, Action::Logout), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_actions_from_other_screens_are_rejected() {
        let mut s = logged_in();
        let err = apply(&mut s, Action::Submit).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(s.screen, Screen::AdminPanel);

        let mut s = Session::default();
        assert!(matches!(apply(&mut s, Action::Back), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_save_review_targets_selected_candidate() {
        let mut s = logged_in();
        let review = Review {
            status: InterviewStatus::Scheduled,
            good_points: "quick learner".into(),
            bad_points: String::new(),
            overall: "recommend".into(),
        };
        assert!(matches!(
            apply(&mut s, Action::SaveReview(review.clone())),
            Err(AppError::Validation(_))
        ));

        apply(&mut s, Action::SelectCandidate { name: "Yash Bansal".into() }).unwrap();
        let effect = apply(&mut s, Action::SaveReview(review.clone())).unwrap();
        assert_eq!(
            effect,
            Effect::SaveReview {
                candidate: "Yash Bansal".into(),
                review
            }
        );
        s.review_saved("Yash Bansal");
        assert_eq!(
            s.notice.unwrap().message,
            "Details for Yash Bansal saved successfully!"
        );
    }

    #[test]
    fn test_next_action_clears_notice() {
        let mut s = Session::default();
        apply(&mut s, Action::Submit).unwrap();
        assert!(s.notice.is_some());
        apply(&mut s, Action::SelectMode { mode: InterviewMode::Offline }).unwrap();
        assert!(s.notice.is_none());
    }

    #[test]
    fn test_actions_deserialize_from_tagged_json() {
        let action: Action = serde_json::from_str(
            r#"{"action":"save_review","status":"Done","good_points":"calm","bad_points":"","overall":"hire"}"#,
        )
        .unwrap();
        assert!(matches!(action, Action::SaveReview(ref r) if r.status == InterviewStatus::Done));

        let action: Action = serde_json::from_str(r#"{"action":"login","password":"x"}"#).unwrap();
        assert_eq!(
            action,
            Action::Login {
                username: None,
                password: "x".into()
            }
        );
        let action: Action = serde_json::from_str(r#"{"action":"submit"}"#).unwrap();
        assert_eq!(action, Action::Submit);
    }
}
