use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterviewMode {
    Offline,
    Online,
}

impl InterviewMode {
    pub const ALL: [InterviewMode; 2] = [InterviewMode::Offline, InterviewMode::Online];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewMode::Offline => "Offline",
            InterviewMode::Online => "Online",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterviewStatus {
    #[default]
    Pending,
    Scheduled,
    Done,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 3] = [
        InterviewStatus::Pending,
        InterviewStatus::Scheduled,
        InterviewStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Pending => "Pending",
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::Done => "Done",
        }
    }
}

impl fmt::Display for InterviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterviewMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown interview mode '{s}'"))
    }
}

impl FromStr for InterviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterviewStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown interview status '{s}'"))
    }
}

/// One candidate's row in the `interview` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub interview_mode: InterviewMode,
    pub interview_status: InterviewStatus,
    pub good_points: Option<String>,
    pub bad_points: Option<String>,
    pub overall: Option<String>,
    /// Absent only for rows written before the column existed.
    pub last_updated: Option<DateTime<Utc>>,
}

/// A row of the admin panel's recent-updates table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentUpdate {
    pub name: String,
    pub interview_mode: InterviewMode,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Admin-editable fields written by a review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub status: InterviewStatus,
    #[serde(default)]
    pub good_points: String,
    #[serde(default)]
    pub bad_points: String,
    #[serde(default)]
    pub overall: String,
}
