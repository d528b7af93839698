use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One practice attempt at a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSession {
    pub id: String,
    pub user_id: String,
    pub test_type: ModuleType,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub overall_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    FullExam,
    Writing,
    Reading,
    Speaking,
    Listening,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::FullExam => "full_exam",
            ModuleType::Writing => "writing",
            ModuleType::Reading => "reading",
            ModuleType::Speaking => "speaking",
            ModuleType::Listening => "listening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Submitted,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Submitted => "submitted",
        }
    }

    /// Status only moves forward. Re-completing a completed session is allowed
    /// and just restamps it.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::InProgress, SessionStatus::Completed)
                | (SessionStatus::InProgress, SessionStatus::Submitted)
                | (SessionStatus::Completed, SessionStatus::Completed)
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub module_type: ModuleType,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompleteSessionRequest {
    #[validate(range(min = 0.0, max = 9.0))]
    pub overall_score: Option<f64>,
}
