//! Record storage behind the practice services.
//!
//! [`DataStore`] is the whole surface the services need: single-record
//! inserts, filtered/ordered/limited selects and a few targeted updates.
//! `MongoStore` is the production backend; `MemoryStore` backs tests and
//! local runs without a database.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    ComprehensionResponse, DailyTip, Profile, ProfileUpdate, SessionStatus, Skill,
    SpeakingRecording, TestSession, TipCategory, WritingSubmission,
};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub const PROFILES: &str = "profiles";
pub const TEST_SESSIONS: &str = "test_sessions";
pub const DAILY_TIPS: &str = "daily_tips";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrder {
    CreatedAt,
    CompletedAt,
}

impl SessionOrder {
    pub fn field(&self) -> &'static str {
        match self {
            SessionOrder::CreatedAt => "created_at",
            SessionOrder::CompletedAt => "completed_at",
        }
    }
}

/// Newest-first selection of one user's sessions.
#[derive(Debug, Clone)]
pub struct SessionQuery {
    pub user_id: String,
    pub status: Option<SessionStatus>,
    pub order_by: SessionOrder,
    pub limit: Option<usize>,
}

impl SessionQuery {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            status: None,
            order_by: SessionOrder::CreatedAt,
            limit: None,
        }
    }
}

/// Newest-first selection of active tips.
#[derive(Debug, Clone, Default)]
pub struct TipQuery {
    pub category: Option<TipCategory>,
    pub limit: Option<usize>,
}

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    async fn insert_profile(&self, profile: &Profile) -> Result<()>;
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>>;
    /// Applies the set fields and returns the updated profile, or `None`
    /// when the user has no profile.
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Profile>>;
    /// Atomic `tests_completed += 1`. Returns false when no profile matched.
    async fn increment_tests_completed(&self, user_id: &str) -> Result<bool>;
    /// Atomic `total_study_hours += hours`. Returns false when no profile matched.
    async fn add_study_hours(&self, user_id: &str, hours: f64) -> Result<bool>;

    async fn insert_session(&self, session: &TestSession) -> Result<()>;
    async fn find_session(&self, session_id: &str) -> Result<Option<TestSession>>;
    async fn replace_session(&self, session: &TestSession) -> Result<()>;
    async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<TestSession>>;

    async fn insert_writing(&self, submission: &WritingSubmission) -> Result<()>;
    async fn list_writing(&self, user_id: &str) -> Result<Vec<WritingSubmission>>;
    async fn insert_speaking(&self, recording: &SpeakingRecording) -> Result<()>;
    async fn insert_response(&self, response: &ComprehensionResponse) -> Result<()>;
    /// Band scores of the newest scored records of one skill.
    async fn recent_band_scores(&self, user_id: &str, skill: Skill, limit: usize)
        -> Result<Vec<f64>>;

    async fn insert_tip(&self, tip: &DailyTip) -> Result<()>;
    async fn list_tips(&self, query: &TipQuery) -> Result<Vec<DailyTip>>;
}
