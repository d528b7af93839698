use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Skill;

/// A scored reading or listening attempt.
///
/// Both modules share one shape; `content_id` is the passage id for reading
/// and the audio id for listening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensionResponse {
    pub id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub skill: Skill,
    pub content_id: String,
    pub answers: BTreeMap<String, String>,
    pub correct_answers: BTreeMap<String, String>,
    pub score: u32,
    pub total_questions: u32,
    pub band_score: Option<f64>,
    /// Seconds spent, when the client tracked it.
    pub time_taken: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReadingSubmissionRequest {
    pub session_id: Option<String>,
    #[validate(length(min = 1))]
    pub passage_id: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    pub correct_answers: BTreeMap<String, String>,
    pub total_questions: u32,
    pub time_taken: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListeningSubmissionRequest {
    pub session_id: Option<String>,
    #[validate(length(min = 1))]
    pub audio_id: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    pub correct_answers: BTreeMap<String, String>,
    pub total_questions: u32,
    pub time_taken: Option<u32>,
}
