use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::feedback::Feedback;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingTask {
    Task1,
    Task2,
}

impl WritingTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritingTask::Task1 => "task1",
            WritingTask::Task2 => "task2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    Typed,
    Uploaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingSubmission {
    pub id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub task_type: WritingTask,
    pub prompt: String,
    pub content: String,
    pub submission_type: SubmissionChannel,
    pub file_url: Option<String>,
    pub word_count: u32,
    pub band_score: Option<f64>,
    pub task_response: Option<f64>,
    pub coherence_cohesion: Option<f64>,
    pub lexical_resource: Option<f64>,
    pub grammatical_range: Option<f64>,
    pub ai_feedback: Feedback,
    #[serde(default)]
    pub human_feedback_requested: bool,
    pub human_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakingRecording {
    pub id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub part_number: u8,
    pub question: String,
    pub recording_url: Option<String>,
    /// Seconds.
    pub duration: u32,
    pub band_score: Option<f64>,
    pub fluency_coherence: Option<f64>,
    pub pronunciation: Option<f64>,
    pub lexical_resource: Option<f64>,
    pub grammatical_range: Option<f64>,
    pub ai_feedback: Feedback,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WritingSubmissionRequest {
    pub session_id: Option<String>,
    pub task_type: WritingTask,
    #[validate(length(min = 1, message = "Prompt must not be empty"))]
    pub prompt: String,
    #[validate(length(min = 1, message = "Essay must not be empty"))]
    pub content: String,
    pub submission_type: SubmissionChannel,
    pub file_url: Option<String>,
    #[serde(default)]
    pub human_feedback_requested: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SpeakingSubmissionRequest {
    pub session_id: Option<String>,
    #[validate(range(min = 1, max = 3, message = "Part number must be 1, 2 or 3"))]
    pub part_number: u8,
    #[validate(length(min = 1))]
    pub question: String,
    pub recording_url: Option<String>,
    #[serde(default)]
    pub duration: u32,
}
