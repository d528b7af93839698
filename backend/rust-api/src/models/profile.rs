use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-user profile, keyed by the authenticated user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub target_score: f64,
    pub current_score: f64,
    pub exam_date: Option<NaiveDate>,
    pub study_goal: String,
    pub country: Option<String>,
    #[serde(default)]
    pub total_study_hours: f64,
    #[serde(default)]
    pub tests_completed: u32,
    #[serde(default)]
    pub current_streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 0.0, max = 9.0))]
    pub target_score: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 9.0))]
    pub current_score: f64,
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub study_goal: String,
    pub country: Option<String>,
}

/// Partial update of the editable profile fields. Counters are not editable
/// here; they only move through the dedicated increment operations.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 9.0))]
    pub target_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 9.0))]
    pub current_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.target_score.is_none()
            && self.current_score.is_none()
            && self.exam_date.is_none()
            && self.study_goal.is_none()
            && self.country.is_none()
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.full_name {
            profile.full_name = name.clone();
        }
        if let Some(score) = self.target_score {
            profile.target_score = score;
        }
        if let Some(score) = self.current_score {
            profile.current_score = score;
        }
        if let Some(date) = self.exam_date {
            profile.exam_date = Some(date);
        }
        if let Some(goal) = &self.study_goal {
            profile.study_goal = goal.clone();
        }
        if let Some(country) = &self.country {
            profile.country = Some(country.clone());
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StudyTimeRequest {
    pub minutes: u32,
}
