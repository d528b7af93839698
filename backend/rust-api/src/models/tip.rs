use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Grammar,
    Vocabulary,
    Writing,
    Speaking,
    Reading,
    Listening,
}

impl TipCategory {
    pub const ALL: [TipCategory; 6] = [
        TipCategory::Writing,
        TipCategory::Speaking,
        TipCategory::Reading,
        TipCategory::Listening,
        TipCategory::Grammar,
        TipCategory::Vocabulary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TipCategory::Grammar => "grammar",
            TipCategory::Vocabulary => "vocabulary",
            TipCategory::Writing => "writing",
            TipCategory::Speaking => "speaking",
            TipCategory::Reading => "reading",
            TipCategory::Listening => "listening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTip {
    pub id: String,
    pub category: TipCategory,
    pub title: String,
    pub content: String,
    pub difficulty_level: TipDifficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTip {
    pub category: TipCategory,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub difficulty_level: TipDifficulty,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
