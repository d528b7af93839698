use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ModuleType, Skill};

/// Dashboard view of a user's recent performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub overall_score: f64,
    pub section_scores: SectionScores,
    pub recent_tests: Vec<RecentTest>,
    pub study_stats: StudyStats,
    pub weak_areas: Vec<Skill>,
    pub recommendations: Vec<String>,
}

/// Average band per skill; 0.0 means no scored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub writing: f64,
    pub reading: f64,
    pub speaking: f64,
    pub listening: f64,
}

impl SectionScores {
    pub fn get(&self, skill: Skill) -> f64 {
        match skill {
            Skill::Writing => self.writing,
            Skill::Reading => self.reading,
            Skill::Speaking => self.speaking,
            Skill::Listening => self.listening,
        }
    }

    pub fn set(&mut self, skill: Skill, value: f64) {
        match skill {
            Skill::Writing => self.writing = value,
            Skill::Reading => self.reading = value,
            Skill::Speaking => self.speaking = value,
            Skill::Listening => self.listening = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTest {
    pub date: DateTime<Utc>,
    pub test_type: ModuleType,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyStats {
    pub total_hours: f64,
    pub tests_completed: u32,
    pub current_streak: u32,
    /// Whole percent relative to the profile's baseline score.
    pub improvement: i64,
}
