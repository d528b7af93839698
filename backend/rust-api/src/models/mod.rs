use serde::{Deserialize, Serialize};

pub mod feedback;
pub mod profile;
pub mod progress;
pub mod response;
pub mod session;
pub mod submission;
pub mod tip;

pub use feedback::{Feedback, SpeakingAssessment, WritingAssessment};
pub use profile::{NewProfile, Profile, ProfileUpdate};
pub use progress::{ProgressReport, RecentTest, SectionScores, StudyStats};
pub use response::{ComprehensionResponse, ListeningSubmissionRequest, ReadingSubmissionRequest};
pub use session::{
    CompleteSessionRequest, CreateSessionRequest, ModuleType, SessionStatus, TestSession,
};
pub use submission::{
    SpeakingRecording, SpeakingSubmissionRequest, SubmissionChannel, WritingSubmission,
    WritingSubmissionRequest, WritingTask,
};
pub use tip::{DailyTip, NewTip, TipCategory, TipDifficulty};

/// The four scored skill areas. A full exam is a [`ModuleType`] but never a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Writing,
    Reading,
    Speaking,
    Listening,
}

impl Skill {
    pub const ALL: [Skill; 4] = [Skill::Writing, Skill::Reading, Skill::Speaking, Skill::Listening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Writing => "writing",
            Skill::Reading => "reading",
            Skill::Speaking => "speaking",
            Skill::Listening => "listening",
        }
    }

    /// Collection holding the scored records of this skill.
    pub fn collection(&self) -> &'static str {
        match self {
            Skill::Writing => "writing_submissions",
            Skill::Reading => "reading_responses",
            Skill::Speaking => "speaking_recordings",
            Skill::Listening => "listening_responses",
        }
    }
}
