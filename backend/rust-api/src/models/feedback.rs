use serde::{Deserialize, Serialize};

/// Structured feedback attached to a writing or speaking score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Band breakdown for an essay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingAssessment {
    pub band_score: f64,
    pub task_response: f64,
    pub coherence_cohesion: f64,
    pub lexical_resource: f64,
    pub grammatical_range: f64,
    pub feedback: Feedback,
}

/// Band breakdown for a spoken answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakingAssessment {
    pub band_score: f64,
    pub fluency_coherence: f64,
    pub pronunciation: f64,
    pub lexical_resource: f64,
    pub grammatical_range: f64,
    pub feedback: Feedback,
}
