//! Writing and speaking evaluation.
//!
//! Scoring of free-form answers sits behind [`FeedbackEvaluator`]. The
//! bundled [`SimulatedEvaluator`] produces plausible but random bands and
//! canned feedback; it must be replaced by a real content-evaluation backend
//! (for example through [`HttpEvaluator`]) before scores mean anything.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::EvaluatorConfig;
use crate::models::{SpeakingAssessment, WritingAssessment, WritingTask};

pub mod http;
pub mod simulated;

pub use http::HttpEvaluator;
pub use simulated::SimulatedEvaluator;

#[async_trait]
pub trait FeedbackEvaluator: Send + Sync {
    /// Evaluator name used in logs and metrics labels.
    fn name(&self) -> &'static str;

    async fn evaluate_writing(
        &self,
        content: &str,
        task_type: WritingTask,
    ) -> Result<WritingAssessment>;

    /// Only the exam part is known; the recording itself is not inspected.
    async fn evaluate_speaking(&self, part_number: u8) -> Result<SpeakingAssessment>;
}

/// Builds the evaluator selected by configuration.
pub fn from_config(config: &EvaluatorConfig) -> Result<Arc<dyn FeedbackEvaluator>> {
    match &config.url {
        Some(url) => {
            tracing::info!("Using HTTP evaluator at {}", url);
            Ok(Arc::new(HttpEvaluator::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?))
        }
        None => {
            tracing::warn!("No evaluator URL configured, writing/speaking scores are simulated");
            Ok(Arc::new(SimulatedEvaluator::new(
                Duration::from_millis(config.writing_delay_ms),
                Duration::from_millis(config.speaking_delay_ms),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_without_url() {
        let config = EvaluatorConfig {
            url: None,
            writing_delay_ms: 0,
            speaking_delay_ms: 0,
            timeout_secs: 1,
        };
        assert_eq!(from_config(&config).unwrap().name(), "simulated");
    }

    #[test]
    fn http_with_url() {
        let config = EvaluatorConfig {
            url: Some("http://localhost:9000".to_string()),
            ..EvaluatorConfig::default()
        };
        assert_eq!(from_config(&config).unwrap().name(), "http");
    }
}
