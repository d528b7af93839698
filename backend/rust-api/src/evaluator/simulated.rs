use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

use super::FeedbackEvaluator;
use crate::models::{Feedback, SpeakingAssessment, WritingAssessment, WritingTask};
use crate::scoring::{round1, word_count};

const WRITING_BAND_JITTER: f64 = 1.5;
const WRITING_CRITERION_JITTER: f64 = 1.0;
const SPEAKING_BASE_MIN: f64 = 6.0;
const SPEAKING_BASE_MAX: f64 = 8.0;
const SPEAKING_CRITERION_JITTER: f64 = 0.5;

/// Stand-in evaluator: word-count heuristic plus random jitter for essays,
/// pure randomness for speaking. Bands are not clamped to 9.0.
pub struct SimulatedEvaluator {
    writing_delay: Duration,
    speaking_delay: Duration,
}

impl SimulatedEvaluator {
    pub fn new(writing_delay: Duration, speaking_delay: Duration) -> Self {
        Self {
            writing_delay,
            speaking_delay,
        }
    }

    /// No artificial latency.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// `clamp(5 + words/50, 4, 9)`
    pub fn writing_base_score(content: &str) -> f64 {
        (5.0 + f64::from(word_count(content)) / 50.0).clamp(4.0, 9.0)
    }

    pub fn assess_writing<R: Rng>(content: &str, rng: &mut R) -> WritingAssessment {
        let base = Self::writing_base_score(content);
        let mut jitter = |max: f64| round1(base + rng.random_range(0.0..max));

        WritingAssessment {
            band_score: jitter(WRITING_BAND_JITTER),
            task_response: jitter(WRITING_CRITERION_JITTER),
            coherence_cohesion: jitter(WRITING_CRITERION_JITTER),
            lexical_resource: jitter(WRITING_CRITERION_JITTER),
            grammatical_range: jitter(WRITING_CRITERION_JITTER),
            feedback: writing_feedback(),
        }
    }

    pub fn assess_speaking<R: Rng>(rng: &mut R) -> SpeakingAssessment {
        let base = rng.random_range(SPEAKING_BASE_MIN..SPEAKING_BASE_MAX);
        let mut jitter = || round1(base + rng.random_range(0.0..SPEAKING_CRITERION_JITTER));

        SpeakingAssessment {
            band_score: round1(base),
            fluency_coherence: jitter(),
            pronunciation: jitter(),
            lexical_resource: jitter(),
            grammatical_range: jitter(),
            feedback: speaking_feedback(),
        }
    }
}

#[async_trait]
impl FeedbackEvaluator for SimulatedEvaluator {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn evaluate_writing(
        &self,
        content: &str,
        task_type: WritingTask,
    ) -> Result<WritingAssessment> {
        tokio::time::sleep(self.writing_delay).await;
        let assessment = Self::assess_writing(content, &mut rand::rng());
        tracing::debug!(
            "Simulated {} essay band {} ({} words)",
            task_type.as_str(),
            assessment.band_score,
            word_count(content)
        );
        Ok(assessment)
    }

    async fn evaluate_speaking(&self, part_number: u8) -> Result<SpeakingAssessment> {
        tokio::time::sleep(self.speaking_delay).await;
        let assessment = Self::assess_speaking(&mut rand::rng());
        tracing::debug!(
            "Simulated speaking part {} band {}",
            part_number,
            assessment.band_score
        );
        Ok(assessment)
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn writing_feedback() -> Feedback {
    Feedback {
        strengths: lines(&[
            "Good task achievement with clear position",
            "Appropriate use of examples and explanations",
            "Generally well-organized structure",
        ]),
        improvements: lines(&[
            "Consider using more varied cohesive devices",
            "Expand vocabulary with more sophisticated synonyms",
            "Work on complex sentence structures",
        ]),
        suggestions: lines(&[
            "Practice using conditional sentences",
            "Learn more academic vocabulary",
            "Focus on paragraph transitions",
        ]),
    }
}

fn speaking_feedback() -> Feedback {
    Feedback {
        strengths: lines(&[
            "Good fluency with natural rhythm",
            "Clear pronunciation of most sounds",
            "Appropriate use of vocabulary",
        ]),
        improvements: lines(&[
            "Work on specific sound pronunciation",
            "Use more varied vocabulary",
            "Practice complex grammatical structures",
        ]),
        suggestions: lines(&[
            "Record yourself daily",
            "Practice tongue twisters",
            "Learn idiomatic expressions",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn essay(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    fn within(value: f64, low: f64, high: f64) -> bool {
        // one-decimal rounding can land exactly on the upper bound
        value >= low - 1e-9 && value <= high + 1e-9
    }

    #[test]
    fn writing_base_score_is_clamped() {
        assert_eq!(SimulatedEvaluator::writing_base_score(""), 5.0);
        assert_eq!(SimulatedEvaluator::writing_base_score(&essay(100)), 7.0);
        assert_eq!(SimulatedEvaluator::writing_base_score(&essay(1000)), 9.0);
    }

    #[test]
    fn writing_scores_stay_within_jitter_bounds() {
        let content = essay(250);
        let base = SimulatedEvaluator::writing_base_score(&content);
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = SimulatedEvaluator::assess_writing(&content, &mut rng);
            assert!(within(a.band_score, base, base + WRITING_BAND_JITTER));
            for criterion in [
                a.task_response,
                a.coherence_cohesion,
                a.lexical_resource,
                a.grammatical_range,
            ] {
                assert!(within(criterion, base, base + WRITING_CRITERION_JITTER));
            }
            assert_eq!(a.feedback.strengths.len(), 3);
        }
    }

    #[test]
    fn speaking_scores_stay_within_bounds() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = SimulatedEvaluator::assess_speaking(&mut rng);
            assert!(within(a.band_score, SPEAKING_BASE_MIN, SPEAKING_BASE_MAX));
            for criterion in [
                a.fluency_coherence,
                a.pronunciation,
                a.lexical_resource,
                a.grammatical_range,
            ] {
                assert!(within(
                    criterion,
                    SPEAKING_BASE_MIN,
                    SPEAKING_BASE_MAX + SPEAKING_CRITERION_JITTER
                ));
            }
        }
    }

    #[test]
    fn scores_have_one_decimal() {
        let a = SimulatedEvaluator::assess_writing(&essay(123), &mut rand::rng());
        assert_eq!(round1(a.band_score), a.band_score);
    }

    #[tokio::test]
    async fn instant_evaluator_returns_canned_feedback() {
        let evaluator = SimulatedEvaluator::instant();
        let writing = evaluator
            .evaluate_writing(&essay(50), WritingTask::Task2)
            .await
            .unwrap();
        assert_eq!(writing.feedback, writing_feedback());

        let speaking = evaluator.evaluate_speaking(2).await.unwrap();
        assert_eq!(speaking.feedback, speaking_feedback());
    }
}
