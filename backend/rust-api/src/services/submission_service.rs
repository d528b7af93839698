use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::evaluator::FeedbackEvaluator;
use crate::metrics::{record_submission, EVALUATION_DURATION_SECONDS};
use crate::models::{
    ComprehensionResponse, ListeningSubmissionRequest, ReadingSubmissionRequest, Skill,
    SpeakingRecording, SpeakingSubmissionRequest, WritingSubmission, WritingSubmissionRequest,
};
use crate::scoring::{band_score, score_responses, word_count};
use crate::services::session_service::find_owned_session;
use crate::services::AuthContext;
use crate::store::DataStore;

/// Scores and records practice answers. Submissions never change the
/// status of the session they reference.
pub struct SubmissionService {
    store: Arc<dyn DataStore>,
    evaluator: Arc<dyn FeedbackEvaluator>,
}

struct ComprehensionAttempt {
    skill: Skill,
    session_id: Option<String>,
    content_id: String,
    answers: BTreeMap<String, String>,
    correct_answers: BTreeMap<String, String>,
    total_questions: u32,
    time_taken: Option<u32>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn DataStore>, evaluator: Arc<dyn FeedbackEvaluator>) -> Self {
        Self { store, evaluator }
    }

    pub async fn submit_writing(
        &self,
        ctx: &AuthContext,
        req: WritingSubmissionRequest,
    ) -> ServiceResult<WritingSubmission> {
        let user_id = ctx.require_user()?;
        req.validate()?;
        self.check_session(user_id, req.session_id.as_deref()).await?;

        let start = Instant::now();
        let assessment = self
            .evaluator
            .evaluate_writing(&req.content, req.task_type)
            .await
            .map_err(ServiceError::Evaluation)?;
        self.observe_evaluation(Skill::Writing, start);

        let submission = WritingSubmission {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: req.session_id,
            task_type: req.task_type,
            word_count: word_count(&req.content),
            prompt: req.prompt,
            content: req.content,
            submission_type: req.submission_type,
            file_url: req.file_url,
            band_score: Some(assessment.band_score),
            task_response: Some(assessment.task_response),
            coherence_cohesion: Some(assessment.coherence_cohesion),
            lexical_resource: Some(assessment.lexical_resource),
            grammatical_range: Some(assessment.grammatical_range),
            ai_feedback: assessment.feedback,
            human_feedback_requested: req.human_feedback_requested,
            human_feedback: None,
            created_at: Utc::now(),
        };

        self.store
            .insert_writing(&submission)
            .await
            .map_err(ServiceError::Persistence)?;

        record_submission(Skill::Writing.as_str(), submission.band_score);
        tracing::info!(
            "Writing submission {} by {}: {} words, band {:?}",
            submission.id,
            user_id,
            submission.word_count,
            submission.band_score
        );

        Ok(submission)
    }

    pub async fn submit_speaking(
        &self,
        ctx: &AuthContext,
        req: SpeakingSubmissionRequest,
    ) -> ServiceResult<SpeakingRecording> {
        let user_id = ctx.require_user()?;
        req.validate()?;
        self.check_session(user_id, req.session_id.as_deref()).await?;

        let start = Instant::now();
        let assessment = self
            .evaluator
            .evaluate_speaking(req.part_number)
            .await
            .map_err(ServiceError::Evaluation)?;
        self.observe_evaluation(Skill::Speaking, start);

        let recording = SpeakingRecording {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: req.session_id,
            part_number: req.part_number,
            question: req.question,
            recording_url: req.recording_url,
            duration: req.duration,
            band_score: Some(assessment.band_score),
            fluency_coherence: Some(assessment.fluency_coherence),
            pronunciation: Some(assessment.pronunciation),
            lexical_resource: Some(assessment.lexical_resource),
            grammatical_range: Some(assessment.grammatical_range),
            ai_feedback: assessment.feedback,
            created_at: Utc::now(),
        };

        self.store
            .insert_speaking(&recording)
            .await
            .map_err(ServiceError::Persistence)?;

        record_submission(Skill::Speaking.as_str(), recording.band_score);
        tracing::info!(
            "Speaking recording {} by {}: part {}, band {:?}",
            recording.id,
            user_id,
            recording.part_number,
            recording.band_score
        );

        Ok(recording)
    }

    pub async fn submit_reading(
        &self,
        ctx: &AuthContext,
        req: ReadingSubmissionRequest,
    ) -> ServiceResult<ComprehensionResponse> {
        let user_id = ctx.require_user()?;
        req.validate()?;
        self.submit_comprehension(
            user_id,
            ComprehensionAttempt {
                skill: Skill::Reading,
                session_id: req.session_id,
                content_id: req.passage_id,
                answers: req.answers,
                correct_answers: req.correct_answers,
                total_questions: req.total_questions,
                time_taken: req.time_taken,
            },
        )
        .await
    }

    pub async fn submit_listening(
        &self,
        ctx: &AuthContext,
        req: ListeningSubmissionRequest,
    ) -> ServiceResult<ComprehensionResponse> {
        let user_id = ctx.require_user()?;
        req.validate()?;
        self.submit_comprehension(
            user_id,
            ComprehensionAttempt {
                skill: Skill::Listening,
                session_id: req.session_id,
                content_id: req.audio_id,
                answers: req.answers,
                correct_answers: req.correct_answers,
                total_questions: req.total_questions,
                time_taken: req.time_taken,
            },
        )
        .await
    }

    /// The caller's essays, newest first.
    pub async fn writing_history(
        &self,
        ctx: &AuthContext,
    ) -> ServiceResult<Vec<WritingSubmission>> {
        let user_id = ctx.require_user()?;
        self.store
            .list_writing(user_id)
            .await
            .map_err(ServiceError::Persistence)
    }

    async fn submit_comprehension(
        &self,
        user_id: &str,
        attempt: ComprehensionAttempt,
    ) -> ServiceResult<ComprehensionResponse> {
        self.check_session(user_id, attempt.session_id.as_deref()).await?;

        if attempt.correct_answers.len() > attempt.total_questions as usize {
            return Err(ServiceError::PreconditionViolation(format!(
                "answer key has {} entries for {} questions",
                attempt.correct_answers.len(),
                attempt.total_questions
            )));
        }

        let score = score_responses(&attempt.answers, &attempt.correct_answers);
        let band = band_score(score, attempt.total_questions)?;

        let response = ComprehensionResponse {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: attempt.session_id,
            skill: attempt.skill,
            content_id: attempt.content_id,
            answers: attempt.answers,
            correct_answers: attempt.correct_answers,
            score,
            total_questions: attempt.total_questions,
            band_score: Some(band),
            time_taken: attempt.time_taken,
            created_at: Utc::now(),
        };

        self.store
            .insert_response(&response)
            .await
            .map_err(ServiceError::Persistence)?;

        record_submission(attempt.skill.as_str(), response.band_score);
        tracing::info!(
            "{} response {} by {}: {}/{} correct, band {}",
            attempt.skill.as_str(),
            response.id,
            user_id,
            score,
            response.total_questions,
            band
        );

        Ok(response)
    }

    async fn check_session(&self, user_id: &str, session_id: Option<&str>) -> ServiceResult<()> {
        if let Some(session_id) = session_id {
            find_owned_session(self.store.as_ref(), user_id, session_id).await?;
        }
        Ok(())
    }

    fn observe_evaluation(&self, skill: Skill, start: Instant) {
        EVALUATION_DURATION_SECONDS
            .with_label_values(&[self.evaluator.name(), skill.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }
}
