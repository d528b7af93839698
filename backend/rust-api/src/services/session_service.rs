use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::metrics::SESSIONS_TOTAL;
use crate::models::{CompleteSessionRequest, ModuleType, SessionStatus, TestSession};
use crate::services::AuthContext;
use crate::store::{DataStore, SessionQuery};

pub struct SessionService {
    store: Arc<dyn DataStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn create_session(
        &self,
        ctx: &AuthContext,
        module_type: ModuleType,
    ) -> ServiceResult<TestSession> {
        let user_id = ctx.require_user()?;
        let now = Utc::now();

        let session = TestSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            test_type: module_type,
            status: SessionStatus::InProgress,
            started_at: now,
            completed_at: None,
            overall_score: None,
            created_at: now,
        };

        self.store
            .insert_session(&session)
            .await
            .map_err(ServiceError::Persistence)?;

        SESSIONS_TOTAL
            .with_label_values(&[module_type.as_str(), SessionStatus::InProgress.as_str()])
            .inc();
        tracing::info!(
            "Started {} session {} for user {}",
            module_type.as_str(),
            session.id,
            user_id
        );

        Ok(session)
    }

    pub async fn get_session(
        &self,
        ctx: &AuthContext,
        session_id: &str,
    ) -> ServiceResult<TestSession> {
        let user_id = ctx.require_user()?;
        find_owned_session(self.store.as_ref(), user_id, session_id).await
    }

    /// All sessions of the caller, newest first.
    pub async fn history(&self, ctx: &AuthContext) -> ServiceResult<Vec<TestSession>> {
        let user_id = ctx.require_user()?;
        self.store
            .list_sessions(&SessionQuery::for_user(user_id))
            .await
            .map_err(ServiceError::Persistence)
    }

    /// Marks the session completed and stamps `completed_at`. Completing an
    /// already completed session restamps it and replaces the score.
    pub async fn complete_session(
        &self,
        ctx: &AuthContext,
        session_id: &str,
        req: CompleteSessionRequest,
    ) -> ServiceResult<TestSession> {
        let user_id = ctx.require_user()?;
        req.validate()?;
        let mut session = find_owned_session(self.store.as_ref(), user_id, session_id).await?;

        transition(&mut session, SessionStatus::Completed)?;
        session.completed_at = Some(Utc::now());
        session.overall_score = req.overall_score;

        self.store
            .replace_session(&session)
            .await
            .map_err(ServiceError::Persistence)?;

        SESSIONS_TOTAL
            .with_label_values(&[session.test_type.as_str(), SessionStatus::Completed.as_str()])
            .inc();
        tracing::info!(
            "Completed session {} (score: {:?})",
            session.id,
            session.overall_score
        );

        Ok(session)
    }

    pub async fn submit_session(
        &self,
        ctx: &AuthContext,
        session_id: &str,
    ) -> ServiceResult<TestSession> {
        let user_id = ctx.require_user()?;
        let mut session = find_owned_session(self.store.as_ref(), user_id, session_id).await?;

        transition(&mut session, SessionStatus::Submitted)?;

        self.store
            .replace_session(&session)
            .await
            .map_err(ServiceError::Persistence)?;

        SESSIONS_TOTAL
            .with_label_values(&[session.test_type.as_str(), SessionStatus::Submitted.as_str()])
            .inc();
        tracing::info!("Submitted session {}", session.id);

        Ok(session)
    }
}

fn transition(session: &mut TestSession, next: SessionStatus) -> ServiceResult<()> {
    if !session.status.can_transition_to(next) {
        return Err(ServiceError::PreconditionViolation(format!(
            "session {} cannot move from {} to {}",
            session.id,
            session.status.as_str(),
            next.as_str()
        )));
    }
    session.status = next;
    Ok(())
}

/// Loads a session and hides it from everyone but its owner.
pub(crate) async fn find_owned_session(
    store: &dyn DataStore,
    user_id: &str,
    session_id: &str,
) -> ServiceResult<TestSession> {
    let session = store
        .find_session(session_id)
        .await
        .map_err(ServiceError::Persistence)?;

    match session {
        Some(session) if session.user_id == user_id => Ok(session),
        Some(_) => {
            tracing::warn!(
                "User {} tried to access session {} owned by someone else",
                user_id,
                session_id
            );
            Err(ServiceError::NotFound("Session".to_string()))
        }
        None => Err(ServiceError::NotFound("Session".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> SessionService {
        SessionService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_requires_identity() {
        let err = service()
            .create_session(&AuthContext::anonymous(), ModuleType::Reading)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotAuthenticated));
    }

    #[tokio::test]
    async fn created_session_is_in_progress() {
        let service = service();
        let ctx = AuthContext::user("u1");
        let session = service
            .create_session(&ctx, ModuleType::FullExam)
            .await
            .unwrap();

        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.user_id, "u1");
        assert!(session.completed_at.is_none());
        assert_eq!(service.get_session(&ctx, &session.id).await.unwrap(), session);
    }

    #[tokio::test]
    async fn complete_stamps_time_and_score() {
        let service = service();
        let ctx = AuthContext::user("u1");
        let session = service.create_session(&ctx, ModuleType::Reading).await.unwrap();

        let completed = service
            .complete_session(
                &ctx,
                &session.id,
                CompleteSessionRequest {
                    overall_score: Some(7.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(completed.status, SessionStatus::Completed);
        assert_eq!(completed.overall_score, Some(7.0));
        assert!(completed.completed_at.is_some());
    }

    #[tokio::test]
    async fn double_completion_restamps() {
        let service = service();
        let ctx = AuthContext::user("u1");
        let session = service.create_session(&ctx, ModuleType::Writing).await.unwrap();

        let first = service
            .complete_session(&ctx, &session.id, CompleteSessionRequest::default())
            .await
            .unwrap();
        let second = service
            .complete_session(&ctx, &session.id, CompleteSessionRequest::default())
            .await
            .unwrap();

        assert_eq!(second.status, SessionStatus::Completed);
        assert!(second.completed_at >= first.completed_at);
    }

    #[tokio::test]
    async fn submitted_session_cannot_be_completed() {
        let service = service();
        let ctx = AuthContext::user("u1");
        let session = service.create_session(&ctx, ModuleType::Speaking).await.unwrap();
        service.submit_session(&ctx, &session.id).await.unwrap();

        let err = service
            .complete_session(&ctx, &session.id, CompleteSessionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PreconditionViolation(_)));

        let err = service.submit_session(&ctx, &session.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::PreconditionViolation(_)));
    }

    #[tokio::test]
    async fn foreign_sessions_are_hidden() {
        let service = service();
        let owner = AuthContext::user("owner");
        let session = service.create_session(&owner, ModuleType::Reading).await.unwrap();

        let err = service
            .get_session(&AuthContext::user("intruder"), &session.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let service = service();
        let ctx = AuthContext::user("u1");
        let session = service.create_session(&ctx, ModuleType::Reading).await.unwrap();

        let err = service
            .complete_session(
                &ctx,
                &session.id,
                CompleteSessionRequest {
                    overall_score: Some(12.0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn anonymous_completion_fails_before_validation() {
        let err = service()
            .complete_session(
                &AuthContext::anonymous(),
                "any-session",
                CompleteSessionRequest {
                    overall_score: Some(12.0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotAuthenticated));
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let service = service();
        let ctx = AuthContext::user("u1");
        let first = service.create_session(&ctx, ModuleType::Reading).await.unwrap();
        let second = service.create_session(&ctx, ModuleType::Writing).await.unwrap();
        service
            .create_session(&AuthContext::user("u2"), ModuleType::Writing)
            .await
            .unwrap();

        let history = service.history(&ctx).await.unwrap();
        let ids: Vec<_> = history.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }
}
