use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewProfile, Profile, ProfileUpdate};
use crate::services::AuthContext;
use crate::store::DataStore;

pub struct ProfileService {
    store: Arc<dyn DataStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Creates the caller's profile. Counters start at zero.
    pub async fn create_profile(
        &self,
        ctx: &AuthContext,
        req: NewProfile,
    ) -> ServiceResult<Profile> {
        let user_id = ctx.require_user()?;
        req.validate()?;

        let existing = self
            .store
            .find_profile(user_id)
            .await
            .map_err(ServiceError::Persistence)?;
        if existing.is_some() {
            return Err(ServiceError::PreconditionViolation(
                "profile already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let profile = Profile {
            id: user_id.to_string(),
            full_name: req.full_name,
            email: req.email,
            target_score: req.target_score,
            current_score: req.current_score,
            exam_date: req.exam_date,
            study_goal: req.study_goal,
            country: req.country,
            total_study_hours: 0.0,
            tests_completed: 0,
            current_streak: 0,
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_profile(&profile)
            .await
            .map_err(ServiceError::Persistence)?;
        tracing::info!("Created profile for user {}", user_id);

        Ok(profile)
    }

    pub async fn get_profile(&self, ctx: &AuthContext) -> ServiceResult<Profile> {
        let user_id = ctx.require_user()?;
        self.store
            .find_profile(user_id)
            .await
            .map_err(ServiceError::Persistence)?
            .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))
    }

    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        update: ProfileUpdate,
    ) -> ServiceResult<Profile> {
        let user_id = ctx.require_user()?;
        update.validate()?;

        if update.is_empty() {
            return self.get_profile(ctx).await;
        }

        let profile = self
            .store
            .update_profile(user_id, &update, Utc::now())
            .await
            .map_err(ServiceError::Persistence)?
            .ok_or_else(|| ServiceError::NotFound("Profile".to_string()))?;

        tracing::info!("Updated profile for user {}", user_id);
        Ok(profile)
    }

    /// `tests_completed += 1`; a missing profile is silently skipped.
    pub async fn increment_test_completion(&self, ctx: &AuthContext) -> ServiceResult<()> {
        let user_id = ctx.require_user()?;
        let matched = self
            .store
            .increment_tests_completed(user_id)
            .await
            .map_err(ServiceError::Persistence)?;

        if !matched {
            tracing::warn!("No profile for user {}, test completion not counted", user_id);
        }
        Ok(())
    }

    /// Adds `minutes / 60` hours; a missing profile is silently skipped.
    pub async fn add_study_time(&self, ctx: &AuthContext, minutes: u32) -> ServiceResult<()> {
        let user_id = ctx.require_user()?;
        let hours = f64::from(minutes) / 60.0;
        let matched = self
            .store
            .add_study_hours(user_id, hours)
            .await
            .map_err(ServiceError::Persistence)?;

        if matched {
            tracing::debug!("Added {} study minutes for user {}", minutes, user_id);
        } else {
            tracing::warn!("No profile for user {}, study time not recorded", user_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_profile() -> NewProfile {
        NewProfile {
            full_name: "Ada Learner".to_string(),
            email: "ada@example.com".to_string(),
            target_score: 7.5,
            current_score: 6.0,
            exam_date: None,
            study_goal: "University admission".to_string(),
            country: Some("NZ".to_string()),
        }
    }

    #[tokio::test]
    async fn counters_start_at_zero() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let profile = service
            .create_profile(&AuthContext::user("u1"), new_profile())
            .await
            .unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.tests_completed, 0);
        assert_eq!(profile.total_study_hours, 0.0);
    }

    #[tokio::test]
    async fn duplicate_profile_is_rejected() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let ctx = AuthContext::user("u1");
        service.create_profile(&ctx, new_profile()).await.unwrap();

        let err = service.create_profile(&ctx, new_profile()).await.unwrap_err();
        assert!(matches!(err, ServiceError::PreconditionViolation(_)));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let mut req = new_profile();
        req.email = "not-an-email".to_string();
        let err = service
            .create_profile(&AuthContext::user("u1"), req)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let ctx = AuthContext::user("u1");
        let created = service.create_profile(&ctx, new_profile()).await.unwrap();

        let updated = service
            .update_profile(
                &ctx,
                ProfileUpdate {
                    target_score: Some(8.0),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.target_score, 8.0);
        assert_eq!(updated.full_name, created.full_name);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn study_time_accumulates_in_hours() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let ctx = AuthContext::user("u1");
        service.create_profile(&ctx, new_profile()).await.unwrap();

        service.add_study_time(&ctx, 90).await.unwrap();
        service.add_study_time(&ctx, 30).await.unwrap();
        service.increment_test_completion(&ctx).await.unwrap();

        let profile = service.get_profile(&ctx).await.unwrap();
        assert_eq!(profile.total_study_hours, 2.0);
        assert_eq!(profile.tests_completed, 1);
    }

    #[tokio::test]
    async fn counters_without_profile_are_noops() {
        let service = ProfileService::new(Arc::new(MemoryStore::new()));
        let ctx = AuthContext::user("ghost");

        service.increment_test_completion(&ctx).await.unwrap();
        service.add_study_time(&ctx, 45).await.unwrap();

        let err = service.get_profile(&ctx).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let service = Arc::new(ProfileService::new(Arc::new(MemoryStore::new())));
        let ctx = AuthContext::user("u1");
        service.create_profile(&ctx, new_profile()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                service.increment_test_completion(&ctx).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(service.get_profile(&ctx).await.unwrap().tests_completed, 20);
    }
}
