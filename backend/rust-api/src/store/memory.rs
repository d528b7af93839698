use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DataStore, SessionOrder, SessionQuery, TipQuery};
use crate::models::{
    ComprehensionResponse, DailyTip, Profile, ProfileUpdate, Skill, SpeakingRecording,
    TestSession, WritingSubmission,
};

#[derive(Default)]
struct Collections {
    profiles: HashMap<String, Profile>,
    sessions: Vec<TestSession>,
    writing: Vec<WritingSubmission>,
    speaking: Vec<SpeakingRecording>,
    responses: Vec<ComprehensionResponse>,
    tips: Vec<DailyTip>,
}

/// Process-local store. Every mutation holds the write lock, so counter
/// updates cannot interleave.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; among equal timestamps the later insert wins.
fn newest_first<'a, T, F>(items: &'a [T], key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut sorted: Vec<&T> = items.iter().rev().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}

fn take_limit<T>(items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(limit) => items.into_iter().take(limit).collect(),
        None => items,
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.profiles.contains_key(&profile.id) {
            bail!("Duplicate profile id {}", profile.id);
        }
        inner.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.inner.read().await.profiles.get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Profile>> {
        let mut inner = self.inner.write().await;
        Ok(inner.profiles.get_mut(user_id).map(|profile| {
            update.apply_to(profile);
            profile.updated_at = updated_at;
            profile.clone()
        }))
    }

    async fn increment_tests_completed(&self, user_id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(match inner.profiles.get_mut(user_id) {
            Some(profile) => {
                profile.tests_completed += 1;
                profile.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn add_study_hours(&self, user_id: &str, hours: f64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(match inner.profiles.get_mut(user_id) {
            Some(profile) => {
                profile.total_study_hours += hours;
                profile.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn insert_session(&self, session: &TestSession) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.sessions.iter().any(|s| s.id == session.id) {
            bail!("Duplicate session id {}", session.id);
        }
        inner.sessions.push(session.clone());
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<TestSession>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.iter().find(|s| s.id == session_id).cloned())
    }

    async fn replace_session(&self, session: &TestSession) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => bail!("Session {} not found", session.id),
        }
    }

    async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<TestSession>> {
        let inner = self.inner.read().await;
        let matching: Vec<TestSession> = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == query.user_id)
            .filter(|s| query.status.is_none_or(|status| s.status == status))
            .cloned()
            .collect();

        let sorted = newest_first(&matching, |s| match query.order_by {
            SessionOrder::CreatedAt => Some(s.created_at),
            SessionOrder::CompletedAt => s.completed_at,
        });
        Ok(take_limit(sorted, query.limit)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn insert_writing(&self, submission: &WritingSubmission) -> Result<()> {
        self.inner.write().await.writing.push(submission.clone());
        Ok(())
    }

    async fn list_writing(&self, user_id: &str) -> Result<Vec<WritingSubmission>> {
        let inner = self.inner.read().await;
        let own: Vec<WritingSubmission> = inner
            .writing
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(&own, |w| Some(w.created_at))
            .into_iter()
            .cloned()
            .collect())
    }

    async fn insert_speaking(&self, recording: &SpeakingRecording) -> Result<()> {
        self.inner.write().await.speaking.push(recording.clone());
        Ok(())
    }

    async fn insert_response(&self, response: &ComprehensionResponse) -> Result<()> {
        self.inner.write().await.responses.push(response.clone());
        Ok(())
    }

    async fn recent_band_scores(
        &self,
        user_id: &str,
        skill: Skill,
        limit: usize,
    ) -> Result<Vec<f64>> {
        let inner = self.inner.read().await;
        let scored: Vec<(DateTime<Utc>, f64)> = match skill {
            Skill::Writing => inner
                .writing
                .iter()
                .filter(|w| w.user_id == user_id)
                .filter_map(|w| w.band_score.map(|band| (w.created_at, band)))
                .collect(),
            Skill::Speaking => inner
                .speaking
                .iter()
                .filter(|s| s.user_id == user_id)
                .filter_map(|s| s.band_score.map(|band| (s.created_at, band)))
                .collect(),
            Skill::Reading | Skill::Listening => inner
                .responses
                .iter()
                .filter(|r| r.user_id == user_id && r.skill == skill)
                .filter_map(|r| r.band_score.map(|band| (r.created_at, band)))
                .collect(),
        };

        Ok(newest_first(&scored, |(created_at, _)| Some(*created_at))
            .into_iter()
            .take(limit)
            .map(|(_, band)| *band)
            .collect())
    }

    async fn insert_tip(&self, tip: &DailyTip) -> Result<()> {
        self.inner.write().await.tips.push(tip.clone());
        Ok(())
    }

    async fn list_tips(&self, query: &TipQuery) -> Result<Vec<DailyTip>> {
        let inner = self.inner.read().await;
        let active: Vec<DailyTip> = inner
            .tips
            .iter()
            .filter(|t| t.is_active)
            .filter(|t| query.category.is_none_or(|category| t.category == category))
            .cloned()
            .collect();
        let sorted = newest_first(&active, |t| Some(t.created_at));
        Ok(take_limit(sorted, query.limit)
            .into_iter()
            .cloned()
            .collect())
    }
}
