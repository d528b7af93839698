use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};

use super::{DataStore, SessionQuery, TipQuery, DAILY_TIPS, PROFILES, TEST_SESSIONS};
use crate::metrics::track_db_operation;
use crate::models::{
    ComprehensionResponse, DailyTip, Profile, ProfileUpdate, Skill, SpeakingRecording,
    TestSession, WritingSubmission,
};
use crate::utils::time::{chrono_to_bson, from_stored_document, to_stored_document};

const PROFILE_DATES: &[&str] = &["created_at", "updated_at"];
const SESSION_DATES: &[&str] = &["started_at", "completed_at", "created_at"];
const CREATED_ONLY: &[&str] = &["created_at"];

/// MongoDB reads 0 as "no limit" and a negative value as a single batch, so
/// only limits in `1..=i64::MAX` reach the driver.
fn positive_limit(limit: usize) -> Result<i64> {
    match i64::try_from(limit) {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(anyhow!("Unsupported query limit {}", limit)),
    }
}

/// MongoDB-backed store. Counter updates use `$inc` so concurrent
/// submissions from the same user cannot lose increments.
pub struct MongoStore {
    mongo: Database,
}

impl MongoStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.mongo.collection::<Document>(name)
    }

    async fn insert<T: Serialize>(
        &self,
        collection: &'static str,
        record: &T,
        date_fields: &[&str],
    ) -> Result<()> {
        let doc = to_stored_document(record, date_fields)?;
        track_db_operation("insert", collection, async {
            self.collection(collection)
                .insert_one(doc)
                .await
                .map(|_| ())
                .with_context(|| format!("Failed to insert into {}", collection))
        })
        .await
    }

    async fn find_many<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        filter: Document,
        sort_field: &str,
        limit: Option<usize>,
        date_fields: &[&str],
    ) -> Result<Vec<T>> {
        let source = self.collection(collection);
        let mut find = source.find(filter).sort(doc! { sort_field: -1 });
        if let Some(limit) = limit {
            find = find.limit(positive_limit(limit)?);
        }
        let cursor = track_db_operation("find", collection, async {
            find.await
                .with_context(|| format!("Failed to query {}", collection))
        })
        .await?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("{} cursor failure: {}", collection, e))?;

        docs.into_iter()
            .map(|doc| from_stored_document(doc, date_fields))
            .collect()
    }

    async fn find_by_id<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        id: &str,
        date_fields: &[&str],
    ) -> Result<Option<T>> {
        let found = track_db_operation("find_one", collection, async {
            self.collection(collection)
                .find_one(doc! { "_id": id })
                .await
                .with_context(|| format!("Failed to query {}", collection))
        })
        .await?;

        found
            .map(|doc| from_stored_document(doc, date_fields))
            .transpose()
    }

    async fn increment(&self, user_id: &str, field: &str, amount: Bson) -> Result<bool> {
        let result = track_db_operation("update", PROFILES, async {
            self.collection(PROFILES)
                .update_one(
                    doc! { "_id": user_id },
                    doc! {
                        "$inc": { field: amount },
                        "$set": { "updated_at": chrono_to_bson(Utc::now()) },
                    },
                )
                .await
                .context("Failed to increment profile counter")
        })
        .await?;

        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl DataStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.mongo
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        self.insert(PROFILES, profile, PROFILE_DATES).await
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.find_by_id(PROFILES, user_id, PROFILE_DATES).await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Profile>> {
        let mut set = mongodb::bson::to_document(update).context("Failed to encode update")?;
        set.insert("updated_at", chrono_to_bson(updated_at));

        let result = track_db_operation("update", PROFILES, async {
            self.collection(PROFILES)
                .update_one(doc! { "_id": user_id }, doc! { "$set": set })
                .await
                .context("Failed to update profile")
        })
        .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        self.find_profile(user_id).await
    }

    async fn increment_tests_completed(&self, user_id: &str) -> Result<bool> {
        self.increment(user_id, "tests_completed", Bson::Int64(1))
            .await
    }

    async fn add_study_hours(&self, user_id: &str, hours: f64) -> Result<bool> {
        self.increment(user_id, "total_study_hours", Bson::Double(hours))
            .await
    }

    async fn insert_session(&self, session: &TestSession) -> Result<()> {
        self.insert(TEST_SESSIONS, session, SESSION_DATES).await
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<TestSession>> {
        self.find_by_id(TEST_SESSIONS, session_id, SESSION_DATES)
            .await
    }

    async fn replace_session(&self, session: &TestSession) -> Result<()> {
        let doc = to_stored_document(session, SESSION_DATES)?;
        let result = track_db_operation("replace", TEST_SESSIONS, async {
            self.collection(TEST_SESSIONS)
                .replace_one(doc! { "_id": session.id.as_str() }, doc)
                .await
                .context("Failed to update session")
        })
        .await?;

        if result.matched_count == 0 {
            return Err(anyhow!("Session {} not found", session.id));
        }
        Ok(())
    }

    async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<TestSession>> {
        let mut filter = doc! { "user_id": &query.user_id };
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        self.find_many(
            TEST_SESSIONS,
            filter,
            query.order_by.field(),
            query.limit,
            SESSION_DATES,
        )
        .await
    }

    async fn insert_writing(&self, submission: &WritingSubmission) -> Result<()> {
        self.insert(Skill::Writing.collection(), submission, CREATED_ONLY)
            .await
    }

    async fn list_writing(&self, user_id: &str) -> Result<Vec<WritingSubmission>> {
        self.find_many(
            Skill::Writing.collection(),
            doc! { "user_id": user_id },
            "created_at",
            None,
            CREATED_ONLY,
        )
        .await
    }

    async fn insert_speaking(&self, recording: &SpeakingRecording) -> Result<()> {
        self.insert(Skill::Speaking.collection(), recording, CREATED_ONLY)
            .await
    }

    async fn insert_response(&self, response: &ComprehensionResponse) -> Result<()> {
        self.insert(response.skill.collection(), response, CREATED_ONLY)
            .await
    }

    async fn recent_band_scores(
        &self,
        user_id: &str,
        skill: Skill,
        limit: usize,
    ) -> Result<Vec<f64>> {
        let collection = skill.collection();
        let limit = positive_limit(limit)?;
        let cursor = track_db_operation("find", collection, async {
            self.collection(collection)
                .find(doc! { "user_id": user_id, "band_score": { "$ne": Bson::Null } })
                .sort(doc! { "created_at": -1 })
                .limit(limit)
                .projection(doc! { "band_score": 1 })
                .await
                .with_context(|| format!("Failed to query {} scores", collection))
        })
        .await?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("{} cursor failure: {}", collection, e))?;

        Ok(docs
            .iter()
            .filter_map(|doc| match doc.get("band_score") {
                Some(Bson::Double(v)) => Some(*v),
                Some(Bson::Int32(v)) => Some(f64::from(*v)),
                Some(Bson::Int64(v)) => Some(*v as f64),
                _ => None,
            })
            .collect())
    }

    async fn insert_tip(&self, tip: &DailyTip) -> Result<()> {
        self.insert(DAILY_TIPS, tip, CREATED_ONLY).await
    }

    async fn list_tips(&self, query: &TipQuery) -> Result<Vec<DailyTip>> {
        let mut filter = doc! { "is_active": true };
        if let Some(category) = query.category {
            filter.insert("category", category.as_str());
        }
        self.find_many(DAILY_TIPS, filter, "created_at", query.limit, CREATED_ONLY)
            .await
    }
}
