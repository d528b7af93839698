//! Runs the MongoDB backend against a live server. Each test uses its own
//! database and is skipped when `MONGO_URI` is not set.

use std::collections::BTreeMap;
use std::sync::Arc;

use bandprep_api::{
    models::{
        ComprehensionResponse, ModuleType, Profile, ProfileUpdate, SessionStatus, Skill,
        TestSession,
    },
    store::{DataStore, MongoStore, SessionOrder, SessionQuery},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use mongodb::{
    bson::{doc, Bson},
    Database,
};
use uuid::Uuid;

async fn test_database() -> Option<Database> {
    dotenvy::dotenv().ok();
    let uri = match std::env::var("MONGO_URI") {
        Ok(uri) if !uri.trim().is_empty() => uri,
        _ => {
            eprintln!("MONGO_URI not set, skipping MongoDB store test");
            return None;
        }
    };

    let client = mongodb::Client::with_uri_str(&uri)
        .await
        .expect("Failed to connect to test MongoDB");
    let name = format!("bandprep_store_test_{}", Uuid::new_v4().simple());
    Some(client.database(&name))
}

/// Current time at the millisecond precision BSON dates keep.
fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap()
}

fn profile(user_id: &str) -> Profile {
    let now = now_millis();
    Profile {
        id: user_id.to_string(),
        full_name: "Mongo Student".to_string(),
        email: "mongo@example.com".to_string(),
        target_score: 7.5,
        current_score: 6.0,
        exam_date: NaiveDate::from_ymd_opt(2027, 3, 14),
        study_goal: "Migration".to_string(),
        country: Some("NZ".to_string()),
        total_study_hours: 0.0,
        tests_completed: 0,
        current_streak: 2,
        created_at: now,
        updated_at: now,
    }
}

fn session(
    user_id: &str,
    status: SessionStatus,
    completed_at: Option<DateTime<Utc>>,
) -> TestSession {
    let now = now_millis();
    TestSession {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        test_type: ModuleType::Reading,
        status,
        started_at: now,
        completed_at,
        overall_score: completed_at.map(|_| 6.5),
        created_at: now,
    }
}

#[tokio::test]
async fn test_profile_round_trips_through_mongo() {
    let Some(db) = test_database().await else {
        return;
    };
    let store = MongoStore::new(db.clone());

    let original = profile("user-roundtrip");
    store.insert_profile(&original).await.unwrap();

    let raw = db
        .collection::<mongodb::bson::Document>("profiles")
        .find_one(doc! { "_id": "user-roundtrip" })
        .await
        .unwrap()
        .unwrap();
    assert!(raw.get("id").is_none());
    assert!(matches!(raw.get("created_at"), Some(Bson::DateTime(_))));

    let loaded = store.find_profile("user-roundtrip").await.unwrap().unwrap();
    assert_eq!(loaded, original);
    assert!(store.find_profile("someone-else").await.unwrap().is_none());

    db.drop().await.unwrap();
}

#[tokio::test]
async fn test_profile_update_only_sets_given_fields() {
    let Some(db) = test_database().await else {
        return;
    };
    let store = MongoStore::new(db.clone());
    let original = profile("user-update");
    store.insert_profile(&original).await.unwrap();

    let later = original.updated_at + Duration::seconds(30);
    let updated = store
        .update_profile(
            "user-update",
            &ProfileUpdate {
                current_score: Some(6.5),
                ..Default::default()
            },
            later,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.current_score, 6.5);
    assert_eq!(updated.full_name, original.full_name);
    assert_eq!(updated.exam_date, original.exam_date);
    assert_eq!(updated.country, original.country);
    assert_eq!(updated.updated_at, later);
    assert_eq!(updated.created_at, original.created_at);

    let missing = store
        .update_profile("nobody", &ProfileUpdate::default(), later)
        .await
        .unwrap();
    assert!(missing.is_none());

    db.drop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_counter_updates_are_not_lost() {
    let Some(db) = test_database().await else {
        return;
    };
    let store = Arc::new(MongoStore::new(db.clone()));
    store.insert_profile(&profile("user-counters")).await.unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                assert!(store.increment_tests_completed("user-counters").await.unwrap());
                assert!(store.add_study_hours("user-counters", 0.5).await.unwrap());
            })
        })
        .collect();
    for task in futures::future::join_all(tasks).await {
        task.unwrap();
    }

    let loaded = store.find_profile("user-counters").await.unwrap().unwrap();
    assert_eq!(loaded.tests_completed, 20);
    assert_eq!(loaded.total_study_hours, 10.0);
    assert!(!store.increment_tests_completed("nobody").await.unwrap());

    db.drop().await.unwrap();
}

#[tokio::test]
async fn test_completed_sessions_are_ordered_by_completion() {
    let Some(db) = test_database().await else {
        return;
    };
    let store = MongoStore::new(db.clone());
    let base = now_millis();

    let early = session("user-s", SessionStatus::Completed, Some(base));
    let late = session("user-s", SessionStatus::Completed, Some(base + Duration::hours(2)));
    let middle = session("user-s", SessionStatus::Completed, Some(base + Duration::hours(1)));
    let open = session("user-s", SessionStatus::InProgress, None);
    let foreign = session("user-t", SessionStatus::Completed, Some(base));
    for s in [&early, &late, &middle, &open, &foreign] {
        store.insert_session(s).await.unwrap();
    }

    let completed = store
        .list_sessions(&SessionQuery {
            user_id: "user-s".to_string(),
            status: Some(SessionStatus::Completed),
            order_by: SessionOrder::CompletedAt,
            limit: Some(2),
        })
        .await
        .unwrap();
    let ids: Vec<_> = completed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![late.id.as_str(), middle.id.as_str()]);
    assert_eq!(completed[0].completed_at, late.completed_at);

    let mut submitted = open.clone();
    submitted.status = SessionStatus::Submitted;
    store.replace_session(&submitted).await.unwrap();
    let reloaded = store.find_session(&open.id).await.unwrap().unwrap();
    assert_eq!(reloaded, submitted);

    let all = store
        .list_sessions(&SessionQuery::for_user("user-s"))
        .await
        .unwrap();
    assert_eq!(all.len(), 4);

    db.drop().await.unwrap();
}

#[tokio::test]
async fn test_band_scores_accept_numeric_bson_types() {
    let Some(db) = test_database().await else {
        return;
    };
    let store = MongoStore::new(db.clone());
    let base = now_millis();

    let response = ComprehensionResponse {
        id: Uuid::new_v4().to_string(),
        user_id: "user-b".to_string(),
        session_id: None,
        skill: Skill::Reading,
        content_id: "passage".to_string(),
        answers: BTreeMap::new(),
        correct_answers: BTreeMap::new(),
        score: 7,
        total_questions: 10,
        band_score: Some(7.0),
        time_taken: None,
        created_at: base,
    };
    store.insert_response(&response).await.unwrap();

    let raw = db.collection::<mongodb::bson::Document>(Skill::Reading.collection());
    let scored = |id: &str, user_id: &str, band: Bson, minutes: i64| {
        let created_at = base + Duration::minutes(minutes);
        doc! {
            "_id": id,
            "user_id": user_id,
            "band_score": band,
            "created_at": mongodb::bson::DateTime::from_millis(created_at.timestamp_millis()),
        }
    };
    raw.insert_many([
        scored("int32", "user-b", Bson::Int32(6), 1),
        scored("int64", "user-b", Bson::Int64(5), 2),
        scored("null", "user-b", Bson::Null, 3),
        scored("other", "user-c", Bson::Double(9.0), 4),
    ])
    .await
    .unwrap();

    let bands = store
        .recent_band_scores("user-b", Skill::Reading, 5)
        .await
        .unwrap();
    assert_eq!(bands, vec![5.0, 6.0, 7.0]);

    let newest = store
        .recent_band_scores("user-b", Skill::Reading, 1)
        .await
        .unwrap();
    assert_eq!(newest, vec![5.0]);

    db.drop().await.unwrap();
}
