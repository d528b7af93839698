use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_profile, create_test_app, new_student, send};

async fn submit_reading(app: &axum::Router, token: &str, correct: usize, total: usize) {
    let answers: serde_json::Map<String, serde_json::Value> = (0..total)
        .map(|i| {
            let answer = if i < correct { "yes" } else { "no" };
            (i.to_string(), json!(answer))
        })
        .collect();
    let key: serde_json::Map<String, serde_json::Value> =
        (0..total).map(|i| (i.to_string(), json!("yes"))).collect();

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/submissions/reading",
        Some(token),
        Some(json!({
            "passage_id": "p",
            "answers": answers,
            "correct_answers": key,
            "total_questions": total
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn test_progress_without_profile_reports_zero_study_stats() {
    let app = create_test_app();
    let (_, token) = new_student();
    submit_reading(&app, &token, 9, 10).await;

    let (status, report) = send(&app, "GET", "/api/v1/progress", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["section_scores"]["reading"], 9.0);
    assert_eq!(report["study_stats"]["tests_completed"], 0);
    assert_eq!(report["study_stats"]["total_hours"], 0.0);
    assert_eq!(report["study_stats"]["current_streak"], 0);
    assert_eq!(report["study_stats"]["improvement"], 0);
}

#[tokio::test]
async fn test_fresh_profile_reports_everything_weak() {
    let app = create_test_app();
    let (_, token) = new_student();
    create_profile(&app, &token, 6.0).await;

    let (status, report) = send(&app, "GET", "/api/v1/progress", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["overall_score"], 0.0);
    assert_eq!(
        report["weak_areas"],
        json!(["writing", "reading", "speaking", "listening"])
    );
    assert_eq!(report["recommendations"].as_array().unwrap().len(), 8);
    assert_eq!(report["recommendations"][0], "Practice essay structure and coherence");
    assert_eq!(report["recommendations"][2], "Record daily speaking practice");
    assert_eq!(report["study_stats"]["improvement"], 0);
}

#[tokio::test]
async fn test_progress_reflects_reading_scores_and_sessions() {
    let app = create_test_app();
    let (_, token) = new_student();
    create_profile(&app, &token, 6.0).await;

    submit_reading(&app, &token, 7, 10).await; // 7.0
    submit_reading(&app, &token, 8, 10).await; // 8.0

    let (_, session) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        Some(&token),
        Some(json!({ "module_type": "reading" })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/v1/sessions/{}/complete", session["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "overall_score": 7.5 })),
    )
    .await;

    // in-progress sessions are not listed
    send(
        &app,
        "POST",
        "/api/v1/sessions",
        Some(&token),
        Some(json!({ "module_type": "writing" })),
    )
    .await;

    let (status, report) = send(&app, "GET", "/api/v1/progress", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["section_scores"]["reading"], 7.5);
    assert_eq!(report["overall_score"], 7.5);
    assert_eq!(report["study_stats"]["improvement"], 25);

    let recent = report["recent_tests"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["test_type"], "reading");
    assert_eq!(recent[0]["score"], 7.5);

    let weak = report["weak_areas"].as_array().unwrap();
    assert!(!weak.contains(&json!("reading")));
}
