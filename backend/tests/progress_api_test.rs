//! Integration tests for the progress endpoints

mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use fitness_progress_backend::repositories::ProgressStore;
use fitness_progress_shared::{
    Program, ProgressAggregate, ProgressError, ProgressResult, TrainingProfile,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

fn workout(date: &str, minutes: Option<f64>) -> String {
    json!({
        "type": "workout",
        "data": { "date": date, "duration_minutes": minutes }
    })
    .to_string()
}

#[tokio::test]
async fn test_progress_requires_auth() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/v1/progress").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/api/v1/progress", &workout("2025-01-10T07:00:00Z", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = common::TestApp::new().await;

    let (status, body) = app.get_auth("/api/v1/progress", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse(&body)["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_first_read_creates_defaults() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let (status, body) = app.get_auth("/api/v1/progress", &token).await;
    assert_eq!(status, StatusCode::OK);

    let body = parse(&body);
    assert_eq!(body["stats"]["total_workouts"], 0);
    assert_eq!(body["stats"]["weekly_goal"], 3);
    assert_eq!(body["streak_data"]["current_streak"], 0);
    assert_eq!(body["streak_data"]["longest_streak"], 0);
    assert_eq!(body["recent_workouts"], json!([]));
    assert_eq!(body["chart_data"]["workout_frequency"].as_array().unwrap().len(), 30);
    assert!(body.get("schedule").is_none());
}

#[tokio::test]
async fn test_read_without_create_is_not_found() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let (status, body) = app.get_auth("/api/v1/progress?create=false", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body)["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_log_workout_success() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let (status, body) = app
        .post_auth("/api/v1/progress", &workout("2025-01-10T07:00:00Z", Some(45.0)), &token)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let record = parse(&body);
    assert!(!record["id"].as_str().unwrap().is_empty());
    assert_eq!(record["completed"], true);
    assert_eq!(record["workout_type"], "mixed");
    assert_eq!(record["duration_minutes"], 45.0);

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    let body = parse(&body);
    assert_eq!(body["stats"]["total_workouts"], 1);
    assert_eq!(body["stats"]["total_minutes"], 45.0);
    assert_eq!(body["streak_data"]["current_streak"], 1);
    assert_eq!(body["recent_workouts"][0]["id"], record["id"]);
}

#[tokio::test]
async fn test_missed_training_day_in_schedule() {
    let app = common::TestApp::new().await;
    let (user_id, token) = app.login();
    app.profiles
        .insert(
            user_id,
            TrainingProfile {
                program: Program::TrainingDiet,
                days_per_week: Some(3),
                weight_kg: None,
                height_cm: None,
                gender: None,
            },
        )
        .await;

    // Monday and Wednesday; today is Friday
    for date in ["2025-01-06T07:00:00Z", "2025-01-08T07:00:00Z"] {
        let (status, _) = app.post_auth("/api/v1/progress", &workout(date, Some(40.0)), &token).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get_auth("/api/v1/progress", &token).await;
    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);

    assert_eq!(body["stats"]["workouts_this_week"], 2);
    assert_eq!(body["stats"]["weekly_goal_percent"], 67);
    // Wednesday is tolerated as a one-day gap; only Monday is counted
    assert_eq!(body["streak_data"]["current_streak"], 1);

    let schedule = body["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 7);
    let friday = schedule.iter().find(|d| d["date"] == "2025-01-10").unwrap();
    assert_eq!(friday["is_training_day"], true);
    assert_eq!(friday["has_workout"], false);
    assert_eq!(friday["missed"], true);
    let monday = schedule.iter().find(|d| d["date"] == "2025-01-06").unwrap();
    assert_eq!(monday["has_workout"], true);
    assert_eq!(monday["missed"], false);
}

#[tokio::test]
async fn test_average_skips_missing_durations() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    for (date, minutes) in [
        ("2025-01-08T07:00:00Z", Some(30.0)),
        ("2025-01-09T07:00:00Z", None),
        ("2025-01-10T07:00:00Z", Some(45.0)),
    ] {
        app.post_auth("/api/v1/progress", &workout(date, minutes), &token).await;
    }

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    let body = parse(&body);
    assert_eq!(body["stats"]["average_workout_duration"], 37.5);
    assert_eq!(body["streak_data"]["current_streak"], 3);
}

#[tokio::test]
async fn test_invalid_workout_rejected_without_side_effects() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let body = json!({ "type": "workout", "data": { "duration_minutes": -5 } });
    let (status, response) = app.post_auth("/api/v1/progress", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&response)["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app.get_auth("/api/v1/progress?create=false", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_mutation_type_rejected() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let body = json!({ "type": "sleep", "data": { "hours": 8 } });
    let (status, response) = app.post_auth("/api/v1/progress", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&response)["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app.post_auth("/api/v1/progress", "{oops", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goal_update_merges_and_moves_weekly_goal() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let first = json!({ "type": "goal", "data": { "target_weight": 75.0, "target_body_fat": 15.0 } });
    let (status, _) = app.post_auth("/api/v1/progress", &first.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK);

    let second = json!({ "type": "goal", "data": { "target_weight": 72.0, "weekly_workouts": 5 } });
    let (status, body) = app.post_auth("/api/v1/progress", &second.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK);

    let goals = parse(&body);
    assert_eq!(goals["target_weight"], 72.0);
    assert_eq!(goals["target_body_fat"], 15.0);
    assert_eq!(goals["weekly_workouts"], 5);

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    let body = parse(&body);
    assert_eq!(body["streak_data"]["weekly_goal"], 5);
    assert_eq!(body["stats"]["weekly_goal"], 5);
}

#[tokio::test]
async fn test_goal_overwrite_outside_typical_range_accepted() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let body = json!({ "type": "goal", "data": { "weekly_workouts": 20, "target_body_fat": 0.0 } });
    let (status, response) = app.post_auth("/api/v1/progress", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK);

    let goals = parse(&response);
    assert_eq!(goals["weekly_workouts"], 20);
    assert_eq!(goals["target_body_fat"], 0.0);
}

#[tokio::test]
async fn test_body_metrics_feed_charts_and_bmi() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    for (recorded_at, weight) in [("2025-01-02T08:00:00Z", 82.0), ("2025-01-09T08:00:00Z", 81.0)] {
        let body = json!({
            "type": "metrics",
            "data": {
                "recorded_at": recorded_at,
                "weight": weight,
                "height": 175.0,
                "measurements": { "waist": 86.0 }
            }
        });
        let (status, response) = app.post_auth("/api/v1/progress", &body.to_string(), &token).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(parse(&response)["weight"], weight);
    }

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    let body = parse(&body);

    let weights = body["chart_data"]["weight"].as_array().unwrap();
    assert_eq!(weights.len(), 2);
    assert_eq!(weights[0]["value"], 82.0);
    assert_eq!(weights[1]["value"], 81.0);
    assert_eq!(body["chart_data"]["body_fat"], json!([]));
    assert_eq!(body["recent_metrics"][0]["weight"], 81.0);
    // 81 / 1.75^2
    assert_eq!(body["bmi"]["value"], 26.4);
    assert_eq!(body["bmi"]["category"], "overweight");
    assert_eq!(body["stats"]["total_workouts"], 0);
}

#[tokio::test]
async fn test_invalid_body_metrics_rejected() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let body = json!({ "type": "metrics", "data": { "body_fat_percent": 140.0 } });
    let (status, _) = app.post_auth("/api/v1/progress", &body.to_string(), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_workout() {
    let app = common::TestApp::new().await;
    let (_, token) = app.login();

    let (_, body) = app
        .post_auth("/api/v1/progress", &workout("2025-01-10T07:00:00Z", Some(20.0)), &token)
        .await;
    let id = parse(&body)["id"].as_str().unwrap().to_string();
    let path = format!("/api/v1/progress/workouts/{}", id);

    let (status, body) = app.delete_auth(&path, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["deleted"], true);

    let (status, _) = app.delete_auth(&path, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    let body = parse(&body);
    assert_eq!(body["stats"]["total_workouts"], 0);
    assert_eq!(body["streak_data"]["current_streak"], 0);
    assert_eq!(body["streak_data"]["longest_streak"], 1);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let app = common::TestApp::new().await;
    let (_, alice) = app.login();
    let (_, bob) = app.login();

    app.post_auth("/api/v1/progress", &workout("2025-01-10T07:00:00Z", None), &alice)
        .await;

    let (_, body) = app.get_auth("/api/v1/progress", &bob).await;
    assert_eq!(parse(&body)["stats"]["total_workouts"], 0);
}

#[tokio::test]
async fn test_week_window_starts_sunday() {
    // Sunday 2025-01-12 09:00 UTC; Saturday's workout belongs to last week
    let app = common::TestApp::at(Utc.with_ymd_and_hms(2025, 1, 12, 9, 0, 0).unwrap());
    let (_, token) = app.login();

    for date in ["2025-01-11T20:00:00Z", "2025-01-12T08:00:00Z"] {
        app.post_auth("/api/v1/progress", &workout(date, None), &token).await;
    }

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    let body = parse(&body);
    assert_eq!(body["stats"]["workouts_this_week"], 1);
    assert_eq!(body["stats"]["workouts_this_month"], 2);
    assert_eq!(body["streak_data"]["current_streak"], 2);
}

/// Store that is unreachable for every operation
struct UnavailableStore;

#[async_trait]
impl ProgressStore for UnavailableStore {
    async fn load(&self, _user_id: Uuid) -> ProgressResult<Option<ProgressAggregate>> {
        Err(ProgressError::StorageUnavailable("connection refused".into()))
    }

    async fn save(&self, _aggregate: &ProgressAggregate) -> ProgressResult<ProgressAggregate> {
        Err(ProgressError::StorageUnavailable("connection refused".into()))
    }

    async fn health_check(&self) -> ProgressResult<()> {
        Err(ProgressError::StorageUnavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_storage_unavailable_maps_to_503() {
    let app = common::TestApp::with_store(Arc::new(UnavailableStore));
    let (_, token) = app.login();

    let (status, body) = app
        .post_auth("/api/v1/progress", &workout("2025-01-10T07:00:00Z", None), &token)
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(parse(&body)["error"]["code"], "STORAGE_UNAVAILABLE");

    let (status, _) = app.get_auth("/api/v1/progress", &token).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_postgres_store_round_trip() {
    let (app, pool) = common::TestApp::with_database().await;
    let (user_id, token) = app.login();

    let (status, _) = app
        .post_auth("/api/v1/progress", &workout("2025-01-10T07:00:00Z", Some(30.0)), &token)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let version: i64 =
        sqlx::query_scalar("SELECT version FROM progress_documents WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(version, 2);

    let (_, body) = app.get_auth("/api/v1/progress", &token).await;
    assert_eq!(parse(&body)["stats"]["total_workouts"], 1);

    sqlx::query("DELETE FROM progress_documents WHERE user_id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .ok();
}
