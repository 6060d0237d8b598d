// SPDX-License-Identifier: MIT

//! Settings and affirmation endpoint tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_settings_created_lazily_with_defaults() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("u1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request("GET", "/api/settings", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let settings = common::body_json(response).await;
    assert_eq!(settings["userId"], "u1");
    assert_eq!(settings["workoutReminderEnabled"], true);
    assert_eq!(settings["workoutReminderTime"], "08:00");
    assert_eq!(settings["affirmationTime"], "07:00");
    assert_eq!(settings["darkMode"], false);
    assert_eq!(settings["isPro"], false);
    assert_eq!(settings["dailyAiQuestions"], 0);
    assert!(settings["lastAiQuestionDate"].is_null());
}

#[tokio::test]
async fn test_partial_settings_update() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("u1", &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "PUT",
            "/api/settings",
            &token,
            Some(json!({ "darkMode": true, "workoutReminderTime": "06:30" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let settings = common::body_json(response).await;
    assert_eq!(settings["darkMode"], true);
    assert_eq!(settings["workoutReminderTime"], "06:30");
    // Untouched fields keep defaults
    assert_eq!(settings["affirmationEnabled"], true);

    // Persisted: a later read returns the same values
    let response = app
        .oneshot(common::authed_request("GET", "/api/settings", &token, None))
        .await
        .unwrap();
    let settings = common::body_json(response).await;
    assert_eq!(settings["darkMode"], true);
}

#[tokio::test]
async fn test_todays_affirmation_recorded_once() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("u1", &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(common::authed_request(
            "GET",
            "/api/affirmations/today",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = common::body_json(response).await;
    let affirmation = first["affirmation"].as_str().unwrap().to_string();
    assert!(!affirmation.is_empty());

    // Same affirmation on a second call, no duplicate history entry
    let response = app
        .clone()
        .oneshot(common::authed_request(
            "GET",
            "/api/affirmations/today",
            &token,
            None,
        ))
        .await
        .unwrap();
    let second = common::body_json(response).await;
    assert_eq!(second["affirmation"], affirmation);

    let response = app
        .oneshot(common::authed_request(
            "GET",
            "/api/affirmations/history",
            &token,
            None,
        ))
        .await
        .unwrap();
    let history = common::body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["affirmation"], affirmation);
}
