// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Insights adapter tests against a local fake completion service.

use axum::http::StatusCode;
use carbon_cal::error::AdapterError;
use carbon_cal::models::{ActivityDescription, DayEntryView, InsightsRequest};
use carbon_cal::services::{CompletionClient, InsightsAdapter};
use serde_json::json;

mod common;
use common::{completion_config, completion_envelope, spawn_fake_completion};

fn adapter(base_url: &str) -> InsightsAdapter {
    InsightsAdapter::new(CompletionClient::new(&completion_config(base_url)).unwrap())
}

fn day_request(entries: Vec<DayEntryView>) -> InsightsRequest {
    InsightsRequest::Day {
        date: "2024-01-15".parse().unwrap(),
        goal: 5000.0,
        entries,
    }
}

#[tokio::test]
async fn test_day_mode_without_entries_skips_network() {
    let fake = spawn_fake_completion(StatusCode::OK, completion_envelope(json!("{}"))).await;

    let err = adapter(&fake.base_url)
        .analyze(&day_request(vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Validation(_)));
    assert_eq!(fake.hits(), 0);
}

#[tokio::test]
async fn test_day_mode_sends_day_as_json() {
    let content = json!({
        "headline": "Transport led your day",
        "summary": "Most of today's footprint came from one drive.",
        "top_insights": ["The drive was 80% of the total"],
        "suggested_actions": ["Try the bus tomorrow"]
    });
    let fake = spawn_fake_completion(StatusCode::OK, completion_envelope(content)).await;

    let result = adapter(&fake.base_url)
        .analyze(&day_request(vec![DayEntryView {
            label: "Drive to work".to_string(),
            category: "transport".to_string(),
            amount: 4000.0,
            notes: String::new(),
        }]))
        .await
        .unwrap();

    assert_eq!(result.headline.as_deref(), Some("Transport led your day"));
    assert_eq!(result.suggested_actions.unwrap().len(), 1);

    let (_, request) = fake.last_request().unwrap();
    let user: serde_json::Value =
        serde_json::from_str(request["messages"][1]["content"].as_str().unwrap()).unwrap();
    assert_eq!(user["date"], "2024-01-15");
    assert_eq!(user["entries"][0]["label"], "Drive to work");
}

#[tokio::test]
async fn test_wrong_typed_fields_are_omitted() {
    let content = json!({
        "headline": ["not", "a", "string"],
        "summary": "A quiet day.",
        "top_insights": "not a list"
    });
    let fake = spawn_fake_completion(StatusCode::OK, completion_envelope(content)).await;

    let result = adapter(&fake.base_url)
        .analyze(&InsightsRequest::Single(ActivityDescription::new(
            "cycled to the shop",
        )))
        .await
        .unwrap();

    assert_eq!(result.headline, None);
    assert_eq!(result.summary.as_deref(), Some("A quiet day."));
    assert_eq!(result.top_insights, None);
    assert_eq!(result.suggested_actions, None);
}

#[tokio::test]
async fn test_unparseable_payload_is_malformed() {
    let fake = spawn_fake_completion(
        StatusCode::OK,
        completion_envelope(json!("Here are some thoughts...")),
    )
    .await;

    let err = adapter(&fake.base_url)
        .analyze(&InsightsRequest::Single(ActivityDescription::new(
            "cycled to the shop",
        )))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_upstream_failure() {
    let fake = spawn_fake_completion(StatusCode::BAD_GATEWAY, "upstream down".to_string()).await;

    let err = adapter(&fake.base_url)
        .analyze(&InsightsRequest::Single(ActivityDescription::new(
            "cycled to the shop",
        )))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::Upstream {
            status: Some(502),
            ..
        }
    ));
}
