// End-to-end submission against a mocked backend

use std::sync::Arc;
use std::time::Duration as StdDuration;

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use mealsetu_app_lib::commands::AppState;
use mealsetu_app_lib::db::DbPool;
use mealsetu_app_lib::error::{AppError, AppResult};
use mealsetu_app_lib::models::feed::{FeedItem, FeedSource};
use mealsetu_app_lib::models::feedback::{Dimension, FeedbackMode};
use mealsetu_app_lib::services::api_client::HttpFeedbackApi;
use mealsetu_app_lib::services::feedback_service::Delivery;

fn setup(base_url: &str) -> AppResult<(AppState, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db = DbPool::new(temp_dir.path().join("flow.sqlite"))?;
    let api = HttpFeedbackApi::new(base_url, Some(StdDuration::from_secs(2)))?;
    Ok((AppState::with_api(db, Arc::new(api), 10), temp_dir))
}

fn rate_everything(state: &AppState) -> AppResult<()> {
    let session = state.session();
    for (dimension, (rating, emoji)) in Dimension::ALL
        .into_iter()
        .zip([(5, "😍"), (4, "😊"), (5, "😍"), (3, "😐"), (4, "😊")])
    {
        session.select_rating(dimension, rating, emoji)?;
    }
    Ok(())
}

#[tokio::test]
async fn emoji_submission_reaches_backend_and_refreshes_feed() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let post = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/feedback")
                .json_body_partial(
                    r#"{"type": "emoji", "overall_rating": 5, "quantity_emoji": "😐", "average_rating": 4.2}"#,
                );
            then.status(201)
                .json_body(json!({"success": true, "message": "Feedback submitted successfully"}));
        })
        .await;
    let feed = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/feedbacks");
            then.status(200).json_body(json!([{
                "id": 1,
                "type": "emoji",
                "timestamp": "2025-03-01T12:30:00",
                "overall_rating": 5, "overall_emoji": "😍",
                "quality_rating": 4, "quality_emoji": "😊",
                "hygiene_rating": 5, "hygiene_emoji": "😍",
                "quantity_rating": 3, "quantity_emoji": "😐",
                "temperature_rating": 4, "temperature_emoji": "😊",
                "average_rating": 4.2,
                "message": null
            }]));
        })
        .await;

    let (state, _temp_dir) = setup(&server.url("/api"))?;
    rate_everything(&state)?;

    let receipt = state.feedback().submit(&state.session()).await?;

    post.assert_async().await;
    feed.assert_async().await;
    assert_eq!(receipt.delivery, Delivery::Remote);
    assert_eq!(receipt.feed.source, FeedSource::Remote);
    assert!(receipt.feed.visible);
    let FeedItem::Emoji { average, timestamp, .. } = &receipt.feed.items[0] else {
        panic!("expected emoji item");
    };
    assert_eq!(average, "4.2");
    assert_eq!(timestamp, "2025-03-01 12:30");

    assert!(state.local_log().is_empty()?);
    assert!(state.session().snapshot()?.ratings.is_empty());
    Ok(())
}

#[tokio::test]
async fn server_error_falls_back_to_local_log() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let _post = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/feedback");
            then.status(503);
        })
        .await;

    let (state, _temp_dir) = setup(&server.url("/api"))?;
    let session = state.session();
    session.set_mode(FeedbackMode::Text)?;
    session.set_text("  good food  ")?;

    let receipt = state.feedback().submit(&session).await?;

    assert_eq!(receipt.delivery, Delivery::LocalFallback);
    assert_eq!(receipt.feed.source, FeedSource::Local);
    let entries = state.local_log().load()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message.as_deref(), Some("good food"));
    assert!(session.snapshot()?.text.is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_caps_local_log_at_fifty() -> AppResult<()> {
    // Nothing listens on port 1.
    let (state, _temp_dir) = setup("http://127.0.0.1:1/api")?;
    let session = state.session();
    session.set_mode(FeedbackMode::Text)?;

    for n in 0..51 {
        session.set_text(format!("meal {n}"))?;
        let receipt = state.feedback().submit(&session).await?;
        assert_eq!(receipt.delivery, Delivery::LocalFallback);
        assert!(receipt.feed.items.len() <= 10);
    }

    let entries = state.local_log().load()?;
    assert_eq!(entries.len(), 50);
    assert_eq!(entries[0].message.as_deref(), Some("meal 50"));
    assert_eq!(entries[49].message.as_deref(), Some("meal 1"));
    Ok(())
}

#[tokio::test]
async fn concurrent_submit_on_one_session_is_rejected() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let post = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/feedback");
            then.status(201)
                .delay(StdDuration::from_millis(300))
                .json_body(json!({"success": true}));
        })
        .await;
    let _feed = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/feedbacks");
            then.status(200).json_body(json!([]));
        })
        .await;

    let (state, _temp_dir) = setup(&server.url("/api"))?;
    rate_everything(&state)?;
    let session = state.session();
    let service = state.feedback();

    let (first, second) = futures::join!(service.submit(&session), service.submit(&session));

    let receipt = first?;
    assert_eq!(receipt.delivery, Delivery::Remote);
    assert!(!receipt.feed.visible);
    assert!(matches!(second, Err(AppError::Conflict { .. })));
    assert_eq!(post.hits_async().await, 1);
    assert!(!session.is_submitting());
    Ok(())
}

#[tokio::test]
async fn switching_mode_keeps_entered_ratings() -> AppResult<()> {
    let (state, _temp_dir) = setup("http://127.0.0.1:1/api")?;
    let session = state.session();
    session.select_rating(Dimension::Overall, 4, "😊")?;
    session.set_mode(FeedbackMode::Text)?;
    session.set_mode(FeedbackMode::Emoji)?;

    let draft = session.snapshot()?;
    assert_eq!(draft.mode, FeedbackMode::Emoji);
    assert_eq!(draft.rating(Dimension::Overall).map(|r| r.rating), Some(4));
    Ok(())
}
