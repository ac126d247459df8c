// Failure paths: validation, unreachable services, corrupt local data

use std::sync::Arc;
use std::time::Duration as StdDuration;

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use mealsetu_app_lib::commands::AppState;
use mealsetu_app_lib::db::repositories::local_state_repository::LocalStateRepository;
use mealsetu_app_lib::db::DbPool;
use mealsetu_app_lib::error::AppResult;
use mealsetu_app_lib::models::feed::FeedSource;
use mealsetu_app_lib::models::feedback::{Dimension, FeedbackMode};
use mealsetu_app_lib::models::stats::ImpactStatSlot;
use mealsetu_app_lib::services::api_client::HttpFeedbackApi;
use mealsetu_app_lib::services::local_log_service::LOCAL_LOG_KEY;
use mealsetu_app_lib::ui::{SlotBoard, STAT_PLACEHOLDER};

fn setup(base_url: &str) -> AppResult<(AppState, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db = DbPool::new(temp_dir.path().join("errors.sqlite"))?;
    let api = HttpFeedbackApi::new(base_url, Some(StdDuration::from_secs(2)))?;
    Ok((AppState::with_api(db, Arc::new(api), 10), temp_dir))
}

#[tokio::test]
async fn incomplete_emoji_draft_is_rejected_without_side_effects() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let post = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/feedback");
            then.status(201);
        })
        .await;

    let (state, _temp_dir) = setup(&server.url("/api"))?;
    let session = state.session();
    session.select_rating(Dimension::Quality, 4, "😊")?;
    session.select_rating(Dimension::Quantity, 2, "😞")?;

    let error = state
        .feedback()
        .submit(&session)
        .await
        .expect_err("missing ratings");

    assert!(error.is_validation());
    assert_eq!(error.missing_fields(), vec!["Overall", "Hygiene", "Temperature"]);
    assert_eq!(post.hits_async().await, 0);
    assert!(state.local_log().is_empty()?);
    assert_eq!(session.snapshot()?.ratings.len(), 2);
    Ok(())
}

#[tokio::test]
async fn voice_and_blank_text_never_reach_the_backend() -> AppResult<()> {
    let (state, _temp_dir) = setup("http://127.0.0.1:1/api")?;
    let session = state.session();

    session.set_mode(FeedbackMode::Voice)?;
    let voice = state.feedback().submit(&session).await.expect_err("voice");
    assert!(voice.is_validation());
    assert!(voice.to_string().contains("coming soon"));

    session.set_mode(FeedbackMode::Text)?;
    session.set_text("   ")?;
    let blank = state.feedback().submit(&session).await.expect_err("blank");
    assert!(blank.is_validation());

    assert!(state.local_log().is_empty()?);
    assert_eq!(session.snapshot()?.text, "   ");
    Ok(())
}

#[tokio::test]
async fn feed_falls_back_to_local_log_on_server_error() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let _post = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/feedback");
            then.status(500);
        })
        .await;
    let _feed = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/feedbacks");
            then.status(503);
        })
        .await;

    let (state, _temp_dir) = setup(&server.url("/api"))?;
    let session = state.session();
    session.set_mode(FeedbackMode::Text)?;
    session.set_text("Portions were generous")?;
    state.feedback().submit(&session).await?;

    let view = state.feed().load_recent().await?;

    assert_eq!(view.source, FeedSource::Local);
    assert!(view.visible);
    assert_eq!(view.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn stats_failure_leaves_placeholders_and_feed_still_loads() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let _stats = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats/impact");
            then.status(500);
        })
        .await;
    let _feed = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/feedbacks");
            then.status(200).json_body(json!([
                {"type": "text", "message": "Hot and fresh", "timestamp": "2025-03-01T09:15:00"}
            ]));
        })
        .await;

    let (state, _temp_dir) = setup(&server.url("/api"))?;

    let mut board = SlotBoard::new();
    let applied = state.stats().load_into(&mut board).await;
    assert!(applied.is_empty());
    assert_eq!(board.text(ImpactStatSlot::FoodSaved), Some(STAT_PLACEHOLDER));

    let snapshot = state.page().on_load().await;
    assert!(snapshot.stats.is_none());
    assert_eq!(snapshot.feed.source, FeedSource::Remote);
    assert_eq!(snapshot.feed.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn corrupt_local_log_reads_as_empty() -> AppResult<()> {
    let (state, _temp_dir) = setup("http://127.0.0.1:1/api")?;
    state
        .db()
        .with_connection(|conn| LocalStateRepository::upsert(conn, LOCAL_LOG_KEY, "not json"))?;

    let view = state.feed().load_recent().await?;
    assert_eq!(view.source, FeedSource::Local);
    assert!(!view.visible);

    assert!(state.page().load_meal_reports(10).await.is_none());
    assert!(state.page().load_donation_stats().await.is_none());
    Ok(())
}

#[tokio::test]
async fn stats_survive_an_unreadable_feed() -> AppResult<()> {
    let server = MockServer::start_async().await;
    let _stats = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats/impact");
            then.status(200).json_body(json!({ "foodSaved": "2,450 kg" }));
        })
        .await;
    let _feed = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/feedbacks");
            then.status(503);
        })
        .await;

    let temp_dir = TempDir::new()?;
    let store = temp_dir.path().join("store");
    let db = DbPool::new(store.join("errors.sqlite"))?;
    let api = HttpFeedbackApi::new(&server.url("/api"), Some(StdDuration::from_secs(2)))?;
    let state = AppState::with_api(db, Arc::new(api), 10);
    std::fs::remove_dir_all(&store)?;

    let snapshot = state.page().on_load().await;

    let stats = snapshot.stats.expect("stats loaded");
    assert_eq!(stats.food_saved, Some(json!("2,450 kg")));
    assert!(!snapshot.feed.visible);
    assert!(snapshot.feed.items.is_empty());
    Ok(())
}
