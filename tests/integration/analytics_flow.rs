// Aggregation and chart building over the local feedback log

use std::sync::Arc;

use tempfile::TempDir;

use mealsetu_app_lib::commands::AppState;
use mealsetu_app_lib::db::DbPool;
use mealsetu_app_lib::error::AppResult;
use mealsetu_app_lib::models::chart::ChartSpec;
use mealsetu_app_lib::models::feedback::{Dimension, FeedbackMode};
use mealsetu_app_lib::services::api_client::HttpFeedbackApi;
use mealsetu_app_lib::services::chart_service::{render_charts, COMPARATIVE_MOUNT};
use mealsetu_app_lib::ui::MountRegistry;

fn offline_state() -> AppResult<(AppState, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db = DbPool::new(temp_dir.path().join("analytics.sqlite"))?;
    let api = HttpFeedbackApi::new("http://127.0.0.1:1/api", None)?;
    Ok((AppState::with_api(db, Arc::new(api), 10), temp_dir))
}

async fn submit_overall(state: &AppState, overall: u8) -> AppResult<()> {
    let session = state.session();
    session.set_mode(FeedbackMode::Emoji)?;
    for dimension in Dimension::ALL {
        let rating = if dimension == Dimension::Overall { overall } else { 4 };
        session.select_rating(dimension, rating, "😊")?;
    }
    state.feedback().submit(&session).await?;
    Ok(())
}

#[tokio::test]
async fn charts_reflect_locally_stored_feedback() -> AppResult<()> {
    let (state, _temp_dir) = offline_state()?;
    for overall in [5, 5, 4, 3, 1] {
        submit_overall(&state, overall).await?;
    }

    // Text entries never reach the histograms.
    let session = state.session();
    session.set_mode(FeedbackMode::Text)?;
    session.set_text("Dal was great")?;
    state.feedback().submit(&session).await?;

    let summary = state.analytics().summary()?;
    assert_eq!(summary.overall.counts(), [2, 1, 1, 0, 1]);
    assert!((summary.overall.weighted_average() - 3.6).abs() < 1e-12);
    assert_eq!(summary.quality.counts(), [0, 5, 0, 0, 0]);
    assert_eq!(summary.quality.weighted_average(), 4.0);

    let mut registry = MountRegistry::analytics_view();
    let drawn = render_charts(&mut registry, &summary);
    assert_eq!(drawn.len(), 7);

    let Some(ChartSpec::Bar(overall)) = registry.chart("overallChart") else {
        panic!("overall bar chart missing");
    };
    assert_eq!(overall.dataset.data, vec![2.0, 1.0, 1.0, 0.0, 1.0]);

    let Some(ChartSpec::Radar(radar)) = registry.chart(COMPARATIVE_MOUNT) else {
        panic!("radar chart missing");
    };
    assert_eq!(radar.dataset.data.len(), 5);
    assert_eq!(radar.dataset.data[1], 4.0);
    Ok(())
}

#[tokio::test]
async fn empty_log_yields_zeroed_charts() -> AppResult<()> {
    let (state, _temp_dir) = offline_state()?;

    let summary = state.analytics().summary()?;
    assert_eq!(summary.averages(), [0.0; 5]);

    let mut registry = MountRegistry::new(["hygieneChart", "weeklyTrendChart"]);
    let drawn = render_charts(&mut registry, &summary);
    assert_eq!(drawn, vec!["hygieneChart", "weeklyTrendChart"]);

    let Some(ChartSpec::Line(trend)) = registry.chart("weeklyTrendChart") else {
        panic!("trend chart missing");
    };
    assert_eq!(trend.datasets[0].data[0], 4.2);
    Ok(())
}
