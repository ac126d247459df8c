pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

use crate::commands::AppState;
use crate::config::AppConfig;
use crate::db::DbPool;

#[cfg_attr(all(feature = "desktop", mobile), tauri::mobile_entry_point)]
pub fn run() {
    if let Err(error) = try_run() {
        eprintln!("failed to launch application: {error}");
    }
}

fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    crate::utils::logger::init_logging(&config.log_dir(), &config.log_directives)?;
    std::fs::create_dir_all(&config.data_dir)?;
    let pool = DbPool::new(config.database_path())?;
    Ok(AppState::new(pool, config)?)
}

#[cfg(feature = "desktop")]
fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    use tauri::Manager;

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let mut config = AppConfig::load()?;
            config.data_dir = app.handle().path().app_data_dir()?;

            let state = build_state(&config)?;
            app.manage(state);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            crate::commands::feedback::desktop::feedback_draft_get,
            crate::commands::feedback::desktop::feedback_set_mode,
            crate::commands::feedback::desktop::feedback_select_rating,
            crate::commands::feedback::desktop::feedback_clear_rating,
            crate::commands::feedback::desktop::feedback_set_text,
            crate::commands::feedback::desktop::feedback_submit,
            crate::commands::feedback::desktop::local_log_clear,
            crate::commands::feed::desktop::feed_load_recent,
            crate::commands::analytics::desktop::analytics_summary,
            crate::commands::analytics::desktop::analytics_charts_build,
            crate::commands::stats::desktop::stats_load_impact,
            crate::commands::stats::desktop::page_load,
            crate::commands::stats::desktop::meals_load,
            crate::commands::stats::desktop::donations_load,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let state = build_state(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(headless::page_load(&state))?;

    Ok(())
}

/// Terminal rendition of the page: one load, printed once.
#[cfg(not(feature = "desktop"))]
mod headless {
    use tracing::info;

    use crate::commands::AppState;
    use crate::error::AppResult;
    use crate::models::feed::FeedSource;
    use crate::services::chart_service::render_charts;
    use crate::services::impact_stats_service::apply_stats;
    use crate::services::page_service::MEAL_REPORT_LIMIT;
    use crate::ui::{MountRegistry, SlotBoard};

    pub(crate) async fn page_load(state: &AppState) -> AppResult<()> {
        let page = state.page();
        let (snapshot, _meals, _donations) = tokio::join!(
            page.on_load(),
            page.load_meal_reports(MEAL_REPORT_LIMIT),
            page.load_donation_stats()
        );

        let mut board = SlotBoard::new();
        if let Some(stats) = &snapshot.stats {
            apply_stats(&mut board, stats);
        }
        println!("Impact");
        for (slot, text) in board.entries() {
            println!("  {slot}: {text}");
        }

        let source = match snapshot.feed.source {
            FeedSource::Remote => "remote",
            FeedSource::Local => "local",
        };
        println!("Recent feedback ({source})");
        if !snapshot.feed.visible {
            println!("  (none)");
        }
        for item in &snapshot.feed.items {
            for line in item.display_lines() {
                println!("  {line}");
            }
            println!();
        }

        let analytics = state.analytics();
        let summary = tokio::task::spawn_blocking(move || analytics.summary())
            .await
            .map_err(|err| crate::error::AppError::other(format!("analytics task failed: {err}")))??;
        let mut registry = MountRegistry::analytics_view();
        let drawn = render_charts(&mut registry, &summary);
        info!(target: "app::charts", charts = drawn.len(), "analytics charts rendered");

        println!("Average scores");
        for (dimension, average) in crate::models::feedback::Dimension::ALL
            .iter()
            .zip(summary.averages())
        {
            println!("  {}: {average:.1}", dimension.label());
        }

        Ok(())
    }
}
