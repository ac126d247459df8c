use serde_json::Value as JsonValue;

use crate::models::stats::ImpactStats;
use crate::services::page_service::{PageSnapshot, MEAL_REPORT_LIMIT};

use super::{AppState, CommandResult};

/// `None` when the stats could not be fetched; the page keeps its
/// placeholder figures.
pub(crate) async fn stats_load_impact_impl(app_state: &AppState) -> CommandResult<Option<ImpactStats>> {
    Ok(app_state.stats().fetch().await)
}

pub(crate) async fn page_load_impl(app_state: &AppState) -> CommandResult<PageSnapshot> {
    Ok(app_state.page().on_load().await)
}

pub(crate) async fn meals_load_impl(
    app_state: &AppState,
    limit: Option<usize>,
) -> CommandResult<Option<JsonValue>> {
    let limit = limit.unwrap_or(MEAL_REPORT_LIMIT);
    Ok(app_state.page().load_meal_reports(limit).await)
}

pub(crate) async fn donations_load_impl(app_state: &AppState) -> CommandResult<Option<JsonValue>> {
    Ok(app_state.page().load_donation_stats().await)
}

#[cfg(feature = "desktop")]
pub mod desktop {
    use tauri::State;

    use super::*;

    #[tauri::command]
    pub async fn stats_load_impact(
        state: State<'_, AppState>,
    ) -> CommandResult<Option<ImpactStats>> {
        stats_load_impact_impl(state.inner()).await
    }

    #[tauri::command]
    pub async fn page_load(state: State<'_, AppState>) -> CommandResult<PageSnapshot> {
        page_load_impl(state.inner()).await
    }

    #[tauri::command]
    pub async fn meals_load(
        state: State<'_, AppState>,
        limit: Option<usize>,
    ) -> CommandResult<Option<JsonValue>> {
        meals_load_impl(state.inner(), limit).await
    }

    #[tauri::command]
    pub async fn donations_load(state: State<'_, AppState>) -> CommandResult<Option<JsonValue>> {
        donations_load_impl(state.inner()).await
    }
}

pub mod testing {
    use super::*;

    /// Internal helper exposed for integration testing of command logic.
    pub async fn stats_load_impact(app_state: &AppState) -> CommandResult<Option<ImpactStats>> {
        stats_load_impact_impl(app_state).await
    }

    /// Internal helper exposed for integration testing of command logic.
    pub async fn page_load(app_state: &AppState) -> CommandResult<PageSnapshot> {
        page_load_impl(app_state).await
    }

    /// Internal helper exposed for integration testing of command logic.
    pub async fn meals_load(
        app_state: &AppState,
        limit: Option<usize>,
    ) -> CommandResult<Option<JsonValue>> {
        meals_load_impl(app_state, limit).await
    }

    /// Internal helper exposed for integration testing of command logic.
    pub async fn donations_load(app_state: &AppState) -> CommandResult<Option<JsonValue>> {
        donations_load_impl(app_state).await
    }
}
