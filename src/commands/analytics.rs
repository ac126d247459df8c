use crate::models::analytics::FeedbackSummary;
use crate::models::chart::ChartSpec;
use crate::services::chart_service::build_charts;

use super::{run_blocking, AppState, CommandResult};

pub(crate) async fn analytics_summary_impl(app_state: &AppState) -> CommandResult<FeedbackSummary> {
    let analytics = app_state.analytics();
    run_blocking(move || analytics.summary()).await
}

/// Chart specifications for the analytics view; drawing is left to the
/// caller's surface.
pub(crate) async fn analytics_charts_build_impl(
    app_state: &AppState,
) -> CommandResult<Vec<ChartSpec>> {
    let summary = analytics_summary_impl(app_state).await?;
    Ok(build_charts(&summary))
}

#[cfg(feature = "desktop")]
pub mod desktop {
    use tauri::State;

    use super::*;

    #[tauri::command]
    pub async fn analytics_summary(state: State<'_, AppState>) -> CommandResult<FeedbackSummary> {
        analytics_summary_impl(state.inner()).await
    }

    #[tauri::command]
    pub async fn analytics_charts_build(
        state: State<'_, AppState>,
    ) -> CommandResult<Vec<ChartSpec>> {
        analytics_charts_build_impl(state.inner()).await
    }
}

pub mod testing {
    use super::*;

    /// Internal helper exposed for integration testing of command logic.
    pub async fn analytics_summary(app_state: &AppState) -> CommandResult<FeedbackSummary> {
        analytics_summary_impl(app_state).await
    }

    /// Internal helper exposed for integration testing of command logic.
    pub async fn analytics_charts_build(app_state: &AppState) -> CommandResult<Vec<ChartSpec>> {
        analytics_charts_build_impl(app_state).await
    }
}
