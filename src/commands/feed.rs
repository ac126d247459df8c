use tracing::debug;

use crate::models::feed::FeedView;

use super::{AppState, CommandError, CommandResult};

pub(crate) async fn feed_load_recent_impl(app_state: &AppState) -> CommandResult<FeedView> {
    let view = app_state
        .feed()
        .load_recent()
        .await
        .map_err(CommandError::from)?;
    debug!(
        target: "app::command",
        source = ?view.source,
        items = view.items.len(),
        "feed_load_recent completed"
    );
    Ok(view)
}

#[cfg(feature = "desktop")]
pub mod desktop {
    use tauri::State;

    use super::*;

    #[tauri::command]
    pub async fn feed_load_recent(state: State<'_, AppState>) -> CommandResult<FeedView> {
        feed_load_recent_impl(state.inner()).await
    }
}

pub mod testing {
    use super::*;

    /// Internal helper exposed for integration testing of command logic.
    pub async fn feed_load_recent(app_state: &AppState) -> CommandResult<FeedView> {
        feed_load_recent_impl(app_state).await
    }
}
