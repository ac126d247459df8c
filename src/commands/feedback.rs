use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::feedback::{Dimension, FeedbackDraft, FeedbackMode};
use crate::services::feedback_service::SubmissionReceipt;

use super::{run_blocking, AppState, CommandError, CommandResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSelection {
    pub dimension: String,
    pub rating: u8,
    pub emoji: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalLogClearResult {
    pub removed: usize,
}

fn parse_mode(mode: &str) -> CommandResult<FeedbackMode> {
    mode.parse::<FeedbackMode>()
        .map_err(|message| CommandError::from(AppError::validation(message)))
}

fn parse_dimension(dimension: &str) -> CommandResult<Dimension> {
    dimension
        .parse::<Dimension>()
        .map_err(|message| CommandError::from(AppError::validation(message)))
}

pub(crate) fn feedback_draft_get_impl(app_state: &AppState) -> CommandResult<FeedbackDraft> {
    app_state.session().snapshot().map_err(CommandError::from)
}

pub(crate) fn feedback_set_mode_impl(
    app_state: &AppState,
    mode: &str,
) -> CommandResult<FeedbackDraft> {
    let mode = parse_mode(mode)?;
    debug!(target: "app::command", %mode, "feedback_set_mode invoked");
    app_state.session().set_mode(mode).map_err(CommandError::from)
}

pub(crate) fn feedback_select_rating_impl(
    app_state: &AppState,
    selection: RatingSelection,
) -> CommandResult<FeedbackDraft> {
    let dimension = parse_dimension(&selection.dimension)?;
    debug!(
        target: "app::command",
        %dimension,
        rating = selection.rating,
        "feedback_select_rating invoked"
    );
    app_state
        .session()
        .select_rating(dimension, selection.rating, selection.emoji)
        .map_err(CommandError::from)
}

pub(crate) fn feedback_clear_rating_impl(
    app_state: &AppState,
    dimension: &str,
) -> CommandResult<FeedbackDraft> {
    let dimension = parse_dimension(dimension)?;
    debug!(target: "app::command", %dimension, "feedback_clear_rating invoked");
    app_state
        .session()
        .clear_rating(dimension)
        .map_err(CommandError::from)
}

pub(crate) fn feedback_set_text_impl(
    app_state: &AppState,
    text: String,
) -> CommandResult<FeedbackDraft> {
    app_state.session().set_text(text).map_err(CommandError::from)
}

pub(crate) async fn feedback_submit_impl(app_state: &AppState) -> CommandResult<SubmissionReceipt> {
    let session = app_state.session();
    match app_state.feedback().submit(&session).await {
        Ok(receipt) => {
            info!(
                target: "app::command",
                delivery = ?receipt.delivery,
                "feedback_submit accepted"
            );
            Ok(receipt)
        }
        Err(error) => {
            warn!(target: "app::command", error = %error, "feedback_submit rejected");
            Err(CommandError::from(error))
        }
    }
}

pub(crate) async fn local_log_clear_impl(app_state: &AppState) -> CommandResult<LocalLogClearResult> {
    let local_log = app_state.local_log();
    let removed = run_blocking(move || local_log.clear()).await?;
    Ok(LocalLogClearResult { removed })
}

#[cfg(feature = "desktop")]
pub mod desktop {
    use tauri::State;

    use super::*;

    #[tauri::command]
    pub fn feedback_draft_get(state: State<'_, AppState>) -> CommandResult<FeedbackDraft> {
        feedback_draft_get_impl(state.inner())
    }

    #[tauri::command]
    pub fn feedback_set_mode(
        state: State<'_, AppState>,
        mode: String,
    ) -> CommandResult<FeedbackDraft> {
        feedback_set_mode_impl(state.inner(), &mode)
    }

    #[tauri::command]
    pub fn feedback_select_rating(
        state: State<'_, AppState>,
        selection: RatingSelection,
    ) -> CommandResult<FeedbackDraft> {
        feedback_select_rating_impl(state.inner(), selection)
    }

    #[tauri::command]
    pub fn feedback_clear_rating(
        state: State<'_, AppState>,
        dimension: String,
    ) -> CommandResult<FeedbackDraft> {
        feedback_clear_rating_impl(state.inner(), &dimension)
    }

    #[tauri::command]
    pub fn feedback_set_text(
        state: State<'_, AppState>,
        text: String,
    ) -> CommandResult<FeedbackDraft> {
        feedback_set_text_impl(state.inner(), text)
    }

    #[tauri::command]
    pub async fn feedback_submit(state: State<'_, AppState>) -> CommandResult<SubmissionReceipt> {
        feedback_submit_impl(state.inner()).await
    }

    #[tauri::command]
    pub async fn local_log_clear(state: State<'_, AppState>) -> CommandResult<LocalLogClearResult> {
        local_log_clear_impl(state.inner()).await
    }
}

pub mod testing {
    use super::*;

    pub use super::{LocalLogClearResult, RatingSelection};

    /// Internal helper exposed for integration testing of command logic.
    pub fn feedback_draft_get(app_state: &AppState) -> CommandResult<FeedbackDraft> {
        feedback_draft_get_impl(app_state)
    }

    /// Internal helper exposed for integration testing of command logic.
    pub fn feedback_set_mode(app_state: &AppState, mode: &str) -> CommandResult<FeedbackDraft> {
        feedback_set_mode_impl(app_state, mode)
    }

    /// Internal helper exposed for integration testing of command logic.
    pub fn feedback_select_rating(
        app_state: &AppState,
        selection: RatingSelection,
    ) -> CommandResult<FeedbackDraft> {
        feedback_select_rating_impl(app_state, selection)
    }

    /// Internal helper exposed for integration testing of command logic.
    pub fn feedback_clear_rating(
        app_state: &AppState,
        dimension: &str,
    ) -> CommandResult<FeedbackDraft> {
        feedback_clear_rating_impl(app_state, dimension)
    }

    /// Internal helper exposed for integration testing of command logic.
    pub fn feedback_set_text(app_state: &AppState, text: &str) -> CommandResult<FeedbackDraft> {
        feedback_set_text_impl(app_state, text.to_string())
    }

    /// Internal helper exposed for integration testing of command logic.
    pub async fn feedback_submit(app_state: &AppState) -> CommandResult<SubmissionReceipt> {
        feedback_submit_impl(app_state).await
    }

    /// Internal helper exposed for integration testing of command logic.
    pub async fn local_log_clear(app_state: &AppState) -> CommandResult<LocalLogClearResult> {
        local_log_clear_impl(app_state).await
    }
}
