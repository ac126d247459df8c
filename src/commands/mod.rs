pub mod analytics;
pub mod feed;
pub mod feedback;
pub mod stats;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::analytics_service::AnalyticsService;
use crate::services::api_client::{FeedbackApi, HttpFeedbackApi};
use crate::services::feed_service::FeedService;
use crate::services::feedback_service::{FeedbackService, FeedbackSession};
use crate::services::impact_stats_service::ImpactStatsService;
use crate::services::local_log_service::LocalFeedbackLog;
use crate::services::page_service::PageService;

#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    local_log: Arc<LocalFeedbackLog>,
    session: Arc<FeedbackSession>,
    feedback_service: Arc<FeedbackService>,
    feed_service: Arc<FeedService>,
    analytics_service: Arc<AnalyticsService>,
    stats_service: Arc<ImpactStatsService>,
    page_service: Arc<PageService>,
}

impl AppState {
    pub fn new(db_pool: DbPool, config: &AppConfig) -> AppResult<Self> {
        let api: Arc<dyn FeedbackApi> = Arc::new(HttpFeedbackApi::new(
            &config.api_base_url,
            config.http_timeout,
        )?);
        info!(
            target: "app::config",
            api_base_url = %config.api_base_url,
            feed_limit = config.feed_limit,
            "application state configured"
        );
        Ok(Self::with_api(db_pool, api, config.feed_limit))
    }

    /// Wires every service around an arbitrary remote client.
    pub fn with_api(db_pool: DbPool, api: Arc<dyn FeedbackApi>, feed_limit: usize) -> Self {
        let local_log = Arc::new(LocalFeedbackLog::new(db_pool.clone()));
        let feed_service = Arc::new(FeedService::new(
            Arc::clone(&api),
            Arc::clone(&local_log),
            feed_limit,
        ));
        let feedback_service = Arc::new(FeedbackService::new(
            Arc::clone(&api),
            Arc::clone(&local_log),
            Arc::clone(&feed_service),
        ));
        let analytics_service = Arc::new(AnalyticsService::new(Arc::clone(&local_log)));
        let stats_service = Arc::new(ImpactStatsService::new(Arc::clone(&api)));
        let page_service = Arc::new(PageService::new(
            api,
            Arc::clone(&feed_service),
            Arc::clone(&stats_service),
        ));

        Self {
            db_pool,
            local_log,
            session: Arc::new(FeedbackSession::new()),
            feedback_service,
            feed_service,
            analytics_service,
            stats_service,
            page_service,
        }
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }

    pub fn local_log(&self) -> Arc<LocalFeedbackLog> {
        Arc::clone(&self.local_log)
    }

    pub fn session(&self) -> Arc<FeedbackSession> {
        Arc::clone(&self.session)
    }

    pub fn feedback(&self) -> Arc<FeedbackService> {
        Arc::clone(&self.feedback_service)
    }

    pub fn feed(&self) -> Arc<FeedService> {
        Arc::clone(&self.feed_service)
    }

    pub fn analytics(&self) -> Arc<AnalyticsService> {
        Arc::clone(&self.analytics_service)
    }

    pub fn stats(&self) -> Arc<ImpactStatsService> {
        Arc::clone(&self.stats_service)
    }

    pub fn page(&self) -> Arc<PageService> {
        Arc::clone(&self.page_service)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation { message, details } => {
                CommandError::new("VALIDATION_ERROR", message, details)
            }
            AppError::Transport { message, status } => {
                warn!(target: "app::command", %message, ?status, "remote service error in command");
                let details = status.map(|status| serde_json::json!({ "status": status }));
                CommandError::new("TRANSPORT_ERROR", message, details)
            }
            AppError::Conflict { message } => {
                CommandError::new("SUBMISSION_IN_FLIGHT", message, None)
            }
            AppError::NotFound => CommandError::new("NOT_FOUND", "Requested record not found", None),
            AppError::Config(message) => {
                error!(target: "app::command", %message, "configuration error in command");
                CommandError::new("CONFIG_ERROR", message, None)
            }
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "Failed to encode or decode data", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "File system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

/// Runs synchronous storage work off the async executor.
pub(crate) async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("background task failed: {err}"), None))?
        .map_err(CommandError::from)
}
