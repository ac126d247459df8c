use rusqlite;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("remote service error: {message}")]
    Transport { message: String, status: Option<u16> },

    #[error("{message}")]
    Conflict { message: String },

    #[error("database error: {message}")]
    Database { message: String },

    #[error("record not found")]
    NotFound,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn transport(message: impl Into<String>, status: Option<u16>) -> Self {
        let message = message.into();
        warn!(target: "app::api", %message, status = ?status, "transport error");
        AppError::Transport { message, status }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::conflict", %message, "conflict error");
        AppError::Conflict { message }
    }

    pub fn not_found() -> Self {
        warn!(target: "app::db", "resource not found");
        AppError::NotFound
    }

    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::db", %message, "database error");
        AppError::Database { message }
    }

    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::config", %message, "configuration error");
        AppError::Config(message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport { .. })
    }

    /// Field labels listed under `details.missing` of a validation error.
    pub fn missing_fields(&self) -> Vec<String> {
        match self {
            AppError::Validation {
                details: Some(details),
                ..
            } => details
                .get("missing")
                .and_then(|value| value.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn transport_status(&self) -> Option<u16> {
        match self {
            AppError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::QueryReturnedNoRows;

        match &error {
            QueryReturnedNoRows => AppError::not_found(),
            _ => {
                error!(target: "app::db", error = ?error, "sqlite error");
                AppError::database(error.to_string())
            }
        }
    }
}
