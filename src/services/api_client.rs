use std::time::{Duration as StdDuration, Instant};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::feedback::{FeedbackEntry, FeedbackRecord};
use crate::models::stats::ImpactStats;

/// Remote feedback service contract. Every failure is reported as
/// `AppError::Transport` so callers can apply their fallback rule.
#[async_trait::async_trait]
pub trait FeedbackApi: Send + Sync {
    async fn submit_feedback(&self, record: &FeedbackRecord) -> AppResult<()>;

    async fn recent_feedbacks(&self, limit: usize) -> AppResult<Vec<FeedbackEntry>>;

    async fn impact_stats(&self) -> AppResult<ImpactStats>;

    async fn recent_meals(&self, limit: usize) -> AppResult<JsonValue>;

    async fn donation_stats(&self) -> AppResult<JsonValue>;
}

pub struct HttpFeedbackApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeedbackApi {
    pub fn new(base_url: &str, timeout: Option<StdDuration>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| AppError::other(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = self.url(path);
        debug!(
            target: "app::api",
            correlation_id = %correlation_id,
            method = "GET",
            %url,
            "sending request"
        );

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis();
        if !status.is_success() {
            return Err(map_http_error(status, &correlation_id));
        }

        debug!(
            target: "app::api",
            correlation_id = %correlation_id,
            status = status.as_u16(),
            latency_ms,
            "response received"
        );

        response.json::<T>().await.map_err(|err| {
            AppError::transport(
                format!("invalid response from {path}: {err}"),
                Some(status.as_u16()),
            )
        })
    }
}

#[async_trait::async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn submit_feedback(&self, record: &FeedbackRecord) -> AppResult<()> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = self.url("/feedback");
        debug!(
            target: "app::api",
            correlation_id = %correlation_id,
            method = "POST",
            %url,
            kind = %record.mode(),
            "sending request"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|err| error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_http_error(status, &correlation_id));
        }

        debug!(
            target: "app::api",
            correlation_id = %correlation_id,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "feedback acknowledged"
        );
        Ok(())
    }

    async fn recent_feedbacks(&self, limit: usize) -> AppResult<Vec<FeedbackEntry>> {
        let raw: Vec<JsonValue> = self
            .get_json("/feedbacks", &[("limit", limit.to_string())])
            .await?;
        Ok(decode_entries(raw))
    }

    async fn impact_stats(&self) -> AppResult<ImpactStats> {
        self.get_json("/stats/impact", &[]).await
    }

    async fn recent_meals(&self, limit: usize) -> AppResult<JsonValue> {
        self.get_json("/meals", &[("limit", limit.to_string())]).await
    }

    async fn donation_stats(&self) -> AppResult<JsonValue> {
        self.get_json("/donations/stats", &[]).await
    }
}

/// Decodes each element on its own so one malformed object does not sink
/// the whole list.
pub fn decode_entries(raw: Vec<JsonValue>) -> Vec<FeedbackEntry> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<FeedbackEntry>(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(target: "app::api", error = %err, "skipping undecodable feedback entry");
                None
            }
        })
        .collect()
}

pub fn map_http_error(status: StatusCode, correlation_id: &str) -> AppError {
    warn!(
        target: "app::api",
        correlation_id = %correlation_id,
        status = status.as_u16(),
        "remote service returned non-success status"
    );

    let message = match status {
        StatusCode::BAD_REQUEST => "request rejected by the feedback service".to_string(),
        StatusCode::NOT_FOUND => "feedback service endpoint not found".to_string(),
        StatusCode::TOO_MANY_REQUESTS => "feedback service is rate limiting".to_string(),
        status if status.is_server_error() => format!(
            "feedback service unavailable (status {})",
            status.as_u16()
        ),
        status => format!("feedback service returned status {}", status.as_u16()),
    };

    AppError::transport(message, Some(status.as_u16()))
}

fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
    warn!(
        target: "app::api",
        correlation_id = %correlation_id,
        timeout = err.is_timeout(),
        connect = err.is_connect(),
        "request failed"
    );

    if err.is_timeout() {
        AppError::transport("feedback service request timed out", None)
    } else if err.is_connect() {
        AppError::transport("could not connect to the feedback service", None)
    } else if let Some(status) = err.status() {
        map_http_error(status, correlation_id)
    } else {
        AppError::transport(format!("feedback service request failed: {err}"), None)
    }
}
