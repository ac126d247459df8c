use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::db::repositories::local_state_repository::LocalStateRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::feedback::{FeedbackEntry, FeedbackRecord};
use crate::services::api_client::decode_entries;

pub const LOCAL_LOG_KEY: &str = "mealsetu_feedbacks";
pub const LOCAL_LOG_CAPACITY: usize = 50;

/// Newest-first feedback log kept on disk for when the backend is
/// unreachable.
#[derive(Debug, Clone)]
pub struct LocalFeedbackLog {
    db: DbPool,
    key: String,
    capacity: usize,
}

impl LocalFeedbackLog {
    pub fn new(db: DbPool) -> Self {
        Self::with_capacity(db, LOCAL_LOG_CAPACITY)
    }

    pub fn with_capacity(db: DbPool, capacity: usize) -> Self {
        Self {
            db,
            key: LOCAL_LOG_KEY.to_string(),
            capacity,
        }
    }

    pub fn load(&self) -> AppResult<Vec<FeedbackEntry>> {
        self.db
            .with_connection(|conn| read_entries(conn, &self.key))
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Inserts `record` at the front and evicts from the tail past capacity.
    /// Load and store share one write transaction.
    pub fn prepend(&self, record: &FeedbackRecord) -> AppResult<Vec<FeedbackEntry>> {
        let entries = self.db.with_transaction(|conn| {
            let mut entries = read_entries(conn, &self.key)?;
            entries.insert(0, FeedbackEntry::from(record));

            if entries.len() > self.capacity {
                let evicted = entries.len() - self.capacity;
                entries.truncate(self.capacity);
                debug!(target: "app::feedback::local", evicted, "evicted oldest local feedback");
            }

            let serialized = serde_json::to_string(&entries)?;
            LocalStateRepository::upsert(conn, &self.key, &serialized)?;
            Ok(entries)
        })?;

        info!(
            target: "app::feedback::local",
            kind = %record.mode(),
            stored = entries.len(),
            "feedback saved to local log"
        );

        Ok(entries)
    }

    /// `load` on the blocking thread pool, for async callers.
    pub async fn load_async(&self) -> AppResult<Vec<FeedbackEntry>> {
        let log = self.clone();
        off_executor(move || log.load()).await
    }

    /// `prepend` on the blocking thread pool, for async callers.
    pub async fn prepend_async(&self, record: FeedbackRecord) -> AppResult<Vec<FeedbackEntry>> {
        let log = self.clone();
        off_executor(move || log.prepend(&record)).await
    }

    /// Removes the whole log and returns how many entries it held.
    pub fn clear(&self) -> AppResult<usize> {
        let removed = self.db.with_transaction(|conn| {
            let count = read_entries(conn, &self.key)?.len();
            LocalStateRepository::delete(conn, &self.key)?;
            Ok(count)
        })?;

        info!(target: "app::feedback::local", removed, "local feedback log cleared");
        Ok(removed)
    }
}

async fn off_executor<T: Send + 'static>(
    task: impl FnOnce() -> AppResult<T> + Send + 'static,
) -> AppResult<T> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| AppError::other(format!("background task failed: {err}")))?
}

fn read_entries(conn: &rusqlite::Connection, key: &str) -> AppResult<Vec<FeedbackEntry>> {
    let Some(row) = LocalStateRepository::get(conn, key)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<JsonValue>(&row.value) {
        Ok(JsonValue::Array(items)) => Ok(decode_entries(items)),
        _ => {
            warn!(
                target: "app::feedback::local",
                %key,
                "stored feedback log is not a JSON array; treating as empty"
            );
            Ok(Vec::new())
        }
    }
}
