use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_FEED_LIMIT: usize = 10;
pub const DEFAULT_DATA_DIR: &str = ".mealsetu";
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::feedback=debug";
pub const DATABASE_FILE: &str = "mealsetu.sqlite";

const ENV_CONFIG_FILE: &str = "MEALSETU_CONFIG";
const ENV_API_URL: &str = "MEALSETU_API_URL";
const ENV_HTTP_TIMEOUT: &str = "MEALSETU_HTTP_TIMEOUT_SECS";
const ENV_FEED_LIMIT: &str = "MEALSETU_FEED_LIMIT";
const ENV_DATA_DIR: &str = "MEALSETU_DATA_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// `None` leaves the transport default in place.
    pub http_timeout: Option<StdDuration>,
    pub feed_limit: usize,
    pub data_dir: PathBuf,
    pub log_directives: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: None,
            feed_limit: DEFAULT_FEED_LIMIT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
        }
    }
}

/// Optional YAML overlay; every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
struct ConfigFile {
    api_base_url: Option<String>,
    http_timeout_secs: Option<u64>,
    feed_limit: Option<usize>,
    data_dir: Option<PathBuf>,
    log_directives: Option<String>,
}

impl AppConfig {
    /// Defaults, then the YAML file named by `MEALSETU_CONFIG`, then the
    /// individual environment variables.
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
            config.apply_file(Path::new(&path))?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.normalize()?;

        info!(
            target: "app::config",
            api_base_url = %config.api_base_url,
            feed_limit = config.feed_limit,
            data_dir = %config.data_dir.display(),
            "configuration loaded"
        );

        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> AppResult<Self> {
        let mut config = Self::default();
        config.apply_yaml(source)?;
        config.normalize()?;
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    fn apply_file(&mut self, path: &Path) -> AppResult<()> {
        debug!(target: "app::config", path = %path.display(), "reading configuration file");
        let source = std::fs::read_to_string(path).map_err(|err| {
            AppError::config(format!("cannot read {}: {err}", path.display()))
        })?;
        self.apply_yaml(&source)
    }

    fn apply_yaml(&mut self, source: &str) -> AppResult<()> {
        let file: ConfigFile = serde_yaml::from_str(source)
            .map_err(|err| AppError::config(format!("invalid configuration file: {err}")))?;

        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(secs) = file.http_timeout_secs {
            self.http_timeout = Some(StdDuration::from_secs(secs));
        }
        if let Some(limit) = file.feed_limit {
            self.feed_limit = limit;
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(directives) = file.log_directives {
            self.log_directives = directives;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT) {
            let secs: u64 = parse_env(ENV_HTTP_TIMEOUT, &raw)?;
            self.http_timeout = Some(StdDuration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_FEED_LIMIT) {
            self.feed_limit = parse_env(ENV_FEED_LIMIT, &raw)?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    fn normalize(&mut self) -> AppResult<()> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(AppError::config("api_base_url must not be empty"));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(AppError::config(format!(
                "api_base_url must be an http(s) URL, got {trimmed}"
            )));
        }
        self.api_base_url = trimmed.to_string();

        if self.feed_limit == 0 {
            return Err(AppError::config("feed_limit must be at least 1"));
        }
        if self.http_timeout == Some(StdDuration::ZERO) {
            self.http_timeout = None;
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err| AppError::config(format!("invalid {key} value {raw:?}: {err}")))
}
