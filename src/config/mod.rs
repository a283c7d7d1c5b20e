//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::path::Path;
use std::str::FromStr;

use clap::{Args, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "blogwright";
const ENV_PREFIX: &str = "BLOGWRIGHT";

/// Command-line overrides applied on top of files and environment.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigOverrides {
    /// Override the backend endpoint, e.g. <https://cloud.appwrite.io/v1>.
    #[arg(long = "endpoint", value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Override the backend project id.
    #[arg(long = "project-id", value_name = "ID", global = true)]
    pub project_id: Option<String>,

    /// Override the database holding the posts collection.
    #[arg(long = "database-id", value_name = "ID", global = true)]
    pub database_id: Option<String>,

    /// Override the posts collection id.
    #[arg(long = "collection-id", value_name = "ID", global = true)]
    pub collection_id: Option<String>,

    /// Override the storage bucket id used for images.
    #[arg(long = "bucket-id", value_name = "ID", global = true)]
    pub bucket_id: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: BackendSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub endpoint: Url,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub bucket_id: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("missing required configuration `{key}`")]
    Missing { key: &'static str },
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    backend: RawBackendSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBackendSettings {
    endpoint: Option<String>,
    project_id: Option<String>,
    database_id: Option<String>,
    collection_id: Option<String>,
    bucket_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint.as_ref() {
            self.backend.endpoint = Some(endpoint.clone());
        }
        if let Some(project_id) = overrides.project_id.as_ref() {
            self.backend.project_id = Some(project_id.clone());
        }
        if let Some(database_id) = overrides.database_id.as_ref() {
            self.backend.database_id = Some(database_id.clone());
        }
        if let Some(collection_id) = overrides.collection_id.as_ref() {
            self.backend.collection_id = Some(collection_id.clone());
        }
        if let Some(bucket_id) = overrides.bucket_id.as_ref() {
            self.backend.bucket_id = Some(bucket_id.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { backend, logging } = raw;

        let logging = build_logging_settings(logging)?;
        let backend = build_backend_settings(backend)?;

        Ok(Self { backend, logging })
    }
}

fn build_backend_settings(backend: RawBackendSettings) -> Result<BackendSettings, LoadError> {
    let endpoint = required(backend.endpoint, "backend.endpoint")?;
    let endpoint = Url::parse(&endpoint)
        .map_err(|err| LoadError::invalid("backend.endpoint", format!("failed to parse: {err}")))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "backend.endpoint",
            format!("unsupported scheme `{}`", endpoint.scheme()),
        ));
    }

    Ok(BackendSettings {
        endpoint,
        project_id: required(backend.project_id, "backend.project_id")?,
        database_id: required(backend.database_id, "backend.database_id")?,
        collection_id: required(backend.collection_id, "backend.collection_id")?,
        bucket_id: required(backend.bucket_id, "backend.bucket_id")?,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn required(value: Option<String>, key: &'static str) -> Result<String, LoadError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(LoadError::Missing { key })
}
