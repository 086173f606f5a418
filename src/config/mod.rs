//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{env, fs, num::NonZeroUsize, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::moderation::{AutoApprovalScope, DEFAULT_STARRED_LIMIT, ModerationOptions};

mod cli;

pub use cli::*;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "gradboard";
const ENV_PREFIX: &str = "GRADBOARD";
const TOKEN_ENV: &str = "GRADBOARD_TOKEN";
const DEFAULT_API_PREFIX: &str = "api/v1/moderation";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub moderation: ModerationSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone)]
pub struct ApiSettings {
    pub base_url: Option<Url>,
    pub prefix: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("prefix", &self.prefix)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiSettings {
    /// The backend URL is optional in files but every command needs it.
    pub fn require_base_url(&self) -> Result<&Url, LoadError> {
        self.base_url
            .as_ref()
            .ok_or(LoadError::Missing { key: "api.base_url" })
    }
}

#[derive(Debug, Clone)]
pub struct ModerationSettings {
    pub page_size: NonZeroUsize,
    pub starred_limit: NonZeroUsize,
    pub auto_approval_scope: AutoApprovalScope,
}

impl ModerationSettings {
    pub fn options(&self) -> ModerationOptions {
        ModerationOptions {
            starred_limit: self.starred_limit,
            auto_approval_scope: self.auto_approval_scope,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
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
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("missing configuration for `{key}`")]
    Missing { key: &'static str },
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
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    let env_token = env::var(TOKEN_ENV).ok();
    Settings::from_raw(raw, env_token)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    moderation: RawModerationSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.api_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(path) = overrides.token_file.as_ref() {
            self.api.token_file = Some(path.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(size) = overrides.page_size {
            self.moderation.page_size = Some(size);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    prefix: Option<String>,
    timeout_seconds: Option<u64>,
    token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawModerationSettings {
    page_size: Option<u64>,
    starred_limit: Option<u64>,
    auto_approval_scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl Settings {
    fn from_raw(raw: RawSettings, env_token: Option<String>) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            moderation,
            logging,
        } = raw;

        let api = build_api_settings(api, env_token)?;
        let moderation = build_moderation_settings(moderation)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            api,
            moderation,
            logging,
        })
    }
}

fn build_api_settings(
    api: RawApiSettings,
    env_token: Option<String>,
) -> Result<ApiSettings, LoadError> {
    let base_url = match non_blank(api.base_url) {
        Some(value) => Some(parse_base_url(&value)?),
        None => None,
    };

    let prefix = non_blank(api.prefix)
        .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string())
        .trim_matches('/')
        .to_string();

    let timeout_secs = api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    let token = match api.token_file {
        Some(path) => Some(read_token_file(&path)?),
        None => non_blank(env_token),
    };

    Ok(ApiSettings {
        base_url,
        prefix,
        timeout: Duration::from_secs(timeout_secs),
        token,
    })
}

fn build_moderation_settings(
    moderation: RawModerationSettings,
) -> Result<ModerationSettings, LoadError> {
    let page_size = non_zero_usize(
        moderation.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        "moderation.page_size",
    )?;
    let starred_limit = match moderation.starred_limit {
        Some(value) => non_zero_usize(value, "moderation.starred_limit")?,
        None => DEFAULT_STARRED_LIMIT,
    };
    let auto_approval_scope = match moderation.auto_approval_scope {
        Some(value) => AutoApprovalScope::from_str(&value).map_err(|err| {
            LoadError::invalid("moderation.auto_approval_scope", err.to_string())
        })?,
        None => AutoApprovalScope::default(),
    };

    Ok(ModerationSettings {
        page_size,
        starred_limit,
        auto_approval_scope,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn parse_base_url(value: &str) -> Result<Url, LoadError> {
    let url = Url::parse(value)
        .map_err(|err| LoadError::invalid("api.base_url", format!("`{value}`: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LoadError::invalid(
            "api.base_url",
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn read_token_file(path: &std::path::Path) -> Result<String, LoadError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        LoadError::invalid("api.token_file", format!("{}: {err}", path.display()))
    })?;
    let token = contents.trim();
    if token.is_empty() {
        return Err(LoadError::invalid(
            "api.token_file",
            format!("{} is empty", path.display()),
        ));
    }
    Ok(token.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn non_zero_usize(value: u64, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    let value: usize = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range"))?;
    NonZeroUsize::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests;
