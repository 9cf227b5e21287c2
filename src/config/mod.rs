// src/config/mod.rs
//! Static configuration, loaded once at startup.
//!
//! Key names follow the `config.json` used by existing deployments
//! (`mediaChannel`, `youtubeChannelId`, `tiktokUsername`, `checkInterval`).

pub mod secrets;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::state_store::DEFAULT_STATE_PATH;

pub use secrets::{Secrets, SecretsLocation};

pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 15;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    media_channel: Option<String>,
    youtube_channel_id: Option<String>,
    tiktok_username: Option<String>,
    check_interval: Option<u64>,
    startup_delay_secs: Option<u64>,
    state_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    secrets_location: SecretsLocation,
    token: Option<String>,
    youtube_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub media_channel: String,
    pub youtube_channel_id: Option<String>,
    pub tiktok_username: Option<String>,
    pub check_interval: Duration,
    pub startup_delay: Duration,
    pub state_path: PathBuf,
    /// `None` leaves outbound requests without a timeout.
    pub request_timeout: Option<Duration>,
    pub secrets: Secrets,
}

impl AppConfig {
    /// `$CONFIG_PATH`, falling back to `config.json`.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path, |k| std::env::var(k).ok())
    }

    /// Parses TOML when the extension says so, JSON otherwise.
    /// `env` resolves secrets when they live in the environment.
    pub fn load_from<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let raw: RawConfig = if is_toml {
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Self::from_raw(raw, env)
    }

    fn from_raw<F>(raw: RawConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let media_channel = non_empty(raw.media_channel).ok_or(ConfigError::Missing("mediaChannel"))?;
        let youtube_channel_id = non_empty(raw.youtube_channel_id);
        let tiktok_username = non_empty(raw.tiktok_username);
        if youtube_channel_id.is_none() && tiktok_username.is_none() {
            return Err(ConfigError::Missing("youtubeChannelId or tiktokUsername"));
        }

        let interval = raw.check_interval.ok_or(ConfigError::Missing("checkInterval"))?;
        if interval == 0 {
            return Err(ConfigError::Invalid {
                key: "checkInterval",
                message: "must be at least 1 second".into(),
            });
        }

        let secrets = secrets::resolve(
            raw.secrets_location,
            raw.token,
            raw.youtube_api_key,
            youtube_channel_id.is_some(),
            env,
        )?;

        Ok(Self {
            media_channel,
            youtube_channel_id,
            tiktok_username,
            check_interval: Duration::from_secs(interval),
            startup_delay: Duration::from_secs(
                raw.startup_delay_secs.unwrap_or(DEFAULT_STARTUP_DELAY_SECS),
            ),
            state_path: raw
                .state_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
            request_timeout: raw
                .request_timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
            secrets,
        })
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
