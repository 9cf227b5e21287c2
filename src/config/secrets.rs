// src/config/secrets.rs
use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
// Names used by older deployments.
const LEGACY_ENV_DISCORD_TOKEN: &str = "token";
const LEGACY_ENV_YOUTUBE_API_KEY: &str = "youtubeApiKey";

/// Where the bot token and API key are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretsLocation {
    #[default]
    Env,
    File,
}

#[derive(Clone)]
pub struct Secrets {
    pub discord_token: String,
    /// Only required when the YouTube source is enabled.
    pub youtube_api_key: Option<String>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Lengths only, never the values.
        f.debug_struct("Secrets")
            .field("discord_token_len", &self.discord_token.len())
            .field(
                "youtube_api_key_len",
                &self.youtube_api_key.as_ref().map(String::len),
            )
            .finish()
    }
}

pub(super) fn resolve<F>(
    location: SecretsLocation,
    file_token: Option<String>,
    file_api_key: Option<String>,
    youtube_enabled: bool,
    env: F,
) -> Result<Secrets, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |primary: &str, legacy: &str| {
        env(primary)
            .or_else(|| env(legacy))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let (token, api_key) = match location {
        SecretsLocation::Env => (
            lookup(ENV_DISCORD_TOKEN, LEGACY_ENV_DISCORD_TOKEN),
            lookup(ENV_YOUTUBE_API_KEY, LEGACY_ENV_YOUTUBE_API_KEY),
        ),
        SecretsLocation::File => (clean(file_token), clean(file_api_key)),
    };

    let discord_token = token.ok_or(ConfigError::MissingSecret(match location {
        SecretsLocation::Env => ENV_DISCORD_TOKEN,
        SecretsLocation::File => "token",
    }))?;

    if youtube_enabled && api_key.is_none() {
        return Err(ConfigError::MissingSecret(match location {
            SecretsLocation::Env => ENV_YOUTUBE_API_KEY,
            SecretsLocation::File => "youtubeApiKey",
        }));
    }

    Ok(Secrets {
        discord_token,
        youtube_api_key: api_key,
    })
}
