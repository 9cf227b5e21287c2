use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::message::build_message;
use super::Notifier;
use crate::error::DeliveryError;
use crate::ingest::types::{MediaItem, SourceKind};

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct Channel {
    id: String,
}

/// Authenticated bot session against the Discord REST API.
#[derive(Clone)]
pub struct DiscordSession {
    client: Client,
    api_base: String,
    token: String,
    user: BotUser,
}

impl DiscordSession {
    pub async fn login(client: Client, token: &str) -> Result<Self, DeliveryError> {
        Self::login_at(client, DISCORD_API_BASE, token).await
    }

    /// Same as [`login`](Self::login) against a different API root.
    pub async fn login_at(client: Client, api_base: &str, token: &str) -> Result<Self, DeliveryError> {
        let api_base = api_base.trim_end_matches('/').to_string();
        let resp = client
            .get(format!("{api_base}/users/@me"))
            .header("Authorization", format!("Bot {token}"))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DeliveryError::Unauthorized {
                status: status.as_u16(),
                body,
            });
        }
        let user: BotUser = resp.json().await?;

        Ok(Self {
            client,
            api_base,
            token: token.to_string(),
            user,
        })
    }

    pub fn user(&self) -> &BotUser {
        &self.user
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn resolve_channel(&self, channel_id: &str) -> Result<String, DeliveryError> {
        let resp = self
            .client
            .get(format!("{}/channels/{channel_id}", self.api_base))
            .header("Authorization", self.auth())
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(resp.json::<Channel>().await?.id),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                Err(DeliveryError::ChannelNotFound(channel_id.to_string()))
            }
            s => Err(DeliveryError::Rejected {
                status: s.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// Posts announcements into one fixed channel.
pub struct DiscordNotifier {
    session: DiscordSession,
    channel_id: String,
}

impl DiscordNotifier {
    pub fn new(session: DiscordSession, channel_id: impl Into<String>) -> Self {
        Self {
            session,
            channel_id: channel_id.into(),
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, source: SourceKind, item: &MediaItem) -> Result<(), DeliveryError> {
        let channel = self.session.resolve_channel(&self.channel_id).await?;
        let payload = build_message(source, item, Utc::now());

        let resp = self
            .session
            .client
            .post(format!("{}/channels/{channel}/messages", self.session.api_base))
            .header("Authorization", self.session.auth())
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
