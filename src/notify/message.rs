//! Discord message payloads: one embed plus a single link button.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ingest::types::{MediaItem, SourceKind};

/// Discord component type ids.
const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
/// Button style that opens a url instead of sending an interaction.
const STYLE_LINK: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStyle {
    pub headline: &'static str,
    pub color: u32,
    pub footer: &'static str,
    pub button_label: &'static str,
}

pub fn style_for(source: SourceKind) -> SourceStyle {
    match source {
        SourceKind::YouTube => SourceStyle {
            headline: "🎥 New video on YouTube!",
            color: 0xFF0000,
            footer: "YouTube Auto Poster",
            button_label: "🎬 Watch on YouTube",
        },
        SourceKind::TikTok => SourceStyle {
            headline: "🎵 New clip on TikTok!",
            color: 0x00FFFF,
            footer: "TikTok Auto Poster",
            button_label: "🎵 Watch on TikTok",
        },
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateMessage {
    pub content: String,
    pub allowed_mentions: AllowedMentions,
    pub embeds: Vec<Embed>,
    pub components: Vec<ActionRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<LinkButton>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkButton {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub url: String,
}

pub fn display_title(source: SourceKind, item: &MediaItem) -> String {
    item.title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("New {source} upload"))
}

/// Announcement for `item`, pinging `@everyone`.
pub fn build_message(source: SourceKind, item: &MediaItem, now: DateTime<Utc>) -> CreateMessage {
    let style = style_for(source);
    let image = item
        .thumbnail_url
        .as_ref()
        .filter(|u| !u.is_empty())
        .map(|u| EmbedImage { url: u.clone() });

    CreateMessage {
        content: "@everyone".to_string(),
        allowed_mentions: AllowedMentions {
            parse: vec!["everyone".to_string()],
        },
        embeds: vec![Embed {
            title: style.headline.to_string(),
            description: format!("**{}**", display_title(source, item)),
            url: item.url.clone(),
            color: style.color,
            image,
            footer: EmbedFooter {
                text: style.footer.to_string(),
            },
            timestamp: now.to_rfc3339(),
        }],
        components: vec![ActionRow {
            kind: ACTION_ROW,
            components: vec![LinkButton {
                kind: BUTTON,
                style: STYLE_LINK,
                label: style.button_label.to_string(),
                url: item.url.clone(),
            }],
        }],
    }
}
