// src/ingest/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    YouTube,
    TikTok,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::YouTube, SourceKind::TikTok];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::YouTube => "YouTube",
            SourceKind::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latest upload of a source, normalized. Built fresh on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: Option<String>,
    pub url: String, // canonical link, never a signed/CDN url
    pub thumbnail_url: Option<String>,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// `Ok(None)` means "nothing usable yet", not an error.
    async fn fetch_latest(&self) -> Result<Option<MediaItem>, FetchError>;
    fn kind(&self) -> SourceKind;
}
