use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;
use crate::ingest::types::{MediaItem, SourceKind, SourceProvider};

pub const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<ResourceId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    standard: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl Thumbnails {
    /// Highest resolution tier that carries a url.
    fn best_url(&self) -> Option<String> {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .filter_map(|t| t.url.as_deref())
        .find(|u| !u.is_empty())
        .map(str::to_string)
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub struct YouTubeProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        channel_id: String,
    },
}

impl YouTubeProvider {
    pub fn new(client: reqwest::Client, api_key: String, channel_id: String) -> Self {
        Self {
            mode: Mode::Http {
                client,
                endpoint: SEARCH_ENDPOINT.to_string(),
                api_key,
                channel_id,
            },
        }
    }

    /// Points the HTTP mode at a different search endpoint.
    pub fn with_endpoint(mut self, url: &str) -> Self {
        if let Mode::Http { endpoint, .. } = &mut self.mode {
            *endpoint = url.to_string();
        }
        self
    }

    /// Serve a canned search response instead of calling the API.
    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    /// Builds the "latest upload of this channel" search request.
    pub fn search_request(
        client: &reqwest::Client,
        endpoint: &str,
        api_key: &str,
        channel_id: &str,
    ) -> reqwest::RequestBuilder {
        client.get(endpoint).query(&[
            ("key", api_key),
            ("channelId", channel_id),
            ("order", "date"),
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", "1"),
        ])
    }

    pub fn parse_latest(body: &str) -> Result<Option<MediaItem>, FetchError> {
        let resp: SearchResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::Malformed(format!("youtube search json: {e}")))?;

        let Some(first) = resp.items.into_iter().next() else {
            return Ok(None);
        };

        let video_id = first
            .id
            .and_then(|id| id.video_id)
            .filter(|id| !id.trim().is_empty());
        let Some(video_id) = video_id else {
            tracing::warn!(source = "YouTube", "latest search result has no videoId");
            return Ok(None);
        };

        let (title, thumbnail_url) = match first.snippet {
            Some(s) => (
                s.title
                    .map(|t| html_escape::decode_html_entities(&t).into_owned()),
                s.thumbnails.best_url(),
            ),
            None => (None, None),
        };

        Ok(Some(MediaItem {
            url: watch_url(&video_id),
            id: video_id,
            title,
            thumbnail_url,
        }))
    }
}

#[async_trait]
impl SourceProvider for YouTubeProvider {
    async fn fetch_latest(&self) -> Result<Option<MediaItem>, FetchError> {
        match &self.mode {
            Mode::Fixture(body) => Self::parse_latest(body),
            Mode::Http {
                client,
                endpoint,
                api_key,
                channel_id,
            } => {
                let resp = Self::search_request(client, endpoint, api_key, channel_id)
                    .send()
                    .await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                    });
                }
                let body = resp.text().await?;
                Self::parse_latest(&body)
            }
        }
    }

    fn kind(&self) -> SourceKind {
        SourceKind::YouTube
    }
}
