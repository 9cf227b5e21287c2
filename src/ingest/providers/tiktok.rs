use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::ingest::types::{MediaItem, SourceKind, SourceProvider};

pub const POSTS_ENDPOINT: &str = "https://www.tikwm.com/api/user/posts/";
pub const TITLE_PLACEHOLDER: &str = "TikTok Video";

// Envelope returned by the tikwm proxy.
#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<PostsData>,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    #[serde(default)]
    videos: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    video_id: Option<Value>,
    aweme_id: Option<Value>,
    title: Option<String>,
    cover: Option<String>,
    origin_cover: Option<String>,
}

/// Ids show up both as strings and as bare numbers depending on the post.
fn id_string(v: Option<&Value>) -> Option<String> {
    let s = match v? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

impl Post {
    fn real_id(&self) -> Option<String> {
        id_string(self.video_id.as_ref()).or_else(|| id_string(self.aweme_id.as_ref()))
    }
}

pub fn video_url(username: &str, video_id: &str) -> String {
    format!("https://www.tiktok.com/@{username}/video/{video_id}")
}

pub struct TikTokProvider {
    username: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        client: reqwest::Client,
        endpoint: String,
    },
}

impl TikTokProvider {
    pub fn new(client: reqwest::Client, username: &str) -> Self {
        Self {
            username: clean_username(username),
            mode: Mode::Http {
                client,
                endpoint: POSTS_ENDPOINT.to_string(),
            },
        }
    }

    /// Points the HTTP mode at a different posts endpoint.
    pub fn with_endpoint(mut self, url: &str) -> Self {
        if let Mode::Http { endpoint, .. } = &mut self.mode {
            *endpoint = url.to_string();
        }
        self
    }

    /// Serve a canned proxy response instead of calling the API.
    pub fn from_fixture(username: &str, body: &str) -> Self {
        Self {
            username: clean_username(username),
            mode: Mode::Fixture(body.to_string()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn posts_request(
        client: &reqwest::Client,
        endpoint: &str,
        username: &str,
    ) -> reqwest::RequestBuilder {
        client
            .get(endpoint)
            .query(&[("unique_id", username), ("count", "1")])
    }

    pub fn parse_latest(username: &str, body: &str) -> Result<Option<MediaItem>, FetchError> {
        let resp: PostsResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::Malformed(format!("tiktok posts json: {e}")))?;

        if resp.code != 0 {
            return Err(FetchError::Upstream(
                resp.msg.unwrap_or_else(|| format!("code {}", resp.code)),
            ));
        }
        let data = resp
            .data
            .ok_or_else(|| FetchError::Malformed("tiktok posts response has no data".into()))?;

        let Some(post) = data.videos.into_iter().next() else {
            return Ok(None);
        };

        let Some(real_id) = post.real_id() else {
            tracing::warn!(
                source = "TikTok",
                username,
                "latest post has neither video_id nor aweme_id"
            );
            return Ok(None);
        };

        let title = post
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());
        let thumbnail_url = post
            .cover
            .filter(|c| !c.is_empty())
            .or(post.origin_cover.filter(|c| !c.is_empty()));

        Ok(Some(MediaItem {
            url: video_url(username, &real_id),
            id: real_id,
            title: Some(title),
            thumbnail_url,
        }))
    }
}

fn clean_username(s: &str) -> String {
    s.trim().trim_start_matches('@').to_string()
}

#[async_trait]
impl SourceProvider for TikTokProvider {
    async fn fetch_latest(&self) -> Result<Option<MediaItem>, FetchError> {
        match &self.mode {
            Mode::Fixture(body) => Self::parse_latest(&self.username, body),
            Mode::Http { client, endpoint } => {
                let resp = Self::posts_request(client, endpoint, &self.username)
                    .send()
                    .await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                    });
                }
                let body = resp.text().await?;
                Self::parse_latest(&self.username, &body)
            }
        }
    }

    fn kind(&self) -> SourceKind {
        SourceKind::TikTok
    }
}
