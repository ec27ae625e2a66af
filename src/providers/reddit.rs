//! Reddit adapter over the public search JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Post, SocialSearch};
use crate::error::ProviderError;

const PROVIDER: &str = "reddit";
const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const USER_AGENT: &str = concat!("wandr/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct RedditClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
    data: RawPost,
}

#[derive(Deserialize)]
struct RawPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    permalink: String,
    subreddit: String,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Post {
            id: raw.id,
            title: raw.title,
            body: raw.selftext,
            score: raw.score,
            url: format!("https://reddit.com{}", raw.permalink),
            source: raw.subreddit,
        }
    }
}

impl RedditClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn search_subreddit(
        &self,
        subreddit: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Post>, ProviderError> {
        let url = format!("{}/r/{}/search.json", self.base_url, subreddit);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.to_string()),
                ("restrict_sr", "1".to_string()),
                ("sort", "relevance".to_string()),
                ("t", "year".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER.to_string(),
                status,
                body,
            });
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into())
            .collect())
    }
}

impl Default for RedditClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialSearch for RedditClient {
    /// Splits `limit` across sources. A failing source is skipped; the call
    /// fails only when every source fails.
    async fn search(
        &self,
        query: &str,
        sources: &[String],
        limit: usize,
    ) -> Result<Vec<Post>, ProviderError> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }
        let per_source = (limit / sources.len()).max(1);
        let mut posts = Vec::new();
        let mut last_error = None;
        let mut succeeded = 0;

        for subreddit in sources {
            match self.search_subreddit(subreddit, query, per_source).await {
                Ok(found) => {
                    succeeded += 1;
                    posts.extend(found);
                }
                Err(e) => {
                    warn!(subreddit = %subreddit, error = %e, "Subreddit search failed");
                    last_error = Some(e);
                }
            }
        }

        match (succeeded, last_error) {
            (0, Some(error)) => Err(error),
            _ => {
                debug!(query, posts = posts.len(), "Social search complete");
                Ok(posts)
            }
        }
    }
}
