//! Reddit food-community collector (client-credentials OAuth).

use chrono::DateTime;
use foodtrend_core::Record;
use serde::Deserialize;

use super::log_collected;
use crate::error::SourceError;

const TOKEN_URL: &str = "https://www.reddit.com";
const API_URL: &str = "https://oauth.reddit.com";

const SUBREDDITS: [&str; 12] = [
    "food",
    "foodporn",
    "cooking",
    "Baking",
    "eatsandwiches",
    "KoreanFood",
    "ChineseFood",
    "ThaiFood",
    "VietnamFood",
    "filipinofood",
    "FoodTrends",
    "foodhacks",
];

/// Listings pulled per subreddit with their page size.
const LISTINGS: [(&str, u32); 2] = [("hot", 30), ("rising", 15)];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    upvote_ratio: Option<f64>,
    permalink: Option<String>,
    created_utc: Option<f64>,
    #[serde(default)]
    stickied: bool,
}

pub struct RedditHarvester {
    client: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: String,
    token_url: String,
    api_url: String,
}

impl RedditHarvester {
    pub fn new(
        client: reqwest::Client,
        client_id: Option<String>,
        client_secret: Option<String>,
        user_agent: &str,
    ) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            user_agent: user_agent.to_string(),
            token_url: TOKEN_URL.to_string(),
            api_url: API_URL.to_string(),
        }
    }

    /// Point token exchange and listing calls at other hosts (tests).
    #[must_use]
    pub fn with_base_urls(mut self, token_url: &str, api_url: &str) -> Self {
        self.token_url = token_url.trim_end_matches('/').to_string();
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Pull hot and rising posts from every food subreddit.
    ///
    /// A subreddit listing that fails is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingCredentials`] when the client id or
    /// secret is not configured, and [`SourceError::Reddit`] when the token
    /// exchange is rejected.
    pub async fn collect(&self) -> Result<Vec<Record>, SourceError> {
        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret) else {
            return Err(SourceError::MissingCredentials("REDDIT_CLIENT_ID/REDDIT_CLIENT_SECRET"));
        };

        let token = self.fetch_token(client_id, client_secret).await?;
        let mut records = Vec::new();

        for subreddit in SUBREDDITS {
            for (listing, limit) in LISTINGS {
                match self.fetch_listing(&token, subreddit, listing, limit).await {
                    Ok(posts) => records.extend(
                        posts
                            .iter()
                            .filter(|post| !post.stickied)
                            .filter_map(|post| to_record(subreddit, listing, post)),
                    ),
                    Err(e) => {
                        tracing::warn!(subreddit, listing, error = %e, "Reddit listing failed");
                    }
                }
            }
        }

        log_collected("Reddit", records.len());
        Ok(records)
    }

    async fn fetch_token(&self, client_id: &str, client_secret: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.token_url))
            .header("User-Agent", &self.user_agent)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Reddit(format!("token parse error: {e}")))?;

        Ok(token.access_token)
    }

    async fn fetch_listing(
        &self,
        token: &str,
        subreddit: &str,
        listing: &str,
        limit: u32,
    ) -> Result<Vec<PostData>, SourceError> {
        let response = self
            .client
            .get(format!("{}/r/{subreddit}/{listing}", self.api_url))
            .header("Authorization", format!("Bearer {token}"))
            .header("User-Agent", &self.user_agent)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Reddit(format!(
                "r/{subreddit}/{listing} failed with status {}",
                response.status()
            )));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| SourceError::Reddit(format!("listing parse error: {e}")))?;

        Ok(listing.data.children.into_iter().map(|post| post.data).collect())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_record(subreddit: &str, listing: &str, post: &PostData) -> Option<Record> {
    let title = post.title.as_deref()?.trim();
    if title.is_empty() {
        return None;
    }
    let url = post
        .permalink
        .as_deref()
        .map(|p| format!("https://www.reddit.com{p}"))
        .unwrap_or_default();
    let created_at = post
        .created_utc
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
        .map(|dt| dt.to_rfc3339());

    Some(
        Record::new("Reddit")
            .with("subreddit", subreddit)
            .with("source", listing)
            .with("title", title)
            .with("score", post.score)
            .with("num_comments", post.num_comments)
            .with("upvote_ratio", post.upvote_ratio)
            .with("url", url)
            .with("created_at", created_at),
    )
}
