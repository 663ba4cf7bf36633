//! Instagram hashtag explore-page scraper.
//!
//! Logged-out requests are usually redirected to the login wall; those tags
//! are skipped quietly.

use std::sync::LazyLock;

use foodtrend_core::Record;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::Value;

use super::{log_collected, BROWSER_USER_AGENT};
use crate::error::SourceError;
use crate::extract::{json_ld_blocks, truncate_chars};

const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

const HASHTAGS: [&str; 10] = [
    "foodtrend",
    "viralfood",
    "koreanstreetfood",
    "dessertporn",
    "newfood",
    "trendingrecipe",
    "asiandesssert",
    "drinkstagram",
    "fooddiscovery",
    "streetfoodlover",
];

const MAX_DESCRIPTION_CHARS: usize = 150;

/// Statuses Instagram uses for the login wall and rate limiting.
const BLOCKED_STATUSES: [u16; 4] = [302, 401, 403, 429];

static POST_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+content="([\d,.KMB]+)\s*(?:Posts|posts|publications)"#)
        .expect("valid instagram post count regex")
});

static OG_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+property="og:description"\s+content="([^"]*)""#)
        .expect("valid og:description regex")
});

pub struct InstagramHarvester {
    client: reqwest::Client,
    base_url: String,
}

impl InstagramHarvester {
    /// `client` must not follow redirects, or the login-wall 302 is never seen.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Scrape every tracked hashtag.
    ///
    /// # Errors
    ///
    /// Never fails as a whole; blocked or empty pages are skipped.
    pub async fn collect(&self) -> Result<Vec<Record>, SourceError> {
        let mut records = Vec::new();

        for tag in HASHTAGS {
            match self.fetch_tag(tag).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => tracing::debug!(tag, "Instagram tag page blocked or empty"),
                Err(e) => tracing::warn!(tag, error = %e, "Instagram tag page fetch failed"),
            }
        }

        log_collected("Instagram", records.len());
        Ok(records)
    }

    async fn fetch_tag(&self, tag: &str) -> Result<Option<Record>, SourceError> {
        let url = format!(
            "{}/explore/tags/{}/",
            self.base_url,
            utf8_percent_encode(tag, NON_ALPHANUMERIC)
        );
        let response = self
            .client
            .get(&url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if BLOCKED_STATUSES.contains(&status.as_u16()) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let html = response.text().await?;
        Ok(parse_tag_page(&html).map(|(post_count, description)| {
            Record::new("Instagram")
                .with("hashtag", format!("#{tag}"))
                .with("post_count", post_count)
                .with("description", description)
                .with("url", url)
        }))
    }
}

/// Pull the post count and a description out of a tag page.
///
/// Returns `None` when the page carries neither.
fn parse_tag_page(html: &str) -> Option<(Option<String>, Option<String>)> {
    let post_count = POST_COUNT_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string());

    let description = OG_DESCRIPTION_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|d| !d.trim().is_empty())
        .map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS))
        .or_else(|| {
            json_ld_blocks(html).into_iter().find_map(|block| {
                block
                    .get("description")
                    .and_then(Value::as_str)
                    .map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS))
            })
        });

    if post_count.is_none() && description.is_none() {
        return None;
    }
    Some((post_count, description))
}
