//! TikTok hashtag-page scraper.
//!
//! TikTok ships no public API for hashtag stats, so each tag page is fetched
//! with a browser user agent and mined with a chain of extractors, newest page
//! layout first.

use std::sync::LazyLock;

use foodtrend_core::Record;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::{Map, Value};

use super::{fetch_text, log_collected, BROWSER_USER_AGENT};
use crate::error::SourceError;
use crate::extract::{first_success, json_ld_blocks, script_json_by_id, truncate_chars, Strategy};

const DEFAULT_BASE_URL: &str = "https://www.tiktok.com";

const HASHTAGS: [&str; 12] = [
    "foodtiktok",
    "recipe",
    "koreanfood",
    "streetfood",
    "dessert",
    "baking",
    "foodtrend",
    "viralrecipe",
    "newdrink",
    "asianfood",
    "trendingfood",
    "foodasmr",
];

const MAX_DESCRIPTION_CHARS: usize = 100;

static TITLE_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<title>[^<]*?([\d.]+[KMB]?)\s*(?:videos|posts)")
        .expect("valid tiktok title regex")
});

/// Ordered extractor chain over the page HTML; the first that yields fields wins.
const EXTRACTORS: [Strategy<str, Map<String, Value>>; 5] = [
    from_sigi_state,
    from_universal_data,
    from_next_data,
    from_json_ld,
    from_title,
];

pub struct TiktokHarvester {
    client: reqwest::Client,
    base_url: String,
}

impl TiktokHarvester {
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

    /// Scrape every tracked hashtag page.
    ///
    /// Pages that fail to load or yield nothing are skipped.
    ///
    /// # Errors
    ///
    /// Never fails as a whole.
    pub async fn collect(&self) -> Result<Vec<Record>, SourceError> {
        let mut records = Vec::new();

        for tag in HASHTAGS {
            let url = format!(
                "{}/tag/{}",
                self.base_url,
                utf8_percent_encode(tag, NON_ALPHANUMERIC)
            );
            let request = self
                .client
                .get(&url)
                .header("User-Agent", BROWSER_USER_AGENT)
                .header("Accept-Language", "en-US,en;q=0.9");

            match fetch_text(request, &url).await {
                Ok(html) => match extract_tag_stats(&html) {
                    Some(fields) => records.push(to_record(tag, &url, fields)),
                    None => tracing::debug!(tag, "no TikTok stats found on tag page"),
                },
                Err(e) => tracing::warn!(tag, error = %e, "TikTok tag page fetch failed"),
            }
        }

        log_collected("TikTok", records.len());
        Ok(records)
    }
}

/// Run the extractor chain over a tag page.
fn extract_tag_stats(html: &str) -> Option<Map<String, Value>> {
    first_success(&EXTRACTORS, html)
}

fn to_record(tag: &str, url: &str, fields: Map<String, Value>) -> Record {
    fields.into_iter().fold(
        Record::new("TikTok")
            .with("hashtag", format!("#{tag}"))
            .with("url", url),
        |record, (key, value)| record.with(&key, value),
    )
}

fn challenge_stats(stats: &Value) -> Option<Map<String, Value>> {
    let stats = stats.as_object()?;
    let mut fields = Map::new();
    if let Some(videos) = stats.get("videoCount") {
        fields.insert("video_count".to_string(), videos.clone());
    }
    if let Some(views) = stats.get("viewCount") {
        fields.insert("view_count".to_string(), views.clone());
    }
    (!fields.is_empty()).then_some(fields)
}

fn from_sigi_state(html: &str) -> Option<Map<String, Value>> {
    let state = script_json_by_id(html, "SIGI_STATE")?;
    challenge_stats(state.pointer("/ChallengePage/challengeInfo/stats")?)
}

fn from_universal_data(html: &str) -> Option<Map<String, Value>> {
    let state = script_json_by_id(html, "__UNIVERSAL_DATA_FOR_REHYDRATION__")?;
    state
        .as_object()?
        .values()
        .filter_map(Value::as_object)
        .flat_map(|scope| scope.iter())
        .filter(|(key, _)| key.to_lowercase().contains("challenge"))
        .find_map(|(_, detail)| challenge_stats(detail.pointer("/challengeInfo/stats")?))
}

fn from_next_data(html: &str) -> Option<Map<String, Value>> {
    let data = script_json_by_id(html, "__NEXT_DATA__")?;
    let page_props = data.pointer("/props/pageProps")?.as_object()?;
    if page_props.is_empty() {
        return None;
    }
    let mut fields = Map::new();
    fields.insert("data_available".to_string(), Value::Bool(true));
    Some(fields)
}

fn from_json_ld(html: &str) -> Option<Map<String, Value>> {
    json_ld_blocks(html).into_iter().find_map(|block| {
        let name = block.get("name")?.as_str()?.to_string();
        let description = block
            .get("description")
            .and_then(Value::as_str)
            .map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS))
            .unwrap_or_default();
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name));
        fields.insert("description".to_string(), Value::String(description));
        Some(fields)
    })
}

fn from_title(html: &str) -> Option<Map<String, Value>> {
    let count = TITLE_COUNT_RE.captures(html)?.get(1)?.as_str();
    let mut fields = Map::new();
    fields.insert(
        "video_count_text".to_string(),
        Value::String(count.to_string()),
    );
    Some(fields)
}
