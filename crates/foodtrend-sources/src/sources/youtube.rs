//! YouTube Data API v3 collector: regional food charts plus keyword search.

use chrono::{Duration, Utc};
use foodtrend_core::Record;
use serde::Deserialize;

use super::{fetch_text, log_collected};
use crate::error::SourceError;

/// Request URLs must never carry the key; it goes in this header.
const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const REGIONS: [&str; 6] = ["US", "KR", "TW", "TH", "VN", "PH"];

const SEARCH_QUERIES: [&str; 7] = [
    "food trend 2026",
    "viral recipe",
    "mukbang",
    "street food",
    "dessert trend",
    "new drink trend",
    "food hack",
];

/// "Howto & Style", where most food content is filed.
const FOOD_CATEGORY_ID: &str = "26";
const POPULAR_PER_REGION: u32 = 10;
const SEARCH_PER_QUERY: u32 = 5;
/// Keyword search only runs for the first few regions to stay inside quota.
const SEARCH_REGIONS: usize = 3;
const SEARCH_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
}

/// The API returns counts as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

pub struct YoutubeHarvester {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl YoutubeHarvester {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Collect chart and search results.
    ///
    /// Individual region and query failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingCredentials`] if no API key is set.
    pub async fn collect(&self) -> Result<Vec<Record>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SourceError::MissingCredentials("YOUTUBE_API_KEY"));
        };

        let mut records = Vec::new();

        for region in REGIONS {
            match self.popular(api_key, region).await {
                Ok(videos) => records.extend(
                    videos
                        .iter()
                        .map(|video| to_record(region, "popular", video)),
                ),
                Err(e) => tracing::warn!(region, error = %e, "YouTube chart fetch failed"),
            }
        }

        let published_after = (Utc::now() - Duration::days(SEARCH_WINDOW_DAYS))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();

        for region in REGIONS.iter().take(SEARCH_REGIONS) {
            for query in SEARCH_QUERIES {
                match self.search(api_key, region, query, &published_after).await {
                    Ok(videos) => {
                        let source = format!("search:{query}");
                        records.extend(videos.iter().map(|video| to_record(region, &source, video)));
                    }
                    Err(e) => {
                        tracing::warn!(region, query, error = %e, "YouTube search failed");
                    }
                }
            }
        }

        log_collected("YouTube", records.len());
        Ok(records)
    }

    async fn popular(&self, api_key: &str, region: &str) -> Result<Vec<Video>, SourceError> {
        let url = format!("{}/videos", self.base_url);
        let max_results = POPULAR_PER_REGION.to_string();
        let request = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("chart", "mostPopular"),
                ("regionCode", region),
                ("videoCategoryId", FOOD_CATEGORY_ID),
                ("maxResults", max_results.as_str()),
            ])
            .header(API_KEY_HEADER, api_key);
        let body = fetch_text(request, &url).await?;
        parse_videos(&body, "youtube videos.list chart")
    }

    async fn search(
        &self,
        api_key: &str,
        region: &str,
        query: &str,
        published_after: &str,
    ) -> Result<Vec<Video>, SourceError> {
        let url = format!("{}/search", self.base_url);
        let max_results = SEARCH_PER_QUERY.to_string();
        let request = self
            .client
            .get(&url)
            .query(&[
                ("part", "id"),
                ("q", query),
                ("type", "video"),
                ("order", "viewCount"),
                ("regionCode", region),
                ("publishedAfter", published_after),
                ("maxResults", max_results.as_str()),
            ])
            .header(API_KEY_HEADER, api_key);
        let body = fetch_text(request, &url).await?;
        let search: SearchResponse =
            serde_json::from_str(&body).map_err(|source| SourceError::Deserialize {
                context: "youtube search.list".to_string(),
                source,
            })?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/videos", self.base_url);
        let joined = ids.join(",");
        let request = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", joined.as_str()),
            ])
            .header(API_KEY_HEADER, api_key);
        let body = fetch_text(request, &url).await?;
        parse_videos(&body, "youtube videos.list ids")
    }
}

fn parse_videos(body: &str, context: &str) -> Result<Vec<Video>, SourceError> {
    let list: VideoListResponse =
        serde_json::from_str(body).map_err(|source| SourceError::Deserialize {
            context: context.to_string(),
            source,
        })?;
    Ok(list.items)
}

fn parse_count(raw: Option<&String>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn to_record(region: &str, source: &str, video: &Video) -> Record {
    Record::new("YouTube")
        .with("region", region)
        .with("source", source)
        .with("title", video.snippet.title.as_str())
        .with("channel", video.snippet.channel_title.as_str())
        .with("view_count", parse_count(video.statistics.view_count.as_ref()))
        .with("like_count", parse_count(video.statistics.like_count.as_ref()))
        .with("published_at", video.snippet.published_at.as_str())
        .with("url", format!("https://www.youtube.com/watch?v={}", video.id))
}
