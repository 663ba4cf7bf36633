//! Google Trends daily trending-search collector.

use foodtrend_core::Record;

use super::feed_helpers::{parse_feed, FeedItem};
use super::{fetch_text, log_collected};
use crate::error::SourceError;

const DEFAULT_BASE_URL: &str = "https://trends.google.com";

/// Regions polled for daily trending searches (ISO 3166 `geo` codes).
const REGIONS: [&str; 5] = ["US", "KR", "JP", "SG", "IN"];

const MAX_SEARCHES_PER_REGION: usize = 20;

pub struct GoogleTrendsHarvester {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTrendsHarvester {
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

    /// Collect trending searches for every region; failed regions are skipped.
    ///
    /// # Errors
    ///
    /// Never fails as a whole.
    pub async fn collect(&self) -> Result<Vec<Record>, SourceError> {
        let mut records = Vec::new();

        for geo in REGIONS {
            let url = format!("{}/trending/rss?geo={geo}", self.base_url);
            let result = async {
                let body = fetch_text(self.client.get(&url), &url).await?;
                parse_feed(&body, MAX_SEARCHES_PER_REGION)
            }
            .await;

            match result {
                Ok(items) => records.extend(items.iter().map(|item| to_record(geo, item))),
                Err(e) => {
                    tracing::warn!(geo, error = %e, "Google Trends trending fetch failed");
                }
            }
        }

        log_collected("Google Trends", records.len());
        Ok(records)
    }
}

fn to_record(geo: &str, item: &FeedItem) -> Record {
    let mut record = Record::new("Google Trends")
        .with("source", format!("trending:{geo}"))
        .with("keyword", item.title.as_str())
        .with("type", "trending_search");
    if let Some(traffic) = &item.approx_traffic {
        record = record.with("approx_traffic", traffic.as_str());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TRENDS_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:ht="https://trends.google.com/trending/rss" version="2.0">
  <channel>
    <item>
      <title>swicy snacks</title>
      <ht:approx_traffic>50,000+</ht:approx_traffic>
      <link>https://trends.google.com/trending/rss?geo=US</link>
    </item>
    <item>
      <title>tanghulu</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn to_record_includes_traffic_when_present() {
        let items = parse_feed(TRENDS_RSS, 20).unwrap();
        let first = to_record("US", &items[0]);
        assert_eq!(first.platform(), "Google Trends");
        assert_eq!(first.get("keyword").and_then(|v| v.as_str()), Some("swicy snacks"));
        assert_eq!(
            first.get("approx_traffic").and_then(|v| v.as_str()),
            Some("50,000+")
        );
        assert_eq!(first.get("source").and_then(|v| v.as_str()), Some("trending:US"));

        let second = to_record("US", &items[1]);
        assert!(second.get("approx_traffic").is_none());
    }

    #[tokio::test]
    async fn collect_skips_failed_regions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/rss"))
            .and(query_param("geo", "KR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TRENDS_RSS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trending/rss"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let harvester =
            GoogleTrendsHarvester::new(reqwest::Client::new()).with_base_url(&server.uri());
        let records = harvester.collect().await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.get("source").and_then(|v| v.as_str()) == Some("trending:KR")));
    }

    #[tokio::test]
    async fn all_regions_failing_warns_and_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let (logs, _guard) = crate::sources::tests::capture_logs();
        let harvester =
            GoogleTrendsHarvester::new(reqwest::Client::new()).with_base_url(&server.uri());
        let records = harvester.collect().await.unwrap();

        assert!(records.is_empty());
        assert!(logs.text().contains("harvester gathered no records"));
    }
}
