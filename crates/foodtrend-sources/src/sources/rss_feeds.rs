//! Food-media RSS/Atom collector.

use foodtrend_core::Record;

use super::feed_helpers::{parse_feed, FeedItem};
use super::{fetch_text, log_collected};
use crate::error::SourceError;
use crate::extract::truncate_chars;

const FEEDS: [(&str, &str); 8] = [
    ("Eater", "https://www.eater.com/rss/index.xml"),
    ("Food52", "https://food52.com/blog.rss"),
    ("Bon Appetit", "https://www.bonappetit.com/feed/rss"),
    ("Serious Eats", "https://www.seriouseats.com/rss"),
    ("Delish", "https://www.delish.com/rss/"),
    ("Tastingtable", "https://www.tastingtable.com/rss"),
    ("FoodBeast", "https://www.foodbeast.com/feed/"),
    ("The Kitchn", "https://www.thekitchn.com/rss2"),
];

const MAX_ARTICLES_PER_FEED: usize = 15;
const MAX_DESCRIPTION_CHARS: usize = 200;

pub struct RssFeedsHarvester {
    client: reqwest::Client,
    feeds: Vec<(String, String)>,
}

impl RssFeedsHarvester {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            feeds: FEEDS
                .iter()
                .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
                .collect(),
        }
    }

    /// Replace the feed list (used to point at a mock server in tests).
    #[must_use]
    pub fn with_feeds(mut self, feeds: Vec<(String, String)>) -> Self {
        self.feeds = feeds;
        self
    }

    /// Fetch every feed; a feed that fails is logged and skipped.
    ///
    /// # Errors
    ///
    /// Never fails as a whole. The `Result` keeps the harvester signature
    /// uniform with the other sources.
    pub async fn collect(&self) -> Result<Vec<Record>, SourceError> {
        let mut records = Vec::new();

        for (name, url) in &self.feeds {
            match self.fetch_feed(name, url).await {
                Ok(articles) => records.extend(articles),
                Err(e) => {
                    tracing::warn!(feed = %name, error = %e, "RSS feed fetch failed");
                }
            }
        }

        log_collected("RSS", records.len());
        Ok(records)
    }

    async fn fetch_feed(&self, name: &str, url: &str) -> Result<Vec<Record>, SourceError> {
        let body = fetch_text(self.client.get(url), url).await?;
        let items = parse_feed(&body, MAX_ARTICLES_PER_FEED)?;
        Ok(items.iter().map(|item| to_record(name, item)).collect())
    }
}

fn to_record(feed_name: &str, item: &FeedItem) -> Record {
    Record::new("RSS")
        .with("source", feed_name)
        .with("title", item.title.as_str())
        .with("url", item.link.as_str())
        .with("published_at", item.published.as_str())
        .with(
            "description",
            truncate_chars(&item.description, MAX_DESCRIPTION_CHARS),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item>
    <title>Salted Egg Yolk Croissants</title>
    <link>https://example.com/croissant</link>
    <description>Crispy, golden, and everywhere in Singapore.</description>
  </item>
</channel></rss>"#;

    #[test]
    fn record_carries_feed_name_and_truncated_description() {
        let item = FeedItem {
            title: "t".to_string(),
            link: "https://example.com".to_string(),
            published: String::new(),
            description: "x".repeat(500),
            approx_traffic: None,
        };
        let record = to_record("Eater", &item);
        assert_eq!(record.platform(), "RSS");
        assert_eq!(record.get("source").and_then(|v| v.as_str()), Some("Eater"));
        let description = record.get("description").and_then(|v| v.as_str()).unwrap();
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[tokio::test]
    async fn failing_feed_does_not_drop_healthy_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/good.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken.xml"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let harvester = RssFeedsHarvester::new(reqwest::Client::new()).with_feeds(vec![
            ("Broken".to_string(), format!("{}/broken.xml", server.uri())),
            ("Good".to_string(), format!("{}/good.xml", server.uri())),
        ]);

        let records = harvester.collect().await.expect("never fails as a whole");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("title").and_then(|v| v.as_str()),
            Some("Salted Egg Yolk Croissants")
        );
        assert_eq!(records[0].get("source").and_then(|v| v.as_str()), Some("Good"));
    }
}
