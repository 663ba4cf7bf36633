//! Concrete harvesters, one per external signal source.

mod feed_helpers;
mod google_trends;
mod instagram;
mod reddit;
mod rss_feeds;
mod tiktok;
mod youtube;

use std::sync::Arc;
use std::time::Duration;

use foodtrend_core::AppConfig;

use crate::error::SourceError;
use crate::harvester::Harvester;

pub use google_trends::GoogleTrendsHarvester;
pub use instagram::InstagramHarvester;
pub use reddit::RedditHarvester;
pub use rss_feeds::RssFeedsHarvester;
pub use tiktok::TiktokHarvester;
pub use youtube::YoutubeHarvester;

const BOT_USER_AGENT: &str = "FoodTrendBot/1.0";

pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Build the production harvester list in delivery-log order.
///
/// Sources whose credentials are missing are still registered; they fail at
/// collection time so the corpus keeps an empty key for them.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the shared `reqwest::Client` cannot be
/// constructed.
pub fn default_harvesters(config: &AppConfig) -> Result<Vec<Harvester>, SourceError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(BOT_USER_AGENT)
        .build()?;
    let no_redirect_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let youtube = Arc::new(YoutubeHarvester::new(
        client.clone(),
        config.youtube_api_key.clone(),
    ));
    let reddit = Arc::new(RedditHarvester::new(
        client.clone(),
        config.reddit_client_id.clone(),
        config.reddit_client_secret.clone(),
        &config.reddit_user_agent,
    ));
    let tiktok = Arc::new(TiktokHarvester::new(client.clone()));
    let google_trends = Arc::new(GoogleTrendsHarvester::new(client.clone()));
    let rss_feeds = Arc::new(RssFeedsHarvester::new(client));
    let instagram = Arc::new(InstagramHarvester::new(no_redirect_client));

    Ok(vec![
        Harvester::new("youtube", move || {
            let h = Arc::clone(&youtube);
            async move { h.collect().await }
        }),
        Harvester::new("reddit", move || {
            let h = Arc::clone(&reddit);
            async move { h.collect().await }
        }),
        Harvester::new("tiktok", move || {
            let h = Arc::clone(&tiktok);
            async move { h.collect().await }
        }),
        Harvester::new("google_trends", move || {
            let h = Arc::clone(&google_trends);
            async move { h.collect().await }
        }),
        Harvester::new("rss_feeds", move || {
            let h = Arc::clone(&rss_feeds);
            async move { h.collect().await }
        }),
        Harvester::new("instagram", move || {
            let h = Arc::clone(&instagram);
            async move { h.collect().await }
        }),
    ])
}

/// GET `url` and return the body, mapping non-2xx to
/// [`SourceError::UnexpectedStatus`].
pub(crate) async fn fetch_text(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<String, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Log a harvester's yield. A harvester that gathered nothing warns.
pub(crate) fn log_collected(platform: &str, count: usize) {
    if count == 0 {
        tracing::warn!(platform, "harvester gathered no records");
    } else {
        tracing::info!(platform, count, "harvester collected records");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        pub(crate) fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    pub(crate) fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[test]
    fn empty_yield_logs_a_warning() {
        let (logs, _guard) = capture_logs();
        log_collected("TikTok", 0);
        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("harvester gathered no records"), "{text}");
    }

    #[test]
    fn non_empty_yield_logs_info() {
        let (logs, _guard) = capture_logs();
        log_collected("Reddit", 12);
        let text = logs.text();
        assert!(text.contains("INFO"), "{text}");
        assert!(!text.contains("WARN"), "{text}");
        assert!(text.contains("count=12"), "{text}");
    }

    #[test]
    fn default_harvesters_register_every_source() {
        let mut config = test_config();
        config.youtube_api_key = None;
        config.reddit_client_id = None;
        let harvesters = default_harvesters(&config).expect("client builds");
        let names: Vec<&str> = harvesters.iter().map(Harvester::name).collect();
        assert_eq!(
            names,
            vec![
                "youtube",
                "reddit",
                "tiktok",
                "google_trends",
                "rss_feeds",
                "instagram"
            ]
        );
    }

    fn test_config() -> AppConfig {
        AppConfig {
            log_level: "info".to_string(),
            gemini_api_key: None,
            line_channel_access_token: None,
            line_user_id: None,
            youtube_api_key: None,
            reddit_client_id: None,
            reddit_client_secret: None,
            reddit_user_agent: "test/1.0".to_string(),
            request_timeout_secs: 5,
            harvest_timeout_secs: 10,
            backend_timeout_secs: 10,
            payload_budget: 1000,
            models: Vec::new(),
            temperature: 0.7,
            message_limit: 4500,
            schedule: "0 0 0 * * MON".to_string(),
        }
    }
}
