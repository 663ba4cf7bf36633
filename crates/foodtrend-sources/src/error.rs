use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("credentials not configured: {0}")]
    MissingCredentials(&'static str),

    #[error("Reddit API error: {0}")]
    Reddit(String),

    #[error("harvester timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("harvester panicked: {0}")]
    Panicked(String),
}
