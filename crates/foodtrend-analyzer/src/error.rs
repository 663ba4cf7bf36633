use foodtrend_core::TrendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("backend returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("backend returned no text (finish reason: {finish_reason})")]
    EmptyResponse { finish_reason: String },

    #[error("backend call timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("backend output unusable: {0}")]
    Trend(#[from] TrendError),

    #[error("no model candidates configured")]
    NoCandidates,

    #[error("all {attempted} model candidates failed")]
    Exhausted { attempted: usize },
}
