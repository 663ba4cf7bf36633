use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("LINE API returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("line {line_number} is {chars} chars, over the {limit}-char block limit")]
    LineTooLong {
        line_number: usize,
        chars: usize,
        limit: usize,
    },

    #[error("{count} message blocks exceed the {max}-message push limit")]
    TooManyBlocks { count: usize, max: usize },

    #[error("no message blocks to send")]
    NothingToSend,
}
