/// Hard per-message ceiling enforced by the push transport (characters).
///
/// The configured message limit must stay strictly below this value.
pub const TRANSPORT_MESSAGE_CEILING: usize = 5000;

/// One generative model in the synthesis fallback sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub model: String,
    /// Output cap requested from this model. Smaller fallbacks get smaller caps.
    pub max_output_tokens: u32,
}

impl ModelCandidate {
    pub fn new(model: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_output_tokens,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub gemini_api_key: Option<String>,
    pub line_channel_access_token: Option<String>,
    pub line_user_id: Option<String>,
    pub youtube_api_key: Option<String>,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
    pub request_timeout_secs: u64,
    pub harvest_timeout_secs: u64,
    pub backend_timeout_secs: u64,
    pub payload_budget: usize,
    pub models: Vec<ModelCandidate>,
    pub temperature: f32,
    pub message_limit: usize,
    pub schedule: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field(
                "line_channel_access_token",
                &redact(&self.line_channel_access_token),
            )
            .field("line_user_id", &redact(&self.line_user_id))
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("reddit_client_id", &redact(&self.reddit_client_id))
            .field("reddit_client_secret", &redact(&self.reddit_client_secret))
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("harvest_timeout_secs", &self.harvest_timeout_secs)
            .field("backend_timeout_secs", &self.backend_timeout_secs)
            .field("payload_budget", &self.payload_budget)
            .field("models", &self.models)
            .field("temperature", &self.temperature)
            .field("message_limit", &self.message_limit)
            .field("schedule", &self.schedule)
            .finish()
    }
}
