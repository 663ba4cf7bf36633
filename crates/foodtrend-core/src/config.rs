use crate::app_config::{AppConfig, ModelCandidate, TRANSPORT_MESSAGE_CEILING};
use crate::ConfigError;

const DEFAULT_MODELS: &str = "gemini-2.5-flash:8192,gemini-2.5-flash-lite:4096";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are all optional here: each pipeline stage decides whether a
/// missing credential is fatal (synthesis, delivery) or just disables one
/// harvester.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("FOODTREND_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("FOODTREND_REQUEST_TIMEOUT_SECS", "15")?;
    let harvest_timeout_secs = parse_u64("FOODTREND_HARVEST_TIMEOUT_SECS", "180")?;
    let backend_timeout_secs = parse_u64("FOODTREND_BACKEND_TIMEOUT_SECS", "120")?;
    let payload_budget = parse_usize("FOODTREND_PAYLOAD_BUDGET", "30000")?;

    let models = parse_models(&or_default("FOODTREND_MODELS", DEFAULT_MODELS))
        .map_err(|reason| invalid("FOODTREND_MODELS", reason))?;

    let temperature = or_default("FOODTREND_TEMPERATURE", "0.7")
        .parse::<f32>()
        .map_err(|e| invalid("FOODTREND_TEMPERATURE", e.to_string()))?;

    let message_limit = parse_usize("FOODTREND_MESSAGE_LIMIT", "4500")?;
    if message_limit == 0 || message_limit >= TRANSPORT_MESSAGE_CEILING {
        return Err(invalid(
            "FOODTREND_MESSAGE_LIMIT",
            format!("must be between 1 and {}", TRANSPORT_MESSAGE_CEILING - 1),
        ));
    }

    Ok(AppConfig {
        log_level,
        gemini_api_key: optional("GEMINI_API_KEY"),
        line_channel_access_token: optional("LINE_CHANNEL_ACCESS_TOKEN"),
        line_user_id: optional("LINE_USER_ID"),
        youtube_api_key: optional("YOUTUBE_API_KEY"),
        reddit_client_id: optional("REDDIT_CLIENT_ID"),
        reddit_client_secret: optional("REDDIT_CLIENT_SECRET"),
        reddit_user_agent: or_default("REDDIT_USER_AGENT", "FoodTrendBot/1.0"),
        request_timeout_secs,
        harvest_timeout_secs,
        backend_timeout_secs,
        payload_budget,
        models,
        temperature,
        message_limit,
        schedule: or_default("FOODTREND_SCHEDULE", "0 0 0 * * MON"),
    })
}

/// Parse an ordered `model:max_output_tokens` list, e.g.
/// `gemini-2.5-flash:8192,gemini-2.5-flash-lite:4096`.
fn parse_models(raw: &str) -> Result<Vec<ModelCandidate>, String> {
    let mut models = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (model, cap) = item
            .rsplit_once(':')
            .ok_or_else(|| format!("expected model:max_output_tokens, got \"{item}\""))?;
        let model = model.trim();
        if model.is_empty() {
            return Err(format!("empty model name in \"{item}\""));
        }
        let cap = cap
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("bad output cap in \"{item}\": {e}"))?;
        models.push(ModelCandidate::new(model, cap));
    }

    if models.is_empty() {
        return Err("at least one model candidate is required".to_string());
    }
    Ok(models)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
