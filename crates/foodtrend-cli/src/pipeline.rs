//! One collection → synthesis → delivery cycle.

use std::time::Duration;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use foodtrend_analyzer::{serialize, GeminiClient, GenerativeBackend, Synthesizer};
use foodtrend_core::{AppConfig, ConfigError, Corpus};
use foodtrend_notifier::{format_and_split, today_jst, LineClient, MessageBlock};
use foodtrend_sources::{collect_all, default_harvesters, Harvester};

/// Per-cycle knobs taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub harvest_timeout: Duration,
    pub payload_budget: usize,
    pub message_limit: usize,
    /// Date printed in the report header.
    pub date: NaiveDate,
}

impl CycleSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            harvest_timeout: Duration::from_secs(config.harvest_timeout_secs),
            payload_budget: config.payload_budget,
            message_limit: config.message_limit,
            date: today_jst(),
        }
    }
}

/// Where the finished blocks go.
pub enum Delivery {
    /// Build the blocks but send nothing.
    DryRun,
    Line { client: LineClient, to: String },
}

/// What a successful cycle produced.
#[derive(Debug)]
pub struct CycleReport {
    pub total_records: usize,
    pub trends: usize,
    pub blocks: Vec<MessageBlock>,
}

/// Run every harvester and refuse an empty corpus.
///
/// # Errors
///
/// Fails when no source produced a single record.
pub async fn collect_corpus(harvesters: Vec<Harvester>, timeout: Duration) -> anyhow::Result<Corpus> {
    let corpus = collect_all(harvesters, timeout).await;
    if corpus.is_empty() {
        bail!("every source returned zero records; aborting before synthesis");
    }
    Ok(corpus)
}

/// Collect, synthesize, format, and deliver one report.
///
/// # Errors
///
/// Fails on an empty corpus, when every model candidate fails, when the
/// report cannot be segmented, or when delivery is rejected.
pub async fn run_cycle<B: GenerativeBackend>(
    harvesters: Vec<Harvester>,
    synthesizer: &Synthesizer<B>,
    delivery: &Delivery,
    settings: &CycleSettings,
) -> anyhow::Result<CycleReport> {
    let corpus = collect_corpus(harvesters, settings.harvest_timeout).await?;
    let total_records = corpus.total();

    let payload =
        serialize(&corpus, settings.payload_budget).context("failed to serialize corpus")?;
    tracing::info!(
        chars = payload.char_len(),
        truncated = payload.is_truncated(),
        "corpus serialized"
    );

    let result = synthesizer
        .synthesize(&payload)
        .await
        .context("trend synthesis failed")?;

    let blocks = format_and_split(&result, settings.date, settings.message_limit)
        .context("failed to segment report")?;

    match delivery {
        Delivery::DryRun => {
            tracing::info!(blocks = blocks.len(), "dry run: skipping delivery");
        }
        Delivery::Line { client, to } => {
            client
                .push(to, &blocks)
                .await
                .context("LINE delivery failed")?;
        }
    }

    Ok(CycleReport {
        total_records,
        trends: result.len(),
        blocks,
    })
}

/// Build production clients from `config` and run one cycle.
///
/// # Errors
///
/// Fails fast on missing credentials, then as [`run_cycle`] does.
pub async fn run_from_config(config: &AppConfig, dry_run: bool) -> anyhow::Result<CycleReport> {
    let gemini_key = config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

    let delivery = if dry_run {
        Delivery::DryRun
    } else {
        let token = config
            .line_channel_access_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("LINE_CHANNEL_ACCESS_TOKEN".to_string()))
            .context("delivery credentials are required unless --dry-run is set")?;
        let user_id = config
            .line_user_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("LINE_USER_ID".to_string()))
            .context("delivery credentials are required unless --dry-run is set")?;
        Delivery::Line {
            client: LineClient::new(token, config.request_timeout_secs)?,
            to: user_id.to_string(),
        }
    };

    let backend = GeminiClient::new(gemini_key, config.backend_timeout_secs)?;
    let synthesizer = Synthesizer::new(
        backend,
        config.models.clone(),
        config.temperature,
        Duration::from_secs(config.backend_timeout_secs),
    );
    let harvesters = default_harvesters(config)?;

    run_cycle(
        harvesters,
        &synthesizer,
        &delivery,
        &CycleSettings::from_config(config),
    )
    .await
}
