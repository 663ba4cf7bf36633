//! Shared configuration and domain types for the food-trend pipeline.
//!
//! Every stage of the pipeline speaks in terms of the types defined here:
//! harvesters produce [`Record`]s, the coordinator assembles a [`Corpus`],
//! and the analyzer hands an [`AnalysisResult`] to the notifier.

pub mod app_config;
pub mod config;
pub mod error;
pub mod record;
pub mod trend;

pub use app_config::{AppConfig, ModelCandidate, TRANSPORT_MESSAGE_CEILING};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use record::{Corpus, Record};
pub use trend::{AnalysisResult, TrendEntry, TrendError};
