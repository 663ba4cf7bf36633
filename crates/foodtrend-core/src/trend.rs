//! Distilled trend entries and the ranked analysis result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One ranked trend as returned by the generative backend.
///
/// Field names match the JSON schema the backend is instructed to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub rank: u32,
    pub product_name_en: String,
    /// Localized (Japanese) product name.
    pub product_name_ja: String,
    pub origin_country: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub metrics: String,
    pub target_audience: String,
    pub why_trending: String,
    pub japan_forecast: String,
    #[serde(default)]
    pub reference_urls: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrendError {
    #[error("analysis contains no trend entries")]
    Empty,
}

/// Ranked trends plus a short summary.
///
/// Only constructible through [`AnalysisResult::from_ranked`], so ranks are
/// always `1..=len` in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    trends: Vec<TrendEntry>,
    summary: String,
}

impl AnalysisResult {
    /// Build a result from backend entries.
    ///
    /// Entries are ordered by their reported rank (ties keep backend order),
    /// cut to `max_trends`, and renumbered densely from 1.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Empty`] if no entries remain.
    pub fn from_ranked(
        mut trends: Vec<TrendEntry>,
        summary: impl Into<String>,
        max_trends: usize,
    ) -> Result<Self, TrendError> {
        trends.sort_by_key(|t| t.rank);
        trends.truncate(max_trends);
        if trends.is_empty() {
            return Err(TrendError::Empty);
        }

        for (i, trend) in trends.iter_mut().enumerate() {
            trend.rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
        }

        Ok(Self {
            trends,
            summary: summary.into(),
        })
    }

    pub fn trends(&self) -> &[TrendEntry] {
        &self.trends
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}
