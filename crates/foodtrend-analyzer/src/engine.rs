//! Synthesis engine: ordered model fallback around repair-aware parsing.

use std::time::Duration;

use foodtrend_core::{AnalysisResult, ModelCandidate, TrendEntry};
use serde::Deserialize;

use crate::backend::{GenerationRequest, GenerativeBackend};
use crate::error::AnalyzerError;
use crate::prompt::{build_prompt, MAX_TRENDS, SCHEMA_TAG, SYSTEM_INSTRUCTION};
use crate::repair::{parse_with_repair, Recovery};
use crate::serializer::SerializedPayload;

/// Characters of raw output logged when a candidate's response is unusable.
const LOGGED_TAIL_CHARS: usize = 300;

/// Shape the backend is instructed to emit.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    trends: Vec<TrendEntry>,
    #[serde(default)]
    summary: String,
}

/// Drives one synthesis per call across the configured candidates.
pub struct Synthesizer<B> {
    backend: B,
    candidates: Vec<ModelCandidate>,
    temperature: f32,
    call_timeout: Duration,
}

impl<B: GenerativeBackend> Synthesizer<B> {
    pub fn new(
        backend: B,
        candidates: Vec<ModelCandidate>,
        temperature: f32,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            candidates,
            temperature,
            call_timeout,
        }
    }

    /// Distill `payload` into a ranked [`AnalysisResult`].
    ///
    /// Candidates are tried strictly in order, one request each. A request
    /// error, timeout, unparseable output, or empty trend list moves on to
    /// the next candidate.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::NoCandidates`] if none are configured and
    /// [`AnalyzerError::Exhausted`] once every candidate has failed.
    pub async fn synthesize(
        &self,
        payload: &SerializedPayload,
    ) -> Result<AnalysisResult, AnalyzerError> {
        if self.candidates.is_empty() {
            return Err(AnalyzerError::NoCandidates);
        }

        let prompt = build_prompt(payload.as_str());

        for (attempt, candidate) in self.candidates.iter().enumerate() {
            match self.attempt(candidate, &prompt).await {
                Ok(result) => {
                    tracing::info!(
                        model = %candidate.model,
                        attempt = attempt + 1,
                        trends = result.len(),
                        "synthesis complete"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        model = %candidate.model,
                        attempt = attempt + 1,
                        error = %e,
                        "synthesis candidate failed"
                    );
                }
            }
        }

        Err(AnalyzerError::Exhausted {
            attempted: self.candidates.len(),
        })
    }

    async fn attempt(
        &self,
        candidate: &ModelCandidate,
        prompt: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let request = GenerationRequest {
            model: &candidate.model,
            instruction: SYSTEM_INSTRUCTION,
            prompt,
            schema_tag: SCHEMA_TAG,
            temperature: self.temperature,
            max_output_tokens: candidate.max_output_tokens,
        };

        let raw = tokio::time::timeout(self.call_timeout, self.backend.generate(&request))
            .await
            .map_err(|_| AnalyzerError::TimedOut {
                secs: self.call_timeout.as_secs(),
            })??;

        let (analysis, recovery) = parse_with_repair::<RawAnalysis>(&raw).map_err(|source| {
            tracing::info!(
                model = %candidate.model,
                tail = %tail_chars(&raw, LOGGED_TAIL_CHARS),
                "unparseable backend response"
            );
            AnalyzerError::Deserialize {
                context: format!("{} response", candidate.model),
                source,
            }
        })?;

        if let Recovery::Repaired { unclosed } = recovery {
            tracing::warn!(
                model = %candidate.model,
                unclosed,
                kept = analysis.trends.len(),
                "backend response was truncated; using repaired output"
            );
        }

        Ok(AnalysisResult::from_ranked(
            analysis.trends,
            analysis.summary,
            MAX_TRENDS,
        )?)
    }
}

fn tail_chars(text: &str, n: usize) -> &str {
    let count = text.chars().count();
    if count <= n {
        return text;
    }
    text.char_indices()
        .nth(count - n)
        .map_or(text, |(i, _)| &text[i..])
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
