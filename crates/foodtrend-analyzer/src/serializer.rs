//! Corpus → bounded prompt payload.

use foodtrend_core::Corpus;

use crate::error::AnalyzerError;

/// Appended after a cut so the model knows the data does not end there.
pub const TRUNCATION_MARKER: &str = "\n... (truncated: corpus exceeds payload budget)";

/// Encoded corpus text handed to the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedPayload {
    text: String,
    truncated: bool,
}

impl SerializedPayload {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, which is the unit the budget is measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Encode `corpus` as compact JSON, cut to `budget` characters if needed.
///
/// The cut is blind: the kept prefix is not re-balanced, and
/// [`TRUNCATION_MARKER`] is appended. Output never exceeds
/// `budget + TRUNCATION_MARKER.chars().count()` characters.
///
/// # Errors
///
/// Returns [`AnalyzerError::Encode`] if the corpus cannot be encoded.
pub fn serialize(corpus: &Corpus, budget: usize) -> Result<SerializedPayload, AnalyzerError> {
    let encoded = serde_json::to_string(corpus).map_err(AnalyzerError::Encode)?;

    let Some((cut, _)) = encoded.char_indices().nth(budget) else {
        return Ok(SerializedPayload {
            text: encoded,
            truncated: false,
        });
    };

    let mut text = String::with_capacity(cut + TRUNCATION_MARKER.len());
    text.push_str(&encoded[..cut]);
    text.push_str(TRUNCATION_MARKER);

    tracing::debug!(
        encoded_chars = encoded.chars().count(),
        budget,
        "payload truncated to budget"
    );

    Ok(SerializedPayload {
        text,
        truncated: true,
    })
}

#[cfg(test)]
mod tests {
    use foodtrend_core::Record;

    use super::*;

    fn corpus() -> Corpus {
        let mut corpus = Corpus::with_sources(["reddit", "youtube"]);
        corpus.append(
            "youtube",
            vec![Record::new("YouTube")
                .with("title", "抹茶ティラミス")
                .with("view_count", 120_000)],
        );
        corpus.append(
            "reddit",
            vec![Record::new("Reddit").with("title", "Butter board 2.0")],
        );
        corpus
    }

    #[test]
    fn fits_within_budget_untouched() {
        let payload = serialize(&corpus(), 10_000).unwrap();
        assert!(!payload.is_truncated());
        let round_trip: serde_json::Value = serde_json::from_str(payload.as_str()).unwrap();
        assert_eq!(round_trip["youtube"][0]["platform"], "YouTube");
        assert_eq!(round_trip["reddit"][0]["title"], "Butter board 2.0");
    }

    #[test]
    fn same_corpus_serializes_identically() {
        assert_eq!(
            serialize(&corpus(), 10_000).unwrap(),
            serialize(&corpus(), 10_000).unwrap()
        );
        assert_eq!(serialize(&corpus(), 40).unwrap(), serialize(&corpus(), 40).unwrap());
    }

    #[test]
    fn oversized_payload_is_cut_and_marked() {
        let full = serialize(&corpus(), usize::MAX).unwrap();
        let budget = 40;
        let payload = serialize(&corpus(), budget).unwrap();

        assert!(payload.is_truncated());
        assert!(payload.as_str().ends_with(TRUNCATION_MARKER));
        let kept: String = full.as_str().chars().take(budget).collect();
        assert!(payload.as_str().starts_with(&kept));
    }

    #[test]
    fn output_is_bounded_for_every_budget() {
        let marker = TRUNCATION_MARKER.chars().count();
        let full_len = serialize(&corpus(), usize::MAX).unwrap().char_len();
        for budget in 0..=full_len + 5 {
            let payload = serialize(&corpus(), budget).unwrap();
            assert!(
                payload.char_len() <= budget + marker,
                "budget {budget} produced {} chars",
                payload.char_len()
            );
            assert_eq!(payload.is_truncated(), full_len > budget);
        }
    }

    #[test]
    fn cut_respects_multibyte_characters() {
        // Budget lands inside the Japanese title; slicing by bytes would panic.
        for budget in 1..60 {
            let payload = serialize(&corpus(), budget).unwrap();
            assert!(payload.char_len() <= budget + TRUNCATION_MARKER.chars().count());
        }
    }

    #[test]
    fn empty_corpus_encodes_as_empty_object() {
        let payload = serialize(&Corpus::default(), 100).unwrap();
        assert_eq!(payload.as_str(), "{}");
    }
}
