//! Splits formatted report text into transport-sized blocks.

use chrono::NaiveDate;
use foodtrend_core::AnalysisResult;

use crate::error::NotifierError;
use crate::format::{format_message, LINE_SEPARATOR};

/// One independently sendable chunk of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock(String);

impl MessageBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

/// Render `result` and split it into blocks of at most `limit` characters.
///
/// # Errors
///
/// See [`split_message`].
pub fn format_and_split(
    result: &AnalysisResult,
    date: NaiveDate,
    limit: usize,
) -> Result<Vec<MessageBlock>, NotifierError> {
    split_message(&format_message(result, date), limit)
}

/// Greedily pack whole lines into blocks of at most `limit` characters.
///
/// Joining the blocks with the line separator reproduces `text` exactly.
/// Text that already fits comes back as a single block. Lines are never
/// split internally.
///
/// # Errors
///
/// Returns [`NotifierError::LineTooLong`] if a single line exceeds `limit`.
pub fn split_message(text: &str, limit: usize) -> Result<Vec<MessageBlock>, NotifierError> {
    if text.chars().count() <= limit {
        return Ok(vec![MessageBlock(text.to_string())]);
    }

    let separator_len = LINE_SEPARATOR.chars().count();
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for (index, line) in text.split(LINE_SEPARATOR).enumerate() {
        let line_len = line.chars().count();
        if line_len > limit {
            return Err(NotifierError::LineTooLong {
                line_number: index + 1,
                chars: line_len,
                limit,
            });
        }

        if !current.is_empty() && current_len + separator_len + line_len > limit {
            blocks.push(MessageBlock(current.join(LINE_SEPARATOR)));
            current.clear();
            current_len = 0;
        }

        if !current.is_empty() {
            current_len += separator_len;
        }
        current.push(line);
        current_len += line_len;
    }

    blocks.push(MessageBlock(current.join(LINE_SEPARATOR)));
    Ok(blocks)
}
