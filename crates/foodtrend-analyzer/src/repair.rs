//! Structured-output parsing with truncation repair.
//!
//! Length-capped generation tends to stop mid-entry. When the raw text does
//! not parse, everything after the last complete array element is dropped
//! and the remaining open brackets are closed, so the caller gets the entries
//! that did arrive intact.

use serde::de::DeserializeOwned;

/// How a parse succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The text parsed as-is.
    Direct,
    /// The text parsed only after being cut back and re-balanced.
    Repaired { unclosed: usize },
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, etc.) on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse `raw` into `T`, falling back to [`repair_truncated`] on failure.
///
/// # Errors
///
/// Returns the original parse error when repair is impossible or the
/// repaired text still does not parse.
pub fn parse_with_repair<T: DeserializeOwned>(
    raw: &str,
) -> Result<(T, Recovery), serde_json::Error> {
    let text = strip_code_fences(raw);
    let direct_err = match serde_json::from_str::<T>(text) {
        Ok(value) => return Ok((value, Recovery::Direct)),
        Err(e) => e,
    };

    let unclosed = open_brackets(text).len();
    tracing::debug!(unclosed, error = %direct_err, "direct parse failed; attempting repair");

    let Some(repaired) = repair_truncated(text) else {
        return Err(direct_err);
    };
    match serde_json::from_str::<T>(&repaired) {
        Ok(value) => Ok((value, Recovery::Repaired { unclosed })),
        Err(_) => Err(direct_err),
    }
}

/// Cut `text` after the last complete array element and close what is open.
///
/// Only a `}` that closes an object sitting directly inside an array counts as
/// an element end, so a partially written trailing entry is always dropped.
/// Returns `None` if the text has no complete element.
pub fn repair_truncated(text: &str) -> Option<String> {
    let mut scan = Scanner::default();
    let mut last_cut: Option<(usize, Vec<char>)> = None;

    for (i, ch) in text.char_indices() {
        if scan.step(ch) == Step::ClosedObject && scan.stack.last() == Some(&'[') {
            last_cut = Some((i + ch.len_utf8(), scan.stack.clone()));
        }
    }

    let (cut, open) = last_cut?;
    let mut repaired = String::with_capacity(cut + open.len());
    repaired.push_str(&text[..cut]);
    repaired.extend(open.iter().rev().map(|&opener| closer_for(opener)));
    Some(repaired)
}

/// Openers left unmatched at the end of `text`, outermost first.
fn open_brackets(text: &str) -> Vec<char> {
    let mut scan = Scanner::default();
    for ch in text.chars() {
        scan.step(ch);
    }
    scan.stack
}

fn closer_for(opener: char) -> char {
    if opener == '{' {
        '}'
    } else {
        ']'
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    ClosedObject,
    Other,
}

/// String-aware bracket tracker.
#[derive(Debug, Default)]
struct Scanner {
    stack: Vec<char>,
    in_string: bool,
    escaped: bool,
}

impl Scanner {
    fn step(&mut self, ch: char) -> Step {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            return Step::Other;
        }

        match ch {
            '"' => self.in_string = true,
            '{' | '[' => self.stack.push(ch),
            '}' => {
                if self.stack.last() == Some(&'{') {
                    self.stack.pop();
                    return Step::ClosedObject;
                }
            }
            ']' => {
                if self.stack.last() == Some(&'[') {
                    self.stack.pop();
                }
            }
            _ => {}
        }
        Step::Other
    }
}
