//! Response Recovery: turns raw model text into a JSON value.
//!
//! One strict parse, then at most one repair pass, then give up. The repair pass
//! is heuristic and only fixes the breakage models actually produce:
//! markdown fences and leading prose, trailing commas, unescaped quotes and raw
//! newlines inside strings, and output cut off mid-document.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Longest prefix of offending text kept for diagnostics.
pub const SNIPPET_LIMIT: usize = 500;

/// Both the strict and the repaired parse failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("model output is not valid JSON (strict parse: {parse_error}; after repair: {repair_error})")]
pub struct RecoveryError {
    pub parse_error: String,
    pub repair_error: String,
    /// At most [`SNIPPET_LIMIT`] characters of the raw text.
    pub snippet: String,
}

/// One diagnostic record per recovery attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryEvent {
    Repaired {
        parse_error: String,
    },
    Failed {
        parse_error: String,
        repair_error: String,
        snippet: String,
    },
}

/// Receives recovery diagnostics. Recording is fire-and-forget: an `Err` is
/// logged and dropped, it never changes the parse outcome.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &RecoveryEvent) -> anyhow::Result<()>;
}

/// Default sink: writes the record to the tracing pipeline.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &RecoveryEvent) -> anyhow::Result<()> {
        match event {
            RecoveryEvent::Repaired { parse_error } => {
                warn!("Model output repaired after strict parse failed: {parse_error}");
            }
            RecoveryEvent::Failed {
                parse_error,
                repair_error,
                snippet,
            } => {
                error!(
                    "Model output unrecoverable (strict: {parse_error}; repaired: {repair_error}): {snippet:?}"
                );
            }
        }
        Ok(())
    }
}

/// Parses `raw` as JSON, repairing it once if the strict parse fails.
pub fn parse_with_recovery(raw: &str, sink: &dyn DiagnosticSink) -> Result<Value, RecoveryError> {
    let parse_error = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    let repaired = repair_json(raw);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            emit(sink, RecoveryEvent::Repaired { parse_error });
            Ok(value)
        }
        Err(e) => {
            let err = RecoveryError {
                parse_error,
                repair_error: e.to_string(),
                snippet: snippet(raw),
            };
            emit(
                sink,
                RecoveryEvent::Failed {
                    parse_error: err.parse_error.clone(),
                    repair_error: err.repair_error.clone(),
                    snippet: err.snippet.clone(),
                },
            );
            Err(err)
        }
    }
}

fn emit(sink: &dyn DiagnosticSink, event: RecoveryEvent) {
    if let Err(e) = sink.record(&event) {
        debug!("Dropped recovery diagnostic: {e}");
    }
}

fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_LIMIT).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Repair pass
// ────────────────────────────────────────────────────────────────────────────

/// Best-effort rewrite of almost-JSON into JSON. Never fails; the caller
/// finds out by parsing the result.
pub fn repair_json(raw: &str) -> String {
    let text = strip_fences(raw.trim());

    // Skip any prose in front of the document.
    let start = match text.find(|c: char| c == '{' || c == '[') {
        Some(i) => i,
        None => return text.to_string(),
    };
    let chars: Vec<char> = text[start..].chars().collect();

    let mut out = String::with_capacity(chars.len() + 16);
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    // Byte offset in `out` of the open string's quote, when that string is an object key.
    let mut open_key: Option<usize> = None;
    // Offset of the last completed key that has not been followed by a `:` yet.
    let mut dangling_key: Option<usize> = None;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if in_string {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                out.push(c);
                escaped = true;
            } else if c == '"' {
                if closes_string(&chars, i + 1) {
                    out.push('"');
                    in_string = false;
                    dangling_key = open_key.take();
                } else {
                    out.push_str("\\\"");
                }
            } else if c == '\n' {
                out.push_str("\\n");
            } else if c == '\r' {
                out.push_str("\\r");
            } else if c == '\t' {
                out.push_str("\\t");
            } else {
                out.push(c);
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                let after = out.trim_end().chars().last();
                if stack.last() == Some(&'{') && matches!(after, Some('{' | ',')) {
                    open_key = Some(out.len());
                }
                out.push(c);
            }
            ':' => {
                dangling_key = None;
                out.push(c);
            }
            '{' | '[' => {
                stack.push(c);
                out.push(c);
            }
            '}' | ']' => {
                let opener = if c == '}' { '{' } else { '[' };
                if stack.contains(&opener) {
                    // Close anything left open inside this container first.
                    while let Some(open) = stack.pop() {
                        trim_trailing_comma(&mut out);
                        out.push(closer_for(open));
                        if open == opener {
                            break;
                        }
                    }
                }
                // A closer with no matching opener is dropped.
                if stack.is_empty() {
                    // Root document complete; whatever follows is chatter.
                    return out;
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    // Truncated output: finish or drop the open string, drop a half-written
    // key or scalar, then close the open containers.
    if in_string {
        match open_key {
            Some(start) => out.truncate(start),
            None => {
                if escaped {
                    out.pop();
                }
                out.push('"');
            }
        }
    }
    if !stack.is_empty() {
        drop_incomplete_scalar(&mut out);
        if let Some(start) = dangling_key {
            out.truncate(start);
        }
        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
        if out.ends_with(':') {
            out.push_str("null");
        }
        while let Some(open) = stack.pop() {
            trim_trailing_comma(&mut out);
            out.push(closer_for(open));
        }
    }
    out
}

/// Whether a quote at `chars[next - 1]` ends the string, judged by the next
/// significant character.
fn closes_string(chars: &[char], next: usize) -> bool {
    match chars[next..].iter().find(|c| !c.is_whitespace()) {
        None => true,
        Some(c) => matches!(c, ',' | ':' | '}' | ']'),
    }
}

/// Removes a trailing bare token (`tr`, `-`, `2.`, `1e`) that is not a
/// complete JSON number or literal. Complete ones like `12` or `null` stay.
fn drop_incomplete_scalar(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    let token_start = out
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.')))
        .map_or(0, |i| i + 1);
    let token = &out[token_start..];
    if !token.is_empty() && serde_json::from_str::<Value>(token).is_err() {
        out.truncate(token_start);
    }
}

fn closer_for(open: char) -> char {
    if open == '{' {
        '}'
    } else {
        ']'
    }
}

fn trim_trailing_comma(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    if out[..trimmed_len].ends_with(',') {
        out.truncate(trimmed_len - 1);
    }
}

/// Strips a surrounding ```json ... ``` or ``` ... ``` code fence. An unclosed
/// fence (truncated output) keeps everything after the opener.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}
