//! Parsing of raw source files, with a best-effort repair pass.
//!
//! Export tools truncate files mid-write, leave trailing separators and
//! forget to close strings often enough that a strict parser would throw
//! away a depressing number of otherwise-fine archives. The contract here:
//! strict parse first; on failure, repair and reparse; on continued
//! failure, log and return an empty record sequence for *that file only*.
//! The batch as a whole never aborts.

use crate::error::{ErrorKind, Result};
use crate::raw::RawRecord;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Parse one named source file into its record sequence.
///
/// Never returns an error: per-file failures are reported to the log and
/// yield an empty vec, per the batch contract. Non-object array elements
/// are silently skipped.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_records(name: &str, text: &str) -> Vec<RawRecord> {
    match try_parse_records(name, text) {
        Ok(records) => records,
        Err(err) => {
            warn!(source = name, error = %err, "skipping unparseable source file");
            Vec::new()
        }
    }
}

fn try_parse_records(name: &str, text: &str) -> Result<Vec<RawRecord>> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(first_err) => {
            debug!(source = name, error = %first_err, "strict parse failed, attempting repair");
            let repaired = repair(text);
            serde_json::from_str::<Value>(&repaired)
                .map_err(|e| ErrorKind::SourceParse(format!("{name}: {e}")))?
        }
    };
    let Value::Array(items) = value else {
        exn::bail!(ErrorKind::NotARecordArray(name.to_string()));
    };
    Ok(items.into_iter().filter_map(RawRecord::from_value).collect())
}

/// Heuristic JSON repair.
///
/// Handles the malformations actually seen in the wild: unterminated
/// strings, trailing separators before a closer, values cut off mid-token
/// and files truncated before their closing brackets. It is *not* a
/// general-purpose fixer; output still goes through the strict parser.
pub fn repair(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '{' => {
                stack.push('}');
                out.push(ch);
            }
            '[' => {
                stack.push(']');
                out.push(ch);
            }
            '}' | ']' => {
                trim_dangling(&mut out);
                stack.pop();
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    if escaped {
        // A lone backslash at the cut point; drop it so the quote below
        // terminates the string instead of being swallowed.
        out.pop();
    }
    if in_string {
        out.push('"');
    }
    while let Some(closer) = stack.pop() {
        trim_dangling(&mut out);
        out.push(closer);
    }
    out
}

/// Trim whatever incomplete token sits at the end of the buffer so a closer
/// can legally follow: trailing separators, a dangling `key:` with no
/// value, or a literal/number cut off mid-token.
fn trim_dangling(out: &mut String) {
    loop {
        let trimmed = out.trim_end();
        out.truncate(trimmed.len());
        match out.chars().last() {
            Some(',') => {
                out.pop();
            }
            Some(':') => {
                out.push_str("null");
                return;
            }
            Some(c) if c.is_ascii_alphabetic() => {
                // A bare token: fine if it's a complete literal, otherwise
                // (e.g. `tru`, `fals`) strip it and retry.
                let tail_start = out.rfind(|c: char| !c.is_ascii_alphabetic()).map_or(0, |i| i + 1);
                match &out[tail_start..] {
                    "true" | "false" | "null" => return,
                    _ => out.truncate(tail_start),
                }
            }
            Some('.') | Some('e') | Some('E') | Some('+') | Some('-') => {
                // Number cut off mid-token (`12.`, `1e`, `1e+`).
                out.pop();
            }
            _ => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn reparse(broken: &str) -> Value {
        serde_json::from_str(&repair(broken)).expect("repaired output should parse")
    }

    #[test]
    fn well_formed_input_is_untouched() {
        let text = r#"[{"type": "quote", "quote-text": "Hi"}]"#;
        assert_eq!(repair(text), text);
    }

    #[test]
    fn closes_unterminated_string() {
        let repaired = reparse(r#"[{"type": "quote", "quote-text": "Hi"#);
        assert_eq!(repaired, json!([{"type": "quote", "quote-text": "Hi"}]));
    }

    #[test]
    fn drops_trailing_separator() {
        let repaired = reparse(r#"[{"a": 1}, {"b": 2},]"#);
        assert_eq!(repaired, json!([{"a": 1}, {"b": 2}]));
    }

    #[test]
    fn completes_truncated_tail() {
        let repaired = reparse(r#"[{"a": 1}, {"b":"#);
        assert_eq!(repaired, json!([{"a": 1}, {"b": null}]));
    }

    #[test]
    fn trims_truncated_literal_and_number() {
        assert_eq!(reparse(r#"[{"a": tru"#), json!([{"a": null}]));
        assert_eq!(reparse(r#"[{"n": 12."#), json!([{"n": 12}]));
    }

    #[test]
    fn parse_records_skips_non_objects() {
        let records = parse_records("texts", r#"[{"type": "regular"}, 42, "stray"]"#);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn unparseable_file_yields_empty_not_error() {
        assert!(parse_records("texts", "not json at all {{{ \0").is_empty());
        assert!(parse_records("texts", r#"{"not": "an array"}"#).is_empty());
    }

    #[test]
    fn repaired_file_still_yields_records() {
        let records = parse_records("texts", r#"[{"type": "regular", "body": "one"}, {"type": "regular", "body": "tw"#);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text(&["body"]), Some("tw"));
    }
}
