//! Message normalization.
//!
//! Raw `process_error` payloads arrive either as plain text or as a
//! JSON-encoded structure carrying a `message` field. Normalization turns
//! both into a bounded, single-line display message. Parse failures are the
//! expected path for plain-text errors, so the parse attempt returns a
//! tagged outcome instead of an error and this module never fails.

use crate::config::NormalizePolicy;
use crate::records::{ErrorRecord, NormalizedRecord};

/// Organization whose work areas collide across cruises and need the
/// cruise identifier appended for disambiguation.
const CRUISE_ANNOTATED_ORG: &str = "NATURE TRUST";

/// Outcome of attempting to read a structured message out of a raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Valid JSON with a string `message` field.
    Parsed(String),
    /// Not JSON at all; the raw string is the message.
    NotJson,
    /// Valid JSON but no usable `message` field.
    NoMessageField,
}

/// Attempt to extract a structured `message` from a raw error payload.
pub fn parse_attempt(raw: &str) -> ParseOutcome {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => match value.get("message").and_then(|m| m.as_str()) {
            Some(message) => ParseOutcome::Parsed(message.to_string()),
            None => ParseOutcome::NoMessageField,
        },
        Err(_) => ParseOutcome::NotJson,
    }
}

/// Derive the display message for one raw payload. Total: every input
/// produces a value.
pub fn display_message(raw: &str, policy: &NormalizePolicy) -> String {
    let candidate = match parse_attempt(raw) {
        ParseOutcome::Parsed(message) => message,
        ParseOutcome::NotJson | ParseOutcome::NoMessageField => raw.to_string(),
    };

    // The station name is already a record field, so the canonical label
    // carries no parameter.
    if candidate.starts_with(&policy.latlong_prefix) {
        return policy.latlong_replacement.clone();
    }

    // Single line, bounded before quoting so the wrapper never gets cut.
    let single_line = collapse_newlines(&candidate);
    let truncated: String = single_line.chars().take(policy.max_message_len).collect();
    format!("\"{}\"", truncated)
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

/// Normalize one record: derive its display message and apply the
/// organization-conditioned work-area rule.
pub fn normalize(record: ErrorRecord, policy: &NormalizePolicy) -> NormalizedRecord {
    let message = display_message(&record.process_error, policy);
    let work_area = if record.organization == CRUISE_ANNOTATED_ORG {
        format!(
            "{}[cruise={}]",
            record.work_area,
            record.cruise.as_deref().unwrap_or("")
        )
    } else {
        record.work_area.clone()
    };
    NormalizedRecord {
        record,
        display_message: message,
        work_area,
    }
}

/// Normalize a whole batch, preserving input order.
pub fn normalize_batch(records: Vec<ErrorRecord>, policy: &NormalizePolicy) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .map(|record| normalize(record, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ErrorRecord;

    fn policy() -> NormalizePolicy {
        NormalizePolicy::default()
    }

    fn make_record(org: &str, work_area: &str, cruise: Option<&str>, err: &str) -> ErrorRecord {
        ErrorRecord {
            organization: org.to_string(),
            work_area: work_area.to_string(),
            cruise: cruise.map(str::to_string),
            station: "QU39".to_string(),
            device_model: "SBE19plus".to_string(),
            cast_type: "profile".to_string(),
            hakai_id: "080217".to_string(),
            process_error: err.to_string(),
        }
    }

    #[test]
    fn test_parse_attempt_structured() {
        assert_eq!(
            parse_attempt(r#"{"message": "sensor dropout"}"#),
            ParseOutcome::Parsed("sensor dropout".to_string())
        );
    }

    #[test]
    fn test_parse_attempt_plain_text() {
        assert_eq!(parse_attempt("sensor dropout"), ParseOutcome::NotJson);
    }

    #[test]
    fn test_parse_attempt_json_without_message() {
        assert_eq!(parse_attempt(r#"{"code": 17}"#), ParseOutcome::NoMessageField);
        // Non-object JSON parses but has no message field either.
        assert_eq!(parse_attempt("42"), ParseOutcome::NoMessageField);
    }

    #[test]
    fn test_latlong_prefix_replaced() {
        let raw = r#"{"message": "No lat/long information available for station X"}"#;
        assert_eq!(display_message(raw, &policy()), "Unknown reference station");
    }

    #[test]
    fn test_latlong_prefix_is_prefix_match_only() {
        // Suffix occurrences do not trigger the replacement.
        let raw = r#"{"message": "warning: No lat/long information available for station X"}"#;
        let message = display_message(raw, &policy());
        assert!(message.starts_with('"'));
        assert!(message.contains("warning"));
    }

    #[test]
    fn test_plain_text_is_quoted() {
        assert_eq!(display_message("bad cast", &policy()), "\"bad cast\"");
    }

    #[test]
    fn test_json_without_message_falls_back_to_raw() {
        let message = display_message(r#"{"code": 17}"#, &policy());
        assert_eq!(message, "\"{\"code\": 17}\"");
    }

    #[test]
    fn test_newlines_collapse_to_spaces() {
        let message = display_message("line one\nline two\r\nline three", &policy());
        assert_eq!(message, "\"line one line two line three\"");
        assert!(!message.contains('\n'));
    }

    #[test]
    fn test_truncation_applies_before_quoting() {
        let raw = "x".repeat(500);
        let message = display_message(&raw, &policy());
        // 300 payload chars plus the two quote characters.
        assert_eq!(message.chars().count(), 302);
        assert!(message.starts_with('"') && message.ends_with('"'));
    }

    #[test]
    fn test_normalization_is_total_and_bounded() {
        for raw in ["", "plain", "{broken", "{\"message\": 5}", "\u{1f30a}cast"] {
            let message = display_message(raw, &policy());
            assert!(!message.is_empty());
            assert!(message.chars().count() <= 302);
            assert!(!message.contains('\n'));
        }
    }

    #[test]
    fn test_renormalizing_quoted_output_only_requotes() {
        let once = display_message("sensor dropout", &policy());
        let twice = display_message(&once, &policy());
        assert_eq!(twice, format!("\"{}\"", once));
    }

    #[test]
    fn test_nature_trust_work_area_annotated() {
        let record = make_record("NATURE TRUST", "Zone1", Some("C99"), "bad cast");
        let normalized = normalize(record, &policy());
        assert_eq!(normalized.work_area, "Zone1[cruise=C99]");
    }

    #[test]
    fn test_nature_trust_without_cruise() {
        let record = make_record("NATURE TRUST", "Zone1", None, "bad cast");
        let normalized = normalize(record, &policy());
        assert_eq!(normalized.work_area, "Zone1[cruise=]");
    }

    #[test]
    fn test_other_org_work_area_untouched() {
        let record = make_record("HAKAI", "Zone1", Some("C99"), "bad cast");
        let normalized = normalize(record, &policy());
        assert_eq!(normalized.work_area, "Zone1");
    }

    #[test]
    fn test_batch_preserves_order() {
        let records = vec![
            make_record("HAKAI", "A", None, "first"),
            make_record("HAKAI", "A", None, "second"),
        ];
        let normalized = normalize_batch(records, &policy());
        assert_eq!(normalized[0].record.process_error, "first");
        assert_eq!(normalized[1].record.process_error, "second");
    }
}
