//! Record types flowing through the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// One raw per-cast processing failure as received from the source system.
///
/// The ingestion collaborator guarantees `process_error` is non-empty
/// (casts without an error are filtered server-side) and hands records over
/// in a strictly ordered sequence. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub organization: String,
    pub work_area: String,
    #[serde(default)]
    pub cruise: Option<String>,
    pub station: String,
    pub device_model: String,
    #[serde(default)]
    pub cast_type: String,
    pub hakai_id: String,
    pub process_error: String,
}

impl ErrorRecord {
    /// Grouping keys must be total; an empty key field is a fatal
    /// classification failure, not something to silently drop.
    pub fn validate(&self) -> Result<(), TriageError> {
        let missing = |field| TriageError::MissingField {
            field,
            hakai_id: self.hakai_id.clone(),
        };
        if self.hakai_id.is_empty() {
            return Err(TriageError::MissingField {
                field: "hakai_id",
                hakai_id: "<unknown>".to_string(),
            });
        }
        if self.organization.is_empty() {
            return Err(missing("organization"));
        }
        if self.work_area.is_empty() {
            return Err(missing("work_area"));
        }
        if self.process_error.is_empty() {
            return Err(missing("process_error"));
        }
        Ok(())
    }
}

/// An [`ErrorRecord`] plus its derived display message and adjusted work
/// area. Produced once by the normalizer, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub record: ErrorRecord,
    /// Bounded, single-line, quoted rendering of `process_error`.
    pub display_message: String,
    /// `record.work_area`, possibly annotated with the cruise identifier
    /// for organizations whose work areas otherwise collide.
    pub work_area: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(org: &str, id: &str, err: &str) -> ErrorRecord {
        ErrorRecord {
            organization: org.to_string(),
            work_area: "QU39".to_string(),
            cruise: None,
            station: "QU39-1".to_string(),
            device_model: "SBE19plus".to_string(),
            cast_type: "profile".to_string(),
            hakai_id: id.to_string(),
            process_error: err.to_string(),
        }
    }

    #[test]
    fn test_valid_record_passes() {
        let record = make_record("HAKAI", "080217_2017-01-08", "bad cast");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_empty_organization_is_fatal() {
        let record = make_record("", "080217_2017-01-08", "bad cast");
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("organization"));
        assert!(err.to_string().contains("080217_2017-01-08"));
    }

    #[test]
    fn test_empty_hakai_id_is_fatal() {
        let record = make_record("HAKAI", "", "bad cast");
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_deserializes_source_payload() {
        let json = r#"{
            "organization": "HAKAI",
            "work_area": "QUADRA",
            "station": "QU39",
            "device_model": "SBE19plus",
            "hakai_id": "080217_2017-01-08T18:05:04.000Z",
            "process_error": "something failed"
        }"#;
        let record: ErrorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.organization, "HAKAI");
        assert!(record.cruise.is_none());
        assert!(record.cast_type.is_empty());
    }
}
