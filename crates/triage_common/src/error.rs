//! Error types for the triage pipeline.
//!
//! Malformed error payloads are *not* represented here: the normalizer
//! handles them as an ordinary fallback branch and never fails. These
//! variants cover the conditions that abort a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    /// A grouping-key field was empty after deserialization. Grouping keys
    /// must be total, so the run aborts rather than misclassifying the
    /// record.
    #[error("record {hakai_id} is missing required field '{field}'")]
    MissingField { field: &'static str, hakai_id: String },

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template expansion failed: {0}")]
    Template(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("record source error: {0}")]
    Source(String),

    #[error("configuration error: {0}")]
    Config(String),
}
