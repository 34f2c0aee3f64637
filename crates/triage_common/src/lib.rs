//! Triage Common - Error classification and reporting engine
//!
//! Turns per-cast processing-error records into organization-scoped status
//! reports and per-class tracking issues. The pipeline is a single
//! synchronous pass: normalize -> aggregate -> compose/render -> write.
//! Record ingestion, chart rendering and template expansion are
//! collaborators injected at the pipeline boundary.

pub mod aggregator;
pub mod chart;
pub mod config;
pub mod error;
pub mod issue;
pub mod normalizer;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod source;
pub mod template;

pub use aggregator::ErrorClass;
pub use config::TriageConfig;
pub use error::TriageError;
pub use pipeline::{run, RunSummary};
pub use records::{ErrorRecord, NormalizedRecord};
