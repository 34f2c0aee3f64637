//! Collaborator interfaces at the pipeline boundary.

use crate::aggregator::ErrorClass;
use crate::error::TriageError;
use crate::records::ErrorRecord;

/// Record ingestion collaborator.
///
/// Implementations own their own retry policy and must surface a hard
/// failure rather than partial data. The returned sequence must be in a
/// stable order and pre-filtered to non-empty `process_error`; grouping
/// and sampling downstream depend on that order.
pub trait RecordSource {
    fn fetch(&self) -> Result<Vec<ErrorRecord>, TriageError>;
}

/// Extension point for issue-tracker reconciliation.
///
/// Runs between aggregation and document generation; a future
/// implementation can drop classes that already have open issues or
/// annotate ones that changed. The default keeps every class.
pub trait ClassFilter {
    fn filter(&self, classes: Vec<ErrorClass>) -> Vec<ErrorClass>;
}

/// Identity filter: every class becomes a document.
#[derive(Debug, Default)]
pub struct KeepAll;

impl ClassFilter for KeepAll {
    fn filter(&self, classes: Vec<ErrorClass>) -> Vec<ErrorClass> {
        classes
    }
}
