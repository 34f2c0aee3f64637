//! Pipeline entry point: records in, documents out.
//!
//! One synchronous pass. Any write failure aborts the run; documents from
//! a previous run are not rolled back.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::aggregator::{aggregate, ErrorClass};
use crate::chart::ChartBackend;
use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::issue;
use crate::normalizer::normalize_batch;
use crate::records::ErrorRecord;
use crate::report;
use crate::source::ClassFilter;
use crate::template::TemplateEngine;

/// Counts returned to the caller for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub classes: usize,
    pub organizations: usize,
    pub documents: usize,
}

/// Run the full pipeline over an ordered record batch.
///
/// Writes `issues/issue-{i}.md` per class, `{org_key}/index.{ext}` per
/// organization, and optionally a top-level overview chart, all under
/// `output_root`.
pub fn run(
    records: Vec<ErrorRecord>,
    output_root: &Path,
    config: &TriageConfig,
    charts: &dyn ChartBackend,
    templates: &dyn TemplateEngine,
    reconciliation: &dyn ClassFilter,
) -> Result<RunSummary, TriageError> {
    for record in &records {
        record.validate()?;
    }
    let record_count = records.len();
    info!(records = record_count, "starting triage run");

    let normalized = normalize_batch(records, &config.normalize);
    let classes = aggregate(&normalized, &config.normalize);
    debug!(classes = classes.len(), "aggregation complete");

    let classes: Vec<ErrorClass> = reconciliation.filter(classes);

    let mut documents = 0;

    let issues_dir = output_root.join("issues");
    create_dir(&issues_dir)?;
    for (index, class) in classes.iter().enumerate() {
        let doc = issue::compose(class, index, templates)?;
        write_doc(&issues_dir.join(&doc.file_name), &doc.body)?;
        documents += 1;
    }

    let partitions = report::partition_by_org(&classes);
    let organizations = partitions.len();
    for (organization, org_classes) in &partitions {
        let rendered = report::render(
            organization,
            org_classes,
            &config.report,
            charts,
            templates,
        )?;
        let org_dir = output_root.join(&rendered.org_key);
        create_dir(&org_dir)?;
        write_doc(
            &org_dir.join(format!("index.{}", charts.extension())),
            &rendered.document,
        )?;
        documents += 1;
        info!(
            organization = %rendered.display_label,
            classes = rendered.total_errors,
            casts = rendered.affected_hakai_ids,
            "report written"
        );
    }

    if config.report.overview_chart && !classes.is_empty() {
        let rows = report::overview_rows(&classes);
        let body = charts.render_overview(&rows)?;
        write_doc(
            &output_root.join(format!("overview.{}", charts.extension())),
            &body,
        )?;
        documents += 1;
    }

    info!(documents, "triage run complete");
    Ok(RunSummary {
        records: record_count,
        classes: classes.len(),
        organizations,
        documents,
    })
}

fn create_dir(path: &Path) -> Result<(), TriageError> {
    fs::create_dir_all(path).map_err(|source| TriageError::Output {
        path: PathBuf::from(path),
        source,
    })
}

fn write_doc(path: &Path, content: &str) -> Result<(), TriageError> {
    fs::write(path, content).map_err(|source| TriageError::Output {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::HtmlBarChart;
    use crate::source::KeepAll;
    use crate::template::SimpleTemplates;

    fn make_record(org: &str, id: &str, err: &str) -> ErrorRecord {
        ErrorRecord {
            organization: org.to_string(),
            work_area: "QUADRA".to_string(),
            cruise: None,
            station: "QU39".to_string(),
            device_model: "SBE19plus".to_string(),
            cast_type: "profile".to_string(),
            hakai_id: id.to_string(),
            process_error: err.to_string(),
        }
    }

    fn run_in(dir: &Path, records: Vec<ErrorRecord>) -> Result<RunSummary, TriageError> {
        run(
            records,
            dir,
            &TriageConfig::default(),
            &HtmlBarChart,
            &SimpleTemplates,
            &KeepAll,
        )
    }

    #[test]
    fn test_run_writes_expected_documents() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_in(
            dir.path(),
            vec![
                make_record("HAKAI", "H1", "bad cast"),
                make_record("HAKAI", "H2", "bad cast"),
                make_record("NATURE TRUST", "N1", "sensor dropout"),
            ],
        )
        .unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.classes, 2);
        assert_eq!(summary.organizations, 2);
        // two issues + two reports + overview
        assert_eq!(summary.documents, 5);

        assert!(dir.path().join("issues/issue-0.md").exists());
        assert!(dir.path().join("issues/issue-1.md").exists());
        assert!(dir.path().join("hakai/index.html").exists());
        assert!(dir.path().join("nature_trust/index.html").exists());
        assert!(dir.path().join("overview.html").exists());
    }

    #[test]
    fn test_missing_field_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_in(
            dir.path(),
            vec![
                make_record("HAKAI", "H1", "bad cast"),
                make_record("", "H2", "bad cast"),
            ],
        );
        assert!(matches!(
            result,
            Err(TriageError::MissingField { field: "organization", .. })
        ));
        assert!(!dir.path().join("issues").exists());
    }

    #[test]
    fn test_overview_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TriageConfig::default();
        config.report.overview_chart = false;
        let summary = run(
            vec![make_record("HAKAI", "H1", "bad cast")],
            dir.path(),
            &config,
            &HtmlBarChart,
            &SimpleTemplates,
            &KeepAll,
        )
        .unwrap();
        assert_eq!(summary.documents, 2);
        assert!(!dir.path().join("overview.html").exists());
    }

    #[test]
    fn test_empty_batch_produces_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_in(dir.path(), vec![]).unwrap();
        assert_eq!(summary.classes, 0);
        assert_eq!(summary.documents, 0);
        // The issues directory is still created; it is simply empty.
        assert!(dir.path().join("issues").exists());
    }
}
