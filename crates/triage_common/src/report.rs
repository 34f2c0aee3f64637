//! Per-organization report rendering.
//!
//! Owns the partitioning, totals, label lookup and chart-input building;
//! actual drawing and document assembly are delegated to the chart and
//! template collaborators.

use crate::aggregator::ErrorClass;
use crate::chart::{escape, ChartBackend, ChartBar, ChartSpec, OverviewRow};
use crate::config::ReportSettings;
use crate::error::TriageError;
use crate::template::{TemplateContext, TemplateEngine};

/// Axis tick labels longer than this are shortened at presentation time.
/// A second truncation layer on top of the short-label rule; the stored
/// label is never mutated.
pub const TICK_LABEL_MAX: usize = 45;

/// Known organization display labels, keyed by normalized key. An open
/// mapping: organizations not listed keep their key as the label, and the
/// configuration can extend or override entries.
const ORG_LABELS: [(&str, &str); 4] = [
    ("hakai", "Hakai Institute"),
    ("nature_trust", "Nature Trust of British Columbia"),
    ("parks_canada", "Parks Canada"),
    ("dfo", "Fisheries and Oceans Canada"),
];

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{organization} - CTD processing errors</title>
</head>
<body>
<h1>{organization}</h1>
<p>{total_errors} recurring error classes affecting {affected_hakai_ids} casts.</p>
{chart}
<table border="1" cellspacing="0" cellpadding="4">
<tr><th>Work area</th><th>Cast type</th><th>Error</th><th>Count</th><th>Sample hakai_ids</th></tr>
{table}
</table>
</body>
</html>
"#;

/// One rendered summary document for a single organization.
#[derive(Debug, Clone)]
pub struct OrganizationReport {
    /// Filesystem-safe organization key; the report lands under it.
    pub org_key: String,
    pub display_label: String,
    pub total_errors: usize,
    pub affected_hakai_ids: usize,
    pub document: String,
}

/// Normalize an organization identifier to a filesystem-safe key.
pub fn org_key(organization: &str) -> String {
    organization.to_lowercase().replace(' ', "_")
}

/// Resolve the display label for a normalized organization key.
pub fn display_label(key: &str, settings: &ReportSettings) -> String {
    if let Some(label) = settings.org_labels.get(key) {
        return label.clone();
    }
    ORG_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Shorten a chart tick label for presentation.
pub fn tick_label(label: &str) -> String {
    if label.chars().count() > TICK_LABEL_MAX {
        let mut out: String = label.chars().take(TICK_LABEL_MAX).collect();
        out.push('…');
        out
    } else {
        label.to_string()
    }
}

/// Partition the sorted class sequence by organization, preserving the
/// aggregator's order within each partition. A stable group-by, not a
/// re-sort.
pub fn partition_by_org(classes: &[ErrorClass]) -> Vec<(String, Vec<&ErrorClass>)> {
    let mut partitions: Vec<(String, Vec<&ErrorClass>)> = Vec::new();
    for class in classes {
        match partitions.iter_mut().find(|(org, _)| org == &class.organization) {
            Some((_, members)) => members.push(class),
            None => partitions.push((class.organization.clone(), vec![class])),
        }
    }
    partitions
}

/// Build the overview hierarchy rows from the full sorted class sequence.
pub fn overview_rows(classes: &[ErrorClass]) -> Vec<OverviewRow> {
    classes
        .iter()
        .map(|class| OverviewRow {
            organization: class.organization.clone(),
            work_area: class.work_area.clone(),
            label: tick_label(&class.short_label),
            count: class.count,
        })
        .collect()
}

/// Render one organization's summary document.
pub fn render(
    organization: &str,
    classes: &[&ErrorClass],
    settings: &ReportSettings,
    charts: &dyn ChartBackend,
    templates: &dyn TemplateEngine,
) -> Result<OrganizationReport, TriageError> {
    let key = org_key(organization);
    let label = display_label(&key, settings);
    let total_errors = classes.len();
    let affected_hakai_ids: usize = classes.iter().map(|c| c.count).sum();

    let spec = ChartSpec {
        title: format!("{} processing errors", label),
        bars: classes
            .iter()
            .map(|class| ChartBar {
                label: tick_label(&class.short_label),
                value: class.count,
                color_key: class.work_area.clone(),
                facet: class.cast_type.clone(),
            })
            .collect(),
    };
    let chart = charts.render(&spec)?;

    let mut table = String::new();
    for class in classes {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&class.work_area),
            escape(&class.cast_type),
            escape(&class.display_message),
            class.count,
            escape(&class.sample_ids.join(", "))
        ));
    }

    let ctx = TemplateContext::new()
        .set("organization", label.clone())
        .set("total_errors", total_errors.to_string())
        .set("affected_hakai_ids", affected_hakai_ids.to_string())
        .set("chart", chart)
        .set("table", table);
    let document = templates.expand(REPORT_TEMPLATE, &ctx)?;

    Ok(OrganizationReport {
        org_key: key,
        display_label: label,
        total_errors,
        affected_hakai_ids,
        document,
    })
}
