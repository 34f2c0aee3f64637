//! Grouping and per-class statistics.
//!
//! Classes partition the normalized record set by
//! `(organization, work_area, cast_type, display_message)`. Grouping is
//! stable with respect to input order: which member ids appear in the
//! display sample, and which class wins a sort tie, both depend on the
//! order records arrived in.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::NormalizePolicy;
use crate::records::NormalizedRecord;

/// Sentinel appended to a truncated id sample.
pub const SAMPLE_SENTINEL: &str = "...";

/// An equivalence class of error records sharing organization, work area,
/// cast type and normalized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorClass {
    pub organization: String,
    pub work_area: String,
    pub cast_type: String,
    pub display_message: String,

    /// Number of member records.
    pub count: usize,
    /// Full member ids in input order; `count == member_ids.len()`.
    pub member_ids: Vec<String>,
    /// Display sample: the first few member ids, sentinel-terminated when
    /// truncated. Not statistically representative.
    pub sample_ids: Vec<String>,
    /// Distinct station names across members.
    pub stations: BTreeSet<String>,
    /// Raw `process_error` of the first member in input order.
    pub representative_error: String,
    /// Compact label for chart axes.
    pub short_label: String,
}

struct ClassBuilder {
    organization: String,
    work_area: String,
    cast_type: String,
    display_message: String,
    member_ids: Vec<String>,
    stations: BTreeSet<String>,
    representative_error: String,
}

impl ClassBuilder {
    fn finish(self, policy: &NormalizePolicy) -> ErrorClass {
        let sample_ids = sample(&self.member_ids, policy.sample_limit);
        let short_label = short_label(&self.display_message, &policy.label_strip);
        ErrorClass {
            organization: self.organization,
            work_area: self.work_area,
            cast_type: self.cast_type,
            display_message: self.display_message,
            count: self.member_ids.len(),
            member_ids: self.member_ids,
            sample_ids,
            stations: self.stations,
            representative_error: self.representative_error,
            short_label,
        }
    }
}

/// Group normalized records into classes and sort them for reporting.
///
/// Output order is organization descending, then count descending, with
/// ties keeping first-seen order. Downstream file-index assignment depends
/// on this order being reproducible.
pub fn aggregate(records: &[NormalizedRecord], policy: &NormalizePolicy) -> Vec<ErrorClass> {
    let mut index: HashMap<(String, String, String, String), usize> = HashMap::new();
    let mut builders: Vec<ClassBuilder> = Vec::new();

    for normalized in records {
        let key = (
            normalized.record.organization.clone(),
            normalized.work_area.clone(),
            normalized.record.cast_type.clone(),
            normalized.display_message.clone(),
        );
        let slot = *index.entry(key).or_insert_with(|| {
            builders.push(ClassBuilder {
                organization: normalized.record.organization.clone(),
                work_area: normalized.work_area.clone(),
                cast_type: normalized.record.cast_type.clone(),
                display_message: normalized.display_message.clone(),
                member_ids: Vec::new(),
                stations: BTreeSet::new(),
                representative_error: normalized.record.process_error.clone(),
            });
            builders.len() - 1
        });
        let builder = &mut builders[slot];
        builder.member_ids.push(normalized.record.hakai_id.clone());
        builder.stations.insert(normalized.record.station.clone());
    }

    let mut classes: Vec<ErrorClass> = builders
        .into_iter()
        .map(|builder| builder.finish(policy))
        .collect();

    // Vec::sort_by is stable, so equal keys keep first-seen order.
    classes.sort_by(|a, b| {
        b.organization
            .cmp(&a.organization)
            .then(b.count.cmp(&a.count))
    });
    classes
}

/// Take the first `limit` ids and append the sentinel iff members were
/// dropped. The threshold is strictly greater than `limit`.
fn sample(member_ids: &[String], limit: usize) -> Vec<String> {
    if member_ids.len() > limit {
        let mut sample: Vec<String> = member_ids[..limit].to_vec();
        sample.push(SAMPLE_SENTINEL.to_string());
        sample
    } else {
        member_ids.to_vec()
    }
}

/// Compact a display message for use as a chart axis label: keep the text
/// before the first `.`, then drop the configured punctuation characters.
pub fn short_label(display_message: &str, strip: &str) -> String {
    if display_message.is_empty() {
        return String::new();
    }
    let head = display_message.split('.').next().unwrap_or("");
    head.chars().filter(|c| !strip.contains(*c)).collect()
}
