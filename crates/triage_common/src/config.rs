//! Pipeline configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing or
//! partial file still yields a working configuration. The normalization
//! policy is configurable because the source system has shipped more than
//! one wording for the lat/long special case over time.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Knobs for message normalization and sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizePolicy {
    /// Prefix identifying the unknown-reference-station failure mode.
    #[serde(default = "default_latlong_prefix")]
    pub latlong_prefix: String,

    /// Canonical label substituted for the whole message when the prefix
    /// matches. Used verbatim, without the quoting applied to raw text.
    #[serde(default = "default_latlong_replacement")]
    pub latlong_replacement: String,

    /// Maximum display-message length, applied before quoting.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// Number of member ids shown per class before the "..." sentinel.
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,

    /// Characters stripped from chart axis labels. Matches the truncated
    /// JSON fragments that survive message truncation.
    #[serde(default = "default_label_strip")]
    pub label_strip: String,
}

fn default_latlong_prefix() -> String {
    "No lat/long information available for station ".to_string()
}

fn default_latlong_replacement() -> String {
    "Unknown reference station".to_string()
}

fn default_max_message_len() -> usize {
    300
}

fn default_sample_limit() -> usize {
    4
}

fn default_label_strip() -> String {
    "{}\"]".to_string()
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self {
            latlong_prefix: default_latlong_prefix(),
            latlong_replacement: default_latlong_replacement(),
            max_message_len: default_max_message_len(),
            sample_limit: default_sample_limit(),
            label_strip: default_label_strip(),
        }
    }
}

/// Report presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Write the cross-organization overview chart as a top-level artifact.
    #[serde(default = "default_overview_chart")]
    pub overview_chart: bool,

    /// Extra organization display labels, merged over the built-in table.
    /// Keyed by normalized organization key.
    #[serde(default)]
    pub org_labels: BTreeMap<String, String>,
}

fn default_overview_chart() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            overview_chart: default_overview_chart(),
            org_labels: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub normalize: NormalizePolicy,
    #[serde(default)]
    pub report: ReportSettings,
}

impl TriageConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TriageError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| TriageError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }
}
