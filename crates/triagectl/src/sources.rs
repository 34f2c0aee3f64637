//! Record source implementations.
//!
//! Both sources satisfy the ingestion contract: an ordered sequence of
//! records, pre-filtered to non-empty `process_error`, or a hard failure.
//! Partial data is never returned.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;
use triage_common::source::RecordSource;
use triage_common::{ErrorRecord, TriageError};

/// Fields requested from the cast endpoint.
const CAST_FIELDS: [&str; 8] = [
    "organization",
    "work_area",
    "cruise",
    "station",
    "device_model",
    "cast_type",
    "hakai_id",
    "process_error",
];

/// Reads a record batch from a local JSON array. Useful for replaying an
/// exported batch or testing against a fixture.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RecordSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<ErrorRecord>, TriageError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            TriageError::Source(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let records: Vec<ErrorRecord> = serde_json::from_str(&content).map_err(|e| {
            TriageError::Source(format!("cannot parse {}: {}", self.path.display(), e))
        })?;
        info!(records = records.len(), path = %self.path.display(), "loaded record batch");
        Ok(records)
    }
}

/// Fetches the record batch from the cast database REST API.
#[derive(Debug)]
pub struct RestSource {
    api_root: String,
    client: reqwest::blocking::Client,
}

impl RestSource {
    pub fn new(api_root: String) -> Result<Self, TriageError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| TriageError::Source(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { api_root, client })
    }

    fn cast_url(&self) -> String {
        format!(
            "{}/ctd/views/file/cast?process_error!=null&process_error!=''&limit=-1&fields={}",
            self.api_root.trim_end_matches('/'),
            CAST_FIELDS.join(",")
        )
    }
}

impl RecordSource for RestSource {
    fn fetch(&self) -> Result<Vec<ErrorRecord>, TriageError> {
        let url = self.cast_url();
        info!(%url, "fetching record batch");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| TriageError::Source(format!("request failed: {}", e)))?;
        let response = response
            .error_for_status()
            .map_err(|e| TriageError::Source(format!("cast endpoint returned error: {}", e)))?;
        let records: Vec<ErrorRecord> = response
            .json()
            .map_err(|e| TriageError::Source(format!("cannot decode cast payload: {}", e)))?;
        info!(records = records.len(), "record batch fetched");
        Ok(records)
    }
}
