//! Command implementations.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use triage_common::aggregator::aggregate;
use triage_common::chart::HtmlBarChart;
use triage_common::normalizer::normalize_batch;
use triage_common::source::{KeepAll, RecordSource};
use triage_common::template::SimpleTemplates;
use triage_common::{ErrorRecord, TriageConfig};

use crate::sources::{JsonFileSource, RestSource};

fn load_config(path: Option<PathBuf>) -> Result<TriageConfig> {
    match path {
        Some(path) => {
            TriageConfig::load(&path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(TriageConfig::default()),
    }
}

fn fetch_records(input: Option<PathBuf>, api_root: Option<String>) -> Result<Vec<ErrorRecord>> {
    let source: Box<dyn RecordSource> = match (input, api_root) {
        (Some(path), _) => Box::new(JsonFileSource::new(path)),
        (None, Some(root)) => Box::new(RestSource::new(root)?),
        (None, None) => bail!("either --input or --api-root is required"),
    };
    Ok(source.fetch()?)
}

/// Full pipeline run: fetch, classify, write documents.
pub fn run(
    input: Option<PathBuf>,
    api_root: Option<String>,
    output: PathBuf,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config)?;
    let records = fetch_records(input, api_root)?;
    let started = Utc::now();

    let summary = triage_common::run(
        records,
        &output,
        &config,
        &HtmlBarChart,
        &SimpleTemplates,
        &KeepAll,
    )?;

    let elapsed = Utc::now() - started;
    println!(
        "{} {} records -> {} classes across {} organizations",
        "done:".green().bold(),
        summary.records,
        summary.classes,
        summary.organizations
    );
    println!(
        "  {} documents written to {} in {}ms",
        summary.documents,
        output.display(),
        elapsed.num_milliseconds()
    );
    Ok(())
}

/// Classify and print the class table; writes nothing.
pub fn preview(
    input: Option<PathBuf>,
    api_root: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config)?;
    let records = fetch_records(input, api_root)?;
    for record in &records {
        record.validate()?;
    }

    let normalized = normalize_batch(records, &config.normalize);
    let classes = aggregate(&normalized, &config.normalize);

    if classes.is_empty() {
        println!("{}", "no error classes found".dimmed());
        return Ok(());
    }

    println!(
        "{:<20} {:<24} {:>6}  {}",
        "ORGANIZATION".bold(),
        "WORK AREA".bold(),
        "COUNT".bold(),
        "ERROR".bold()
    );
    for class in &classes {
        println!(
            "{:<20} {:<24} {:>6}  {}",
            class.organization,
            class.work_area,
            class.count,
            class.short_label
        );
    }
    println!("\n{} classes from {} records", classes.len(), normalized.len());
    Ok(())
}
