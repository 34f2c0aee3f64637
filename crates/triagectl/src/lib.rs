//! Triage Control - command implementations and record sources.

pub mod commands;
pub mod sources;
