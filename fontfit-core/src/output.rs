//! Result reporting helpers

use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Outcome of a probing run, ready for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub text: String,
    pub compatible: Vec<String>,
}

/// Write the report as prettified JSON.
pub fn write_json_pretty(report: &ProbeReport, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}
