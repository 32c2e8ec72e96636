//! Scroll trace parsing
//!
//! A trace is JSON lines, one [`ScrollSample`] object per line. Blank lines
//! and `#` comment lines are skipped so traces can be annotated by hand.

use std::io::BufRead;

use anyhow::{Context, Result};
use scrolledge_core::ScrollSample;

/// Parse a JSON-lines scroll trace.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<ScrollSample>> {
    let mut samples = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read trace line {}", number + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample: ScrollSample = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid scroll sample on trace line {}", number + 1))?;
        samples.push(sample);
    }
    Ok(samples)
}
