//! Claim input loading.
//!
//! Accepts either a single JSON array of claim objects or JSON lines (one
//! object per line, blank lines ignored). The format is detected from the
//! first non-whitespace byte.

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use wr_common::{Error, Result};

use crate::claims::ClaimRecord;

/// Read claims from a file.
pub fn load_claims(path: &Path) -> Result<Vec<ClaimRecord>> {
    let text = fs::read_to_string(path)?;
    let records = parse_claims(&text)?;
    debug!(path = %path.display(), records = records.len(), "claims loaded");
    Ok(records)
}

/// Read claims from any reader (e.g. stdin).
pub fn read_claims<R: Read>(mut reader: R) -> Result<Vec<ClaimRecord>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_claims(&text)
}

/// Parse a JSON array or JSON-lines document.
pub fn parse_claims(text: &str) -> Result<Vec<ClaimRecord>> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Err(Error::EmptyInput);
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| Error::MalformedRecord {
            line: e.line(),
            message: e.to_string(),
        });
    }

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| Error::MalformedRecord {
            line: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
