//! JSON Lines rendering of document units.
//!
//! One unit per line, absent fields omitted. A unit that cannot be
//! serialized is replaced by a small error record so the rest of the stream
//! is still written.

use std::io::Write;

use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::model::DocUnit;

/// Last-resort line when even the error record cannot be built.
pub const FALLBACK_LINE: &str = r#"{"type":"ERROR","error":"serialization failed"}"#;

/// Serialize `value` as one JSON line, or an error record tagged with `kind`.
pub fn json_line<T: Serialize>(value: &T, kind: Option<&str>) -> String {
    match serde_json::to_string(value) {
        Ok(line) => line,
        Err(e) => {
            log::warn!("unit serialization failed: {}", e);
            let record = json!({ "type": kind, "error": e.to_string() });
            serde_json::to_string(&record).unwrap_or_else(|_| FALLBACK_LINE.to_string())
        }
    }
}

/// Serialize one unit as a JSON line.
pub fn unit_line(unit: &DocUnit) -> String {
    json_line(unit, Some(unit.unit_type.as_str()))
}

/// Render units as JSON Lines (newline-terminated).
pub fn to_jsonl(units: &[DocUnit]) -> String {
    let mut out = String::new();
    for unit in units {
        out.push_str(&unit_line(unit));
        out.push('\n');
    }
    out
}

/// Write units as JSON Lines.
pub fn write_jsonl<W: Write>(units: &[DocUnit], mut writer: W) -> Result<()> {
    for unit in units {
        writeln!(writer, "{}", unit_line(unit))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse JSON Lines back into units, skipping blank lines.
pub fn parse_jsonl(text: &str) -> Result<Vec<DocUnit>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::InvalidInput(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}
