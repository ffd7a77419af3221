//! Write pipeline results as JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Render a result as a JSON string.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| AppError::new(4, format!("Failed to serialize result: {e}")))
}

/// Write a result to a JSON file.
pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create output '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    let res = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    res.map_err(|e| AppError::new(2, format!("Failed to write output JSON: {e}")))?;

    writeln!(writer)
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::new(2, format!("Failed to write output JSON: {e}")))?;
    Ok(())
}
