//! JSON-lines input for an ingest run.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::models::Experience;

/// Line reader over the input file, or stdin when the path is `-`.
pub type InputLines = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Opens `path` for line-by-line reading.
pub async fn open_input(path: &Path) -> Result<InputLines> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if path.as_os_str() == "-" {
        log::info!("Reading experiences from stdin");
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        Box::new(BufReader::new(file))
    };
    Ok(reader.lines())
}

/// Parses one input line.
///
/// Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Experience>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}
