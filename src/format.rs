use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::ExportError;
use crate::html_export::parse_html_export;
use crate::json_export::parse_json_export;
use crate::profile::{ParsedExport, Side};

/// Encodings the platform offers for its data download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Html,
}

impl ExportFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(ExportFormat::Json),
            "html" | "htm" => Some(ExportFormat::Html),
            _ => None,
        }
    }

    pub fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') | Some('[') => ExportFormat::Json,
            _ => ExportFormat::Html,
        }
    }

    /// Explicit choice first, then the file extension, then the content.
    pub fn detect(path: &Path, content: &str, explicit: Option<Self>) -> Self {
        explicit
            .or_else(|| Self::from_extension(path))
            .unwrap_or_else(|| Self::sniff(content))
    }
}

pub fn parse_export(
    format: ExportFormat,
    side: Side,
    path: &Path,
    content: &str,
) -> Result<ParsedExport> {
    let parsed = match format {
        ExportFormat::Json => {
            parse_json_export(content).map_err(|source| ExportError::MalformedDocument {
                side,
                path: path.to_path_buf(),
                source,
            })?
        }
        ExportFormat::Html => parse_html_export(content)?,
    };
    Ok(parsed)
}

/// Reads one export fully into memory and parses it.
pub fn load_export(
    side: Side,
    path: &Path,
    explicit: Option<ExportFormat>,
) -> Result<ParsedExport> {
    let start_time = Instant::now();
    info!(action = "start", component = "export_loading", side = %side, file_path = ?path, "Loading export");

    let content = fs::read_to_string(path).map_err(|source| ExportError::InputUnavailable {
        side,
        path: path.to_path_buf(),
        source,
    })?;

    let format = ExportFormat::detect(path, &content, explicit);
    let parsed = parse_export(format, side, path, &content)?;

    if parsed.records.is_empty() {
        warn!(action = "parse", component = "export_loading", side = %side, file_path = ?path, "Export contains no profiles");
    }

    info!(
        action = "complete",
        component = "export_loading",
        side = %side,
        export_format = ?format,
        record_count = parsed.records.len(),
        skipped = parsed.skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "Export loaded"
    );
    Ok(parsed)
}
