use std::path::PathBuf;

use crate::profile::Side;

/// Failures that end an analysis run. Malformed individual entries never
/// show up here; parsers skip them and count them in `ParsedExport::skipped`.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot read {side} export {path:?}: {source}")]
    InputUnavailable {
        side: Side,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{side} export {path:?} is not valid JSON: {source}")]
    MalformedDocument {
        side: Side,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot write report to {path:?}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
