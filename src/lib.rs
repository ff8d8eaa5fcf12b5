pub mod analyzer;
pub mod args;
pub mod error;
pub mod format;
pub mod html_export;
pub mod json_export;
pub mod profile;
pub mod report;
pub mod utils;

pub use analyzer::{analyze, analyze_exports, AnalysisConfig, AnalysisOutcome, RelationshipSet};
pub use args::Args;
pub use error::ExportError;
pub use format::{load_export, ExportFormat};
pub use profile::{ParsedExport, ProfileRecord, RecordDate, Side};
pub use report::{format_report, ReportOptions};
