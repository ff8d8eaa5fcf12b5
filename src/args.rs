use clap::Parser;
use std::path::PathBuf;

use crate::analyzer::AnalysisConfig;
use crate::format::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "followdiff",
    about = "Compare Instagram following/followers exports to find who doesn't follow you back",
    version,
    long_about = None
)]
pub struct Args {
    /// Export listing the accounts you follow (JSON or HTML)
    #[arg(long)]
    pub following: PathBuf,

    /// Export listing the accounts that follow you (JSON or HTML)
    #[arg(long)]
    pub followers: PathBuf,

    /// Force the export format instead of detecting it per file
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Path for the text report [default: reports/instagram_report_<date>.txt]
    #[arg(short, long, conflicts_with = "no_report")]
    pub output: Option<PathBuf>,

    /// Only print the summary, don't write a text report
    #[arg(long)]
    pub no_report: bool,

    /// Append follow dates to report entries
    #[arg(long)]
    pub dates: bool,

    /// Add a "generated on" line to the report
    #[arg(long)]
    pub timestamp: bool,

    /// Also write the full result as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            following: self.following.clone(),
            followers: self.followers.clone(),
            format: self.format,
        }
    }
}
