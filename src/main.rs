use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs;
use tracing::error;

use followdiff::report::{print_summary, write_json_report, write_report};
use followdiff::utils::{default_report_path, setup_logging, validate_args};
use followdiff::{analyze_exports, format_report, Args, ReportOptions};

fn run(args: &Args) -> Result<()> {
    let outcome = analyze_exports(&args.analysis_config())?;
    let now = Local::now();

    print_summary(&outcome);

    if !args.no_report {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_report_path(now.date_naive()));

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory {:?}", parent))?;
        }

        let options = ReportOptions {
            include_dates: args.dates,
            generated_at: args.timestamp.then_some(now),
        };
        write_report(&output, &format_report(&outcome.relationships, &options))?;
        println!("\nReport saved to {}", output.display());
    }

    if let Some(json) = &args.json {
        write_json_report(json, &outcome, now)?;
        println!("Results saved to {}", json.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    if let Err(e) = run(&args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
