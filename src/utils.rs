use chrono::NaiveDate;
use std::path::PathBuf;
use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: usize) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `reports/instagram_report_<date>.txt`, used when no output path is given.
pub fn default_report_path(date: NaiveDate) -> PathBuf {
    PathBuf::from("reports").join(format!("instagram_report_{}.txt", date.format("%Y-%m-%d")))
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    let inputs = [&args.following, &args.followers];

    if let Some(output) = &args.output {
        if inputs.contains(&output) {
            anyhow::bail!("--output must not overwrite an input export: {:?}", output);
        }
    }

    if let Some(json) = &args.json {
        if inputs.contains(&json) {
            anyhow::bail!("--json must not overwrite an input export: {:?}", json);
        }
        if args.output.as_ref() == Some(json) {
            anyhow::bail!("--json and --output must be different files");
        }
    }

    Ok(())
}
