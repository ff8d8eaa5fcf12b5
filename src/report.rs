use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::analyzer::{AnalysisOutcome, ExportSummary, RelationshipSet};
use crate::error::ExportError;
use crate::profile::{ProfileRecord, RecordDate};
use crate::utils::format_number;

const BANNER: &str = "================================";
const TITLE: &str = "   INSTAGRAM FOLLOWING REPORT";

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Append each entry's date, when the export supplied one.
    pub include_dates: bool,
    /// Adds a "generated on" line. Leave unset for byte-identical reruns.
    pub generated_at: Option<DateTime<Local>>,
}

pub fn render_date(date: &RecordDate) -> String {
    match date {
        RecordDate::Timestamp(ts) => DateTime::from_timestamp(*ts, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| ts.to_string()),
        RecordDate::Text(text) => text.clone(),
    }
}

/// Records ordered by username, the order every listing uses.
pub fn sorted_by_username(records: &[ProfileRecord]) -> Vec<&ProfileRecord> {
    let mut sorted: Vec<&ProfileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.username.cmp(&b.username));
    sorted
}

struct Report<'a> {
    result: &'a RelationshipSet,
    options: &'a ReportOptions,
}

impl Report<'_> {
    fn section(
        &self,
        f: &mut fmt::Formatter<'_>,
        heading: &str,
        records: &[ProfileRecord],
        when_empty: &str,
    ) -> fmt::Result {
        writeln!(f, "=== {} ===", heading)?;
        if records.is_empty() {
            return writeln!(f, "{}", when_empty);
        }

        for (i, record) in sorted_by_username(records).into_iter().enumerate() {
            write!(f, "{}. {}", i + 1, record.username)?;
            if self.options.include_dates {
                if let Some(date) = &record.date {
                    write!(f, " ({})", render_date(date))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        writeln!(f, "{}", BANNER)?;
        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}", BANNER)?;
        writeln!(f)?;

        if let Some(generated_at) = &self.options.generated_at {
            writeln!(
                f,
                "Report generated on: {}",
                generated_at.format("%Y-%m-%d %H:%M:%S")
            )?;
            writeln!(f)?;
        }

        writeln!(f, "=== SUMMARY ===")?;
        writeln!(f, "Total accounts you're following: {}", result.following_count)?;
        writeln!(f, "Total accounts following you: {}", result.followers_count)?;
        writeln!(f, "Mutual connections: {}", result.mutual.len())?;
        writeln!(f, "Not following you back: {}", result.not_following_back.len())?;
        writeln!(f, "You don't follow them: {}", result.you_dont_follow_back.len())?;
        writeln!(f)?;

        self.section(
            f,
            "ACCOUNTS THAT DON'T FOLLOW YOU BACK",
            &result.not_following_back,
            "Everyone you follow also follows you back!",
        )?;
        writeln!(f)?;
        self.section(
            f,
            "ACCOUNTS YOU DON'T FOLLOW BACK",
            &result.you_dont_follow_back,
            "You follow everyone who follows you!",
        )?;
        writeln!(f)?;
        self.section(
            f,
            "MUTUAL CONNECTIONS",
            &result.mutual,
            "No mutual connections found.",
        )
    }
}

pub fn format_report(result: &RelationshipSet, options: &ReportOptions) -> String {
    Report { result, options }.to_string()
}

/// Writes the report in one go; the file is closed before returning.
pub fn write_report(path: &Path, report: &str) -> Result<(), ExportError> {
    fs::write(path, report).map_err(|source| ExportError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(action = "write", component = "report", file_path = ?path, bytes = report.len(), "Report saved");
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    following: &'a ExportSummary,
    followers: &'a ExportSummary,
    #[serde(flatten)]
    relationships: &'a RelationshipSet,
}

pub fn write_json_report(path: &Path, outcome: &AnalysisOutcome, generated_at: DateTime<Local>) -> Result<()> {
    let report = JsonReport {
        generated_at,
        following: &outcome.following,
        followers: &outcome.followers,
        relationships: &outcome.relationships,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize analysis result")?;
    write_report(path, &json)?;
    Ok(())
}

pub fn print_summary(outcome: &AnalysisOutcome) {
    let result = &outcome.relationships;

    println!("\n--- Instagram Follower Analysis ---");
    for (label, summary) in [("Following", &outcome.following), ("Followers", &outcome.followers)] {
        if let Some(title) = &summary.page_title {
            println!("{} export: {}", label, title);
        }
        if summary.skipped > 0 {
            println!(
                "{} export: {} malformed entries skipped",
                label,
                format_number(summary.skipped)
            );
        }
    }

    println!(
        "Total accounts you're following: {}",
        format_number(result.following_count)
    );
    println!(
        "Total accounts following you: {}",
        format_number(result.followers_count)
    );
    println!("Mutual connections: {}", format_number(result.mutual.len()));
    println!(
        "Not following you back: {}",
        format_number(result.not_following_back.len())
    );
    println!(
        "You don't follow them: {}",
        format_number(result.you_dont_follow_back.len())
    );

    if !result.not_following_back.is_empty() {
        println!("\nAccounts that don't follow you back:");
        for (i, record) in sorted_by_username(&result.not_following_back).into_iter().enumerate() {
            println!("{}. {}", i + 1, record.username);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> ProfileRecord {
        ProfileRecord::new(name, format!("https://www.instagram.com/{name}"))
    }

    #[test]
    fn full_layout() {
        let result = analyze(
            vec![record("alice"), record("bob")],
            vec![record("bob"), record("carol")],
        );

        let expected = "\
================================
   INSTAGRAM FOLLOWING REPORT
================================

=== SUMMARY ===
Total accounts you're following: 2
Total accounts following you: 2
Mutual connections: 1
Not following you back: 1
You don't follow them: 1

=== ACCOUNTS THAT DON'T FOLLOW YOU BACK ===
1. alice

=== ACCOUNTS YOU DON'T FOLLOW BACK ===
1. carol

=== MUTUAL CONNECTIONS ===
1. bob
";
        assert_eq!(format_report(&result, &ReportOptions::default()), expected);
    }

    #[test]
    fn empty_sections_use_fallback_sentences() {
        let result = analyze(Vec::new(), Vec::new());
        let report = format_report(&result, &ReportOptions::default());

        assert!(report.contains("Total accounts you're following: 0\n"));
        assert!(report.contains("Everyone you follow also follows you back!\n"));
        assert!(report.contains("You follow everyone who follows you!\n"));
        assert!(report.ends_with("=== MUTUAL CONNECTIONS ===\nNo mutual connections found.\n"));
    }

    #[test]
    fn entries_sorted_by_username() {
        let result = analyze(
            vec![record("zoe"), record("Zed"), record("amy"), record("_x")],
            Vec::new(),
        );
        let report = format_report(&result, &ReportOptions::default());
        assert!(report.contains("1. Zed\n2. _x\n3. amy\n4. zoe\n"));
    }

    #[test]
    fn dates_rendered_per_source() {
        let result = analyze(
            vec![
                record("alice").with_timestamp(1_700_000_000),
                record("bob").with_date_text("Jan 05, 2024 3:12 pm"),
                record("carol"),
            ],
            Vec::new(),
        );
        let options = ReportOptions {
            include_dates: true,
            ..Default::default()
        };
        let report = format_report(&result, &options);
        assert!(report.contains("1. alice (2023-11-14)\n"));
        assert!(report.contains("2. bob (Jan 05, 2024 3:12 pm)\n"));
        assert!(report.contains("3. carol\n"));
    }

    #[test]
    fn generated_on_line_only_when_requested() {
        let result = analyze(Vec::new(), Vec::new());
        let plain = format_report(&result, &ReportOptions::default());
        assert!(!plain.contains("Report generated on"));

        let options = ReportOptions {
            generated_at: Some(Local::now()),
            ..Default::default()
        };
        let stamped = format_report(&result, &options);
        assert!(stamped.contains("Report generated on: "));
    }
}
