use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::format::{load_export, ExportFormat};
use crate::profile::{ProfileRecord, Side};

/// The three derived relationship lists plus the size of each input.
///
/// `mutual` and `not_following_back` hold records from the following export,
/// so their dates say when the account was followed. `you_dont_follow_back`
/// holds records from the followers export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipSet {
    pub following_count: usize,
    pub followers_count: usize,
    pub mutual: Vec<ProfileRecord>,
    pub not_following_back: Vec<ProfileRecord>,
    pub you_dont_follow_back: Vec<ProfileRecord>,
}

/// Inputs for one run, owned by the caller.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub following: PathBuf,
    pub followers: PathBuf,
    /// Forces the export format instead of detecting it per file.
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub page_title: Option<String>,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub relationships: RelationshipSet,
    pub following: ExportSummary,
    pub followers: ExportSummary,
}

/// Keeps only the last record for each username, at the position of that
/// last occurrence.
fn collapse_duplicates(side: Side, records: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
    let last_index: HashMap<&str, usize> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (record.username.as_str(), index))
        .collect();

    if last_index.len() == records.len() {
        return records;
    }

    warn!(
        action = "dedupe",
        component = "analyzer",
        side = %side,
        duplicates = records.len() - last_index.len(),
        "Duplicate usernames collapsed, last occurrence kept"
    );

    let keep: Vec<bool> = records
        .iter()
        .enumerate()
        .map(|(index, record)| last_index[record.username.as_str()] == index)
        .collect();

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}

/// Compares the two lists by exact, case-sensitive username.
pub fn analyze(following: Vec<ProfileRecord>, followers: Vec<ProfileRecord>) -> RelationshipSet {
    let following = collapse_duplicates(Side::Following, following);
    let followers = collapse_duplicates(Side::Followers, followers);

    let following_names: HashSet<String> = following.iter().map(|r| r.username.clone()).collect();
    let followers_names: HashSet<String> = followers.iter().map(|r| r.username.clone()).collect();

    let following_count = following.len();
    let followers_count = followers.len();

    let (mutual, not_following_back): (Vec<_>, Vec<_>) = following
        .into_iter()
        .partition(|record| followers_names.contains(&record.username));

    let you_dont_follow_back: Vec<_> = followers
        .into_iter()
        .filter(|record| !following_names.contains(&record.username))
        .collect();

    info!(
        action = "complete",
        component = "analyzer",
        following_count,
        followers_count,
        mutual = mutual.len(),
        not_following_back = not_following_back.len(),
        you_dont_follow_back = you_dont_follow_back.len(),
        "Relationship analysis completed"
    );

    RelationshipSet {
        following_count,
        followers_count,
        mutual,
        not_following_back,
        you_dont_follow_back,
    }
}

/// Loads both exports and analyzes them. Any read failure aborts the run
/// before a result exists.
pub fn analyze_exports(config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "analysis", "Starting follower analysis");

    let following = load_export(Side::Following, &config.following, config.format)?;
    let followers = load_export(Side::Followers, &config.followers, config.format)?;

    let following_summary = ExportSummary {
        page_title: following.page_title,
        skipped: following.skipped,
    };
    let followers_summary = ExportSummary {
        page_title: followers.page_title,
        skipped: followers.skipped,
    };

    let relationships = analyze(following.records, followers.records);

    info!(
        action = "complete",
        component = "analysis",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed successfully"
    );

    Ok(AnalysisOutcome {
        relationships,
        following: following_summary,
        followers: followers_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RecordDate;
    use pretty_assertions::assert_eq;

    fn record(name: &str, timestamp: i64) -> ProfileRecord {
        ProfileRecord::new(name, format!("https://www.instagram.com/{name}")).with_timestamp(timestamp)
    }

    fn names(records: &[ProfileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.username.as_str()).collect()
    }

    #[test]
    fn splits_into_three_lists() {
        let result = analyze(
            vec![record("alice", 1), record("bob", 2)],
            vec![record("bob", 3), record("carol", 4)],
        );

        assert_eq!(names(&result.mutual), vec!["bob"]);
        assert_eq!(names(&result.not_following_back), vec!["alice"]);
        assert_eq!(names(&result.you_dont_follow_back), vec!["carol"]);
        assert_eq!(result.following_count, 2);
        assert_eq!(result.followers_count, 2);
    }

    #[test]
    fn mutual_keeps_following_metadata() {
        let result = analyze(vec![record("bob", 100)], vec![record("bob", 999)]);
        assert_eq!(result.mutual[0].date, Some(RecordDate::Timestamp(100)));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let result = analyze(vec![record("Alice", 1)], vec![record("alice", 1)]);
        assert!(result.mutual.is_empty());
        assert_eq!(names(&result.not_following_back), vec!["Alice"]);
        assert_eq!(names(&result.you_dont_follow_back), vec!["alice"]);
    }

    #[test]
    fn empty_inputs() {
        let result = analyze(Vec::new(), Vec::new());
        assert_eq!(result.following_count, 0);
        assert_eq!(result.followers_count, 0);
        assert!(result.mutual.is_empty());

        let result = analyze(Vec::new(), vec![record("carol", 1)]);
        assert!(result.mutual.is_empty());
        assert!(result.not_following_back.is_empty());
        assert_eq!(names(&result.you_dont_follow_back), vec!["carol"]);
    }

    #[test]
    fn duplicates_keep_last_occurrence() {
        let result = analyze(
            vec![record("dup", 1), record("alice", 2), record("dup", 3)],
            Vec::new(),
        );

        assert_eq!(result.following_count, 2);
        assert_eq!(names(&result.not_following_back), vec!["alice", "dup"]);
        assert_eq!(result.not_following_back[1].timestamp(), Some(3));
    }

    #[test]
    fn preserves_source_order() {
        let result = analyze(
            vec![record("zed", 1), record("amy", 2), record("mo", 3)],
            vec![record("mo", 1), record("zed", 2)],
        );
        assert_eq!(names(&result.mutual), vec!["zed", "mo"]);
    }
}
