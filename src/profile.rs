use serde::Serialize;
use std::fmt;
use url::Url;

/// Which of the two exports a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Following,
    Followers,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Following => f.write_str("following"),
            Side::Followers => f.write_str("followers"),
        }
    }
}

/// Date attached to an entry. JSON exports carry epoch seconds, HTML pages
/// only a human-readable string, so the two stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordDate {
    Timestamp(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub username: String,
    pub profile_url: String,
    pub date: Option<RecordDate>,
}

impl ProfileRecord {
    pub fn new(username: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            profile_url: profile_url.into(),
            date: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        // Zero is how the export says "no timestamp"
        self.date = (timestamp != 0).then_some(RecordDate::Timestamp(timestamp));
        self
    }

    pub fn with_date_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.date = (!text.is_empty()).then_some(RecordDate::Text(text));
        self
    }

    pub fn timestamp(&self) -> Option<i64> {
        match self.date {
            Some(RecordDate::Timestamp(ts)) => Some(ts),
            _ => None,
        }
    }
}

/// Last non-empty path segment of a profile link, e.g. `alice` for
/// `https://www.instagram.com/_u/alice/`.
pub fn username_from_href(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

/// Output of a single parser run.
#[derive(Debug, Default)]
pub struct ParsedExport {
    /// Heading of an HTML export page, informational only.
    pub page_title: Option<String>,
    pub records: Vec<ProfileRecord>,
    /// Entries dropped because they did not have the expected shape.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timestamp_means_absent() {
        let record = ProfileRecord::new("alice", "").with_timestamp(0);
        assert_eq!(record.date, None);
        assert_eq!(record.timestamp(), None);
    }

    #[test]
    fn text_date_is_not_a_timestamp() {
        let record = ProfileRecord::new("alice", "").with_date_text("Jan 05, 2024 3:12 pm");
        assert_eq!(
            record.date,
            Some(RecordDate::Text("Jan 05, 2024 3:12 pm".to_string()))
        );
        assert_eq!(record.timestamp(), None);
    }

    #[test]
    fn username_from_profile_links() {
        assert_eq!(
            username_from_href("https://www.instagram.com/alice"),
            Some("alice".to_string())
        );
        assert_eq!(
            username_from_href("https://www.instagram.com/_u/bob.smith/"),
            Some("bob.smith".to_string())
        );
        assert_eq!(username_from_href("https://www.instagram.com/"), None);
        assert_eq!(username_from_href("not a url"), None);
    }

    #[test]
    fn side_display() {
        assert_eq!(Side::Following.to_string(), "following");
        assert_eq!(Side::Followers.to_string(), "followers");
    }
}
