use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::profile::{username_from_href, ParsedExport, ProfileRecord};

/// Wrapper keys tried first when the root is an object.
const WRAPPER_KEYS: &[&str] = &["relationships_following", "relationships_followers"];
const WRAPPER_PREFIX: &str = "relationships_";

/// The two root shapes an export can have. Decided once per document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportRoot {
    Entries(Vec<Value>),
    Wrapped(Map<String, Value>),
    Other(Value),
}

/// Parses a JSON export. Only a document that is not JSON at all is an error;
/// entries without the expected shape are skipped and counted.
pub fn parse_json_export(content: &str) -> Result<ParsedExport, serde_json::Error> {
    let root: ExportRoot = serde_json::from_str(content)?;

    let entries = match root {
        ExportRoot::Entries(entries) => entries,
        ExportRoot::Wrapped(map) => match unwrap_entries(map) {
            Some(entries) => entries,
            None => {
                warn!(
                    action = "parse",
                    component = "json_export",
                    "Object root has no relationships array"
                );
                Vec::new()
            }
        },
        ExportRoot::Other(value) => {
            let root_type = match value {
                Value::Null => "null",
                Value::Bool(_) => "bool",
                Value::Number(_) => "number",
                _ => "string",
            };
            warn!(
                action = "parse",
                component = "json_export",
                root_type,
                "Root is neither an array nor an object"
            );
            Vec::new()
        }
    };

    let mut parsed = ParsedExport::default();
    for (index, entry) in entries.iter().enumerate() {
        match extract_record(entry) {
            Some(record) => parsed.records.push(record),
            None => {
                debug!(
                    action = "skip",
                    component = "json_export",
                    entry_index = index,
                    "Entry has no usable string_list_data"
                );
                parsed.skipped += 1;
            }
        }
    }

    info!(
        action = "complete",
        component = "json_export",
        record_count = parsed.records.len(),
        skipped = parsed.skipped,
        "Parsed JSON export"
    );
    Ok(parsed)
}

fn unwrap_entries(mut map: Map<String, Value>) -> Option<Vec<Value>> {
    for key in WRAPPER_KEYS {
        if let Some(Value::Array(entries)) = map.remove(*key) {
            return Some(entries);
        }
    }

    map.into_iter().find_map(|(key, value)| match value {
        Value::Array(entries) if key.starts_with(WRAPPER_PREFIX) => Some(entries),
        _ => None,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Reads only the first `string_list_data` element; fields other than the
/// username are best-effort and never cause the entry to be dropped.
fn extract_record(entry: &Value) -> Option<ProfileRecord> {
    let data = entry.get("string_list_data")?.as_array()?.first()?;
    let href = data
        .get("href")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // Newer exports drop `value` and put the username in the entry title
    let username = non_empty_str(data.get("value"))
        .or_else(|| non_empty_str(entry.get("title")))
        .or_else(|| username_from_href(&href))?;

    let timestamp = data
        .get("timestamp")
        .and_then(|ts| ts.as_i64().or_else(|| ts.as_f64().map(|f| f as i64)))
        .unwrap_or(0);

    Some(ProfileRecord::new(username, href).with_timestamp(timestamp))
}
