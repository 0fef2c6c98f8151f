use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use eyre::Result;
use serde_json::Value;

use crate::logging;
use crate::models::{MediaItem, Story};

/// Normalize one loosely-typed backend row into a strict `Story`. Rows
/// without an id are unusable and rejected; everything else is coerced:
/// null or non-string content becomes the empty string (pagination turns it
/// into the single-page fallback), malformed media entries are dropped.
fn story_from_row(row: &Value) -> Option<Story> {
    let id = field_as_id(row, "id")?;

    let content = row
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let title = row
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|t| !t.trim().is_empty());

    let created_at = row
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let media = row
        .get("media")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(media_from_row).collect())
        .unwrap_or_default();

    Some(Story {
        id,
        title,
        content,
        created_at,
        media,
    })
}

fn media_from_row(row: &Value) -> Option<MediaItem> {
    let id = field_as_id(row, "id")?;

    // The backend exports either `url` or a storage `file_path`.
    let url = row
        .get("url")
        .and_then(Value::as_str)
        .or_else(|| row.get("file_path").and_then(Value::as_str))?
        .to_string();

    let content_type = row
        .get("content_type")
        .and_then(Value::as_str)
        .unwrap_or("application/octet-stream")
        .to_string();

    let caption = row
        .get("caption")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(MediaItem {
        id,
        content_type,
        url,
        caption,
    })
}

fn field_as_id(row: &Value, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Map an exported story list into strict `Story` values, preserving the
/// supplied row order. Invalid rows are skipped with a warning rather than
/// failing the whole book.
pub fn stories_from_value(value: &Value) -> Vec<Story> {
    let rows = match value {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(_) => value
            .get("stories")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    let mut stories = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match story_from_row(row) {
            Some(story) => stories.push(story),
            None => logging::warn(format!("skipping story row {} without an id", i)),
        }
    }
    stories
}

/// Load stories from a JSON export file: either a top-level array of story
/// rows or an object with a `stories` array.
pub fn load_stories(path: &Path) -> Result<Vec<Story>> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;

    match &value {
        Value::Array(_) => {}
        Value::Object(map) if map.contains_key("stories") => {}
        _ => {
            return Err(eyre::eyre!(
                "{} is not a story export (expected an array or a `stories` field)",
                path.display()
            ));
        }
    }

    Ok(stories_from_value(&value))
}
