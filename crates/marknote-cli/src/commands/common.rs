use std::io::{self, IsTerminal, Read};
use std::path::Path;

use chrono::Utc;
use marknote_core::db::SqliteLocalStore;
use marknote_core::{LocalId, LocalRecord};
use serde::Serialize;

use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;
const LABEL_LEN: usize = 40;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub remote_id: Option<i64>,
    pub title: String,
    pub body: String,
    pub preview: String,
    pub last_modified: i64,
    pub relative_time: String,
    pub status: &'static str,
}

pub fn open_store(db_path: &Path) -> Result<SqliteLocalStore, CliError> {
    Ok(SqliteLocalStore::open(db_path)?)
}

/// Find a live note by full id or unique id prefix
pub fn resolve_note(note_query: &str, store: &SqliteLocalStore) -> Result<LocalRecord, CliError> {
    let note_query = normalize_note_identifier(note_query)?;

    if let Ok(local_id) = note_query.parse::<LocalId>() {
        if let Some(record) = store.get(&local_id)?.filter(|record| !record.deleted) {
            return Ok(record);
        }
    }

    let matching_ids = store.find_ids_by_prefix(&note_query, 3)?;

    match matching_ids.as_slice() {
        [] => Err(CliError::NoteNotFound(note_query)),
        [local_id] => store
            .get(local_id)?
            .ok_or_else(|| CliError::NoteNotFound(note_query)),
        _ => {
            let options = matching_ids
                .iter()
                .map(|id| short_id(id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{note_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_title(title: &str) -> Result<String, CliError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Body text piped on stdin, if any
pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim_end();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

pub fn short_id(local_id: &LocalId) -> String {
    local_id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Sync status label shown next to a note
pub const fn sync_status(record: &LocalRecord) -> &'static str {
    if record.remote_id.is_none() {
        "new"
    } else if record.dirty {
        "modified"
    } else {
        "synced"
    }
}

pub fn format_note_lines(records: &[LocalRecord]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    records
        .iter()
        .map(|record| {
            let short_id = short_id(&record.local_id);
            let label = note_label(record);
            let status = sync_status(record);
            let relative_time = format_relative_time(record.last_modified, now_ms);

            format!("{short_id:<13}  {label:<40}  {status:<8}  {relative_time}")
        })
        .collect()
}

/// Title followed by the first body line, fitted to the list column
pub fn note_label(record: &LocalRecord) -> String {
    let preview = record.body_preview(LABEL_LEN);
    if preview.is_empty() {
        truncate(&record.title, LABEL_LEN)
    } else {
        truncate(&format!("{} - {preview}", record.title), LABEL_LEN)
    }
}

pub fn note_to_list_item(record: &LocalRecord) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    NoteListItem {
        id: record.local_id.to_string(),
        remote_id: record.remote_id.map(|id| id.value()),
        title: record.title.clone(),
        body: record.body.clone(),
        preview: record.body_preview(LABEL_LEN),
        last_modified: record.last_modified,
        relative_time: format_relative_time(record.last_modified, now_ms),
        status: sync_status(record),
    }
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
