use std::path::Path;

use chrono::Utc;

use crate::commands::common::{
    format_relative_time, format_timestamp, note_to_list_item, open_store, resolve_note,
    sync_status,
};
use crate::error::CliError;

pub fn run_show(id: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let record = resolve_note(id, &store)?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&note_to_list_item(&record))?
        );
        return Ok(());
    }

    let remote = record
        .remote_id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let now_ms = Utc::now().timestamp_millis();

    println!("id:        {}", record.local_id);
    println!("remote:    {remote}");
    println!("status:    {}", sync_status(&record));
    println!(
        "modified:  {} ({})",
        format_timestamp(record.last_modified),
        format_relative_time(record.last_modified, now_ms)
    );
    println!();
    println!("{}", record.title);
    if !record.body.is_empty() {
        println!();
        println!("{}", record.body);
    }
    Ok(())
}
