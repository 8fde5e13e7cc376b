use std::path::Path;

use marknote_core::db::LocalStore;

use crate::commands::common::{format_note_lines, note_to_list_item, open_store, NoteListItem};
use crate::error::CliError;

pub fn run_list(limit: usize, all: bool, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let mut records = store.list_active()?;
    if !all {
        records.truncate(limit);
    }

    if as_json {
        let json_items = records
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if records.is_empty() {
        println!("No notes yet. Add one with `marknote add <title>`.");
    } else {
        for line in format_note_lines(&records) {
            println!("{line}");
        }
    }

    Ok(())
}
