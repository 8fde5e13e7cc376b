use std::path::Path;

use crate::commands::common::{normalize_title, open_store, resolve_note};
use crate::error::CliError;

pub fn run_edit(
    id: &str,
    title: Option<&str>,
    body: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    if title.is_none() && body.is_none() {
        return Err(CliError::NothingToEdit);
    }

    let store = open_store(db_path)?;
    let record = resolve_note(id, &store)?;

    let new_title = title.map_or_else(|| Ok(record.title.clone()), normalize_title)?;
    let new_body = body.unwrap_or(&record.body);

    if new_title == record.title && new_body == record.body {
        println!("{}", record.local_id);
        return Ok(());
    }

    let updated = store.edit_note(&record.local_id, &new_title, new_body)?;
    println!("{}", updated.local_id);
    Ok(())
}
