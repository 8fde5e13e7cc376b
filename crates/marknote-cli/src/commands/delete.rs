use std::path::Path;

use crate::commands::common::{open_store, resolve_note};
use crate::error::CliError;

pub fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let record = resolve_note(id, &store)?;

    store.delete_note(&record.local_id)?;
    println!("{}", record.local_id);
    Ok(())
}
