use std::path::Path;

use crate::commands::common::{normalize_title, open_store, read_piped_stdin};
use crate::error::CliError;

pub fn run_add(title: &str, body: Option<String>, db_path: &Path) -> Result<(), CliError> {
    let title = normalize_title(title)?;
    let body = match body {
        Some(body) => body,
        None => read_piped_stdin()?.unwrap_or_default(),
    };

    let store = open_store(db_path)?;
    let record = store.create_note(&title, &body)?;

    println!("{}", record.local_id);
    Ok(())
}
