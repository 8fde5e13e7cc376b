use std::path::{Path, PathBuf};
use std::time::Duration;

use marknote_core::db::{LocalStore, SqliteLocalStore};
use marknote_core::remote::RemoteErrorKind;
use marknote_core::sync::{SyncFailure, SyncOperation};
use marknote_core::{LocalRecord, RemoteId, SyncReport, SyncState};
use pretty_assertions::assert_eq;

use crate::commands::common::{
    format_relative_time, format_timestamp, normalize_note_identifier, normalize_title,
    note_label, note_to_list_item, resolve_note, sync_status, truncate,
};
use crate::commands::config::run_config_set;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::sync::{format_report_lines, SyncSummary};
use crate::error::CliError;
use crate::settings::{Overrides, Settings};

fn record_with_id(id: &str, title: &str) -> LocalRecord {
    let mut record = LocalRecord::new(title, "");
    record.local_id = id.parse().unwrap();
    record
}

fn seeded_store(db_path: &Path) -> SqliteLocalStore {
    let store = SqliteLocalStore::open(db_path).unwrap();
    store
        .upsert(&record_with_id(
            "11111111-1111-7111-8111-111111111111",
            "Note A",
        ))
        .unwrap();
    store
        .upsert(&record_with_id(
            "11111111-1111-7111-8111-222222222222",
            "Note B",
        ))
        .unwrap();
    store
}

fn settings_for(dir: &Path) -> Settings {
    Settings {
        config_path: dir.join("config.json"),
        db_path: dir.join("notes.db"),
        api_base_url: "http://localhost:5080".to_string(),
        request_timeout: Duration::from_secs(15),
    }
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
}

#[test]
fn truncate_collapses_whitespace_and_adds_ellipsis() {
    assert_eq!(truncate("  Groceries \n list ", 40), "Groceries list");
    assert_eq!(
        truncate("This is a very long sentence that should be shortened", 20),
        "This is a very lo..."
    );
}

#[test]
fn list_label_shows_first_body_line() {
    let record = LocalRecord::new("Groceries", "\n  milk, eggs  \nbread");
    assert_eq!(note_label(&record), "Groceries - milk, eggs");
    assert_eq!(note_to_list_item(&record).preview, "milk, eggs");

    let long = LocalRecord::new("Trip", "Pack the tent, stove, and two sleeping bags");
    assert_eq!(note_label(&long), "Trip - Pack the tent, stove, and two ...");

    assert_eq!(note_label(&LocalRecord::new("Empty", "")), "Empty");
}

#[test]
fn format_timestamp_returns_utc_label() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn normalize_inputs_reject_blank_values() {
    assert!(matches!(
        normalize_note_identifier(" \n "),
        Err(CliError::EmptyNoteId)
    ));
    assert_eq!(normalize_note_identifier("  abc123  ").unwrap(), "abc123");
    assert!(matches!(normalize_title("   "), Err(CliError::EmptyTitle)));
    assert_eq!(normalize_title(" Groceries ").unwrap(), "Groceries");
}

#[test]
fn sync_status_labels_follow_record_state() {
    let mut record = LocalRecord::new("Groceries", "");
    assert_eq!(sync_status(&record), "new");

    record.mark_synced(RemoteId::new(7));
    assert_eq!(sync_status(&record), "synced");

    record.edit("Groceries", "milk");
    assert_eq!(sync_status(&record), "modified");
}

#[test]
fn resolve_note_supports_exact_and_prefix_id() {
    let tmp = tempfile::tempdir().unwrap();
    let store = seeded_store(&tmp.path().join("notes.db"));

    let by_exact = resolve_note("11111111-1111-7111-8111-111111111111", &store).unwrap();
    assert_eq!(by_exact.title, "Note A");

    let by_prefix = resolve_note("11111111-1111-7111-8111-2", &store).unwrap();
    assert_eq!(by_prefix.title, "Note B");
}

#[test]
fn resolve_note_rejects_ambiguous_and_unknown_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    let store = seeded_store(&tmp.path().join("notes.db"));

    assert!(matches!(
        resolve_note("11111111", &store),
        Err(CliError::AmbiguousNoteId(message)) if message.contains("11111111-1111")
    ));
    assert!(matches!(
        resolve_note("ffff", &store),
        Err(CliError::NoteNotFound(query)) if query == "ffff"
    ));
}

#[test]
fn resolve_note_skips_deleted_notes() {
    let tmp = tempfile::tempdir().unwrap();
    let store = seeded_store(&tmp.path().join("notes.db"));
    let id = "11111111-1111-7111-8111-111111111111";
    store.delete_note(&id.parse().unwrap()).unwrap();

    assert!(matches!(
        resolve_note(id, &store),
        Err(CliError::NoteNotFound(_))
    ));
}

#[test]
fn edit_requires_a_change() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("notes.db");
    drop(seeded_store(&db_path));

    assert!(matches!(
        run_edit("11111111-1111-7111-8111-1", None, None, &db_path),
        Err(CliError::NothingToEdit)
    ));
}

#[test]
fn edit_and_delete_mark_notes_pending() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("notes.db");
    {
        let store = seeded_store(&db_path);
        let mut synced = store
            .get(&"11111111-1111-7111-8111-111111111111".parse().unwrap())
            .unwrap()
            .unwrap();
        synced.mark_synced(RemoteId::new(1));
        store.upsert(&synced).unwrap();
    }

    run_edit(
        "11111111-1111-7111-8111-1",
        Some("Note A, revised"),
        None,
        &db_path,
    )
    .unwrap();
    run_delete("11111111-1111-7111-8111-2", &db_path).unwrap();

    let store = SqliteLocalStore::open(&db_path).unwrap();
    let active = store.list_active().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Note A, revised");
    assert!(active[0].dirty);
    assert_eq!(active[0].remote_id, Some(RemoteId::new(1)));
    assert_eq!(store.count_pending().unwrap(), 2);
}

#[test]
fn report_lines_list_failures() {
    let report = SyncReport {
        pushed: 2,
        pulled: 1,
        failures: vec![SyncFailure {
            local_id: None,
            operation: SyncOperation::List,
            kind: RemoteErrorKind::ServerRejected,
            detail: "Remote rejected request: boom (500)".to_string(),
        }],
        pull_failed: true,
        ..SyncReport::default()
    };

    let lines = format_report_lines(&report);
    assert_eq!(lines[0], "Sync completed with failures");
    assert_eq!(lines[1], "  pushed 2, pulled 1, purged 0");
    assert!(lines[2].starts_with("  failed list remote list:"));
    assert!(lines[2].contains("boom (500)"));
}

#[test]
fn sync_summary_json_carries_state_and_counts() {
    let report = SyncReport {
        pushed: 1,
        ..SyncReport::default()
    };
    let summary = SyncSummary {
        state: report.state(),
        report: &report,
    };

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["state"], "synced");
    assert_eq!(json["pushed"], 1);
    assert_eq!(json["session_expired"], false);
    assert_eq!(report.state(), SyncState::Synced);
}

#[test]
fn settings_layer_file_env_and_flags() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"api_base_url":"https://file.example.com","request_timeout_secs":30}"#,
    )
    .unwrap();

    let env = |key: &str| (key == "MARKNOTE_DB_PATH").then(|| "/tmp/env.db".to_string());

    let from_env = Settings::resolve_with(
        &config_path,
        PathBuf::from("/default.db"),
        Overrides::default(),
        env,
    )
    .unwrap();
    assert_eq!(from_env.api_base_url, "https://file.example.com");
    assert_eq!(from_env.request_timeout, Duration::from_secs(30));
    assert_eq!(from_env.db_path, PathBuf::from("/tmp/env.db"));

    let from_flags = Settings::resolve_with(
        &config_path,
        PathBuf::from("/default.db"),
        Overrides {
            db_path: Some(PathBuf::from("/tmp/flag.db")),
            api_url: Some("http://127.0.0.1:9000/".to_string()),
        },
        env,
    )
    .unwrap();
    assert_eq!(from_flags.api_base_url, "http://127.0.0.1:9000");
    assert_eq!(from_flags.db_path, PathBuf::from("/tmp/flag.db"));
}

#[test]
fn settings_fall_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = Settings::resolve_with(
        &tmp.path().join("missing.json"),
        PathBuf::from("/default.db"),
        Overrides::default(),
        |_| None,
    )
    .unwrap();

    assert_eq!(settings.api_base_url, "http://localhost:5080");
    assert_eq!(settings.db_path, PathBuf::from("/default.db"));
}

#[test]
fn settings_reject_flag_url_without_scheme() {
    let tmp = tempfile::tempdir().unwrap();
    let result = Settings::resolve_with(
        &tmp.path().join("missing.json"),
        PathBuf::from("/default.db"),
        Overrides {
            db_path: None,
            api_url: Some("notes.example.com".to_string()),
        },
        |_| None,
    );

    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn config_set_merges_into_existing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings_for(tmp.path());

    run_config_set(
        &settings,
        Some("https://notes.example.com".to_string()),
        None,
        None,
    )
    .unwrap();
    let config = run_config_set(&settings, None, Some(5), None).unwrap();

    assert_eq!(
        config.api_base_url.as_deref(),
        Some("https://notes.example.com")
    );
    assert_eq!(config.request_timeout_secs, Some(5));
    assert!(settings.config_path.exists());
}
