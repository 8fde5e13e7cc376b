use marknote_core::db::{SessionRepository, SqliteSessionRepository};
use marknote_core::remote::HttpRemoteClient;
use marknote_core::sync::{SyncFailure, SyncOperation};
use marknote_core::{ReconciliationEngine, SyncReport, SyncState};
use serde::Serialize;

use crate::commands::common::{open_store, short_id};
use crate::error::CliError;
use crate::settings::Settings;

#[derive(Debug, Serialize)]
pub struct SyncSummary<'a> {
    pub state: SyncState,
    #[serde(flatten)]
    pub report: &'a SyncReport,
}

pub async fn run_sync(as_json: bool, settings: &Settings) -> Result<(), CliError> {
    let store = open_store(&settings.db_path)?;
    let session = SqliteSessionRepository::new(store.database())
        .load()?
        .ok_or(CliError::NotSignedIn)?;

    let remote = HttpRemoteClient::new(&settings.api_base_url, settings.request_timeout)?;
    let engine = ReconciliationEngine::new(store, remote);
    let report = engine.sync(&session).await?;

    if as_json {
        let summary = SyncSummary {
            state: report.state(),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in format_report_lines(&report) {
            println!("{line}");
        }
    }

    if report.session_expired {
        return Err(CliError::SessionExpired);
    }
    Ok(())
}

pub fn format_report_lines(report: &SyncReport) -> Vec<String> {
    let headline = match report.state() {
        SyncState::Synced => "Sync completed",
        SyncState::Partial => "Sync completed with failures",
        SyncState::Offline => "Note service unreachable; changes stay pending",
        SyncState::SessionExpired => "Sync stopped: session expired",
    };

    let mut lines = vec![
        headline.to_string(),
        format!(
            "  pushed {}, pulled {}, purged {}",
            report.pushed, report.pulled, report.purged
        ),
    ];
    lines.extend(report.failures.iter().map(format_failure));
    lines
}

fn format_failure(failure: &SyncFailure) -> String {
    let target = failure
        .local_id
        .as_ref()
        .map_or_else(|| "remote list".to_string(), short_id);
    let operation = match failure.operation {
        SyncOperation::Create => "create",
        SyncOperation::Update => "update",
        SyncOperation::Delete => "delete",
        SyncOperation::List => "list",
    };
    format!("  failed {operation} {target}: {}", failure.detail)
}
