use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "marknote")]
#[command(about = "Offline-first notes that sync with your note service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Note service base URL (overrides config and MARKNOTE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: String,
        /// Note body (read from piped stdin when omitted)
        #[arg(short, long)]
        body: Option<String>,
    },
    /// List notes, most recently modified first
    #[command(alias = "ls")]
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Show every note, ignoring --limit
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the title and/or body of a note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Delete a note (removed remotely on the next sync)
    #[command(alias = "rm")]
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Push local changes, then pull remote notes
    Sync {
        /// Output the sync report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the account used for sync
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Inspect or update the client config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account on the note service
    Register {
        #[arg(long, value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Sign in and store the session locally
    Login {
        #[arg(long, value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show the signed-in account and pending changes
    Status,
    /// Forget the stored session
    Logout {
        /// Also delete every local note, including unsynced ones
        #[arg(long)]
        wipe_local: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write values to the config file
    Set {
        /// Note service base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
        /// Local database file
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,
    },
}
