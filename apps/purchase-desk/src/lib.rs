//! # Purchase Desk Library
//!
//! The operator-facing layer over `challan-core`: shared state, commands,
//! configuration and the JSON-lines script runner behind the CLI.
//!
//! ## Module Organization
//! ```text
//! purchase_desk/
//! ├── lib.rs          ◄─── You are here (CLI setup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── book.rs     ◄─── Shared ChallanBook behind a Mutex
//! │   └── config.rs   ◄─── DeskConfig (TOML + environment)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── challan.rs  ◄─── Challan ingest and selection
//! │   ├── bill.rs     ◄─── Draft bill commands
//! │   ├── payment.rs  ◄─── Submission and partial payments
//! │   ├── config.rs   ◄─── Configuration retrieval
//! │   └── script.rs   ◄─── JSON command dispatcher
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```text
//! purchase-desk session.jsonl                 # run a script file
//! purchase-desk --config desk.toml < cmds     # read commands from stdin
//! RUST_LOG=debug purchase-desk session.jsonl  # verbose logs on stderr
//! ```

pub mod commands;
pub mod error;
pub mod state;

use clap::Parser;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{BookState, DeskConfig};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "purchase-desk", version, about = "Challan reconciliation and purchase billing desk")]
pub struct Cli {
    #[arg(help = "Path to a JSON-lines command script (reads stdin when omitted)")]
    pub script: Option<PathBuf>,

    #[arg(long, help = "Path to desk.toml (defaults to the platform config dir)")]
    pub config: Option<PathBuf>,
}

/// Runs the desk.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Desk Startup                                      │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • script path (or stdin), --config path                             │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults ◄ desk.toml ◄ CHALLAN_* environment                      │
/// │                                                                         │
/// │  3. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG if set, else logging.filter from config                  │
/// │     • Logs go to stderr; stdout carries responses only                  │
/// │                                                                         │
/// │  4. Initialize State ─────────────────────────────────────────────────► │
/// │     • BookState: empty book with the configured billing policy          │
/// │                                                                         │
/// │  5. Replay Commands ──────────────────────────────────────────────────► │
/// │     • one response line per non-empty, non-comment input line           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = DeskConfig::load(cli.config.clone())?;
    init_tracing(&config.logging.filter);

    info!(store = %config.store.name, "Starting purchase desk");

    let book = BookState::new(config.billing_policy());

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            info!(?path, "Replaying command script");
            Box::new(BufReader::new(std::fs::File::open(path)?))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let executed = run_script(&book, &config, input, &mut out)?;

    info!(commands = executed, "Script finished");
    Ok(())
}

/// Executes every command line from `input`, writing one response per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// ## Returns
/// Number of commands executed
pub fn run_script<R: BufRead, W: Write>(
    book: &BookState,
    config: &DeskConfig,
    input: R,
    out: &mut W,
) -> std::io::Result<usize> {
    let mut executed = 0;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = commands::script::execute_line(book, config, line);
        writeln!(out, "{}", response)?;
        executed += 1;
    }
    out.flush()?;
    Ok(executed)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=challan_core=trace` - Trace the core only
/// - Default: `logging.filter` from the desk config
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
