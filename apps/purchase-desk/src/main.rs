//! # Purchase Desk Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Load configuration (file, then environment)
//! 3. Initialize tracing (logging)
//! 4. Create the shared book
//! 5. Replay the command script

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match purchase_desk::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("purchase-desk: {}", e);
            ExitCode::FAILURE
        }
    }
}
