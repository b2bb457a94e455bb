//! Library Desk CLI
//!
//! Replays a desk script (CSV) against an in-memory library and prints one
//! report as CSV on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- desk.csv > catalog.csv
//! cargo run -- --today 2024-03-01 --report fines desk.csv
//! cargo run -- --report loans --member 1000 desk.csv
//! cargo run -- --report top-borrowed --top 3 --log-level info desk.csv
//! ```
//!
//! Rejected or malformed rows are logged to stderr and skipped.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, report not writable)

use library_desk::{cli, logging, session};
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init(args.log_level.into(), args.log_json);

    let config = args.to_session_config();

    // Report goes to stdout
    let mut output = std::io::stdout().lock();
    if let Err(e) = session::process(&config, &args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
