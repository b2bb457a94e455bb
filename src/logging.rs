//! Log subscriber setup
//!
//! Log lines go to stderr; stdout carries only the report CSV.

use tracing::Level;

/// Install the global `tracing` subscriber
///
/// Only the first call has an effect; later calls are ignored.
pub fn init(level: Level, json: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if json {
        subscriber.json().with_current_span(true).try_init()
    } else {
        subscriber.try_init()
    };

    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
