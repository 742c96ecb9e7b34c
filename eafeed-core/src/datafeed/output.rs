//! Diagnostic output channel supplied by the caller.

use tracing::warn;

/// Sink for human-readable diagnostics.
pub trait Output {
    fn output(&self, msg: &str);
}

impl<F: Fn(&str)> Output for F {
    fn output(&self, msg: &str) {
        self(msg)
    }
}

/// Prints each diagnostic to stdout.
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn output(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Forwards diagnostics to the tracing subscriber.
pub struct TracingOutput;

impl Output for TracingOutput {
    fn output(&self, msg: &str) {
        warn!(target: "eafeed::output", "{msg}");
    }
}
