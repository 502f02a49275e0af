//! Synchronous direct-to-console output that skips the queue.
//!
//! Reserved for reporting trouble inside the logging machinery itself
//! (buffer growth, dropped records, a dead sink) and for call sites deep in
//! a failing stack where queuing is undesirable. Going through the queue
//! there could recurse into the very component that is failing.

use crate::format::{Layout, time_string};
use crate::record::{LogLevel, SourceLocation};
use std::io::{self, Write};
use std::time::SystemTime;

/// Writes one formatted line straight to stdout.
///
/// Errors are swallowed: this is the last-resort channel and has nowhere
/// left to report to.
pub fn print_immediate(level: LogLevel, file: &'static str, line: u32, message: &str) {
    let text = Layout::default().format_parts(
        &time_string(SystemTime::now()),
        level,
        SourceLocation::new(file, line),
        message,
    );
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}
