use crate::record::{LogLevel, LogRecord, SourceLocation};
use chrono::{DateTime, Local, Timelike};
use std::time::SystemTime;

/// Renders `t` in local time as `HH:MM:SS.hh` (hundredths of a second).
pub fn time_string(t: SystemTime) -> String {
    let local: DateTime<Local> = t.into();
    let hundredths = local.nanosecond() % 1_000_000_000 / 10_000_000;
    format!("{}.{:02}", local.format("%H:%M:%S"), hundredths)
}

/// Column widths of a formatted line. Purely cosmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub level_width: usize,
    pub file_width: usize,
    pub line_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            level_width: 8,
            file_width: 20,
            line_width: 3,
        }
    }
}

impl Layout {
    pub fn format_record(&self, record: &LogRecord) -> String {
        self.format_parts(
            &time_string(record.timestamp()),
            record.level(),
            record.location(),
            record.message(),
        )
    }

    /// `HH:MM:SS.hh  LEVEL    [file:line] message`
    pub fn format_parts(
        &self,
        time: &str,
        level: LogLevel,
        location: SourceLocation,
        message: &str,
    ) -> String {
        format!(
            "{time}  {level:<lw$} [{file:<fw$}:{line:<nw$}] {message}",
            lw = self.level_width,
            file = location.basename(),
            fw = self.file_width,
            line = location.line,
            nw = self.line_width,
        )
    }
}

/// Cosmetic first line written by the worker.
pub fn banner_line() -> String {
    format!(
        "==== ringlog {} started {} ====",
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
