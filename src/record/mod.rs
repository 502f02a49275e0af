use std::fmt;
use std::time::SystemTime;

/// Severity tag attached to every record.
///
/// Informational only: the logger never filters on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    // `pad` so width/alignment specifiers like `{:<8}` apply.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Where a record was submitted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// The file name without any directory components. Both `/` and `\`
    /// count as separators so paths from either platform render the same.
    pub fn basename(&self) -> &'static str {
        basename(self.file)
    }
}

fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// One submitted log line.
///
/// Fields are private: a record is never mutated after it is built, so it
/// can move from the submitting thread to the worker without further
/// synchronization.
#[derive(Clone, Debug)]
pub struct LogRecord {
    timestamp: SystemTime,
    level: LogLevel,
    location: SourceLocation,
    message: String,
}

impl LogRecord {
    /// Builds a record stamped with the current time.
    pub fn new(level: LogLevel, location: SourceLocation, message: impl Into<String>) -> Self {
        Self::at(SystemTime::now(), level, location, message)
    }

    /// Builds a record with an explicit timestamp.
    pub fn at(
        timestamp: SystemTime,
        level: LogLevel,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            location,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Info.to_string(), "INFO");
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert_eq!(LogLevel::Debug.to_string(), "DEBUG");
    }

    #[test]
    fn test_level_respects_padding() {
        assert_eq!(format!("{:<8}|", LogLevel::Info), "INFO    |");
        assert_eq!(format!("{:<8}|", LogLevel::Warning), "WARNING |");
    }

    #[test]
    fn test_basename_strips_directories() {
        assert_eq!(SourceLocation::new("src/logger/mod.rs", 1).basename(), "mod.rs");
        assert_eq!(SourceLocation::new("C:\\proj\\src\\Shader.cpp", 1).basename(), "Shader.cpp");
        assert_eq!(SourceLocation::new("main.rs", 1).basename(), "main.rs");
        assert_eq!(SourceLocation::new("a/b\\c.rs", 1).basename(), "c.rs");
    }

    #[test]
    fn test_record_captures_time_at_creation() {
        let before = SystemTime::now();
        let rec = LogRecord::new(LogLevel::Debug, SourceLocation::new(file!(), line!()), "x");
        let after = SystemTime::now();
        assert!(rec.timestamp() >= before && rec.timestamp() <= after);
        assert_eq!(rec.level(), LogLevel::Debug);
        assert_eq!(rec.message(), "x");
    }
}
