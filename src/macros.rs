//! Call-site macros. Formatting happens here, before the record is queued,
//! so the worker never parses a format string.

/// Submits a record at an explicit level, capturing `file!()` and `line!()`.
#[macro_export]
macro_rules! log_record {
    ($logger:expr, $lvl:expr, $($arg:tt)*) => {{
        $logger.submit($lvl, file!(), line!(), format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => { $crate::log_record!($logger, $crate::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => { $crate::log_record!($logger, $crate::LogLevel::Warning, $($arg)*) };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => { $crate::log_record!($logger, $crate::LogLevel::Error, $($arg)*) };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => { $crate::log_record!($logger, $crate::LogLevel::Debug, $($arg)*) };
}

/// Writes straight to stdout, bypassing any logger queue.
#[macro_export]
macro_rules! print_now {
    ($lvl:expr, $($arg:tt)*) => {{
        $crate::print_immediate($lvl, file!(), line!(), &format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use crate::{LogLevel, Logger, LoggerConfig, MemorySink};

    #[test]
    fn test_level_macros_format_at_call_site() {
        let sink = MemorySink::new();
        let logger = Logger::with_sink(LoggerConfig::default().with_banner(false), sink.clone()).unwrap();
        let handle = logger.handle();

        crate::log_info!(handle, "position {}: ({}, {})", 3, 0.5, -0.25);
        crate::log_warning!(logger, "plain");
        crate::log_error!(handle, "code {code:#x}", code = 0x502);
        crate::log_debug!(handle, "{:>4}", 7);
        crate::log_record!(handle, LogLevel::Info, "explicit");
        logger.shutdown();

        let lines = sink.lines();
        assert!(lines[0].contains("INFO") && lines[0].ends_with("] position 3: (0.5, -0.25)"));
        assert!(lines[1].contains("WARNING") && lines[1].ends_with("] plain"));
        assert!(lines[2].contains("ERROR") && lines[2].ends_with("] code 0x502"));
        assert!(lines[3].contains("DEBUG") && lines[3].ends_with("]    7"));
        assert!(lines[4].ends_with("] explicit"));
        assert!(lines[0].contains("[macros.rs"));
    }

    #[test]
    fn test_print_now_does_not_need_a_logger() {
        crate::print_now!(LogLevel::Error, "renderer error {}", 1282);
    }
}
