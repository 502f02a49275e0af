use crate::logger::LoggerHandle;
use crate::record::LogLevel;
use std::panic::Location;
use std::time::{Duration, Instant};

/// Stopwatch that optionally reports each lap through the logger.
pub struct Timer {
    started: Instant,
    log: Option<LoggerHandle>,
}

impl Timer {
    /// A timer that logs its result on `stop` when `log` is present.
    pub fn new(log: Option<LoggerHandle>) -> Self {
        Self {
            started: Instant::now(),
            log,
        }
    }

    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn start(&mut self) {
        self.started = Instant::now();
    }

    /// Elapsed time since the last `start`, truncated to whole microseconds.
    /// Logged at INFO from the caller's location as
    /// `TimerID: <id>, Time passed = <us>us`.
    #[track_caller]
    pub fn stop(&self, id: i32) -> Duration {
        let elapsed = self.started.elapsed();
        let micros = elapsed.as_micros();
        if let Some(log) = &self.log {
            let caller = Location::caller();
            log.submit(
                LogLevel::Info,
                caller.file(),
                caller.line(),
                format!("TimerID: {id}, Time passed = {micros}us"),
            );
        }
        Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Logger, LoggerConfig, MemorySink};
    use std::thread;

    #[test]
    fn test_silent_timer_measures() {
        let mut timer = Timer::silent();
        timer.start();
        thread::sleep(Duration::from_millis(10));
        let d = timer.stop(-1);
        assert!(d >= Duration::from_millis(10));
        assert_eq!(d.subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_logged_timer_reports_id_and_duration() {
        let sink = MemorySink::new();
        let logger = Logger::with_sink(LoggerConfig::default().with_banner(false), sink.clone()).unwrap();

        let mut timer = Timer::new(Some(logger.handle()));
        timer.start();
        let d = timer.stop(7);
        logger.shutdown();

        let line = &sink.lines()[0];
        assert!(line.contains("INFO"));
        assert!(line.ends_with(&format!("TimerID: 7, Time passed = {}us", d.as_micros())));
        assert!(line.contains("[mod.rs"));
    }
}
