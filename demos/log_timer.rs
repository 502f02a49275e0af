//! Compares the caller-side cost of printing directly against submitting to
//! the async logger.
//!
//! Run with: cargo run --example log_timer

use ringlog::{LogLevel, Logger, LoggerConfig, LoggerError, Timer, WorkerCore, log_info};
use std::time::Duration;

const ITERATIONS: u32 = 100;

fn main() -> Result<(), LoggerError> {
    let logger = Logger::new(LoggerConfig::default().with_worker_core(WorkerCore::LastCore))?;
    let log = logger.handle();

    let mut direct = Duration::ZERO;
    for i in 0..ITERATIONS {
        let mut timer = Timer::new(Some(log.clone()));
        timer.start();
        println!("println #{i}");
        direct += timer.stop(i as i32);
    }

    let mut queued = Duration::ZERO;
    for i in 0..ITERATIONS {
        let mut timer = Timer::new(Some(log.clone()));
        timer.start();
        log_info!(log, "Log #{}", i);
        queued += timer.stop(i as i32);
    }

    log_info!(log, "println avg = {}us", (direct / ITERATIONS).as_micros());
    log_info!(log, "Log avg = {}us", (queued / ITERATIONS).as_micros());
    log.submit(LogLevel::Info, file!(), line!(), "Unit tests finished.");

    let health = log.health();
    log_info!(
        log,
        "submitted={} written={} pending={} capacity={}",
        health.submitted,
        health.written,
        health.pending,
        health.capacity
    );

    // Drains everything above before returning.
    logger.shutdown();
    Ok(())
}
