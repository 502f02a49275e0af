#![doc = include_str!("README.md")]

#[cfg(feature = "affinity")]
use crate::affinity;
use crate::config::{LoggerConfig, WorkerCore};
use crate::format::{Layout, banner_line};
use crate::immediate::print_immediate;
use crate::record::{LogLevel, LogRecord, SourceLocation};
use crate::sink::{ConsoleSink, LogSink};
use crossbeam_utils::CachePadded;
use ring_buffer::{Pushed, Rejected, RingBuffer};
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to spawn logger worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("log sink refused a write: {0}")]
    SinkWrite(#[source] io::Error),
}

/// Everything the lock guards: the mailbox and the shutdown request.
struct State {
    buffer: RingBuffer<LogRecord>,
    shutdown: bool,
    /// Set by the worker, under the lock, once it has drained the buffer for
    /// shutdown. Later submissions go to the immediate path instead.
    closed: bool,
}

/// Monotonic counters. Producers bump `submitted`, the worker bumps
/// `written`; padding keeps the two hot counters on separate cache lines.
#[derive(Default)]
struct Counters {
    submitted: CachePadded<AtomicU64>,
    written: CachePadded<AtomicU64>,
    dropped: AtomicU64,
    overwritten: AtomicU64,
    grown: AtomicU64,
    bypassed: AtomicU64,
}

impl Counters {
    /// Counts a non-trivial push outcome and describes it for the
    /// immediate path. `None` for a plain store.
    fn account(&self, outcome: &Result<Pushed<LogRecord>, Rejected<LogRecord>>) -> Option<String> {
        match outcome {
            Ok(Pushed::Stored) => None,
            Ok(Pushed::Grew { from, to }) => {
                self.grown.fetch_add(1, Ordering::Relaxed);
                Some(format!("log buffer full, capacity grew {from} -> {to}"))
            }
            Ok(Pushed::Overwrote(old)) => {
                self.overwritten.fetch_add(1, Ordering::Relaxed);
                Some(format!(
                    "log buffer full, overwrote oldest record: {}",
                    old.message()
                ))
            }
            Err(rejected) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Some(format!(
                    "{}; dropped record: {}",
                    rejected.error,
                    rejected.item.message()
                ))
            }
        }
    }
}

/// The state shared between every handle and the worker.
struct Shared {
    state: Mutex<State>,
    signal: Condvar,
    /// Cleared when the worker stops draining, for any reason.
    alive: AtomicBool,
    counters: Counters,
}

impl Shared {
    /// A panicking submitter must not take logging down with it, so a
    /// poisoned lock is simply reclaimed. The ring buffer never panics
    /// half-way through a mutation.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Snapshot returned by [`LoggerHandle::health`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoggerHealth {
    /// `false` once the worker has exited, either on shutdown or after a
    /// sink failure. After a sink failure records are queued but never
    /// written; after shutdown they go straight to stdout.
    pub alive: bool,
    pub pending: usize,
    pub capacity: usize,
    pub submitted: u64,
    pub written: u64,
    /// Records discarded because the buffer hit its maximum capacity.
    pub dropped: u64,
    /// Records evicted under `OverflowPolicy::OverwriteOldest`.
    pub overwritten: u64,
    /// Number of times the buffer doubled.
    pub grown: u64,
    /// Records printed on the immediate path because the logger had shut down.
    pub bypassed: u64,
}

/// Cheap, cloneable submission handle.
///
/// This is what components hold in place of a process-wide logger pointer:
/// the application root owns the [`Logger`] and passes handles down.
#[derive(Clone)]
pub struct LoggerHandle {
    shared: Arc<Shared>,
}

impl LoggerHandle {
    /// Queues one record for the worker.
    ///
    /// Never fails and never blocks beyond the push critical section. Buffer
    /// growth, eviction and capacity overruns are reported on the immediate
    /// path once the lock is released, tagged with the submitter's location.
    /// Once the logger has shut down the record itself is printed there.
    pub fn submit(&self, level: LogLevel, file: &'static str, line: u32, message: impl Into<String>) {
        let record = LogRecord::new(level, SourceLocation::new(file, line), message);
        let counters = &self.shared.counters;
        counters.submitted.fetch_add(1, Ordering::Relaxed);

        let outcome = {
            let mut state = self.shared.lock();
            if state.closed {
                Err(record)
            } else {
                Ok(state.buffer.push(record))
            }
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(late) => {
                counters.bypassed.fetch_add(1, Ordering::Relaxed);
                print_immediate(late.level(), file, line, late.message());
                return;
            }
        };
        self.shared.signal.notify_one();

        if let Some(report) = counters.account(&outcome) {
            print_immediate(LogLevel::Error, file, line, &report);
        }
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.submit_from_caller(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.submit_from_caller(LogLevel::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.submit_from_caller(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.submit_from_caller(LogLevel::Debug, message);
    }

    #[track_caller]
    fn submit_from_caller(&self, level: LogLevel, message: impl Into<String>) {
        let caller = Location::caller();
        self.submit(level, caller.file(), caller.line(), message);
    }

    /// `true` while the worker is draining.
    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::Acquire)
    }

    pub fn health(&self) -> LoggerHealth {
        let (pending, capacity) = {
            let state = self.shared.lock();
            (state.buffer.len(), state.buffer.capacity())
        };
        let c = &self.shared.counters;
        LoggerHealth {
            alive: self.is_alive(),
            pending,
            capacity,
            submitted: c.submitted.load(Ordering::Relaxed),
            written: c.written.load(Ordering::Relaxed),
            dropped: c.dropped.load(Ordering::Relaxed),
            overwritten: c.overwritten.load(Ordering::Relaxed),
            grown: c.grown.load(Ordering::Relaxed),
            bypassed: c.bypassed.load(Ordering::Relaxed),
        }
    }
}

/// Owner of the worker thread.
///
/// Exactly one should exist per process, created at startup. Dropping it
/// (or calling [`shutdown`](Self::shutdown)) drains every queued record and
/// joins the worker. The join has no timeout: a sink that hangs stalls
/// shutdown rather than losing lines.
pub struct Logger {
    handle: LoggerHandle,
    worker: Option<JoinHandle<()>>,
}

impl Logger {
    /// Starts a logger writing to stdout.
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        Self::with_sink(config, ConsoleSink::new())
    }

    /// Starts a logger writing to `sink`.
    ///
    /// All shared state is built before the worker is spawned, so the worker
    /// never observes a partially initialized logger.
    pub fn with_sink<S: LogSink + 'static>(config: LoggerConfig, sink: S) -> Result<Self, LoggerError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                buffer: RingBuffer::with_limits(config.capacity, config.max_capacity, config.overflow),
                shutdown: false,
                closed: false,
            }),
            signal: Condvar::new(),
            alive: AtomicBool::new(true),
            counters: Counters::default(),
        });

        let worker = Worker {
            shared: Arc::clone(&shared),
            sink: Box::new(sink),
            layout: config.layout,
            banner: config.banner,
            core: config.worker_core,
        };

        let join = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || worker.run())
            .map_err(LoggerError::Spawn)?;

        Ok(Self {
            handle: LoggerHandle { shared },
            worker: Some(join),
        })
    }

    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    pub fn submit(&self, level: LogLevel, file: &'static str, line: u32, message: impl Into<String>) {
        self.handle.submit(level, file, line, message);
    }

    pub fn health(&self) -> LoggerHealth {
        self.handle.health()
    }

    /// Drains and stops the worker. Same as dropping the logger, spelled out.
    pub fn shutdown(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        self.handle.submit(LogLevel::Info, file!(), line!(), "Finishing logging...");

        self.handle.shared.lock().shutdown = true;
        self.handle.shared.signal.notify_one();

        if worker.join().is_err() {
            print_immediate(LogLevel::Error, file!(), line!(), "logger worker panicked");
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.finish();
    }
}

/// The single consumer. Lives on the worker thread.
struct Worker {
    shared: Arc<Shared>,
    sink: Box<dyn LogSink>,
    layout: Layout,
    banner: bool,
    core: WorkerCore,
}

impl Worker {
    fn run(mut self) {
        #[cfg(feature = "affinity")]
        affinity::pin_worker(self.core);
        #[cfg(not(feature = "affinity"))]
        let _ = self.core;

        tracing::debug!("logger worker started");

        if let Err(err) = self.drain() {
            print_immediate(
                LogLevel::Error,
                file!(),
                line!(),
                &format!("{err}; logger worker stopped, further records will not be written"),
            );
            tracing::error!(error = %err, "logger worker stopped on sink failure");
        }

        self.shared.alive.store(false, Ordering::Release);
        tracing::debug!("logger worker exited");
    }

    fn drain(&mut self) -> Result<(), LoggerError> {
        if self.banner {
            self.write(&banner_line())?;
        }

        while let Some((record, now_empty)) = self.next_record() {
            // The lock is already released here; I/O never happens under it.
            let line = self.layout.format_record(&record);
            self.write(&line)?;
            self.shared.counters.written.fetch_add(1, Ordering::Relaxed);
            if now_empty {
                self.sink.flush().map_err(LoggerError::SinkWrite)?;
            }
        }

        if self.banner {
            self.write("")?;
        }
        self.sink.flush().map_err(LoggerError::SinkWrite)
    }

    /// Blocks until a record is available or shutdown is requested with an
    /// empty buffer (`None`). Also reports whether the pop left the buffer
    /// empty, which is when the sink gets flushed.
    fn next_record(&self) -> Option<(LogRecord, bool)> {
        loop {
            let guard = self.shared.lock();
            let mut state = self
                .shared
                .signal
                .wait_while(guard, |s| s.buffer.is_empty() && !s.shutdown)
                .unwrap_or_else(PoisonError::into_inner);

            if state.buffer.is_empty() {
                // Only reachable with shutdown set: drained, done.
                state.closed = true;
                return None;
            }

            match state.buffer.pop() {
                Ok(record) => return Some((record, state.buffer.is_empty())),
                Err(err) => {
                    drop(state);
                    print_immediate(LogLevel::Error, file!(), line!(), &err.to_string());
                }
            }
        }
    }

    fn write(&mut self, line: &str) -> Result<(), LoggerError> {
        self.sink.write_line(line).map_err(LoggerError::SinkWrite)
    }
}
