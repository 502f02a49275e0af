use crate::format::Layout;
use ring_buffer::{DEFAULT_MAX_CAPACITY, OverflowPolicy};

/// Default number of pending records the mailbox holds before growing.
pub const DEFAULT_CAPACITY: usize = 8192;

pub const DEFAULT_THREAD_NAME: &str = "ringlog-worker";

/// Which CPU core, if any, the worker thread should be pinned to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkerCore {
    /// Leave scheduling to the OS.
    #[default]
    Unpinned,
    /// The last core reported by the OS, usually far from the busy low cores.
    LastCore,
    /// Position in the list returned by `affinity::available_cores`.
    Index(usize),
}

/// Construction-time settings for a [`Logger`](crate::Logger).
///
/// There is no file or environment layer: the application builds one of
/// these at startup and hands it to the logger.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    /// Initial ring buffer capacity (raised to at least 2).
    pub capacity: usize,
    /// Hard cap on ring buffer growth. Submissions past it are dropped with a
    /// warning on the immediate path.
    pub max_capacity: usize,
    /// Grow (default, never loses records) or overwrite the oldest record.
    pub overflow: OverflowPolicy,
    pub layout: Layout,
    /// Write a banner line on startup and a blank line on shutdown.
    pub banner: bool,
    pub worker_core: WorkerCore,
    pub thread_name: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
            overflow: OverflowPolicy::Grow,
            layout: Layout::default(),
            banner: true,
            worker_core: WorkerCore::Unpinned,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl LoggerConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }

    pub fn with_worker_core(mut self, worker_core: WorkerCore) -> Self {
        self.worker_core = worker_core;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
