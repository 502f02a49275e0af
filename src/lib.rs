#[cfg(feature = "affinity")]
pub mod affinity;
pub mod config;
pub mod format;
pub mod immediate;
pub mod logger;
mod macros;
pub mod record;
pub mod sink;
pub mod timer;

pub use config::{LoggerConfig, WorkerCore};
pub use format::Layout;
pub use immediate::print_immediate;
pub use logger::{Logger, LoggerError, LoggerHandle, LoggerHealth};
pub use record::{LogLevel, LogRecord, SourceLocation};
pub use ring_buffer::{BufferError, OverflowPolicy};
pub use sink::{ConsoleSink, LogSink, MemorySink, WriterSink};
pub use timer::Timer;
