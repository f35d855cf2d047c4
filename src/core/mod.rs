//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod error;
pub mod global;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metadata;
pub mod metrics;
pub mod output_format;
pub mod recover;
pub mod sublogger;
pub mod timestamp;
pub mod whitespace;

pub use appender::Appender;
pub use caller::CallSite;
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{default_exit_action, ExitAction, Log, LogExt, Logger, LoggerBuilder};
pub use metadata::Metadata;
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use recover::recover;
pub use sublogger::Sublogger;
pub use timestamp::TimestampFormat;
