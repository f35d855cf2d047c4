//! # Tagged Logger
//!
//! A structured logging engine with tag-scoped sub-loggers and HTTP request
//! logging.
//!
//! ## Features
//!
//! - **Severity gating**: entries below the configured level cost one read lock
//! - **Two formats**: a single human-readable line or a flat JSON object
//! - **Accurate call sites**: `file:line` of the caller, however many
//!   sub-loggers the call passes through
//! - **Live reconfiguration**: every clone and sub-logger shares one configuration
//! - **Panic recovery**: [`recover`] turns a panic into a logged error value
//! - **Request logging** (`http` feature): axum middleware and a client
//!   transport that emit one entry per request, off the response path
//!
//! ```
//! use tagged_logger::prelude::*;
//!
//! let memory = MemoryAppender::new();
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .tags(["api"])
//!     .appender(memory.clone())
//!     .build();
//!
//! let users = logger.sublogger(["users"]);
//! users.info_with("created", "id=42");
//! tagged_logger::debug!(users, "cache size {}", 3);
//!
//! assert!(memory.lines()[0].contains("(api,users) created id=42"));
//! ```

pub mod appenders;
pub mod core;
#[cfg(feature = "http")]
pub mod http;
pub mod macros;

pub use core::global;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, MemoryAppender, WriterAppender};
    pub use crate::core::{
        recover, Appender, CallSite, Log, LogEntry, LogExt, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, Metadata, OutputFormat, Result, Sublogger,
        TimestampFormat,
    };
    #[cfg(feature = "http")]
    pub use crate::http::{
        ContextError, RequestContext, RequestLogEntry, RequestLogger, RequestLoggerConfig,
        Transport,
    };
}

pub use appenders::{ConsoleAppender, MemoryAppender, WriterAppender};
pub use core::{
    recover, Appender, CallSite, ExitAction, Log, LogEntry, LogExt, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Metadata, OutputFormat, Result,
    Sublogger, TimestampFormat,
};
