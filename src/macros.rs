//! Logging macros for ergonomic log message formatting.
//!
//! These macros take any [`Log`](crate::Log) implementor and `format!`-style
//! arguments. Arguments are only formatted when the level is admitted, and
//! the reported caller is the line where the macro is invoked.
//!
//! # Examples
//!
//! ```
//! use tagged_logger::prelude::*;
//! use tagged_logger::info;
//!
//! let logger = Logger::builder().appender(MemoryAppender::new()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Through a sub-logger
//! let db = logger.sublogger(["db"]);
//! info!(db, "pool size {}", 16);
//! ```

/// Log a message at an explicit level.
///
/// Never runs the exit action, even at [`LogLevel::Fatal`](crate::LogLevel::Fatal).
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use tagged_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::LogExt::log_fmt(&$logger, $level, format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::LogExt::trace_fmt(&$logger, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use tagged_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::LogExt::debug_fmt(&$logger, format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::LogExt::info_fmt(&$logger, format_args!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::LogExt::warn_fmt(&$logger, format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// ```
/// # use tagged_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use tagged_logger::error;
/// let code = 503;
/// error!(logger, "Upstream returned {}", code);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::LogExt::error_fmt(&$logger, format_args!($($arg)+))
    };
}

/// Log a fatal message, then run the logger's exit action.
///
/// ```
/// # use tagged_logger::prelude::*;
/// let logger = Logger::builder()
///     .appender(MemoryAppender::new())
///     .exit_action(|| println!("exit suppressed"))
///     .build();
/// tagged_logger::fatal!(logger, "Cannot bind port {}", 80);
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::LogExt::fatal_fmt(&$logger, format_args!($($arg)+))
    };
}
