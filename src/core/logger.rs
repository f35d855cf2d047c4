//! Main logger implementation
//!
//! [`Log`] is the capability every logger flavor shares: the root
//! [`Logger`], [`Sublogger`] decorators and the HTTP request logger. The
//! severity-named entry points live on [`LogExt`], which every `Log` gets
//! for free; they capture the call site with `#[track_caller]` and pass it
//! down explicitly, so wrapping never shifts the reported `file:line`.

use super::{
    appender::Appender,
    caller::CallSite,
    config::LoggerConfig,
    error::Result,
    log_entry::LogEntry,
    log_level::LogLevel,
    metadata::Metadata,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    sublogger::Sublogger,
    timestamp::TimestampFormat,
};
use crate::appenders::ConsoleAppender;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// What happens after a fatal entry has been written
pub type ExitAction = Arc<dyn Fn() + Send + Sync>;

/// Terminates the process with status 1
pub fn default_exit_action() -> ExitAction {
    Arc::new(|| std::process::exit(1))
}

/// Capability shared by every logger flavor
pub trait Log: Send + Sync {
    /// Lowest level currently admitted
    fn min_level(&self) -> LogLevel;

    fn enabled(&self, level: LogLevel) -> bool {
        level.admitted_by(self.min_level())
    }

    /// Assemble an entry with this logger's tags and render settings
    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry;

    /// Render and hand the entry to the output
    fn write_entry(&self, entry: &LogEntry);

    /// Run the exit action
    fn exit(&self);

    /// Number of sub-logger layers between this logger and the root
    fn depth(&self) -> usize {
        0
    }

    /// Gate, build and write one entry
    fn dispatch(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) {
        if !self.enabled(level) {
            return;
        }
        let entry = self.entry(level, message, metadata, caller);
        self.write_entry(&entry);
    }
}

impl<L: Log + ?Sized> Log for Arc<L> {
    fn min_level(&self) -> LogLevel {
        (**self).min_level()
    }

    fn enabled(&self, level: LogLevel) -> bool {
        (**self).enabled(level)
    }

    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry {
        (**self).entry(level, message, metadata, caller)
    }

    fn write_entry(&self, entry: &LogEntry) {
        (**self).write_entry(entry)
    }

    fn exit(&self) {
        (**self).exit()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }
}

impl<L: Log + ?Sized> Log for Box<L> {
    fn min_level(&self) -> LogLevel {
        (**self).min_level()
    }

    fn enabled(&self, level: LogLevel) -> bool {
        (**self).enabled(level)
    }

    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry {
        (**self).entry(level, message, metadata, caller)
    }

    fn write_entry(&self, entry: &LogEntry) {
        (**self).write_entry(entry)
    }

    fn exit(&self) {
        (**self).exit()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }
}

impl<L: Log + ?Sized> Log for &L {
    fn min_level(&self) -> LogLevel {
        (**self).min_level()
    }

    fn enabled(&self, level: LogLevel) -> bool {
        (**self).enabled(level)
    }

    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry {
        (**self).entry(level, message, metadata, caller)
    }

    fn write_entry(&self, entry: &LogEntry) {
        (**self).write_entry(entry)
    }

    fn exit(&self) {
        (**self).exit()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }
}

/// Severity-named entry points, available on every [`Log`]
///
/// The `fatal*` methods run the exit action once the entry is written; the
/// generic `log*` methods never do, whatever the level.
pub trait LogExt: Log {
    #[track_caller]
    fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.dispatch(level, message.as_ref(), None, CallSite::caller());
    }

    #[track_caller]
    fn log_with(&self, level: LogLevel, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(level, message.as_ref(), Some(metadata.into()), CallSite::caller());
    }

    /// Formatted entry; the arguments are only formatted when the level is admitted
    #[track_caller]
    fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, &fmt::format(args), None, CallSite::caller());
    }

    #[track_caller]
    #[inline]
    fn trace(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Trace, message.as_ref(), None, CallSite::caller());
    }

    #[track_caller]
    #[inline]
    fn debug(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Debug, message.as_ref(), None, CallSite::caller());
    }

    #[track_caller]
    #[inline]
    fn info(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Info, message.as_ref(), None, CallSite::caller());
    }

    #[track_caller]
    #[inline]
    fn warn(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Warn, message.as_ref(), None, CallSite::caller());
    }

    #[track_caller]
    #[inline]
    fn error(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Error, message.as_ref(), None, CallSite::caller());
    }

    #[track_caller]
    fn fatal(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Fatal, message.as_ref(), None, CallSite::caller());
        self.exit();
    }

    #[track_caller]
    fn trace_with(&self, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(LogLevel::Trace, message.as_ref(), Some(metadata.into()), CallSite::caller());
    }

    #[track_caller]
    fn debug_with(&self, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(LogLevel::Debug, message.as_ref(), Some(metadata.into()), CallSite::caller());
    }

    #[track_caller]
    fn info_with(&self, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(LogLevel::Info, message.as_ref(), Some(metadata.into()), CallSite::caller());
    }

    #[track_caller]
    fn warn_with(&self, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(LogLevel::Warn, message.as_ref(), Some(metadata.into()), CallSite::caller());
    }

    #[track_caller]
    fn error_with(&self, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(LogLevel::Error, message.as_ref(), Some(metadata.into()), CallSite::caller());
    }

    #[track_caller]
    fn fatal_with(&self, message: impl AsRef<str>, metadata: impl Into<Metadata>) {
        self.dispatch(LogLevel::Fatal, message.as_ref(), Some(metadata.into()), CallSite::caller());
        self.exit();
    }

    #[track_caller]
    fn trace_fmt(&self, args: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Trace) {
            self.dispatch(LogLevel::Trace, &fmt::format(args), None, CallSite::caller());
        }
    }

    #[track_caller]
    fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Debug) {
            self.dispatch(LogLevel::Debug, &fmt::format(args), None, CallSite::caller());
        }
    }

    #[track_caller]
    fn info_fmt(&self, args: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Info) {
            self.dispatch(LogLevel::Info, &fmt::format(args), None, CallSite::caller());
        }
    }

    #[track_caller]
    fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Warn) {
            self.dispatch(LogLevel::Warn, &fmt::format(args), None, CallSite::caller());
        }
    }

    #[track_caller]
    fn error_fmt(&self, args: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Error) {
            self.dispatch(LogLevel::Error, &fmt::format(args), None, CallSite::caller());
        }
    }

    /// Formatted fatal entry followed by the exit action
    #[track_caller]
    fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.dispatch(LogLevel::Fatal, &fmt::format(args), None, CallSite::caller());
        self.exit();
    }

    /// Wrap this logger, appending `tags` to every entry
    fn sublogger<I, S>(&self, tags: I) -> Sublogger<Self>
    where
        Self: Clone + Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Sublogger::new(self.clone(), tags)
    }
}

impl<L: Log + ?Sized> LogExt for L {}

struct LoggerInner {
    config: RwLock<LoggerConfig>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    metrics: LoggerMetrics,
    exit_action: RwLock<ExitAction>,
}

/// The root logger
///
/// Cloning is cheap and every clone, and every sub-logger built from one,
/// shares the same configuration: [`Logger::configure`] is seen by all of
/// them on their next call.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Logger with default settings writing to stdout
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    /// Logger with `config` writing to stdout
    #[must_use]
    pub fn from_config(config: LoggerConfig) -> Self {
        Self::from_parts(
            config,
            vec![Box::new(ConsoleAppender::new())],
            default_exit_action(),
        )
    }

    fn from_parts(
        config: LoggerConfig,
        appenders: Vec<Box<dyn Appender>>,
        exit_action: ExitAction,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                config: RwLock::new(config),
                appenders: RwLock::new(appenders),
                metrics: LoggerMetrics::new(),
                exit_action: RwLock::new(exit_action),
            }),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use tagged_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .format(OutputFormat::Json)
    ///     .tags(["api"])
    ///     .build();
    /// assert_eq!(logger.config().tags, vec!["api"]);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Update the live configuration in place.
    ///
    /// Level, format, timestamp layout, color flag and tags change for this
    /// logger and everything derived from it. Caller capture keeps the value
    /// the logger was created with.
    pub fn configure(&self, config: LoggerConfig) {
        self.inner.config.write().update_from(config);
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoggerConfig {
        self.inner.config.read().clone()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.inner.config.write().min_level = level;
    }

    pub fn set_format(&self, format: OutputFormat) {
        self.inner.config.write().format = format;
    }

    pub fn set_time_format(&self, time_format: Option<TimestampFormat>) {
        self.inner.config.write().time_format = time_format;
    }

    pub fn set_colorize(&self, colorize: bool) {
        self.inner.config.write().colorize = colorize;
    }

    pub fn set_tags<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.config.write().tags = tags.into_iter().map(Into::into).collect();
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.inner.appenders.write().push(appender);
    }

    /// Replace what runs after a fatal entry
    pub fn set_exit_action<F>(&self, action: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.inner.exit_action.write() = Arc::new(action);
    }

    /// Get the logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    /// Lines that at least one appender failed to write
    pub fn dropped_count(&self) -> u64 {
        self.inner.metrics.dropped_count()
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.inner.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Write one line to every appender with per-appender panic isolation
    ///
    /// A failing or panicking appender is reported on stderr and counted;
    /// the remaining appenders still receive the line.
    fn process_sync(appenders: &mut [Box<dyn Appender>], line: &str, metrics: &LoggerMetrics) {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(line)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx, panic_msg
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }
    }
}

impl Log for Logger {
    fn min_level(&self) -> LogLevel {
        self.inner.config.read().min_level
    }

    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry {
        let config = self.inner.config.read();
        let entry = LogEntry::new(level, message)
            .with_tags(config.tags.iter().cloned())
            .with_format(config.format, config.effective_time_format())
            .with_colorize(config.colorize)
            .with_metadata(metadata);

        if config.capture_caller {
            entry.with_caller(caller)
        } else {
            entry
        }
    }

    fn write_entry(&self, entry: &LogEntry) {
        let line = entry.render();
        let mut appenders = self.inner.appenders.write();
        Self::process_sync(&mut appenders, &line, &self.inner.metrics);
    }

    fn exit(&self) {
        let action = Arc::clone(&self.inner.exit_action.read());
        action();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &*self.inner.config.read())
            .field("appenders", &self.inner.appenders.read().len())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use tagged_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .colorize(false)
///     .appender(memory.clone())
///     .exit_action(|| eprintln!("would exit"))
///     .build();
///
/// logger.fatal("shutting down");
/// assert_eq!(memory.len(), 1);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    appenders: Vec<Box<dyn Appender>>,
    exit_action: Option<ExitAction>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            appenders: Vec::new(),
            exit_action: None,
        }
    }

    /// Start from a complete configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, time_format: TimestampFormat) -> Self {
        self.config.time_format = Some(time_format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colorize(mut self, colorize: bool) -> Self {
        self.config.colorize = colorize;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capture_caller(mut self, capture: bool) -> Self {
        self.config.capture_caller = capture;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Add an appender. Without any, the logger writes to stdout.
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Replace the default process exit after fatal entries
    #[must_use = "builder methods return a new value"]
    pub fn exit_action<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.exit_action = Some(Arc::new(action));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let appenders = if self.appenders.is_empty() {
            vec![Box::new(ConsoleAppender::new()) as Box<dyn Appender>]
        } else {
            self.appenders
        };

        Logger::from_parts(
            self.config,
            appenders,
            self.exit_action.unwrap_or_else(default_exit_action),
        )
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
