//! Request logging middleware
//!
//! [`RequestLogger::wrap`] installs an axum middleware that captures the
//! request, times the downstream handler, classifies the outcome from the
//! request's [`RequestContext`] and hands the finished entry to a dedicated
//! worker thread. The response is returned without waiting for the write.

use super::context::{ContextError, RequestContext};
use super::entry::{is_json, RequestLogEntry};
use super::transport::{LoggingTransport, Transport};
use crate::core::{
    CallSite, Log, LogEntry, LogLevel, Logger, LoggerError, Metadata, Result, Sublogger,
};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use crossbeam_channel::{bounded, SendError, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// What the request logger captures and at which level each outcome is logged
///
/// A level of `None` disables logging for that outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLoggerConfig {
    pub headers: bool,
    pub params: bool,
    pub body: bool,
    /// Appended to the wrapped logger's tags
    pub tags: Vec<String>,
    /// Requests whose context is still live
    pub normal_level: Option<LogLevel>,
    pub deadline_exceeded_level: Option<LogLevel>,
    /// Explicit cancellation other than a timeout
    pub cancelled_level: Option<LogLevel>,
    /// Any other context error
    pub context_error_level: Option<LogLevel>,
}

impl Default for RequestLoggerConfig {
    fn default() -> Self {
        Self {
            headers: false,
            params: false,
            body: false,
            tags: Vec::new(),
            normal_level: Some(LogLevel::Debug),
            deadline_exceeded_level: Some(LogLevel::Warn),
            cancelled_level: Some(LogLevel::Warn),
            context_error_level: Some(LogLevel::Error),
        }
    }
}

impl RequestLoggerConfig {
    /// Level for a request that ended with `error`
    pub fn level_for(&self, error: Option<&ContextError>) -> Option<LogLevel> {
        match error {
            None => self.normal_level,
            Some(ContextError::DeadlineExceeded) => self.deadline_exceeded_level,
            Some(ContextError::Canceled) => self.cancelled_level,
            Some(ContextError::Other(_)) => self.context_error_level,
        }
    }
}

/// Writes finished request entries; shared with the worker thread
struct Emitter {
    logger: Sublogger<Arc<dyn Log>>,
    config: RequestLoggerConfig,
    caller: CallSite,
}

impl Emitter {
    fn emit(&self, entry: RequestLogEntry) {
        let Some(level) = self.config.level_for(entry.context_error.as_ref()) else {
            return;
        };
        self.logger.dispatch(
            level,
            &entry.label(),
            Some(Metadata::described(&entry)),
            self.caller,
        );
    }

    fn capture_failed(&self, target: &str, err: &LoggerError) {
        self.logger.dispatch(
            LogLevel::Error,
            &format!("error creating request log for {}:", target),
            Some(Metadata::error(err)),
            self.caller,
        );
    }
}

/// Block until the worker takes `entry`; write it here if the worker is gone
fn send_or_emit(sender: &Sender<RequestLogEntry>, emitter: &Emitter, entry: RequestLogEntry) {
    if let Err(SendError(entry)) = sender.send(entry) {
        emitter.emit(entry);
    }
}

struct RequestLoggerInner {
    emitter: Arc<Emitter>,
    sender: Sender<RequestLogEntry>,
}

/// Logs one entry per HTTP request, server or client side
///
/// Clones share the worker thread, which exits once the last clone (and
/// any pending hand-off) is gone.
#[derive(Clone)]
pub struct RequestLogger {
    inner: Arc<RequestLoggerInner>,
}

impl RequestLogger {
    /// Wrap `logger` with the configured tags and start the worker.
    ///
    /// Request entries report this call site as their caller.
    #[track_caller]
    pub fn new<L: Log + 'static>(logger: L, config: RequestLoggerConfig) -> Self {
        let caller = CallSite::caller();
        let parent: Arc<dyn Log> = Arc::new(logger);
        let emitter = Arc::new(Emitter {
            logger: Sublogger::new(parent, config.tags.clone()),
            config,
            caller,
        });

        let (sender, receiver) = bounded::<RequestLogEntry>(1);
        let worker = Arc::clone(&emitter);
        thread::spawn(move || {
            while let Ok(entry) = receiver.recv() {
                worker.emit(entry);
            }
        });

        Self {
            inner: Arc::new(RequestLoggerInner { emitter, sender }),
        }
    }

    pub fn config(&self) -> &RequestLoggerConfig {
        &self.inner.emitter.config
    }

    /// Add request logging to every route of `router`
    pub fn wrap<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(middleware::from_fn_with_state(self.clone(), log_requests))
    }

    /// Client-side counterpart around an outbound transport
    pub fn transport<T: Transport>(&self, inner: T) -> LoggingTransport<T> {
        LoggingTransport::new(inner, self.clone())
    }

    /// Write `entry` now, on the calling thread
    pub fn log_request(&self, entry: RequestLogEntry) {
        self.inner.emitter.emit(entry);
    }

    /// Hand `entry` to the worker without waiting on the response path
    pub(crate) fn submit(&self, entry: RequestLogEntry) {
        match self.inner.sender.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                let sender = self.inner.sender.clone();
                let emitter = Arc::clone(&self.inner.emitter);
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn_blocking(move || send_or_emit(&sender, &emitter, entry));
                    }
                    Err(_) => send_or_emit(&sender, &emitter, entry),
                }
            }
            Err(TrySendError::Disconnected(entry)) => self.log_request(entry),
        }
    }

    pub(crate) fn capture_failed(&self, target: &str, err: &LoggerError) {
        self.inner.emitter.capture_failed(target, err);
    }

    /// Read the request head and, if configured, its body
    async fn capture(&self, request: Request) -> Result<(Request, RequestLogEntry)> {
        let config = self.config();
        let mut entry = RequestLogEntry::new(request.method().as_str(), request.uri().path());

        if config.headers {
            entry.capture_headers(request.headers());
        }
        if config.params {
            entry.capture_query(request.uri().query());
        }
        if !config.body {
            return Ok((request, entry));
        }

        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|e| LoggerError::body_read(e.to_string()))?;
        entry.capture_body(&bytes, is_json(&parts.headers));

        Ok((Request::from_parts(parts, Body::from(bytes)), entry))
    }
}

async fn log_requests(
    State(request_logger): State<RequestLogger>,
    request: Request,
    next: Next,
) -> Response {
    let target = request.uri().to_string();
    let (mut request, mut entry) = match request_logger.capture(request).await {
        Ok(captured) => captured,
        Err(e) => {
            request_logger.capture_failed(&target, &e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let ctx = match request.extensions().get::<RequestContext>() {
        Some(ctx) => ctx.clone(),
        None => {
            let ctx = RequestContext::new();
            request.extensions_mut().insert(ctx.clone());
            ctx
        }
    };

    let start = Instant::now();
    let response = next.run(request).await;
    entry.latency = start.elapsed();
    entry.context_error = ctx.err();

    request_logger.submit(entry);
    response
}

impl Log for RequestLogger {
    fn min_level(&self) -> LogLevel {
        self.inner.emitter.logger.min_level()
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.inner.emitter.logger.enabled(level)
    }

    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry {
        self.inner.emitter.logger.entry(level, message, metadata, caller)
    }

    fn write_entry(&self, entry: &LogEntry) {
        self.inner.emitter.logger.write_entry(entry);
    }

    fn exit(&self) {
        self.inner.emitter.logger.exit();
    }

    fn depth(&self) -> usize {
        self.inner.emitter.logger.depth()
    }
}

impl From<Logger> for RequestLogger {
    #[track_caller]
    fn from(logger: Logger) -> Self {
        Self::new(logger, RequestLoggerConfig::default())
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("config", self.config())
            .field("caller", &self.inner.emitter.caller)
            .finish()
    }
}
