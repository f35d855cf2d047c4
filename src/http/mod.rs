//! HTTP request logging
//!
//! - [`RequestLogger::wrap`]: axum middleware for inbound requests
//! - [`RequestLogger::transport`]: decorator for outbound requests
//!
//! Both emit exactly one entry per request, labelled
//! `"<METHOD> <path>: <ms>ms"` and classified by the request's
//! [`RequestContext`].

pub mod context;
pub mod entry;
pub mod middleware;
pub mod transport;

pub use context::{ContextError, RequestContext};
pub use entry::RequestLogEntry;
pub use middleware::{RequestLogger, RequestLoggerConfig};
pub use transport::{LoggingTransport, Transport};
