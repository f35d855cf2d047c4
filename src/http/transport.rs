//! Client-side request logging
//!
//! [`LoggingTransport`] wraps any [`Transport`] (a `reqwest::Client` out of
//! the box) and logs every outbound request the same way the server
//! middleware logs inbound ones. The inner result is returned untouched.

use super::context::{ContextError, RequestContext};
use super::entry::{is_json, RequestLogEntry};
use super::middleware::RequestLogger;
use crate::core::LoggerError;
use async_trait::async_trait;
use std::time::Instant;

/// Something that can execute an outbound HTTP request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        reqwest::Client::execute(self, request).await
    }
}

/// Transport decorator that logs one entry per request
#[derive(Debug, Clone)]
pub struct LoggingTransport<T> {
    inner: T,
    logger: RequestLogger,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T, logger: RequestLogger) -> Self {
        Self { inner, logger }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Execute `request`, classifying the outcome from `ctx`.
    ///
    /// A timeout reported by the inner transport counts as an exceeded
    /// deadline even when `ctx` itself is still live.
    pub async fn execute_with_context(
        &self,
        request: reqwest::Request,
        ctx: &RequestContext,
    ) -> reqwest::Result<reqwest::Response> {
        let config = self.logger.config();
        let mut entry = RequestLogEntry::new(request.method().as_str(), request.url().path());

        if config.headers {
            entry.capture_headers(request.headers());
        }
        if config.params {
            entry.capture_query(request.url().query());
        }
        if config.body {
            let buffered = request
                .body()
                .map(|body| body.as_bytes().map(<[u8]>::to_vec));
            match buffered {
                None => {}
                Some(Some(bytes)) => entry.capture_body(&bytes, is_json(request.headers())),
                Some(None) => {
                    let err = LoggerError::body_read("streaming body cannot be captured");
                    self.logger.capture_failed(request.url().as_str(), &err);
                    return self.inner.execute(request).await;
                }
            }
        }

        let start = Instant::now();
        let result = self.inner.execute(request).await;
        entry.latency = start.elapsed();
        entry.context_error = ctx.err().or_else(|| match &result {
            Err(e) if e.is_timeout() => Some(ContextError::DeadlineExceeded),
            _ => None,
        });

        self.logger.log_request(entry);
        result
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn execute(&self, request: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.execute_with_context(request, &RequestContext::new()).await
    }
}
