//! Per-request log record

use super::context::ContextError;
use axum::http::{header, HeaderMap};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Facts about one request/response cycle
///
/// The label (`"GET /users: 12ms"`) becomes the log message; the captured
/// headers, params and body become its metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLogEntry {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub params: BTreeMap<String, Vec<String>>,
    pub body: String,
    pub latency: Duration,
    pub context_error: Option<ContextError>,
}

impl RequestLogEntry {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Copy every header value, grouped by name
    pub fn capture_headers(&mut self, headers: &HeaderMap) {
        for (name, value) in headers {
            self.headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
    }

    /// Decode a raw query string into repeated key/value lists
    pub fn capture_query(&mut self, query: Option<&str>) {
        let Some(query) = query else {
            return;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            self.params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }

    /// Keep the body text, re-indenting it when it is JSON
    pub fn capture_body(&mut self, body: &[u8], is_json: bool) {
        self.body = if is_json {
            serde_json::from_slice::<serde_json::Value>(body)
                .and_then(|value| serde_json::to_string_pretty(&value))
                .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned())
        } else {
            String::from_utf8_lossy(body).into_owned()
        };
    }

    pub fn latency_ms(&self) -> u128 {
        self.latency.as_millis()
    }

    /// Log message for this request
    pub fn label(&self) -> String {
        let base = format!("{} {}: {}ms", self.method, self.path, self.latency_ms());
        match &self.context_error {
            None => base,
            Some(ContextError::DeadlineExceeded) => format!("{} (DEADLINE EXCEEDED)", base),
            Some(ContextError::Canceled) => format!("{} (CANCELLED)", base),
            Some(err) => format!("{} ({})", base, err),
        }
    }
}

/// Whether the content type announces a JSON body
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::CONTENT_TYPE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.trim_start().starts_with("application/json"))
}

fn write_lists(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    lists: &BTreeMap<String, Vec<String>>,
) -> fmt::Result {
    if lists.is_empty() {
        return Ok(());
    }
    let parts: Vec<String> = lists
        .iter()
        .map(|(key, values)| format!("{}: [{}]", key, values.join(", ")))
        .collect();
    write!(f, "\n{}: {}", title, parts.join("; "))
}

impl fmt::Display for RequestLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lists(f, "Headers", &self.headers)?;
        write_lists(f, "Params", &self.params)?;
        if !self.body.is_empty() {
            write!(f, "\nBody: {}", self.body)?;
        }
        Ok(())
    }
}

impl Serialize for RequestLogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("method", &self.method)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("latency_ms", &(self.latency_ms() as u64))?;
        if !self.headers.is_empty() {
            map.serialize_entry("headers", &self.headers)?;
        }
        if !self.params.is_empty() {
            map.serialize_entry("params", &self.params)?;
        }
        if !self.body.is_empty() {
            map.serialize_entry("body", &self.body)?;
        }
        if let Some(ref err) = self.context_error {
            map.serialize_entry("cancel_reason", &err.to_string())?;
        }
        map.end()
    }
}
