//! Metadata attached to log entries
//!
//! A payload is classified once, when it is handed to the logger, into one of
//! a small set of shapes. Pretty output then picks its text with the fixed
//! precedence string > description > error description > debug dump, and
//! structured output picks the serialized form, falling back to the text
//! whenever a value has no meaningful structure of its own.

use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    /// Plain string payload
    Text(String),
    /// A value that knows how to describe itself, optionally with a structured form
    Described {
        description: String,
        structured: Option<Value>,
    },
    /// An error; without a structured form its description is used everywhere
    Error {
        description: String,
        structured: Option<Value>,
    },
    /// Any serializable value, shown in pretty output as its debug dump
    Opaque { dump: String, structured: Value },
    /// Sequence of payloads, each classified on its own
    List(Vec<Metadata>),
}

impl Metadata {
    pub fn text(text: impl Into<String>) -> Self {
        Metadata::Text(text.into())
    }

    /// A value described by its `Display` output
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Metadata::Described {
            description: value.to_string(),
            structured: None,
        }
    }

    /// A value with both a description and its own structured encoding
    pub fn described<T: fmt::Display + Serialize + ?Sized>(value: &T) -> Self {
        Metadata::Described {
            description: value.to_string(),
            structured: serde_json::to_value(value).ok(),
        }
    }

    /// An error without structured encoding: its description stands in for it
    pub fn error<E: StdError + ?Sized>(err: &E) -> Self {
        Metadata::Error {
            description: err.to_string(),
            structured: None,
        }
    }

    /// An error that also serializes itself
    pub fn serializable_error<E: StdError + Serialize + ?Sized>(err: &E) -> Self {
        Metadata::Error {
            description: err.to_string(),
            structured: serde_json::to_value(err).ok(),
        }
    }

    /// Arbitrary data. If serialization fails the debug dump is used as a string.
    pub fn value<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Self {
        let dump = format!("{:?}", value);
        let structured = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(_) => Value::String(dump.clone()),
        };
        Metadata::Opaque { dump, structured }
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Metadata>,
    {
        Metadata::List(items.into_iter().map(Into::into).collect())
    }

    /// A sequence of errors, each replaced by its description
    pub fn errors<'a, I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = &'a E>,
        E: StdError + ?Sized + 'a,
    {
        Metadata::List(errors.into_iter().map(Metadata::error).collect())
    }

    /// Text used by pretty rendering
    pub fn pretty(&self) -> String {
        match self {
            Metadata::Text(text) => text.clone(),
            Metadata::Described { description, .. } => description.clone(),
            Metadata::Error { description, .. } => description.clone(),
            Metadata::Opaque { dump, .. } => dump.clone(),
            Metadata::List(items) => {
                let parts: Vec<String> = items.iter().map(Metadata::pretty).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    /// Value used by structured rendering
    pub fn to_json_value(&self) -> Value {
        match self {
            Metadata::Text(text) => Value::String(text.clone()),
            Metadata::Described {
                description,
                structured,
            }
            | Metadata::Error {
                description,
                structured,
            } => structured
                .clone()
                .unwrap_or_else(|| Value::String(description.clone())),
            Metadata::Opaque { structured, .. } => structured.clone(),
            Metadata::List(items) => Value::Array(items.iter().map(Metadata::to_json_value).collect()),
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl From<&str> for Metadata {
    fn from(s: &str) -> Self {
        Metadata::Text(s.to_string())
    }
}

impl From<String> for Metadata {
    fn from(s: String) -> Self {
        Metadata::Text(s)
    }
}

impl From<Value> for Metadata {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Metadata::Text(s),
            other => Metadata::Opaque {
                dump: other.to_string(),
                structured: other,
            },
        }
    }
}
