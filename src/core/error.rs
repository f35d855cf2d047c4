//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Writer error from an appender
    #[error("Writer error ({appender}): {message}")]
    WriterError { appender: String, message: String },

    /// A panic caught by `recover`
    #[error("{label} panic: {message}")]
    Panicked { label: String, message: String },

    /// Request body could not be captured by the request logger
    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a writer error for the named appender
    pub fn writer(appender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WriterError {
            appender: appender.into(),
            message: message.into(),
        }
    }

    /// Create a recovered panic error
    pub fn panicked(label: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Panicked {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Create a body capture error
    pub fn body_read(message: impl Into<String>) -> Self {
        LoggerError::BodyRead(message.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
