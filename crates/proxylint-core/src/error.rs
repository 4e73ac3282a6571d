//! Error types and handling for config linting operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for proxylint operations
#[derive(Debug, Error)]
pub enum ProxyLintError {
    /// Malformed JSON/JSONC document
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: u32,
        column: u32,
    },

    /// The document parsed but its root is not an object
    #[error("Expected an object at the document root, found {found}")]
    UnexpectedRoot { found: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// JSON Schema compilation or validation errors
    #[error("Schema error for '{schema}': {message}")]
    SchemaError { schema: String, message: String },

    /// Remote schema fetch errors
    #[error("Failed to fetch '{url}': {message}")]
    FetchError { url: String, message: String },

    /// Bundled reference data could not be decoded
    #[error("Reference data error in '{name}': {message}")]
    DataError { name: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Schema,
    Fetch,
    Data,
    Io,
    Internal,
}

impl ProxyLintError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyLintError::ParseError { .. } | ProxyLintError::UnexpectedRoot { .. } => {
                ErrorKind::Parse
            }
            ProxyLintError::ConfigError { .. } => ErrorKind::Config,
            ProxyLintError::SchemaError { .. } => ErrorKind::Schema,
            ProxyLintError::FetchError { .. } => ErrorKind::Fetch,
            ProxyLintError::DataError { .. } => ErrorKind::Data,
            ProxyLintError::IoError { .. } => ErrorKind::Io,
            ProxyLintError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the lint pass can continue without it)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Schema | ErrorKind::Fetch
        )
    }

    /// Create a parse error at a 1-based line/column
    pub fn parse_error(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema_error(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaError {
            schema: schema.into(),
            message: message.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchError {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ProxyLintError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
