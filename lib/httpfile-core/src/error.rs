//! Error types for httpfile.

use std::sync::Arc;

use derive_more::{Display, Error, From};

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for httpfile operations.
///
/// Errors are `Clone` so that a [`TransferResult`] can hand out its stored
/// error from every accessor without giving it up.
///
/// [`TransferResult`]: https://docs.rs/httpfile/latest/httpfile/struct.TransferResult.html
#[derive(Debug, Clone, Display, Error, From)]
pub enum Error {
    /// The target URL was empty.
    #[display("empty target URL")]
    #[from(skip)]
    EmptyTargetUrl,

    /// An operation that needs a local file was given no path.
    #[display("empty file path")]
    #[from(skip)]
    EmptyFilePath,

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// A multipart part could not be framed.
    #[display("error writing to buffer: {_0}")]
    #[from(skip)]
    Multipart(#[error(not(source))] String),

    /// Filesystem error while reading a source or writing a destination.
    #[display("I/O error: {_0}")]
    #[from(skip)]
    Io(Arc<std::io::Error>),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The transport could not build a request from the given parts.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The server answered with a status of 400 or above.
    ///
    /// Displays as the response body text alone.
    #[display("{message}")]
    #[from(skip)]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The response body is not valid UTF-8.
    #[display("response body is not valid UTF-8: {_0}")]
    #[from]
    InvalidUtf8(std::string::FromUtf8Error),

    /// The `Content-Length` header is missing or not an integer.
    #[display("invalid Content-Length: {_0}")]
    #[from]
    ContentLength(std::num::ParseIntError),

    /// The response body was already drained or released.
    #[display("response body already consumed")]
    #[from(skip)]
    BodyConsumed,

    /// There is no response to read from.
    #[display("no response available")]
    #[from(skip)]
    NoResponse,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl Error {
    /// Create an HTTP status error from the status code and body text.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a multipart framing error.
    #[must_use]
    pub fn multipart(message: impl Into<String>) -> Self {
        Self::Multipart(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the error was raised before any network activity
    /// because the call was misconfigured.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyTargetUrl | Self::EmptyFilePath | Self::InvalidUrl(_)
        )
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Returns the underlying I/O error kind, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(err) => Some(err.kind()),
            _ => None,
        }
    }
}
