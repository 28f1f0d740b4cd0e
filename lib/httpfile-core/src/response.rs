//! HTTP response with a lazily read, single-use body.
//!
//! A [`Response`] owns the body stream of one exchange. The stream is handed
//! out at most once ([`Response::take_body`]) or drained in place
//! ([`Response::collect_body`]); afterwards the response only carries status
//! and headers. Dropping the stream releases the underlying connection.

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use http::HeaderMap;

use crate::{Error, Result, StreamingBody};

/// HTTP response with status, headers, and a streaming body.
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Option<StreamingBody>,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_consumed", &self.body.is_none())
            .finish()
    }
}

impl Response {
    /// Creates a new response around a body stream.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: StreamingBody) -> Self {
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// Creates a response whose body is already in memory.
    ///
    /// Mostly useful for test transports.
    #[must_use]
    pub fn buffered(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes> = Ok(body.into());
        Self::new(status, headers, Box::pin(futures_util::stream::iter([chunk])))
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    ///
    /// Values that are not visible ASCII are reported as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx or 5xx.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Returns `true` once the body was taken, drained or released.
    #[must_use]
    pub const fn is_body_consumed(&self) -> bool {
        self.body.is_none()
    }

    /// Take the body stream out of the response.
    ///
    /// Returns `None` if it was already taken, drained or released.
    pub fn take_body(&mut self) -> Option<StreamingBody> {
        self.body.take()
    }

    /// Drop the body stream, releasing the connection. Idempotent.
    pub fn release_body(&mut self) {
        self.body = None;
    }

    /// Drain the whole body into memory.
    ///
    /// The stream is released whether or not draining succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BodyConsumed`] if the body is gone, or the first
    /// error yielded by the stream.
    pub async fn collect_body(&mut self) -> Result<Bytes> {
        let mut body = self.take_body().ok_or(Error::BodyConsumed)?;
        let mut collected = BytesMut::new();

        while let Some(chunk) = body.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Ok(collected.freeze())
    }
}
