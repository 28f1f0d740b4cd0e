//! Request/response logging for any [`Transport`].
//!
//! Exchanges are logged with the `tracing` crate inside an `http_request`
//! span; installing a subscriber is left to the application.

use std::time::Instant;

use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Request, Response, Result, Transport};

/// Log level for [`Logging`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request headers included).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

/// Transport decorator that logs requests and responses.
///
/// # Example
///
/// ```ignore
/// use httpfile::{HyperTransport, Logging};
///
/// let transport = Logging::new(HyperTransport::new());
/// ```
#[derive(Debug, Clone)]
pub struct Logging<T> {
    inner: T,
    level: LogLevel,
}

impl<T> Logging<T> {
    /// Wrap a transport, logging at info level.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }

    /// Wrap a transport, logging at debug level.
    pub fn debug(inner: T) -> Self {
        Self {
            inner,
            level: LogLevel::Debug,
        }
    }

    /// The configured log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// The wrapped transport.
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for Logging<T> {
    async fn send(&self, request: Request) -> Result<Response> {
        let method = request.method();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        async move {
            let start = Instant::now();

            match level {
                LogLevel::Debug => {
                    debug!(
                        method = %method,
                        url = %url,
                        headers = ?request.headers(),
                        body = ?request.body(),
                        "sending request"
                    );
                }
                LogLevel::Info => {
                    info!(method = %method, url = %url, "sending request");
                }
            }

            let result = self.inner.send(request).await;

            // Saturating conversion to u64 (truncates after ~584 million years)
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) if response.is_error() => {
                    warn!(
                        status = response.status(),
                        elapsed_ms, "request failed with HTTP error"
                    );
                }
                Ok(response) => {
                    info!(status = response.status(), elapsed_ms, "response received");
                }
                Err(err) => {
                    warn!(error = %err, elapsed_ms, "request failed");
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Extension methods available on every [`Transport`].
pub trait TransportExt: Transport + Sized {
    /// Wrap this transport in an info-level [`Logging`] decorator.
    fn with_logging(self) -> Logging<Self> {
        Logging::new(self)
    }

    /// Wrap this transport in a debug-level [`Logging`] decorator.
    fn with_debug_logging(self) -> Logging<Self> {
        Logging::debug(self)
    }
}

impl<T: Transport> TransportExt for T {}

#[cfg(test)]
mod tests {
    use httpfile_core::{Error, HeaderMap, Method};

    use super::*;

    struct Fixed(u16);

    impl Transport for Fixed {
        async fn send(&self, _request: Request) -> Result<Response> {
            match self.0 {
                0 => Err(Error::Timeout),
                status => Ok(Response::buffered(status, HeaderMap::new(), "payload")),
            }
        }
    }

    fn request() -> Request {
        let url = url::Url::parse("http://localhost/file.bin").expect("valid URL");
        Request::builder(Method::Get, url).build()
    }

    #[test]
    fn logging_levels() {
        assert_eq!(Logging::new(Fixed(200)).level(), LogLevel::Info);
        assert_eq!(Logging::debug(Fixed(200)).level(), LogLevel::Debug);
        assert_eq!(Fixed(200).with_debug_logging().level(), LogLevel::Debug);
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let transport = Fixed(503).with_logging();

        let mut response = transport.send(request()).await.expect("response");
        assert_eq!(response.status(), 503);
        assert_eq!(
            response.collect_body().await.expect("body").as_ref(),
            b"payload"
        );
    }

    #[tokio::test]
    async fn passes_errors_through() {
        let transport = Logging::debug(Fixed(0));

        let err = transport.send(request()).await.expect_err("timeout");
        assert!(err.is_timeout());
    }
}
