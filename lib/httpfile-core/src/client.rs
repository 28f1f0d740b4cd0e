//! The transport seam.
//!
//! Everything above this trait builds requests and interprets responses;
//! everything below it moves bytes. Implement [`Transport`] to plug in a
//! custom client or a test double.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Performs one HTTP exchange.
///
/// Implementations must be usable from several tasks at once. A transport
/// returns as soon as response headers are available; the body stays in the
/// returned [`Response`] as an unread stream.
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response head.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received:
    /// - DNS or connection failures
    /// - TLS errors
    /// - Timeouts
    /// - Requests the transport cannot represent (bad header names, ...)
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport> Transport for &T {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::HeaderMap;

    use super::*;
    use crate::Method;

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    impl Transport for Echo {
        async fn send(&self, request: Request) -> Result<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::buffered(
                200,
                HeaderMap::new(),
                request.url().path().to_string(),
            ))
        }
    }

    fn request(path: &str) -> Request {
        let url = url::Url::parse("http://localhost")
            .and_then(|base| base.join(path))
            .expect("valid URL");
        Request::builder(Method::Get, url).build()
    }

    #[tokio::test]
    async fn transport_through_reference_and_arc() {
        let echo = Arc::new(Echo::default());

        let mut response = (&*echo).send(request("/by-ref")).await.expect("send");
        assert_eq!(response.collect_body().await.expect("body").as_ref(), b"/by-ref");

        let mut response = echo.clone().send(request("/by-arc")).await.expect("send");
        assert_eq!(response.collect_body().await.expect("body").as_ref(), b"/by-arc");

        assert_eq!(echo.calls.load(Ordering::SeqCst), 2);
    }
}
