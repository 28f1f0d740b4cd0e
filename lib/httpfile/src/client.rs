//! Default transport using hyper-util.

use std::time::Duration;

use futures_util::TryStreamExt;
use http_body_util::BodyStream;
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::sync::oneshot;

use crate::{
    Error, Request, Response, Result, StreamingBody, Transport,
    config::{ClientConfig, ClientConfigBuilder},
    connector::https_connector,
    outgoing::Outgoing,
};

/// HTTP transport using hyper-util with connection pooling and rustls.
///
/// Cloning is cheap and clones share the connection pool, so one transport
/// can serve any number of concurrent transfers.
///
/// # Example
///
/// ```ignore
/// use httpfile::HyperTransport;
/// use std::time::Duration;
///
/// let transport = HyperTransport::builder()
///     .timeout(Duration::from_secs(120))
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Outgoing>,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let connector = https_connector(config.connect_timeout);
        let inner = Client::builder(TokioExecutor::new()).build(connector);
        Self { inner, config }
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a hyper request from an httpfile request.
    ///
    /// `sent` fires once hyper has taken the whole body.
    fn build_hyper_request(
        request: Request,
        sent: oneshot::Sender<()>,
    ) -> Result<http::Request<Outgoing>> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Outgoing::new(body, sent))
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }

        let lower = msg.to_ascii_lowercase();
        if lower.contains("ssl") || lower.contains("tls") || lower.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let (sent_tx, sent_rx) = oneshot::channel();
        let hyper_request = Self::build_hyper_request(request, sent_tx)?;
        let pending = self.inner.request(hyper_request);
        tokio::pin!(pending);

        // The deadline covers only the wait after the body is out
        let early = tokio::select! {
            answered = &mut pending => Some(answered),
            _ = sent_rx => None,
        };
        let answered = match early {
            Some(answered) => answered,
            None => tokio::time::timeout(self.config.timeout, pending)
                .await
                .map_err(|_| Error::Timeout)?,
        };
        let response = answered.map_err(Self::map_hyper_error)?;

        let (parts, incoming) = response.into_parts();
        let body: StreamingBody = Box::pin(
            BodyStream::new(incoming)
                .map_ok(|frame| frame.into_data().unwrap_or_default())
                .map_err(|e| Error::connection(e.to_string())),
        );

        Ok(Response::new(parts.status.as_u16(), parts.headers, body))
    }
}

/// Builder for [`HyperTransport`].
#[derive(Debug, Default)]
pub struct HyperTransportBuilder {
    config: ClientConfigBuilder,
}

impl HyperTransportBuilder {
    /// Set the response timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        HyperTransport::with_config(self.config.build())
    }
}
