//! The uniform outcome of every transfer operation.
//!
//! A [`TransferResult`] either carries an error (configuration, encoding,
//! transport or filesystem) or wraps the live response of a completed
//! exchange. Accessors that need the body drain it exactly once; nothing is
//! cached, so a second drain reports [`Error::BodyConsumed`].
//!
//! Body accessors never look at the status code. A 500 answer read through
//! [`TransferResult::text`] yields the raw error page; call
//! [`TransferResult::error`] to turn a failed status into an error.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::StreamExt;
use httpfile_core::{HeaderMap, from_json, header};
use serde::de::DeserializeOwned;

use crate::{Error, Response, Result, StreamingBody};

/// Outcome of an upload, download or HEAD call.
#[derive(Debug)]
pub struct TransferResult {
    error: Option<Error>,
    response: Option<Response>,
    target_url: String,
    file_path: Option<PathBuf>,
    bytes_written: Option<u64>,
}

impl TransferResult {
    /// A result holding only an error; no exchange took place.
    #[must_use]
    pub fn failed(target_url: impl Into<String>, error: Error) -> Self {
        Self {
            error: Some(error),
            response: None,
            target_url: target_url.into(),
            file_path: None,
            bytes_written: None,
        }
    }

    /// A result wrapping a received response.
    #[must_use]
    pub fn completed(target_url: impl Into<String>, response: Response) -> Self {
        Self {
            error: None,
            response: Some(response),
            target_url: target_url.into(),
            file_path: None,
            bytes_written: None,
        }
    }

    /// Attach the local file this transfer read from or wrote to.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub(crate) fn set_file_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }

    pub(crate) fn set_error(&mut self, error: Error) {
        self.error = Some(error);
    }

    pub(crate) fn set_bytes_written(&mut self, bytes: u64) {
        self.bytes_written = Some(bytes);
    }

    /// `true` if an error is stored.
    ///
    /// Unlike [`TransferResult::error`] this never reads the body, so a
    /// failed HTTP status is not reported here.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The error of this transfer, if any.
    ///
    /// Returns the stored error when there is one. Otherwise, when the
    /// status is 400 or above, the body is drained and returned as an
    /// [`Error::Status`] whose message is the body text. This consumes the
    /// body and is not cached: a second call on the same failed response
    /// yields [`Error::BodyConsumed`].
    pub async fn error(&mut self) -> Option<Error> {
        if let Some(err) = &self.error {
            return Some(err.clone());
        }

        let response = self.response.as_mut().filter(|r| r.is_error())?;
        let status = response.status();
        Some(match response.collect_body().await {
            Ok(body) => Error::status(status, String::from_utf8_lossy(&body)),
            Err(err) => err,
        })
    }

    /// Reset the stored error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drain the body.
    ///
    /// The body stream is released afterwards, whatever the outcome.
    pub async fn bytes(&mut self) -> Result<Bytes> {
        self.live_response_mut()?.collect_body().await
    }

    /// Drain the body as UTF-8 text.
    pub async fn text(&mut self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Drain the body and decode it as JSON.
    ///
    /// Decode errors name the path of the offending field.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.bytes().await?;
        from_json(&bytes)
    }

    /// HTTP status, or `0` when no response was received.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.response.as_ref().map_or(0, Response::status)
    }

    /// A response header value.
    ///
    /// `None` when the header is absent, not valid text, or an error is
    /// stored.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        if self.error.is_some() {
            return None;
        }
        self.response.as_ref()?.header(name)
    }

    /// All response headers, unless an error is stored.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        if self.error.is_some() {
            return None;
        }
        self.response.as_ref().map(Response::headers)
    }

    /// The `Content-Length` header as a signed 64-bit integer.
    ///
    /// A missing header parses as an empty string and fails with
    /// [`Error::ContentLength`].
    pub fn content_length(&self) -> Result<i64> {
        let response = self.live_response()?;
        let value = response.header(header::CONTENT_LENGTH.as_str()).unwrap_or_default();
        Ok(value.trim().parse::<i64>()?)
    }

    /// Size of the local file on disk.
    pub async fn file_size(&self) -> Result<u64> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let path = self.file_path.as_deref().ok_or(Error::EmptyFilePath)?;
        let metadata = tokio::fs::metadata(path).await?;
        Ok(metadata.len())
    }

    /// Last segment of the local file path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_path.as_deref()?.file_name()?.to_str()
    }

    /// The local file path: the upload source, or the download destination.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The target URL this transfer was issued against.
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Number of bytes a download wrote to disk.
    #[must_use]
    pub const fn bytes_written(&self) -> Option<u64> {
        self.bytes_written
    }

    /// Take the raw body stream, leaving status and headers in place.
    pub fn take_body(&mut self) -> Result<StreamingBody> {
        self.live_response_mut()?
            .take_body()
            .ok_or(Error::BodyConsumed)
    }

    /// Hand over the raw response.
    pub fn into_response(self) -> Result<Response> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.response.ok_or(Error::NoResponse)
    }

    /// Release the body stream without reading it. Idempotent.
    pub fn close(&mut self) {
        if let Some(response) = &mut self.response {
            response.release_body();
        }
    }

    /// Read and throw away the rest of the body, then release it.
    ///
    /// A fully read body lets the transport reuse the connection. Read
    /// errors are ignored. Idempotent.
    pub async fn discard(&mut self) {
        let Some(mut body) = self.response.as_mut().and_then(Response::take_body) else {
            return;
        };
        while let Some(chunk) = body.next().await {
            if chunk.is_err() {
                break;
            }
        }
    }

    fn live_response(&self) -> Result<&Response> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.response.as_ref().ok_or(Error::NoResponse)
    }

    fn live_response_mut(&mut self) -> Result<&mut Response> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.response.as_mut().ok_or(Error::NoResponse)
    }
}
