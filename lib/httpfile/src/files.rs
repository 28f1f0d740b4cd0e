//! Single-file transfers against one target URL.
//!
//! [`Files`] is an immutable request configuration: build it once, then
//! call any operation on it as many times as needed, from any task.
//!
//! # Example
//!
//! ```ignore
//! use httpfile::Files;
//!
//! let files = Files::builder("https://files.example.com/upload")
//!     .file_path("report.pdf")
//!     .authorization("Bearer secret")
//!     .build();
//!
//! let mut result = files.upload().await;
//! if let Some(err) = result.error().await {
//!     eprintln!("upload failed: {err}");
//! }
//! ```

use std::path::{Path, PathBuf};

use futures_util::TryStreamExt;
use httpfile_core::{Body, Method, RequestBuilder, header};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::download::{disposition_file_name, download};
use crate::encoder::FileItem;
use crate::executor::{execute, parse_target};
use crate::upload::{UploadSpec, upload};
use crate::{Error, HyperTransport, Request, Result, TransferResult, Transport};

/// Request configuration for single-file transfers.
#[derive(Debug, Clone)]
pub struct Files<T = HyperTransport> {
    transport: T,
    target_url: String,
    file_path: Option<PathBuf>,
    headers: Vec<(String, String)>,
}

impl Files {
    /// Start a configuration for `target_url` using the default transport.
    pub fn builder(target_url: impl Into<String>) -> FilesBuilder {
        FilesBuilder {
            transport: HyperTransport::new(),
            target_url: target_url.into(),
            file_path: None,
            headers: Vec::new(),
        }
    }
}

impl<T: Transport> Files<T> {
    /// Target URL.
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Local file: the upload source or the download destination.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Request headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The transport used for every exchange.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload the file as a `multipart/form-data` body under the `file` field.
    ///
    /// The content type of the part is guessed from the file extension.
    pub async fn upload(&self) -> TransferResult {
        let path = match self.upload_source() {
            Ok(path) => path,
            Err(err) => return self.failed(err),
        };

        let mut spec = UploadSpec::builder(self.target_url.as_str()).item(FileItem::new(path));
        for (name, value) in &self.headers {
            spec = spec.header(name.as_str(), value.as_str());
        }

        upload(&self.transport, spec.build())
            .await
            .with_file_path(path)
    }

    /// Upload the file as a raw byte stream, read from disk in chunks.
    ///
    /// `Content-Type` defaults to `binary/octet-stream`.
    pub async fn upload_stream(&self) -> TransferResult {
        let path = match self.upload_source() {
            Ok(path) => path,
            Err(err) => return self.failed(err),
        };
        let file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(err) => return self.failed(err.into()).with_file_path(path),
        };

        self.send_stream(file).await.with_file_path(path)
    }

    /// Upload everything `reader` yields as a raw byte stream.
    ///
    /// Only the target URL is required; the configured file path is ignored.
    pub async fn upload_reader<R>(&self, reader: R) -> TransferResult
    where
        R: AsyncRead + Send + 'static,
    {
        if let Err(err) = parse_target(&self.target_url) {
            return self.failed(err);
        }
        self.send_stream(reader).await
    }

    /// Download the body to the configured file path.
    ///
    /// Without a file path the name comes from `Content-Disposition`, or is
    /// `unknown`. See [`download`](crate::download()).
    pub async fn download(&self) -> TransferResult {
        download(
            &self.transport,
            &self.target_url,
            self.file_path.as_deref(),
            self.headers.iter().cloned(),
        )
        .await
    }

    /// Send a HEAD request.
    pub async fn head(&self) -> TransferResult {
        self.send_empty(Method::Head).await
    }

    /// Send a GET request and leave the body unread.
    ///
    /// When the response names a file in `Content-Disposition`, that name
    /// becomes the result's file path; nothing is written to disk.
    pub async fn get(&self) -> TransferResult {
        let mut result = self.send_empty(Method::Get).await;
        if let Some(name) = disposition_file_name(&result) {
            result.set_file_path(PathBuf::from(name));
        }
        result
    }

    async fn send_empty(&self, method: Method) -> TransferResult {
        let request = match self.request(method) {
            Ok(builder) => builder.build(),
            Err(err) => return self.failed(err),
        };
        let result = execute(&self.transport, request, &self.target_url).await;
        match &self.file_path {
            Some(path) => result.with_file_path(path),
            None => result,
        }
    }

    async fn send_stream<R>(&self, reader: R) -> TransferResult
    where
        R: AsyncRead + Send + 'static,
    {
        let body = Body::from_stream(ReaderStream::new(reader).map_err(Error::from));
        let request = match self.request(Method::Post) {
            Ok(builder) => builder.stream(body).build(),
            Err(err) => return self.failed(err),
        };
        execute(&self.transport, request, &self.target_url).await
    }

    fn request(&self, method: Method) -> Result<RequestBuilder> {
        let url = parse_target(&self.target_url)?;
        Ok(Request::builder(method, url).headers(self.headers.iter().cloned()))
    }

    /// The target must be checked before the file path.
    fn upload_source(&self) -> Result<&Path> {
        parse_target(&self.target_url)?;
        self.file_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(Error::EmptyFilePath)
    }

    fn failed(&self, err: Error) -> TransferResult {
        TransferResult::failed(self.target_url.as_str(), err)
    }
}

/// Builder for [`Files`].
#[derive(Debug, Clone)]
pub struct FilesBuilder<T = HyperTransport> {
    transport: T,
    target_url: String,
    file_path: Option<PathBuf>,
    headers: Vec<(String, String)>,
}

impl<T: Transport> FilesBuilder<T> {
    /// Local file: the upload source or the download destination.
    #[must_use]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set a request header. A later value for the same name wins.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set several request headers.
    #[must_use]
    pub fn headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Set the `Authorization` header verbatim.
    #[must_use]
    pub fn authorization(self, value: impl Into<String>) -> Self {
        self.header(header::AUTHORIZATION.as_str(), value)
    }

    /// Use another transport.
    #[must_use]
    pub fn transport<U: Transport>(self, transport: U) -> FilesBuilder<U> {
        FilesBuilder {
            transport,
            target_url: self.target_url,
            file_path: self.file_path,
            headers: self.headers,
        }
    }

    /// Finish the configuration.
    #[must_use]
    pub fn build(self) -> Files<T> {
        Files {
            transport: self.transport,
            target_url: self.target_url,
            file_path: self.file_path,
            headers: self.headers,
        }
    }
}
