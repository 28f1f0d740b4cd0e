//! HTTP file transfer client.
//!
//! Multipart uploads of one or many files, raw-stream uploads, and downloads
//! that take their file name from `Content-Disposition`. Every operation
//! returns a [`TransferResult`]: errors are stored on it rather than
//! returned, and the response body is read lazily, at most once.
//!
//! # Example
//!
//! ```ignore
//! use httpfile::prelude::*;
//!
//! let files = Files::builder("https://files.example.com/report")
//!     .header("testheader", "123")
//!     .build();
//!
//! // Saved as the `Content-Disposition` file name, or `unknown`
//! let mut result = files.download().await;
//! if let Some(err) = result.error().await {
//!     return Err(err);
//! }
//! println!("{} bytes -> {:?}", result.file_size().await?, result.file_name());
//! ```
//!
//! Several files in one request:
//!
//! ```ignore
//! use httpfile::{HyperTransport, UploadSpec, upload};
//!
//! let spec = UploadSpec::builder("https://files.example.com/upload")
//!     .file("a.txt")
//!     .file("b.png")
//!     .field("album", "holidays")
//!     .build();
//! let mut result = upload(&HyperTransport::new(), spec).await;
//! let stored: serde_json::Value = result.json().await?;
//! ```

mod client;
mod config;
mod connector;
mod download;
mod encoder;
mod executor;
mod files;
mod logging;
mod outgoing;
pub mod prelude;
mod result;
mod upload;

pub use client::{HyperTransport, HyperTransportBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use download::{UNKNOWN_FILE_NAME, download};
pub use encoder::{FileItem, encode_files};
pub use executor::execute;
pub use files::{Files, FilesBuilder};
pub use logging::{LogLevel, Logging, TransportExt};
pub use result::TransferResult;
pub use upload::{DEFAULT_FILE_FIELD, UploadSpec, UploadSpecBuilder, upload};

// Re-export core types
pub use httpfile_core::{
    Body, ContentDisposition, ContentType, Error, Form, Method, Part, Request, RequestBuilder,
    Response, Result, StreamingBody, Transport, from_json, guess_content_type,
};

// Re-export http types for status codes and headers
pub use httpfile_core::{HeaderMap, StatusCode, header};
