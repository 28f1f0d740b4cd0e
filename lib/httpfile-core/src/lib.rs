//! Core types and traits for the httpfile file transfer client.
//!
//! This crate provides the transport-agnostic building blocks:
//! - [`Method`] - HTTP methods used by file transfers
//! - [`Request`] and [`RequestBuilder`] - outbound requests (multipart, raw stream, no body)
//! - [`Response`] - response with a single-use streaming body
//! - [`Form`] and [`Part`] - `multipart/form-data` encoding
//! - [`ContentDisposition`] - `Content-Disposition` parsing for download naming
//! - [`Transport`] - the seam between request building and the network
//! - [`Error`] and [`Result`] - error handling
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod disposition;
mod error;
mod method;
mod multipart;
pub mod prelude;
mod request;
mod response;

pub use body::{Body, ContentType, StreamingBody, from_json};
pub use client::Transport;
pub use disposition::ContentDisposition;
pub use error::{Error, Result};
pub use method::Method;
pub use multipart::{Form, Part, escape_quotes, guess_content_type};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
