//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests. A request has one of three
//! shapes: a multipart form ([`RequestBuilder::multipart`]), a raw byte stream
//! ([`RequestBuilder::stream`]), or no body at all.
//!
//! # Example
//!
//! ```
//! use httpfile_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://files.example.com/a.bin".parse().unwrap())
//!     .header("Authorization", "token")
//!     .build();
//! assert_eq!(request.header("authorization"), Some("token"));
//! ```

use std::collections::HashMap;

use crate::{Body, ContentType, Form, Method};

const CONTENT_TYPE: &str = "content-type";

/// An HTTP request with method, URL, headers, and body.
///
/// Header names are stored lowercased, so setting `Content-Type` and then
/// `content-type` leaves a single entry holding the last value.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Body,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers, keyed by lowercase name.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Body) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Body,
    // Applied at build time: the default only fills a gap, the forced value
    // always replaces.
    default_content_type: Option<ContentType>,
    forced_content_type: Option<String>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: Body::Empty,
            default_content_type: None,
            forced_content_type: None,
        }
    }

    /// Sets a header, replacing any previous value for the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Sets the request body without touching headers.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Uses an encoded multipart form as the body.
    ///
    /// The `Content-Type` is always the form's boundary-qualified value. Any
    /// value set through [`RequestBuilder::header`], before or after this
    /// call, is overridden at [`RequestBuilder::build`].
    ///
    /// # Errors
    ///
    /// Returns an error if the form cannot be framed.
    pub fn multipart(mut self, form: Form) -> crate::Result<Self> {
        let (content_type, body) = form.into_body()?;
        self.body = Body::Full(body);
        self.forced_content_type = Some(content_type);
        Ok(self)
    }

    /// Uses a raw byte stream as the body.
    ///
    /// `Content-Type` defaults to `binary/octet-stream`; a value set by the
    /// caller, before or after this call, wins.
    #[must_use]
    pub fn stream(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self.default_content_type = Some(ContentType::BinaryStream);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(mut self) -> Request {
        if let Some(default) = self.default_content_type {
            self.headers
                .entry(CONTENT_TYPE.to_string())
                .or_insert_with(|| default.as_str().to_string());
        }
        if let Some(forced) = self.forced_content_type {
            self.headers.insert(CONTENT_TYPE.to_string(), forced);
        }

        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("https://files.example.com/upload").expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::Get, url())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://files.example.com/upload");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let request = Request::builder(Method::Head, url())
            .header("X-Token", "one")
            .header("x-token", "two")
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("X-TOKEN"), Some("two"));
    }

    #[test]
    fn multipart_content_type_is_authoritative() {
        let form = Form::with_boundary("b0undary").field("k", "v");
        let request = Request::builder(Method::Post, url())
            .header("Content-Type", "text/plain")
            .multipart(form)
            .expect("framable form")
            .header("content-type", "application/json")
            .build();

        assert_eq!(
            request.header("Content-Type"),
            Some("multipart/form-data; boundary=b0undary")
        );
        let body = request.body().as_bytes().expect("buffered body");
        assert!(body.ends_with(b"--b0undary--\r\n"));
    }

    #[test]
    fn stream_defaults_to_binary_octet_stream() {
        let request = Request::builder(Method::Post, url())
            .stream(vec![1_u8, 2, 3])
            .build();

        assert_eq!(request.header("Content-Type"), Some("binary/octet-stream"));
    }

    #[test]
    fn stream_content_type_caller_wins() {
        let request = Request::builder(Method::Post, url())
            .stream(vec![1_u8, 2, 3])
            .header("Content-Type", "image/gif")
            .build();
        assert_eq!(request.header("Content-Type"), Some("image/gif"));

        let request = Request::builder(Method::Post, url())
            .header("content-type", "image/png")
            .stream(vec![1_u8])
            .build();
        assert_eq!(request.header("Content-Type"), Some("image/png"));
    }

    #[test]
    fn no_body_keeps_headers_as_is() {
        let request = Request::builder(Method::Get, url())
            .headers([("filename", "test.gif"), ("testheader", "123")])
            .build();

        assert!(request.header("Content-Type").is_none());
        assert_eq!(request.header("filename"), Some("test.gif"));
        assert_eq!(request.header("testheader"), Some("123"));

        let (method, _, headers, body) = request.into_parts();
        assert_eq!(method, Method::Get);
        assert_eq!(headers.len(), 2);
        assert!(body.is_empty());
    }
}
