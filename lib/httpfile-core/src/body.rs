//! Request bodies and body decoding utilities.

use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
use futures_core::Stream;

use crate::Result;

/// A streaming body: chunks of bytes arriving over time.
pub type StreamingBody = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Well-known content types used by file transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Fallback type for unknown file extensions (`application/octet-stream`).
    OctetStream,
    /// Default type for raw-stream uploads (`binary/octet-stream`).
    BinaryStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OctetStream => "application/octet-stream",
            Self::BinaryStream => "binary/octet-stream",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outbound request body.
///
/// A body is either absent (GET/HEAD), fully buffered (multipart forms), or
/// a stream handed over by the caller (raw uploads). Streams are sent as-is
/// and can only be sent once.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Buffered bytes.
    Full(Bytes),
    /// Caller-supplied byte stream.
    Stream(StreamingBody),
}

impl Body {
    /// Wrap a byte stream.
    #[must_use]
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self::Stream(Box::pin(stream))
    }

    /// Returns `true` if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Buffered bytes, if this is a [`Body::Full`].
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Full(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Full(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Full(Bytes::from(bytes))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::Full(Bytes::from_static(text.as_bytes()))
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so that the error message includes the exact
/// path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., `files[0].size`).
///
/// # Example
///
/// ```
/// use httpfile_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Stored { name: String }
///
/// let bytes = br#"{"name":"report.pdf"}"#;
/// let stored: Stored = from_json(bytes).expect("deserialize");
/// assert_eq!(stored, Stored { name: "report.pdf".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(
            ContentType::OctetStream.as_str(),
            "application/octet-stream"
        );
        assert_eq!(ContentType::BinaryStream.as_str(), "binary/octet-stream");
        assert_eq!(
            ContentType::BinaryStream.to_string(),
            "binary/octet-stream"
        );
    }

    #[test]
    fn body_conversions() {
        assert!(Body::default().is_empty());

        let body = Body::from("hello");
        assert_eq!(body.as_bytes().map(Bytes::as_ref), Some(&b"hello"[..]));

        let body = Body::from(vec![1_u8, 2, 3]);
        assert_eq!(format!("{body:?}"), "Full(3)");
    }

    #[test]
    fn body_from_stream() {
        let stream = futures_util::stream::iter(vec![Ok(Bytes::from("a"))]);
        let body = Body::from_stream(stream);
        assert!(!body.is_empty());
        assert!(body.as_bytes().is_none());
        assert_eq!(format!("{body:?}"), "Stream(..)");
    }

    #[test]
    fn from_json_deserialize() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Uploaded {
            name: String,
            size: u64,
        }

        let uploaded: Uploaded =
            from_json(br#"{"name":"a.txt","size":3}"#).expect("deserialize");
        assert_eq!(
            uploaded,
            Uploaded {
                name: "a.txt".to_string(),
                size: 3
            }
        );
    }

    #[test]
    fn from_json_error_has_path() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Listing {
            files: Vec<Entry>,
        }

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Entry {
            size: u64,
        }

        let err = from_json::<Listing>(br#"{"files":[{"size":"big"}]}"#)
            .expect_err("size is not a number");
        match err {
            crate::Error::JsonDeserialization { path, .. } => {
                assert!(path.starts_with("files"), "path: {path}");
                assert!(path.ends_with("size"), "path: {path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
