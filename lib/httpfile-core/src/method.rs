//! HTTP method types.

use derive_more::Display;

/// HTTP request method used by file transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - fetch a file.
    #[display("GET")]
    Get,
    /// HEAD method - fetch headers only.
    #[display("HEAD")]
    Head,
    /// POST method - upload a file.
    #[display("POST")]
    Post,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Head => Self::HEAD,
            Method::Post => Self::POST,
        }
    }
}
