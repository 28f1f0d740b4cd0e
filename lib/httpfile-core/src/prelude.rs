//! Prelude module for convenient imports.
//!
//! ```ignore
//! use httpfile_core::prelude::*;
//! ```

pub use crate::{
    Body, ContentDisposition, ContentType, Error, Form, Method, Part, Request, RequestBuilder,
    Response, Result, Transport, from_json,
};
