//! Prelude module for convenient imports.
//!
//! ```ignore
//! use httpfile::prelude::*;
//! ```

pub use crate::{
    Error, FileItem, Files, HyperTransport, Logging, Result, TransferResult, Transport,
    TransportExt, UploadSpec, download, upload,
};
