//! Multi-file multipart uploads.

use std::path::PathBuf;

use httpfile_core::{Form, Method};

use crate::encoder::{FileItem, encode_files};
use crate::executor::{execute, parse_target};
use crate::{Request, Result, TransferResult, Transport};

/// Field name used for file parts unless configured otherwise.
pub const DEFAULT_FILE_FIELD: &str = "file";

/// Everything one multipart upload needs.
///
/// # Example
///
/// ```
/// use httpfile::UploadSpec;
///
/// let spec = UploadSpec::builder("https://files.example.com/upload")
///     .file("reports/q1.pdf")
///     .file("reports/q2.pdf")
///     .field("album", "quarterly")
///     .header("Authorization", "token")
///     .build();
/// assert_eq!(spec.items().len(), 2);
/// assert_eq!(spec.file_field(), "file");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    target_url: String,
    items: Vec<FileItem>,
    headers: Vec<(String, String)>,
    file_field: String,
    extra_fields: Vec<(String, String)>,
}

impl UploadSpec {
    /// Start building a spec for `target_url`.
    pub fn builder(target_url: impl Into<String>) -> UploadSpecBuilder {
        UploadSpecBuilder {
            spec: Self {
                target_url: target_url.into(),
                items: Vec::new(),
                headers: Vec::new(),
                file_field: DEFAULT_FILE_FIELD.to_string(),
                extra_fields: Vec::new(),
            },
        }
    }

    /// Target URL.
    #[must_use]
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Files to attach, in order.
    #[must_use]
    pub fn items(&self) -> &[FileItem] {
        &self.items
    }

    /// Request headers, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Form field name shared by every file part.
    #[must_use]
    pub fn file_field(&self) -> &str {
        &self.file_field
    }

    /// Scalar form fields, in insertion order.
    #[must_use]
    pub fn extra_fields(&self) -> &[(String, String)] {
        &self.extra_fields
    }
}

/// Builder for [`UploadSpec`].
#[derive(Debug, Clone)]
pub struct UploadSpecBuilder {
    spec: UploadSpec,
}

impl UploadSpecBuilder {
    /// Attach a file item.
    #[must_use]
    pub fn item(mut self, item: FileItem) -> Self {
        self.spec.items.push(item);
        self
    }

    /// Attach a file by path, guessing its content type.
    #[must_use]
    pub fn file(self, path: impl Into<PathBuf>) -> Self {
        self.item(FileItem::new(path))
    }

    /// Set a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.headers.push((name.into(), value.into()));
        self
    }

    /// Form field name for the file parts. An empty name keeps the default.
    #[must_use]
    pub fn file_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.spec.file_field = name;
        }
        self
    }

    /// Add a scalar form field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.extra_fields.push((name.into(), value.into()));
        self
    }

    /// Build the [`UploadSpec`].
    #[must_use]
    pub fn build(self) -> UploadSpec {
        self.spec
    }
}

/// Encode every file of `spec` into one multipart body and POST it.
///
/// The target is checked and every file read before anything is sent; an
/// empty target, a malformed one or an unreadable file yields a result
/// holding that error and no exchange happens.
pub async fn upload<T: Transport>(transport: &T, spec: UploadSpec) -> TransferResult {
    let request = match build_request(&spec).await {
        Ok(request) => request,
        Err(err) => return TransferResult::failed(spec.target_url, err),
    };
    execute(transport, request, &spec.target_url).await
}

async fn build_request(spec: &UploadSpec) -> Result<Request> {
    let url = parse_target(&spec.target_url)?;
    let fields = spec
        .extra_fields
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()));
    let form = encode_files(Form::new(), &spec.file_field, &spec.items, fields).await?;

    let request = Request::builder(Method::Post, url)
        .headers(spec.headers.iter().cloned())
        .multipart(form)?
        .build();
    Ok(request)
}
