//! Reading local files into a multipart form.

use std::path::{Path, PathBuf};

use httpfile_core::{Form, Part, guess_content_type};

use crate::Result;

/// One local file to attach to a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    path: PathBuf,
    content_type: Option<String>,
}

impl FileItem {
    /// A file whose content type is guessed from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content_type: None,
        }
    }

    /// Override the content type. An empty value falls back to the guess.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into()).filter(|ct: &String| !ct.is_empty());
        self
    }

    /// Source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The part's file name: last segment of the source path.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The explicit content type, or the extension guess.
    #[must_use]
    pub fn resolved_content_type(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| guess_content_type(&self.file_name()).to_string())
    }
}

/// Read every item and append it to `form` as a file part under `field`,
/// then append the scalar fields.
///
/// Files are read one after the other; the first unreadable file aborts the
/// whole encode.
pub async fn encode_files<'a, I, F>(form: Form, field: &str, items: I, fields: F) -> Result<Form>
where
    I: IntoIterator<Item = &'a FileItem>,
    F: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut form = form;
    for item in items {
        let data = tokio::fs::read(item.path()).await?;
        tracing::debug!(path = %item.path().display(), bytes = data.len(), "attaching file");
        form = form.part(
            Part::file(field, item.file_name(), data)
                .with_content_type(item.resolved_content_type()),
        );
    }

    for (name, value) in fields {
        form = form.field(name, value);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use tempfile::TempDir;

    use super::*;
    use crate::Error;

    #[test]
    fn content_type_resolution() {
        check!(FileItem::new("/tmp/photo.JPG").resolved_content_type() == "image/jpeg");
        check!(FileItem::new("archive.unknown").resolved_content_type() == "application/octet-stream");
        check!(
            FileItem::new("data.bin")
                .with_content_type("application/x-custom")
                .resolved_content_type()
                == "application/x-custom"
        );
        check!(
            FileItem::new("notes.txt")
                .with_content_type("")
                .resolved_content_type()
                == "text/plain"
        );
    }

    #[test]
    fn file_name_is_last_segment() {
        check!(FileItem::new("/var/data/report.pdf").file_name() == "report.pdf");
        check!(FileItem::new("report.pdf").file_name() == "report.pdf");
    }

    #[tokio::test]
    async fn encodes_files_then_fields() {
        let dir = TempDir::new().expect("temp dir");
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.gif");
        tokio::fs::write(&first, b"alpha").await.expect("write a");
        tokio::fs::write(&second, [0x47_u8, 0x49, 0x46]).await.expect("write b");

        let items = [FileItem::new(&first), FileItem::new(&second)];
        let form = encode_files(
            Form::with_boundary("x"),
            "upload",
            &items,
            [("album", "holidays")],
        )
        .await
        .expect("encode");

        let parts = form.parts();
        check!(parts.len() == 3);
        let_assert!([a, b, field] = parts);
        check!(a.name() == "upload");
        check!(a.filename() == Some("a.txt"));
        check!(a.content_type() == Some("text/plain"));
        check!(a.data().as_ref() == b"alpha");
        check!(b.filename() == Some("b.gif"));
        check!(b.content_type() == Some("image/gif"));
        check!(field.name() == "album");
        check!(field.filename().is_none());
        check!(field.data().as_ref() == b"holidays");
    }

    #[tokio::test]
    async fn missing_file_aborts() {
        let dir = TempDir::new().expect("temp dir");
        let items = [FileItem::new(dir.path().join("missing.bin"))];

        let_assert!(Err(err) = encode_files(Form::new(), "file", &items, []).await);
        check!(matches!(err, Error::Io(_)));
        check!(err.io_kind() == Some(std::io::ErrorKind::NotFound));
    }
}
