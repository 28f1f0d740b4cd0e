//! Downloading a response body to disk.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use httpfile_core::{ContentDisposition, Method, header};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::executor::{execute, parse_target};
use crate::{Request, Result, StreamingBody, TransferResult, Transport};

/// File name used when neither the caller nor the server names the file.
pub const UNKNOWN_FILE_NAME: &str = "unknown";

/// GET `target_url` and write the body to `save_path`.
///
/// With no save path (or an empty one), the file is named after the
/// `filename` parameter of the `Content-Disposition` header, reduced to its
/// last path component, or [`UNKNOWN_FILE_NAME`] when there is no usable
/// one. The path is relative to the working directory.
///
/// The body is written whatever the status code. A copy that fails midway
/// leaves the partial file on disk and stores the error on the result; the
/// byte count written so far is still reported.
pub async fn download<T: Transport>(
    transport: &T,
    target_url: &str,
    save_path: Option<&Path>,
    headers: impl IntoIterator<Item = (String, String)>,
) -> TransferResult {
    let url = match parse_target(target_url) {
        Ok(url) => url,
        Err(err) => return TransferResult::failed(target_url, err),
    };
    let request = Request::builder(Method::Get, url).headers(headers).build();

    let mut result = execute(transport, request, target_url).await;
    if result.has_error() {
        return result;
    }

    let path = match save_path.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(
            disposition_file_name(&result).unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string()),
        ),
    };
    debug!(url = %target_url, path = %path.display(), "resolved download path");
    result.set_file_path(path.clone());

    let body = match result.take_body() {
        Ok(body) => body,
        Err(err) => {
            result.set_error(err);
            return result;
        }
    };

    let (written, outcome) = write_body(&path, body).await;
    result.set_bytes_written(written);
    match outcome {
        Ok(()) => info!(path = %path.display(), bytes = written, "download complete"),
        Err(err) => result.set_error(err),
    }
    result
}

/// The sanitised `Content-Disposition` file name of a response, if any.
///
/// The header is read as raw bytes: servers put UTF-8 names in quoted
/// strings, which [`TransferResult::header`] would report as absent.
pub(crate) fn disposition_file_name(result: &TransferResult) -> Option<String> {
    let value = result.headers()?.get(header::CONTENT_DISPOSITION)?;
    let disposition = ContentDisposition::parse_bytes(value.as_bytes())?;
    disposition.safe_filename().map(str::to_string)
}

/// Copy the body into a freshly truncated file, then flush and sync it.
///
/// The file is closed before the body is released, on every path.
async fn write_body(path: &Path, mut body: StreamingBody) -> (u64, Result<()>) {
    let file = match File::create(path).await {
        Ok(file) => file,
        Err(err) => return (0, Err(err.into())),
    };

    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;
    let copied = stream_to_file(&mut writer, &mut body, &mut written).await;

    // Flush what was copied even when the copy failed midway
    let synced: Result<()> = async {
        writer.flush().await?;
        writer.get_ref().sync_all().await
    }
    .await
    .map_err(Into::into);

    drop(writer);
    drop(body);

    (written, copied.and(synced))
}

async fn stream_to_file(
    writer: &mut BufWriter<File>,
    body: &mut StreamingBody,
    written: &mut u64,
) -> Result<()> {
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        *written += chunk.len() as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use bytes::Bytes;
    use httpfile_core::{Error, HeaderMap, Response};
    use tempfile::TempDir;

    use super::*;

    /// Serves a fixed chunk list, optionally failing after it.
    struct Chunks {
        chunks: Vec<&'static str>,
        fail_after: bool,
        disposition: Option<&'static str>,
    }

    impl Transport for Chunks {
        async fn send(&self, _request: Request) -> Result<Response> {
            let mut items: Vec<Result<Bytes>> = self
                .chunks
                .iter()
                .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
                .collect();
            if self.fail_after {
                items.push(Err(Error::connection("reset by peer")));
            }

            let mut headers = HeaderMap::new();
            if let Some(value) = self.disposition {
                headers.insert(
                    header::CONTENT_DISPOSITION,
                    value.parse().expect("valid header value"),
                );
            }
            Ok(Response::new(
                200,
                headers,
                Box::pin(futures_util::stream::iter(items)),
            ))
        }
    }

    #[tokio::test]
    async fn writes_every_chunk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("out.bin");
        let transport = Chunks {
            chunks: vec!["hello ", "world"],
            fail_after: false,
            disposition: None,
        };

        let result = download(&transport, "http://localhost/f", Some(path.as_path()), []).await;

        check!(!result.has_error());
        check!(result.bytes_written() == Some(11));
        check!(result.file_path() == Some(path.as_path()));
        check!(tokio::fs::read(&path).await.expect("read") == b"hello world");
    }

    #[tokio::test]
    async fn partial_copy_keeps_file_and_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("partial.bin");
        let transport = Chunks {
            chunks: vec!["abc"],
            fail_after: true,
            disposition: None,
        };

        let mut result = download(&transport, "http://localhost/f", Some(path.as_path()), []).await;

        let_assert!(Some(err) = result.error().await);
        check!(err.is_connection());
        check!(result.bytes_written() == Some(3));
        check!(tokio::fs::read(&path).await.expect("read") == b"abc");
    }

    #[tokio::test]
    async fn unwritable_destination() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing-dir").join("out.bin");
        let transport = Chunks {
            chunks: vec!["abc"],
            fail_after: false,
            disposition: None,
        };

        let mut result = download(&transport, "http://localhost/f", Some(path.as_path()), []).await;

        let_assert!(Some(err) = result.error().await);
        check!(err.io_kind() == Some(std::io::ErrorKind::NotFound));
        check!(result.bytes_written() == Some(0));
    }

    #[tokio::test]
    async fn empty_target_is_rejected() {
        let transport = Chunks {
            chunks: vec![],
            fail_after: false,
            disposition: None,
        };

        let mut result = download(&transport, "", None, []).await;
        let_assert!(Some(Error::EmptyTargetUrl) = result.error().await);
        check!(result.file_path().is_none());
    }

    #[tokio::test]
    async fn disposition_name_is_sanitised() {
        let transport = Chunks {
            chunks: vec![],
            fail_after: false,
            disposition: Some(r#"attachment; filename="../../etc/passwd""#),
        };
        let url = url::Url::parse("http://localhost/f").expect("valid URL");
        let request = Request::builder(Method::Get, url).build();
        let result = execute(&transport, request, "http://localhost/f").await;

        check!(disposition_file_name(&result).as_deref() == Some("passwd"));
    }

    #[tokio::test]
    async fn raw_utf8_disposition_names_the_file() {
        let transport = Chunks {
            chunks: vec!["cv"],
            fail_after: false,
            disposition: Some(r#"attachment; filename="résumé.pdf""#),
        };
        let url = url::Url::parse("http://localhost/f").expect("valid URL");
        let request = Request::builder(Method::Get, url).build();
        let result = execute(&transport, request, "http://localhost/f").await;

        check!(result.header("content-disposition").is_none());
        check!(disposition_file_name(&result).as_deref() == Some("résumé.pdf"));
    }
}
