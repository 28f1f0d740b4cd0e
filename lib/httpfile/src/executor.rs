//! One request, one exchange, one [`TransferResult`].

use tracing::{debug, warn};
use url::Url;

use crate::{Error, Request, Result, TransferResult, Transport};

/// Validate and parse a caller-supplied target URL.
pub(crate) fn parse_target(target_url: &str) -> Result<Url> {
    if target_url.trim().is_empty() {
        return Err(Error::EmptyTargetUrl);
    }
    Ok(Url::parse(target_url)?)
}

/// Send `request` through `transport` and wrap the outcome.
///
/// The result records `target_url` exactly as the caller wrote it. A
/// transport failure yields a result holding only the error. Otherwise the
/// result owns the response with its body still unread. There are no
/// retries.
pub async fn execute<T: Transport>(
    transport: &T,
    request: Request,
    target_url: &str,
) -> TransferResult {
    debug!(method = %request.method(), url = %target_url, "executing transfer");

    match transport.send(request).await {
        Ok(response) => {
            debug!(url = %target_url, status = response.status(), "transfer answered");
            TransferResult::completed(target_url, response)
        }
        Err(err) => {
            warn!(url = %target_url, error = %err, "transfer failed");
            TransferResult::failed(target_url, err)
        }
    }
}
