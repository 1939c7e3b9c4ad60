//! Download error retriability.

use anyhow::Error;

use crate::datasource::DownloadError;

/// HTTP 429, retried with backoff like a server error.
const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Determines if a dataset download failure is worth another attempt.
///
/// Walks the error chain looking for a [`DownloadError`] or a raw
/// `reqwest::Error`:
///
/// - 5xx responses and 429 are retriable, other 4xx responses are not
/// - an oversized body is not retriable
/// - timeouts, connect and request errors are retriable
/// - redirect and decode errors are not
///
/// Anything unrecognized is treated as a transient network problem.
pub(crate) fn is_retriable_error(error: &Error) -> bool {
    for cause in error.chain() {
        if let Some(download_err) = cause.downcast_ref::<DownloadError>() {
            match download_err {
                DownloadError::Status { status, .. } => {
                    let code = status.as_u16();
                    return code == HTTP_STATUS_TOO_MANY_REQUESTS || !(400..500).contains(&code);
                }
                DownloadError::TooLarge { .. } => return false,
                DownloadError::Request(_) => {}
            }
        }

        if let Some(reqwest_err) = cause.downcast_ref::<reqwest::Error>() {
            if reqwest_err.is_timeout() || reqwest_err.is_connect() || reqwest_err.is_request() {
                return true;
            }
            if reqwest_err.is_redirect() || reqwest_err.is_decode() {
                return false;
            }
        }
    }

    true
}
