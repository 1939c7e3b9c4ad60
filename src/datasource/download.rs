//! Dataset archive download.

use std::time::Duration;

use super::DownloadError;

/// Downloads a dataset archive, enforcing a size limit.
///
/// The limit is checked against `Content-Length` before the body is read and
/// again against the actual body, since the header may be missing or wrong.
pub(crate) async fn download_with_size_limit(
    url: &str,
    timeout: Duration,
    max_size: u64,
) -> Result<Vec<u8>, DownloadError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No error details".to_string());
        log::error!("Dataset server error response: {}", body);
        return Err(DownloadError::Status { status, body });
    }

    if let Some(content_length) = response.content_length() {
        if content_length > max_size {
            return Err(DownloadError::TooLarge {
                size: content_length,
                limit: max_size,
            });
        }
    }

    let bytes = response.bytes().await?.to_vec();
    if bytes.len() as u64 > max_size {
        return Err(DownloadError::TooLarge {
            size: bytes.len() as u64,
            limit: max_size,
        });
    }

    log::debug!("downloaded dataset archive, {} bytes", bytes.len());
    Ok(bytes)
}
