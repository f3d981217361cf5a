//! HTTP client wrapper for fetching the source document.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::{HTTP_TIMEOUT_SECS, MAX_RETRIES, RETRY_BASE_DELAY_MS};
use crate::error::{LibraryError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("psalmody/", env!("CARGO_PKG_VERSION"));

/// A successful response body with its declared content type.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Create a configured HTTP client.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// What one request produced.
enum Attempt {
    Done(Download),
    /// Transient failure worth another try.
    Transient(String),
}

/// Backoff before retry number `retry` (1-based): 500ms, 1000ms, 2000ms...
fn backoff_delay(retry: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS << (retry - 1))
}

fn attempt_download(client: &Client, url: &str) -> Result<Attempt> {
    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(e) if e.is_connect() || e.is_timeout() => {
            return Ok(Attempt::Transient(e.to_string()));
        }
        // Invalid URL, redirect loop and the like won't improve on retry
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    if status.is_server_error() {
        return Ok(Attempt::Transient(format!("Server error: {status}")));
    }

    // 4xx is final
    let response = response.error_for_status()?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes()?;
    Ok(Attempt::Done(Download {
        bytes: bytes.to_vec(),
        content_type,
    }))
}

/// Download a URL with retry logic.
///
/// Connection errors, timeouts and 5xx responses are retried with
/// exponential backoff, up to [`MAX_RETRIES`] attempts in total. Client
/// errors (4xx) are returned immediately.
pub fn download(client: &Client, url: &str) -> Result<Download> {
    let mut last_error = String::from("Unknown error");

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = backoff_delay(attempt);
            tracing::debug!(attempt, delay = ?delay, "Retrying after delay");
            thread::sleep(delay);
        }

        match attempt_download(client, url)? {
            Attempt::Done(download) => return Ok(download),
            Attempt::Transient(reason) => {
                tracing::warn!(
                    reason = %reason,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "Transient failure, will retry"
                );
                last_error = reason;
            }
        }
    }

    Err(LibraryError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: last_error,
    })
}

/// Decode a response body as UTF-8, replacing invalid sequences.
///
/// A leading byte order mark is dropped.
pub fn bytes_to_string(bytes: &[u8], what: &str) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(_) => {
            tracing::warn!(what, "Response is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
