//! Direct-URL acquisition backend (curl).
//!
//! Single GET streaming the body to the destination file. HTTP status and
//! curl error codes are mapped onto the fetch taxonomy: definitive 4xx means
//! the origin will not serve the content; timeouts, connection failures,
//! throttling, and 5xx are transient.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use super::{FetchError, Fetcher};

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

/// Maps an HTTP status to the fetch taxonomy. 2xx is success and never
/// reaches this function.
fn classify_status(code: u32, url: &str) -> FetchError {
    match code {
        408 | 429 => FetchError::Transient(format!("HTTP {} for {}", code, url)),
        400..=499 => FetchError::Unavailable(format!("HTTP {} for {}", code, url)),
        _ => FetchError::Transient(format!("HTTP {} for {}", code, url)),
    }
}

fn classify_curl(e: &curl::Error, url: &str) -> FetchError {
    // All curl-level failures (DNS, connect, timeout, aborted write) are
    // local/network conditions, never proof the origin dropped the content.
    FetchError::Transient(format!("curl: {} for {}", e, url))
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let mut file = File::create(dest)
            .map_err(|e| FetchError::Transient(format!("create {}: {}", dest.display(), e)))?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(|e| classify_curl(&e, url))?;
        easy.follow_location(true).map_err(|e| classify_curl(&e, url))?;
        easy.max_redirections(10).map_err(|e| classify_curl(&e, url))?;
        easy.connect_timeout(Duration::from_secs(30))
            .map_err(|e| classify_curl(&e, url))?;
        easy.low_speed_limit(1024).map_err(|e| classify_curl(&e, url))?;
        easy.low_speed_time(Duration::from_secs(60))
            .map_err(|e| classify_curl(&e, url))?;
        easy.fail_on_error(false).map_err(|e| classify_curl(&e, url))?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match file.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        tracing::warn!("write during fetch failed: {}", e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(|e| classify_curl(&e, url))?;
            transfer.perform().map_err(|e| classify_curl(&e, url))?;
        }

        let code = easy
            .response_code()
            .map_err(|e| classify_curl(&e, url))?;
        if (200..300).contains(&code) {
            Ok(())
        } else {
            Err(classify_status(code, url))
        }
    }
}
