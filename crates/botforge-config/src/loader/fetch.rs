//! HTTP retrieval of remote override documents.

use crate::ConfigError;
use log::{debug, info, warn};
use reqwest::StatusCode;
use std::time::Duration;

/// Remote fetches are bounded rather than relying on client defaults.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// GET a remote override document.
///
/// Returns the body on HTTP 200. Any other status means "no override
/// available" and yields `None`; transport failures propagate.
pub(super) fn fetch_override(url: &str) -> Result<Option<String>, ConfigError> {
    info!("pulling config file: {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?;
    if response.status() == StatusCode::OK {
        let body = response.text()?;
        debug!("bot configuration fetched ({} bytes)", body.len());
        Ok(Some(body))
    } else {
        warn!("config file not found at {url}, using default configuration");
        Ok(None)
    }
}
