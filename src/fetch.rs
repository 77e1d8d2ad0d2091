//! Input acquisition: a local file or an HTTP(S) URL.

use anyhow::{Context, Result};
use tracing::debug;

/// Downloads a publication with a blocking client. Non-success statuses fail.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Reads the whole source into memory. Sources starting with `http://` or
/// `https://` are downloaded, anything else is treated as a file path.
#[tracing::instrument]
pub fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_url(source) {
        fetch_bytes(source).with_context(|| format!("failed to download '{source}'"))?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
