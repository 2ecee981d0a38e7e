mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Fetches `url` and decodes the body as UTF-8 text.
pub fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<String> {
    let bytes = client.get(url)?;
    debug!(url, bytes = bytes.len(), "Fetched remote body");
    String::from_utf8(bytes).with_context(|| format!("body of {url} is not UTF-8"))
}
