use std::time::Duration;

use anyhow::{Result, bail};

use super::client::HttpClient;

/// Blocking `reqwest` client with bounded connect and request timeouts.
pub struct BasicClient(reqwest::blocking::Client);

impl BasicClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self(client))
    }
}

impl HttpClient for BasicClient {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.0.get(url).send()?;
        if !response.status().is_success() {
            bail!("GET {url} returned status {}", response.status());
        }
        Ok(response.bytes()?.to_vec())
    }
}
