use anyhow::Result;

/// Minimal HTTP GET seam so the remote ridership source can be stubbed.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}
