//! Remote fetch collaborator.
//!
//! The pipeline only depends on the [`Fetcher`] trait; [`HttpFetcher`] is
//! the default blocking implementation. Tests and embedders can inject
//! their own (or [`NoFetch`] to forbid network access entirely).

use crate::error::FetchError;

/// Retrieves the raw bytes behind a remote URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP fetcher with a bounded timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// A fetcher that refuses every URL. Used where remote input is not
/// expected (unit tests, offline embedders).
pub struct NoFetch;

impl Fetcher for NoFetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(format!("remote fetch disabled (requested {})", url).into())
    }
}
