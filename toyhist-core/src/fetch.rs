use reqwest::blocking::Client;
use toyhist_common::{Result, ToyHistError};

use crate::dataset::ToyDataset;

/// single-shot downloader for the toy dataset; no retries
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    url: String,
}

impl Fetcher {
    pub fn new(url: &str) -> Result<Self> {
        // downloads may be slow; the only bound is the server closing the connection
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| ToyHistError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: &str) -> Self {
        Self { client, url: url.to_owned() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the source URL and decode the body into a [`ToyDataset`]
    pub fn download(&self) -> Result<ToyDataset> {
        tracing::info!(url = %self.url, "downloading toy dataset");
        let resp = self.client.get(&self.url)
            .send()
            .map_err(|e| ToyHistError::Network(format!("GET {} failed: {e}", self.url)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ToyHistError::Network(format!("GET {} returned HTTP {status}", self.url)));
        }
        let body = resp.bytes()
            .map_err(|e| ToyHistError::Network(format!("reading body of {} failed: {e}", self.url)))?;
        let dataset = ToyDataset::from_json(&body)?;
        tracing::info!(bytes = body.len(), n_bins = dataset.n_bins(), "dataset downloaded");
        Ok(dataset)
    }
}

/// download using a default client
pub fn download(url: &str) -> Result<ToyDataset> {
    Fetcher::new(url)?.download()
}
