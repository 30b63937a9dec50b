//! HTTP loader for the comparison dataset.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use super::Dataset;
use crate::error::Result;

/// Location of the published corner-deviation dataset.
pub const DEFAULT_URL: &str =
    "https://ai-process-sandy.s3.eu-west-1.amazonaws.com/purge/deviation.json";

impl Dataset {
    /// Download and parse the dataset at `url`.
    ///
    /// Performs a single blocking GET with no timeout and no retry. A
    /// non-success status is an error.
    pub fn fetch(url: &str) -> Result<Self> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Self::fetch_with(&client, url)
    }

    /// Download and parse the dataset at `url` using an existing client.
    pub fn fetch_with(client: &Client, url: &str) -> Result<Self> {
        info!(url, "fetching dataset");
        let response = client.get(url).send()?.error_for_status()?;
        let dataset = Self::from_reader(response)?;
        info!(rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }
}
