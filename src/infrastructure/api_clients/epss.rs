//! FIRST EPSS API client
//!
//! Queries `https://api.first.org/data/v1/epss?cve={id}` for the exploit
//! probability of one identifier. The service returns zero or one result per
//! identifier, with the score serialized as a string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{value_to_f64, ExploitScoreClient};
use crate::application::errors::ApiError;

#[derive(Debug, Deserialize)]
struct EpssResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Client for the FIRST EPSS exploit-probability registry.
pub struct EpssClient {
    client: Client,
    base_url: String,
}

impl EpssClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("certwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ExploitScoreClient for EpssClient {
    async fn exploit_score(&self, cve_id: &str) -> Result<Option<f64>, ApiError> {
        let url = format!("{}/data/v1/epss", self.base_url);
        let response = self.client.get(&url).query(&[("cve", cve_id)]).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Http { status, message });
        }

        let parsed: EpssResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(parsed
            .data
            .first()
            .and_then(|entry| entry.get("epss"))
            .and_then(value_to_f64))
    }
}
