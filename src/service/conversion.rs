//! Object Server class-conversion API client
//!
//! Fetches the table that maps alert class labels to class codes.

use async_trait::async_trait;
use reqwest::Client;

use crate::model::conversion::ConversionResponse;
use crate::model::{ClassConversion, ConversionConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Class conversion service is not configured")]
    NotConfigured,
}

/// Source of the class-conversion table
#[async_trait]
pub trait ConversionSource: Send + Sync {
    async fn fetch_conversions(&self) -> Result<Vec<ClassConversion>, ConversionError>;
}

/// Client for the Object Server alerts conversion endpoint
pub struct ConversionClient {
    client: Client,
    config: ConversionConfig,
}

impl ConversionClient {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ConversionSource for ConversionClient {
    async fn fetch_conversions(&self) -> Result<Vec<ClassConversion>, ConversionError> {
        tracing::info!(url = %self.config.url, "Fetching class conversions from Object Server API");

        let response = self
            .client
            .get(self.config.url.as_str())
            .header("Authorization", format!("Basic {}", self.config.auth))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConversionError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let body: ConversionResponse = response.json().await.map_err(|e| {
            ConversionError::ParseError(format!("Failed to deserialize conversions: {}", e))
        })?;

        tracing::info!(
            rows = body.rowset.rows.len(),
            "Fetched class conversions from Object Server API"
        );

        Ok(body.rowset.rows)
    }
}

/// Stand-in used when no conversion endpoint is configured
pub struct UnconfiguredConversions;

#[async_trait]
impl ConversionSource for UnconfiguredConversions {
    async fn fetch_conversions(&self) -> Result<Vec<ClassConversion>, ConversionError> {
        Err(ConversionError::NotConfigured)
    }
}
