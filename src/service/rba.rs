//! Runbook automation (RBA) API client
//!
//! Creates runbooks and triggers in the remote automation system.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::model::{RbaConfig, Runbook, Trigger};

#[derive(Debug, thiserror::Error)]
pub enum RbaError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Response did not contain a runbook id: {0}")]
    MissingRunbookId(String),

    #[error("Runbook automation service is not configured")]
    NotConfigured,
}

/// Remote system that stores runbooks and triggers
#[async_trait]
pub trait RunbookSink: Send + Sync {
    /// Create a runbook and return its identifier
    async fn create_runbook(&self, runbook: &Runbook) -> Result<String, RbaError>;

    async fn create_trigger(&self, trigger: &Trigger) -> Result<(), RbaError>;
}

// Response models - only the fields we need
#[derive(Debug, Deserialize)]
struct CreatedRunbook {
    #[serde(rename = "readOnly")]
    read_only: Option<ReadOnly>,
}

#[derive(Debug, Deserialize)]
struct ReadOnly {
    #[serde(rename = "_runbookId")]
    runbook_id: Option<String>,
}

/// Client for the RBA runbook and trigger endpoints
pub struct RbaClient {
    client: Client,
    config: RbaConfig,
}

impl RbaClient {
    pub fn new(config: RbaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn post<T: serde::Serialize + Sync>(
        &self,
        url: &Url,
        body: &T,
    ) -> Result<reqwest::Response, RbaError> {
        let response = self
            .client
            .post(url.as_str())
            .header("Authorization", self.config.authorization())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RbaError::UnexpectedStatus { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl RunbookSink for RbaClient {
    async fn create_runbook(&self, runbook: &Runbook) -> Result<String, RbaError> {
        tracing::debug!(name = %runbook.name, url = %self.config.runbook_endpoint, "Creating runbook");

        let response = self.post(&self.config.runbook_endpoint, runbook).await?;
        let body = response.text().await?;

        let runbook_id = serde_json::from_str::<CreatedRunbook>(&body)
            .ok()
            .and_then(|created| created.read_only)
            .and_then(|read_only| read_only.runbook_id)
            .filter(|id| !id.is_empty())
            .ok_or(RbaError::MissingRunbookId(body))?;

        tracing::info!(name = %runbook.name, runbook_id = %runbook_id, "Runbook created");

        Ok(runbook_id)
    }

    async fn create_trigger(&self, trigger: &Trigger) -> Result<(), RbaError> {
        tracing::debug!(name = %trigger.name, url = %self.config.trigger_endpoint, "Creating trigger");

        self.post(&self.config.trigger_endpoint, trigger).await?;

        tracing::info!(name = %trigger.name, runbook_id = %trigger.runbook_id, "Trigger created");

        Ok(())
    }
}

/// Stand-in used when no RBA endpoint is configured
pub struct UnconfiguredSink;

#[async_trait]
impl RunbookSink for UnconfiguredSink {
    async fn create_runbook(&self, _runbook: &Runbook) -> Result<String, RbaError> {
        Err(RbaError::NotConfigured)
    }

    async fn create_trigger(&self, _trigger: &Trigger) -> Result<(), RbaError> {
        Err(RbaError::NotConfigured)
    }
}
