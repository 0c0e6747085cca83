//! Application state and service initialization
//!
//! This module centralizes service construction so `main` only has to wire
//! the results into the HTTP server.

use std::sync::Arc;

use crate::api::upload::UploadSettings;
use crate::model::Config;
use crate::service::{
    ConversionClient, ConversionSource, ImportService, RbaClient, RowTransformer, RunbookSink,
    SeverityResolver, UnconfiguredConversions, UnconfiguredSink, WorkbookParser,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Parsing and import pipeline
    pub import_service: Arc<ImportService>,
    /// Scratch storage for uploads
    pub upload: UploadSettings,
}

impl AppState {
    /// Build application state from validated configuration
    ///
    /// Creates the upload directory if needed and picks remote clients for
    /// whichever remote systems are configured.
    pub fn new(config: Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.upload_dir).map_err(|e| {
            AppError::UploadDir(format!("{}: {}", config.upload_dir.display(), e))
        })?;

        tracing::info!(
            levels = config.severities.levels.len(),
            "Severity table loaded"
        );

        let parser = WorkbookParser::new(RowTransformer::new(SeverityResolver::new(
            &config.severities,
        )));

        let sink: Box<dyn RunbookSink> = match config.rba {
            Some(rba) => Box::new(RbaClient::new(rba)),
            None => {
                tracing::info!("RBA endpoints not configured, runbook creation disabled");
                Box::new(UnconfiguredSink)
            }
        };

        let conversions: Box<dyn ConversionSource> = match config.conversion {
            Some(conversion) => Box::new(ConversionClient::new(conversion)),
            None => {
                tracing::info!("Class conversion endpoint not configured");
                Box::new(UnconfiguredConversions)
            }
        };

        if config.full_import {
            tracing::info!("Full import enabled: runbooks and triggers will be created");
        }

        let import_service = Arc::new(ImportService::new(
            parser,
            sink,
            conversions,
            config.full_import,
        ));

        Ok(Self {
            import_service,
            upload: UploadSettings {
                upload_dir: config.upload_dir,
            },
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Upload directory cannot be created
    #[error("Upload directory unavailable: {0}")]
    UploadDir(String),
}
