//! Runbook import pipeline
//!
//! Parses uploaded workbooks and, when the full import is enabled, creates the
//! runbooks and their triggers in the RBA system.

use std::path::PathBuf;

use crate::model::{Entry, EntryPartition};
use crate::service::conversion::{ConversionError, ConversionSource};
use crate::service::rba::{RbaError, RunbookSink};
use crate::service::trigger::TriggerBuilder;
use crate::service::workbook::WorkbookParser;

const STATUS_RUNBOOK_FAILED: &str = "Fehler beim Erstellen des Runbooks, siehe logs";
const STATUS_RUNBOOK_ID_MISSING: &str =
    "RunbookId konnte nach dem Erstellen des Runbooks nicht geparst werden";
const STATUS_TRIGGER_FAILED: &str = "Fehler beim Erstellen des Triggers, siehe logs";
const STATUS_IMPORTED: &str = "Runbook und Trigger wurden erfolgreich erstellt";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Class conversion table unavailable: {0}")]
    ConversionFetch(#[from] ConversionError),

    #[error("Workbook parsing was interrupted: {0}")]
    Interrupted(String),
}

/// Orchestrates the import phases for one upload
pub struct ImportService {
    parser: WorkbookParser,
    triggers: TriggerBuilder,
    sink: Box<dyn RunbookSink>,
    conversions: Box<dyn ConversionSource>,
    full_import: bool,
}

impl ImportService {
    pub fn new(
        parser: WorkbookParser,
        sink: Box<dyn RunbookSink>,
        conversions: Box<dyn ConversionSource>,
        full_import: bool,
    ) -> Self {
        let triggers = TriggerBuilder::new(parser.transformer().severities().clone());

        Self {
            parser,
            triggers,
            sink,
            conversions,
            full_import,
        }
    }

    pub fn full_import(&self) -> bool {
        self.full_import
    }

    /// Run every enabled phase over the given workbooks
    ///
    /// Invalid entries of all phases are concatenated; valid entries are the
    /// ones that made it through the last phase.
    pub async fn import(&self, paths: Vec<PathBuf>) -> Result<EntryPartition, ImportError> {
        let parsed = self.parse_files(paths).await?;

        if !self.full_import {
            return Ok(parsed);
        }

        let mut invalid_entries = parsed.invalid_entries;

        let created = self.create_runbooks(parsed.valid_entries).await;
        invalid_entries.extend(created.invalid_entries);

        let triggered = self
            .triggers
            .build_all(self.conversions.as_ref(), created.valid_entries)
            .await?;
        invalid_entries.extend(triggered.invalid_entries);

        let completed = self.create_triggers(triggered.valid_entries).await;
        invalid_entries.extend(completed.invalid_entries);

        Ok(EntryPartition {
            valid_entries: completed.valid_entries,
            invalid_entries,
        })
    }

    /// Parse workbooks off the async executor
    pub async fn parse_files(&self, paths: Vec<PathBuf>) -> Result<EntryPartition, ImportError> {
        let parser = self.parser.clone();

        tokio::task::spawn_blocking(move || parser.parse_files(&paths))
            .await
            .map_err(|e| ImportError::Interrupted(e.to_string()))
    }

    /// Create runbooks one at a time; failures only affect their own entry
    pub async fn create_runbooks(&self, entries: Vec<Entry>) -> EntryPartition {
        let mut partition = EntryPartition::default();

        for mut entry in entries {
            let Some(runbook) = &entry.runbook else {
                partition.push_invalid(entry, STATUS_RUNBOOK_FAILED);
                continue;
            };

            match self.sink.create_runbook(runbook).await {
                Ok(runbook_id) => {
                    entry.runbook_id = Some(runbook_id);
                    partition.push_valid(entry);
                }
                Err(RbaError::MissingRunbookId(body)) => {
                    tracing::warn!(body = %body, "{} Could not read runbook id from response", entry.log_prefix());
                    partition.push_invalid(entry, STATUS_RUNBOOK_ID_MISSING);
                }
                Err(e) => {
                    tracing::error!(error = %e, "{} Runbook creation failed", entry.log_prefix());
                    partition.push_invalid(entry, STATUS_RUNBOOK_FAILED);
                }
            }
        }

        partition
    }

    /// Create triggers one at a time; failures only affect their own entry
    pub async fn create_triggers(&self, entries: Vec<Entry>) -> EntryPartition {
        let mut partition = EntryPartition::default();

        for mut entry in entries {
            let Some(trigger) = &entry.trigger else {
                partition.push_invalid(entry, STATUS_TRIGGER_FAILED);
                continue;
            };

            match self.sink.create_trigger(trigger).await {
                Ok(()) => {
                    entry.status = Some(STATUS_IMPORTED.to_string());
                    partition.push_valid(entry);
                }
                Err(e) => {
                    tracing::error!(error = %e, "{} Trigger creation failed", entry.log_prefix());
                    partition.push_invalid(entry, STATUS_TRIGGER_FAILED);
                }
            }
        }

        partition
    }
}
