//! Trigger construction for created runbooks

use thiserror::Error;

use crate::model::{
    ClassConversion, Entry, EntryPartition, ParameterMapping, Runbook, Trigger, TriggerFilter,
    columns,
};
use crate::service::class::resolve_class;
use crate::service::conversion::{ConversionError, ConversionSource};
use crate::service::severity::SeverityResolver;

const ALERT_TYPE_PROBLEM: &str = "1";
const FILTER_PRIORITY: u32 = 5;

/// Per-entry trigger failures, shown to users as the entry status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("Keine Class-Konvertierung für '{0}' gefunden")]
    MissingClassConversion(String),

    #[error("Es wurde keine Severity für '{0}' hinterlegt")]
    UnknownSeverity(String),

    #[error("Für den Eintrag wurde kein Runbook erstellt")]
    MissingRunbook,
}

/// Build the trigger that launches `runbook` for matching alerts
pub fn build_trigger(
    runbook: &Runbook,
    runbook_id: &str,
    class_code: &str,
    severity_code: &str,
    summary: &str,
) -> Trigger {
    Trigger {
        name: runbook.name.clone(),
        description: runbook.description.clone(),
        runbook_id: runbook_id.to_string(),
        enabled: true,
        execution_type: "manual".to_string(),
        filter_operator: "and".to_string(),
        filter_priority: FILTER_PRIORITY,
        filters: vec![
            TriggerFilter::equals("Type", ALERT_TYPE_PROBLEM),
            TriggerFilter::equals("Class", class_code),
            TriggerFilter::equals("Severity", severity_code),
            TriggerFilter::equals("Summary", summary),
        ],
        parameter_mappings: vec![
            ParameterMapping::automatic("appName", "Application"),
            ParameterMapping::automatic("platform", "Platform"),
        ],
        event_sources: Vec::new(),
    }
}

/// Attaches triggers to entries whose runbooks were created remotely
#[derive(Debug, Clone)]
pub struct TriggerBuilder {
    severities: SeverityResolver,
}

impl TriggerBuilder {
    pub fn new(severities: SeverityResolver) -> Self {
        Self { severities }
    }

    /// Fetch the conversion table once, then build triggers for all entries
    ///
    /// A failed fetch aborts the whole phase; per-entry failures do not.
    pub async fn build_all(
        &self,
        source: &dyn ConversionSource,
        entries: Vec<Entry>,
    ) -> Result<EntryPartition, ConversionError> {
        let conversions = source.fetch_conversions().await?;
        Ok(self.build(entries, &conversions))
    }

    /// Build triggers against an already fetched conversion table
    pub fn build(&self, entries: Vec<Entry>, conversions: &[ClassConversion]) -> EntryPartition {
        let mut partition = EntryPartition::default();

        for mut entry in entries {
            match self.trigger_for(&entry, conversions) {
                Ok(trigger) => {
                    entry.trigger = Some(trigger);
                    partition.push_valid(entry);
                }
                Err(e) => {
                    tracing::info!(
                        status = %e,
                        row = ?entry.row,
                        "{} Trigger not built",
                        entry.log_prefix()
                    );
                    partition.push_invalid(entry, e.to_string());
                }
            }
        }

        partition
    }

    fn trigger_for(
        &self,
        entry: &Entry,
        conversions: &[ClassConversion],
    ) -> Result<Trigger, TriggerError> {
        let (Some(runbook), Some(runbook_id)) = (&entry.runbook, &entry.runbook_id) else {
            return Err(TriggerError::MissingRunbook);
        };

        let class = entry.row.get_field(columns::CLASS).unwrap_or_default();
        let class_code = resolve_class(&class, conversions)
            .ok_or_else(|| TriggerError::MissingClassConversion(class.clone()))?;

        let severity = entry.row.get_field(columns::SEVERITY).unwrap_or_default();
        let severity_code = self
            .severities
            .resolve(&severity)
            .ok_or_else(|| TriggerError::UnknownSeverity(severity.clone()))?;

        let summary = entry.row.get_field(columns::SUMMARY).unwrap_or_default();

        Ok(build_trigger(
            runbook,
            runbook_id,
            class_code,
            severity_code,
            &summary,
        ))
    }
}
