//! Worksheet row to runbook transformation

use thiserror::Error;

use crate::model::{Entry, Row, Runbook, columns};
use crate::service::severity::SeverityResolver;
use crate::service::steps::{StepError, split_steps};

/// Validation failures for a single row
///
/// The messages are shown to users as the entry status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Die Felder 'BF', 'Class', 'Severity' und 'Beschreibung' sind erforderlich")]
    MissingRequiredFields,

    #[error("Es wurde keine Severity für '{0}' hinterlegt")]
    UnknownSeverity(String),

    #[error(transparent)]
    Steps(#[from] StepError),
}

/// A rejected row, with whatever part of the runbook was already built
#[derive(Debug)]
pub struct RowRejection {
    pub error: RowError,
    pub runbook: Option<Runbook>,
}

impl From<RowError> for RowRejection {
    fn from(error: RowError) -> Self {
        Self {
            error,
            runbook: None,
        }
    }
}

/// Outcome of transforming one row
#[derive(Debug)]
pub enum RowOutcome {
    Valid(Entry),
    Invalid(Entry),
}

/// Fields every row must carry
struct RequiredFields {
    business_function: String,
    class: String,
    severity: String,
    description: String,
}

impl RequiredFields {
    fn from_row(row: &Row) -> Result<Self, RowError> {
        let field = |name: &str| row.get_field(name).ok_or(RowError::MissingRequiredFields);

        Ok(Self {
            business_function: field(columns::BUSINESS_FUNCTION)?,
            class: field(columns::CLASS)?,
            severity: field(columns::SEVERITY)?,
            description: field(columns::DESCRIPTION)?,
        })
    }
}

/// Validates rows and builds runbooks from them
#[derive(Debug, Clone)]
pub struct RowTransformer {
    severities: SeverityResolver,
}

impl RowTransformer {
    pub fn new(severities: SeverityResolver) -> Self {
        Self { severities }
    }

    pub fn severities(&self) -> &SeverityResolver {
        &self.severities
    }

    /// Turn a row into a valid entry carrying its runbook, or an invalid entry
    /// carrying the reason
    pub fn transform(&self, row: Row, filename: &str, sheetname: &str) -> RowOutcome {
        let mut entry = Entry::new(row, filename, sheetname);

        match self.build_runbook(&entry.row) {
            Ok(runbook) => {
                tracing::debug!(runbook = ?runbook, "{} Parsed runbook", entry.log_prefix());
                entry.runbook = Some(runbook);
                RowOutcome::Valid(entry)
            }
            Err(rejection) => {
                let status = rejection.error.to_string();
                tracing::info!(
                    status = %status,
                    row = ?entry.row,
                    "{} Row rejected",
                    entry.log_prefix()
                );
                entry.runbook = rejection.runbook;
                entry.status = Some(status);
                RowOutcome::Invalid(entry)
            }
        }
    }

    /// Validation chain: required fields, then severity, then steps
    pub fn build_runbook(&self, row: &Row) -> Result<Runbook, RowRejection> {
        let fields = RequiredFields::from_row(row)?;

        let severity = self
            .severities
            .resolve(&fields.severity)
            .ok_or_else(|| RowError::UnknownSeverity(fields.severity.clone()))?;

        let summary = row.get_field(columns::SUMMARY).unwrap_or_default();

        let mut tags = vec![
            fields.business_function.clone(),
            summary.clone(),
            fields.class.clone(),
            severity.to_string(),
        ];
        tags.extend(parse_tags(row.get_field(columns::TAGS).as_deref()));

        let header = Runbook {
            name: format!(
                "[{}] {} - {} ({})",
                fields.business_function, fields.class, summary, severity
            ),
            description: fields.description,
            tags,
            steps: Vec::new(),
        };

        match split_steps(row) {
            Ok(steps) => Ok(Runbook { steps, ..header }),
            Err(e) => Err(RowRejection {
                error: e.into(),
                runbook: Some(header),
            }),
        }
    }
}

/// Comma-separated user tags, trimmed, in their original order
fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| t.split(',').map(|tag| tag.trim().to_string()).collect())
        .unwrap_or_default()
}
