use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Alert-matching rule that launches a runbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub name: String,
    pub description: String,
    pub runbook_id: String,
    pub enabled: bool,
    pub execution_type: String,
    pub filter_operator: String,
    pub filter_priority: u32,
    pub filters: Vec<TriggerFilter>,
    pub parameter_mappings: Vec<ParameterMapping>,
    pub event_sources: Vec<String>,
}

/// Equality match on a single alert attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TriggerFilter {
    pub name: String,
    pub attribute: String,
    pub operator: String,
    pub value: String,
}

impl TriggerFilter {
    pub fn equals(attribute: &str, value: impl Into<String>) -> Self {
        Self {
            name: attribute.to_string(),
            attribute: attribute.to_string(),
            operator: "=".to_string(),
            value: value.into(),
        }
    }
}

/// Maps a runbook parameter to an alert attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMapping {
    pub parameter_name: String,
    pub mapping_type: String,
    pub parameter_value: String,
}

impl ParameterMapping {
    pub fn automatic(parameter_name: &str, attribute: &str) -> Self {
        Self {
            parameter_name: parameter_name.to_string(),
            mapping_type: "automatic".to_string(),
            parameter_value: attribute.to_string(),
        }
    }
}
