use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named remediation procedure built from one worksheet row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Runbook {
    /// `[BF] Class - Summary (Severity)`
    pub name: String,
    pub description: String,
    /// BF, summary, class and severity code, followed by user tags
    pub tags: Vec<String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Step {
    /// 1-based position within the runbook
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub description: String,
}

impl Step {
    pub fn manual(number: u32, title: Option<String>, description: impl Into<String>) -> Self {
        Self {
            number,
            title,
            step_type: StepType::Manual,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Manual,
}
