//! Severity label normalisation

use crate::model::SeverityTable;

/// Maps free-text severity labels to canonical codes
#[derive(Debug, Clone)]
pub struct SeverityResolver {
    /// (code, lowercased synonyms) in table order
    levels: Vec<(String, Vec<String>)>,
}

impl SeverityResolver {
    pub fn new(table: &SeverityTable) -> Self {
        let levels = table
            .levels
            .iter()
            .map(|level| {
                (
                    level.code.clone(),
                    level.synonyms.iter().map(|s| s.to_lowercase()).collect(),
                )
            })
            .collect();

        Self { levels }
    }

    /// Resolve a label case-insensitively; the first matching level wins
    pub fn resolve(&self, severity: &str) -> Option<&str> {
        let needle = severity.to_lowercase();

        self.levels
            .iter()
            .find(|(_, synonyms)| synonyms.contains(&needle))
            .map(|(code, _)| code.as_str())
    }
}

impl Default for SeverityResolver {
    fn default() -> Self {
        Self::new(&SeverityTable::default())
    }
}
