use serde::Deserialize;

/// One canonical severity code and the labels that mean it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeverityLevel {
    pub code: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Ordered severity synonym table
///
/// Levels are searched in declaration order, so the first level listing a
/// label wins when synonyms overlap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SeverityTable {
    pub levels: Vec<SeverityLevel>,
}

impl SeverityTable {
    pub fn new(levels: Vec<SeverityLevel>) -> Self {
        Self { levels }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for SeverityTable {
    /// Netcool severity codes with English and German labels
    fn default() -> Self {
        let level = |code: &str, synonyms: &[&str]| SeverityLevel {
            code: code.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        };

        Self::new(vec![
            level("5", &["Critical", "Kritisch", "Sehr hoch", "P1"]),
            level("4", &["Major", "Hoch", "P2"]),
            level("3", &["Minor", "Mittel", "P3"]),
            level("2", &["Warning", "Warnung", "Niedrig", "P4"]),
            level("1", &["Indeterminate", "Unbestimmt", "Info"]),
        ])
    }
}
