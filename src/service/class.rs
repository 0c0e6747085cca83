//! Alert class normalisation

use crate::model::ClassConversion;

/// Find the canonical class code for a label
///
/// Matching is exact and case-sensitive; the first matching row wins.
pub fn resolve_class<'a>(class: &str, conversions: &'a [ClassConversion]) -> Option<&'a str> {
    conversions
        .iter()
        .find(|c| c.conversion == class)
        .map(|c| c.value.as_str())
}
