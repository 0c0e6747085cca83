use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Row of the remote class-conversion table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassConversion {
    /// Free-text class label as used in the workbooks
    #[serde(rename = "Conversion")]
    pub conversion: String,
    /// Canonical class code
    #[serde(rename = "Value", deserialize_with = "string_or_number")]
    pub value: String,
}

impl ClassConversion {
    pub fn new(conversion: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            conversion: conversion.into(),
            value: value.into(),
        }
    }
}

/// Response body of the conversion endpoint
#[derive(Debug, Deserialize)]
pub struct ConversionResponse {
    pub rowset: ConversionRowset,
}

#[derive(Debug, Deserialize)]
pub struct ConversionRowset {
    #[serde(default)]
    pub rows: Vec<ClassConversion>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accepts_numbers_and_strings() {
        let body = r#"{"rowset":{"rows":[
            {"Conversion":"Database","Value":4711},
            {"Conversion":"Network","Value":"12"}
        ]}}"#;

        let response: ConversionResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            response.rowset.rows,
            vec![
                ClassConversion::new("Database", "4711"),
                ClassConversion::new("Network", "12"),
            ]
        );
    }

    #[test]
    fn test_value_rejects_objects() {
        let body = r#"{"Conversion":"Database","Value":{"a":1}}"#;
        assert!(serde_json::from_str::<ClassConversion>(body).is_err());
    }
}
