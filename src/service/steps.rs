//! Splitting remediation text into runbook steps

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{Row, Step, columns};

/// ASCII step number followed by a period, e.g. `2.` or `12.`
static STEP_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.").expect("step separator pattern is valid"));

const NUMBERED_PREFIX: &str = "1.";

/// Reasons a row's steps cannot be built
///
/// The messages are shown to users as the entry status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("Multi step count ist leer")]
    MissingStepCount,

    #[error("Multi step count '{0}' ist keine gültige Anzahl")]
    InvalidStepCount(String),

    #[error("Beschreibung für Step {0} fehlt")]
    MissingStepDescription(usize),

    #[error("Titel für Step {0} fehlt")]
    MissingStepTitle(usize),

    #[error("Maßnahmen oder Multi Steps müssen gefüllt sein")]
    MissingRemediation,
}

/// Build the ordered steps for a row
///
/// Rows flagged `Multi steps = ja` read their steps from the indexed step
/// columns; all other rows split the `Maßnahmen` text.
pub fn split_steps(row: &Row) -> Result<Vec<Step>, StepError> {
    let multi_steps = row.get_field(columns::MULTI_STEPS);

    if multi_steps.as_deref() == Some(columns::MULTI_STEPS_ENABLED) {
        multi_step_columns(row)
    } else {
        let text = row
            .get_field(columns::REMEDIATION)
            .ok_or(StepError::MissingRemediation)?;
        Ok(split_free_text(&text))
    }
}

/// Read `count` title/description pairs; the first gap rejects the row
fn multi_step_columns(row: &Row) -> Result<Vec<Step>, StepError> {
    let raw_count = row
        .get_field(columns::MULTI_STEP_COUNT)
        .ok_or(StepError::MissingStepCount)?;

    let count = parse_step_count(&raw_count).ok_or(StepError::InvalidStepCount(raw_count))?;

    (1..=count)
        .map(|index| -> Result<Step, StepError> {
            let description = row
                .get_field(&columns::step_description(index))
                .ok_or(StepError::MissingStepDescription(index))?;
            let title = row
                .get_field(&columns::step_title(index))
                .ok_or(StepError::MissingStepTitle(index))?;

            Ok(Step::manual(index as u32, Some(title), description))
        })
        .collect()
}

/// Leading integer of the count cell, as a spreadsheet user would read it
fn parse_step_count(raw: &str) -> Option<usize> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok().filter(|count| *count > 0)
}

/// Split numbered free text (`1. a 2. b`) into steps
///
/// Text that does not start with `1.` becomes a single step. Every `<digits>.`
/// token is treated as a separator, and empty segments are kept as steps with
/// an empty description.
pub fn split_free_text(text: &str) -> Vec<Step> {
    let trimmed = text.trim();

    let Some(numbered) = trimmed.strip_prefix(NUMBERED_PREFIX) else {
        return vec![Step::manual(1, None, trimmed)];
    };

    STEP_SEPARATOR
        .split(numbered)
        .enumerate()
        .map(|(i, segment)| Step::manual(i as u32 + 1, None, segment.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptions(steps: &[Step]) -> Vec<&str> {
        steps.iter().map(|s| s.description.as_str()).collect()
    }

    fn numbers(steps: &[Step]) -> Vec<u32> {
        steps.iter().map(|s| s.number).collect()
    }

    fn multi_step_row(count: &str, pairs: &[(usize, Option<&str>, Option<&str>)]) -> Row {
        let mut row = Row::new();
        row.insert("Multi steps", json!("ja"));
        row.insert("Multi step count", json!(count));
        for (i, title, description) in pairs {
            if let Some(title) = title {
                row.insert(columns::step_title(*i), json!(title));
            }
            if let Some(description) = description {
                row.insert(columns::step_description(*i), json!(description));
            }
        }
        row
    }

    #[test]
    fn test_numbered_text() {
        let steps = split_free_text("1. Do A 2. Do B 3. Do C");

        assert_eq!(numbers(&steps), vec![1, 2, 3]);
        assert_eq!(descriptions(&steps), vec!["Do A", "Do B", "Do C"]);
        assert!(steps.iter().all(|s| s.title.is_none()));
    }

    #[test]
    fn test_plain_text_is_single_step() {
        let steps = split_free_text("  Restart the service and check 2. node  ");

        assert_eq!(steps, vec![Step::manual(1, None, "Restart the service and check 2. node")]);
    }

    #[test]
    fn test_multiline_numbered_text() {
        let steps = split_free_text("1. Login\n2. Check logs\n10. Escalate\n");

        assert_eq!(descriptions(&steps), vec!["Login", "Check logs", "Escalate"]);
    }

    #[test]
    fn test_empty_segments_are_kept() {
        let steps = split_free_text("1. Check disk 2.");

        assert_eq!(numbers(&steps), vec![1, 2]);
        assert_eq!(descriptions(&steps), vec!["Check disk", ""]);
    }

    #[test]
    fn test_only_ascii_digits_separate_steps() {
        let steps = split_free_text("1. Check disk ٣. escalate");

        assert_eq!(descriptions(&steps), vec!["Check disk ٣. escalate"]);
    }

    #[test]
    fn test_multi_steps() {
        let row = multi_step_row(
            "2",
            &[
                (1, Some("Login"), Some("ssh to host")),
                (2, Some("Restart"), Some("systemctl restart app")),
            ],
        );

        let steps = split_steps(&row).unwrap();

        assert_eq!(
            steps,
            vec![
                Step::manual(1, Some("Login".into()), "ssh to host"),
                Step::manual(2, Some("Restart".into()), "systemctl restart app"),
            ]
        );
    }

    #[test]
    fn test_multi_steps_ignores_extra_columns() {
        let row = multi_step_row(
            "1",
            &[(1, Some("A"), Some("a")), (2, Some("B"), Some("b"))],
        );

        assert_eq!(split_steps(&row).unwrap().len(), 1);
    }

    #[test]
    fn test_multi_steps_missing_title() {
        let row = multi_step_row(
            "3",
            &[
                (1, Some("A"), Some("a")),
                (2, None, Some("b")),
                (3, Some("C"), Some("c")),
            ],
        );

        let err = split_steps(&row).unwrap_err();

        assert_eq!(err, StepError::MissingStepTitle(2));
        assert_eq!(err.to_string(), "Titel für Step 2 fehlt");
    }

    #[test]
    fn test_multi_steps_missing_description_checked_first() {
        let row = multi_step_row("2", &[(1, Some("A"), Some("a"))]);

        assert_eq!(
            split_steps(&row).unwrap_err(),
            StepError::MissingStepDescription(2)
        );
    }

    #[test]
    fn test_multi_steps_count() {
        let mut row = Row::new();
        row.insert("Multi steps", json!("ja"));
        assert_eq!(split_steps(&row).unwrap_err(), StepError::MissingStepCount);

        let row = multi_step_row("0", &[]);
        assert_eq!(
            split_steps(&row).unwrap_err(),
            StepError::InvalidStepCount("0".into())
        );

        let row = multi_step_row("viele", &[]);
        assert_eq!(
            split_steps(&row).unwrap_err(),
            StepError::InvalidStepCount("viele".into())
        );

        let row = multi_step_row("1 Schritt", &[(1, Some("A"), Some("a"))]);
        assert_eq!(split_steps(&row).unwrap().len(), 1);
    }

    #[test]
    fn test_multi_steps_flag_is_exact() {
        let mut row = Row::new();
        row.insert("Multi steps", json!("Ja"));
        row.insert("Maßnahmen", json!("Ticket eröffnen"));

        let steps = split_steps(&row).unwrap();

        assert_eq!(descriptions(&steps), vec!["Ticket eröffnen"]);
    }

    #[test]
    fn test_missing_remediation() {
        let row = Row::new();
        assert_eq!(
            split_steps(&row).unwrap_err(),
            StepError::MissingRemediation
        );
    }
}
