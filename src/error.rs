//! Error types for planning runs.
//!
//! Only structural problems are errors. Missing catalog metadata and
//! non-positive durations degrade to defaults or skipped records and are
//! reported as warnings in the plan's reasoning instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::scheduler::SchedulerMode;
use crate::validation::ValidationError;

/// Errors from a planning run.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The simulation could not finish all tasks.
    #[error("{mode} scheduler made no progress after {iterations} iterations ({unfinished} task(s) unfinished)")]
    NoProgressDetected {
        mode: SchedulerMode,
        iterations: usize,
        unfinished: usize,
    },

    #[error("invalid planner settings: {0}")]
    InvalidSettings(String),

    #[error("invalid planning input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("failed to read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_no_progress_message() {
        let err = PlanningError::NoProgressDetected {
            mode: SchedulerMode::Parallel,
            iterations: 42,
            unfinished: 3,
        };
        assert_eq!(
            err.to_string(),
            "parallel scheduler made no progress after 42 iterations (3 task(s) unfinished)"
        );
    }

    #[test]
    fn test_invalid_input_joins_messages() {
        let err = PlanningError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate record ID: P1"),
            ValidationError::new(ValidationErrorKind::UnknownRoom, "Record 'P2' references unknown room 'X'"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid planning input: Duplicate record ID: P1; Record 'P2' references unknown room 'X'"
        );
    }
}
