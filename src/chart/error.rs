//! Definition errors.

use thiserror::Error;

/// A single problem found while validating a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionIssue {
    #[error("Machine has no states")]
    NoStates,

    #[error("Compound state '{state}' has no initial child")]
    MissingInitial { state: String },

    #[error("Initial '{initial}' of '{state}' is not a child state")]
    UnknownInitial { state: String, initial: String },

    #[error("Transition on '{event}' in '{state}' targets unknown state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("Transition on '{event}' in '{state}' uses unregistered guard '{guard}'")]
    UnknownGuard {
        state: String,
        event: String,
        guard: String,
    },
}

/// Errors that can occur when loading or checking a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Definition is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Definition has {} problem(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<DefinitionIssue>),
}

fn summarize(issues: &[DefinitionIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
