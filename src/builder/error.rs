//! Build errors for bindings.

use thiserror::Error;

/// Errors that can occur when building a binding.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial_state(state) before .build()")]
    MissingInitialState,

    #[error("Reducer not specified. Call .reducer(f) or .reducer_with(r) before .build()")]
    MissingReducer,
}
