//! Binding errors.

use crate::binding::reducer::EffectError;
use thiserror::Error;

/// Errors surfaced by a binding.
///
/// An event with no transition is not an error; it yields
/// [`StepResult::Unchanged`](crate::binding::StepResult::Unchanged).
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("Binding is not mounted. Call .mount() before sending events")]
    NotMounted,

    #[error("Binding is already mounted")]
    AlreadyMounted,

    #[error("Binding was dropped; this dispatcher is detached")]
    Detached,

    #[error("A reducer sent an event while its own commit was in progress")]
    ReentrantReducer,

    /// The commit before it already took effect and is not rolled back.
    #[error("Side effect of action '{action}' failed: {source}")]
    SideEffect {
        action: String,
        #[source]
        source: EffectError,
    },
}

