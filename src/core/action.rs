//! Action trait for machine actions.
//!
//! Actions are the named instructions a machine emits when states are
//! entered or exited and when transitions fire. They are plain data: the
//! reducer decides what an action means for the extended state.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for the closed set of actions a machine can emit.
///
/// Implementors are usually enums, one variant per action kind, with any
/// fixed payload (a timer delay, say) carried as variant fields. Reducers
/// match on them exhaustively and fall back to a no-op for the rest.
///
/// # Required Traits
///
/// - `Clone`: Actions are copied out of the definition into configurations
/// - `PartialEq`: Actions must be comparable for tests and diagnostics
/// - `Debug`: Actions must be debuggable for tracing
/// - `Serialize` + `Deserialize`: Definitions are loaded from JSON
///
/// # Example
///
/// ```rust
/// use statebind::core::Action;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// #[serde(tag = "type", rename_all = "camelCase")]
/// enum SwitchAction {
///     TurnOn,
///     TurnOff,
///     StartUnblockTimer { delay: u64 },
/// }
///
/// impl Action for SwitchAction {
///     fn name(&self) -> &str {
///         match self {
///             Self::TurnOn => "turnOn",
///             Self::TurnOff => "turnOff",
///             Self::StartUnblockTimer { .. } => "startUnblockTimer",
///         }
///     }
/// }
///
/// assert_eq!(SwitchAction::StartUnblockTimer { delay: 500 }.name(), "startUnblockTimer");
/// ```
pub trait Action:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the action's name for display/logging.
    fn name(&self) -> &str;
}
