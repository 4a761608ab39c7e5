//! Stateful binding of a machine to an extended state.
//!
//! A [`Binding`] holds the current machine configuration and the
//! caller's extended state, and replaces both together on every
//! transition. Machine actions are interpreted by a [`Reducer`], which
//! returns patches to merge and side effects to run once the commit is
//! visible.
//!
//! # Key Concepts
//!
//! - **Bag**: what reducers and render callbacks see
//! - **ReducerResult**: patch, side effect, both, or neither
//! - **Dispatcher**: cloneable handle for sending events from effects

mod bag;
mod component;
mod error;
mod reducer;

pub use bag::{Bag, Dispatcher, StepResult};
pub use component::{Binding, Snapshot};
pub use error::BindingError;
pub use reducer::{EffectError, Reducer, ReducerResult, SideEffect};
