//! Machine definitions and their evaluation.
//!
//! The binding only needs the [`Evaluator`] contract: an initial
//! configuration, and a pure function from (configuration, event, extended
//! state) to the next configuration. [`Statechart`] is the evaluator for
//! nested state definitions loaded from JSON or built in code.
//!
//! # Key Concepts
//!
//! - **Definition**: immutable tree of states with entry/exit actions
//! - **Transitions**: target, actions, and an optional named guard
//! - **Validation**: every structural problem is reported at once

mod definition;
mod error;
mod evaluator;
mod validate;

pub use definition::{MachineDefinition, StateNode, TransitionDef, Transitions};
pub use error::{DefinitionError, DefinitionIssue};
pub use evaluator::{Evaluator, Statechart};
pub use validate::{issues, validate};
