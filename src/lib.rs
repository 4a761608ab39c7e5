//! Statebind: stateful bindings for hierarchical state machines
//!
//! A binding pairs a machine configuration with a caller-defined extended
//! state. The machine decides *where* the component is; a reducer turns
//! the machine's actions into patches of the extended state and into side
//! effects. Machine evaluation stays pure, state changes are atomic, and
//! effects run only after the commit they belong to is visible.
//!
//! # Core Concepts
//!
//! - **Evaluator**: pure `(configuration, event, state) -> configuration`
//! - **Extended state**: a record changed only by shallow patch merges
//! - **Reducer**: maps each action to a [`ReducerResult`]
//! - **Binding**: owns both halves and commits them together
//! - **Timers**: cancellable scheduled tasks, one live handle per slot
//!
//! # Example
//!
//! ```rust
//! use statebind::{action_enum, extended_state};
//! use statebind::{Binding, ReducerResult, Statechart};
//!
//! action_enum! {
//!     pub enum SelectAction {
//!         OpenDropdown => "openDropdown",
//!         CloseDropdown => "closeDropdown",
//!     }
//! }
//!
//! extended_state! {
//!     pub struct Dropdown {
//!         pub is_open: bool,
//!     }
//!     patch: DropdownPatch
//! }
//!
//! let chart = Statechart::from_json(
//!     r#"{
//!         "initial": "Close",
//!         "states": {
//!             "Close": { "on": { "OPEN": "Open" } },
//!             "Open": {
//!                 "onEntry": { "type": "openDropdown" },
//!                 "onExit": { "type": "closeDropdown" },
//!                 "on": { "CLOSE": "Close" }
//!             }
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! let select = Binding::builder(chart)
//!     .initial_state(Dropdown { is_open: false })
//!     .reducer(|_bag, action: &SelectAction, _event| {
//!         let is_open = matches!(action, SelectAction::OpenDropdown);
//!         ReducerResult::update(DropdownPatch::new().is_open(is_open))
//!     })
//!     .build()
//!     .unwrap();
//!
//! select.mount().unwrap();
//! select.transition("OPEN").unwrap();
//! assert!(select.state().is_open);
//!
//! // Events the current configuration does not handle change nothing.
//! assert!(!select.transition("OPEN").unwrap().is_transitioned());
//! ```

pub mod binding;
pub mod builder;
pub mod chart;
pub mod core;
pub mod schedule;

// Re-export commonly used types
pub use binding::{
    Bag, Binding, BindingError, Dispatcher, EffectError, Reducer, ReducerResult, SideEffect,
    StepResult,
};
pub use builder::{BindingBuilder, BuildError};
pub use chart::{DefinitionError, Evaluator, MachineDefinition, Statechart};
pub use core::{Action, Configuration, Event, ExtendedState, Guard, Patch, StatePath};
pub use schedule::{TimerSlot, Timers};
