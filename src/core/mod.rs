//! Core value types shared by the evaluator and the binding.
//!
//! This module contains only pure data and pure functions:
//! - Events and their normalization
//! - The `Action` trait for closed action sets
//! - Configurations and state paths
//! - Extended state records and shallow patches
//! - Guard predicates
//! - Immutable commit history

mod action;
mod configuration;
mod event;
mod extended;
mod guard;
mod history;

pub use action::Action;
pub use configuration::{Configuration, StatePath};
pub use event::{Event, EventError, INIT_EVENT};
pub use extended::{ExtendedState, Patch};
pub use guard::Guard;
pub use history::{CommitHistory, CommitRecord};
