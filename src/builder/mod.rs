//! Builder API for ergonomic binding construction.
//!
//! This module provides a fluent builder for bindings and macros for
//! declaring action sets and extended state records with minimal
//! boilerplate.

pub mod binding;
pub mod error;
pub mod macros;

pub use binding::{BindingBuilder, DEFAULT_HISTORY_CAPACITY};
pub use error::BuildError;
