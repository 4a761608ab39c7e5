//! Cancellable timers for side effects.
//!
//! [`Timers`] is a virtual clock: tasks run only when the owner calls
//! [`Timers::advance`]. A UI shell maps real time onto it; tests drive it
//! directly. [`TimerSlot`] keeps at most one pending timer per owner,
//! which is the discipline an entry action that starts a timer and an
//! exit action that cancels it rely on.

mod slot;
mod timers;

pub use slot::TimerSlot;
pub use timers::{TimerId, Timers};
