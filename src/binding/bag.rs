//! The read-only view handed to reducers and render callbacks.

use crate::binding::error::BindingError;
use crate::core::{Action, Configuration, Event, StatePath};
use std::fmt;
use std::rc::Rc;

/// Outcome of sending an event to a binding.
#[derive(Clone, Debug, PartialEq)]
pub enum StepResult {
    /// No transition matched; nothing was committed
    Unchanged,

    /// A transition was committed, landing on this path
    Transitioned(StatePath),

    /// Sent during mount's first render; dispatched after the init commit
    Deferred,
}

impl StepResult {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }
}

type SendFn = dyn Fn(Event) -> Result<StepResult, BindingError>;

/// Cloneable handle that sends events to the binding it came from.
///
/// Side effects capture it to transition later, from a timer task for
/// example. Once the binding is dropped, sending fails with
/// [`BindingError::Detached`].
#[derive(Clone)]
pub struct Dispatcher {
    send: Rc<SendFn>,
}

impl Dispatcher {
    pub(crate) fn new<F>(send: F) -> Self
    where
        F: Fn(Event) -> Result<StepResult, BindingError> + 'static,
    {
        Self {
            send: Rc::new(send),
        }
    }

    /// Send an event. Bare names are normalized to `{ type: name }`.
    pub fn send(&self, event: impl Into<Event>) -> Result<StepResult, BindingError> {
        (self.send)(event.into())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatcher(..)")
    }
}

/// Snapshot of a binding: the configuration, the extended state, and the
/// transition handle.
///
/// During a commit, `state` is the extended state from before the commit
/// began and `machine` is the in-flight configuration with its pending
/// actions. In render callbacks both are the committed values.
pub struct Bag<'a, S, A: Action> {
    pub transition: &'a Dispatcher,
    pub state: &'a S,
    pub machine: &'a Configuration<A>,
}

impl<S, A: Action> Bag<'_, S, A> {
    /// Shorthand for `bag.transition.send(event)`.
    pub fn send(&self, event: impl Into<Event>) -> Result<StepResult, BindingError> {
        self.transition.send(event)
    }
}

impl<S: fmt::Debug, A: Action> fmt::Debug for Bag<'_, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bag")
            .field("state", self.state)
            .field("machine", self.machine)
            .finish()
    }
}
