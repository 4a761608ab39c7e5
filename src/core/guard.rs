//! Guard predicates for conditional transitions.
//!
//! Guards are pure boolean functions over the extended state and the
//! incoming event. A definition refers to them by name (`cond`) and the
//! evaluator consults them while selecting a transition.

use super::event::Event;
use std::marker::PhantomData;

/// Pure predicate that decides whether a guarded transition may fire.
///
/// # Example
///
/// ```rust
/// use statebind::core::{Event, Guard};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Search {
///     query: String,
/// }
///
/// let has_query = Guard::new(|s: &Search, _e: &Event| !s.query.is_empty());
///
/// let empty = Search { query: String::new() };
/// let typed = Search { query: "ap".to_string() };
///
/// assert!(!has_query.check(&empty, &Event::new("SUBMIT")));
/// assert!(has_query.check(&typed, &Event::new("SUBMIT")));
/// ```
pub struct Guard<S> {
    predicate: Box<dyn Fn(&S, &Event) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S, &Event) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that only looks at the event.
    pub fn on_event<F>(predicate: F) -> Self
    where
        S: 'static,
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self::new(move |_state: &S, event: &Event| predicate(event))
    }

    pub fn check(&self, state: &S, event: &Event) -> bool {
        (self.predicate)(state, event)
    }
}
