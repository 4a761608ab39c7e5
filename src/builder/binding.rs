//! Builder for constructing bindings.

use crate::binding::{Bag, Binding, Reducer, ReducerResult};
use crate::builder::error::BuildError;
use crate::chart::Evaluator;
use crate::core::{CommitHistory, Event, ExtendedState};

/// Commit records a binding keeps unless `history_capacity` says otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Builder for constructing bindings with a fluent API.
pub struct BindingBuilder<E, S>
where
    E: Evaluator<S> + 'static,
    S: ExtendedState + 'static,
{
    evaluator: E,
    initial_state: Option<S>,
    reducer: Option<Box<dyn Reducer<S, E::Action>>>,
    render: Option<Box<dyn Fn(&Bag<'_, S, E::Action>)>>,
    history_capacity: usize,
}

impl<E, S> BindingBuilder<E, S>
where
    E: Evaluator<S> + 'static,
    S: ExtendedState + 'static,
{
    /// Create a new builder around an evaluator.
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            initial_state: None,
            reducer: None,
            render: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Set the initial extended state (required).
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the reducer using a closure (required).
    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Bag<'_, S, E::Action>, &E::Action, &Event) -> ReducerResult<S::Patch> + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Set the reducer using any [`Reducer`] implementation (required).
    pub fn reducer_with<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, E::Action> + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Call `render` after mount and after every commit (optional).
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Bag<'_, S, E::Action>) + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    /// Keep only the most recent `capacity` commit records (optional,
    /// defaults to [`DEFAULT_HISTORY_CAPACITY`]).
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the binding.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Binding<E, S>, BuildError> {
        let initial_state = self.initial_state.ok_or(BuildError::MissingInitialState)?;
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;
        let history = CommitHistory::with_capacity(self.history_capacity);

        Ok(Binding::from_parts(
            self.evaluator,
            initial_state,
            reducer,
            self.render,
            history,
        ))
    }
}
