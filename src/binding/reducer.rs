//! Reducer results and side effects.

use crate::binding::bag::Bag;
use crate::core::{Action, Event, ExtendedState};
use std::fmt;

/// Error a side effect (or a timer task) may fail with.
pub type EffectError = Box<dyn std::error::Error>;

/// A deferred callback, run once after the commit that produced it.
///
/// It receives the event that triggered the transition (the synthetic
/// init event for the initial actions run by mount).
pub struct SideEffect(Box<dyn FnOnce(&Event) -> Result<(), EffectError>>);

impl SideEffect {
    pub fn new<F>(effect: F) -> Self
    where
        F: FnOnce(&Event) -> Result<(), EffectError> + 'static,
    {
        Self(Box::new(effect))
    }

    pub fn run(self, event: &Event) -> Result<(), EffectError> {
        (self.0)(event)
    }
}

impl fmt::Debug for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SideEffect(..)")
    }
}

/// What a reducer returns for one action.
///
/// A side effect can only travel in the two variants that say so, and
/// patches are always applied before any side effect runs.
#[derive(Debug)]
pub enum ReducerResult<P> {
    /// No state change, no effect
    NoUpdate,

    /// Merge the patch, no effect
    Update(P),

    /// No state change, run the effect after the commit
    SideEffects(SideEffect),

    /// Merge the patch, then run the effect after the commit
    UpdateWithSideEffects(P, SideEffect),
}

impl<P> ReducerResult<P> {
    pub fn no_update() -> Self {
        Self::NoUpdate
    }

    pub fn update(patch: P) -> Self {
        Self::Update(patch)
    }

    pub fn side_effects<F>(effect: F) -> Self
    where
        F: FnOnce(&Event) -> Result<(), EffectError> + 'static,
    {
        Self::SideEffects(SideEffect::new(effect))
    }

    pub fn update_with_side_effects<F>(patch: P, effect: F) -> Self
    where
        F: FnOnce(&Event) -> Result<(), EffectError> + 'static,
    {
        Self::UpdateWithSideEffects(patch, SideEffect::new(effect))
    }

    pub fn patch(&self) -> Option<&P> {
        match self {
            Self::Update(patch) | Self::UpdateWithSideEffects(patch, _) => Some(patch),
            Self::NoUpdate | Self::SideEffects(_) => None,
        }
    }

    pub fn has_side_effect(&self) -> bool {
        matches!(self, Self::SideEffects(_) | Self::UpdateWithSideEffects(..))
    }

    /// Split into the optional patch and the optional side effect.
    pub fn into_parts(self) -> (Option<P>, Option<SideEffect>) {
        match self {
            Self::NoUpdate => (None, None),
            Self::Update(patch) => (Some(patch), None),
            Self::SideEffects(effect) => (None, Some(effect)),
            Self::UpdateWithSideEffects(patch, effect) => (Some(patch), Some(effect)),
        }
    }
}

/// Translates machine actions into extended-state patches and effects.
///
/// Reducers see the extended state as it was before the current commit
/// began, never the patches of earlier actions in the same batch. Actions
/// a reducer does not care about must yield [`ReducerResult::NoUpdate`].
///
/// Any `Fn(&Bag, &A, &Event) -> ReducerResult<S::Patch>` closure is a
/// reducer.
pub trait Reducer<S: ExtendedState, A: Action> {
    fn reduce(&self, bag: &Bag<'_, S, A>, action: &A, event: &Event) -> ReducerResult<S::Patch>;
}

impl<S, A, F> Reducer<S, A> for F
where
    S: ExtendedState,
    A: Action,
    F: Fn(&Bag<'_, S, A>, &A, &Event) -> ReducerResult<S::Patch>,
{
    fn reduce(&self, bag: &Bag<'_, S, A>, action: &A, event: &Event) -> ReducerResult<S::Patch> {
        self(bag, action, event)
    }
}
