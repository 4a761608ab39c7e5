//! The stateful binding: configuration + extended state + reducer.

use crate::binding::bag::{Bag, Dispatcher, StepResult};
use crate::binding::error::BindingError;
use crate::binding::reducer::{Reducer, SideEffect};
use crate::builder::BindingBuilder;
use crate::chart::Evaluator;
use crate::core::{
    Action, CommitHistory, CommitRecord, Configuration, Event, ExtendedState, Patch,
};
use chrono::Utc;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

pub(crate) type RenderFn<S, A> = Box<dyn Fn(&Bag<'_, S, A>)>;

/// Owned copy of a binding's committed state.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<S, A: Action> {
    pub configuration: Configuration<A>,
    pub state: S,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Unmounted,
    /// First render in progress; events are queued until the init commit.
    Mounting,
    Mounted,
}

struct Inner<S, A: Action> {
    configuration: Configuration<A>,
    state: S,
    phase: Phase,
    deferred: Vec<Event>,
    revision: u64,
    history: CommitHistory,
}

struct Shared<E, S>
where
    E: Evaluator<S>,
    S: ExtendedState,
{
    evaluator: E,
    reducer: Box<dyn Reducer<S, E::Action>>,
    render: Option<RenderFn<S, E::Action>>,
    dispatcher: Dispatcher,
    inner: RefCell<Inner<S, E::Action>>,
}

/// A component driven by a machine evaluator.
///
/// The binding owns the current configuration and extended state. Events
/// go through the evaluator; the actions of each transition are folded
/// through the reducer; the configuration and the merged extended state
/// are then committed together, the render callback sees the result, and
/// only then do the collected side effects run, in action order.
///
/// Bindings are single-threaded. Side effects and timer tasks may send
/// events back into the binding: no borrow is held while user code runs,
/// and each commit is visible before its effects start.
///
/// # Example
///
/// ```rust
/// use statebind::binding::{Binding, ReducerResult};
/// use statebind::chart::Statechart;
/// use statebind::core::Action;
/// use statebind::extended_state;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// #[serde(tag = "type", rename_all = "camelCase")]
/// enum LampAction {
///     TurnOn,
///     TurnOff,
/// }
///
/// impl Action for LampAction {
///     fn name(&self) -> &str {
///         match self {
///             Self::TurnOn => "turnOn",
///             Self::TurnOff => "turnOff",
///         }
///     }
/// }
///
/// extended_state! {
///     pub struct Lamp {
///         on: bool,
///     }
///     patch: LampPatch
/// }
///
/// let chart = Statechart::from_json(
///     r#"{
///         "initial": "Off",
///         "states": {
///             "Off": { "on": { "FLICK": "On" } },
///             "On": {
///                 "onEntry": { "type": "turnOn" },
///                 "onExit": { "type": "turnOff" },
///                 "on": { "FLICK": "Off" }
///             }
///         }
///     }"#,
/// )
/// .unwrap();
///
/// let lamp = Binding::builder(chart)
///     .initial_state(Lamp { on: false })
///     .reducer(|_bag, action: &LampAction, _event| match action {
///         LampAction::TurnOn => ReducerResult::update(LampPatch::new().on(true)),
///         LampAction::TurnOff => ReducerResult::update(LampPatch::new().on(false)),
///     })
///     .build()
///     .unwrap();
///
/// lamp.mount().unwrap();
/// lamp.transition("FLICK").unwrap();
///
/// assert!(lamp.state().on);
/// assert!(lamp.configuration().matches("On"));
/// ```
pub struct Binding<E, S>
where
    E: Evaluator<S> + 'static,
    S: ExtendedState + 'static,
{
    shared: Rc<Shared<E, S>>,
}

impl<E, S> Binding<E, S>
where
    E: Evaluator<S> + 'static,
    S: ExtendedState + 'static,
{
    /// Start building a binding around an evaluator.
    pub fn builder(evaluator: E) -> BindingBuilder<E, S> {
        BindingBuilder::new(evaluator)
    }

    /// Construct a binding. The initial configuration is computed now, but
    /// none of its actions run until [`mount`](Self::mount).
    pub(crate) fn from_parts(
        evaluator: E,
        initial_state: S,
        reducer: Box<dyn Reducer<S, E::Action>>,
        render: Option<RenderFn<S, E::Action>>,
        history: CommitHistory,
    ) -> Self {
        let configuration = evaluator.initial_configuration();
        let shared = Rc::new_cyclic(|weak: &Weak<Shared<E, S>>| {
            let weak = weak.clone();
            let dispatcher = Dispatcher::new(move |event| match weak.upgrade() {
                Some(shared) => shared.dispatch(event),
                None => Err(BindingError::Detached),
            });
            Shared {
                evaluator,
                reducer,
                render,
                dispatcher,
                inner: RefCell::new(Inner {
                    configuration,
                    state: initial_state,
                    phase: Phase::Unmounted,
                    deferred: Vec::new(),
                    revision: 0,
                    history,
                }),
            }
        });
        Self { shared }
    }

    /// Render the first bag, then commit the initial configuration's
    /// pending actions with the synthetic init event.
    ///
    /// Runs at most once; later calls fail with `AlreadyMounted`. Events
    /// sent from the first render are answered with
    /// [`StepResult::Deferred`] and dispatched, in order, once the init
    /// commit and its side effects are done.
    pub fn mount(&self) -> Result<(), BindingError> {
        self.shared.mount()
    }

    /// Send an event to the machine.
    ///
    /// Events with no transition in the current configuration are a
    /// no-op and return [`StepResult::Unchanged`].
    pub fn transition(&self, event: impl Into<Event>) -> Result<StepResult, BindingError> {
        self.shared.dispatch(event.into())
    }

    /// A handle that sends events to this binding.
    pub fn dispatcher(&self) -> Dispatcher {
        self.shared.dispatcher.clone()
    }

    /// Call `f` with the latest bag.
    ///
    /// The bag is built from a copy of the committed state, so `f` may
    /// send events.
    pub fn with_bag<T>(&self, f: impl FnOnce(&Bag<'_, S, E::Action>) -> T) -> T {
        let snapshot = self.snapshot();
        f(&Bag {
            transition: &self.shared.dispatcher,
            state: &snapshot.state,
            machine: &snapshot.configuration,
        })
    }

    /// Owned copy of the committed configuration and extended state.
    pub fn snapshot(&self) -> Snapshot<S, E::Action> {
        let inner = self.shared.inner.borrow();
        Snapshot {
            configuration: inner.configuration.clone(),
            state: inner.state.clone(),
        }
    }

    /// The committed configuration.
    pub fn configuration(&self) -> Configuration<E::Action> {
        self.shared.inner.borrow().configuration.clone()
    }

    /// The committed extended state.
    pub fn state(&self) -> S {
        self.shared.inner.borrow().state.clone()
    }

    /// Copy of the commit history, bounded by the builder's capacity.
    pub fn history(&self) -> CommitHistory {
        self.shared.inner.borrow().history.clone()
    }

    /// Number of commits so far.
    pub fn revision(&self) -> u64 {
        self.shared.inner.borrow().revision
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.inner.borrow().phase != Phase::Unmounted
    }
}

impl<E, S> Shared<E, S>
where
    E: Evaluator<S>,
    S: ExtendedState,
{
    fn mount(&self) -> Result<(), BindingError> {
        let (initial, state, revision) = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase != Phase::Unmounted {
                return Err(BindingError::AlreadyMounted);
            }
            inner.phase = Phase::Mounting;
            (
                inner.configuration.clone(),
                inner.state.clone(),
                inner.revision,
            )
        };

        self.render(&initial, &state);
        self.inner.borrow_mut().phase = Phase::Mounted;

        debug!(
            state = %initial,
            actions = initial.actions().len(),
            "mounting binding"
        );
        let mounted = self.commit(initial, Event::init(), state, revision);

        let deferred = std::mem::take(&mut self.inner.borrow_mut().deferred);
        let mut first_error = None;
        for event in deferred {
            if let Err(err) = self.dispatch(event) {
                first_error.get_or_insert(err);
            }
        }

        mounted?;
        first_error.map_or(Ok(()), Err)
    }

    fn dispatch(&self, event: Event) -> Result<StepResult, BindingError> {
        let (current, state, revision) = {
            let mut inner = self.inner.borrow_mut();
            match inner.phase {
                Phase::Unmounted => return Err(BindingError::NotMounted),
                Phase::Mounting => {
                    debug!(event = %event, "deferring event until mounted");
                    inner.deferred.push(event);
                    return Ok(StepResult::Deferred);
                }
                Phase::Mounted => {}
            }
            (
                inner.configuration.clone(),
                inner.state.clone(),
                inner.revision,
            )
        };

        let next = self.evaluator.next_configuration(&current, &event, &state);
        if !next.changed() {
            debug!(event = %event, state = %current, "no transition for event");
            return Ok(StepResult::Unchanged);
        }

        self.commit(next, event, state, revision)
    }

    /// Fold the reducer over `next`'s actions, commit, render, then run
    /// the collected side effects.
    fn commit(
        &self,
        next: Configuration<E::Action>,
        event: Event,
        before: S,
        revision: u64,
    ) -> Result<StepResult, BindingError> {
        let mut patch: Option<S::Patch> = None;
        let mut effects: Vec<(String, SideEffect)> = Vec::new();

        {
            let bag = Bag {
                transition: &self.dispatcher,
                state: &before,
                machine: &next,
            };
            for action in next.actions() {
                trace!(action = action.name(), event = %event, "reducing action");
                let (update, effect) = self.reducer.reduce(&bag, action, &event).into_parts();
                if let Some(update) = update {
                    patch = Some(match patch {
                        Some(merged) => merged.merge(update),
                        None => update,
                    });
                }
                if let Some(effect) = effect {
                    effects.push((action.name().to_string(), effect));
                }
            }
        }

        let mut state = before;
        if let Some(patch) = patch {
            state.apply(patch);
        }
        let committed = next.consumed();

        {
            let mut inner = self.inner.borrow_mut();
            if inner.revision != revision {
                return Err(BindingError::ReentrantReducer);
            }
            let record = CommitRecord {
                from: inner.configuration.value().clone(),
                to: committed.value().clone(),
                event: event.name().to_string(),
                actions: next.action_names(),
                timestamp: Utc::now(),
                revision: revision + 1,
            };
            debug!(
                event = %event,
                from = %record.from,
                to = %record.to,
                actions = record.actions.len(),
                effects = effects.len(),
                "committed transition"
            );
            inner.revision = revision + 1;
            inner.configuration = committed.clone();
            inner.state = state.clone();
            inner.history.push(record);
        }

        self.render(&committed, &state);

        for (action, effect) in effects {
            if let Err(source) = effect.run(&event) {
                warn!(action = %action, error = %source, "side effect failed");
                return Err(BindingError::SideEffect { action, source });
            }
        }

        Ok(StepResult::Transitioned(committed.value().clone()))
    }

    fn render(&self, configuration: &Configuration<E::Action>, state: &S) {
        if let Some(render) = &self.render {
            render(&Bag {
                transition: &self.dispatcher,
                state,
                machine: configuration,
            });
        }
    }
}
