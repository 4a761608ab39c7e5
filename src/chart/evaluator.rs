//! Hierarchical machine evaluation.

use crate::chart::definition::{MachineDefinition, TransitionDef};
use crate::chart::error::DefinitionError;
use crate::chart::validate;
use crate::core::{Action, Configuration, Event, Guard, StatePath};
use std::collections::HashMap;
use std::fmt;

/// Computes configurations from a machine definition.
///
/// Both operations are pure and deterministic. `next_configuration` must
/// accept any event: when the current configuration has no transition for
/// it, the result is [`Configuration::unchanged`] rather than an error.
pub trait Evaluator<S> {
    type Action: Action;

    /// The configuration a fresh machine starts in, with the entry actions
    /// of every initially entered state pending.
    fn initial_configuration(&self) -> Configuration<Self::Action>;

    /// The configuration after `event`, given the extended state guards
    /// may consult.
    fn next_configuration(
        &self,
        current: &Configuration<Self::Action>,
        event: &Event,
        extended: &S,
    ) -> Configuration<Self::Action>;
}

/// Default evaluator for nested (non-parallel) state definitions.
///
/// Events are offered to the active states from the innermost outwards;
/// the first state with a matching transition whose guard passes handles
/// the event. Targeted transitions are external: states below the common
/// ancestor of source and target are exited (innermost first) and the
/// target branch is entered (outermost first). Actions are ordered exit
/// actions, then transition actions, then entry actions.
///
/// # Example
///
/// ```rust
/// use statebind::chart::{Evaluator, MachineDefinition, Statechart};
/// use statebind::core::{Action, Event};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// #[serde(tag = "type", rename_all = "camelCase")]
/// enum Lamp {
///     TurnOn,
/// }
///
/// impl Action for Lamp {
///     fn name(&self) -> &str {
///         "turnOn"
///     }
/// }
///
/// let def = MachineDefinition::from_json(
///     r#"{
///         "initial": "Off",
///         "states": {
///             "Off": { "on": { "FLICK": "On" } },
///             "On": { "onEntry": { "type": "turnOn" } }
///         }
///     }"#,
/// )
/// .unwrap();
///
/// let chart: Statechart<Lamp, ()> = Statechart::new(def).unwrap();
/// let start = chart.initial_configuration();
/// let next = chart.next_configuration(&start, &Event::new("FLICK"), &());
///
/// assert_eq!(next.to_string(), "On");
/// assert_eq!(next.actions(), &[Lamp::TurnOn]);
/// ```
pub struct Statechart<A: Action, S> {
    definition: MachineDefinition<A>,
    guards: HashMap<String, Guard<S>>,
}

impl<A: Action, S> Statechart<A, S> {
    /// Build an evaluator for a definition that uses no guards.
    pub fn new(definition: MachineDefinition<A>) -> Result<Self, DefinitionError> {
        Self::with_guards(definition, HashMap::new())
    }

    /// Build an evaluator with named guards for `cond` references.
    ///
    /// The definition is validated up front; every problem is reported.
    pub fn with_guards(
        definition: MachineDefinition<A>,
        guards: HashMap<String, Guard<S>>,
    ) -> Result<Self, DefinitionError> {
        let found = validate::issues(validate::validate(&definition, &|name: &str| {
            guards.contains_key(name)
        }));
        if !found.is_empty() {
            return Err(DefinitionError::Invalid(found));
        }
        Ok(Self { definition, guards })
    }

    /// Parse and validate a JSON definition.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Self::new(MachineDefinition::from_json(json)?)
    }

    pub fn definition(&self) -> &MachineDefinition<A> {
        &self.definition
    }

    fn passes(&self, transition: &TransitionDef<A>, event: &Event, extended: &S) -> bool {
        transition.cond.as_ref().map_or(true, |name| {
            self.guards
                .get(name)
                .is_some_and(|guard| guard.check(extended, event))
        })
    }

    /// Find the innermost active state handling `event`.
    fn select(
        &self,
        active: &StatePath,
        event: &Event,
        extended: &S,
    ) -> Option<(StatePath, &TransitionDef<A>)> {
        (0..=active.depth()).rev().find_map(|depth| {
            let source = active.prefix(depth);
            let transitions = self.definition.handlers(&source)?.get(event.name())?;
            transitions
                .iter()
                .find(|t| self.passes(t, event, extended))
                .map(|t| (source, t))
        })
    }

    fn exit_actions(&self, active: &StatePath, domain: usize, actions: &mut Vec<A>) {
        for depth in (domain + 1..=active.depth()).rev() {
            if let Some(node) = self.definition.node(&active.prefix(depth)) {
                actions.extend(node.on_exit.iter().cloned());
            }
        }
    }

    fn entry_actions(&self, target: &StatePath, domain: usize, actions: &mut Vec<A>) {
        for depth in domain + 1..=target.depth() {
            if let Some(node) = self.definition.node(&target.prefix(depth)) {
                actions.extend(node.on_entry.iter().cloned());
            }
        }
    }
}

impl<A: Action, S> Evaluator<S> for Statechart<A, S> {
    type Action = A;

    fn initial_configuration(&self) -> Configuration<A> {
        let value = self
            .definition
            .complete(&StatePath::root())
            .unwrap_or_default();
        let mut actions = Vec::new();
        self.entry_actions(&value, 0, &mut actions);
        Configuration::transitioned(value, actions)
    }

    fn next_configuration(
        &self,
        current: &Configuration<A>,
        event: &Event,
        extended: &S,
    ) -> Configuration<A> {
        let active = current.value();
        let Some((source, transition)) = self.select(active, event, extended) else {
            return Configuration::unchanged(active.clone());
        };

        let Some(target) = &transition.target else {
            return Configuration::transitioned(active.clone(), transition.actions.clone());
        };

        let resolved = self
            .definition
            .resolve(&source, target)
            .and_then(|path| self.definition.complete(&path));
        let Some(next) = resolved else {
            // Unreachable for validated definitions.
            return Configuration::unchanged(active.clone());
        };

        // Proper common ancestor of source and target: self-targets re-enter.
        let domain = source
            .common_depth(&next)
            .min(source.depth().saturating_sub(1))
            .min(next.depth().saturating_sub(1));

        let mut actions = Vec::new();
        self.exit_actions(active, domain, &mut actions);
        actions.extend(transition.actions.iter().cloned());
        self.entry_actions(&next, domain, &mut actions);

        Configuration::transitioned(next, actions)
    }
}

impl<A: Action, S> fmt::Debug for Statechart<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut guards: Vec<&String> = self.guards.keys().collect();
        guards.sort();
        f.debug_struct("Statechart")
            .field("definition", &self.definition)
            .field("guards", &guards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::error::DefinitionIssue;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "camelCase")]
    enum Act {
        EnterA,
        ExitA,
        EnterOn,
        ExitOn,
        EnterInner,
        ExitInner,
        Log,
    }

    impl Action for Act {
        fn name(&self) -> &str {
            match self {
                Self::EnterA => "enterA",
                Self::ExitA => "exitA",
                Self::EnterOn => "enterOn",
                Self::ExitOn => "exitOn",
                Self::EnterInner => "enterInner",
                Self::ExitInner => "exitInner",
                Self::Log => "log",
            }
        }
    }

    const CHART: &str = r##"{
        "initial": "Off",
        "on": { "RESET": "Off" },
        "states": {
            "Off": {
                "initial": "A",
                "on": { "FLICK": "On" },
                "states": {
                    "A": {
                        "onEntry": { "type": "enterA" },
                        "onExit": { "type": "exitA" },
                        "on": { "FLICK": "A", "UNBLOCK": "B" }
                    },
                    "B": {}
                }
            },
            "On": {
                "initial": "Inner",
                "onEntry": { "type": "enterOn" },
                "onExit": { "type": "exitOn" },
                "on": {
                    "FLICK": { "target": "Off", "actions": { "type": "log" } },
                    "PING": { "actions": [{ "type": "log" }] },
                    "GUARDED": [
                        { "target": "#Off.B", "cond": "allowed" },
                        { "actions": { "type": "log" } }
                    ]
                },
                "states": {
                    "Inner": {
                        "onEntry": { "type": "enterInner" },
                        "onExit": { "type": "exitInner" }
                    }
                }
            }
        }
    }"##;

    fn chart() -> Statechart<Act, bool> {
        let mut guards = HashMap::new();
        guards.insert(
            "allowed".to_string(),
            Guard::new(|allowed: &bool, _e: &Event| *allowed),
        );
        Statechart::with_guards(MachineDefinition::from_json(CHART).unwrap(), guards).unwrap()
    }

    fn at(path: &str) -> Configuration<Act> {
        Configuration::unchanged(StatePath::parse(path))
    }

    #[test]
    fn initial_configuration_enters_initial_branch() {
        let config = chart().initial_configuration();

        assert_eq!(config.value(), &StatePath::parse("Off.A"));
        assert_eq!(config.actions(), &[Act::EnterA]);
        assert!(config.changed());
    }

    #[test]
    fn innermost_handler_wins() {
        let next = chart().next_configuration(&at("Off.A"), &Event::new("FLICK"), &false);

        // A handles FLICK itself: exit and re-enter A.
        assert_eq!(next.value(), &StatePath::parse("Off.A"));
        assert_eq!(next.actions(), &[Act::ExitA, Act::EnterA]);
    }

    #[test]
    fn event_bubbles_to_ancestor() {
        let next = chart().next_configuration(&at("Off.B"), &Event::new("FLICK"), &false);

        assert_eq!(next.value(), &StatePath::parse("On.Inner"));
        assert_eq!(next.actions(), &[Act::EnterOn, Act::EnterInner]);
    }

    #[test]
    fn actions_order_exit_transition_entry() {
        let next = chart().next_configuration(&at("On.Inner"), &Event::new("FLICK"), &false);

        assert_eq!(next.value(), &StatePath::parse("Off.A"));
        assert_eq!(
            next.actions(),
            &[Act::ExitInner, Act::ExitOn, Act::Log, Act::EnterA]
        );
    }

    #[test]
    fn sibling_transition_exits_only_the_source() {
        let next = chart().next_configuration(&at("Off.A"), &Event::new("UNBLOCK"), &false);

        assert_eq!(next.value(), &StatePath::parse("Off.B"));
        assert_eq!(next.actions(), &[Act::ExitA]);
    }

    #[test]
    fn unknown_event_leaves_configuration_unchanged() {
        let current = at("Off.B");
        let next = chart().next_configuration(&current, &Event::new("UNBLOCK"), &false);

        assert!(!next.changed());
        assert_eq!(next.value(), current.value());
        assert!(next.actions().is_empty());
    }

    #[test]
    fn targetless_transition_runs_actions_in_place() {
        let next = chart().next_configuration(&at("On.Inner"), &Event::new("PING"), &false);

        assert!(next.changed());
        assert_eq!(next.value(), &StatePath::parse("On.Inner"));
        assert_eq!(next.actions(), &[Act::Log]);
    }

    #[test]
    fn guards_select_between_candidates() {
        let chart = chart();
        let blocked = chart.next_configuration(&at("On.Inner"), &Event::new("GUARDED"), &false);
        assert_eq!(blocked.value(), &StatePath::parse("On.Inner"));
        assert_eq!(blocked.actions(), &[Act::Log]);

        let allowed = chart.next_configuration(&at("On.Inner"), &Event::new("GUARDED"), &true);
        assert_eq!(allowed.value(), &StatePath::parse("Off.B"));
        assert_eq!(allowed.actions(), &[Act::ExitInner, Act::ExitOn]);
    }

    #[test]
    fn root_handlers_apply_everywhere() {
        let next = chart().next_configuration(&at("On.Inner"), &Event::new("RESET"), &false);

        assert_eq!(next.value(), &StatePath::parse("Off.A"));
        assert_eq!(next.actions(), &[Act::ExitInner, Act::ExitOn, Act::EnterA]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let chart = chart();
        let current = at("Off.A");
        let event = Event::new("FLICK");

        assert_eq!(
            chart.next_configuration(&current, &event, &false),
            chart.next_configuration(&current, &event, &false)
        );
    }

    #[test]
    fn missing_guard_is_rejected() {
        let def = MachineDefinition::<Act>::from_json(CHART).unwrap();
        let result: Result<Statechart<Act, bool>, _> = Statechart::new(def);

        match result {
            Err(DefinitionError::Invalid(issues)) => {
                assert_eq!(
                    issues,
                    vec![DefinitionIssue::UnknownGuard {
                        state: "On".to_string(),
                        event: "GUARDED".to_string(),
                        guard: "allowed".to_string(),
                    }]
                );
            }
            other => panic!("expected invalid definition, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result: Result<Statechart<Act, ()>, _> = Statechart::from_json("{ not json");
        assert!(matches!(result, Err(DefinitionError::Parse(_))));
    }
}
