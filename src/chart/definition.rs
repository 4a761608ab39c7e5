//! Machine definitions.
//!
//! A definition is an immutable tree of states. It deserializes from the
//! same JSON shape UI code writes machine literals in:
//!
//! ```json
//! {
//!   "initial": "Off",
//!   "states": {
//!     "Off": { "on": { "FLICK": "On" } },
//!     "On": {
//!       "on": { "FLICK": { "target": "Off", "actions": [{ "type": "log" }] } },
//!       "onEntry": { "type": "turnOn" }
//!     }
//!   }
//! }
//! ```

use crate::core::{Action, StatePath};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One transition: where to go, what to run, and under which guard.
///
/// A `None` target is a targetless transition: its actions run but the
/// configuration keeps its value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", deny_unknown_fields)]
pub struct TransitionDef<A: Action> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<A>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cond: Option<String>,
}

impl<A: Action> TransitionDef<A> {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            actions: Vec::new(),
            cond: None,
        }
    }

    /// A transition that runs actions without leaving the current state.
    pub fn targetless() -> Self {
        Self {
            target: None,
            actions: Vec::new(),
            cond: None,
        }
    }

    pub fn with_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    pub fn when(mut self, guard: impl Into<String>) -> Self {
        self.cond = Some(guard.into());
        self
    }
}

/// Transitions registered for one event, tried in order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound = "", transparent)]
pub struct Transitions<A: Action>(pub Vec<TransitionDef<A>>);

impl<A: Action> Transitions<A> {
    pub fn iter(&self) -> impl Iterator<Item = &TransitionDef<A>> {
        self.0.iter()
    }
}

#[derive(Deserialize)]
#[serde(bound = "", untagged)]
enum TransitionsRepr<A: Action> {
    Target(String),
    One(TransitionDef<A>),
    Many(Vec<TransitionDef<A>>),
}

impl<'de, A: Action> Deserialize<'de> for Transitions<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match TransitionsRepr::deserialize(deserializer)? {
            TransitionsRepr::Target(target) => Self(vec![TransitionDef::to(target)]),
            TransitionsRepr::One(def) => Self(vec![def]),
            TransitionsRepr::Many(defs) => Self(defs),
        })
    }
}

/// A state in the definition tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", rename_all = "camelCase", deny_unknown_fields)]
pub struct StateNode<A: Action> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub states: BTreeMap<String, StateNode<A>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub on: BTreeMap<String, Transitions<A>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub on_entry: Vec<A>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub on_exit: Vec<A>,
}

impl<A: Action> Default for StateNode<A> {
    fn default() -> Self {
        Self {
            initial: None,
            states: BTreeMap::new(),
            on: BTreeMap::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
        }
    }
}

impl<A: Action> StateNode<A> {
    pub fn is_atomic(&self) -> bool {
        self.states.is_empty()
    }
}

/// The root of a machine definition.
///
/// The root is never entered or exited, so it has no entry or exit
/// actions. Handlers in its `on` map apply in every state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineDefinition<A: Action> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(default)]
    pub states: BTreeMap<String, StateNode<A>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub on: BTreeMap<String, Transitions<A>>,
}

impl<A: Action> MachineDefinition<A> {
    /// Parse a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up the node at `path`. The root path has no node.
    pub fn node(&self, path: &StatePath) -> Option<&StateNode<A>> {
        let (first, rest) = path.keys().split_first()?;
        rest.iter()
            .try_fold(self.states.get(first)?, |node, key| node.states.get(key))
    }

    /// Children of the state at `path`, the root's states for the root.
    pub fn children(&self, path: &StatePath) -> Option<&BTreeMap<String, StateNode<A>>> {
        if path.is_root() {
            Some(&self.states)
        } else {
            self.node(path).map(|node| &node.states)
        }
    }

    /// Initial child key of the state at `path`.
    pub fn initial_of(&self, path: &StatePath) -> Option<&str> {
        if path.is_root() {
            self.initial.as_deref()
        } else {
            self.node(path).and_then(|node| node.initial.as_deref())
        }
    }

    /// Event handlers of the state at `path`.
    pub fn handlers(&self, path: &StatePath) -> Option<&BTreeMap<String, Transitions<A>>> {
        if path.is_root() {
            Some(&self.on)
        } else {
            self.node(path).map(|node| &node.on)
        }
    }

    /// Resolve a transition target written in the state at `source`.
    ///
    /// Plain targets are dotted paths among the source's siblings (the
    /// root's states when the source is the root). `#`-prefixed targets are
    /// dotted paths from the root. Returns `None` if no such state exists.
    pub fn resolve(&self, source: &StatePath, target: &str) -> Option<StatePath> {
        let resolved = match target.strip_prefix('#') {
            Some(absolute) => StatePath::parse(absolute),
            None => {
                let base = source.parent().unwrap_or_else(StatePath::root);
                StatePath::parse(target)
                    .keys()
                    .iter()
                    .fold(base, |path, key| path.child(key.as_str()))
            }
        };
        self.node(&resolved).map(|_| resolved)
    }

    /// Follow `initial` keys from `path` down to an atomic state.
    ///
    /// Returns `None` if a compound state on the way has no valid initial.
    pub fn complete(&self, path: &StatePath) -> Option<StatePath> {
        let mut current = path.clone();
        loop {
            let children = self.children(&current)?;
            if children.is_empty() {
                return Some(current);
            }
            let initial = self.initial_of(&current)?;
            if !children.contains_key(initial) {
                return None;
            }
            current = current.child(initial);
        }
    }

    /// Visit every state path in the tree, parents before children.
    pub fn paths(&self) -> Vec<StatePath> {
        fn walk<A: Action>(
            path: StatePath,
            states: &BTreeMap<String, StateNode<A>>,
            out: &mut Vec<StatePath>,
        ) {
            for (key, node) in states {
                let child = path.child(key.as_str());
                out.push(child.clone());
                walk(child, &node.states, out);
            }
        }

        let mut out = Vec::new();
        walk(StatePath::root(), &self.states, &mut out);
        out
    }
}

fn one_or_many<'de, D, A>(deserializer: D) -> Result<Vec<A>, D::Error>
where
    D: Deserializer<'de>,
    A: Action,
{
    #[derive(Deserialize)]
    #[serde(bound = "", untagged)]
    enum OneOrMany<A: Action> {
        One(A),
        Many(Vec<A>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(action) => vec![action],
        OneOrMany::Many(actions) => actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "camelCase")]
    enum TestAction {
        TurnOn,
        StartTimer { delay: u64 },
    }

    impl Action for TestAction {
        fn name(&self) -> &str {
            match self {
                Self::TurnOn => "turnOn",
                Self::StartTimer { .. } => "startTimer",
            }
        }
    }

    const SWITCH: &str = r#"{
        "id": "switch",
        "initial": "Off",
        "states": {
            "Off": {
                "initial": "A",
                "on": { "FLICK": "On" },
                "states": {
                    "A": {
                        "onEntry": { "type": "startTimer", "delay": 2000 },
                        "on": { "UNBLOCK": "B" }
                    },
                    "B": {}
                }
            },
            "On": {
                "onEntry": [{ "type": "turnOn" }],
                "on": {
                    "FLICK": [
                        { "target": "Off", "cond": "unblocked" },
                        { "actions": { "type": "turnOn" } }
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn parses_nested_definition() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();

        assert_eq!(def.id.as_deref(), Some("switch"));
        assert_eq!(def.initial.as_deref(), Some("Off"));

        let a = def.node(&StatePath::parse("Off.A")).unwrap();
        assert_eq!(a.on_entry, vec![TestAction::StartTimer { delay: 2000 }]);
        assert!(a.is_atomic());
    }

    #[test]
    fn bare_target_becomes_single_transition() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();
        let handlers = def.handlers(&StatePath::parse("Off")).unwrap();

        let flick: Vec<_> = handlers["FLICK"].iter().collect();
        assert_eq!(flick, vec![&TransitionDef::<TestAction>::to("On")]);
    }

    #[test]
    fn transition_lists_keep_order_and_guards() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();
        let on = def.node(&StatePath::parse("On")).unwrap();

        let flick: Vec<_> = on.on["FLICK"].iter().collect();
        assert_eq!(flick.len(), 2);
        assert_eq!(flick[0].cond.as_deref(), Some("unblocked"));
        assert_eq!(flick[1].target, None);
        assert_eq!(flick[1].actions, vec![TestAction::TurnOn]);
        assert_eq!(on.on_entry, vec![TestAction::TurnOn]);
    }

    #[test]
    fn lookups_at_root() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();
        let root = StatePath::root();

        assert!(def.node(&root).is_none());
        assert_eq!(def.initial_of(&root), Some("Off"));
        assert_eq!(def.children(&root).map(|c| c.len()), Some(2));
        assert!(def.node(&StatePath::parse("Off.Z")).is_none());
    }

    #[test]
    fn unknown_action_type_fails_to_parse() {
        let json = r#"{ "initial": "A", "states": { "A": { "onEntry": { "type": "explode" } } } }"#;
        assert!(MachineDefinition::<TestAction>::from_json(json).is_err());
    }

    #[test]
    fn definition_roundtrips_through_json() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();
        let json = serde_json::to_string(&def).unwrap();
        let back: MachineDefinition<TestAction> = MachineDefinition::from_json(&json).unwrap();
        assert_eq!(def, back);
    }

    #[test]
    fn resolve_targets_siblings_and_absolute_paths() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();
        let a = StatePath::parse("Off.A");

        assert_eq!(def.resolve(&a, "B"), Some(StatePath::parse("Off.B")));
        assert_eq!(def.resolve(&a, "A"), Some(a.clone()));
        assert_eq!(def.resolve(&StatePath::parse("Off"), "On"), Some(StatePath::parse("On")));
        assert_eq!(def.resolve(&a, "#On"), Some(StatePath::parse("On")));
        assert_eq!(def.resolve(&a, "On"), None);
        assert_eq!(def.resolve(&StatePath::root(), "Off.B"), Some(StatePath::parse("Off.B")));
    }

    #[test]
    fn complete_descends_through_initials() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();

        assert_eq!(def.complete(&StatePath::root()), Some(StatePath::parse("Off.A")));
        assert_eq!(def.complete(&StatePath::parse("Off")), Some(StatePath::parse("Off.A")));
        assert_eq!(def.complete(&StatePath::parse("On")), Some(StatePath::parse("On")));
    }

    #[test]
    fn paths_lists_parents_before_children() {
        let def: MachineDefinition<TestAction> = MachineDefinition::from_json(SWITCH).unwrap();
        let paths: Vec<String> = def.paths().iter().map(ToString::to_string).collect();

        assert_eq!(paths, vec!["Off", "Off.A", "Off.B", "On"]);
    }

    #[test]
    fn misspelled_state_keys_are_rejected() {
        let json = r#"{ "initial": "A", "states": { "A": { "onentry": [] } } }"#;
        assert!(MachineDefinition::<TestAction>::from_json(json).is_err());
    }
}
