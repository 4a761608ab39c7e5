//! Machine configurations.
//!
//! A configuration is the evaluator's current position in a machine
//! definition: the active state at each nesting level, plus the ordered
//! actions the transition into it produced.

use super::action::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of active state keys from the outermost level inwards.
///
/// # Example
///
/// ```rust
/// use statebind::core::StatePath;
///
/// let path = StatePath::parse("On.D.E.G");
/// assert_eq!(path.depth(), 4);
/// assert_eq!(path.to_string(), "On.D.E.G");
/// assert!(path.starts_with(&StatePath::parse("On.D")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatePath(Vec<String>);

impl StatePath {
    /// The empty path, naming the machine root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path. Empty segments are ignored.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Innermost key, if any.
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// The first `depth` keys of this path.
    pub fn prefix(&self, depth: usize) -> Self {
        Self(self.0[..depth.min(self.0.len())].to_vec())
    }

    /// The enclosing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.prefix(self.0.len() - 1))
        }
    }

    pub fn starts_with(&self, other: &StatePath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Number of leading keys shared with `other`.
    pub fn common_depth(&self, other: &StatePath) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for StatePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The evaluator's position in a machine plus its pending actions.
///
/// Configurations are values: a transition produces a new one rather than
/// mutating the current one. `changed` is false when the evaluator found
/// no transition for an event, in which case `actions` is empty and
/// `value` is the previous value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Configuration<A: Action> {
    value: StatePath,
    actions: Vec<A>,
    changed: bool,
}

impl<A: Action> Configuration<A> {
    /// A configuration reached by a transition, carrying its actions.
    pub fn transitioned(value: StatePath, actions: Vec<A>) -> Self {
        Self {
            value,
            actions,
            changed: true,
        }
    }

    /// The configuration reported when an event has no transition.
    pub fn unchanged(value: StatePath) -> Self {
        Self {
            value,
            actions: Vec::new(),
            changed: false,
        }
    }

    pub fn value(&self) -> &StatePath {
        &self.value
    }

    /// Pending actions, in the order the evaluator produced them.
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Check whether the dotted `path` is active, e.g. `"Edit"` while in
    /// `Edit.Open`.
    pub fn matches(&self, path: &str) -> bool {
        self.value.starts_with(&StatePath::parse(path))
    }

    /// The same position with its actions consumed.
    pub fn consumed(&self) -> Self {
        Self {
            value: self.value.clone(),
            actions: Vec::new(),
            changed: self.changed,
        }
    }

    pub(crate) fn action_names(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.name().to_string()).collect()
    }
}

impl<A: Action> fmt::Display for Configuration<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
