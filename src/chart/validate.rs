//! Definition validation using Validation.
//!
//! Every structural check runs and every problem is reported, so a broken
//! definition is fixed in one pass instead of one error at a time.

use crate::chart::definition::MachineDefinition;
use crate::chart::error::DefinitionIssue;
use crate::core::{Action, StatePath};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<DefinitionIssue>>;

fn label(path: &StatePath) -> String {
    if path.is_root() {
        "(machine)".to_string()
    } else {
        path.to_string()
    }
}

fn check(ok: bool, issue: impl FnOnce() -> DefinitionIssue) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

/// Check the initial child of the state at `path`, if it is compound.
fn initial_checks<A: Action>(def: &MachineDefinition<A>, path: &StatePath) -> Vec<Check> {
    let Some(children) = def.children(path) else {
        return Vec::new();
    };
    if children.is_empty() {
        return Vec::new();
    }

    match def.initial_of(path) {
        None => vec![Validation::fail(DefinitionIssue::MissingInitial {
            state: label(path),
        })],
        Some(initial) => vec![check(children.contains_key(initial), || {
            DefinitionIssue::UnknownInitial {
                state: label(path),
                initial: initial.to_string(),
            }
        })],
    }
}

/// Check every transition declared in the state at `path`.
fn transition_checks<A: Action>(
    def: &MachineDefinition<A>,
    path: &StatePath,
    has_guard: &dyn Fn(&str) -> bool,
) -> Vec<Check> {
    let Some(handlers) = def.handlers(path) else {
        return Vec::new();
    };

    let mut checks = Vec::new();
    for (event, transitions) in handlers {
        for transition in transitions.iter() {
            if let Some(target) = &transition.target {
                checks.push(check(def.resolve(path, target).is_some(), || {
                    DefinitionIssue::UnknownTarget {
                        state: label(path),
                        event: event.clone(),
                        target: target.clone(),
                    }
                }));
            }
            if let Some(guard) = &transition.cond {
                checks.push(check(has_guard(guard), || DefinitionIssue::UnknownGuard {
                    state: label(path),
                    event: event.clone(),
                    guard: guard.clone(),
                }));
            }
        }
    }
    checks
}

/// Validate a definition, accumulating ALL issues.
///
/// `has_guard` reports whether a guard name is registered.
pub fn validate<A: Action>(
    def: &MachineDefinition<A>,
    has_guard: &dyn Fn(&str) -> bool,
) -> Validation<(), NonEmptyVec<DefinitionIssue>> {
    if def.states.is_empty() {
        return Validation::fail(DefinitionIssue::NoStates);
    }

    let root = StatePath::root();
    let mut checks = initial_checks(def, &root);
    checks.extend(transition_checks(def, &root, has_guard));

    for path in def.paths() {
        checks.extend(initial_checks(def, &path));
        checks.extend(transition_checks(def, &path, has_guard));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a failed validation into a list of issues.
pub fn issues(result: Validation<(), NonEmptyVec<DefinitionIssue>>) -> Vec<DefinitionIssue> {
    match result {
        Validation::Success(()) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
