//! Machines shared by the integration tests.
//!
//! The definitions are the same JSON files the demos load.

#![allow(dead_code)]

use statebind::{
    action_enum, extended_state, Binding, Event, ReducerResult, Statechart, TimerSlot, Timers,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub const LIGHT_SWITCH: &str = include_str!("../../demos/light_switch.json");
pub const SELECT: &str = include_str!("../../demos/select.json");

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

action_enum! {
    pub enum LightAction {
        StartUnblockTimer { delay: u64 } => "startUnblockTimer",
        CancelUnblockTimer => "cancelUnblockTimer",
        TurnOn => "turnOn",
        TurnOff => "turnOff",
    }
}

extended_state! {
    pub struct Light {
        pub on: bool,
        pub blocked: bool,
    }
    patch: LightPatch
}

pub type LightSwitch = Binding<Statechart<LightAction, Light>, Light>;

/// Build (but do not mount) the light switch, with its unblock timer on
/// `timers`.
pub fn light_switch(timers: &Timers) -> LightSwitch {
    let unblock = TimerSlot::new(timers);

    Binding::builder(Statechart::from_json(LIGHT_SWITCH).unwrap())
        .initial_state(Light {
            on: false,
            blocked: false,
        })
        .reducer(move |bag, action: &LightAction, _event| match action {
            LightAction::TurnOn => ReducerResult::update(LightPatch::new().on(true)),
            LightAction::TurnOff => ReducerResult::update(LightPatch::new().on(false)),
            LightAction::StartUnblockTimer { delay } => {
                let slot = unblock.clone();
                let transition = bag.transition.clone();
                let delay = ms(*delay);
                ReducerResult::update_with_side_effects(LightPatch::new().blocked(true), move |_| {
                    slot.start(delay, move || {
                        transition.send("UNBLOCK")?;
                        Ok(())
                    });
                    Ok(())
                })
            }
            LightAction::CancelUnblockTimer => {
                let slot = unblock.clone();
                ReducerResult::update_with_side_effects(LightPatch::new().blocked(false), move |_| {
                    slot.cancel();
                    Ok(())
                })
            }
        })
        .build()
        .unwrap()
}

action_enum! {
    pub enum SelectAction {
        OpenDropdown => "openDropdown",
        CloseDropdown => "closeDropdown",
        ClearFilters => "clearFilters",
        ClearOption => "clearOption",
        FilterOptions => "filterOptions",
        SelectOption => "selectOption",
        DisplayEdit => "displayEdit",
        DisplayView => "displayView",
    }
}

extended_state! {
    pub struct Dropdown {
        pub is_open: bool,
        pub query: String,
        pub option: Option<String>,
    }
    patch: DropdownPatch
}

impl Dropdown {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            query: String::new(),
            option: None,
        }
    }
}

/// Counts focus requests in place of a real input element.
#[derive(Clone, Default)]
pub struct FocusHandle {
    focused: Rc<Cell<u32>>,
}

impl FocusHandle {
    pub fn focus(&self) {
        self.focused.set(self.focused.get() + 1);
    }

    pub fn count(&self) -> u32 {
        self.focused.get()
    }
}

pub type Select = Binding<Statechart<SelectAction, Dropdown>, Dropdown>;

/// Build (but do not mount) the select, refocusing through `input`.
pub fn select(input: &FocusHandle) -> Select {
    let input = input.clone();

    Binding::builder(Statechart::from_json(SELECT).unwrap())
        .initial_state(Dropdown::closed())
        .reducer(move |_bag, action: &SelectAction, event: &Event| match action {
            SelectAction::OpenDropdown => ReducerResult::update(DropdownPatch::new().is_open(true)),
            SelectAction::CloseDropdown => {
                ReducerResult::update(DropdownPatch::new().is_open(false))
            }
            SelectAction::ClearFilters => ReducerResult::update(DropdownPatch::new().query("")),
            SelectAction::FilterOptions => ReducerResult::update(
                DropdownPatch::new().query(event.get_str("query").unwrap_or_default()),
            ),
            SelectAction::SelectOption => ReducerResult::update(
                DropdownPatch::new().option(event.get_str("option").map(String::from)),
            ),
            SelectAction::ClearOption => {
                let input = input.clone();
                ReducerResult::update_with_side_effects(
                    DropdownPatch::new().option(None::<String>),
                    move |_| {
                        input.focus();
                        Ok(())
                    },
                )
            }
            _ => ReducerResult::no_update(),
        })
        .build()
        .unwrap()
}

/// Names of the actions run by the latest commit.
pub fn last_actions<E, S>(binding: &Binding<E, S>) -> Vec<String>
where
    E: statebind::Evaluator<S> + 'static,
    S: statebind::ExtendedState + 'static,
{
    binding
        .history()
        .last()
        .map(|record| record.actions.clone())
        .unwrap_or_default()
}
