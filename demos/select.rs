//! Select
//!
//! This example drives a filterable dropdown headlessly.
//!
//! Key concepts:
//! - Events carrying payloads (`FILTER` with a query, `SELECT` with an option)
//! - Self-transitions that exit and re-enter a compound state
//! - Several patches merged into one commit, later keys winning
//! - A focus handle owned by the UI layer and captured by a side effect
//!
//! Run with: cargo run --example select

use statebind::{action_enum, extended_state, Bag, Binding, Event, ReducerResult, Statechart};
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const OPTIONS: [&str; 8] = [
    "Apples",
    "Bananas",
    "Pears",
    "Oranges",
    "Kiwis",
    "Mangos",
    "Grapes",
    "Strawberries",
];

action_enum! {
    enum SelectAction {
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
    struct Dropdown {
        is_open: bool,
        query: String,
        option: Option<String>,
    }
    patch: DropdownPatch
}

/// Stands in for the input element a real UI would focus.
#[derive(Clone, Default)]
struct FocusHandle {
    focused: Rc<Cell<u32>>,
}

impl FocusHandle {
    fn focus(&self) {
        self.focused.set(self.focused.get() + 1);
        println!("  (input focused)");
    }
}

fn render(bag: &Bag<'_, Dropdown, SelectAction>) {
    let placeholder = bag.state.option.as_deref().unwrap_or("Type to search");
    println!(
        "{:<10} [{}] placeholder={:?}",
        bag.machine.to_string(),
        bag.state.query,
        placeholder
    );
    if bag.state.is_open {
        let query = bag.state.query.to_lowercase();
        for option in OPTIONS
            .iter()
            .filter(|option| option.to_lowercase().contains(&query))
        {
            let marker = if bag.state.option.as_deref() == Some(*option) {
                "*"
            } else {
                " "
            };
            println!("    {marker} {option}");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Select Example ===\n");

    let input = FocusHandle::default();
    let focus = input.clone();

    let chart = Statechart::from_json(include_str!("select.json"))?;
    let select = Binding::builder(chart)
        .initial_state(Dropdown {
            is_open: false,
            query: String::new(),
            option: None,
        })
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
                let focus = focus.clone();
                ReducerResult::update_with_side_effects(
                    DropdownPatch::new().option(None::<String>),
                    move |_| {
                        focus.focus();
                        Ok(())
                    },
                )
            }
            _ => ReducerResult::no_update(),
        })
        .render(render)
        .build()?;

    println!("Mounting:");
    select.mount()?;

    println!("\nFocusing the input:");
    select.transition("EDIT")?;

    println!("\nTyping 'ap':");
    select.transition(Event::new("FILTER").with("query", "ap"))?;

    println!("\nPicking an option:");
    select.transition(Event::new("SELECT").with("option", "Apples"))?;

    println!("\nClearing the selection:");
    select.transition("EDIT")?;
    select.transition("CLEAR")?;

    println!("\nEscape, then typing again while closed:");
    select.transition("CLOSE")?;
    select.transition(Event::new("FILTER").with("query", "an"))?;

    println!("\nInput focused {} time(s)", input.focused.get());
    println!("\n=== Example Complete ===");
    Ok(())
}
