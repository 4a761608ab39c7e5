//! Light Switch
//!
//! This example drives the on/off statechart with a blocking timer,
//! headlessly, printing one line per render.
//!
//! Key concepts:
//! - Nested states loaded from JSON (`demos/light_switch.json`)
//! - Entry actions that start a timer, exit actions that cancel it
//! - Timer tasks sending events back into the binding
//! - A virtual clock advanced by hand instead of wall time
//!
//! Run with: cargo run --example light_switch
//! Set `RUST_LOG=statebind=debug` to see every commit.

use statebind::{
    action_enum, extended_state, Bag, Binding, ReducerResult, Statechart, TimerSlot, Timers,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

action_enum! {
    enum LightAction {
        StartUnblockTimer { delay: u64 } => "startUnblockTimer",
        CancelUnblockTimer => "cancelUnblockTimer",
        TurnOn => "turnOn",
        TurnOff => "turnOff",
    }
}

extended_state! {
    struct Light {
        on: bool,
        blocked: bool,
    }
    patch: LightPatch
}

fn render(bag: &Bag<'_, Light, LightAction>) {
    let label = if bag.state.blocked {
        "[BLOCKED]"
    } else {
        ""
    };
    println!(
        "{:<10} {:<9} switch is {}",
        bag.machine.to_string(),
        label,
        if bag.state.on { "on" } else { "off" }
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Light Switch Example ===\n");

    let timers = Timers::new();
    let unblock = TimerSlot::new(&timers);

    let chart = Statechart::from_json(include_str!("light_switch.json"))?;
    let switch = Binding::builder(chart)
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
                let delay = Duration::from_millis(*delay);
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
        .render(render)
        .build()?;

    println!("Mounting:");
    switch.mount()?;

    println!("\nFlicking while blocked restarts the timer:");
    timers.advance(Duration::from_millis(1500))?;
    switch.transition("FLICK")?;

    println!("\nWaiting for the unblock timer:");
    timers.advance(Duration::from_millis(2000))?;

    println!("\nFlicking on:");
    switch.transition("FLICK")?;
    timers.advance(Duration::from_millis(500))?;

    println!("\nWaiting out the second timer:");
    timers.advance(Duration::from_millis(500))?;

    println!("\nFlicking off:");
    switch.transition("FLICK")?;

    let history = switch.history();
    let path: Vec<String> = history.get_path().iter().map(|p| p.to_string()).collect();
    println!("\nPath: {}", path.join(" -> "));
    println!("Commits: {}", switch.revision());
    if let Some(last) = history.last() {
        println!("Last commit ran: {}", last.actions.join(", "));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
