//! One live timer per owner.

use crate::binding::EffectError;
use crate::schedule::timers::{TimerId, Timers};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct SlotState {
    live: Option<TimerId>,
    generation: u64,
}

/// Holds at most one pending timer.
///
/// Starting a timer cancels the one before it. Every start and cancel
/// bumps a generation counter, and a task only runs if the generation it
/// was started under is still current, so a superseded timer can never
/// fire late.
#[derive(Clone, Debug)]
pub struct TimerSlot {
    timers: Timers,
    state: Rc<RefCell<SlotState>>,
}

impl TimerSlot {
    pub fn new(timers: &Timers) -> Self {
        Self {
            timers: timers.clone(),
            state: Rc::new(RefCell::new(SlotState::default())),
        }
    }

    /// Replace the slot's timer with one that runs `task` after `delay`.
    pub fn start<F>(&self, delay: Duration, task: F) -> TimerId
    where
        F: FnOnce() -> Result<(), EffectError> + 'static,
    {
        self.cancel();

        let generation = self.state.borrow().generation;
        let state = Rc::clone(&self.state);
        let id = self.timers.schedule(delay, move || {
            {
                let mut slot = state.borrow_mut();
                if slot.generation != generation {
                    warn!(generation, current = slot.generation, "stale timer skipped");
                    return Ok(());
                }
                slot.live = None;
            }
            task()
        });

        debug!(timer = ?id, ?delay, generation, "slot timer started");
        self.state.borrow_mut().live = Some(id);
        id
    }

    /// Cancel the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let live = {
            let mut slot = self.state.borrow_mut();
            slot.generation += 1;
            slot.live.take()
        };
        match live {
            Some(id) => {
                debug!(timer = ?id, "slot timer cancelled");
                self.timers.cancel(id)
            }
            None => false,
        }
    }

    /// Whether a timer is waiting to fire.
    pub fn is_active(&self) -> bool {
        self.state.borrow().live.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }
}
