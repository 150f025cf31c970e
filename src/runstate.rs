//! The tri-state run controller (§4.6): OFF / STEP / TURBO, with an
//! interrupt-safe atomic so a SIGINT handler can decrement it from off the
//! main thread.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const OFF: u8 = 0;
const STEP: u8 = 1;
const TURBO: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Off,
    Step,
    Turbo,
}

impl RunState {
    fn from_u8(v: u8) -> Self {
        match v {
            OFF => RunState::Off,
            STEP => RunState::Step,
            _ => RunState::Turbo,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            RunState::Off => OFF,
            RunState::Step => STEP,
            RunState::Turbo => TURBO,
        }
    }
}

/// Shared run-state cell. Cheap to clone; every clone observes the same
/// underlying state. The main loop polls it at the top of the fetch loop and
/// before entering the debugger; a console-interrupt handler only ever
/// decrements it by one level.
#[derive(Clone)]
pub struct RunController {
    state: Arc<AtomicU8>,
}

impl RunController {
    pub fn new() -> Self {
        RunController {
            state: Arc::new(AtomicU8::new(STEP)),
        }
    }

    pub fn get(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn set(&self, state: RunState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Console-interrupt transition: TURBO -> STEP, STEP -> OFF, OFF unchanged.
    /// Safe to call from a signal handler: a single atomic fetch_update.
    pub fn interrupt(&self) -> RunState {
        let mut observed = RunState::Off;
        let _ = self
            .state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                let next = match RunState::from_u8(v) {
                    RunState::Turbo => STEP,
                    RunState::Step => OFF,
                    RunState::Off => OFF,
                };
                observed = RunState::from_u8(next);
                Some(next)
            });
        observed
    }
}

impl Default for RunController {
    fn default() -> Self {
        Self::new()
    }
}
