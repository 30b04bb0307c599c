//! Real-time pacing of simulation steps
//!
//! Frames arrive at whatever rate the display runs. The clock banks their
//! elapsed time and spends it in steps whose length depends on the screen
//! and stage.

use super::state::GameState;
use super::tick::{TickInput, tick};
use crate::consts::MAX_STEPS_PER_FRAME;

/// Longest frame gap counted; stalls beyond this are dropped, not replayed
pub const MAX_FRAME_MS: f32 = 250.0;

/// Accumulates real time and runs the steps it pays for
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    accumulator_ms: f32,
}

impl StepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget banked time (after the tab was hidden, say)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }

    /// Banked time not yet spent on a step
    pub fn pending_ms(&self) -> f32 {
        self.accumulator_ms
    }

    /// Add `dt_ms` of real time and run every step it covers
    ///
    /// One-shot input (confirm, paddle presses) is consumed by the first
    /// step. Returns the number of steps run.
    pub fn advance(&mut self, state: &mut GameState, dt_ms: f32, input: &mut TickInput) -> u32 {
        self.accumulator_ms += dt_ms.clamp(0.0, MAX_FRAME_MS);

        let mut steps = 0;
        while steps < MAX_STEPS_PER_FRAME {
            let interval = state.step_interval_ms();
            if self.accumulator_ms < interval {
                break;
            }
            tick(state, input);
            self.accumulator_ms -= interval;
            steps += 1;

            // Clear one-shot inputs after processing
            input.confirm = false;
            input.paddle_moves.clear();
        }

        // Too far behind to catch up: drop the backlog
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator_ms = 0.0;
        }
        steps
    }
}
