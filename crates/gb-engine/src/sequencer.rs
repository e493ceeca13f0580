//! Sample-counted step sequencer.
//!
//! Drives the 64-step loop at a fixed sixteenth-note rate. The caller's
//! render loop is the clock: `tick()` is invoked once per rendered frame
//! and reports when a step boundary is crossed. This keeps the sequencer
//! free of timers and wall-clock time, so timing properties are testable
//! by just pulling frames.

use crate::patterns::LOOP_STEPS;

/// Reference tempo of the loop, sixteenth notes per step.
pub const TEMPO_BPM: u32 = 143;

/// A step sequencer in one of two states: stopped, or running at a
/// position in [0, LOOP_STEPS).
#[derive(Clone, Debug)]
pub struct Sequencer {
    samples_per_step: u32,
    /// Samples elapsed within the current step.
    sample_counter: u32,
    position: u32,
    running: bool,
}

impl Sequencer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            // sixteenth note: 60s / BPM / 4
            samples_per_step: sample_rate * 15 / TEMPO_BPM,
            sample_counter: 0,
            position: 0,
            running: false,
        }
    }

    /// Start (or restart) from position 0. Restarting while running resets
    /// cleanly; there is never more than one logical run in flight.
    pub fn start(&mut self) {
        self.running = true;
        self.position = 0;
        self.sample_counter = 0;
    }

    /// Stop immediately. No further steps fire, even one that was about
    /// to be crossed.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current loop position. Only meaningful while running.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Samples per sixteenth-note step.
    pub fn samples_per_step(&self) -> u32 {
        self.samples_per_step
    }

    /// Advance by one rendered frame. Returns the step to trigger when a
    /// boundary is crossed. While `frozen` (a one-shot effect owns the
    /// mix) nothing fires and nothing advances: the beat resumes exactly
    /// where it left off rather than drifting underneath the effect.
    pub fn tick(&mut self, frozen: bool) -> Option<u32> {
        if !self.running || frozen {
            return None;
        }

        let fired = (self.sample_counter == 0).then_some(self.position);

        self.sample_counter += 1;
        if self.sample_counter >= self.samples_per_step {
            self.sample_counter = 0;
            self.position = (self.position + 1) % LOOP_STEPS;
        }

        fired
    }
}
