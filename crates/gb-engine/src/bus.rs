//! Ambient bus gain and ducking control.
//!
//! The bus owns the single gain value all ambient sound passes through.
//! Gain moves toward its target with a one-pole smoother (the equivalent
//! of a `setTargetAtTime` ramp): fast when ducking under an effect, slow
//! when restoring, so neither transition clicks. A pending restore is a
//! sample-counted deadline; a new duck replaces it outright, so the final
//! state always reflects the most recent request.

/// Nominal ambient loop level.
pub const AMBIENT_LEVEL: f32 = 0.35;

/// Duck time constant: fast enough to cut the loop before an effect's
/// transient, slow enough not to click.
const DUCK_TAU_SECONDS: f32 = 0.015;

/// Restore time constant: a gentle re-entry after the effect.
const RESTORE_TAU_SECONDS: f32 = 0.5;

/// Gain-smoothing controller for the ambient bus.
#[derive(Clone, Debug)]
pub struct AmbientBus {
    sample_rate: f32,
    gain: f32,
    target: f32,
    /// Per-sample smoothing coefficient for the ramp in flight.
    coeff: f32,
    /// Samples until the pending restore fires.
    restore_in: Option<u32>,
    /// A one-shot effect currently owns the mix.
    effect_active: bool,
    open: bool,
}

impl AmbientBus {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            gain: 0.0,
            target: 0.0,
            coeff: 1.0,
            restore_in: None,
            effect_active: false,
            open: false,
        }
    }

    /// One-pole coefficient reaching ~63% of the remaining distance per
    /// time constant.
    fn coeff_for(&self, tau_seconds: f32) -> f32 {
        1.0 - libm::expf(-1.0 / (tau_seconds * self.sample_rate))
    }

    /// Open the bus at the nominal level (ambient loop starting).
    pub fn open(&mut self) {
        self.open = true;
        self.gain = AMBIENT_LEVEL;
        self.target = AMBIENT_LEVEL;
        self.restore_in = None;
        self.effect_active = false;
    }

    /// Close the bus (ambient loop stopping). Gain drops to silence and any
    /// pending restore is discarded so it cannot resurrect the loop.
    pub fn close(&mut self) {
        self.open = false;
        self.gain = 0.0;
        self.target = 0.0;
        self.restore_in = None;
        self.effect_active = false;
    }

    /// Whether an effect currently suppresses the bus.
    pub fn is_ducked(&self) -> bool {
        self.effect_active
    }

    /// Current gain value.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Suppress the bus for an effect lasting `duration_samples`. The flag
    /// is raised before the ramp is armed; a duck issued while another is
    /// resolving replaces its deadline (last call wins, using its own
    /// duration).
    pub fn duck(&mut self, duration_samples: u32) {
        if !self.open {
            return;
        }
        self.effect_active = true;
        self.target = 0.0;
        self.coeff = self.coeff_for(DUCK_TAU_SECONDS);
        self.restore_in = Some(duration_samples);
    }

    /// Advance one sample and return the gain to apply to this frame.
    pub fn tick(&mut self) -> f32 {
        if let Some(remaining) = self.restore_in {
            if remaining == 0 {
                // Deadline passed: hand the mix back, gently.
                self.restore_in = None;
                self.effect_active = false;
                if self.open {
                    self.target = AMBIENT_LEVEL;
                    self.coeff = self.coeff_for(RESTORE_TAU_SECONDS);
                }
            } else {
                self.restore_in = Some(remaining - 1);
            }
        }

        self.gain += (self.target - self.gain) * self.coeff;
        self.gain
    }
}
