//! Oscillator, noise, and filter primitives.
//!
//! These are the raw sources the tone constructors wire together. They are
//! deliberately minimal: phase-accumulator oscillators, a 17-bit LFSR noise
//! generator, and an RBJ biquad for the three filter shapes the instrument
//! set needs.

use core::f32::consts::TAU;

/// Oscillator waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Phase-accumulator oscillator. Frequency is supplied per sample so pitch
/// envelopes (kick drop, bonk slide) come for free.
#[derive(Clone, Debug)]
pub struct Oscillator {
    waveform: Waveform,
    /// Normalized phase in [0, 1).
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    /// Produce the next sample at the given frequency.
    pub fn next(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = match self.waveform {
            Waveform::Sine => libm::sinf(self.phase * TAU),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
        };

        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}

/// White-ish noise from a 17-bit LFSR (taps at bits 0 and 2), the classic
/// PSG feedback arrangement. Deterministic for a given seed, which keeps
/// rendered output reproducible in tests.
#[derive(Clone, Debug)]
pub struct Noise {
    lfsr: u32,
}

impl Noise {
    pub fn new() -> Self {
        Self::with_seed(1)
    }

    /// Seed must be non-zero or the register locks up.
    pub fn with_seed(seed: u32) -> Self {
        let seed = if seed == 0 { 1 } else { seed };
        Self { lfsr: seed & 0x1FFFF }
    }

    /// Next bipolar sample in [-1, 1].
    pub fn next(&mut self) -> f32 {
        let bit = ((self.lfsr & 1) ^ ((self.lfsr >> 2) & 1)) != 0;
        self.lfsr = (self.lfsr >> 1) | ((bit as u32) << 16);
        if self.lfsr & 1 != 0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

/// Biquad filter mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Lowpass,
    Highpass,
    Bandpass,
}

/// Direct-form-I biquad with RBJ cookbook coefficients.
#[derive(Clone, Debug)]
pub struct Biquad {
    mode: FilterMode,
    q: f32,
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new(mode: FilterMode, cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let mut f = Self {
            mode,
            q,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        f.set_cutoff(cutoff, sample_rate);
        f
    }

    /// Retune the filter, preserving its delay state (used by cutoff sweeps).
    pub fn set_cutoff(&mut self, cutoff: f32, sample_rate: f32) {
        // Keep the normalized frequency out of the unstable region near Nyquist.
        let cutoff = cutoff.clamp(1.0, sample_rate * 0.45);
        let w0 = TAU * cutoff / sample_rate;
        let cos_w0 = libm::cosf(w0);
        let alpha = libm::sinf(w0) / (2.0 * self.q);

        let (b0, b1, b2) = match self.mode {
            FilterMode::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterMode::Highpass => {
                let b1 = -(1.0 + cos_w0);
                (-b1 / 2.0, b1, -b1 / 2.0)
            }
            FilterMode::Bandpass => (alpha, 0.0, -alpha),
        };

        let a0 = 1.0 + alpha;
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    /// Process one sample.
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}
