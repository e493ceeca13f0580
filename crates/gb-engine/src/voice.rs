//! Voice: a single self-terminating synthesized sound event.
//!
//! A voice is a source (oscillator or noise) run through an optional filter
//! and shaped by an amplitude envelope. The voice ends when its amplitude
//! envelope ends; callers never have to clean one up. Pitch and filter
//! cutoff can carry their own envelopes (kick drop, lead pluck sweep).

use crate::dsp::{Biquad, FilterMode, Noise, Oscillator, Waveform};
use crate::envelope::{Envelope, EnvelopeState};

/// Sound source for a voice.
#[derive(Clone, Debug)]
enum Source {
    Osc(Oscillator),
    Noise(Noise),
}

/// An envelope paired with its runtime state.
#[derive(Clone, Debug)]
struct Curve {
    envelope: Envelope,
    state: EnvelopeState,
}

impl Curve {
    fn new(envelope: Envelope) -> Self {
        let state = EnvelopeState::new(&envelope);
        Self { envelope, state }
    }
}

/// A single playing sound.
#[derive(Clone, Debug)]
pub struct Voice {
    source: Source,
    sample_rate: f32,
    /// Base frequency (Hz); ignored for noise sources.
    frequency: f32,
    /// Pitch curve overriding `frequency` when present.
    pitch: Option<Curve>,
    /// Amplitude curve; the voice terminates when it finishes.
    amp: Curve,
    filter: Option<Biquad>,
    /// Filter cutoff sweep, applied per sample while unfinished.
    cutoff_sweep: Option<Curve>,
    /// Samples of silence before the voice starts.
    delay: u32,
    finished: bool,
}

impl Voice {
    /// Oscillator voice at a fixed base frequency.
    pub fn osc(waveform: Waveform, frequency: f32, amp: Envelope, sample_rate: f32) -> Self {
        Self {
            source: Source::Osc(Oscillator::new(waveform)),
            sample_rate,
            frequency,
            pitch: None,
            amp: Curve::new(amp),
            filter: None,
            cutoff_sweep: None,
            delay: 0,
            finished: false,
        }
    }

    /// Noise voice.
    pub fn noise(amp: Envelope, sample_rate: f32) -> Self {
        Self {
            source: Source::Noise(Noise::new()),
            sample_rate,
            frequency: 0.0,
            pitch: None,
            amp: Curve::new(amp),
            filter: None,
            cutoff_sweep: None,
            delay: 0,
            finished: false,
        }
    }

    /// Route the source through a filter.
    pub fn with_filter(mut self, mode: FilterMode, cutoff: f32, q: f32) -> Self {
        self.filter = Some(Biquad::new(mode, cutoff, q, self.sample_rate));
        self
    }

    /// Drive the pitch from an envelope instead of the base frequency.
    pub fn with_pitch(mut self, envelope: Envelope) -> Self {
        self.pitch = Some(Curve::new(envelope));
        self
    }

    /// Sweep the filter cutoff with an envelope. Requires a filter.
    pub fn with_cutoff_sweep(mut self, envelope: Envelope) -> Self {
        self.cutoff_sweep = Some(Curve::new(envelope));
        self
    }

    /// Delay the onset by a number of samples.
    pub fn with_delay(mut self, samples: u32) -> Self {
        self.delay = samples;
        self
    }

    /// Whether the voice has decayed out and can be retired.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Render the next sample.
    pub fn next_sample(&mut self) -> f32 {
        if self.finished {
            return 0.0;
        }
        if self.delay > 0 {
            self.delay -= 1;
            return 0.0;
        }

        let frequency = match &mut self.pitch {
            Some(curve) => {
                let f = curve.state.value();
                curve.state.advance(&curve.envelope, 1);
                f
            }
            None => self.frequency,
        };

        let mut sample = match &mut self.source {
            Source::Osc(osc) => osc.next(frequency, self.sample_rate),
            Source::Noise(noise) => noise.next(),
        };

        if let Some(curve) = &mut self.cutoff_sweep {
            if !curve.state.is_finished() {
                if let Some(filter) = &mut self.filter {
                    filter.set_cutoff(curve.state.value(), self.sample_rate);
                }
                curve.state.advance(&curve.envelope, 1);
            }
        }
        if let Some(filter) = &mut self.filter {
            sample = filter.process(sample);
        }

        sample *= self.amp.state.value();
        self.amp.state.advance(&self.amp.envelope, 1);
        if self.amp.state.is_finished() {
            self.finished = true;
        }

        sample
    }
}
