//! Main render engine.
//!
//! Owns the sequencer, the ambient bus, and two voice pools: ambient
//! voices (the loop, routed through the bus gain) and effect voices
//! (one-shot cues, routed straight to the output so they are never
//! ducked). `render_frame()` is the single entry point the audio thread
//! pulls; everything else just mutates state and returns immediately.

use heapless::Vec;

use crate::bus::AmbientBus;
use crate::frame::Frame;
use crate::patterns::{self, HatTier};
use crate::sequencer::Sequencer;
use crate::tone;
use crate::voice::Voice;

/// Upper bound on simultaneously ringing loop voices. At most five spawn
/// per step and the longest (kick) rings for under five steps.
const MAX_AMBIENT_VOICES: usize = 32;

/// Effect voices: a chime is three partials; a few may overlap.
const MAX_EFFECT_VOICES: usize = 12;

/// One-shot effect cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Success,
    Failure,
    Impact,
}

impl EffectKind {
    /// How long the effect suppresses the ambient loop.
    pub fn duck_seconds(self) -> f32 {
        match self {
            EffectKind::Success => 1.5,
            EffectKind::Failure => 0.5,
            EffectKind::Impact => 0.3,
        }
    }
}

/// The main render engine.
pub struct Engine {
    sample_rate: u32,
    sequencer: Sequencer,
    bus: AmbientBus,
    ambient_voices: Vec<Voice, MAX_AMBIENT_VOICES>,
    effect_voices: Vec<Voice, MAX_EFFECT_VOICES>,
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            sequencer: Sequencer::new(sample_rate),
            bus: AmbientBus::new(sample_rate),
            ambient_voices: Vec::new(),
            effect_voices: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Begin the ambient loop. A no-op while already running; otherwise
    /// the bus opens at the nominal level and the loop starts from step 0.
    pub fn start_ambient(&mut self) {
        if self.sequencer.is_running() {
            return;
        }
        self.bus.open();
        self.sequencer.start();
    }

    /// Halt the loop and release everything it owns. Pending steps never
    /// fire and ringing loop voices are cut (the bus is already silent, so
    /// dropping them cannot click). Safe to call when not running.
    pub fn stop_ambient(&mut self) {
        self.sequencer.stop();
        self.bus.close();
        self.ambient_voices.clear();
    }

    pub fn is_ambient_running(&self) -> bool {
        self.sequencer.is_running()
    }

    /// Current loop position. Only meaningful while the loop runs.
    pub fn position(&self) -> u32 {
        self.sequencer.position()
    }

    /// Current ambient bus gain (for observability and tests).
    pub fn ambient_gain(&self) -> f32 {
        self.bus.gain()
    }

    /// Fire a one-shot cue. Ducks the ambient loop for the cue's fixed
    /// duration (when it is running) and synthesizes the cue directly to
    /// the output, bypassing the bus.
    pub fn play_effect(&mut self, kind: EffectKind) {
        let duration = (kind.duck_seconds() * self.sample_rate as f32) as u32;
        self.bus.duck(duration);

        let sr = self.sample_rate as f32;
        match kind {
            EffectKind::Success => {
                for partial in tone::chime(sr) {
                    self.spawn_effect(partial);
                }
            }
            EffectKind::Failure => self.spawn_effect(tone::bonk(sr)),
            EffectKind::Impact => self.spawn_effect(tone::thud(sr)),
        }
    }

    /// Render one stereo frame.
    pub fn render_frame(&mut self) -> Frame {
        if let Some(step) = self.sequencer.tick(self.bus.is_ducked()) {
            self.trigger_step(step);
        }

        let gain = self.bus.tick();

        let mut ambient = 0.0;
        for voice in self.ambient_voices.iter_mut() {
            ambient += voice.next_sample();
        }
        self.ambient_voices.retain(|v| !v.is_finished());

        let mut effects = 0.0;
        for voice in self.effect_voices.iter_mut() {
            effects += voice.next_sample();
        }
        self.effect_voices.retain(|v| !v.is_finished());

        let mut frame = Frame::mono(ambient);
        frame.scale(gain);
        frame.mix(Frame::mono(effects));
        frame
    }

    /// Spawn every sound that fires at this loop position, in fixed order
    /// (kick, snare, hat, bass, lead) with a shared onset.
    fn trigger_step(&mut self, step: u32) {
        let sr = self.sample_rate as f32;
        let t = patterns::triggers_at(step);

        if t.kick {
            self.spawn_ambient(tone::kick(sr));
        }
        if t.snare {
            self.spawn_ambient(tone::snare(sr));
        }
        if let Some(tier) = t.hat {
            self.spawn_ambient(tone::hat(sr, tier == HatTier::Accented));
        }
        self.spawn_ambient(tone::bass(sr, t.bass.frequency, t.bass.sidechained));
        if let Some(freq) = t.lead {
            self.spawn_ambient(tone::lead(sr, freq));
        }
    }

    fn spawn_ambient(&mut self, voice: Voice) {
        if self.ambient_voices.is_full() {
            // Steal the oldest voice; it is the closest to silent.
            self.ambient_voices.remove(0);
        }
        let _ = self.ambient_voices.push(voice);
    }

    fn spawn_effect(&mut self, voice: Voice) {
        if self.effect_voices.is_full() {
            self.effect_voices.remove(0);
        }
        let _ = self.effect_voices.push(voice);
    }
}
