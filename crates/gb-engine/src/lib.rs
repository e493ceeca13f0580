//! Procedural synthesis and sequencing core for gamebeat.
//!
//! Everything here is pure and thread-free: the engine renders one stereo
//! frame per call and the caller's pull rate is the clock. Backends and
//! threading live in `gb-audio` and the `gamebeat` facade.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bus;
mod dsp;
mod envelope;
mod frame;
mod mixer;
pub mod patterns;
pub mod sequencer;
pub mod tone;
mod voice;

pub use bus::AMBIENT_LEVEL;
pub use dsp::{Biquad, FilterMode, Noise, Oscillator, Waveform};
pub use envelope::{interpolate, BreakPoint, CurveKind, Envelope, EnvelopeState};
pub use frame::Frame;
pub use mixer::{EffectKind, Engine};
pub use sequencer::Sequencer;
pub use voice::Voice;
