//! Tone generator: one constructor per sound kind.
//!
//! Each function builds a fully parameterized, self-terminating `Voice`
//! starting at the moment it is spawned (plus an optional onset delay).
//! Amplitudes always decay to at most 1% of peak by end of duration, so
//! retiring a finished voice never clicks.

use crate::dsp::{FilterMode, Waveform};
use crate::envelope::{BreakPoint, CurveKind, Envelope};
use crate::voice::Voice;

/// Default filter quality the sound design was tuned against.
const FILTER_Q: f32 = 1.0;

fn samples(sample_rate: f32, seconds: f32) -> u32 {
    (seconds * sample_rate) as u32
}

/// Peak-then-exponential-decay amplitude, the shape shared by most kinds.
fn decay(sample_rate: f32, peak: f32, floor: f32, seconds: f32) -> Envelope {
    Envelope::from_points(&[
        BreakPoint::new(0, peak, CurveKind::Exponential),
        BreakPoint::new(samples(sample_rate, seconds), floor, CurveKind::Step),
    ])
}

/// Low pitch-drop kick: sine starting at 150 Hz falling to near zero.
pub fn kick(sample_rate: f32) -> Voice {
    let pitch = Envelope::from_points(&[
        BreakPoint::new(0, 150.0, CurveKind::Exponential),
        BreakPoint::new(samples(sample_rate, 0.5), 0.01, CurveKind::Step),
    ]);
    Voice::osc(Waveform::Sine, 150.0, decay(sample_rate, 1.0, 0.01, 0.5), sample_rate)
        .with_pitch(pitch)
}

/// Band-limited noise burst around 1.5 kHz.
pub fn snare(sample_rate: f32) -> Voice {
    Voice::noise(decay(sample_rate, 0.8, 0.01, 0.2), sample_rate)
        .with_filter(FilterMode::Bandpass, 1500.0, FILTER_Q)
}

/// High-passed noise tick; accented hats sit on the off-beat.
pub fn hat(sample_rate: f32, accented: bool) -> Voice {
    let peak = if accented { 0.3 } else { 0.1 };
    Voice::noise(decay(sample_rate, peak, 0.01, 0.05), sample_rate)
        .with_filter(FilterMode::Highpass, 7000.0, FILTER_Q)
}

/// One sixteenth-note of bass at the section root.
///
/// On kick-coincident steps the envelope opens from silence (the sidechain
/// pump); elsewhere it sustains, then both release just past the step
/// boundary.
pub fn bass(sample_rate: f32, frequency: f32, sidechained: bool) -> Voice {
    let hold = samples(sample_rate, 0.1);
    let release = samples(sample_rate, 0.005);
    let amp = if sidechained {
        Envelope::from_points(&[
            BreakPoint::new(0, 0.0, CurveKind::Linear),
            BreakPoint::new(hold, 0.7, CurveKind::Exponential),
            BreakPoint::new(release, 0.01, CurveKind::Step),
        ])
    } else {
        Envelope::from_points(&[
            BreakPoint::new(0, 0.7, CurveKind::Step),
            BreakPoint::new(hold, 0.7, CurveKind::Exponential),
            BreakPoint::new(release, 0.01, CurveKind::Step),
        ])
    };
    Voice::osc(Waveform::Sawtooth, frequency, amp, sample_rate)
        .with_filter(FilterMode::Lowpass, 300.0, FILTER_Q)
}

/// Plucked square lead: fast lowpass sweep from 1500 Hz down to 300 Hz.
pub fn lead(sample_rate: f32, frequency: f32) -> Voice {
    let sweep = Envelope::from_points(&[
        BreakPoint::new(0, 1500.0, CurveKind::Exponential),
        BreakPoint::new(samples(sample_rate, 0.1), 300.0, CurveKind::Step),
    ]);
    Voice::osc(Waveform::Square, frequency, decay(sample_rate, 0.25, 0.01, 0.1), sample_rate)
        .with_filter(FilterMode::Lowpass, 1500.0, FILTER_Q)
        .with_cutoff_sweep(sweep)
}

/// Success cue: three-note ascending sine chime (C6, E6, G6), onsets
/// staggered by 100 ms.
pub fn chime(sample_rate: f32) -> [Voice; 3] {
    const NOTES: [f32; 3] = [1046.50, 1318.51, 1567.98];
    let stagger = samples(sample_rate, 0.1);

    core::array::from_fn(|i| {
        let amp = Envelope::from_points(&[
            BreakPoint::new(0, 0.0, CurveKind::Linear),
            BreakPoint::new(samples(sample_rate, 0.02), 0.9, CurveKind::Exponential),
            BreakPoint::new(samples(sample_rate, 0.78), 0.001, CurveKind::Step),
        ]);
        Voice::osc(Waveform::Sine, NOTES[i], amp, sample_rate)
            .with_delay(stagger * i as u32)
    })
}

/// Failure cue: sawtooth sliding from 150 Hz down to 50 Hz.
pub fn bonk(sample_rate: f32) -> Voice {
    let pitch = Envelope::from_points(&[
        BreakPoint::new(0, 150.0, CurveKind::Exponential),
        BreakPoint::new(samples(sample_rate, 0.3), 50.0, CurveKind::Step),
    ]);
    Voice::osc(Waveform::Sawtooth, 150.0, decay(sample_rate, 1.0, 0.01, 0.3), sample_rate)
        .with_pitch(pitch)
}

/// Impact cue: low-passed noise thud.
pub fn thud(sample_rate: f32) -> Voice {
    Voice::noise(decay(sample_rate, 1.0, 0.01, 0.15), sample_rate)
        .with_filter(FilterMode::Lowpass, 800.0, FILTER_Q)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    /// Render a voice to exhaustion, returning (samples rendered, overall
    /// peak, peak over the final 5%).
    fn drain(mut v: Voice) -> (usize, f32, f32) {
        let mut rendered = Vec::new();
        let cap = (SR * 3.0) as usize; // no sound in the set exceeds 1s
        while !v.is_finished() && rendered.len() < cap {
            rendered.push(v.next_sample().abs());
        }
        let peak = rendered.iter().cloned().fold(0.0f32, f32::max);
        let tail_start = rendered.len() - rendered.len() / 20;
        let tail_peak = rendered[tail_start..].iter().cloned().fold(0.0f32, f32::max);
        (rendered.len(), peak, tail_peak)
    }

    #[test]
    fn every_kind_self_terminates() {
        let voices = [
            kick(SR),
            snare(SR),
            hat(SR, true),
            hat(SR, false),
            bass(SR, 49.0, true),
            bass(SR, 49.0, false),
            lead(SR, 784.0),
            bonk(SR),
            thud(SR),
        ];
        for v in voices {
            let (len, peak, _) = drain(v);
            assert!(len < (SR * 3.0) as usize, "voice never finished");
            assert!(peak > 0.0, "voice was silent");
        }
    }

    #[test]
    fn every_kind_decays_to_near_silence() {
        let voices = [
            kick(SR),
            snare(SR),
            hat(SR, true),
            bass(SR, 49.0, false),
            lead(SR, 784.0),
            bonk(SR),
            thud(SR),
        ];
        for v in voices {
            let (_, peak, tail_peak) = drain(v);
            assert!(
                tail_peak <= peak * 0.05,
                "tail {} vs peak {}",
                tail_peak,
                peak
            );
        }
    }

    #[test]
    fn kick_lasts_half_a_second() {
        let (len, _, _) = drain(kick(SR));
        let expected = (SR * 0.5) as usize;
        assert!(len.abs_diff(expected) <= 2, "kick length {}", len);
    }

    #[test]
    fn accented_hat_is_louder_than_plain() {
        let (_, loud, _) = drain(hat(SR, true));
        let (_, quiet, _) = drain(hat(SR, false));
        assert!(loud > quiet * 2.0, "accent {} plain {}", loud, quiet);
    }

    #[test]
    fn bass_fits_within_a_step() {
        // A step at 143 BPM is ~105ms; the bass envelope releases at 105ms
        // so consecutive retriggers never stack up.
        let (len, _, _) = drain(bass(SR, 49.0, false));
        assert!(len <= (SR * 0.108) as usize, "bass length {}", len);
    }

    #[test]
    fn sidechained_bass_opens_from_silence() {
        let mut pumped = bass(SR, 49.0, true);
        let mut first = 0.0f32;
        for _ in 0..40 {
            first = first.max(pumped.next_sample().abs());
        }
        let mut sustained = bass(SR, 49.0, false);
        let mut first_sustained = 0.0f32;
        for _ in 0..40 {
            first_sustained = first_sustained.max(sustained.next_sample().abs());
        }
        assert!(
            first < first_sustained * 0.25,
            "pumped onset {} vs sustained onset {}",
            first,
            first_sustained
        );
    }

    #[test]
    fn chime_notes_enter_staggered() {
        let [a, b, c] = chime(SR);
        let onset = |mut v: Voice| {
            let mut i = 0usize;
            while v.next_sample() == 0.0 && i < (SR as usize) {
                i += 1;
            }
            i
        };
        let (oa, ob, oc) = (onset(a), onset(b), onset(c));
        let tenth = (SR * 0.1) as usize;
        assert!(oa < 100);
        assert!(ob.abs_diff(oa + tenth) < 100, "second onset {}", ob);
        assert!(oc.abs_diff(oa + 2 * tenth) < 100, "third onset {}", oc);
    }

    #[test]
    fn chime_total_length_covers_its_duck_window() {
        // Last partial starts at 200ms and rings for 800ms
        let [_, _, c] = chime(SR);
        let (len, _, _) = drain(c);
        assert!(len >= (SR * 0.95) as usize, "chime tail length {}", len);
    }
}
