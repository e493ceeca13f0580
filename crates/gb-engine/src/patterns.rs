//! The musical material: one 64-step loop as fixed lookup tables.
//!
//! Pure lookup, no state. The loop is four 16-step harmonic sections
//! (Gm, Eb, Bb, F); drums repeat every bar, the bass plays the section
//! root on every step, and the lead arpeggiates a per-section note table.
//! An entry of 0.0 in a note table is a rest: no voice is created for it.

/// Steps in the full loop.
pub const LOOP_STEPS: u32 = 64;

/// Steps per harmonic section.
pub const SECTION_STEPS: u32 = 16;

/// Section root frequencies: G1, Eb1, Bb1, F1.
pub const BASS_ROOTS: [f32; 4] = [49.00, 38.89, 58.27, 43.65];

/// Per-section lead riffs, indexed by `step % 16`. 0.0 = rest.
const LEAD_SECTIONS: [[f32; 16]; 4] = [
    // G minor
    [
        784.0, 0.0, 784.0, 587.0, 466.0, 0.0, 587.0, 392.0, //
        784.0, 0.0, 784.0, 587.0, 466.0, 0.0, 587.0, 392.0,
    ],
    // Eb major
    [
        622.0, 0.0, 622.0, 466.0, 392.0, 0.0, 466.0, 311.0, //
        622.0, 0.0, 622.0, 466.0, 392.0, 0.0, 466.0, 311.0,
    ],
    // Bb major
    [
        932.0, 0.0, 932.0, 698.0, 587.0, 0.0, 698.0, 466.0, //
        932.0, 0.0, 932.0, 698.0, 587.0, 0.0, 698.0, 466.0,
    ],
    // F major
    [
        698.0, 0.0, 698.0, 523.0, 440.0, 0.0, 523.0, 349.0, //
        698.0, 0.0, 698.0, 523.0, 440.0, 0.0, 523.0, 349.0,
    ],
];

/// Hi-hat volume tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HatTier {
    /// Off-beat accent.
    Accented,
    Plain,
}

/// Bass trigger for a step: the bass retriggers every step, but ducks
/// under the kick on kick steps (sidechain pump).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BassTrigger {
    pub frequency: f32,
    pub sidechained: bool,
}

/// Everything that fires at one step of the loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepTriggers {
    pub kick: bool,
    pub snare: bool,
    pub hat: Option<HatTier>,
    pub bass: BassTrigger,
    /// Lead note frequency, or `None` on rest steps.
    pub lead: Option<f32>,
}

/// Look up the triggers for a loop position. Deterministic; panics only on
/// an out-of-range step, which the sequencer never produces.
pub fn triggers_at(step: u32) -> StepTriggers {
    debug_assert!(step < LOOP_STEPS);
    let section = (step / SECTION_STEPS) as usize;
    let kick = step % 4 == 0;

    let hat = if step % 2 == 0 {
        Some(if step % 4 == 2 { HatTier::Accented } else { HatTier::Plain })
    } else {
        None
    };

    let lead_freq = LEAD_SECTIONS[section][(step % SECTION_STEPS) as usize];

    StepTriggers {
        kick,
        snare: step % 8 == 4,
        hat,
        bass: BassTrigger {
            frequency: BASS_ROOTS[section],
            sidechained: kick,
        },
        lead: (lead_freq > 0.0).then_some(lead_freq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_deterministic() {
        for step in 0..LOOP_STEPS {
            assert_eq!(triggers_at(step), triggers_at(step));
        }
    }

    #[test]
    fn kick_fires_every_fourth_step() {
        for step in 0..LOOP_STEPS {
            assert_eq!(triggers_at(step).kick, step % 4 == 0, "step {}", step);
        }
    }

    #[test]
    fn snare_fires_once_per_bar() {
        for step in 0..LOOP_STEPS {
            assert_eq!(triggers_at(step).snare, step % 8 == 4, "step {}", step);
        }
    }

    #[test]
    fn hat_fires_every_other_step_accented_off_beat() {
        for step in 0..LOOP_STEPS {
            let expected = if step % 2 != 0 {
                None
            } else if step % 4 == 2 {
                Some(HatTier::Accented)
            } else {
                Some(HatTier::Plain)
            };
            assert_eq!(triggers_at(step).hat, expected, "step {}", step);
        }
    }

    #[test]
    fn snare_and_accented_hat_never_coincide() {
        for step in 0..LOOP_STEPS {
            let t = triggers_at(step);
            assert!(
                !(t.snare && t.hat == Some(HatTier::Accented)),
                "step {}",
                step
            );
        }
    }

    #[test]
    fn bass_root_follows_sections() {
        for step in 0..LOOP_STEPS {
            let expected = BASS_ROOTS[(step / 16) as usize];
            assert_eq!(triggers_at(step).bass.frequency, expected, "step {}", step);
        }
    }

    #[test]
    fn bass_sidechains_exactly_on_kick_steps() {
        for step in 0..LOOP_STEPS {
            let t = triggers_at(step);
            assert_eq!(t.bass.sidechained, t.kick, "step {}", step);
        }
    }

    #[test]
    fn lead_rests_produce_no_note() {
        // Each 8-step half of a section rests at offsets 1 and 5
        for step in 0..LOOP_STEPS {
            let expected_rest = matches!(step % 8, 1 | 5);
            assert_eq!(
                triggers_at(step).lead.is_none(),
                expected_rest,
                "step {}",
                step
            );
        }
    }

    #[test]
    fn lead_opens_each_section_on_its_high_root() {
        let expected = [784.0, 622.0, 932.0, 698.0];
        for (section, freq) in expected.iter().enumerate() {
            let step = section as u32 * SECTION_STEPS;
            assert_eq!(triggers_at(step).lead, Some(*freq));
        }
    }
}
