//! Piecewise amplitude/parameter curves and their runtime evaluator.
//!
//! `Envelope` encodes every time-varying parameter in the synthesizer
//! (amplitude decays, pitch drops, filter sweeps) as breakpoints with an
//! interpolation curve per segment. Segment durations are in samples, so
//! evaluation is exact regardless of how the caller batches rendering.

use arrayvec::ArrayVec;

/// Maximum breakpoints per envelope. The densest curves in the instrument
/// set (bass, chime partial) use 3 points.
pub const MAX_BREAKPOINTS: usize = 8;

/// A one-shot piecewise curve over time.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Breakpoints defining the curve.
    /// The first point's `dt` is ignored (it starts at t=0).
    pub points: ArrayVec<BreakPoint, MAX_BREAKPOINTS>,
}

/// A breakpoint in an envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreakPoint {
    /// Samples from the previous point (0 for the first point).
    pub dt: u32,
    /// Value at this point.
    pub value: f32,
    /// How to interpolate FROM this point TO the next.
    pub curve: CurveKind,
}

/// Interpolation curve between two breakpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    /// Hold this value until the next point.
    Step,
    /// Straight line to the next point.
    Linear,
    /// Geometric ramp to the next point. Both endpoints must be positive;
    /// degenerates to linear otherwise.
    Exponential,
}

/// Interpolate between two values using the given curve at `t` (0.0..1.0).
pub fn interpolate(curve: CurveKind, from: f32, to: f32, t: f32) -> f32 {
    match curve {
        CurveKind::Step => from,
        CurveKind::Linear => from + (to - from) * t,
        CurveKind::Exponential => {
            if from <= 0.0 || to <= 0.0 {
                return from + (to - from) * t;
            }
            from * libm::powf(to / from, t)
        }
    }
}

impl Envelope {
    /// Create an envelope from a slice of breakpoints.
    pub fn from_points(pts: &[BreakPoint]) -> Self {
        let mut points = ArrayVec::new();
        for p in pts {
            points.push(*p);
        }
        Self { points }
    }

    /// Total duration in samples.
    pub fn duration(&self) -> u32 {
        self.points.iter().skip(1).map(|p| p.dt).sum()
    }
}

impl BreakPoint {
    /// Create a new breakpoint.
    pub fn new(dt: u32, value: f32, curve: CurveKind) -> Self {
        Self { dt, value, curve }
    }
}

/// Runtime state for a playing envelope.
#[derive(Clone, Debug)]
pub struct EnvelopeState {
    /// Current segment index (the "from" breakpoint).
    segment: u16,
    /// Samples elapsed within the current segment.
    time_in_segment: u32,
    /// Current output value.
    value: f32,
    /// Envelope reached its end.
    finished: bool,
}

impl EnvelopeState {
    /// Create a new state starting at the first breakpoint.
    pub fn new(envelope: &Envelope) -> Self {
        let value = envelope.points.first().map_or(0.0, |p| p.value);
        let finished = envelope.points.len() < 2;
        Self { segment: 0, time_in_segment: 0, value, finished }
    }

    /// Current output value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the envelope has reached its final breakpoint.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the envelope by `delta` samples.
    pub fn advance(&mut self, envelope: &Envelope, delta: u32) {
        if self.finished {
            return;
        }
        self.time_in_segment += delta;
        self.resolve(envelope);
    }

    /// Walk forward through breakpoints until time_in_segment is within
    /// the current segment.
    fn resolve(&mut self, envelope: &Envelope) {
        loop {
            let seg_idx = self.segment as usize;
            let next_idx = seg_idx + 1;
            if next_idx >= envelope.points.len() {
                self.finished = true;
                self.value = envelope.points[seg_idx].value;
                return;
            }

            let next = &envelope.points[next_idx];
            if next.dt == 0 || self.time_in_segment >= next.dt {
                // Crossed into the next breakpoint
                let overshoot = self.time_in_segment.saturating_sub(next.dt);
                self.segment += 1;
                self.time_in_segment = overshoot;
                self.value = next.value;

                if (self.segment as usize) + 1 >= envelope.points.len() {
                    self.finished = true;
                    return;
                }
                if self.time_in_segment > 0 {
                    continue;
                }
                return;
            } else {
                // Within the current segment, interpolate
                let seg = &envelope.points[seg_idx];
                let t = self.time_in_segment as f32 / next.dt as f32;
                self.value = interpolate(seg.curve, seg.value, next.value, t);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bp(dt: u32, value: f32, curve: CurveKind) -> BreakPoint {
        BreakPoint::new(dt, value, curve)
    }

    #[test]
    fn interpolate_step_holds_value() {
        assert_eq!(interpolate(CurveKind::Step, 1.0, 10.0, 0.5), 1.0);
        assert_eq!(interpolate(CurveKind::Step, 1.0, 10.0, 0.99), 1.0);
    }

    #[test]
    fn interpolate_linear_midpoint() {
        assert_eq!(interpolate(CurveKind::Linear, 0.0, 10.0, 0.5), 5.0);
        assert_eq!(interpolate(CurveKind::Linear, 0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn interpolate_exponential_is_geometric() {
        // 1.0 -> 0.01 at t=0.5 should be sqrt(0.01) = 0.1
        let mid = interpolate(CurveKind::Exponential, 1.0, 0.01, 0.5);
        assert_relative_eq!(mid, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn interpolate_exponential_nonpositive_falls_back_to_linear() {
        let mid = interpolate(CurveKind::Exponential, 0.0, 10.0, 0.5);
        assert_eq!(mid, 5.0);
    }

    #[test]
    fn single_linear_segment() {
        let env = Envelope::from_points(&[
            bp(0, 0.0, CurveKind::Linear),
            bp(100, 10.0, CurveKind::Step),
        ]);
        let mut state = EnvelopeState::new(&env);
        assert_eq!(state.value(), 0.0);

        state.advance(&env, 50);
        assert_relative_eq!(state.value(), 5.0, epsilon = 0.01);

        state.advance(&env, 50);
        assert_relative_eq!(state.value(), 10.0, epsilon = 0.01);
        assert!(state.is_finished());
    }

    #[test]
    fn exponential_decay_reaches_floor() {
        let env = Envelope::from_points(&[
            bp(0, 1.0, CurveKind::Exponential),
            bp(1000, 0.01, CurveKind::Step),
        ]);
        let mut state = EnvelopeState::new(&env);
        state.advance(&env, 1000);
        assert_relative_eq!(state.value(), 0.01, epsilon = 1e-5);
        assert!(state.is_finished());
    }

    #[test]
    fn multi_segment_walks_through() {
        let env = Envelope::from_points(&[
            bp(0, 0.0, CurveKind::Linear),
            bp(10, 10.0, CurveKind::Linear),
            bp(10, 20.0, CurveKind::Step),
        ]);
        let mut state = EnvelopeState::new(&env);

        state.advance(&env, 10);
        assert_relative_eq!(state.value(), 10.0, epsilon = 0.01);

        state.advance(&env, 5);
        assert_relative_eq!(state.value(), 15.0, epsilon = 0.01);

        state.advance(&env, 5);
        assert_relative_eq!(state.value(), 20.0, epsilon = 0.01);
        assert!(state.is_finished());
    }

    #[test]
    fn large_overshoot_skips_segments() {
        let env = Envelope::from_points(&[
            bp(0, 0.0, CurveKind::Linear),
            bp(10, 10.0, CurveKind::Linear),
            bp(10, 20.0, CurveKind::Step),
        ]);
        let mut state = EnvelopeState::new(&env);

        state.advance(&env, 25);
        assert_relative_eq!(state.value(), 20.0, epsilon = 0.01);
        assert!(state.is_finished());
    }

    #[test]
    fn empty_envelope_stays_at_zero() {
        let env = Envelope::from_points(&[]);
        let mut state = EnvelopeState::new(&env);
        assert_eq!(state.value(), 0.0);
        state.advance(&env, 100);
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn one_point_envelope_holds_value() {
        let env = Envelope::from_points(&[bp(0, 42.0, CurveKind::Linear)]);
        let mut state = EnvelopeState::new(&env);
        assert_eq!(state.value(), 42.0);
        state.advance(&env, 100);
        assert_eq!(state.value(), 42.0);
        assert!(state.is_finished());
    }

    #[test]
    fn duration_sums_segment_lengths() {
        let env = Envelope::from_points(&[
            bp(0, 0.0, CurveKind::Linear),
            bp(10, 1.0, CurveKind::Linear),
            bp(30, 0.0, CurveKind::Step),
        ]);
        assert_eq!(env.duration(), 40);
    }
}
