//! Audio frame type.

/// A stereo audio frame (f32, nominal range -1.0..1.0).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0.0, right: 0.0 }
    }

    /// Create a mono frame (same value for both channels).
    pub const fn mono(value: f32) -> Self {
        Self { left: value, right: value }
    }

    /// Mix another frame into this one.
    pub fn mix(&mut self, other: Frame) {
        self.left += other.left;
        self.right += other.right;
    }

    /// Scale both channels by a gain factor.
    pub fn scale(&mut self, gain: f32) {
        self.left *= gain;
        self.right *= gain;
    }

    /// Convert to clamped 16-bit integer samples (for WAV export and
    /// integer backends).
    pub fn to_i16(self) -> (i16, i16) {
        let l = (self.left * 32767.0).clamp(-32768.0, 32767.0) as i16;
        let r = (self.right * 32767.0).clamp(-32768.0, 32767.0) as i16;
        (l, r)
    }
}
