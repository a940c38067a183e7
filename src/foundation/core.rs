/// Duration substituted for any step whose own duration is missing or non-positive.
pub const FALLBACK_STEP_MS: f64 = 1000.0;

/// Default length of the blend between two consecutive scenes.
pub const DEFAULT_TRANSITION_MS: f64 = 500.0;

/// A point in normalized court space (`0.0..=1.0` on both axes).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CourtPoint {
    /// Horizontal coordinate, sideline to sideline.
    pub x: f64,
    /// Vertical coordinate, baseline first.
    pub y: f64,
}

impl CourtPoint {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Finite and inside the unit square.
    pub fn is_on_court(self) -> bool {
        self.is_finite() && (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Effective duration of a timed unit: the given value when it is a positive finite number,
/// otherwise [`FALLBACK_STEP_MS`].
pub fn effective_step_ms(duration_ms: f64) -> f64 {
    if duration_ms.is_finite() && duration_ms > 0.0 {
        duration_ms
    } else {
        FALLBACK_STEP_MS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
