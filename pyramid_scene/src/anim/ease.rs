//! Exponential easing scaled by frame delta.
//!
//! A constant per-frame lerp factor `f` at a reference refresh rate `hz` is
//! equivalent to a continuous decay rate of `-ln(1 - f) * hz`. Rates are
//! expressed that way so tuning values keep their familiar 60 Hz meaning while
//! the result no longer depends on the actual refresh rate.

/// Converts a per-frame lerp factor observed at `hz` into a decay rate (1/s).
pub fn rate_for_factor(factor: f32, hz: f32) -> f32 {
    let factor = factor.clamp(0.0, 0.999_999);
    -(1.0 - factor).ln() * hz
}

/// Fraction of the remaining distance covered in `dt` seconds. Always in `[0, 1)`.
pub fn ease_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Moves `current` toward `target` without overshooting.
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * ease_factor(rate, dt)
}

/// Edge detector: reports a value only when it differs from the last one seen.
#[derive(Clone, Debug, Default)]
pub struct ChangeNotifier<T> {
    last: T,
}

impl<T: PartialEq + Copy> ChangeNotifier<T> {
    pub fn new(initial: T) -> Self {
        Self { last: initial }
    }

    pub fn last(&self) -> T {
        self.last
    }

    pub fn observe(&mut self, current: T) -> Option<T> {
        if current == self.last {
            return None;
        }
        self.last = current;
        Some(current)
    }
}
