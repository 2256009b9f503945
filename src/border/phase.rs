use std::time::Duration;

/// Rotational offset into the color cycle, always in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HuePhase(f64);

impl HuePhase {
    pub fn new(value: f64) -> Self {
        Self(wrap_unit(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Advance by wall-clock time so the animation speed does not depend on
    /// the achieved frame rate.
    pub fn advance(&mut self, elapsed: Duration, cycle_speed: f64) {
        self.0 = wrap_unit(self.0 + elapsed.as_secs_f64() * cycle_speed);
    }
}

fn wrap_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
