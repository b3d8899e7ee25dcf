//! Easing functions for animations

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// Starts fast and slows down; `factor` 1.0 is a quadratic ease-out
    Decelerate(f64),
}

impl Easing {
    /// Quadratic deceleration, the default curve for glow fades
    pub const DECELERATE: Easing = Easing::Decelerate(1.0);

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Decelerate(factor) => {
                if *factor == 1.0 {
                    1.0 - (1.0 - t) * (1.0 - t)
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
        }
    }

    /// Interpolate between `from` and `to` at progress `t`
    pub fn lerp(&self, from: f64, to: f64, t: f64) -> f64 {
        from + (to - from) * self.apply(t)
    }
}
