use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Decelerating quadratic: fast start, gentle landing.
    #[default]
    QuadOut,
}

impl Easing {
    /// Progress at normalized time `t` (clamped to `[0, 1]`).
    pub fn evaluate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }

    /// Equivalent CSS timing function, for engines that take easing strings.
    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadOut => "cubic-bezier(0.5, 1, 0.89, 1)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    #[test]
    fn quad_out_decelerates() {
        let e = Easing::QuadOut;
        assert_eq!(e.evaluate(0.0), 0.0);
        assert_eq!(e.evaluate(1.0), 1.0);
        assert_eq!(e.evaluate(0.5), 0.75);
        // More ground is covered in the first half than the second.
        assert!(e.evaluate(0.5) - e.evaluate(0.0) > e.evaluate(1.0) - e.evaluate(0.5));
    }

    #[test]
    fn clamps_out_of_range_time() {
        assert_eq!(Easing::Linear.evaluate(-1.0), 0.0);
        assert_eq!(Easing::QuadOut.evaluate(2.0), 1.0);
    }
}
