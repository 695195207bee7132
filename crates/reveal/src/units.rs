use serde::{Deserialize, Serialize};

/// Raw values strictly above this are read as milliseconds under auto-detection.
pub const MILLIS_THRESHOLD: f64 = 50.0;

/// How numeric timing attributes are mapped to seconds.
///
/// Markup authors write both `0.8` and `800`. Auto-detection guesses the unit
/// from magnitude, which misreads genuine durations over 50 s; hosts that need
/// those can pin the unit instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum UnitPolicy {
    AutoDetect { millis_above: f64 },
    Seconds,
    Milliseconds,
}

impl Default for UnitPolicy {
    fn default() -> Self {
        UnitPolicy::AutoDetect {
            millis_above: MILLIS_THRESHOLD,
        }
    }
}

impl UnitPolicy {
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            UnitPolicy::AutoDetect { millis_above } if value > millis_above => value / 1000.0,
            UnitPolicy::AutoDetect { .. } | UnitPolicy::Seconds => value,
            UnitPolicy::Milliseconds => value / 1000.0,
        }
    }

    /// Parses and converts in one step. `None` means "fall back to the default".
    pub fn parse_seconds(self, raw: &str) -> Option<f64> {
        parse_number(raw).map(|v| self.to_seconds(v))
    }
}

/// Safe numeric parse: surrounding whitespace is ignored; anything that is not
/// a finite, non-negative number yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::{UnitPolicy, parse_number};

    #[test]
    fn large_values_are_milliseconds() {
        let p = UnitPolicy::default();
        assert_eq!(p.parse_seconds("120"), Some(0.12));
        assert_eq!(p.parse_seconds("0.5"), Some(0.5));
        assert_eq!(p.parse_seconds("750"), Some(0.75));
    }

    #[test]
    fn threshold_is_exclusive() {
        let p = UnitPolicy::default();
        assert_eq!(p.to_seconds(50.0), 50.0);
        assert_eq!(p.to_seconds(51.0), 0.051);
    }

    #[test]
    fn pinned_units_skip_the_heuristic() {
        assert_eq!(UnitPolicy::Seconds.to_seconds(60.0), 60.0);
        assert_eq!(UnitPolicy::Milliseconds.to_seconds(20.0), 0.02);
    }

    #[test]
    fn malformed_input_falls_back() {
        assert_eq!(parse_number(" 0.3 "), Some(0.3));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("fast"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-2"), None);
    }
}
