use crate::attrs::{ATTR_DELAY, ATTR_DURATION, ATTR_GROUP_DELAY, ATTR_KIND, RawAttributes};
use crate::config::RevealConfig;
use crate::kind::AnimationKind;

/// Effective per-element timing, resolved once at scan time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealParams {
    /// `None` for unrecognized kinds: the trigger still fires but nothing animates.
    pub kind: Option<AnimationKind>,
    pub duration_s: f64,
    /// Explicit delay. When set, group staggering is bypassed for this element.
    pub delay_s: Option<f64>,
    pub group_step_s: f64,
}

/// An attribute that was present but unusable, so its default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub attribute: &'static str,
    pub raw: String,
}

impl RevealParams {
    pub fn derive(attrs: &RawAttributes, config: &RevealConfig) -> (Self, Vec<Fallback>) {
        let mut fallbacks = Vec::new();
        let units = config.units;

        let kind = attrs.kind.as_deref().and_then(|raw| match raw.parse::<AnimationKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                fallbacks.push(Fallback {
                    attribute: ATTR_KIND,
                    raw: raw.to_string(),
                });
                None
            }
        });

        // Zero duration and zero step are treated as unset.
        let mut positive = |attribute: &'static str, raw: Option<&str>, default: f64| {
            let Some(raw) = raw else {
                return default;
            };
            match units.parse_seconds(raw) {
                Some(v) if v > 0.0 => v,
                _ => {
                    fallbacks.push(Fallback {
                        attribute,
                        raw: raw.to_string(),
                    });
                    default
                }
            }
        };
        let duration_s = positive(
            ATTR_DURATION,
            attrs.duration.as_deref(),
            config.default_duration_s,
        );
        let group_step_s = positive(
            ATTR_GROUP_DELAY,
            attrs.group_delay.as_deref(),
            config.default_group_step_s,
        );

        let delay_s = attrs
            .delay
            .as_deref()
            .and_then(|raw| match units.parse_seconds(raw) {
                Some(v) => Some(v),
                None => {
                    fallbacks.push(Fallback {
                        attribute: ATTR_DELAY,
                        raw: raw.to_string(),
                    });
                    None
                }
            });

        let params = RevealParams {
            kind,
            duration_s,
            delay_s,
            group_step_s,
        };
        (params, fallbacks)
    }
}
