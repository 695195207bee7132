use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reveal style selected by the `data-anim` attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    #[serde(rename = "fade")]
    Fade,
    #[serde(rename = "fadeslide-up")]
    FadeSlideUp,
    #[serde(rename = "fadeslide-in-left")]
    FadeSlideLeft,
    #[serde(rename = "fadeslide-in-right")]
    FadeSlideRight,
    /// Horizontal slide whose direction will depend on panel layout. The start
    /// offset is currently zero, so it behaves like a fade.
    #[serde(rename = "fadeslide-in")]
    FadeSlideDirectional,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 5] = [
        AnimationKind::Fade,
        AnimationKind::FadeSlideUp,
        AnimationKind::FadeSlideLeft,
        AnimationKind::FadeSlideRight,
        AnimationKind::FadeSlideDirectional,
    ];

    pub fn attr_value(self) -> &'static str {
        match self {
            AnimationKind::Fade => "fade",
            AnimationKind::FadeSlideUp => "fadeslide-up",
            AnimationKind::FadeSlideLeft => "fadeslide-in-left",
            AnimationKind::FadeSlideRight => "fadeslide-in-right",
            AnimationKind::FadeSlideDirectional => "fadeslide-in",
        }
    }

    /// Start and end states for an offset magnitude of `offset_px`.
    pub fn keyframes(self, offset_px: f64) -> (Keyframe, Keyframe) {
        match self {
            AnimationKind::Fade => (Keyframe::opacity(0.0), Keyframe::opacity(1.0)),
            AnimationKind::FadeSlideUp => (
                Keyframe::opacity(0.0).with_y(offset_px),
                Keyframe::opacity(1.0).with_y(0.0),
            ),
            AnimationKind::FadeSlideLeft => (
                Keyframe::opacity(0.0).with_x(-offset_px),
                Keyframe::opacity(1.0).with_x(0.0),
            ),
            AnimationKind::FadeSlideRight => (
                Keyframe::opacity(0.0).with_x(offset_px),
                Keyframe::opacity(1.0).with_x(0.0),
            ),
            AnimationKind::FadeSlideDirectional => (
                Keyframe::opacity(0.0).with_x(0.0),
                Keyframe::opacity(1.0).with_x(0.0),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl std::fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown animation kind {:?}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for AnimationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AnimationKind::ALL
            .into_iter()
            .find(|k| k.attr_value() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Visual state at one end of a tween. Axes left as `None` are not touched.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Keyframe {
    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity,
            x: None,
            y: None,
        }
    }

    /// Fully visible, untranslated. Used when an element skips its animation.
    pub fn settled() -> Self {
        Self {
            opacity: 1.0,
            x: Some(0.0),
            y: Some(0.0),
        }
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Blends toward `to` by `p` (`0` is `self`, `1` is `to`).
    pub fn lerp(&self, to: &Keyframe, p: f64) -> Keyframe {
        let mix = |a: f64, b: f64| a + (b - a) * p;
        let axis = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (None, None) => None,
            (a, b) => Some(mix(a.unwrap_or(0.0), b.unwrap_or(0.0))),
        };
        Keyframe {
            opacity: mix(self.opacity, to.opacity),
            x: axis(self.x, to.x),
            y: axis(self.y, to.y),
        }
    }

    /// CSS `transform` value for this state. A zero translation is `none`.
    pub fn css_transform(&self) -> String {
        let (x, y) = (self.x.unwrap_or(0.0), self.y.unwrap_or(0.0));
        if x == 0.0 && y == 0.0 {
            return "none".to_string();
        }
        format!("translate({x}px, {y}px)")
    }
}
