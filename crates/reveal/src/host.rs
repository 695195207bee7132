use foundation::bounds::{Rect, Viewport};
use foundation::ids::ElementId;
use foundation::time::{Time, TimeSpan};
use serde::Serialize;

use crate::attrs::RawAttributes;
use crate::easing::Easing;
use crate::error::HostError;
use crate::kind::Keyframe;

/// One opted-in element as seen at scan time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedElement {
    pub id: ElementId,
    pub attrs: RawAttributes,
    /// Bounding box relative to the viewport at scan time.
    pub rect: Rect,
}

/// Page-wide state read once at scan time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanContext {
    pub viewport: Viewport,
    /// Classes on the document root element.
    pub root_classes: Vec<String>,
}

impl ScanContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            root_classes: Vec::new(),
        }
    }

    pub fn with_root_classes<S: Into<String>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
        self.root_classes = classes.into_iter().map(Into::into).collect();
        self
    }
}

/// Fire when the element's top edge reaches `start_fraction` of the viewport
/// height (measured from the top).
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TriggerSpec {
    pub start_fraction: f64,
    /// Fire at most once, then stop observing.
    pub once: bool,
}

/// A scheduled reveal handed to the animation engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tween {
    pub element: ElementId,
    pub from: Keyframe,
    pub to: Keyframe,
    pub duration_s: f64,
    pub delay_s: f64,
    pub ease: Easing,
    /// Stagger slot within the trigger group; `None` for explicit delays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_slot: Option<u32>,
    pub triggered_at: Time,
}

impl Tween {
    /// When the element is actually moving.
    pub fn active_span(&self) -> TimeSpan {
        let start = self.triggered_at.after(self.delay_s);
        TimeSpan::new(start, start.after(self.duration_s))
    }

    /// Eased progress in `[0, 1]` at `now`; `0` while the delay runs.
    pub fn progress_at(&self, now: Time) -> f64 {
        let span = self.active_span();
        if now < span.start {
            return 0.0;
        }
        if !span.contains(now) || span.duration() <= 0.0 {
            return 1.0;
        }
        self.ease.evaluate(now.since(span.start) / span.duration())
    }

    /// Element state at `now` as rendered by an engine following this tween.
    pub fn state_at(&self, now: Time) -> Keyframe {
        self.from.lerp(&self.to, self.progress_at(now))
    }
}

/// Registers one-shot visibility triggers. The host later calls
/// [`crate::RevealScheduler::on_enter`] when a trigger fires.
pub trait TriggerRegistry {
    fn register(&mut self, element: ElementId, spec: TriggerSpec) -> Result<(), HostError>;
}

/// Applies visual state to elements.
pub trait AnimationEngine {
    /// Starts interpolating `tween.from` to `tween.to` after `tween.delay_s`.
    fn animate(&mut self, tween: &Tween) -> Result<(), HostError>;

    /// Applies `state` immediately, without interpolation.
    fn set(&mut self, element: ElementId, state: &Keyframe) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::Tween;
    use crate::easing::Easing;
    use crate::kind::Keyframe;
    use foundation::ids::ElementId;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    fn fade(delay_s: f64, ease: Easing) -> Tween {
        Tween {
            element: ElementId::new(1),
            from: Keyframe::opacity(0.0),
            to: Keyframe::opacity(1.0),
            duration_s: 1.0,
            delay_s,
            ease,
            group_slot: Some(0),
            triggered_at: Time(2.0),
        }
    }

    #[test]
    fn progress_waits_for_delay_then_eases() {
        let tween = fade(0.5, Easing::QuadOut);
        assert_eq!(tween.progress_at(Time(2.4)), 0.0);
        assert_eq!(tween.progress_at(Time(3.0)), 0.75);
        assert_eq!(tween.progress_at(Time(3.5)), 1.0);
        assert_eq!(tween.progress_at(Time(9.0)), 1.0);
    }

    #[test]
    fn state_follows_eased_progress() {
        let linear = fade(0.0, Easing::Linear);
        let eased = fade(0.0, Easing::QuadOut);
        assert_eq!(linear.state_at(Time(2.5)).opacity, 0.5);
        assert_eq!(eased.state_at(Time(2.5)).opacity, 0.75);
        assert_eq!(eased.state_at(Time(3.0)), Keyframe::opacity(1.0));
    }
}
