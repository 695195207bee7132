use foundation::bounds::Viewport;
use serde::Deserialize;

use crate::error::SimError;

fn default_frame_dt_s() -> f64 {
    1.0 / 60.0
}

fn default_settle_s() -> f64 {
    2.0
}

/// Timed scroll and resize actions, e.g.
///
/// ```json
/// { "frame_dt_s": 0.05, "steps": [
///     { "at_s": 0.5, "scroll_y": 1200 },
///     { "at_s": 1.0, "resize": { "width": 375, "height": 700 } }
/// ] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrollScript {
    #[serde(default = "default_frame_dt_s")]
    pub frame_dt_s: f64,
    /// Extra simulated time after the last step, so late triggers can finish.
    #[serde(default = "default_settle_s")]
    pub settle_s: f64,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub at_s: f64,
    #[serde(default)]
    pub scroll_y: Option<f64>,
    #[serde(default)]
    pub resize: Option<Viewport>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StepAction {
    Scroll(f64),
    Resize(Viewport),
}

impl ScriptStep {
    pub fn scroll(at_s: f64, y: f64) -> Self {
        Self {
            at_s,
            scroll_y: Some(y),
            resize: None,
        }
    }

    pub fn resize(at_s: f64, viewport: Viewport) -> Self {
        Self {
            at_s,
            scroll_y: None,
            resize: Some(viewport),
        }
    }

    /// Resize is applied before scroll when a step carries both.
    pub fn actions(&self) -> impl Iterator<Item = StepAction> {
        self.resize
            .map(StepAction::Resize)
            .into_iter()
            .chain(self.scroll_y.map(StepAction::Scroll))
    }
}

impl ScrollScript {
    pub fn new(frame_dt_s: f64, steps: Vec<ScriptStep>) -> Self {
        Self {
            frame_dt_s,
            settle_s: default_settle_s(),
            steps,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let script: ScrollScript = serde_json::from_str(json).map_err(|e| SimError::Parse {
            what: "scroll script",
            message: e.to_string(),
        })?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.frame_dt_s > 0.0 && self.frame_dt_s.is_finite()) {
            return Err(SimError::InvalidScript("frame_dt_s must be > 0".to_string()));
        }
        if !(self.settle_s >= 0.0) {
            return Err(SimError::InvalidScript("settle_s must be >= 0".to_string()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if !(step.at_s >= 0.0 && step.at_s.is_finite()) {
                return Err(SimError::InvalidScript(format!(
                    "step {i}: at_s must be a finite time >= 0"
                )));
            }
            if step.scroll_y.is_none() && step.resize.is_none() {
                return Err(SimError::InvalidScript(format!(
                    "step {i}: needs scroll_y or resize"
                )));
            }
        }
        Ok(())
    }

    /// Steps ordered by time; steps at the same time keep their script order.
    pub fn ordered_steps(&self) -> Vec<ScriptStep> {
        let mut steps = self.steps.clone();
        steps.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        steps
    }

    pub fn last_step_s(&self) -> f64 {
        self.steps.iter().map(|s| s.at_s).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptStep, ScrollScript, StepAction};
    use foundation::bounds::Viewport;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_scroll_and_resize_steps() {
        let script = ScrollScript::from_json(
            r#"{ "steps": [
                { "at_s": 1.0, "resize": { "width": 375, "height": 700 } },
                { "at_s": 0.5, "scroll_y": 1200 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(script.frame_dt_s, 1.0 / 60.0);
        assert_eq!(
            script.ordered_steps(),
            vec![
                ScriptStep::scroll(0.5, 1200.0),
                ScriptStep::resize(1.0, Viewport::new(375.0, 700.0)),
            ]
        );
        assert_eq!(script.last_step_s(), 1.0);
    }

    #[test]
    fn combined_step_resizes_first() {
        let step = ScriptStep {
            at_s: 0.0,
            scroll_y: Some(10.0),
            resize: Some(Viewport::new(500.0, 500.0)),
        };
        let actions: Vec<_> = step.actions().collect();
        assert_eq!(
            actions,
            vec![
                StepAction::Resize(Viewport::new(500.0, 500.0)),
                StepAction::Scroll(10.0)
            ]
        );
    }

    #[test]
    fn rejects_empty_steps_and_bad_frame_time() {
        assert!(ScrollScript::from_json(r#"{ "steps": [ { "at_s": 1 } ] }"#).is_err());
        assert!(ScrollScript::from_json(r#"{ "frame_dt_s": 0, "steps": [] }"#).is_err());
        assert!(ScrollScript::from_json(r#"{ "steps": [ { "at_s": -1, "scroll_y": 5 } ] }"#).is_err());
    }
}
