use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::units::UnitPolicy;

/// Root classes under which the page is being edited or documented. In those
/// modes elements are shown statically and no reveal is scheduled.
pub const DEFAULT_BYPASS_CLASSES: [&str; 4] =
    ["wf-design-mode", "wf-doc", "site-scrollbar", "w-editor"];

/// Start offset magnitude by viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetBreakpoints {
    /// Viewports strictly narrower than this use `narrow_px`.
    pub narrow_below_px: f64,
    pub narrow_px: f64,
    pub wide_px: f64,
}

impl Default for OffsetBreakpoints {
    fn default() -> Self {
        Self {
            narrow_below_px: 600.0,
            narrow_px: 40.0,
            wide_px: 75.0,
        }
    }
}

impl OffsetBreakpoints {
    pub fn magnitude(&self, viewport_width: f64) -> f64 {
        if viewport_width < self.narrow_below_px {
            self.narrow_px
        } else {
            self.wide_px
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Trigger line, as a fraction of viewport height measured from the top.
    pub start_fraction: f64,
    /// Triggers closer than this to the previous trigger join its group.
    pub reset_window_s: f64,
    pub default_duration_s: f64,
    pub default_group_step_s: f64,
    pub ease: Easing,
    pub offsets: OffsetBreakpoints,
    pub units: UnitPolicy,
    pub bypass_root_classes: Vec<String>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RevealConfig {
    /// Trigger at 90% of the viewport, 0.1 s grouping window.
    pub fn standard() -> Self {
        Self {
            start_fraction: 0.9,
            reset_window_s: 0.1,
            default_duration_s: 0.75,
            default_group_step_s: 0.1,
            ease: Easing::QuadOut,
            offsets: OffsetBreakpoints::default(),
            units: UnitPolicy::default(),
            bypass_root_classes: DEFAULT_BYPASS_CLASSES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// Trigger earlier (80%) and group over a wider 0.25 s window.
    pub fn loose() -> Self {
        Self {
            start_fraction: 0.8,
            reset_window_s: 0.25,
            ..Self::standard()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "loose" => Some(Self::loose()),
            _ => None,
        }
    }

    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RevealConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.start_fraction > 0.0 && self.start_fraction <= 1.0) {
            return Err(ConfigError::invalid("start_fraction", "must be in (0, 1]"));
        }
        if !(self.reset_window_s >= 0.0) {
            return Err(ConfigError::invalid("reset_window_s", "must be >= 0"));
        }
        if !(self.default_duration_s > 0.0) {
            return Err(ConfigError::invalid("default_duration_s", "must be > 0"));
        }
        if !(self.default_group_step_s > 0.0) {
            return Err(ConfigError::invalid("default_group_step_s", "must be > 0"));
        }
        let o = &self.offsets;
        if !(o.narrow_px >= 0.0 && o.wide_px >= 0.0 && o.narrow_below_px >= 0.0) {
            return Err(ConfigError::invalid("offsets", "must be >= 0"));
        }
        if let UnitPolicy::AutoDetect { millis_above } = self.units {
            if !(millis_above > 0.0) {
                return Err(ConfigError::invalid("units.millis_above", "must be > 0"));
            }
        }
        Ok(())
    }

    /// True if any of the document root's classes disables reveals.
    pub fn bypasses<'a>(&self, root_classes: impl IntoIterator<Item = &'a str>) -> bool {
        root_classes
            .into_iter()
            .any(|c| self.bypass_root_classes.iter().any(|b| b == c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: &'static str },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "reveal config is not valid JSON: {msg}"),
            ConfigError::Invalid { field, reason } => {
                write!(f, "reveal config field `{field}` {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
