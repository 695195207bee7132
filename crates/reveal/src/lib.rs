//! Scroll-triggered reveal animations.
//!
//! Elements opt in through `data-anim*` attributes. Each one gets a one-shot
//! visibility trigger; triggers that fire close together in time share a
//! stagger sequence so a row of cards entering the viewport animates in
//! succession rather than all at once.
//!
//! The crate owns parameter derivation, grouping, and keyframe selection. The
//! page itself (trigger registration, style mutation) is reached through the
//! [`TriggerRegistry`] and [`AnimationEngine`] traits.

pub mod attrs;
pub mod config;
pub mod easing;
pub mod error;
pub mod grouping;
pub mod host;
pub mod kind;
pub mod params;
pub mod scheduler;
pub mod units;

pub use attrs::RawAttributes;
pub use config::{ConfigError, OffsetBreakpoints, RevealConfig};
pub use easing::Easing;
pub use error::{HostError, RevealError};
pub use grouping::GroupingState;
pub use host::{AnimationEngine, ScanContext, ScannedElement, TriggerRegistry, TriggerSpec, Tween};
pub use kind::{AnimationKind, Keyframe, UnknownKind};
pub use params::{Fallback, RevealParams};
pub use scheduler::{Phase, RevealScheduler, ScanReport, TriggerOutcome};
pub use units::UnitPolicy;
