//! Headless page host for reveal animations.
//!
//! Lays elements out in document coordinates, fires one-shot triggers as a
//! scripted scroll moves the viewport, and records what the scheduler asks the
//! animation engine to do. Time advances in fixed frames so runs are
//! reproducible.

pub mod error;
pub mod page;
pub mod script;
pub mod simulation;

pub use error::SimError;
pub use page::{ElementSpec, HeadlessPage, PageElement, PageSpec};
pub use script::{ScriptStep, ScrollScript, StepAction};
pub use simulation::{Simulation, Timeline};
