use foundation::ids::ElementId;
use foundation::time::{ManualClock, Time};
use reveal::{RevealConfig, RevealScheduler, ScanReport, TriggerOutcome, Tween};
use runtime::event_bus::TraceEvent;
use runtime::frame::Frame;
use runtime::metrics::MetricsSnapshot;
use serde::Serialize;
use tracing::debug;

use crate::error::SimError;
use crate::page::HeadlessPage;
use crate::script::{ScrollScript, StepAction};

/// Upper bound on simulated frames per run.
pub const MAX_FRAMES: u64 = 1_000_000;

// Frame times are `index * dt`, so allow rounding slack when matching steps.
const STEP_EPSILON_S: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub registered: Vec<ElementId>,
    pub snapped: Vec<ElementId>,
    pub failed: Vec<String>,
    pub bypassed: bool,
}

impl From<&ScanReport> for ScanSummary {
    fn from(report: &ScanReport) -> Self {
        Self {
            registered: report.registered.clone(),
            snapped: report.snapped.clone(),
            failed: report.failed.iter().map(|e| e.to_string()).collect(),
            bypassed: report.bypassed,
        }
    }
}

/// Everything that happened during one scripted run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub scan: ScanSummary,
    /// Started reveals in trigger order.
    pub reveals: Vec<Tween>,
    pub inert: Vec<ElementId>,
    /// Elements whose trigger never fired.
    pub never_triggered: Vec<ElementId>,
    /// Elements not fully visible when the run ended, in document order.
    pub hidden: Vec<ElementId>,
    pub errors: Vec<String>,
    pub end_time: Time,
    pub frames: u64,
    pub events: Vec<TraceEvent>,
    pub metrics: MetricsSnapshot,
}

impl Timeline {
    pub fn reveal_of(&self, id: ElementId) -> Option<&Tween> {
        self.reveals.iter().find(|t| t.element == id)
    }

    pub fn delays(&self) -> Vec<f64> {
        self.reveals.iter().map(|t| t.delay_s).collect()
    }
}

/// Drives a [`HeadlessPage`] and a [`RevealScheduler`] through a scroll script.
pub struct Simulation {
    page: HeadlessPage,
    clock: ManualClock,
    scheduler: RevealScheduler<ManualClock>,
}

impl Simulation {
    pub fn new(page: HeadlessPage, config: RevealConfig) -> Result<Self, SimError> {
        config.validate()?;
        let clock = ManualClock::new();
        let scheduler = RevealScheduler::new(config, clock.clone());
        Ok(Self {
            page,
            clock,
            scheduler,
        })
    }

    pub fn page(&self) -> &HeadlessPage {
        &self.page
    }

    /// Scans at t = 0, then steps frames until every script step has been
    /// applied, `settle_s` has passed, and no reveal is still animating.
    pub fn run(mut self, script: &ScrollScript) -> Result<Timeline, SimError> {
        script.validate()?;

        let elements = self.page.scanned_elements();
        let ctx = self.page.scan_context();
        let report = self.scheduler.scan(elements, &ctx, &mut self.page)?;

        let steps = script.ordered_steps();
        let end_s = script.last_step_s() + script.settle_s;
        let mut next_step = 0;
        let mut active: Vec<Tween> = Vec::new();
        let mut reveals = Vec::new();
        let mut inert = Vec::new();
        let mut errors = Vec::new();
        let mut frame = Frame::new(0, script.frame_dt_s);

        loop {
            let now = frame.time;
            self.clock.set(now);

            while next_step < steps.len() && steps[next_step].at_s <= now.0 + STEP_EPSILON_S {
                for action in steps[next_step].actions() {
                    match action {
                        StepAction::Scroll(y) => {
                            debug!(at = now.0, y, "scroll");
                            self.page.scroll_to(y);
                        }
                        StepAction::Resize(viewport) => {
                            debug!(at = now.0, width = viewport.width, "resize");
                            self.page.resize(viewport);
                            self.scheduler.on_resize(viewport);
                        }
                    }
                }
                next_step += 1;
            }

            for id in self.page.take_crossed() {
                match self.scheduler.on_enter(id, &mut self.page) {
                    Ok(TriggerOutcome::Started(tween)) => {
                        active.push(tween.clone());
                        reveals.push(tween);
                    }
                    Ok(TriggerOutcome::Inert) => inert.push(id),
                    Ok(TriggerOutcome::AlreadyTriggered) => {}
                    Err(err) => errors.push(err.to_string()),
                }
            }

            let scheduler = &mut self.scheduler;
            active.retain(|t| {
                if t.active_span().end.0 <= now.0 + STEP_EPSILON_S {
                    scheduler.finish(t.element);
                    false
                } else {
                    true
                }
            });

            let done = next_step >= steps.len() && now.0 >= end_s && active.is_empty();
            if done {
                break;
            }
            if frame.index >= MAX_FRAMES {
                return Err(SimError::FrameLimit(frame.index));
            }
            frame = frame.next();
        }

        let never_triggered = self.scheduler.pending().collect();
        let settle_at = frame.time.after(STEP_EPSILON_S);
        let hidden = self
            .page
            .ids()
            .filter(|id| {
                self.page
                    .state_of(*id, settle_at)
                    .is_none_or(|state| state.opacity < 1.0)
            })
            .collect();
        Ok(Timeline {
            scan: ScanSummary::from(&report),
            reveals,
            inert,
            never_triggered,
            hidden,
            errors,
            end_time: frame.time,
            frames: frame.index + 1,
            metrics: self.scheduler.metrics().snapshot(),
            events: self.scheduler.drain_events(),
        })
    }
}
