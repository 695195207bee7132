use std::collections::BTreeMap;

use foundation::bounds::Viewport;
use foundation::ids::ElementId;
use foundation::time::Clock;
use runtime::event_bus::{EventBus, TraceEvent};
use runtime::metrics::Metrics;
use tracing::{debug, warn};

use crate::config::RevealConfig;
use crate::error::{HostError, RevealError};
use crate::grouping::GroupingState;
use crate::host::{AnimationEngine, ScanContext, ScannedElement, TriggerRegistry, TriggerSpec, Tween};
use crate::kind::Keyframe;
use crate::params::RevealParams;

/// Per-element lifecycle. Transitions only move forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Trigger registered, waiting to enter the viewport.
    Pending,
    /// Handed to the animation engine.
    Animating,
    /// Final state reached (or skipped straight to it). Terminal.
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Started(Tween),
    /// Unrecognized kind: the element is marked triggered but nothing animates.
    Inert,
    /// The element already fired; the engine was not called.
    AlreadyTriggered,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScanReport {
    /// Elements waiting on a visibility trigger, in scan order.
    pub registered: Vec<ElementId>,
    /// Elements shown immediately without animating.
    pub snapped: Vec<ElementId>,
    /// Host failures. Affected elements are snapped where possible.
    pub failed: Vec<HostError>,
    pub duplicates: Vec<ElementId>,
    /// The document root carried an editor class; nothing was registered.
    pub bypassed: bool,
}

#[derive(Debug)]
struct Entry {
    params: RevealParams,
    phase: Phase,
}

/// Schedules one-shot reveal animations and staggers those triggered together.
///
/// Owns its grouping state, so independent page regions can use independent
/// schedulers. All methods are meant to be called from a single thread, in the
/// order the host observes events.
pub struct RevealScheduler<C: Clock> {
    config: RevealConfig,
    clock: C,
    elements: BTreeMap<ElementId, Entry>,
    grouping: GroupingState,
    offset_px: f64,
    scanned: bool,
    bus: EventBus,
    metrics: Metrics,
}

impl<C: Clock> RevealScheduler<C> {
    pub fn new(config: RevealConfig, clock: C) -> Self {
        let grouping = GroupingState::new(config.reset_window_s);
        let offset_px = config.offsets.wide_px;
        Self {
            config,
            clock,
            elements: BTreeMap::new(),
            grouping,
            offset_px,
            scanned: false,
            bus: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn with_defaults(clock: C) -> Self {
        Self::new(RevealConfig::standard(), clock)
    }

    /// Enumerates opted-in elements once.
    ///
    /// Elements already scrolled past (bottom edge above the viewport) never
    /// receive an enter event, so they are snapped to their final state here.
    /// Everything else gets a one-shot trigger. A failure on one element is
    /// recorded in the report and does not stop the scan.
    pub fn scan<I, H>(
        &mut self,
        elements: I,
        ctx: &ScanContext,
        host: &mut H,
    ) -> Result<ScanReport, RevealError>
    where
        I: IntoIterator<Item = ScannedElement>,
        H: TriggerRegistry + AnimationEngine + ?Sized,
    {
        if self.scanned {
            return Err(RevealError::AlreadyScanned);
        }
        self.scanned = true;
        self.on_resize(ctx.viewport);

        let now = self.clock.now();
        let bypassed = self
            .config
            .bypasses(ctx.root_classes.iter().map(String::as_str));
        let spec = TriggerSpec {
            start_fraction: self.config.start_fraction,
            once: true,
        };
        let mut report = ScanReport {
            bypassed,
            ..ScanReport::default()
        };
        if bypassed {
            debug!("root class disables reveals, showing all elements");
            self.bus.emit(now, "bypass", "root class disables reveals");
        }

        for element in elements {
            let id = element.id;
            if self.elements.contains_key(&id) {
                warn!(element = %id, "element scanned twice, ignoring");
                report.duplicates.push(id);
                continue;
            }

            let (params, fallbacks) = RevealParams::derive(&element.attrs, &self.config);
            for fallback in fallbacks {
                warn!(
                    element = %id,
                    attribute = fallback.attribute,
                    raw = %fallback.raw,
                    "unusable attribute value, using default"
                );
                self.metrics.inc("reveal.attr_fallbacks");
                self.bus.emit_for(
                    now,
                    "fallback",
                    id,
                    format!("{}={:?}", fallback.attribute, fallback.raw),
                );
            }

            let registered = if bypassed || element.rect.is_above_viewport() {
                false
            } else {
                match host.register(id, spec) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(element = %id, error = %err, "trigger registration failed");
                        self.metrics.inc("reveal.host_errors");
                        report.failed.push(err);
                        false
                    }
                }
            };

            if registered {
                self.elements.insert(
                    id,
                    Entry {
                        params,
                        phase: Phase::Pending,
                    },
                );
                self.metrics.inc("reveal.registered");
                self.metrics.add_gauge("reveal.pending", 1);
                report.registered.push(id);
                continue;
            }

            // Unregistered elements would stay hidden forever; show them now.
            self.elements.insert(
                id,
                Entry {
                    params,
                    phase: Phase::Settled,
                },
            );
            match host.set(id, &Keyframe::settled()) {
                Ok(()) => {
                    self.metrics.inc("reveal.snapped");
                    self.bus.emit_for(now, "snap", id, "shown without animation");
                    report.snapped.push(id);
                }
                Err(err) => {
                    warn!(element = %id, error = %err, "could not show element");
                    self.metrics.inc("reveal.host_errors");
                    report.failed.push(err);
                }
            }
        }

        debug!(
            registered = report.registered.len(),
            snapped = report.snapped.len(),
            failed = report.failed.len(),
            "reveal scan complete"
        );
        self.bus.emit(
            now,
            "scan",
            format!(
                "registered={} snapped={}",
                report.registered.len(),
                report.snapped.len()
            ),
        );
        Ok(report)
    }

    /// Handles a visibility trigger for `id`.
    ///
    /// Elements without an explicit delay take the next stagger slot of the
    /// current trigger group; an explicit delay is used verbatim. The element is
    /// marked triggered before the engine is called, so a failing engine or a
    /// repeated trigger can never start a second animation. If the engine
    /// rejects the tween, the element is snapped to its final state.
    pub fn on_enter<E>(&mut self, id: ElementId, engine: &mut E) -> Result<TriggerOutcome, RevealError>
    where
        E: AnimationEngine + ?Sized,
    {
        let now = self.clock.now();
        let entry = self
            .elements
            .get_mut(&id)
            .ok_or(RevealError::UnknownElement(id))?;
        if entry.phase != Phase::Pending {
            self.metrics.inc("reveal.repeat_triggers");
            return Ok(TriggerOutcome::AlreadyTriggered);
        }
        let params = entry.params;
        entry.phase = Phase::Settled;
        self.metrics.add_gauge("reveal.pending", -1);

        if self.grouping.observe(now) {
            self.metrics.inc("reveal.groups");
        }
        let (delay_s, group_slot) = match params.delay_s {
            Some(delay) => (delay, None),
            None => {
                let slot = self.grouping.claim_slot();
                (f64::from(slot) * params.group_step_s, Some(slot))
            }
        };

        let Some(kind) = params.kind else {
            debug!(element = %id, "no keyframes for kind, marking triggered");
            self.metrics.inc("reveal.inert");
            self.bus.emit_for(now, "inert", id, "unrecognized kind");
            return Ok(TriggerOutcome::Inert);
        };

        let (from, to) = kind.keyframes(self.offset_px);
        let tween = Tween {
            element: id,
            from,
            to,
            duration_s: params.duration_s,
            delay_s,
            ease: self.config.ease,
            group_slot,
            triggered_at: now,
        };

        if let Err(err) = engine.animate(&tween) {
            warn!(element = %id, error = %err, "animation engine rejected reveal");
            self.metrics.inc("reveal.host_errors");
            // Never leave a rejected element hidden.
            match engine.set(id, &Keyframe::settled()) {
                Ok(()) => {
                    self.metrics.inc("reveal.snapped");
                    self.bus.emit_for(now, "snap", id, "shown after engine failure");
                }
                Err(snap_err) => {
                    warn!(element = %id, error = %snap_err, "could not show element");
                    self.metrics.inc("reveal.host_errors");
                }
            }
            return Err(err.into());
        }

        self.set_phase(id, Phase::Animating);
        self.metrics.inc("reveal.started");
        self.metrics.record("reveal.delay_ms", (delay_s * 1000.0).round() as i64);
        debug!(
            element = %id,
            kind = kind.attr_value(),
            delay_s,
            slot = ?group_slot,
            "reveal started"
        );
        self.bus.emit_for(
            now,
            "start",
            id,
            format!("{} delay={delay_s:.3}s", kind.attr_value()),
        );
        Ok(TriggerOutcome::Started(tween))
    }

    /// Records that the engine finished animating `id`.
    ///
    /// Returns `false` if the element was not animating.
    pub fn finish(&mut self, id: ElementId) -> bool {
        match self.elements.get(&id).map(|e| e.phase) {
            Some(Phase::Animating) => {
                self.set_phase(id, Phase::Settled);
                self.metrics.inc("reveal.settled");
                true
            }
            _ => false,
        }
    }

    /// Recomputes the shared start offset for the new viewport width.
    ///
    /// Applies to every reveal started afterwards; running tweens keep the
    /// offset they started with.
    pub fn on_resize(&mut self, viewport: Viewport) {
        let offset_px = self.config.offsets.magnitude(viewport.width);
        if offset_px != self.offset_px {
            debug!(width = viewport.width, offset_px, "reveal offset changed");
            self.offset_px = offset_px;
        }
    }

    fn set_phase(&mut self, id: ElementId, phase: Phase) {
        if let Some(entry) = self.elements.get_mut(&id) {
            entry.phase = phase;
        }
    }

    pub fn phase(&self, id: ElementId) -> Option<Phase> {
        self.elements.get(&id).map(|e| e.phase)
    }

    pub fn params(&self, id: ElementId) -> Option<RevealParams> {
        self.elements.get(&id).map(|e| e.params)
    }

    pub fn pending(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(|(_, e)| e.phase == Phase::Pending)
            .map(|(id, _)| *id)
    }

    pub fn offset_px(&self) -> f64 {
        self.offset_px
    }

    pub fn grouping(&self) -> &GroupingState {
        &self.grouping
    }

    pub fn reset_grouping(&mut self) {
        self.grouping.reset();
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn events(&self) -> &[TraceEvent] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<TraceEvent> {
        self.bus.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, RevealScheduler, TriggerOutcome};
    use crate::attrs::RawAttributes;
    use crate::config::RevealConfig;
    use crate::error::{HostError, RevealError};
    use crate::host::{AnimationEngine, ScanContext, ScannedElement, TriggerRegistry, TriggerSpec, Tween};
    use crate::kind::Keyframe;
    use foundation::bounds::{Rect, Viewport};
    use foundation::ids::ElementId;
    use foundation::time::{ManualClock, Time};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        registered: Vec<(ElementId, TriggerSpec)>,
        tweens: Vec<Tween>,
        sets: Vec<(ElementId, Keyframe)>,
        refuse_register: Vec<ElementId>,
        refuse_animate: Vec<ElementId>,
        refuse_set: Vec<ElementId>,
    }

    impl TriggerRegistry for Recorder {
        fn register(&mut self, element: ElementId, spec: TriggerSpec) -> Result<(), HostError> {
            if self.refuse_register.contains(&element) {
                return Err(HostError::Detached(element));
            }
            self.registered.push((element, spec));
            Ok(())
        }
    }

    impl AnimationEngine for Recorder {
        fn animate(&mut self, tween: &Tween) -> Result<(), HostError> {
            if self.refuse_animate.contains(&tween.element) {
                return Err(HostError::rejected(tween.element, "no layout"));
            }
            self.tweens.push(tween.clone());
            Ok(())
        }

        fn set(&mut self, element: ElementId, state: &Keyframe) -> Result<(), HostError> {
            if self.refuse_set.contains(&element) {
                return Err(HostError::Detached(element));
            }
            self.sets.push((element, *state));
            Ok(())
        }
    }

    fn id(n: u64) -> ElementId {
        ElementId::new(n)
    }

    fn below_fold(n: u64, attrs: RawAttributes) -> ScannedElement {
        ScannedElement {
            id: id(n),
            attrs,
            rect: Rect::from_top_height(1000.0 + n as f64 * 50.0, 40.0),
        }
    }

    fn desktop() -> ScanContext {
        ScanContext::new(Viewport::new(1280.0, 800.0))
    }

    fn scanned(
        elements: Vec<ScannedElement>,
        ctx: &ScanContext,
    ) -> (RevealScheduler<ManualClock>, ManualClock, Recorder) {
        let clock = ManualClock::new();
        let mut sched = RevealScheduler::with_defaults(clock.clone());
        let mut host = Recorder::default();
        sched.scan(elements, ctx, &mut host).unwrap();
        (sched, clock, host)
    }

    fn delays(rec: &Recorder) -> Vec<f64> {
        rec.tweens.iter().map(|t| t.delay_s).collect()
    }

    #[test]
    fn registers_one_shot_trigger_at_ninety_percent() {
        let (_, _, host) = scanned(
            vec![below_fold(1, RawAttributes::with_kind("fade"))],
            &desktop(),
        );
        assert_eq!(
            host.registered,
            vec![(
                id(1),
                TriggerSpec {
                    start_fraction: 0.9,
                    once: true
                }
            )]
        );
    }

    #[test]
    fn three_quick_triggers_stagger_by_default_step() {
        let elements = (1..=3)
            .map(|n| below_fold(n, RawAttributes::with_kind("fadeslide-up")))
            .collect();
        let (mut sched, clock, mut rec) = scanned(elements, &desktop());

        clock.set(Time(2.0));
        for (n, step) in [(1, 0.0), (2, 0.02), (3, 0.03)] {
            clock.advance(step);
            sched.on_enter(id(n), &mut rec).unwrap();
        }

        assert_eq!(delays(&rec), vec![0.0, 0.1, 0.2]);
        for tween in &rec.tweens {
            assert_eq!(tween.from, Keyframe::opacity(0.0).with_y(75.0));
            assert_eq!(tween.to, Keyframe::opacity(1.0).with_y(0.0));
            assert_eq!(tween.duration_s, 0.75);
            assert_eq!(tween.ease, crate::easing::Easing::QuadOut);
        }
        assert_eq!(sched.grouping().member_count(), 3);
    }

    #[test]
    fn narrow_viewport_uses_smaller_offset() {
        let ctx = ScanContext::new(Viewport::new(375.0, 700.0));
        let (mut sched, _, mut rec) = scanned(
            vec![below_fold(1, RawAttributes::with_kind("fadeslide-in-left"))],
            &ctx,
        );
        sched.on_enter(id(1), &mut rec).unwrap();
        assert_eq!(rec.tweens[0].from.x, Some(-40.0));
    }

    #[test]
    fn late_trigger_starts_a_new_group() {
        let elements = (1..=2)
            .map(|n| below_fold(n, RawAttributes::with_kind("fade")))
            .collect();
        let (mut sched, clock, mut rec) = scanned(elements, &desktop());

        sched.on_enter(id(1), &mut rec).unwrap();
        clock.advance(0.15);
        sched.on_enter(id(2), &mut rec).unwrap();

        assert_eq!(delays(&rec), vec![0.0, 0.0]);
        assert_eq!(rec.tweens[1].group_slot, Some(0));
        assert_eq!(sched.grouping().groups_started(), 2);
    }

    #[test]
    fn explicit_delay_bypasses_stagger() {
        let elements = vec![
            below_fold(1, RawAttributes::with_kind("fade")),
            below_fold(2, RawAttributes::with_kind("fade").delay("400")),
            below_fold(3, RawAttributes::with_kind("fade")),
        ];
        let (mut sched, _, mut rec) = scanned(elements, &desktop());
        for n in 1..=3 {
            sched.on_enter(id(n), &mut rec).unwrap();
        }
        assert_eq!(delays(&rec), vec![0.0, 0.4, 0.1]);
        assert_eq!(rec.tweens[1].group_slot, None);
    }

    #[test]
    fn custom_group_step_scales_the_slot() {
        let elements = vec![
            below_fold(1, RawAttributes::with_kind("fade").group_delay("0.25")),
            below_fold(2, RawAttributes::with_kind("fade").group_delay("250")),
        ];
        let (mut sched, _, mut rec) = scanned(elements, &desktop());
        sched.on_enter(id(1), &mut rec).unwrap();
        sched.on_enter(id(2), &mut rec).unwrap();
        assert_eq!(delays(&rec), vec![0.0, 0.25]);
    }

    #[test]
    fn second_trigger_never_reanimates() {
        let (mut sched, clock, mut rec) = scanned(
            vec![below_fold(1, RawAttributes::with_kind("fade"))],
            &desktop(),
        );
        assert!(matches!(
            sched.on_enter(id(1), &mut rec),
            Ok(TriggerOutcome::Started(_))
        ));
        clock.advance(5.0);
        assert_eq!(
            sched.on_enter(id(1), &mut rec),
            Ok(TriggerOutcome::AlreadyTriggered)
        );
        assert_eq!(rec.tweens.len(), 1);
        assert_eq!(sched.metrics().counter("reveal.repeat_triggers"), 1);
    }

    #[test]
    fn element_above_viewport_is_snapped_without_trigger() {
        let above = ScannedElement {
            id: id(7),
            attrs: RawAttributes::with_kind("fadeslide-up"),
            rect: Rect::from_top_height(-300.0, 120.0),
        };
        let (sched, _, host) = scanned(vec![above], &desktop());
        assert!(host.registered.is_empty());
        assert_eq!(host.sets, vec![(id(7), Keyframe::settled())]);
        assert_eq!(sched.phase(id(7)), Some(Phase::Settled));
    }

    #[test]
    fn partially_visible_element_still_animates() {
        let straddling = ScannedElement {
            id: id(8),
            attrs: RawAttributes::with_kind("fade"),
            rect: Rect::from_top_height(-50.0, 120.0),
        };
        let (sched, _, host) = scanned(vec![straddling], &desktop());
        assert_eq!(host.registered.len(), 1);
        assert_eq!(sched.phase(id(8)), Some(Phase::Pending));
    }

    #[test]
    fn unknown_kind_is_inert_but_consumes_its_slot() {
        let elements = vec![
            below_fold(1, RawAttributes::with_kind("wobble")),
            below_fold(2, RawAttributes::with_kind("fade")),
        ];
        let (mut sched, _, mut rec) = scanned(elements, &desktop());
        assert_eq!(sched.on_enter(id(1), &mut rec), Ok(TriggerOutcome::Inert));
        assert_eq!(sched.phase(id(1)), Some(Phase::Settled));
        sched.on_enter(id(2), &mut rec).unwrap();
        assert_eq!(delays(&rec), vec![0.1]);
    }

    #[test]
    fn resize_updates_offset_for_later_reveals() {
        let elements = (1..=2)
            .map(|n| below_fold(n, RawAttributes::with_kind("fadeslide-in-right")))
            .collect();
        let (mut sched, _, mut rec) = scanned(elements, &desktop());
        sched.on_enter(id(1), &mut rec).unwrap();
        sched.on_resize(Viewport::new(480.0, 800.0));
        assert_eq!(sched.offset_px(), 40.0);
        sched.on_enter(id(2), &mut rec).unwrap();
        assert_eq!(rec.tweens[0].from.x, Some(75.0));
        assert_eq!(rec.tweens[1].from.x, Some(40.0));
    }

    #[test]
    fn editor_mode_snaps_everything() {
        let ctx = desktop().with_root_classes(["w-mod-js", "w-editor"]);
        let (sched, _, host) = scanned(
            vec![
                below_fold(1, RawAttributes::with_kind("fade")),
                below_fold(2, RawAttributes::with_kind("fadeslide-up")),
            ],
            &ctx,
        );
        assert!(host.registered.is_empty());
        assert_eq!(host.sets.len(), 2);
        assert_eq!(sched.pending().count(), 0);
    }

    #[test]
    fn one_failing_element_does_not_block_others() {
        let clock = ManualClock::new();
        let mut sched = RevealScheduler::with_defaults(clock.clone());
        let mut engine = Recorder {
            refuse_register: vec![id(1)],
            refuse_animate: vec![id(2)],
            ..Recorder::default()
        };
        let elements = (1..=3)
            .map(|n| below_fold(n, RawAttributes::with_kind("fade")))
            .collect::<Vec<_>>();
        let report = sched.scan(elements, &desktop(), &mut engine).unwrap();

        assert_eq!(report.failed, vec![HostError::Detached(id(1))]);
        assert_eq!(report.snapped, vec![id(1)]);
        assert_eq!(report.registered, vec![id(2), id(3)]);

        assert!(matches!(
            sched.on_enter(id(2), &mut engine),
            Err(RevealError::Host(_))
        ));
        assert_eq!(sched.phase(id(2)), Some(Phase::Settled));
        // The rejected element is shown rather than left hidden.
        assert_eq!(
            engine.sets,
            vec![(id(1), Keyframe::settled()), (id(2), Keyframe::settled())]
        );
        assert_eq!(
            sched.on_enter(id(2), &mut engine),
            Ok(TriggerOutcome::AlreadyTriggered)
        );
        sched.on_enter(id(3), &mut engine).unwrap();
        assert_eq!(engine.tweens.len(), 1);
        assert_eq!(engine.tweens[0].element, id(3));
    }

    #[test]
    fn failed_snap_after_engine_failure_is_counted() {
        let clock = ManualClock::new();
        let mut sched = RevealScheduler::with_defaults(clock.clone());
        let mut engine = Recorder {
            refuse_animate: vec![id(1)],
            refuse_set: vec![id(1)],
            ..Recorder::default()
        };
        sched
            .scan(
                vec![below_fold(1, RawAttributes::with_kind("fade"))],
                &desktop(),
                &mut engine,
            )
            .unwrap();
        assert!(sched.on_enter(id(1), &mut engine).is_err());
        assert!(engine.sets.is_empty());
        assert_eq!(sched.metrics().counter("reveal.host_errors"), 2);
    }

    #[test]
    fn scan_runs_once_and_unknown_ids_are_rejected() {
        let (mut sched, _, mut engine) = scanned(Vec::new(), &desktop());
        assert_eq!(
            sched.scan(Vec::new(), &desktop(), &mut engine),
            Err(RevealError::AlreadyScanned)
        );
        assert_eq!(
            sched.on_enter(id(99), &mut engine),
            Err(RevealError::UnknownElement(id(99)))
        );
    }

    #[test]
    fn finish_settles_animating_elements_only() {
        let (mut sched, _, mut rec) = scanned(
            vec![below_fold(1, RawAttributes::with_kind("fade"))],
            &desktop(),
        );
        assert!(!sched.finish(id(1)));
        sched.on_enter(id(1), &mut rec).unwrap();
        assert_eq!(sched.phase(id(1)), Some(Phase::Animating));
        assert!(sched.finish(id(1)));
        assert_eq!(sched.phase(id(1)), Some(Phase::Settled));
        assert!(!sched.finish(id(1)));
    }

    #[test]
    fn loose_preset_groups_over_wider_window() {
        let clock = ManualClock::new();
        let mut sched = RevealScheduler::new(RevealConfig::loose(), clock.clone());
        let mut engine = Recorder::default();
        let elements = (1..=2)
            .map(|n| below_fold(n, RawAttributes::with_kind("fade")))
            .collect::<Vec<_>>();
        sched.scan(elements, &desktop(), &mut engine).unwrap();
        assert_eq!(engine.registered[0].1.start_fraction, 0.8);

        sched.on_enter(id(1), &mut engine).unwrap();
        clock.advance(0.2);
        sched.on_enter(id(2), &mut engine).unwrap();
        assert_eq!(delays(&engine), vec![0.0, 0.1]);
    }

    #[test]
    fn malformed_attributes_are_traced() {
        let (sched, _, _) = scanned(
            vec![below_fold(1, RawAttributes::with_kind("fade").duration("quick"))],
            &desktop(),
        );
        assert_eq!(sched.metrics().counter("reveal.attr_fallbacks"), 1);
        let fallback: Vec<_> = sched.events().iter().filter(|e| e.kind == "fallback").collect();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].element, Some(id(1)));
        assert_eq!(sched.params(id(1)).unwrap().duration_s, 0.75);
    }
}
