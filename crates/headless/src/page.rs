use std::collections::BTreeMap;

use foundation::bounds::{Rect, Viewport};
use foundation::ids::ElementId;
use foundation::time::Time;
use reveal::{
    AnimationEngine, HostError, Keyframe, RawAttributes, ScanContext, ScannedElement,
    TriggerRegistry, TriggerSpec, Tween,
};
use serde::Deserialize;

use crate::error::SimError;

/// Page description as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSpec {
    pub viewport: Viewport,
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default)]
    pub root_classes: Vec<String>,
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElementSpec {
    /// Distance from the top of the document (px).
    pub top: f64,
    pub height: f64,
    #[serde(flatten)]
    pub attrs: RawAttributes,
}

impl PageSpec {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|e| SimError::Parse {
            what: "page",
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageElement {
    pub id: ElementId,
    pub doc_top: f64,
    pub height: f64,
    pub attrs: RawAttributes,
}

/// Simulated document with a scrollable viewport.
///
/// Implements both host traits: armed triggers fire from [`HeadlessPage::take_crossed`]
/// and every engine call is recorded.
#[derive(Debug)]
pub struct HeadlessPage {
    viewport: Viewport,
    scroll_y: f64,
    root_classes: Vec<String>,
    /// Document order: by top edge, then id.
    elements: Vec<PageElement>,
    armed: BTreeMap<ElementId, TriggerSpec>,
    tweens: Vec<Tween>,
    sets: Vec<(ElementId, Keyframe)>,
}

impl HeadlessPage {
    pub fn new(viewport: Viewport, mut elements: Vec<PageElement>) -> Self {
        elements.sort_by(|a, b| a.doc_top.total_cmp(&b.doc_top).then(a.id.cmp(&b.id)));
        Self {
            viewport,
            scroll_y: 0.0,
            root_classes: Vec::new(),
            elements,
            armed: BTreeMap::new(),
            tweens: Vec::new(),
            sets: Vec::new(),
        }
    }

    /// Ids are assigned in the order elements appear in the page description.
    pub fn from_spec(spec: &PageSpec) -> Self {
        let elements = spec
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| PageElement {
                id: ElementId::new(i as u64 + 1),
                doc_top: e.top,
                height: e.height,
                attrs: e.attrs.clone(),
            })
            .collect();
        let mut page = Self::new(spec.viewport, elements);
        page.scroll_y = spec.scroll_y.max(0.0);
        page.root_classes = spec.root_classes.clone();
        page
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn rect_of(&self, element: &PageElement) -> Rect {
        Rect::new(
            0.0,
            element.doc_top - self.scroll_y,
            self.viewport.width,
            element.doc_top - self.scroll_y + element.height,
        )
    }

    /// Elements as the scheduler sees them at the current scroll position.
    pub fn scanned_elements(&self) -> Vec<ScannedElement> {
        self.elements
            .iter()
            .map(|e| ScannedElement {
                id: e.id,
                attrs: e.attrs.clone(),
                rect: self.rect_of(e),
            })
            .collect()
    }

    pub fn scan_context(&self) -> ScanContext {
        ScanContext::new(self.viewport).with_root_classes(self.root_classes.iter().cloned())
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Fires every armed trigger whose element top is at or above its trigger
    /// line, in document order. Elements jumped past in a single scroll count as
    /// crossed. One-shot triggers are disarmed.
    pub fn take_crossed(&mut self) -> Vec<ElementId> {
        let mut fired = Vec::new();
        for element in &self.elements {
            let Some(spec) = self.armed.get(&element.id) else {
                continue;
            };
            let top = element.doc_top - self.scroll_y;
            if top <= self.viewport.line_at(spec.start_fraction) {
                fired.push((element.id, spec.once));
            }
        }
        for (id, once) in &fired {
            if *once {
                self.armed.remove(id);
            }
        }
        fired.into_iter().map(|(id, _)| id).collect()
    }

    pub fn armed(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.armed.keys().copied()
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Elements shown immediately, in call order.
    pub fn snapped(&self) -> Vec<ElementId> {
        self.sets.iter().map(|(id, _)| *id).collect()
    }

    /// Ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    /// Rendered state of `id` at `now`: a snap wins, then a running or finished
    /// tween. `None` means the element still shows its initial hidden style.
    pub fn state_of(&self, id: ElementId, now: Time) -> Option<Keyframe> {
        if let Some((_, state)) = self.sets.iter().rev().find(|(e, _)| *e == id) {
            return Some(*state);
        }
        self.tweens
            .iter()
            .rev()
            .find(|t| t.element == id)
            .map(|t| t.state_at(now))
    }

    fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|e| e.id == id)
    }
}

impl TriggerRegistry for HeadlessPage {
    fn register(&mut self, element: ElementId, spec: TriggerSpec) -> Result<(), HostError> {
        if !self.contains(element) {
            return Err(HostError::Detached(element));
        }
        self.armed.insert(element, spec);
        Ok(())
    }
}

impl AnimationEngine for HeadlessPage {
    fn animate(&mut self, tween: &Tween) -> Result<(), HostError> {
        if !self.contains(tween.element) {
            return Err(HostError::Detached(tween.element));
        }
        self.tweens.push(tween.clone());
        Ok(())
    }

    fn set(&mut self, element: ElementId, state: &Keyframe) -> Result<(), HostError> {
        if !self.contains(element) {
            return Err(HostError::Detached(element));
        }
        self.sets.push((element, *state));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadlessPage, PageSpec};
    use foundation::ids::ElementId;
    use foundation::time::Time;
    use reveal::{
        AnimationEngine, Easing, Keyframe, RawAttributes, TriggerRegistry, TriggerSpec, Tween,
    };
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "viewport": { "width": 1280, "height": 1000 },
        "elements": [
            { "top": 2000, "height": 100, "kind": "fade" },
            { "top": 1200, "height": 100, "kind": "fadeslide-up", "duration": "800" }
        ]
    }"#;

    fn spec() -> TriggerSpec {
        TriggerSpec {
            start_fraction: 0.9,
            once: true,
        }
    }

    #[test]
    fn loads_spec_and_orders_by_document_position() {
        let page = HeadlessPage::from_spec(&PageSpec::from_json(PAGE).unwrap());
        let scanned = page.scanned_elements();
        assert_eq!(scanned[0].id, ElementId::new(2));
        assert_eq!(
            scanned[0].attrs,
            RawAttributes::with_kind("fadeslide-up").duration("800")
        );
        assert_eq!(scanned[0].rect.top, 1200.0);
        assert_eq!(scanned[1].id, ElementId::new(1));
    }

    #[test]
    fn triggers_fire_once_when_top_reaches_the_line() {
        let mut page = HeadlessPage::from_spec(&PageSpec::from_json(PAGE).unwrap());
        page.register(ElementId::new(1), spec()).unwrap();
        page.register(ElementId::new(2), spec()).unwrap();

        // Line sits at 900px: element 2 (top 1200) needs 300px of scroll.
        page.scroll_to(299.0);
        assert!(page.take_crossed().is_empty());
        page.scroll_to(300.0);
        assert_eq!(page.take_crossed(), vec![ElementId::new(2)]);
        page.scroll_to(320.0);
        assert!(page.take_crossed().is_empty());
    }

    #[test]
    fn jumping_past_elements_fires_them_in_document_order() {
        let mut page = HeadlessPage::from_spec(&PageSpec::from_json(PAGE).unwrap());
        page.register(ElementId::new(1), spec()).unwrap();
        page.register(ElementId::new(2), spec()).unwrap();
        page.scroll_to(5000.0);
        assert_eq!(
            page.take_crossed(),
            vec![ElementId::new(2), ElementId::new(1)]
        );
        assert_eq!(page.armed().count(), 0);
    }

    #[test]
    fn state_follows_recorded_tweens_and_snaps() {
        let mut page = HeadlessPage::from_spec(&PageSpec::from_json(PAGE).unwrap());
        page.animate(&Tween {
            element: ElementId::new(1),
            from: Keyframe::opacity(0.0).with_y(40.0),
            to: Keyframe::opacity(1.0).with_y(0.0),
            duration_s: 1.0,
            delay_s: 0.0,
            ease: Easing::QuadOut,
            group_slot: Some(0),
            triggered_at: Time(0.0),
        })
        .unwrap();
        page.set(ElementId::new(2), &Keyframe::settled()).unwrap();

        let mid = page.state_of(ElementId::new(1), Time(0.5)).unwrap();
        assert_eq!(mid.opacity, 0.75);
        assert_eq!(mid.y, Some(10.0));
        assert_eq!(
            page.state_of(ElementId::new(2), Time(0.0)),
            Some(Keyframe::settled())
        );
        assert_eq!(page.ids().collect::<Vec<_>>(), vec![ElementId::new(2), ElementId::new(1)]);
    }

    #[test]
    fn unknown_elements_are_detached() {
        let mut page = HeadlessPage::from_spec(&PageSpec::from_json(PAGE).unwrap());
        assert!(page.register(ElementId::new(42), spec()).is_err());
    }

    #[test]
    fn malformed_page_is_a_parse_error() {
        let err = PageSpec::from_json(r#"{ "viewport": 3 }"#).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse page"));
    }
}
