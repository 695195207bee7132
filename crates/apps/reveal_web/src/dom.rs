use std::collections::BTreeMap;

use foundation::bounds::{Rect, Viewport};
use foundation::ids::ElementId;
use foundation::time::{Clock, Time};
use js_sys::{Array, Function, Object, Reflect};
use reveal::{
    AnimationEngine, HostError, Keyframe, RawAttributes, ScanContext, ScannedElement,
    TriggerRegistry, TriggerSpec, Tween,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Animation, CssStyleDeclaration, Document, Element, IntersectionObserver,
    IntersectionObserverInit, KeyframeAnimationOptions, Window,
};

/// Attribute written on each scanned element so observer entries map back to ids.
pub const ATTR_ID: &str = "data-anim-id";

const SELECTOR: &str = "[data-anim]";

/// `performance.now()` in seconds.
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
    pub fn new(window: &Window) -> Self {
        Self {
            performance: window.performance(),
        }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Time {
        Time(self.performance.as_ref().map_or(0.0, |p| p.now()) / 1000.0)
    }
}

pub fn viewport(window: &Window) -> Viewport {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width, height)
}

pub fn scan_context(window: &Window, document: &Document) -> ScanContext {
    let classes = document
        .document_element()
        .map(|root| root.class_name())
        .unwrap_or_default();
    ScanContext::new(viewport(window)).with_root_classes(classes.split_whitespace())
}

/// Collects `[data-anim]` elements in document order and tags them with ids.
pub fn collect_elements(document: &Document) -> Result<Vec<(ElementId, Element)>, JsValue> {
    let nodes = document.query_selector_all(SELECTOR)?;
    let mut out = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let id = ElementId::new(u64::from(i) + 1);
        element.set_attribute(ATTR_ID, &id.get().to_string())?;
        out.push((id, element));
    }
    Ok(out)
}

pub fn scanned(id: ElementId, element: &Element) -> ScannedElement {
    let r = element.get_bounding_client_rect();
    ScannedElement {
        id,
        attrs: RawAttributes::from_lookup(|name| element.get_attribute(name)),
        rect: Rect::new(r.left(), r.top(), r.right(), r.bottom()),
    }
}

pub fn element_id(element: &Element) -> Option<ElementId> {
    element
        .get_attribute(ATTR_ID)
        .and_then(|raw| raw.parse().ok())
        .map(ElementId::new)
}

/// Root margin that shrinks the viewport's bottom edge up to the trigger line.
pub fn root_margin(start_fraction: f64) -> String {
    let inset = ((1.0 - start_fraction) * 100.0).max(0.0);
    let inset = (inset * 1000.0).round() / 1000.0;
    format!("0px 0px -{inset}% 0px")
}

/// Whether an observed element should fire: inside the trigger band, or with
/// its top edge at or above the trigger line (jumped past between callbacks).
pub fn crossed(is_intersecting: bool, top: f64, line: f64) -> bool {
    is_intersecting || top <= line
}

/// Options object for a passive event listener.
pub fn passive_listener_options() -> Result<AddEventListenerOptions, JsValue> {
    let options = Object::new();
    put(&options, "passive", &JsValue::TRUE)?;
    Ok(options.unchecked_into())
}

fn put(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn keyframe_object(state: &Keyframe) -> Result<Object, JsValue> {
    let obj = Object::new();
    put(&obj, "opacity", &JsValue::from_f64(state.opacity))?;
    put(&obj, "transform", &JsValue::from_str(&state.css_transform()))?;
    Ok(obj)
}

fn style_of(element: &Element) -> Result<CssStyleDeclaration, JsValue> {
    // Both HTML and SVG elements expose `style`.
    Ok(Reflect::get(element, &JsValue::from_str("style"))?.unchecked_into())
}

/// Page host backed by the live DOM.
pub struct DomHost {
    elements: BTreeMap<ElementId, Element>,
    observer: IntersectionObserver,
    start_fraction: f64,
}

impl DomHost {
    pub fn new(
        elements: &[(ElementId, Element)],
        callback: &Function,
        start_fraction: f64,
    ) -> Result<Self, JsValue> {
        let init: IntersectionObserverInit = Object::new().unchecked_into();
        put(&init, "rootMargin", &JsValue::from_str(&root_margin(start_fraction)))?;
        put(&init, "threshold", &JsValue::from_f64(0.0))?;
        let observer = IntersectionObserver::new_with_options(callback, &init)?;
        Ok(Self {
            elements: elements.iter().cloned().collect(),
            observer,
            start_fraction,
        })
    }

    /// Stops observing `element` (one-shot triggers fire once).
    pub fn disarm(&self, element: &Element) {
        self.observer.unobserve(element);
    }

    pub fn disarm_id(&self, id: ElementId) {
        if let Some(element) = self.elements.get(&id) {
            self.disarm(element);
        }
    }

    /// Current top edge of `id` in viewport pixels.
    pub fn top_of(&self, id: ElementId) -> Option<f64> {
        self.elements
            .get(&id)
            .map(|e| e.get_bounding_client_rect().top())
    }

    pub fn start_fraction(&self) -> f64 {
        self.start_fraction
    }

    fn element(&self, id: ElementId) -> Result<&Element, HostError> {
        self.elements.get(&id).ok_or(HostError::Detached(id))
    }
}

impl TriggerRegistry for DomHost {
    fn register(&mut self, element: ElementId, spec: TriggerSpec) -> Result<(), HostError> {
        if spec.start_fraction != self.start_fraction {
            return Err(HostError::rejected(
                element,
                "observer was created for a different trigger line",
            ));
        }
        let el = self.element(element)?;
        self.observer.observe(el);
        Ok(())
    }
}

impl AnimationEngine for DomHost {
    fn animate(&mut self, tween: &Tween) -> Result<(), HostError> {
        let el = self.element(tween.element)?;
        let js_err = |e: JsValue| HostError::rejected(tween.element, format!("{e:?}"));

        let frames = Array::new();
        frames.push(&JsValue::from(keyframe_object(&tween.from).map_err(js_err)?));
        frames.push(&JsValue::from(keyframe_object(&tween.to).map_err(js_err)?));

        let options = Object::new();
        let duration_ms = JsValue::from_f64(tween.duration_s * 1000.0);
        let delay_ms = JsValue::from_f64(tween.delay_s * 1000.0);
        put(&options, "duration", &duration_ms).map_err(js_err)?;
        put(&options, "delay", &delay_ms).map_err(js_err)?;
        put(&options, "easing", &JsValue::from_str(tween.ease.css())).map_err(js_err)?;
        put(&options, "fill", &JsValue::from_str("both")).map_err(js_err)?;
        let options: KeyframeAnimationOptions = options.unchecked_into();

        let animation: Animation =
            el.animate_with_keyframe_animation_options(Some(frames.unchecked_ref::<Object>()), &options);
        let finished = animation.finished().map_err(js_err)?;
        crate::watch_finish(tween.element, finished);
        Ok(())
    }

    fn set(&mut self, element: ElementId, state: &Keyframe) -> Result<(), HostError> {
        let el = self.element(element)?;
        let js_err = |e: JsValue| HostError::rejected(element, format!("{e:?}"));
        let style = style_of(el).map_err(js_err)?;
        style
            .set_property("opacity", &state.opacity.to_string())
            .map_err(js_err)?;
        style
            .set_property("transform", &state.css_transform())
            .map_err(js_err)?;
        Ok(())
    }
}
