use console_error_panic_hook::set_once;
use foundation::ids::ElementId;
use js_sys::{Array, Promise};
use reveal::{RevealConfig, RevealScheduler, TriggerOutcome};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{IntersectionObserver, IntersectionObserverEntry};

mod dom;
use dom::{DomHost, PerformanceClock};

struct RevealState {
    scheduler: RevealScheduler<PerformanceClock>,
    host: DomHost,
    _on_intersect: Closure<dyn FnMut(Array, IntersectionObserver)>,
    _on_resize: Closure<dyn FnMut()>,
    _on_scroll: Closure<dyn FnMut()>,
}

thread_local! {
    static STATE: RefCell<Option<RevealState>> = RefCell::new(None);
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn log_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Scans the document with the standard configuration.
#[wasm_bindgen]
pub fn init_scroll_animations() -> Result<(), JsValue> {
    init(RevealConfig::standard())
}

/// Scans the document with a JSON configuration (a preset name is also accepted).
#[wasm_bindgen]
pub fn init_scroll_animations_with_config(config: &str) -> Result<(), JsValue> {
    let config = match RevealConfig::preset(config.trim()) {
        Some(preset) => preset,
        None => RevealConfig::from_json(config).map_err(|e| JsValue::from_str(&e.to_string()))?,
    };
    init(config)
}

fn init(config: RevealConfig) -> Result<(), JsValue> {
    if STATE.with(|state| state.borrow().is_some()) {
        return Err(JsValue::from_str("scroll animations already initialized"));
    }
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let elements = dom::collect_elements(&document)?;
    let scanned: Vec<_> = elements
        .iter()
        .map(|(id, element)| dom::scanned(*id, element))
        .collect();
    let ctx = dom::scan_context(&window, &document);

    let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        |entries: Array, _observer: IntersectionObserver| handle_entries(&entries),
    );
    let mut host = DomHost::new(
        &elements,
        on_intersect.as_ref().unchecked_ref(),
        config.start_fraction,
    )?;

    let on_resize = Closure::<dyn FnMut()>::new(|| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let viewport = dom::viewport(&window);
        STATE.with(|state| {
            if let Some(s) = state.borrow_mut().as_mut() {
                s.scheduler.on_resize(viewport);
            }
        });
        fire_crossed();
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

    // The observer stays silent when an element jumps from below the viewport
    // to above it, so scrolling also checks pending elements against the line.
    let on_scroll = Closure::<dyn FnMut()>::new(fire_crossed);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        on_scroll.as_ref().unchecked_ref(),
        &dom::passive_listener_options()?,
    )?;

    let mut scheduler = RevealScheduler::new(config, PerformanceClock::new(&window));
    let report = scheduler
        .scan(scanned, &ctx, &mut host)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    for err in &report.failed {
        log_error(&format!("reveal: {err}"));
    }
    log(&format!(
        "reveal: {} registered, {} shown immediately{}",
        report.registered.len(),
        report.snapped.len(),
        if report.bypassed { " (editor bypass)" } else { "" }
    ));

    STATE.with(|state| {
        *state.borrow_mut() = Some(RevealState {
            scheduler,
            host,
            _on_intersect: on_intersect,
            _on_resize: on_resize,
            _on_scroll: on_scroll,
        });
    });
    Ok(())
}

fn handle_entries(entries: &Array) {
    STATE.with(|state| {
        let mut guard = state.borrow_mut();
        let Some(s) = guard.as_mut() else {
            return;
        };
        let line = web_sys::window()
            .map(|w| dom::viewport(&w).line_at(s.host.start_fraction()))
            .unwrap_or(f64::INFINITY);
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !dom::crossed(entry.is_intersecting(), entry.bounding_client_rect().top(), line) {
                continue;
            }
            let target = entry.target();
            s.host.disarm(&target);
            let Some(id) = dom::element_id(&target) else {
                continue;
            };
            fire(s, id);
        }
    });
}

/// Fires every pending element whose top edge is at or above the trigger line.
fn fire_crossed() {
    STATE.with(|state| {
        let mut guard = state.borrow_mut();
        let Some(s) = guard.as_mut() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let line = dom::viewport(&window).line_at(s.host.start_fraction());
        let due: Vec<ElementId> = s
            .scheduler
            .pending()
            .filter(|id| {
                s.host
                    .top_of(*id)
                    .is_some_and(|top| dom::crossed(false, top, line))
            })
            .collect();
        for id in due {
            s.host.disarm_id(id);
            fire(s, id);
        }
    });
}

fn fire(s: &mut RevealState, id: ElementId) {
    match s.scheduler.on_enter(id, &mut s.host) {
        Ok(TriggerOutcome::Inert) => log(&format!("reveal: {id} has no known animation")),
        Ok(_) => {}
        Err(err) => log_error(&format!("reveal: {err}")),
    }
}

/// Marks `id` settled once its animation's `finished` promise resolves.
pub(crate) fn watch_finish(id: ElementId, finished: Promise) {
    spawn_local(async move {
        if JsFuture::from(finished).await.is_err() {
            // Cancelled animations reject; leave the element as is.
            return;
        }
        STATE.with(|state| {
            if let Some(s) = state.borrow_mut().as_mut() {
                s.scheduler.finish(id);
            }
        });
    });
}

/// Trace events recorded so far, as JSON.
#[wasm_bindgen]
pub fn reveal_events_json() -> Result<String, JsValue> {
    STATE.with(|state| {
        let guard = state.borrow();
        let s = guard
            .as_ref()
            .ok_or_else(|| JsValue::from_str("scroll animations not initialized"))?;
        serde_json::to_string(s.scheduler.events()).map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

/// Counter and histogram snapshot, as JSON.
#[wasm_bindgen]
pub fn reveal_metrics_json() -> Result<String, JsValue> {
    STATE.with(|state| {
        let guard = state.borrow();
        let s = guard
            .as_ref()
            .ok_or_else(|| JsValue::from_str("scroll animations not initialized"))?;
        serde_json::to_string(&s.scheduler.metrics().snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

/// Starts a fresh stagger group on the next trigger.
#[wasm_bindgen]
pub fn reveal_reset_grouping() {
    STATE.with(|state| {
        if let Some(s) = state.borrow_mut().as_mut() {
            s.scheduler.reset_grouping();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::dom::{crossed, root_margin};

    #[test]
    fn root_margin_pulls_the_bottom_edge_up_to_the_line() {
        assert_eq!(root_margin(0.9), "0px 0px -10% 0px");
        assert_eq!(root_margin(0.8), "0px 0px -20% 0px");
        assert_eq!(root_margin(1.0), "0px 0px -0% 0px");
    }

    #[test]
    fn elements_jumped_past_still_fire() {
        // Line at 900px on a 1000px viewport.
        assert!(crossed(true, 850.0, 900.0));
        assert!(crossed(false, -2400.0, 900.0));
        assert!(crossed(false, 900.0, 900.0));
        assert!(!crossed(false, 1400.0, 900.0));
    }
}
