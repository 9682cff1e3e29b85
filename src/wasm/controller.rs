//! Wasm-facing controller: owns the engine, wires listeners, applies effects.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, PointerEvent};

use super::dom::{self, Interval, Listener, Timeout, TrackDom};
use crate::config::{Direction, Options};
use crate::engine::{Effect, SliderEngine};

const RESIZE_DEBOUNCE_MS: u32 = 80;

struct Inner {
    engine: SliderEngine,
    dom: TrackDom,
    listeners: Vec<Listener>,
    autoplay_timer: Option<Interval>,
    settle_timer: Option<Timeout>,
    resize_timer: Option<Timeout>,
    destroyed: bool,
}

/// The control object returned to the host page.
#[wasm_bindgen]
pub struct Slider {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl Slider {
    /// Initialize a slider from a JSON options object. Fails (returning no
    /// controller at all) when the root, track, or slides cannot be found.
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str) -> Result<Slider, JsValue> {
        let options = Options::from_json(options_json).map_err(warn_and_convert)?;
        let document = dom::document()?;
        let mut track_dom =
            TrackDom::discover(&document, &options).map_err(warn_and_convert)?;
        let config = options.into_config();

        let real_count = track_dom.slides.len();
        let engine = SliderEngine::new(config.clone(), real_count);

        if config.direction.is_rtl() {
            track_dom.reorder_for_rtl()?;
        }
        track_dom.apply_root_attributes(config.direction.as_str())?;
        if engine.deck().boundary_clones().is_some() {
            // head clone duplicates the visual-last slide, tail the visual-first
            track_dom.install_boundary_clones(real_count - 1, 0)?;
        }
        track_dom.build_dots(&document, real_count)?;

        let inner = Rc::new(RefCell::new(Inner {
            engine,
            dom: track_dom,
            listeners: Vec::new(),
            autoplay_timer: None,
            settle_timer: None,
            resize_timer: None,
            destroyed: false,
        }));

        let listeners = wire_listeners(&inner)?;
        inner.borrow_mut().listeners = listeners;

        let effects = {
            let mut i = inner.borrow_mut();
            let geometry = i.dom.measure()?;
            let mut fx = i.engine.set_geometry(geometry);
            fx.extend(i.engine.start());
            fx
        };
        apply_effects(&inner, effects);

        Ok(Slider { inner })
    }

    pub fn next(&self) {
        dispatch(&self.inner, SliderEngine::next);
    }

    pub fn prev(&self) {
        dispatch(&self.inner, SliderEngine::prev);
    }

    #[wasm_bindgen(js_name = goToUserIndex)]
    pub fn go_to_user_index(&self, index: usize) {
        dispatch(&self.inner, move |e| e.go_to_user_index(index));
    }

    pub fn play(&self) {
        dispatch(&self.inner, SliderEngine::play);
    }

    pub fn pause(&self) {
        dispatch(&self.inner, SliderEngine::pause);
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.inner.borrow().engine.snapshot())
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Remove all listeners, timers and generated elements, and restore the
    /// track's original inline style. The controller is inert afterwards.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.destroyed = true;
        inner.listeners.clear();
        inner.autoplay_timer = None;
        inner.settle_timer = None;
        inner.resize_timer = None;
        inner.dom.teardown();
    }
}

fn warn_and_convert(err: crate::config::ConfigError) -> JsValue {
    log::warn!("slider init failed: {err}");
    JsValue::from_str(&err.to_string())
}

/// Run one engine operation and apply the resulting effects. Skipped
/// entirely once the controller is destroyed, so stray callbacks and late
/// events cannot touch removed DOM.
fn dispatch<F>(inner: &Rc<RefCell<Inner>>, op: F)
where
    F: FnOnce(&mut SliderEngine) -> Vec<Effect>,
{
    if inner.borrow().destroyed {
        return;
    }
    let effects = op(&mut inner.borrow_mut().engine);
    apply_effects(inner, effects);
}

fn apply_effects(inner_rc: &Rc<RefCell<Inner>>, effects: Vec<Effect>) {
    let mut inner = inner_rc.borrow_mut();
    if inner.destroyed {
        return;
    }
    for effect in effects {
        match effect {
            Effect::SetTransform { x, animate } => {
                let config = inner.engine.config();
                let speed = config.speed;
                let easing = config.easing.clone();
                inner.dom.set_transform(x, animate, speed, &easing);
            }
            Effect::AppendTransientClone { source_real } => {
                let position = slide_position(
                    source_real,
                    inner.engine.deck().real_count(),
                    inner.engine.config().direction,
                );
                if let Err(e) = inner.dom.append_transient_clone(position) {
                    log::warn!("failed to append wrap clone: {e:?}");
                }
            }
            Effect::RemoveTransientClone => inner.dom.remove_transient_clone(),
            Effect::SetActiveDot { slot } => inner.dom.set_active_dot(slot),
            Effect::ArmSettleFallback { ms } => {
                let rc = inner_rc.clone();
                inner.settle_timer = Timeout::schedule(
                    ms,
                    Box::new(move || dispatch(&rc, SliderEngine::settle_timeout)),
                )
                .ok();
            }
            Effect::DisarmSettleFallback => inner.settle_timer = None,
            Effect::StartAutoplay { period_ms } => {
                let rc = inner_rc.clone();
                inner.autoplay_timer = Interval::schedule(
                    period_ms,
                    Box::new(move || dispatch(&rc, SliderEngine::autoplay_tick)),
                )
                .ok();
            }
            Effect::StopAutoplay => inner.autoplay_timer = None,
        }
    }
}

/// Dom position (among real slides) of a real index, accounting for the rtl
/// physical reorder.
fn slide_position(real_index: usize, real_count: usize, direction: Direction) -> usize {
    match direction {
        Direction::Ltr => real_index,
        Direction::Rtl => real_count - 1 - real_index,
    }
}

fn wire_listeners(inner: &Rc<RefCell<Inner>>) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();
    let (root, track, prev, next, toggle, dots, pause_on_hover) = {
        let i = inner.borrow();
        (
            i.dom.root.clone(),
            i.dom.track.clone(),
            i.dom.prev_button.clone(),
            i.dom.next_button.clone(),
            i.dom.toggle_button.clone(),
            i.dom.dot_buttons.clone(),
            i.engine.config().pause_on_hover,
        )
    };

    if let Some(button) = prev {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &button,
            "click",
            Box::new(move |_| dispatch(&rc, SliderEngine::prev)),
        )?);
    }
    if let Some(button) = next {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &button,
            "click",
            Box::new(move |_| dispatch(&rc, SliderEngine::next)),
        )?);
    }
    if let Some(button) = toggle {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &button,
            "click",
            Box::new(move |_| dispatch(&rc, SliderEngine::toggle)),
        )?);
    }
    for (slot, dot) in dots.iter().enumerate() {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            dot,
            "click",
            Box::new(move |_| dispatch(&rc, move |e| e.go_to_user_index(slot))),
        )?);
    }

    // Drags: capture the pointer on the root so move/up keep arriving even
    // when the cursor leaves it mid-drag.
    {
        let rc = inner.clone();
        let capture_root = root.clone();
        listeners.push(Listener::attach(
            &root,
            "pointerdown",
            Box::new(move |event| {
                if targets_control(&event) {
                    return;
                }
                let Some(pointer) = event.dyn_ref::<PointerEvent>().cloned() else {
                    return;
                };
                capture_root.set_pointer_capture(pointer.pointer_id()).ok();
                let x = f64::from(pointer.client_x());
                dispatch(&rc, move |e| e.pointer_down(x));
            }),
        )?);
    }
    {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &root,
            "pointermove",
            Box::new(move |event| {
                if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
                    let x = f64::from(pointer.client_x());
                    dispatch(&rc, move |e| e.pointer_move(x));
                }
            }),
        )?);
    }
    for release in ["pointerup", "pointercancel"] {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &root,
            release,
            Box::new(move |event| {
                if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
                    let x = f64::from(pointer.client_x());
                    dispatch(&rc, move |e| e.pointer_up(x));
                }
            }),
        )?);
    }

    if pause_on_hover {
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &root,
            "mouseenter",
            Box::new(move |_| dispatch(&rc, SliderEngine::hover_enter)),
        )?);
        let rc = inner.clone();
        listeners.push(Listener::attach(
            &root,
            "mouseleave",
            Box::new(move |_| dispatch(&rc, SliderEngine::hover_leave)),
        )?);
    }

    // Settle on the track's own transitionend; transitions bubbling up from
    // slide content must not commit the index early.
    {
        let rc = inner.clone();
        let track_js: JsValue = track.clone().into();
        listeners.push(Listener::attach(
            &track,
            "transitionend",
            Box::new(move |event| {
                let on_track = event
                    .target()
                    .map(JsValue::from)
                    .is_some_and(|t| t == track_js);
                if on_track {
                    dispatch(&rc, SliderEngine::transition_ended);
                }
            }),
        )?);
    }

    {
        let rc = inner.clone();
        let window: web_sys::EventTarget = dom::window()?.into();
        listeners.push(Listener::attach(
            &window,
            "resize",
            Box::new(move |_| {
                let timer_rc = rc.clone();
                let timeout = Timeout::schedule(
                    RESIZE_DEBOUNCE_MS,
                    Box::new(move || {
                        let geometry = {
                            let i = timer_rc.borrow();
                            if i.destroyed {
                                return;
                            }
                            i.dom.measure().ok()
                        };
                        if let Some(geometry) = geometry {
                            dispatch(&timer_rc, move |e| e.set_geometry(geometry));
                        }
                    }),
                );
                if let Ok(timeout) = timeout {
                    rc.borrow_mut().resize_timer = Some(timeout);
                }
            }),
        )?);
    }

    Ok(listeners)
}

/// Pointer-downs on buttons or dots belong to the controls, not the drag
/// tracker.
fn targets_control(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("button, [data-slider-dot]").ok().flatten())
        .is_some()
}
