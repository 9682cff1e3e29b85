//! DOM plumbing: element discovery, measurement, clone projection, and
//! scoped wrappers for listeners and timers.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::config::{ConfigError, Options};
use crate::transform::Geometry;

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// An event listener that detaches itself when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: Box<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A `setTimeout` registration, cleared when dropped.
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn schedule(ms: u32, handler: Box<dyn FnMut()>) -> Result<Self, JsValue> {
        let closure = Closure::wrap(handler);
        let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms as i32,
        )?;
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(w) = web_sys::window() {
            w.clear_timeout_with_handle(self.handle);
        }
    }
}

/// A `setInterval` registration, cleared when dropped.
pub struct Interval {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn schedule(ms: u32, handler: Box<dyn FnMut()>) -> Result<Self, JsValue> {
        let closure = Closure::wrap(handler);
        let handle = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            ms as i32,
        )?;
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(w) = web_sys::window() {
            w.clear_interval_with_handle(self.handle);
        }
    }
}

/// Everything the shell found or created in the host markup.
pub struct TrackDom {
    pub root: HtmlElement,
    pub track: HtmlElement,
    /// Real slides in dom order (already reordered for rtl).
    pub slides: Vec<HtmlElement>,
    pub prev_button: Option<HtmlElement>,
    pub next_button: Option<HtmlElement>,
    pub toggle_button: Option<HtmlElement>,
    pub dots_container: Option<Element>,
    dots_created: bool,
    pub dot_buttons: Vec<HtmlElement>,
    transient_clone: Option<HtmlElement>,
    saved_track_style: String,
}

impl TrackDom {
    /// Locate root, track and slides. Each missing piece aborts construction
    /// with the matching [`ConfigError`]; nothing is mutated on failure.
    pub fn discover(document: &Document, options: &Options) -> Result<Self, ConfigError> {
        let root = query(document, &options.selector)
            .ok_or_else(|| ConfigError::MissingRoot(options.selector.clone()))?;
        let track = query_in(&root, &options.track_selector)
            .ok_or_else(|| ConfigError::MissingTrack(options.track_selector.clone()))?;
        let slides = query_all_in(&track, &options.slide_selector);
        if slides.is_empty() {
            return Err(ConfigError::NoSlides(options.slide_selector.clone()));
        }
        let saved_track_style = track.style().css_text();
        Ok(Self {
            prev_button: query_in(&root, &options.prev_selector),
            next_button: query_in(&root, &options.next_selector),
            toggle_button: query_in(&root, &options.toggle_selector),
            dots_container: query_in(&root, &options.dots_selector).map(Element::from),
            dots_created: false,
            dot_buttons: Vec::new(),
            transient_clone: None,
            saved_track_style,
            root,
            track,
            slides,
        })
    }

    /// Physically reverse the slide order so index arithmetic stays
    /// left-to-right under rtl. Re-appending an existing child moves it.
    pub fn reorder_for_rtl(&mut self) -> Result<(), JsValue> {
        for slide in self.slides.iter().rev() {
            self.track.append_child(slide)?;
        }
        self.slides.reverse();
        Ok(())
    }

    pub fn apply_root_attributes(&self, direction: &str) -> Result<(), JsValue> {
        self.root.set_attribute("role", "region")?;
        self.root.set_attribute("aria-roledescription", "carousel")?;
        self.root.set_attribute("dir", direction)?;
        self.root.set_attribute("data-direction", direction)?;
        Ok(())
    }

    /// Project infinite-mode boundary clones: a copy of the slide at
    /// `head_source` before everything, a copy of the one at `tail_source`
    /// after everything. Sources are dom indices into `slides`.
    pub fn install_boundary_clones(
        &mut self,
        head_source: usize,
        tail_source: usize,
    ) -> Result<(), JsValue> {
        let head = clone_slide(&self.slides[head_source])?;
        let tail = clone_slide(&self.slides[tail_source])?;
        let first = self.track.first_child();
        self.track.insert_before(&head, first.as_ref())?;
        self.track.append_child(&tail)?;
        Ok(())
    }

    pub fn append_transient_clone(&mut self, source: usize) -> Result<(), JsValue> {
        let clone = clone_slide(&self.slides[source])?;
        self.track.append_child(&clone)?;
        self.transient_clone = Some(clone);
        Ok(())
    }

    pub fn remove_transient_clone(&mut self) {
        if let Some(clone) = self.transient_clone.take() {
            clone.remove();
        }
    }

    /// Write the track transform, enabling or suppressing the CSS transition
    /// first so jumps never animate.
    pub fn set_transform(&self, x: f64, animate: bool, speed: u32, easing: &str) {
        let style = self.track.style();
        let transition = if animate {
            format!("transform {speed}ms {easing}")
        } else {
            "none".to_string()
        };
        let _ = style.set_property("transition", &transition);
        let _ = style.set_property("transform", &format!("translateX({x}px)"));
    }

    /// Measure the first slide's rendered box (margins included) and the
    /// container width.
    pub fn measure(&self) -> Result<Geometry, JsValue> {
        let first = &self.slides[0];
        let computed = window()?
            .get_computed_style(first)?
            .ok_or_else(|| JsValue::from_str("no computed style"))?;
        let slide_width = first.offset_width() as f64
            + style_px(&computed, "margin-left")
            + style_px(&computed, "margin-right");
        let container_width = self.root.client_width() as f64;
        Ok(Geometry::new(slide_width, container_width))
    }

    /// Build one dot button per real slide inside the dots container,
    /// creating the container itself when the host markup has none.
    pub fn build_dots(&mut self, document: &Document, real_count: usize) -> Result<(), JsValue> {
        let container = match &self.dots_container {
            Some(c) => c.clone(),
            None => {
                let c = document.create_element("div")?;
                c.set_class_name("slider-dots");
                self.root.append_child(&c)?;
                self.dots_created = true;
                self.dots_container = Some(c.clone());
                c
            }
        };
        for slot in 0..real_count {
            let button = document
                .create_element("button")?
                .dyn_into::<HtmlElement>()?;
            button.set_class_name("slider-dot");
            button.set_attribute("type", "button")?;
            button.set_attribute("data-slider-dot", &slot.to_string())?;
            button.set_attribute("aria-label", &format!("Go to slide {}", slot + 1))?;
            container.append_child(&button)?;
            self.dot_buttons.push(button);
        }
        Ok(())
    }

    pub fn set_active_dot(&self, slot: Option<usize>) {
        for (i, dot) in self.dot_buttons.iter().enumerate() {
            if Some(i) == slot {
                dot.class_list().add_1("is-active").ok();
                dot.set_attribute("aria-current", "true").ok();
            } else {
                dot.class_list().remove_1("is-active").ok();
                dot.remove_attribute("aria-current").ok();
            }
        }
    }

    /// Undo everything this controller added to the host markup: clones,
    /// generated dots, and the track's inline style.
    pub fn teardown(&mut self) {
        self.remove_transient_clone();
        let clones = query_all_in(&self.track, "[data-slider-clone]");
        for clone in clones {
            clone.remove();
        }
        if self.dots_created {
            if let Some(container) = self.dots_container.take() {
                container.remove();
            }
        } else {
            for dot in self.dot_buttons.drain(..) {
                dot.remove();
            }
        }
        self.track.style().set_css_text(&self.saved_track_style);
    }
}

fn clone_slide(source: &HtmlElement) -> Result<HtmlElement, JsValue> {
    let clone = source
        .clone_node_with_deep(true)?
        .dyn_into::<HtmlElement>()?;
    clone.set_attribute("data-slider-clone", "")?;
    clone.set_attribute("aria-hidden", "true")?;
    Ok(clone)
}

fn style_px(style: &CssStyleDeclaration, property: &str) -> f64 {
    style
        .get_property_value(property)
        .ok()
        .and_then(|v| v.trim_end_matches("px").parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn query(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn query_in(root: &HtmlElement, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn query_all_in(root: &HtmlElement, selector: &str) -> Vec<HtmlElement> {
    let mut out = Vec::new();
    if let Ok(list) = root.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(node) = list.get(i) {
                if let Ok(el) = node.dyn_into::<HtmlElement>() {
                    out.push(el);
                }
            }
        }
    }
    out
}
