// src/controller.rs
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

use crate::debounce::{Debouncer, RenderState, TimerAction};
use crate::error::ImageMapError;
use crate::map_config::ImageMapOptions;
use crate::map_data::{Area, Scale};
use crate::markup::{render_map_markup, MapMarkup};
use crate::scaler::scaled_coords;

/// Keeps the `<map>` referenced by an image's `usemap` in step with the size
/// the image is actually displayed at.
///
/// Areas are read once, on construction. Every render rebuilds the map's
/// children from those originals, so repeated resizes never compound
/// rounding. Dropping the controller detaches its listeners and cancels a
/// pending resize timer.
pub struct ImageMap {
    inner: Rc<RefCell<Inner>>,
    _resize_listener: EventListener,
    _load_listener: Option<EventListener>,
}

struct Inner {
    image: HtmlImageElement,
    map: Element,
    areas: Vec<Area>,
    scale: Scale,
    state: RenderState,
    debouncer: Debouncer,
    pending: Option<Timeout>,
    on_render: RenderHook,
}

/// Optional observer told the scale after every successful render.
#[derive(Default)]
struct RenderHook(Option<Rc<dyn Fn(Scale)>>);

impl RenderHook {
    fn set(&mut self, callback: impl Fn(Scale) + 'static) {
        self.0 = Some(Rc::new(callback));
    }

    fn notify(&self, scale: Scale) {
        if let Some(callback) = &self.0 {
            callback(scale);
        }
    }
}

impl ImageMap {
    pub fn new(image: HtmlImageElement) -> Result<Self, ImageMapError> {
        Self::with_options(image, ImageMapOptions::default())
    }

    pub fn with_options(
        image: HtmlImageElement,
        options: ImageMapOptions,
    ) -> Result<Self, ImageMapError> {
        let document = image
            .owner_document()
            .unwrap_or_else(gloo::utils::document);
        let map = find_map(&document, &image.use_map())?;
        let areas = read_areas(&map)?;

        let loaded = image.complete() && image.natural_width() > 0;
        let scale = if loaded {
            current_scale(&image)?
        } else {
            log::warn!("image {} not loaded yet, rendering unscaled", image.src());
            Scale::IDENTITY
        };

        log::info!(
            "image map attached: {} areas, scale {:.3}",
            areas.len(),
            scale.factor()
        );

        let inner = Rc::new(RefCell::new(Inner {
            image: image.clone(),
            map,
            areas,
            scale,
            state: RenderState::Idle,
            debouncer: Debouncer::new(options.resize_debounce_ms),
            pending: None,
            on_render: RenderHook::default(),
        }));

        inner.borrow_mut().render()?;

        let resize_listener = {
            let weak = Rc::downgrade(&inner);
            EventListener::new(&gloo::utils::window(), "resize", move |_| {
                schedule_update(&weak);
            })
        };

        let load_listener = if loaded {
            None
        } else {
            let weak = Rc::downgrade(&inner);
            Some(EventListener::once(&image, "load", move |_| {
                if let Some(inner) = weak.upgrade() {
                    if let Err(e) = inner.borrow_mut().update() {
                        log::error!("image map update after load failed: {}", e);
                    }
                }
            }))
        };

        Ok(Self {
            inner,
            _resize_listener: resize_listener,
            _load_listener: load_listener,
        })
    }

    /// Recompute the scale and re-render right away, skipping the debounce.
    pub fn update(&self) -> Result<(), ImageMapError> {
        let mut inner = self.inner.borrow_mut();
        inner.debouncer.cancel();
        inner.pending = None;
        inner.update()
    }

    pub fn scale(&self) -> Scale {
        self.inner.borrow().scale
    }

    pub fn state(&self) -> RenderState {
        self.inner.borrow().state
    }

    /// Call `callback` with the new scale after every render, including the
    /// ones triggered by resize and image load.
    pub fn on_render(&self, callback: impl Fn(Scale) + 'static) {
        self.inner.borrow_mut().on_render.set(callback);
    }

    pub fn areas(&self) -> Vec<Area> {
        self.inner.borrow().areas.clone()
    }

    /// The map as it currently renders, serialised to HTML.
    pub fn to_markup(&self) -> Result<String, ImageMapError> {
        let inner = self.inner.borrow();
        let attributes = element_attributes(&inner.map);
        let name = inner.map.get_attribute("name").unwrap_or_default();
        let markup = MapMarkup {
            name,
            attributes,
            areas: inner.areas.clone(),
        };
        render_map_markup(&markup, inner.scale)
    }
}

impl Inner {
    fn update(&mut self) -> Result<(), ImageMapError> {
        self.scale = current_scale(&self.image)?;
        self.render()
    }

    /// Rebuild every `<area>` off-document, then swap them in with a single
    /// `replaceChildren` so a failure leaves the old areas in place.
    fn render(&mut self) -> Result<(), ImageMapError> {
        self.state.begin();
        let result = self.build_and_swap();
        self.state.finish();

        if result.is_ok() {
            log::debug!(
                "rendered {} areas at scale {:.3}",
                self.areas.len(),
                self.scale.factor()
            );
            self.on_render.notify(self.scale);
        }
        result
    }

    fn build_and_swap(&self) -> Result<(), ImageMapError> {
        let document = self
            .map
            .owner_document()
            .ok_or_else(|| ImageMapError::Dom("map element has no owner document".to_string()))?;
        let fragment = document.create_document_fragment();

        for area in &self.areas {
            let el = document.create_element("area")?;
            for (key, value) in render_attributes(area, self.scale) {
                el.set_attribute(&key, &value)?;
            }
            fragment.append_child(&el)?;
        }

        // Every fallible call is above; the live map is only touched here.
        self.map.replace_children_with_node_1(&fragment);
        Ok(())
    }
}

/// Attribute list for a freshly rendered `<area>`: passthrough attributes
/// untouched, followed by the coords for `scale`.
pub fn render_attributes(area: &Area, scale: Scale) -> Vec<(String, String)> {
    let mut attributes = area.attributes.clone();
    attributes.push(("coords".to_string(), scaled_coords(area, scale)));
    attributes
}

fn schedule_update(weak: &Weak<RefCell<Inner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let delay = {
        let mut guard = inner.borrow_mut();
        guard.debouncer.signal(js_sys::Date::now());
        guard.debouncer.delay_ms()
    };
    arm_timer(&inner, delay);
}

// Replacing `pending` drops the previous Timeout, which clears it.
fn arm_timer(inner: &Rc<RefCell<Inner>>, delay_ms: u32) {
    let timeout = make_timer(Rc::downgrade(inner), delay_ms);
    inner.borrow_mut().pending = Some(timeout);
}

fn make_timer(weak: Weak<RefCell<Inner>>, delay_ms: u32) -> Timeout {
    Timeout::new(delay_ms, move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let now = js_sys::Date::now();
        let mut guard = inner.borrow_mut();

        match guard.debouncer.on_timer(now) {
            TimerAction::Update => {
                if let Err(e) = guard.update() {
                    log::error!("image map update after resize failed: {}", e);
                }
            }
            TimerAction::Rearm(remaining) => {
                // The running callback is owned by `pending`, so it is
                // leaked rather than dropped mid-call.
                let rearmed = make_timer(weak.clone(), remaining);
                if let Some(running) = guard.pending.replace(rearmed) {
                    running.forget();
                }
            }
            TimerAction::Idle => {}
        }
    })
}

fn current_scale(image: &HtmlImageElement) -> Result<Scale, ImageMapError> {
    Scale::from_widths(image.width() as f64, image.natural_width() as f64)
}

/// Resolve a `usemap` value (`#name`) to its `<map>`, by name and then by id.
fn find_map(document: &Document, use_map: &str) -> Result<Element, ImageMapError> {
    let name = use_map.trim().trim_start_matches('#');
    if name.is_empty() {
        return Err(ImageMapError::MapNotFound {
            name: String::new(),
        });
    }

    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    let by_name = document.query_selector(&format!("map[name=\"{}\"]", escaped))?;
    let found = match by_name {
        Some(el) => Some(el),
        None => document
            .get_element_by_id(name)
            .filter(|el| el.tag_name().eq_ignore_ascii_case("map")),
    };

    found.ok_or_else(|| ImageMapError::MapNotFound {
        name: name.to_string(),
    })
}

fn read_areas(map: &Element) -> Result<Vec<Area>, ImageMapError> {
    let nodes = map.query_selector_all("area")?;
    let mut areas = Vec::with_capacity(nodes.length() as usize);

    for i in 0..nodes.length() {
        let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        areas.push(Area::from_attributes(element_attributes(&el))?);
    }

    Ok(areas)
}

fn element_attributes(el: &Element) -> Vec<(String, String)> {
    el.get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .map(|name| {
            let value = el.get_attribute(&name).unwrap_or_default();
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_attributes_keeps_passthrough() {
        let attrs = vec![
            ("shape".to_string(), "rect".to_string()),
            ("coords".to_string(), "10,10,20,20".to_string()),
            ("href".to_string(), "/room".to_string()),
            ("alt".to_string(), "Room".to_string()),
            ("data-id".to_string(), "7".to_string()),
        ];
        let area = Area::from_attributes(attrs).unwrap();

        let rendered = render_attributes(&area, Scale::new(3.0).unwrap());
        assert_eq!(
            rendered,
            vec![
                ("shape".to_string(), "rect".to_string()),
                ("href".to_string(), "/room".to_string()),
                ("alt".to_string(), "Room".to_string()),
                ("data-id".to_string(), "7".to_string()),
                ("coords".to_string(), "30,30,60,60".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_hook_reports_scale() {
        use std::cell::Cell;

        let seen = Rc::new(Cell::new(0.0));
        let mut hook = RenderHook::default();
        hook.notify(Scale::IDENTITY);
        assert_eq!(seen.get(), 0.0);

        let sink = seen.clone();
        hook.set(move |scale| sink.set(scale.factor()));
        hook.notify(Scale::new(0.75).unwrap());
        assert_eq!(seen.get(), 0.75);
    }

    #[test]
    fn test_render_attributes_identity() {
        let area = Area::parse(Some("circle"), "5, 5, 2", Vec::new()).unwrap();
        let rendered = render_attributes(&area, Scale::IDENTITY);
        assert_eq!(rendered, vec![("coords".to_string(), "5, 5, 2".to_string())]);
    }
}
