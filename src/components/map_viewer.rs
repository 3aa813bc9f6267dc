// src/components/map_viewer.rs
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlImageElement};
use yew::prelude::*;

use crate::controller::ImageMap;
use crate::error::ImageMapError;
use crate::map_config::{ImageMapOptions, MapConfig};
use crate::utils::{delegate_event, resource_url};

#[derive(Properties, PartialEq)]
pub struct MapViewerProps {
    pub config: MapConfig,
    /// Receives the `alt` (or `href`) of the area that was clicked.
    pub on_area_click: Callback<String>,
}

#[function_component(MapViewer)]
pub fn map_viewer(props: &MapViewerProps) -> Html {
    let image_ref = use_node_ref();
    let map_ref = use_node_ref();
    let controller = use_mut_ref(|| None::<ImageMap>);
    let scale = use_state(|| 1.0f64);
    let area_count = use_state(|| 0usize);
    let error = use_state(|| None::<String>);

    // ------ ATTACH CONTROLLER ------
    {
        let image_ref = image_ref.clone();
        let map_ref = map_ref.clone();
        let controller = controller.clone();
        let scale = scale.clone();
        let area_count = area_count.clone();
        let error = error.clone();

        use_effect_with(props.config.clone(), move |config| {
            match attach(&image_ref, &map_ref, config) {
                Ok(map) => {
                    scale.set(map.scale().factor());
                    {
                        let scale = scale.clone();
                        map.on_render(move |s| scale.set(s.factor()));
                    }
                    area_count.set(map.areas().len());
                    error.set(None);
                    *controller.borrow_mut() = Some(map);
                }
                Err(e) => {
                    log::error!("failed to attach image map '{}': {}", config.id, e);
                    error.set(Some(e.to_string()));
                }
            }

            move || {
                controller.borrow_mut().take();
            }
        });
    }

    // ------ AREA CLICKS ------
    {
        let map_ref = map_ref.clone();
        let on_area_click = props.on_area_click.clone();

        use_effect_with(props.config.id.clone(), move |_| {
            let listener = map_ref.cast::<Element>().map(|map| {
                let handler = delegate_event("area", move |event: &Event| {
                    event.prevent_default();
                    let label = event
                        .target()
                        .and_then(|t| t.dyn_into::<Element>().ok())
                        .and_then(|el| el.closest("area").ok().flatten())
                        .and_then(|area| {
                            area.get_attribute("alt")
                                .or_else(|| area.get_attribute("href"))
                        })
                        .unwrap_or_default();
                    on_area_click.emit(label);
                });
                EventListener::new(&map, "click", move |e| handler(e))
            });

            // Cleanup closure
            || drop(listener)
        });
    }

    // ------ MANUAL RESCALE ------
    let rescale = {
        let controller = controller.clone();
        let scale = scale.clone();
        let error = error.clone();
        Callback::from(move |_| {
            if let Some(map) = controller.borrow().as_ref() {
                match map.update() {
                    Ok(()) => scale.set(map.scale().factor()),
                    Err(e) => error.set(Some(e.to_string())),
                }
            }
        })
    };

    // ------ DUMP MARKUP ------
    let dump_markup = {
        let controller = controller.clone();
        Callback::from(move |_| {
            if let Some(map) = controller.borrow().as_ref() {
                match map.to_markup() {
                    Ok(markup) => log::info!("{}", markup),
                    Err(e) => log::error!("failed to serialise map: {}", e),
                }
            }
        })
    };

    let config = &props.config;

    html! {
        <div class="map-viewer">
            <div style="margin-bottom:10px; display:flex; gap:8px; align-items:center; flex-wrap: wrap;">
                <button onclick={rescale} title="Recompute scale now">{"⟲ Rescale"}</button>
                <button onclick={dump_markup} title="Log current map markup">{"</> Markup"}</button>

                <div style="margin-left:auto; font-family: monospace; background: #f0f0f0; border-radius: 4px; padding: 4px 8px;">
                    { format!("{} areas | scale {:.3}", *area_count, *scale) }
                </div>
            </div>

            if let Some(msg) = (*error).clone() {
                <div class="error">{msg}</div>
            }

            <img
                ref={image_ref}
                src={resource_url(&config.image)}
                alt={config.alt.clone()}
                usemap={config.use_map()}
                style="max-width:100%; height:auto; display:block;"
            />
            <map ref={map_ref} name={config.map_name()} />
        </div>
    }
}

/// Write the configured areas into the (yew-empty) `<map>` and bind a
/// controller to the image. yew never owns the area nodes, so the controller
/// can replace them freely.
fn attach(
    image_ref: &NodeRef,
    map_ref: &NodeRef,
    config: &MapConfig,
) -> Result<ImageMap, ImageMapError> {
    let image = image_ref
        .cast::<HtmlImageElement>()
        .ok_or_else(|| ImageMapError::Dom("image element is not mounted".to_string()))?;
    let map = map_ref
        .cast::<Element>()
        .ok_or_else(|| ImageMapError::MapNotFound {
            name: config.map_name(),
        })?;

    config.validate()?;

    let document = gloo::utils::document();
    let fragment = document.create_document_fragment();
    for attributes in config.area_attributes() {
        let el = document.create_element("area")?;
        for (key, value) in attributes {
            el.set_attribute(&key, &value)?;
        }
        fragment.append_child(&el)?;
    }
    // Nothing above touched the live map, so the swap is all-or-nothing.
    map.replace_children_with_node_1(&fragment);

    if config.options == ImageMapOptions::default() {
        ImageMap::new(image)
    } else {
        ImageMap::with_options(image, config.options.clone())
    }
}
