// src/utils.rs
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event};

/// Get the base URL for the application
/// This handles both local development and GitHub Pages deployment
pub fn get_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(location) = window.location().pathname() {
            if location.starts_with("/useful-image-map/") {
                return "/useful-image-map".to_string();
            }
        }
    }
    String::new()
}

/// Build a resource URL with the correct base path
pub fn resource_url(path: &str) -> String {
    join_base(&get_base_url(), path)
}

fn join_base(base: &str, path: &str) -> String {
    let clean_path = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", clean_path)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), clean_path)
    }
}

/// Wrap `handler` so it only runs when the event target is, or sits inside,
/// an element matching `selector`.
pub fn delegate_event<F>(selector: &str, handler: F) -> impl Fn(&Event)
where
    F: Fn(&Event),
{
    let selector = selector.to_string();
    move |event: &Event| {
        let matched = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|el| matches_closest(&el, &selector))
            .unwrap_or(false);
        if matched {
            handler(event);
        }
    }
}

fn matches_closest(el: &Element, selector: &str) -> bool {
    match el.closest(selector) {
        Ok(found) => found.is_some(),
        Err(e) => {
            log::warn!("invalid delegation selector '{}': {:?}", selector, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_base() {
        assert_eq!(join_base("", "/public/maps/manifest.json"), "/public/maps/manifest.json");
        assert_eq!(join_base("", "public/maps/manifest.json"), "/public/maps/manifest.json");
        assert_eq!(
            join_base("/useful-image-map", "public/maps/floor.png"),
            "/useful-image-map/public/maps/floor.png"
        );
        assert_eq!(join_base("/base/", "/x.png"), "/base/x.png");
    }
}
