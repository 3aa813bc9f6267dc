// src/map_config.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ImageMapError;
use crate::map_data::Area;

pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 500;

/// Tunables for a single `ImageMap` controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMapOptions {
    /// Quiet period after the last window resize before areas are rescaled.
    pub resize_debounce_ms: u32,
}

/// `public/maps/manifest.json`: the image maps the demo can show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapManifest {
    pub maps: Vec<MapConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub alt: String,
    pub areas: Vec<AreaConfig>,
    #[serde(default)]
    pub options: ImageMapOptions,
}

/// One `<area>` as written in the manifest. `shape` and `coords` are kept as
/// raw strings so they go through the same parser as markup does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaConfig {
    #[serde(default)]
    pub shape: Option<String>,
    pub coords: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Default for ImageMapOptions {
    fn default() -> Self {
        Self {
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl MapManifest {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid manifest: {}", e))
    }

    pub fn get_map(&self, id: &str) -> Option<&MapConfig> {
        self.maps.iter().find(|m| m.id == id)
    }
}

impl MapConfig {
    /// `name` attribute for the rendered `<map>`; `usemap` points at it.
    pub fn map_name(&self) -> String {
        format!("{}-map", self.id)
    }

    pub fn use_map(&self) -> String {
        format!("#{}", self.map_name())
    }

    /// Full attribute list for each area, in the order they are rendered.
    pub fn area_attributes(&self) -> Vec<Vec<(String, String)>> {
        self.areas.iter().map(AreaConfig::to_attributes).collect()
    }

    /// Check every area up front so a bad manifest entry is reported instead
    /// of failing later inside the controller.
    pub fn validate(&self) -> Result<Vec<Area>, ImageMapError> {
        self.area_attributes()
            .into_iter()
            .map(Area::from_attributes)
            .collect()
    }
}

impl AreaConfig {
    pub fn to_attributes(&self) -> Vec<(String, String)> {
        let mut attributes = Vec::with_capacity(self.attributes.len() + 2);
        if let Some(shape) = &self.shape {
            attributes.push(("shape".to_string(), shape.clone()));
        }
        attributes.push(("coords".to_string(), self.coords.clone()));
        for (k, v) in &self.attributes {
            if k.eq_ignore_ascii_case("shape") || k.eq_ignore_ascii_case("coords") {
                continue;
            }
            attributes.push((k.clone(), v.clone()));
        }
        attributes
    }
}
