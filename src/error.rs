// src/error.rs
use std::fmt;

use wasm_bindgen::JsValue;

/// Everything that can go wrong while binding or rendering an image map.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageMapError {
    /// The image has no usable `usemap`, or no `<map>` carries that name.
    MapNotFound { name: String },
    /// A `coords` attribute has the wrong arity or a non-numeric entry.
    InvalidCoordinateFormat { coords: String, reason: String },
    /// The `shape` keyword is not circle, rect or poly.
    UnsupportedShape { shape: String },
    /// Displayed or natural width cannot produce a positive scale.
    InvalidScale { displayed: f64, natural: f64 },
    /// Malformed map markup handed to the markup reader.
    Markup(String),
    /// A DOM call threw.
    Dom(String),
}

impl ImageMapError {
    pub(crate) fn invalid_coords(coords: &str, reason: impl Into<String>) -> Self {
        ImageMapError::InvalidCoordinateFormat {
            coords: coords.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ImageMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageMapError::MapNotFound { name } if name.is_empty() => {
                write!(f, "image has no usemap reference")
            }
            ImageMapError::MapNotFound { name } => write!(f, "no <map> named '{}'", name),
            ImageMapError::InvalidCoordinateFormat { coords, reason } => {
                write!(f, "invalid coords '{}': {}", coords, reason)
            }
            ImageMapError::UnsupportedShape { shape } => {
                write!(f, "unsupported area shape '{}'", shape)
            }
            ImageMapError::InvalidScale { displayed, natural } => write!(
                f,
                "cannot scale from natural width {} to displayed width {}",
                natural, displayed
            ),
            ImageMapError::Markup(msg) => write!(f, "malformed map markup: {}", msg),
            ImageMapError::Dom(msg) => write!(f, "DOM error: {}", msg),
        }
    }
}

impl std::error::Error for ImageMapError {}

impl From<JsValue> for ImageMapError {
    fn from(value: JsValue) -> Self {
        ImageMapError::Dom(format!("{:?}", value))
    }
}

impl From<quick_xml::Error> for ImageMapError {
    fn from(err: quick_xml::Error) -> Self {
        ImageMapError::Markup(err.to_string())
    }
}
