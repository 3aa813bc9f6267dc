// src/lib.rs
//! Keeps HTML image map areas in step with a responsively scaled image.
//!
//! [`controller::ImageMap`] binds to an `<img usemap>` and rewrites its
//! `<map>` on resize. The parsing, scaling and markup pieces are plain
//! functions usable without a DOM.

pub mod components;
pub mod controller;
pub mod coords_parser;
pub mod debounce;
pub mod error;
pub mod map_config;
pub mod map_data;
pub mod markup;
pub mod scaler;
pub mod utils;

pub use controller::ImageMap;
pub use error::ImageMapError;
pub use map_config::ImageMapOptions;
pub use map_data::{Area, Point, Scale, Shape};
