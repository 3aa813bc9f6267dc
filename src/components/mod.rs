// src/components/mod.rs
pub mod map_viewer;
