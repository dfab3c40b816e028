//! aseanmap - ASEAN low-voltage certification data with an animated, zoomable member-state map

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod map;
pub mod render;
pub mod stage;
