//! Interactive world map component.
//!
//! Renders country polygons from a topology descriptor onto stacked drawing
//! surfaces and keeps every overlay layer synchronized with one shared
//! pan/zoom transform. The host supplies surfaces, raw input events and the
//! clock; [`engine::MapCore`] turns them into zoom transitions, hover and
//! click notifications, and redraws. Everything outside [`web`] runs
//! headless against [`surface::RecordingSurface`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::MapCore`] wiring layers, input and time |
//! | [`config`] | Construction options ([`config::MapConfig`]) |
//! | [`topology`] | Topology descriptor decoding into country records |
//! | [`countries`] | Country registry, metadata lookups, screen geometry |
//! | [`projection`] | Mercator projection sized to the widget |
//! | [`geo`] | Geographic points and great-circle interpolation |
//! | [`camera`] | Screen points, bounds and the zoom transform |
//! | [`zoom`] | Zoom controller, transitions and transform distribution |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Point-in-polygon and circle hit tests |
//! | [`map_layer`] | Country layer: focus, hover, highlight, dim |
//! | [`static_layer`] | Named layers of persistent dots, circles and arrows |
//! | [`dynamic_layer`] | Named layers of animated, expiring items |
//! | [`touch`] | Interactive circles that keep a constant screen size |
//! | [`tiles`] | Tile providers and the basemap adapter |
//! | [`clustering`] | Country groupings and their selectors |
//! | [`render`] | Shape drawing onto a [`surface::Surface`] |
//! | [`surface`] | Surface traits and the recording implementation |
//! | [`schedule`] | Host-driven intervals, timeouts and cancellation handles |
//! | [`color`] | CSS color parsing and brightening |
//! | [`ease`] | Easing curves |
//! | [`consts`] | Shared numeric constants |
//! | [`error`] | [`error::MapError`] |

pub mod camera;
pub mod clustering;
pub mod color;
pub mod config;
pub mod consts;
pub mod countries;
pub mod dynamic_layer;
pub mod ease;
pub mod engine;
pub mod error;
pub mod geo;
pub mod hit;
pub mod input;
pub mod map_layer;
pub mod projection;
pub mod render;
pub mod schedule;
pub mod static_layer;
pub mod surface;
pub mod tiles;
pub mod topology;
pub mod touch;
#[cfg(feature = "web")]
pub mod web;
pub mod zoom;

#[cfg(test)]
#[path = "fixtures_test.rs"]
mod fixtures;
