//! Errors for the load path and rendering environment.
//!
//! Only building the map and acquiring drawing surfaces can fail with an
//! error. Every other public operation reports invalid input through a
//! sentinel value (`false`, `None`, empty list) and leaves state untouched.

/// Error returned while loading map data or acquiring a drawing surface.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The resource descriptor could not be read.
    #[error("failed to read map resource: {0}")]
    Io(#[from] std::io::Error),
    /// The resource descriptor is not valid JSON or has the wrong shape.
    #[error("failed to parse map resource: {0}")]
    Parse(#[from] serde_json::Error),
    /// The topology is structurally invalid (bad arc index, missing object).
    #[error("invalid topology: {0}")]
    Topology(String),
    /// Fetching the resource over the network failed.
    #[error("failed to fetch map resource: {0}")]
    Fetch(String),
    /// A drawing surface could not be created.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
}
