//! Synthetic world shared by unit tests.

use serde_json::json;

use crate::topology::Descriptor;

/// Closed `(lon, lat)` rectangle.
fn rect(west: f64, south: f64, east: f64, north: f64) -> serde_json::Value {
    json!([[west, south], [east, south], [east, north], [west, north], [west, south]])
}

/// Four countries:
/// - `Squareland`: lon -10..10, lat -10..10 (centered on the projection origin)
/// - `Eastia`: lon 30..50, lat 0..20
/// - `Westmark`: lon -60..-40, lat 20..40
/// - `Sliver`: a zero-area line at lat 5, lon 100..110
pub fn world_json() -> serde_json::Value {
    json!({
        "topology": {
            "type": "Topology",
            "arcs": [
                rect(-10.0, -10.0, 10.0, 10.0),
                rect(30.0, 0.0, 50.0, 20.0),
                rect(-60.0, 20.0, -40.0, 40.0),
                [[100.0, 5.0], [110.0, 5.0], [100.0, 5.0]]
            ],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0]], "id": 1 },
                        { "type": "Polygon", "arcs": [[1]], "id": 2 },
                        { "type": "Polygon", "arcs": [[2]], "id": 3 },
                        { "type": "Polygon", "arcs": [[3]], "id": 4 }
                    ]
                }
            }
        },
        "metadata": [
            { "id": 1, "name": "Squareland", "capital": "Origin City", "population": 1000 },
            { "id": 2, "name": "Eastia", "capital": "Eastport", "population": 2500 },
            { "id": 3, "name": "Westmark", "capital": null, "population": null },
            { "id": 4, "name": "Sliver", "capital": "Nowhere", "population": 3 }
        ]
    })
}

pub fn world_str() -> String {
    world_json().to_string()
}

pub fn world_descriptor() -> Descriptor {
    serde_json::from_value(world_json()).expect("fixture descriptor")
}
