use serde_json::json;

use super::*;

fn descriptor(value: serde_json::Value) -> Descriptor {
    serde_json::from_value(value).expect("descriptor should parse")
}

fn two_squares() -> serde_json::Value {
    json!({
        "topology": {
            "type": "Topology",
            "arcs": [
                [[0, 0], [1, 0], [1, 1]],
                [[1, 1], [0, 1], [0, 0]]
            ],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0, 1]], "id": "004" },
                        { "type": "Polygon", "arcs": [[-2, -1]], "id": 8 }
                    ]
                }
            }
        },
        "metadata": [
            { "id": 8, "name": "Beta", "capital": "B-Town", "population": 200 },
            { "id": "4", "name": "Alpha", "capital": null, "population": 100 }
        ]
    })
}

#[test]
fn stitches_arcs_dropping_shared_points() {
    let records = decode(&descriptor(two_squares())).expect("decode");
    assert_eq!(records[0].polygons, vec![vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]]);
}

#[test]
fn negative_indices_reverse_arcs() {
    let records = decode(&descriptor(two_squares())).expect("decode");
    assert_eq!(records[1].polygons, vec![vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]]);
}

#[test]
fn metadata_matches_by_normalized_id_in_geometry_order() {
    let records = decode(&descriptor(two_squares())).expect("decode");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Alpha");
    assert_eq!(records[0].capital, None);
    assert_eq!(records[0].population, Some(100));
    assert_eq!(records[1].name, "Beta");
    assert_eq!(records[1].capital.as_deref(), Some("B-Town"));
}

#[test]
fn decimal_populations_do_not_fail_the_load() {
    let mut value = two_squares();
    value["metadata"][0]["population"] = json!(1.5e6);
    value["metadata"][1]["population"] = json!(12.5);
    let desc = Descriptor::from_json(&value.to_string()).expect("descriptor");
    let records = decode(&desc).expect("decode");
    assert_eq!(records[1].name, "Beta");
    assert_eq!(records[1].population, Some(1_500_000));
    assert_eq!(records[0].population, None);
}

#[test]
fn negative_population_reads_as_unknown() {
    let mut value = two_squares();
    value["metadata"][0]["population"] = json!(-3);
    let records = decode(&descriptor(value)).expect("decode");
    assert_eq!(records[1].population, None);
}

#[test]
fn quantized_arcs_are_delta_decoded() {
    let d = descriptor(json!({
        "topology": {
            "type": "Topology",
            "transform": { "scale": [0.5, 0.25], "translate": [10, 20] },
            "arcs": [[[0, 0], [2, 0], [0, 4], [-2, -4]]],
            "objects": { "land": { "type": "Polygon", "arcs": [[0]] } }
        },
        "metadata": [{ "name": "Quant" }]
    }));
    let records = decode(&d).expect("decode");
    assert_eq!(records[0].name, "Quant");
    assert_eq!(records[0].polygons, vec![vec![vec![[10.0, 20.0], [11.0, 20.0], [11.0, 21.0], [10.0, 20.0]]]]);
}

#[test]
fn multipolygon_keeps_every_part() {
    let d = descriptor(json!({
        "topology": {
            "type": "Topology",
            "arcs": [
                [[0, 0], [1, 0], [1, 1], [0, 0]],
                [[5, 5], [6, 5], [6, 6], [5, 5]]
            ],
            "objects": { "countries": { "type": "MultiPolygon", "arcs": [[[0]], [[1]]], "id": 1 } }
        },
        "metadata": [{ "id": 1, "name": "Archipelago" }]
    }));
    let records = decode(&d).expect("decode");
    assert_eq!(records[0].polygons.len(), 2);
}

#[test]
fn short_rings_are_padded() {
    let d = descriptor(json!({
        "topology": {
            "type": "Topology",
            "arcs": [[[0, 0], [1, 1]]],
            "objects": { "countries": { "type": "Polygon", "arcs": [[0]] } }
        },
        "metadata": [{ "name": "Sliver" }]
    }));
    let records = decode(&d).expect("decode");
    assert_eq!(records[0].polygons[0][0], vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [0.0, 0.0]]);
}

#[test]
fn falls_back_to_property_name_and_skips_anonymous() {
    let d = descriptor(json!({
        "topology": {
            "type": "Topology",
            "arcs": [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0]], "id": 99, "properties": { "name": "Named" } },
                        { "type": "Polygon", "arcs": [[0]], "id": 100 },
                        { "type": "Point", "coordinates": [0, 0] }
                    ]
                }
            }
        }
    }));
    let records = decode(&d).expect("decode");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Named");
}

#[test]
fn explicit_object_must_exist() {
    let mut value = two_squares();
    value["object"] = json!("provinces");
    let err = decode(&descriptor(value)).expect_err("missing object");
    assert!(matches!(err, MapError::Topology(_)));
}

#[test]
fn out_of_range_arc_is_an_error() {
    let d = descriptor(json!({
        "topology": {
            "type": "Topology",
            "arcs": [],
            "objects": { "countries": { "type": "Polygon", "arcs": [[3]] } }
        }
    }));
    assert!(matches!(decode(&d), Err(MapError::Topology(_))));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(Descriptor::from_json("{ not json"), Err(MapError::Parse(_))));
    assert!(matches!(Descriptor::from_json("{}"), Err(MapError::Parse(_))));
}
