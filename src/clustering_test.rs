use super::*;
use crate::camera::Point;
use crate::countries::CountryId;
use crate::fixtures::world_descriptor;
use crate::projection::GeoProjection;
use crate::topology::decode;

fn registry() -> CountryRegistry {
    let projection = GeoProjection::new(960.0, 500.0, Point::new(0.0, 0.0));
    CountryRegistry::from_records(decode(&world_descriptor()).expect("decode"), &projection)
}

fn groups() -> Groups {
    let mut g = Groups::new();
    g.insert("North".to_owned(), vec!["Westmark".to_owned()]);
    g.insert("South Side".to_owned(), vec!["Squareland".to_owned(), "Atlantis".to_owned()]);
    g
}

#[test]
fn encode_escapes_non_alphanumerics() {
    assert_eq!(encode("abc-DEF-123"), "abc-DEF-123");
    assert_eq!(encode("a b"), "a_20b");
    assert_eq!(encode("a_b"), "a_5fb");
    assert_eq!(encode("é"), "_c3_a9");
    assert_eq!(selector("GDP 2020", "South Side"), "GDP_202020__South_20Side");
}

#[test]
fn duplicate_add_is_rejected_unchanged() {
    let mut reg = registry();
    let mut clusters = ClusteringRegistry::new();
    assert!(clusters.add("A", groups(), Some(&mut reg)));
    let after_first = clusters.clone();
    let mut other = Groups::new();
    other.insert("X".to_owned(), vec!["Eastia".to_owned()]);
    assert!(!clusters.add("A", other, Some(&mut reg)));
    assert_eq!(clusters, after_first);
    assert!(reg.get(CountryId(1)).expect("country").marks.is_empty());
}

#[test]
fn add_marks_and_remove_unmarks() {
    let mut reg = registry();
    let mut clusters = ClusteringRegistry::new();
    clusters.add("A", groups(), Some(&mut reg));
    let sel = clusters.selector("A", "South Side").expect("selector");
    assert!(reg.by_name("Squareland").expect("country").marks.contains(&sel));
    assert!(reg.by_name("Westmark").expect("country").marks.contains("A__North"));

    assert!(clusters.remove("A", Some(&mut reg)));
    assert!(reg.iter().all(|c| c.marks.is_empty()));
    assert!(!clusters.remove("A", Some(&mut reg)));
    assert!(clusters.get("A").is_none());
}

#[test]
fn selector_requires_known_group() {
    let mut clusters = ClusteringRegistry::new();
    clusters.add("A", groups(), None);
    assert_eq!(clusters.selector("A", "North"), Some("A__North".to_owned()));
    assert_eq!(clusters.selector("A", "Nope"), None);
    assert_eq!(clusters.selector("B", "North"), None);
}

#[test]
fn marks_applied_after_load() {
    let mut clusters = ClusteringRegistry::new();
    clusters.add("A", groups(), None);
    let mut reg = registry();
    clusters.apply_all(&mut reg);
    assert!(reg.by_name("Westmark").expect("country").marks.contains("A__North"));
    assert_eq!(clusters.ids(), vec!["A"]);
}
