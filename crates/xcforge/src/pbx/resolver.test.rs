use super::*;
use crate::pbx::id::IdAllocator;
use crate::pbx::objects::{BuildPhase, Group, Project};
use crate::pbx::store::ObjectStore;
use crate::primitives::PhaseKind;

fn id(tag: &str) -> ObjectId {
    ObjectId::new(format!("{tag:0>24}"))
}

fn small_graph() -> ProjectGraph {
    let mut store = ObjectStore::new();
    store
        .add(id("P1"), Object::BuildPhase(BuildPhase::new(PhaseKind::Sources)))
        .unwrap();
    store
        .add(
            id("G0"),
            Object::Group(Group {
                children: Vec::new(),
                name: None,
                path: None,
                source_tree: SourceTree::Group,
            }),
        )
        .unwrap();
    store
        .add(
            id("R1"),
            Object::Project(Project {
                build_configuration_list: id("L1"),
                compatibility_version: "Xcode 14.0".to_string(),
                development_region: "en".to_string(),
                has_scanned_for_encodings: false,
                known_regions: Vec::new(),
                main_group: id("G0"),
                package_references: Vec::new(),
                product_ref_group: None,
                project_dir_path: String::new(),
                project_root: String::new(),
                targets: Vec::new(),
            }),
        )
        .unwrap();
    ProjectGraph::from_parts("Small", "1", "56", store, IdAllocator::new("Small"), id("R1"))
        .unwrap()
}

#[test]
fn relativizes_paths_under_the_root() {
    assert_eq!(
        relative_to_source_root("/work/App/Sources/Foo.swift", "/work/App").unwrap(),
        "Sources/Foo.swift"
    );
    assert_eq!(
        relative_to_source_root("/work/App/Top.swift", "/work/App").unwrap(),
        "Top.swift"
    );
}

#[test]
fn relativize_ignores_trailing_separators_and_dot_segments() {
    assert_eq!(
        relative_to_source_root("/work/App/./Sources/Foo.swift", "/work/App/").unwrap(),
        "Sources/Foo.swift"
    );
}

#[test]
fn path_outside_root_is_rejected() {
    let err = relative_to_source_root("/elsewhere/Foo.swift", "/work/App").unwrap_err();
    assert_eq!(
        err,
        ResolverError::PathNotUnderSourceRoot {
            path: "/elsewhere/Foo.swift".to_string(),
            source_root: "/work/App".to_string(),
        }
    );
}

#[test]
fn sibling_prefix_is_not_under_root() {
    // String prefix matches, component prefix does not
    assert!(relative_to_source_root("/work/AppKit/Foo.swift", "/work/App").is_err());
}

#[test]
fn source_root_itself_is_rejected() {
    assert!(relative_to_source_root("/work/App", "/work/App").is_err());
    assert!(relative_to_source_root("/work/App/", "/work/App").is_err());
}

#[test]
fn find_or_create_reuses_existing_reference() {
    let mut graph = small_graph();
    let (first, created_first) =
        find_or_create_file_reference(&mut graph, "/work/App/Sources/Foo.swift", "/work/App")
            .unwrap();
    let (second, created_second) =
        find_or_create_file_reference(&mut graph, "/work/App/Sources/Foo.swift", "/work/App")
            .unwrap();

    assert!(created_first);
    assert!(!created_second);
    assert_eq!(first, second);
    assert_eq!(graph.store().file_references().count(), 1);

    let reference = graph.file_reference(&first).unwrap();
    assert_eq!(reference.path, "Sources/Foo.swift");
    assert_eq!(reference.name.as_deref(), Some("Foo.swift"));
    assert_eq!(
        reference.last_known_file_type.as_deref(),
        Some("sourcecode.swift")
    );
    assert_eq!(reference.source_tree, SourceTree::Group);
}

#[test]
fn top_level_reference_carries_no_redundant_name() {
    let mut graph = small_graph();
    let (reference_id, _) =
        find_or_create_file_reference(&mut graph, "/work/App/Top.swift", "/work/App").unwrap();
    let reference = graph.file_reference(&reference_id).unwrap();
    assert_eq!(reference.path, "Top.swift");
    assert_eq!(reference.name, None);
}

#[test]
fn ensure_build_file_is_idempotent_per_phase() {
    let mut graph = small_graph();
    let (reference_id, _) =
        find_or_create_file_reference(&mut graph, "/work/App/Sources/Foo.swift", "/work/App")
            .unwrap();

    let (first, created_first) = ensure_build_file(&mut graph, &id("P1"), &reference_id).unwrap();
    let (second, created_second) = ensure_build_file(&mut graph, &id("P1"), &reference_id).unwrap();

    assert!(created_first);
    assert!(!created_second);
    assert_eq!(first, second);
    assert_eq!(graph.build_phase(&id("P1")).unwrap().files, vec![first]);
    assert_eq!(graph.store().build_files().count(), 1);
}

#[test]
fn ensure_build_file_requires_a_phase() {
    let mut graph = small_graph();
    let (reference_id, _) =
        find_or_create_file_reference(&mut graph, "/work/App/Sources/Foo.swift", "/work/App")
            .unwrap();
    let before = graph.store().len();
    let err = ensure_build_file(&mut graph, &id("ZZ"), &reference_id).unwrap_err();
    assert!(matches!(err, ResolverError::Graph { .. }));
    assert_eq!(graph.store().len(), before);
}
