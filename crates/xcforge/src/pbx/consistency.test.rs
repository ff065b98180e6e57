use super::*;
use crate::pbx::graph::ProjectGraph;
use crate::pbx::id::IdAllocator;
use crate::pbx::objects::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileReference, Group,
    NativeTarget, Project,
};
use crate::pbx::store::ObjectStore;
use crate::primitives::{PhaseKind, ProductType, SourceTree};

fn id(tag: &str) -> ObjectId {
    ObjectId::new(format!("{tag:0>24}"))
}

fn valid_store() -> ObjectStore {
    let mut store = ObjectStore::new();
    let mut put = |tag: &str, object: Object| {
        store.add(id(tag), object).unwrap();
    };

    put(
        "F1",
        Object::FileReference(FileReference {
            explicit_file_type: None,
            include_in_index: None,
            last_known_file_type: Some("sourcecode.swift".to_string()),
            name: None,
            path: "App.swift".to_string(),
            source_tree: SourceTree::Group,
        }),
    );
    put("B1", Object::BuildFile(BuildFile::for_file(id("F1"))));
    put("P1", {
        let mut phase = BuildPhase::new(PhaseKind::Sources);
        phase.files.push(id("B1"));
        Object::BuildPhase(phase)
    });
    put(
        "C1",
        Object::BuildConfiguration(BuildConfiguration::new("Debug")),
    );
    put(
        "L1",
        Object::ConfigurationList(ConfigurationList {
            build_configurations: vec![id("C1")],
            default_configuration_is_visible: false,
            default_configuration_name: Some("Debug".to_string()),
        }),
    );
    put(
        "T1",
        Object::NativeTarget(NativeTarget {
            build_configuration_list: Some(id("L1")),
            build_phases: vec![id("P1")],
            build_rules: Vec::new(),
            dependencies: Vec::new(),
            name: "App".to_string(),
            package_product_dependencies: Vec::new(),
            product_name: None,
            product_reference: None,
            product_type: ProductType::Application,
        }),
    );
    put(
        "G1",
        Object::Group(Group {
            children: vec![id("F1")],
            name: None,
            path: Some("Sources".to_string()),
            source_tree: SourceTree::Group,
        }),
    );
    put(
        "G0",
        Object::Group(Group {
            children: vec![id("G1")],
            name: None,
            path: None,
            source_tree: SourceTree::Group,
        }),
    );
    put(
        "C2",
        Object::BuildConfiguration(BuildConfiguration::new("Debug")),
    );
    put(
        "L2",
        Object::ConfigurationList(ConfigurationList {
            build_configurations: vec![id("C2")],
            default_configuration_is_visible: false,
            default_configuration_name: Some("Debug".to_string()),
        }),
    );
    put(
        "R1",
        Object::Project(Project {
            build_configuration_list: id("L2"),
            compatibility_version: "Xcode 14.0".to_string(),
            development_region: "en".to_string(),
            has_scanned_for_encodings: false,
            known_regions: vec!["en".to_string()],
            main_group: id("G0"),
            package_references: Vec::new(),
            product_ref_group: None,
            project_dir_path: String::new(),
            project_root: String::new(),
            targets: vec![id("T1")],
        }),
    );
    store
}

fn graph_from(store: ObjectStore) -> ProjectGraph {
    ProjectGraph::from_parts("Check", "1", "56", store, IdAllocator::new("Check"), id("R1"))
        .unwrap()
}

fn edit(graph: &mut ProjectGraph, tag: &str, edit: impl FnOnce(&mut Object)) {
    let object_id = id(tag);
    edit(graph.store_mut().get_mut(&object_id).unwrap());
}

#[test]
fn valid_graph_passes() {
    let graph = graph_from(valid_store());
    assert_eq!(check(&graph), Ok(()));
}

#[test]
fn dangling_ownership_edge_is_reported() {
    let mut graph = graph_from(valid_store());
    edit(&mut graph, "T1", |object| {
        object.as_native_target_mut().unwrap().build_phases.push(id("ZZ"));
    });
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::DanglingReference {
            from: id("T1"),
            to: id("ZZ"),
        })
    );
}

#[test]
fn dangling_build_file_reference_is_reported() {
    let mut graph = graph_from(valid_store());
    edit(&mut graph, "B1", |object| {
        object.as_build_file_mut().unwrap().file_ref = Some(id("ZZ"));
    });
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::DanglingReference {
            from: id("B1"),
            to: id("ZZ"),
        })
    );
}

#[test]
fn duplicate_group_child_is_reported() {
    let mut graph = graph_from(valid_store());
    edit(&mut graph, "G1", |object| {
        object.as_group_mut().unwrap().children.push(id("F1"));
    });
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::DuplicateChild {
            group: id("G1"),
            child: id("F1"),
        })
    );
}

#[test]
fn two_build_files_for_one_reference_in_a_phase_are_reported() {
    let mut store = valid_store();
    store
        .add(id("B2"), Object::BuildFile(BuildFile::for_file(id("F1"))))
        .unwrap();
    let mut graph = graph_from(store);
    edit(&mut graph, "P1", |object| {
        object.as_build_phase_mut().unwrap().files.push(id("B2"));
    });
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::DuplicateBuildFile {
            phase: id("P1"),
            binding: id("F1"),
        })
    );
}

#[test]
fn shared_ownership_is_reported() {
    let mut store = valid_store();
    store
        .add(
            id("G2"),
            Object::Group(Group {
                children: vec![id("F1")],
                name: Some("Other".to_string()),
                path: None,
                source_tree: SourceTree::Group,
            }),
        )
        .unwrap();
    let mut graph = graph_from(store);
    edit(&mut graph, "G0", |object| {
        object.as_group_mut().unwrap().children.push(id("G2"));
    });
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::MultipleOwners { object: id("F1") })
    );
}

#[test]
fn floating_ownership_cycle_is_reported() {
    let mut store = valid_store();
    store
        .add(
            id("G8"),
            Object::Group(Group {
                children: vec![id("G9")],
                name: None,
                path: None,
                source_tree: SourceTree::Group,
            }),
        )
        .unwrap();
    store
        .add(
            id("G9"),
            Object::Group(Group {
                children: vec![id("G8")],
                name: None,
                path: None,
                source_tree: SourceTree::Group,
            }),
        )
        .unwrap();
    let graph = graph_from(store);
    match check(&graph) {
        Err(ConsistencyError::OwnershipCycle { start }) => {
            assert!(start == id("G8") || start == id("G9"));
        }
        other => panic!("expected ownership cycle, got {other:?}"),
    }
}

#[test]
fn build_file_must_bind_exactly_one_side() {
    let mut graph = graph_from(valid_store());
    edit(&mut graph, "B1", |object| {
        object.as_build_file_mut().unwrap().file_ref = None;
    });
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::EmptyBuildFile { build_file: id("B1") })
    );

    // B1 bound on both sides also collides with itself inside P1; the
    // shape violation must win no matter how the store iterates
    for _ in 0..8 {
        let mut graph = graph_from(valid_store());
        edit(&mut graph, "B1", |object| {
            object.as_build_file_mut().unwrap().product_ref = Some(id("F1"));
        });
        assert_eq!(
            check(&graph),
            Err(ConsistencyError::AmbiguousBuildFile { build_file: id("B1") })
        );
    }
}

#[test]
fn second_project_record_is_reported() {
    let mut store = valid_store();
    let extra = Project {
        build_configuration_list: id("L2"),
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
    };
    store.add(id("R2"), Object::Project(extra)).unwrap();
    let graph = graph_from(store);
    assert_eq!(
        check(&graph),
        Err(ConsistencyError::MultipleProjects { count: 2 })
    );
}

#[test]
fn missing_root_is_reported() {
    let mut graph = graph_from(valid_store());
    graph.store_mut().remove(&id("R1"));
    assert!(matches!(
        check(&graph),
        Err(ConsistencyError::RootInvalid { .. })
    ));
}

#[test]
fn unowned_objects_warn_but_pass() {
    let mut store = valid_store();
    store
        .add(
            id("F9"),
            Object::FileReference(FileReference {
                explicit_file_type: None,
                include_in_index: None,
                last_known_file_type: None,
                name: None,
                path: "Loose.swift".to_string(),
                source_tree: SourceTree::Group,
            }),
        )
        .unwrap();
    let graph = graph_from(store);
    assert_eq!(check(&graph), Ok(()));
}
