use super::*;
use crate::pbx::objects::{
    BuildFile, ContainerItemProxy, PackageProductDependency, PackageRequirement,
    RemotePackageReference, TargetDependency,
};
use crate::primitives::{ProductType, SourceTree};

fn id(tag: &str) -> ObjectId {
    ObjectId::new(format!("{tag:0>24}"))
}

struct Fixture {
    store: ObjectStore,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            store: ObjectStore::new(),
        }
    }

    fn put(&mut self, tag: &str, object: Object) -> ObjectId {
        let object_id = id(tag);
        self.store.add(object_id.clone(), object).unwrap();
        object_id
    }

    fn group(&mut self, tag: &str, path: Option<&str>, children: Vec<ObjectId>) -> ObjectId {
        self.put(
            tag,
            Object::Group(Group {
                children,
                name: None,
                path: path.map(str::to_string),
                source_tree: SourceTree::Group,
            }),
        )
    }

    fn file_ref(&mut self, tag: &str, path: &str) -> ObjectId {
        self.put(
            tag,
            Object::FileReference(FileReference {
                explicit_file_type: None,
                include_in_index: None,
                last_known_file_type: Some("sourcecode.swift".to_string()),
                name: None,
                path: path.to_string(),
                source_tree: SourceTree::Group,
            }),
        )
    }

    fn finish(self, root: ObjectId) -> ProjectGraph {
        ProjectGraph::from_parts(
            "Fixture",
            "1",
            "56",
            self.store,
            IdAllocator::new("Fixture"),
            root,
        )
        .unwrap()
    }
}

/// Project with one app target, a sources phase holding one file, and a
/// second empty target depending on the first
fn sample_graph() -> ProjectGraph {
    let mut fx = Fixture::new();

    let app_swift = fx.file_ref("F1", "Sources/App.swift");
    let build_file = fx.put("B1", Object::BuildFile(BuildFile::for_file(app_swift.clone())));

    let sources = fx.put("P1", {
        let mut phase = BuildPhase::new(PhaseKind::Sources);
        phase.files.push(build_file.clone());
        Object::BuildPhase(phase)
    });
    let frameworks = fx.put("P2", Object::BuildPhase(BuildPhase::new(PhaseKind::Frameworks)));

    let debug = fx.put(
        "C1",
        Object::BuildConfiguration(BuildConfiguration::new("Debug")),
    );
    let release = fx.put(
        "C2",
        Object::BuildConfiguration(BuildConfiguration::new("Release")),
    );
    let target_list = fx.put(
        "L1",
        Object::ConfigurationList(ConfigurationList {
            build_configurations: vec![debug, release],
            default_configuration_is_visible: false,
            default_configuration_name: Some("Release".to_string()),
        }),
    );

    let product = fx.file_ref("F2", "App.app");
    let app_target = fx.put(
        "T1",
        Object::NativeTarget(NativeTarget {
            build_configuration_list: Some(target_list),
            build_phases: vec![sources, frameworks],
            build_rules: Vec::new(),
            dependencies: Vec::new(),
            name: "App".to_string(),
            package_product_dependencies: Vec::new(),
            product_name: Some("App".to_string()),
            product_reference: Some(product.clone()),
            product_type: ProductType::Application,
        }),
    );

    let proxy = fx.put(
        "X1",
        Object::ContainerItemProxy(ContainerItemProxy {
            container_portal: id("R1"),
            proxy_type: 1,
            remote_global_id: app_target.clone(),
            remote_info: Some("App".to_string()),
        }),
    );
    let dependency = fx.put(
        "D1",
        Object::TargetDependency(TargetDependency {
            target: Some(app_target.clone()),
            target_proxy: Some(proxy),
        }),
    );
    let tests_target = fx.put(
        "T2",
        Object::NativeTarget(NativeTarget {
            build_configuration_list: None,
            build_phases: Vec::new(),
            build_rules: Vec::new(),
            dependencies: vec![dependency],
            name: "AppTests".to_string(),
            package_product_dependencies: Vec::new(),
            product_name: None,
            product_reference: None,
            product_type: ProductType::UnitTestBundle,
        }),
    );

    let sources_group = fx.group("G1", Some("Sources"), vec![app_swift]);
    let products_group = fx.group("G2", None, vec![product]);
    let main_group = fx.group("G0", None, vec![sources_group, products_group.clone()]);

    let project_debug = fx.put(
        "C3",
        Object::BuildConfiguration(BuildConfiguration::new("Debug")),
    );
    let project_list = fx.put(
        "L2",
        Object::ConfigurationList(ConfigurationList {
            build_configurations: vec![project_debug],
            default_configuration_is_visible: false,
            default_configuration_name: Some("Debug".to_string()),
        }),
    );

    let root = fx.put(
        "R1",
        Object::Project(Project {
            build_configuration_list: project_list,
            compatibility_version: "Xcode 14.0".to_string(),
            development_region: "en".to_string(),
            has_scanned_for_encodings: false,
            known_regions: vec!["en".to_string(), "Base".to_string()],
            main_group,
            package_references: Vec::new(),
            product_ref_group: Some(products_group),
            project_dir_path: String::new(),
            project_root: String::new(),
            targets: vec![app_target, tests_target],
        }),
    );

    fx.finish(root)
}

#[test]
fn from_parts_rejects_missing_or_wrong_root() {
    let store = ObjectStore::new();
    let err = ProjectGraph::from_parts(
        "X",
        "1",
        "56",
        store,
        IdAllocator::new("X"),
        id("R1"),
    )
    .unwrap_err();
    assert_eq!(err, GraphError::RootMissing { id: id("R1") });

    let mut fx = Fixture::new();
    let group = fx.group("G0", None, Vec::new());
    let err = ProjectGraph::from_parts(
        "X",
        "1",
        "56",
        fx.store,
        IdAllocator::new("X"),
        group.clone(),
    )
    .unwrap_err();
    assert_eq!(err, GraphError::RootNotProject { id: group });
}

#[test]
fn target_queries_resolve_by_name_and_order() {
    let graph = sample_graph();
    assert_eq!(graph.target_names(), ["App", "AppTests"]);
    assert_eq!(graph.target_id_named("App"), Some(id("T1")));
    assert_eq!(graph.target_id_named("AppTests"), Some(id("T2")));
    assert_eq!(graph.target_id_named("Nope"), None);
}

#[test]
fn phase_and_build_file_lookups() {
    let graph = sample_graph();
    assert_eq!(
        graph.phase_of_kind(&id("T1"), PhaseKind::Sources),
        Some(id("P1"))
    );
    assert_eq!(
        graph.phase_of_kind(&id("T1"), PhaseKind::Frameworks),
        Some(id("P2"))
    );
    assert_eq!(graph.phase_of_kind(&id("T1"), PhaseKind::Resources), None);
    assert_eq!(
        graph.build_file_in_phase(&id("P1"), &id("F1")),
        Some(id("B1"))
    );
    assert_eq!(graph.build_file_in_phase(&id("P1"), &id("F2")), None);
}

#[test]
fn path_lookups_and_parents() {
    let graph = sample_graph();
    assert_eq!(graph.group_id_with_path("Sources"), Some(id("G1")));
    assert_eq!(graph.group_id_with_path("Missing"), None);
    assert_eq!(
        graph.file_reference_id_with_path("Sources/App.swift"),
        Some(id("F1"))
    );
    assert_eq!(graph.parent_group_of(&id("F1")), Some(id("G1")));
    assert_eq!(graph.parent_group_of(&id("G1")), Some(id("G0")));
}

#[test]
fn typed_lookup_reports_wrong_kind() {
    let graph = sample_graph();
    let err = graph.native_target(&id("G1")).unwrap_err();
    assert_eq!(
        err,
        GraphError::WrongKind {
            id: id("G1"),
            expected: "PBXNativeTarget"
        }
    );
    let err = graph.group(&id("ZZ")).unwrap_err();
    assert_eq!(err, GraphError::ObjectMissing { id: id("ZZ") });
}

#[test]
fn allocate_skips_loaded_identifiers() {
    let mut graph = sample_graph();
    let fresh = graph.allocate_id();
    assert!(!fresh.as_str().is_empty());
    assert!(graph.store().get(&fresh).is_none());
}

#[test]
fn add_object_stores_under_new_id() {
    let mut graph = sample_graph();
    let before = graph.store().len();
    let new_id = graph
        .add_object(Object::BuildConfiguration(BuildConfiguration::new("Beta")))
        .unwrap();
    assert_eq!(graph.store().len(), before + 1);
    assert!(graph.build_configuration(&new_id).is_ok());
}

#[test]
fn remove_file_reference_scrubs_groups_and_phases() {
    let mut graph = sample_graph();
    graph.remove_file_reference_everywhere(&id("F1"));

    assert!(graph.store().get(&id("F1")).is_none());
    assert!(graph.store().get(&id("B1")).is_none());
    assert!(graph.group(&id("G1")).unwrap().children.is_empty());
    assert!(graph.build_phase(&id("P1")).unwrap().files.is_empty());
}

#[test]
fn remove_group_cascade_removes_subtree_and_bindings() {
    let mut graph = sample_graph();
    graph.remove_group_cascade(&id("G1")).unwrap();

    assert!(graph.store().get(&id("G1")).is_none());
    assert!(graph.store().get(&id("F1")).is_none());
    assert!(graph.store().get(&id("B1")).is_none());
    let main_children = &graph.group(&id("G0")).unwrap().children;
    assert_eq!(main_children, &vec![id("G2")]);
    assert!(graph.build_phase(&id("P1")).unwrap().files.is_empty());
}

#[test]
fn remove_group_cascade_requires_a_group() {
    let mut graph = sample_graph();
    let err = graph.remove_group_cascade(&id("ZZ")).unwrap_err();
    assert_eq!(err, GraphError::ObjectMissing { id: id("ZZ") });
}

#[test]
fn remove_target_cascade_clears_every_inbound_link() {
    let mut graph = sample_graph();
    let removed = id("T1");
    graph.remove_target_cascade(&removed).unwrap();

    for gone in ["T1", "P1", "P2", "B1", "L1", "C1", "C2", "F2", "D1", "X1"] {
        assert!(graph.store().get(&id(gone)).is_none(), "{gone} should be gone");
    }
    assert_eq!(graph.project().unwrap().targets, vec![id("T2")]);
    assert!(graph.native_target(&id("T2")).unwrap().dependencies.is_empty());
    assert!(graph.group(&id("G2")).unwrap().children.is_empty());

    let no_stale = graph.store().iter().all(|(_, object)| match object {
        Object::TargetDependency(dep) => dep.target.as_ref() != Some(&removed),
        Object::ContainerItemProxy(proxy) => proxy.remote_global_id != removed,
        _ => true,
    });
    assert!(no_stale);
}

#[test]
fn remove_dependent_target_keeps_dependee() {
    let mut graph = sample_graph();
    graph.remove_target_cascade(&id("T2")).unwrap();

    assert!(graph.store().get(&id("T2")).is_none());
    assert!(graph.store().get(&id("D1")).is_none());
    assert!(graph.store().get(&id("X1")).is_none());
    assert!(graph.native_target(&id("T1")).is_ok());
    assert_eq!(graph.project().unwrap().targets, vec![id("T1")]);
}

#[test]
fn package_cascade_drops_unshared_references() {
    let mut graph = sample_graph();
    let package = graph
        .add_object(Object::RemotePackageReference(RemotePackageReference {
            repository_url: "https://github.com/Alamofire/Alamofire.git".to_string(),
            requirement: PackageRequirement::UpToNextMajor {
                minimum_version: "5.9.1".to_string(),
            },
        }))
        .unwrap();
    let product_dep = graph
        .add_object(Object::PackageProductDependency(PackageProductDependency {
            package: Some(package.clone()),
            product_name: "Alamofire".to_string(),
        }))
        .unwrap();
    graph.project_mut().unwrap().package_references.push(package.clone());
    graph
        .native_target_mut(&id("T1"))
        .unwrap()
        .package_product_dependencies
        .push(product_dep.clone());

    graph.remove_target_cascade(&id("T1")).unwrap();
    assert!(graph.store().get(&product_dep).is_none());
    assert!(graph.store().get(&package).is_none());
    assert!(graph.project().unwrap().package_references.is_empty());
}

#[test]
fn same_structure_ignores_allocator_state() {
    let mut left = sample_graph();
    let right = sample_graph();
    assert!(left.same_structure(&right));

    let _ = left.allocate_id();
    assert!(left.same_structure(&right));

    left.project_mut().unwrap().development_region = "fr".to_string();
    assert!(!left.same_structure(&right));
}
