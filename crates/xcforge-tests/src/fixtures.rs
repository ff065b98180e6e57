//! Fixture projects for the workflow scenarios
//!
//! A single-target iOS app manifest, constructed through the engine's own
//! object model and serialized with its codec, seeded into a mock
//! filesystem at [`DEMO_DIR`].

use std::path::PathBuf;

use directories::BaseDirs;
use xcforge::MockFileSystemProvider;
use xcforge::pbx::graph::ProjectGraph;
use xcforge::pbx::id::{IdAllocator, ObjectId};
use xcforge::pbx::objects::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileReference, Group,
    NativeTarget, Object, Project,
};
use xcforge::pbx::store::ObjectStore;
use xcforge::{PhaseKind, ProductType, SourceTree, encode};

/// Directory the fixture project lives in on the mock filesystem
pub const DEMO_DIR: &str = "/work/Demo";

pub fn id(tag: &str) -> ObjectId {
    ObjectId::new(format!("{tag:0>24}"))
}

/// Graph for a one-target app named Demo with sources, frameworks, and
/// resources phases and one compiled file `App.swift`
pub fn demo_graph() -> ProjectGraph {
    let mut debug = BuildConfiguration::new("Debug");
    debug.set("SWIFT_VERSION", "5.0");
    let mut release = BuildConfiguration::new("Release");
    release.set("SWIFT_VERSION", "5.0");

    let sources = BuildPhase {
        files: vec![id("B1")],
        ..BuildPhase::new(PhaseKind::Sources)
    };

    let objects = vec![
        (
            id("R1"),
            Object::Project(Project {
                build_configuration_list: id("L2"),
                compatibility_version: "Xcode 14.0".to_string(),
                development_region: "en".to_string(),
                has_scanned_for_encodings: false,
                known_regions: vec!["en".to_string(), "Base".to_string()],
                main_group: id("G0"),
                package_references: Vec::new(),
                product_ref_group: None,
                project_dir_path: String::new(),
                project_root: String::new(),
                targets: vec![id("T1")],
            }),
        ),
        (
            id("G0"),
            Object::Group(Group {
                children: vec![id("G1")],
                name: None,
                path: None,
                source_tree: SourceTree::Group,
            }),
        ),
        (
            id("G1"),
            Object::Group(Group {
                children: vec![id("F1")],
                name: None,
                path: Some("Demo".to_string()),
                source_tree: SourceTree::Group,
            }),
        ),
        (
            id("F1"),
            Object::FileReference(FileReference {
                explicit_file_type: None,
                include_in_index: None,
                last_known_file_type: Some("sourcecode.swift".to_string()),
                name: None,
                path: "App.swift".to_string(),
                source_tree: SourceTree::Group,
            }),
        ),
        (id("B1"), Object::BuildFile(BuildFile::for_file(id("F1")))),
        (id("P1"), Object::BuildPhase(sources)),
        (
            id("P2"),
            Object::BuildPhase(BuildPhase::new(PhaseKind::Frameworks)),
        ),
        (
            id("P3"),
            Object::BuildPhase(BuildPhase::new(PhaseKind::Resources)),
        ),
        (
            id("T1"),
            Object::NativeTarget(NativeTarget {
                build_configuration_list: Some(id("L1")),
                build_phases: vec![id("P1"), id("P2"), id("P3")],
                build_rules: Vec::new(),
                dependencies: Vec::new(),
                name: "Demo".to_string(),
                package_product_dependencies: Vec::new(),
                product_name: Some("Demo".to_string()),
                product_reference: None,
                product_type: ProductType::Application,
            }),
        ),
        (
            id("L1"),
            Object::ConfigurationList(ConfigurationList {
                build_configurations: vec![id("C1"), id("C2")],
                default_configuration_is_visible: false,
                default_configuration_name: Some("Release".to_string()),
            }),
        ),
        (
            id("L2"),
            Object::ConfigurationList(ConfigurationList {
                build_configurations: vec![id("C3")],
                default_configuration_is_visible: false,
                default_configuration_name: Some("Release".to_string()),
            }),
        ),
        (id("C1"), Object::BuildConfiguration(debug)),
        (id("C2"), Object::BuildConfiguration(release)),
        (
            id("C3"),
            Object::BuildConfiguration(BuildConfiguration::new("Release")),
        ),
    ];

    let mut store = ObjectStore::new();
    let mut allocator = IdAllocator::new("Demo");
    for (object_id, object) in objects {
        allocator.register(&object_id);
        store.add(object_id, object).unwrap();
    }
    ProjectGraph::from_parts("Demo", "1", "56", store, allocator, id("R1")).unwrap()
}

pub fn demo_manifest_text() -> String {
    encode(&demo_graph())
}

/// Mock filesystem holding the fixture project at [`DEMO_DIR`]
pub fn demo_project_fs() -> MockFileSystemProvider {
    MockFileSystemProvider::new()
        .with_file(
            PathBuf::from(DEMO_DIR).join("Demo.xcodeproj/project.pbxproj"),
            &demo_manifest_text(),
        )
        .with_file(
            PathBuf::from(DEMO_DIR).join("Demo/App.swift"),
            "import SwiftUI\n",
        )
}

/// Command line the engine runs to read the host's last selected team
pub fn signing_command_line() -> String {
    let plist = BaseDirs::new()
        .expect("home directory")
        .home_dir()
        .join("Library/Preferences/com.apple.dt.Xcode.plist");
    format!(
        "defaults read {} IDEProvisioningTeamManagerLastSelectedTeamID",
        plist.to_string_lossy()
    )
}
