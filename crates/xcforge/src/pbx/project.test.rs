use super::*;

use crate::application::session_mocks::{MockFileSystemProvider, MockProcessProvider};
use crate::pbx::id::IdAllocator;
use crate::pbx::objects::Project;
use crate::pbx::store::ObjectStore;
use crate::primitives::SettingValue;

fn id(tag: &str) -> ObjectId {
    ObjectId::new(format!("{tag:0>24}"))
}

/// One-target project named Demo with sources, frameworks, and resources
/// phases, its main target group at path `Demo`
fn demo_graph() -> ProjectGraph {
    let mut debug = BuildConfiguration::new("Debug");
    debug.set("SWIFT_VERSION", "5.0");
    let mut release = BuildConfiguration::new("Release");
    release.set("SWIFT_VERSION", "5.0");
    let project_debug = BuildConfiguration::new("Debug");
    let project_release = BuildConfiguration::new("Release");

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
                build_configurations: vec![id("C3"), id("C4")],
                default_configuration_is_visible: false,
                default_configuration_name: Some("Release".to_string()),
            }),
        ),
        (id("C1"), Object::BuildConfiguration(debug)),
        (id("C2"), Object::BuildConfiguration(release)),
        (id("C3"), Object::BuildConfiguration(project_debug)),
        (id("C4"), Object::BuildConfiguration(project_release)),
    ];

    let mut store = ObjectStore::new();
    let mut allocator = IdAllocator::new("Demo");
    for (object_id, object) in objects {
        allocator.register(&object_id);
        store.add(object_id, object).unwrap();
    }
    ProjectGraph::from_parts("Demo", "1", "56", store, allocator, id("R1")).unwrap()
}

fn manifest() -> PathBuf {
    PathBuf::from("/work/Demo/Demo.xcodeproj/project.pbxproj")
}

fn seeded_fs() -> MockFileSystemProvider {
    MockFileSystemProvider::new()
        .with_file(manifest(), &codec::encode(&demo_graph()))
        .with_file("/work/Demo/Demo/App.swift", "import SwiftUI\n")
}

fn load(fs: &MockFileSystemProvider) -> XcodeProject<'_> {
    XcodeProject::load(fs, Path::new("/work/Demo")).unwrap()
}

fn target_setting(project: &XcodeProject<'_>, target: &str, key: &str) -> Vec<SettingValue> {
    let target_id = project.find_target(target).unwrap();
    let list_id = project
        .graph()
        .native_target(&target_id)
        .unwrap()
        .build_configuration_list
        .clone()
        .unwrap();
    let configuration_ids = project
        .graph()
        .configuration_list(&list_id)
        .unwrap()
        .build_configurations
        .clone();
    configuration_ids
        .iter()
        .filter_map(|configuration_id| {
            project
                .graph()
                .build_configuration(configuration_id)
                .unwrap()
                .get(key)
                .cloned()
        })
        .collect()
}

#[test]
fn load_derives_the_name_from_the_directory() {
    let fs = seeded_fs();
    let project = load(&fs);
    assert_eq!(project.name(), "Demo");
    assert_eq!(project.manifest_path(), manifest());
    assert_eq!(project.get_targets(), vec!["Demo".to_string()]);
}

#[test]
fn session_debug_names_the_project_not_the_provider() {
    let fs = seeded_fs();
    let rendered = format!("{:?}", load(&fs));
    assert!(rendered.contains("XcodeProject"));
    assert!(rendered.contains("Demo"));
}

#[test]
fn load_rejects_a_directory_without_a_name() {
    let fs = seeded_fs();
    let err = XcodeProject::load(&fs, Path::new("/")).unwrap_err();
    assert!(matches!(err, ProjectError::InvalidProjectPath { .. }));
}

#[test]
fn load_reports_a_missing_manifest() {
    let fs = MockFileSystemProvider::new().with_directory("/work/Demo");
    let err = XcodeProject::load(&fs, Path::new("/work/Demo")).unwrap_err();
    assert!(matches!(err, ProjectError::Collaborator { .. }));
}

#[test]
fn every_mutation_rewrites_the_manifest() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let before = fs.file_content(&manifest()).unwrap();
    project.update_bundle_identifier("Demo", "com.acme.Demo").unwrap();
    let after = fs.file_content(&manifest()).unwrap();
    assert_ne!(before, after);
    assert!(after.contains("PRODUCT_BUNDLE_IDENTIFIER = com.acme.Demo;"));
    assert_eq!(project.manifest_text(), after);
}

#[test]
fn add_target_creates_configurations_in_name_order() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let mut settings = BTreeMap::new();
    let mut debug = BuildSettings::new();
    debug.insert("SWIFT_VERSION".to_string(), SettingValue::scalar("5.0"));
    settings.insert("Debug".to_string(), debug.clone());
    settings.insert("Release".to_string(), debug);

    let target_id = project
        .add_target("DemoKit", ProductType::Framework, &settings)
        .unwrap();
    assert_eq!(
        project.get_targets(),
        vec!["Demo".to_string(), "DemoKit".to_string()]
    );
    let target = project.graph().native_target(&target_id).unwrap();
    assert_eq!(target.product_type, ProductType::Framework);
    assert_eq!(target.product_name.as_deref(), Some("DemoKit"));
    let list_id = target.build_configuration_list.clone().unwrap();
    let list = project.graph().configuration_list(&list_id).unwrap();
    assert_eq!(list.default_configuration_name.as_deref(), Some("Release"));
    let names: Vec<String> = list
        .build_configurations
        .iter()
        .map(|configuration_id| {
            project
                .graph()
                .build_configuration(configuration_id)
                .unwrap()
                .name
                .clone()
        })
        .collect();
    assert_eq!(names, vec!["Debug".to_string(), "Release".to_string()]);

    let product_ref = target.product_reference.clone().unwrap();
    let product = project.graph().file_reference(&product_ref).unwrap();
    assert_eq!(product.path, "DemoKit.framework");
    assert_eq!(product.explicit_file_type.as_deref(), Some("wrapper.framework"));
    assert_eq!(product.include_in_index, Some(false));
    assert_eq!(product.source_tree, SourceTree::BuiltProductsDir);
}

#[test]
fn add_target_reuses_an_existing_target_of_the_same_type() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let before = fs.file_content(&manifest()).unwrap();
    let existing = project
        .add_target("Demo", ProductType::Application, &BTreeMap::new())
        .unwrap();
    assert_eq!(Some(existing), project.find_target("Demo"));
    assert_eq!(fs.file_content(&manifest()).unwrap(), before);
}

#[test]
fn add_file_binds_the_file_into_the_sources_phase() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_file("Demo", "/work/Demo/Sources/Feature.swift", "/work/Demo")
        .unwrap();
    let ref_id = project
        .graph()
        .file_reference_id_with_path("Sources/Feature.swift")
        .unwrap();
    assert!(
        project
            .graph()
            .build_file_in_phase(&id("P1"), &ref_id)
            .is_some()
    );
    assert!(
        fs.file_content(&manifest())
            .unwrap()
            .contains("/* Feature.swift in Sources */")
    );
}

#[test]
fn add_file_is_idempotent_per_target() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_file("Demo", "/work/Demo/Sources/Feature.swift", "/work/Demo")
        .unwrap();
    let objects = project.graph().store().len();
    project
        .add_file("Demo", "/work/Demo/Sources/Feature.swift", "/work/Demo")
        .unwrap();
    assert_eq!(project.graph().store().len(), objects);
}

#[test]
fn add_file_rejects_an_unknown_target() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let err = project
        .add_file("Ghost", "/work/Demo/Sources/Feature.swift", "/work/Demo")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::TargetNotFound {
            name: "Ghost".to_string()
        }
    );
}

#[test]
fn add_file_rejects_paths_outside_the_source_root() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let err = project
        .add_file("Demo", "/elsewhere/Feature.swift", "/work/Demo")
        .unwrap_err();
    assert!(matches!(err, ProjectError::PathNotUnderSourceRoot { .. }));
}

#[test]
fn add_file_requires_a_sources_phase() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_target("Bare", ProductType::Framework, &BTreeMap::new())
        .unwrap();
    let err = project
        .add_file("Bare", "/work/Demo/Sources/Feature.swift", "/work/Demo")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::PhaseNotFound {
            target: "Bare".to_string(),
            kind: PhaseKind::Sources,
        }
    );
}

#[test]
fn add_group_and_files_nests_a_named_group_under_the_main_group() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let group_id = project
        .add_group_and_files(
            "Networking",
            &[
                "/work/Demo/Networking/Client.swift".to_string(),
                "/work/Demo/App.swift".to_string(),
            ],
            "/work/Demo",
        )
        .unwrap();
    let main_group = project.graph().project().unwrap().main_group.clone();
    assert!(
        project
            .graph()
            .group(&main_group)
            .unwrap()
            .children
            .contains(&group_id)
    );
    let group = project.graph().group(&group_id).unwrap();
    assert_eq!(group.name.as_deref(), Some("Networking"));
    // App.swift already lives in the Demo group and stays there
    assert_eq!(group.children.len(), 1);
    let client = project.graph().file_reference(&group.children[0]).unwrap();
    assert_eq!(client.path, "Networking/Client.swift");
}

#[test]
fn add_dependency_links_a_framework_from_the_sdk() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_dependency("Demo", "System/Library/Frameworks/CoreData.framework")
        .unwrap();
    let ref_id = project
        .graph()
        .file_reference_id_with_path("System/Library/Frameworks/CoreData.framework")
        .unwrap();
    let reference = project.graph().file_reference(&ref_id).unwrap();
    assert_eq!(reference.source_tree, SourceTree::SdkRoot);
    assert_eq!(
        reference.last_known_file_type.as_deref(),
        Some("wrapper.framework")
    );
    assert!(
        project
            .graph()
            .build_file_in_phase(&id("P2"), &ref_id)
            .is_some()
    );

    // second call reuses both the reference and the binding
    let objects = project.graph().store().len();
    project
        .add_dependency("Demo", "System/Library/Frameworks/CoreData.framework")
        .unwrap();
    assert_eq!(project.graph().store().len(), objects);
}

#[test]
fn add_resources_binds_into_the_resources_phase() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_resources(
            "Demo",
            &["/work/Demo/Assets.xcassets".to_string()],
            "/work/Demo",
        )
        .unwrap();
    let ref_id = project
        .graph()
        .file_reference_id_with_path("Assets.xcassets")
        .unwrap();
    assert!(
        project
            .graph()
            .build_file_in_phase(&id("P3"), &ref_id)
            .is_some()
    );
}

#[test]
fn build_script_lands_immediately_before_the_sources_phase() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let phase_id = project
        .add_build_script_before_compile_sources("Demo", "Lint", "swiftlint\n")
        .unwrap();
    let target_id = project.find_target("Demo").unwrap();
    let phases = &project.graph().native_target(&target_id).unwrap().build_phases;
    assert_eq!(phases[0], phase_id);
    assert_eq!(phases[1], id("P1"));
    let phase = project.graph().build_phase(&phase_id).unwrap();
    assert_eq!(phase.kind, PhaseKind::RunScript);
    assert_eq!(phase.name.as_deref(), Some("Lint"));
    assert_eq!(phase.shell_path.as_deref(), Some("/bin/sh"));
}

#[test]
fn settings_updates_touch_every_configuration() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project.update_bundle_identifier("Demo", "com.acme.Demo").unwrap();
    project.update_display_name("Demo", "Acme Demo").unwrap();
    project.set_signing_account("Demo", "TEAM123", Some("profile")).unwrap();
    project.update_info_plist_file_path("Demo").unwrap();

    for key_value in [
        ("PRODUCT_BUNDLE_IDENTIFIER", "com.acme.Demo"),
        ("INFOPLIST_KEY_CFBundleDisplayName", "Acme Demo"),
        ("DEVELOPMENT_TEAM", "TEAM123"),
        ("PROVISIONING_PROFILE_SPECIFIER", "profile"),
        ("INFOPLIST_FILE", "Demo/Info.plist"),
    ] {
        let values = target_setting(&project, "Demo", key_value.0);
        assert_eq!(
            values,
            vec![
                SettingValue::scalar(key_value.1),
                SettingValue::scalar(key_value.1)
            ],
            "{}",
            key_value.0
        );
    }
}

#[test]
fn swift_compiler_flags_append_across_calls() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .set_swift_compiler_flags("Demo", &["-DFEATURE_A".to_string()])
        .unwrap();
    project
        .set_swift_compiler_flags("Demo", &["-DFEATURE_B".to_string()])
        .unwrap();
    let values = target_setting(&project, "Demo", "OTHER_SWIFT_FLAGS");
    assert_eq!(
        values[0],
        SettingValue::list(["-DFEATURE_A", "-DFEATURE_B"])
    );
}

#[test]
fn project_build_settings_merge_per_key() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let mut settings = BuildSettings::new();
    settings.insert(
        "IPHONEOS_DEPLOYMENT_TARGET".to_string(),
        SettingValue::scalar("17.0"),
    );
    project.set_project_build_settings(&settings).unwrap();
    let list_id = project.graph().project().unwrap().build_configuration_list.clone();
    let configuration_ids = project
        .graph()
        .configuration_list(&list_id)
        .unwrap()
        .build_configurations
        .clone();
    for configuration_id in &configuration_ids {
        assert_eq!(
            project
                .graph()
                .build_configuration(configuration_id)
                .unwrap()
                .get("IPHONEOS_DEPLOYMENT_TARGET"),
            Some(&SettingValue::scalar("17.0"))
        );
    }
}

#[test]
fn reference_file_in_project_root_lands_under_the_main_group() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let ref_id = project.reference_file_in_project_root("README.md").unwrap();
    let main_group = project.graph().project().unwrap().main_group.clone();
    assert!(
        project
            .graph()
            .group(&main_group)
            .unwrap()
            .children
            .contains(&ref_id)
    );
    assert_eq!(
        project.reference_file_in_project_root("README.md").unwrap(),
        ref_id
    );
}

#[test]
fn create_and_add_new_file_writes_content_and_links_it() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .create_and_add_new_file_to_target(
            "Model.swift",
            None,
            "Demo",
            "Demo",
            Some("struct Model {}\n"),
        )
        .unwrap();
    assert_eq!(
        fs.file_content(Path::new("/work/Demo/Demo/Model.swift")),
        Some("struct Model {}\n".to_string())
    );
    let ref_id = project
        .graph()
        .file_reference_id_with_path("Model.swift")
        .unwrap();
    assert!(project.graph().group(&id("G1")).unwrap().children.contains(&ref_id));
    assert!(
        project
            .graph()
            .build_file_in_phase(&id("P1"), &ref_id)
            .is_some()
    );
}

#[test]
fn create_and_add_new_file_skips_an_existing_reference() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let before = fs.file_content(&manifest()).unwrap();
    project
        .create_and_add_new_file_to_target("App.swift", None, "Demo", "Demo", None)
        .unwrap();
    assert_eq!(fs.file_content(&manifest()).unwrap(), before);
    assert_eq!(
        fs.file_content(Path::new("/work/Demo/Demo/App.swift")),
        Some("import SwiftUI\n".to_string())
    );
}

#[test]
fn remove_existing_file_deletes_reference_binding_and_disk_file() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .remove_existing_file_from_target("App.swift", None, "Demo", "Demo")
        .unwrap();
    assert!(project.graph().file_reference_id_with_path("App.swift").is_none());
    assert!(project.graph().store().get(&id("B1")).is_none());
    assert!(project.graph().group(&id("G1")).unwrap().children.is_empty());
    assert!(!fs.file_exists(Path::new("/work/Demo/Demo/App.swift")));
}

#[test]
fn remove_existing_file_fails_strictly_without_touching_anything() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let before = fs.file_content(&manifest()).unwrap();

    let err = project
        .remove_existing_file_from_target("Ghost.swift", None, "Demo", "Demo")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::FileNotFound {
            path: "Ghost.swift".to_string()
        }
    );

    let err = project
        .remove_existing_file_from_target("App.swift", None, "Ghost", "Demo")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::GroupNotFound {
            path: "Ghost".to_string()
        }
    );

    let err = project
        .remove_existing_file_from_target("App.swift", None, "Demo", "Ghost")
        .unwrap_err();
    assert!(matches!(err, ProjectError::TargetNotFound { .. }));

    assert_eq!(fs.file_content(&manifest()).unwrap(), before);
    assert!(fs.file_exists(Path::new("/work/Demo/Demo/App.swift")));
}

#[test]
fn create_empty_group_binds_a_folder_on_disk() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let group_id = project
        .create_new_empty_group_with_its_folder("Services", "Demo")
        .unwrap();
    let group = project.graph().group(&group_id).unwrap();
    assert_eq!(group.path.as_deref(), Some("Services"));
    assert!(group.children.is_empty());
    assert!(project.graph().group(&id("G1")).unwrap().children.contains(&group_id));
    assert!(fs.is_directory(Path::new("/work/Demo/Demo/Services")));
}

#[test]
fn create_empty_group_inside_another_group() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .create_new_empty_group_with_its_folder("Services", "Demo")
        .unwrap();
    let nested_id = project
        .create_new_empty_group_with_its_folder_inside_group("Auth", "Services", "Demo")
        .unwrap();
    let parent_id = project.graph().group_id_with_path("Services").unwrap();
    assert!(
        project
            .graph()
            .group(&parent_id)
            .unwrap()
            .children
            .contains(&nested_id)
    );
    assert!(fs.is_directory(Path::new("/work/Demo/Demo/Services/Auth")));
}

#[test]
fn create_empty_group_requires_a_known_parent_and_target() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let err = project
        .create_new_empty_group_with_its_folder("Services", "Ghost")
        .unwrap_err();
    assert!(matches!(err, ProjectError::TargetNotFound { .. }));
    let err = project
        .create_new_empty_group_with_its_folder_inside_group("Auth", "Ghost", "Demo")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::GroupNotFound {
            path: "Ghost".to_string()
        }
    );
}

#[test]
fn remove_group_cascades_and_deletes_the_folder() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .create_new_empty_group_with_its_folder("Services", "Demo")
        .unwrap();
    project
        .create_and_add_new_file_to_target(
            "Api.swift",
            None,
            "Services",
            "Demo",
            Some("enum Api {}\n"),
        )
        .unwrap();
    project.remove_group_with_its_folder("Services", None).unwrap();
    assert!(project.graph().group_id_with_path("Services").is_none());
    assert!(project.graph().file_reference_id_with_path("Api.swift").is_none());
    assert!(!fs.is_directory(Path::new("/work/Demo/Demo/Services")));
}

#[test]
fn remove_target_drops_it_from_the_manifest() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_target("DemoKit", ProductType::Framework, &BTreeMap::new())
        .unwrap();
    project.remove_target("DemoKit").unwrap();
    assert_eq!(project.get_targets(), vec!["Demo".to_string()]);
    assert!(
        !fs.file_content(&manifest())
            .unwrap()
            .contains("DemoKit")
    );
}

#[test]
fn add_spm_library_creates_package_product_and_link() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_spm_library(
            "Demo",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();

    let graph = project.graph();
    let (package_id, package) = graph.store().remote_package_references().next().unwrap();
    assert_eq!(package.repository_url, "https://github.com/realm/realm-swift.git");
    assert_eq!(
        package.requirement,
        PackageRequirement::UpToNextMajor {
            minimum_version: "10.42.0".to_string()
        }
    );
    assert!(graph.project().unwrap().package_references.contains(package_id));

    let (product_id, product) = graph.store().package_product_dependencies().next().unwrap();
    assert_eq!(product.product_name, "RealmSwift");
    assert_eq!(product.package.as_ref(), Some(package_id));
    let target_id = project.find_target("Demo").unwrap();
    assert!(
        graph
            .native_target(&target_id)
            .unwrap()
            .package_product_dependencies
            .contains(product_id)
    );
    let linked = graph
        .build_phase(&id("P2"))
        .unwrap()
        .files
        .iter()
        .any(|build_file_id| {
            graph
                .store()
                .get(build_file_id)
                .and_then(Object::as_build_file)
                .map(|build_file| build_file.product_ref.as_ref() == Some(product_id))
                .unwrap_or(false)
        });
    assert!(linked);
}

#[test]
fn add_spm_library_reuses_the_package_for_a_second_product() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_spm_library(
            "Demo",
            "Realm",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();
    project
        .add_spm_library(
            "Demo",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();
    assert_eq!(project.graph().store().remote_package_references().count(), 1);
    assert_eq!(
        project.graph().store().package_product_dependencies().count(),
        2
    );
}

#[test]
fn add_spm_library_is_idempotent_per_product_and_target() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_spm_library(
            "Demo",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();
    let objects = project.graph().store().len();
    project
        .add_spm_library(
            "Demo",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();
    assert_eq!(project.graph().store().len(), objects);
}

#[test]
fn add_spm_library_rejects_a_malformed_version() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let err = project
        .add_spm_library(
            "Demo",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "latest",
        )
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::InvalidPackageVersion {
            version: "latest".to_string()
        }
    );
}

#[test]
fn remove_spm_library_unbinds_everything() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    project
        .add_spm_library(
            "Demo",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();
    project.remove_spm_library("RealmSwift").unwrap();

    let graph = project.graph();
    assert_eq!(graph.store().remote_package_references().count(), 0);
    assert_eq!(graph.store().package_product_dependencies().count(), 0);
    assert!(graph.project().unwrap().package_references.is_empty());
    let target_id = project.find_target("Demo").unwrap();
    assert!(
        graph
            .native_target(&target_id)
            .unwrap()
            .package_product_dependencies
            .is_empty()
    );
    assert_eq!(graph.build_phase(&id("P2")).unwrap().files.len(), 0);
}

#[test]
fn remove_spm_library_requires_a_known_product() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let err = project.remove_spm_library("Ghost").unwrap_err();
    assert_eq!(
        err,
        ProjectError::PackageProductNotFound {
            name: "Ghost".to_string()
        }
    );
}

#[test]
fn add_file_references_to_target_walks_a_directory() {
    let fs = seeded_fs()
        .with_file("/drop/One.swift", "")
        .with_file("/drop/Sub/Two.swift", "")
        .with_file("/drop/.DS_Store", "junk");
    let mut project = load(&fs);
    project
        .add_file_references_to_target(Path::new("/drop"), "Demo", "Demo")
        .unwrap();
    for name in ["One.swift", "Two.swift"] {
        let ref_id = project.graph().file_reference_id_with_path(name).unwrap();
        assert!(
            project
                .graph()
                .build_file_in_phase(&id("P1"), &ref_id)
                .is_some(),
            "{name}"
        );
    }
    assert!(project.graph().file_reference_id_with_path(".DS_Store").is_none());
}

#[test]
fn apply_host_signing_team_uses_the_host_preference() {
    let fs = seeded_fs();
    let mut project = load(&fs);
    let plist = directories::BaseDirs::new()
        .unwrap()
        .home_dir()
        .join("Library/Preferences/com.apple.dt.Xcode.plist");
    let command_line = format!(
        "defaults read {} IDEProvisioningTeamManagerLastSelectedTeamID",
        plist.to_string_lossy()
    );
    let process = MockProcessProvider::new().with_stdout(&command_line, "TEAM123\n");
    let applied = apply_host_signing_team(&mut project, &process, "Demo").unwrap();
    assert_eq!(applied.as_deref(), Some("TEAM123"));
    assert_eq!(
        target_setting(&project, "Demo", "DEVELOPMENT_TEAM"),
        vec![
            SettingValue::scalar("TEAM123"),
            SettingValue::scalar("TEAM123")
        ]
    );

    let silent = MockProcessProvider::new();
    let applied = apply_host_signing_team(&mut project, &silent, "Demo").unwrap();
    assert_eq!(applied, None);
}
