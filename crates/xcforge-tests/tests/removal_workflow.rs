//! Removal workflows: strict resolution, cascades, and atomic failures

use std::collections::BTreeMap;
use std::path::Path;

use xcforge::{FileSystemProvider, ProductType, ProjectError, XcodeProject};
use xcforge_tests::fixtures::{DEMO_DIR, demo_project_fs};
use xcforge_tests::init_tracing;

#[test]
fn removing_a_file_scrubs_graph_and_disk() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();

    project
        .remove_existing_file_from_target("App.swift", None, "Demo", "Demo")
        .unwrap();

    assert!(
        project
            .graph()
            .file_reference_id_with_path("App.swift")
            .is_none()
    );
    assert!(!fs.file_exists(Path::new("/work/Demo/Demo/App.swift")));
    let manifest = fs.file_content(&project.manifest_path()).unwrap();
    assert!(!manifest.contains("App.swift"));
}

#[test]
fn removal_of_an_unknown_file_changes_nothing() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();
    let before = fs.file_content(&project.manifest_path()).unwrap();

    let err = project
        .remove_existing_file_from_target("Ghost.swift", None, "Demo", "Demo")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::FileNotFound {
            path: "Ghost.swift".to_string()
        }
    );
    assert_eq!(fs.file_content(&project.manifest_path()).unwrap(), before);
    assert!(fs.file_exists(Path::new("/work/Demo/Demo/App.swift")));
}

#[test]
fn removing_a_group_takes_its_subtree_and_folder() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();

    project
        .create_new_empty_group_with_its_folder("Services", "Demo")
        .unwrap();
    project
        .create_new_empty_group_with_its_folder_inside_group("Auth", "Services", "Demo")
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
    assert!(fs.file_exists(Path::new("/work/Demo/Demo/Services/Api.swift")));

    project
        .remove_group_with_its_folder("Services", None)
        .unwrap();

    assert!(project.graph().group_id_with_path("Services").is_none());
    assert!(project.graph().group_id_with_path("Auth").is_none());
    assert!(
        project
            .graph()
            .file_reference_id_with_path("Api.swift")
            .is_none()
    );
    assert!(!fs.is_directory(Path::new("/work/Demo/Demo/Services")));
}

#[test]
fn removing_a_target_keeps_shared_objects_alive() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();
    project
        .add_target("DemoKit", ProductType::Framework, &BTreeMap::new())
        .unwrap();

    project.remove_target("DemoKit").unwrap();

    assert_eq!(project.get_targets(), vec!["Demo".to_string()]);
    // the surviving target's pieces are untouched
    assert!(
        project
            .graph()
            .file_reference_id_with_path("App.swift")
            .is_some()
    );
    let manifest = fs.file_content(&project.manifest_path()).unwrap();
    assert!(!manifest.contains("DemoKit"));
    assert!(manifest.contains("/* App.swift in Sources */"));
}
