//! Swift package workflows: binding products, sharing a package
//! reference, and the full removal cascade

use std::path::Path;

use xcforge::{ProjectError, XcodeProject};
use xcforge_tests::fixtures::{DEMO_DIR, demo_project_fs};
use xcforge_tests::init_tracing;

const REALM_URL: &str = "https://github.com/realm/realm-swift.git";

#[test]
fn binding_a_package_product_links_it_into_frameworks() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();

    project
        .add_spm_library("Demo", "RealmSwift", REALM_URL, "10.42.0")
        .unwrap();

    let manifest = fs.file_content(&project.manifest_path()).unwrap();
    assert!(manifest.contains("XCRemoteSwiftPackageReference \"realm-swift\""));
    assert!(manifest.contains("repositoryURL = \"https://github.com/realm/realm-swift.git\";"));
    assert!(manifest.contains("kind = upToNextMajorVersion;"));
    assert!(manifest.contains("minimumVersion = 10.42.0;"));
    assert!(manifest.contains("/* RealmSwift in Frameworks */"));
}

#[test]
fn two_products_share_one_package_reference() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();

    project
        .add_spm_library("Demo", "Realm", REALM_URL, "10.42.0")
        .unwrap();
    project
        .add_spm_library("Demo", "RealmSwift", REALM_URL, "10.42.0")
        .unwrap();

    let graph = project.graph();
    assert_eq!(graph.store().remote_package_references().count(), 1);
    assert_eq!(graph.store().package_product_dependencies().count(), 2);
    assert_eq!(graph.project().unwrap().package_references.len(), 1);
}

#[test]
fn removing_one_product_keeps_a_still_used_package() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();
    project
        .add_spm_library("Demo", "Realm", REALM_URL, "10.42.0")
        .unwrap();
    project
        .add_spm_library("Demo", "RealmSwift", REALM_URL, "10.42.0")
        .unwrap();

    project.remove_spm_library("Realm").unwrap();

    let graph = project.graph();
    assert_eq!(graph.store().remote_package_references().count(), 1);
    assert_eq!(graph.store().package_product_dependencies().count(), 1);

    project.remove_spm_library("RealmSwift").unwrap();
    let graph = project.graph();
    assert_eq!(graph.store().remote_package_references().count(), 0);
    assert!(graph.project().unwrap().package_references.is_empty());
    let manifest = fs.file_content(&project.manifest_path()).unwrap();
    assert!(!manifest.contains("realm-swift"));
}

#[test]
fn package_operations_validate_their_inputs() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();

    let err = project
        .add_spm_library("Demo", "RealmSwift", REALM_URL, "latest")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::InvalidPackageVersion {
            version: "latest".to_string()
        }
    );

    let err = project
        .add_spm_library("Ghost", "RealmSwift", REALM_URL, "10.42.0")
        .unwrap_err();
    assert_eq!(
        err,
        ProjectError::TargetNotFound {
            name: "Ghost".to_string()
        }
    );

    let err = project.remove_spm_library("RealmSwift").unwrap_err();
    assert_eq!(
        err,
        ProjectError::PackageProductNotFound {
            name: "RealmSwift".to_string()
        }
    );
}
