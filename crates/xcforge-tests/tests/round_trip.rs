//! Byte-stability of the manifest codec across the public surface

use std::path::Path;

use xcforge::pbx::scaffold::IOS_APP_TEMPLATE_PBXPROJ;
use xcforge::{MANIFEST_HEADER, XcodeProject, decode, encode};
use xcforge_tests::fixtures::{DEMO_DIR, demo_manifest_text, demo_project_fs};
use xcforge_tests::init_tracing;

#[test]
fn embedded_template_round_trips_byte_for_byte() {
    init_tracing();
    let graph = decode(IOS_APP_TEMPLATE_PBXPROJ, "IOSAppTemplate").unwrap();
    assert_eq!(encode(&graph), IOS_APP_TEMPLATE_PBXPROJ);
}

#[test]
fn fixture_manifest_round_trips_byte_for_byte() {
    init_tracing();
    let text = demo_manifest_text();
    assert!(text.starts_with(MANIFEST_HEADER));
    let graph = decode(&text, "Demo").unwrap();
    assert_eq!(encode(&graph), text);
}

#[test]
fn mutated_manifests_stay_stable_under_reencoding() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();
    project
        .add_file(
            "Demo",
            &format!("{DEMO_DIR}/Sources/Feature.swift"),
            DEMO_DIR,
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
    project
        .add_build_script_before_compile_sources("Demo", "Lint", "swiftlint\n")
        .unwrap();

    let text = fs.file_content(&project.manifest_path()).unwrap();
    let graph = decode(&text, "Demo").unwrap();
    assert_eq!(encode(&graph), text);
}
