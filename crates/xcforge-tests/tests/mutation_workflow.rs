//! End-to-end mutation workflow over a loaded project
//!
//! Drives the session API the way a generator tool would: add a target,
//! wire files and scripts into it, adjust settings, and check that every
//! step persisted a manifest the engine can read back.

use std::collections::BTreeMap;
use std::path::Path;

use xcforge::{
    BuildSettings, PhaseKind, ProductType, SettingValue, XcodeProject, decode,
};
use xcforge_tests::fixtures::{DEMO_DIR, demo_project_fs};
use xcforge_tests::init_tracing;

#[test]
fn session_workflow_builds_up_a_project() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();

    // new framework target with its own configurations
    let mut settings = BTreeMap::new();
    let mut per_config = BuildSettings::new();
    per_config.insert("SWIFT_VERSION".to_string(), SettingValue::scalar("5.0"));
    settings.insert("Debug".to_string(), per_config.clone());
    settings.insert("Release".to_string(), per_config);
    project
        .add_target("DemoKit", ProductType::Framework, &settings)
        .unwrap();
    assert_eq!(
        project.get_targets(),
        vec!["Demo".to_string(), "DemoKit".to_string()]
    );

    // compile a new file in the app target
    let feature = format!("{DEMO_DIR}/Sources/Feature.swift");
    project.add_file("Demo", &feature, DEMO_DIR).unwrap();

    // group with collected files
    project
        .add_group_and_files(
            "Networking",
            &[format!("{DEMO_DIR}/Networking/Client.swift")],
            DEMO_DIR,
        )
        .unwrap();

    // framework and resource bindings
    project
        .add_dependency("Demo", "System/Library/Frameworks/CoreData.framework")
        .unwrap();
    project
        .add_resources("Demo", &[format!("{DEMO_DIR}/Assets.xcassets")], DEMO_DIR)
        .unwrap();

    // lint script ahead of compilation
    let script_id = project
        .add_build_script_before_compile_sources("Demo", "Lint", "swiftlint\n")
        .unwrap();
    let target_id = project.find_target("Demo").unwrap();
    let target = project.graph().native_target(&target_id).unwrap();
    assert_eq!(target.build_phases[0], script_id);
    let sources_after_script = project
        .graph()
        .build_phase(&target.build_phases[1])
        .unwrap();
    assert_eq!(sources_after_script.kind, PhaseKind::Sources);

    // settings pass
    project
        .update_bundle_identifier("Demo", "com.acme.demo")
        .unwrap();
    project
        .set_swift_compiler_flags("Demo", &["-DFEATURE_A".to_string()])
        .unwrap();

    // the persisted manifest matches the session and reads back
    let text = fs
        .file_content(&project.manifest_path())
        .unwrap();
    assert_eq!(text, project.manifest_text());
    let reloaded = decode(&text, "Demo").unwrap();
    assert!(reloaded.same_structure(project.graph()));
}

#[test]
fn reloading_after_mutations_yields_the_same_session_state() {
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
        .update_display_name("Demo", "Demo App")
        .unwrap();

    let reloaded = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();
    assert!(reloaded.graph().same_structure(project.graph()));
    assert_eq!(reloaded.manifest_text(), project.manifest_text());
}

#[test]
fn failed_mutations_leave_the_manifest_untouched() {
    init_tracing();
    let fs = demo_project_fs();
    let mut project = XcodeProject::load(&fs, Path::new(DEMO_DIR)).unwrap();
    let before = fs.file_content(&project.manifest_path()).unwrap();

    assert!(
        project
            .add_file("Ghost", &format!("{DEMO_DIR}/a.swift"), DEMO_DIR)
            .is_err()
    );
    assert!(
        project
            .add_file("Demo", "/elsewhere/a.swift", DEMO_DIR)
            .is_err()
    );
    assert!(project.remove_target("Ghost").is_err());

    assert_eq!(fs.file_content(&project.manifest_path()).unwrap(), before);
}
