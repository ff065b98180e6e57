//! Scaffolding and mutation against the real filesystem
//!
//! Same workflows as the hermetic scenarios but through
//! `LiveFileSystemProvider` inside a temp-dir sandbox, so path handling and
//! on-disk layout are exercised for real.

use xcforge::pbx::scaffold::TemplateRegistry;
use xcforge::{
    LiveFileSystemProvider, MockProcessProvider, NewProjectSpec, ProjectKind, XcodeProject,
    create_new_project, decode, encode,
};
use xcforge_tests::TestEnvironment;

fn spec(env: &TestEnvironment, name: &str) -> NewProjectSpec {
    NewProjectSpec {
        name: name.to_string(),
        path: env.work_path.clone(),
        kind: ProjectKind::IosApp,
        bundle_identifier: format!("com.acme.{}", name.to_lowercase()),
        deployment_target: "17.0".to_string(),
        display_name: None,
    }
}

#[test]
fn scaffold_writes_a_real_project_tree() {
    let env = TestEnvironment::new().unwrap();
    let fs = LiveFileSystemProvider;
    let process = MockProcessProvider::new();
    let registry = TemplateRegistry::new(&env.templates_path);

    let project = create_new_project(&fs, &process, &registry, &spec(&env, "Journal")).unwrap();

    let project_dir = env.work_path.join("Journal");
    assert!(project_dir.join("Journal.xcodeproj/project.pbxproj").is_file());
    assert!(project_dir.join("Journal/Sources/JournalApp.swift").is_file());
    // the registry installed the embedded template on first use
    assert!(env.templates_path.join("ios-app/template.toml").is_file());

    let text = std::fs::read_to_string(project.manifest_path()).unwrap();
    let graph = decode(&text, "Journal").unwrap();
    assert_eq!(encode(&graph), text);
}

#[test]
fn mutations_persist_across_reloads_on_disk() {
    let env = TestEnvironment::new().unwrap();
    let fs = LiveFileSystemProvider;
    let process = MockProcessProvider::new();
    let registry = TemplateRegistry::new(&env.templates_path);

    let mut project = create_new_project(&fs, &process, &registry, &spec(&env, "Journal")).unwrap();
    project
        .create_new_empty_group_with_its_folder("Models", "Journal")
        .unwrap();
    project
        .create_and_add_new_file_to_target(
            "Entry.swift",
            None,
            "Models",
            "Journal",
            Some("struct Entry {}\n"),
        )
        .unwrap();

    let entry = env.work_path.join("Journal/Journal/Models/Entry.swift");
    assert_eq!(
        std::fs::read_to_string(&entry).unwrap(),
        "struct Entry {}\n"
    );

    let reloaded = XcodeProject::load(&fs, &env.work_path.join("Journal")).unwrap();
    assert!(reloaded.graph().same_structure(project.graph()));

    // removal cleans the folder up again
    project
        .remove_existing_file_from_target("Entry.swift", None, "Models", "Journal")
        .unwrap();
    assert!(!entry.exists());
}
