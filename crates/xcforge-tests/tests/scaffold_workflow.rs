//! Scaffolding workflow: stamp a project from the embedded template and
//! keep working with the returned session

use std::path::{Path, PathBuf};

use xcforge::pbx::scaffold::TemplateRegistry;
use xcforge::{
    FileSystemProvider, MockFileSystemProvider, MockProcessProvider, NewProjectSpec, ProjectKind,
    create_new_project,
};
use xcforge_tests::fixtures::signing_command_line;
use xcforge_tests::init_tracing;

fn spec(name: &str) -> NewProjectSpec {
    NewProjectSpec {
        name: name.to_string(),
        path: PathBuf::from("/work"),
        kind: ProjectKind::IosApp,
        bundle_identifier: format!("com.acme.{}", name.to_lowercase()),
        deployment_target: "17.0".to_string(),
        display_name: None,
    }
}

#[test]
fn scaffolded_project_is_renamed_and_configured() {
    init_tracing();
    let fs = MockFileSystemProvider::new();
    let process = MockProcessProvider::new().with_stdout(&signing_command_line(), "TEAM42\n");
    let registry = TemplateRegistry::new("/templates");

    let project = create_new_project(&fs, &process, &registry, &spec("Journal")).unwrap();

    assert_eq!(project.name(), "Journal");
    assert_eq!(project.get_targets(), vec!["Journal".to_string()]);
    let manifest = fs
        .file_content(Path::new("/work/Journal/Journal.xcodeproj/project.pbxproj"))
        .unwrap();
    assert!(!manifest.contains("IOSAppTemplate"));
    assert!(manifest.contains("IPHONEOS_DEPLOYMENT_TARGET = 17.0;"));
    assert!(manifest.contains("PRODUCT_BUNDLE_IDENTIFIER = com.acme.journal;"));
    assert!(manifest.contains("INFOPLIST_KEY_CFBundleDisplayName = Journal;"));
    assert!(manifest.contains("DEVELOPMENT_TEAM = TEAM42;"));

    let app_swift = fs
        .file_content(Path::new("/work/Journal/Journal/Sources/JournalApp.swift"))
        .unwrap();
    assert!(app_swift.contains("struct JournalApp: App"));
}

#[test]
fn scaffolded_session_accepts_further_mutations() {
    init_tracing();
    let fs = MockFileSystemProvider::new();
    let process = MockProcessProvider::new();
    let registry = TemplateRegistry::new("/templates");

    let mut project = create_new_project(&fs, &process, &registry, &spec("Journal")).unwrap();
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
    project
        .add_spm_library(
            "Journal",
            "RealmSwift",
            "https://github.com/realm/realm-swift.git",
            "10.42.0",
        )
        .unwrap();

    assert!(fs.file_exists(Path::new("/work/Journal/Journal/Models/Entry.swift")));
    let manifest = fs.file_content(&project.manifest_path()).unwrap();
    assert!(manifest.contains("/* Entry.swift in Sources */"));
    assert!(manifest.contains("/* RealmSwift in Frameworks */"));
}

#[test]
fn two_projects_can_stamp_from_the_same_registry() {
    init_tracing();
    let fs = MockFileSystemProvider::new();
    let process = MockProcessProvider::new();
    let registry = TemplateRegistry::new("/templates");

    create_new_project(&fs, &process, &registry, &spec("First")).unwrap();
    create_new_project(&fs, &process, &registry, &spec("Second")).unwrap();

    assert!(fs.file_exists(Path::new("/work/First/First.xcodeproj/project.pbxproj")));
    assert!(fs.file_exists(Path::new("/work/Second/Second.xcodeproj/project.pbxproj")));
    // the installed template itself is untouched by the renames
    assert!(fs.file_exists(Path::new(
        "/templates/ios-app/tree/IOSAppTemplate.xcodeproj/project.pbxproj"
    )));
}
