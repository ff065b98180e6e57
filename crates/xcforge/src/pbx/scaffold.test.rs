use super::*;

use crate::application::session_mocks::{MockFileSystemProvider, MockProcessProvider};
use crate::pbx::codec;

fn registry() -> TemplateRegistry {
    TemplateRegistry::new("/templates")
}

fn spec() -> NewProjectSpec {
    NewProjectSpec {
        name: "MyApp".to_string(),
        path: PathBuf::from("/work"),
        kind: ProjectKind::IosApp,
        bundle_identifier: "com.acme.myapp".to_string(),
        deployment_target: "17.0".to_string(),
        display_name: Some("My App".to_string()),
    }
}

fn signing_process(team: &str) -> MockProcessProvider {
    let plist = BaseDirs::new()
        .unwrap()
        .home_dir()
        .join("Library/Preferences/com.apple.dt.Xcode.plist");
    let command_line = format!(
        "defaults read {} IDEProvisioningTeamManagerLastSelectedTeamID",
        plist.to_string_lossy()
    );
    MockProcessProvider::new().with_stdout(&command_line, &format!("{team}\n"))
}

#[test]
fn embedded_template_round_trips_byte_for_byte() {
    let graph = codec::decode(IOS_APP_TEMPLATE_PBXPROJ, "IOSAppTemplate").unwrap();
    assert_eq!(codec::encode(&graph), IOS_APP_TEMPLATE_PBXPROJ);
}

#[test]
fn embedded_manifest_describes_the_template() {
    let manifest: TemplateManifest = toml::from_str(IOS_APP_TEMPLATE_MANIFEST).unwrap();
    assert_eq!(manifest.name, "IOSAppTemplate");
    assert_eq!(manifest.kind, ProjectKind::IosApp);
    assert_eq!(manifest.deployment_target, "16.0");
    assert!(IOS_APP_TEMPLATE_PBXPROJ.contains(&format!(
        "IPHONEOS_DEPLOYMENT_TARGET = {};",
        manifest.deployment_target
    )));
    for source in &manifest.sources {
        assert!(IOS_APP_TEMPLATE_PBXPROJ.contains(source.rsplit('/').next().unwrap()));
    }
}

#[test]
fn resolve_installs_the_embedded_ios_app_template_on_first_use() {
    let fs = MockFileSystemProvider::new();
    let template = registry().resolve(&fs, ProjectKind::IosApp).unwrap();
    assert_eq!(template.manifest.name, "IOSAppTemplate");
    assert_eq!(template.tree, PathBuf::from("/templates/ios-app/tree"));
    assert_eq!(
        fs.file_content(Path::new("/templates/ios-app/template.toml")),
        Some(IOS_APP_TEMPLATE_MANIFEST.to_string())
    );
    assert!(fs.file_exists(Path::new(
        "/templates/ios-app/tree/IOSAppTemplate.xcodeproj/project.pbxproj"
    )));
}

#[test]
fn resolve_prefers_an_installed_template_over_the_embedded_one() {
    let fs = MockFileSystemProvider::new().with_file(
        "/templates/ios-app/template.toml",
        "name = \"Custom\"\nkind = \"ios-app\"\ndeployment_target = \"15.0\"\n",
    );
    let template = registry().resolve(&fs, ProjectKind::IosApp).unwrap();
    assert_eq!(template.manifest.name, "Custom");
    assert_eq!(template.manifest.deployment_target, "15.0");
}

#[test]
fn resolve_rejects_kinds_with_no_installed_template() {
    let fs = MockFileSystemProvider::new();
    let err = registry().resolve(&fs, ProjectKind::MacApp).unwrap_err();
    assert!(matches!(
        err,
        ScaffoldError::TemplateNotFound {
            kind: ProjectKind::MacApp
        }
    ));
}

#[test]
fn resolve_reports_a_malformed_manifest() {
    let fs = MockFileSystemProvider::new()
        .with_file("/templates/ios-app/template.toml", "not = valid = toml");
    let err = registry().resolve(&fs, ProjectKind::IosApp).unwrap_err();
    assert!(matches!(err, ScaffoldError::Manifest { .. }));
}

#[test]
fn create_new_project_stamps_renames_and_configures() {
    let fs = MockFileSystemProvider::new();
    let process = signing_process("TEAM123");
    let project = create_new_project(&fs, &process, &registry(), &spec()).unwrap();

    assert_eq!(project.name(), "MyApp");
    assert_eq!(project.get_targets(), vec!["MyApp".to_string()]);

    let manifest = fs
        .file_content(Path::new("/work/MyApp/MyApp.xcodeproj/project.pbxproj"))
        .unwrap();
    assert!(!manifest.contains("IOSAppTemplate"));
    assert!(manifest.contains("/* MyAppApp.swift in Sources */"));
    assert!(manifest.contains("IPHONEOS_DEPLOYMENT_TARGET = 17.0;"));
    assert!(manifest.contains("PRODUCT_BUNDLE_IDENTIFIER = com.acme.myapp;"));
    assert!(manifest.contains("INFOPLIST_KEY_CFBundleDisplayName = \"My App\";"));
    assert!(manifest.contains("DEVELOPMENT_TEAM = TEAM123;"));

    let app_swift = fs
        .file_content(Path::new("/work/MyApp/MyApp/Sources/MyAppApp.swift"))
        .unwrap();
    assert!(app_swift.contains("struct MyAppApp: App"));
    assert!(!app_swift.contains("IOSAppTemplate"));
}

#[test]
fn stamping_renames_every_manifest_listed_source() {
    let fs = MockFileSystemProvider::new()
        .with_file(
            "/templates/ios-app/template.toml",
            "name = \"IOSAppTemplate\"\nkind = \"ios-app\"\ndeployment_target = \"16.0\"\n\
             sources = [\n    \"IOSAppTemplate/Sources/IOSAppTemplateApp.swift\",\n    \
             \"IOSAppTemplate/Sources/Helpers.swift\",\n]\n",
        )
        .with_file(
            "/templates/ios-app/tree/IOSAppTemplate.xcodeproj/project.pbxproj",
            IOS_APP_TEMPLATE_PBXPROJ,
        )
        .with_file(
            "/templates/ios-app/tree/IOSAppTemplate/Sources/IOSAppTemplateApp.swift",
            IOS_APP_TEMPLATE_APP_SWIFT,
        )
        .with_file(
            "/templates/ios-app/tree/IOSAppTemplate/Sources/Helpers.swift",
            "enum IOSAppTemplateEnv {}\n",
        );
    let process = MockProcessProvider::new();
    create_new_project(&fs, &process, &registry(), &spec()).unwrap();

    // placeholder-named file is moved, plain-named file only rewritten
    assert!(fs.file_exists(Path::new("/work/MyApp/MyApp/Sources/MyAppApp.swift")));
    assert_eq!(
        fs.file_content(Path::new("/work/MyApp/MyApp/Sources/Helpers.swift")),
        Some("enum MyAppEnv {}\n".to_string())
    );
}

#[test]
fn create_new_project_tolerates_a_missing_signing_team() {
    let fs = MockFileSystemProvider::new();
    let process = MockProcessProvider::new();
    let project = create_new_project(&fs, &process, &registry(), &spec()).unwrap();
    let manifest = fs
        .file_content(&project.manifest_path())
        .unwrap();
    assert!(!manifest.contains("DEVELOPMENT_TEAM"));
    assert!(manifest.contains("PRODUCT_BUNDLE_IDENTIFIER = com.acme.myapp;"));
}

#[test]
fn create_new_project_refuses_an_existing_destination() {
    let fs = MockFileSystemProvider::new().with_directory("/work/MyApp");
    let process = MockProcessProvider::new();
    let err = create_new_project(&fs, &process, &registry(), &spec()).unwrap_err();
    assert!(matches!(err, ScaffoldError::DestinationExists { .. }));
}

#[test]
fn stamped_manifest_is_engine_output() {
    let fs = MockFileSystemProvider::new();
    let process = MockProcessProvider::new();
    let project = create_new_project(&fs, &process, &registry(), &spec()).unwrap();
    let on_disk = fs.file_content(&project.manifest_path()).unwrap();
    assert_eq!(project.manifest_text(), on_disk);
    let reloaded = codec::decode(&on_disk, "MyApp").unwrap();
    assert_eq!(codec::encode(&reloaded), on_disk);
}
