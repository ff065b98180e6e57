use super::*;
use crate::primitives::PhaseKind;

#[test]
fn isa_matches_record_kind() {
    let group = Object::Group(Group {
        children: Vec::new(),
        name: None,
        path: None,
        source_tree: SourceTree::Group,
    });
    assert_eq!(group.isa(), "PBXGroup");

    let sources = Object::BuildPhase(BuildPhase::new(PhaseKind::Sources));
    assert_eq!(sources.isa(), "PBXSourcesBuildPhase");
    let script = Object::BuildPhase(BuildPhase::run_script("Lint", "swiftlint"));
    assert_eq!(script.isa(), "PBXShellScriptBuildPhase");
}

#[test]
fn accessors_match_only_their_variant() {
    let mut object = Object::BuildConfiguration(BuildConfiguration::new("Debug"));
    assert!(object.as_build_configuration().is_some());
    assert!(object.as_group().is_none());
    object
        .as_build_configuration_mut()
        .unwrap()
        .set("SWIFT_VERSION", "5.0");
    assert_eq!(
        object.as_build_configuration().unwrap().get("SWIFT_VERSION"),
        Some(&SettingValue::scalar("5.0"))
    );
}

#[test]
fn file_reference_display_name_prefers_explicit_name() {
    let named = FileReference {
        explicit_file_type: None,
        include_in_index: None,
        last_known_file_type: None,
        name: Some("Shown.swift".to_string()),
        path: "Sources/Real.swift".to_string(),
        source_tree: SourceTree::Group,
    };
    assert_eq!(named.display_name(), "Shown.swift");

    let pathed = FileReference {
        name: None,
        ..named.clone()
    };
    assert_eq!(pathed.display_name(), "Real.swift");

    let bare = FileReference {
        name: None,
        path: "Standalone.swift".to_string(),
        ..named
    };
    assert_eq!(bare.display_name(), "Standalone.swift");
}

#[test]
fn group_display_name_falls_back_to_path() {
    let group = Group {
        children: Vec::new(),
        name: None,
        path: Some("Sources".to_string()),
        source_tree: SourceTree::Group,
    };
    assert_eq!(group.display_name(), Some("Sources"));

    let anonymous = Group { path: None, ..group };
    assert_eq!(anonymous.display_name(), None);
}

#[test]
fn run_script_phase_defaults() {
    let phase = BuildPhase::run_script("Lint", "swiftlint lint");
    assert_eq!(phase.kind, PhaseKind::RunScript);
    assert_eq!(phase.shell_path.as_deref(), Some("/bin/sh"));
    assert_eq!(phase.shell_script.as_deref(), Some("swiftlint lint"));
    assert_eq!(phase.build_action_mask, DEFAULT_BUILD_ACTION_MASK);
    assert_eq!(phase.label(), "Lint");
    assert_eq!(BuildPhase::new(PhaseKind::Frameworks).label(), "Frameworks");
}

#[test]
fn configuration_append_creates_list() {
    let mut config = BuildConfiguration::new("Debug");
    config.append("OTHER_SWIFT_FLAGS", &["-X".to_string()]);
    config.append("OTHER_SWIFT_FLAGS", &["-Y".to_string()]);
    assert_eq!(
        config.get("OTHER_SWIFT_FLAGS"),
        Some(&SettingValue::list(["-X", "-Y"]))
    );
}

#[test]
fn package_requirement_wire_shape() {
    let major = PackageRequirement::UpToNextMajor {
        minimum_version: "5.9.1".to_string(),
    };
    assert_eq!(major.kind(), "upToNextMajorVersion");
    assert_eq!(major.value_key(), "minimumVersion");
    assert_eq!(major.value(), "5.9.1");

    let branch = PackageRequirement::Branch {
        branch: "main".to_string(),
    };
    assert_eq!(branch.kind(), "branch");
    assert_eq!(branch.value_key(), "branch");
}

#[test]
fn repository_name_strips_git_suffix() {
    let reference = RemotePackageReference {
        repository_url: "https://github.com/Alamofire/Alamofire.git".to_string(),
        requirement: PackageRequirement::UpToNextMajor {
            minimum_version: "5.9.1".to_string(),
        },
    };
    assert_eq!(reference.repository_name(), "Alamofire");

    let bare = RemotePackageReference {
        repository_url: "https://github.com/apple/swift-collections".to_string(),
        ..reference
    };
    assert_eq!(bare.repository_name(), "swift-collections");
}
