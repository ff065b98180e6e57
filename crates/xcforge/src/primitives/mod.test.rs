use super::*;

#[test]
fn product_type_identifiers_round_trip() {
    let all = [
        ProductType::Application,
        ProductType::Framework,
        ProductType::StaticLibrary,
        ProductType::CommandLineTool,
        ProductType::UnitTestBundle,
        ProductType::UiTestBundle,
    ];
    for product in all {
        let identifier = product.identifier();
        assert!(identifier.starts_with("com.apple.product-type."));
        assert_eq!(ProductType::from_identifier(identifier).unwrap(), product);
        assert_eq!(identifier.parse::<ProductType>().unwrap(), product);
    }
}

#[test]
fn unknown_product_type_is_rejected() {
    let err = ProductType::from_identifier("com.apple.product-type.kext").unwrap_err();
    assert_eq!(
        err,
        VocabularyError::UnknownProductType {
            identifier: "com.apple.product-type.kext".to_string()
        }
    );
}

#[test]
fn source_tree_anchors_round_trip() {
    let all = [
        SourceTree::Group,
        SourceTree::Absolute,
        SourceTree::SourceRoot,
        SourceTree::SdkRoot,
        SourceTree::BuiltProductsDir,
        SourceTree::DeveloperDir,
    ];
    for tree in all {
        assert_eq!(SourceTree::from_anchor(tree.anchor()).unwrap(), tree);
    }
    assert_eq!(SourceTree::Group.anchor(), "<group>");
    assert_eq!(SourceTree::SdkRoot.anchor(), "SDKROOT");
}

#[test]
fn unknown_source_tree_is_rejected() {
    assert!(SourceTree::from_anchor("PROJECT_DIR").is_err());
}

#[test]
fn phase_kind_isa_round_trips() {
    let all = [
        PhaseKind::Sources,
        PhaseKind::Frameworks,
        PhaseKind::Resources,
        PhaseKind::CopyFiles,
        PhaseKind::RunScript,
    ];
    for kind in all {
        assert_eq!(PhaseKind::from_isa(kind.isa()).unwrap(), kind);
    }
    assert_eq!(PhaseKind::RunScript.isa(), "PBXShellScriptBuildPhase");
    assert_eq!(PhaseKind::RunScript.default_label(), "ShellScript");
}

#[test]
fn unknown_phase_isa_is_rejected() {
    let err = PhaseKind::from_isa("PBXHeadersBuildPhase").unwrap_err();
    assert!(matches!(err, VocabularyError::UnknownPhaseIsa { .. }));
}

#[test]
fn setting_value_append_concatenates_lists() {
    let mut value = SettingValue::list(["-X"]);
    value.append(["-Y", "-Z"]);
    assert_eq!(value, SettingValue::list(["-X", "-Y", "-Z"]));
}

#[test]
fn setting_value_append_promotes_scalar() {
    let mut value = SettingValue::scalar("-DDEBUG");
    value.append(["-Onone"]);
    assert_eq!(value, SettingValue::list(["-DDEBUG", "-Onone"]));
}

#[test]
fn setting_value_append_to_fresh_list() {
    let mut value = SettingValue::List(Vec::new());
    value.append(["-X"]);
    assert_eq!(value.as_list().unwrap(), &["-X".to_string()]);
}

#[test]
fn merge_settings_replaces_per_key() {
    let mut settings = BuildSettings::new();
    settings.insert("SWIFT_VERSION".to_string(), SettingValue::scalar("5.0"));
    settings.insert("SDKROOT".to_string(), SettingValue::scalar("iphoneos"));

    let mut updates = BuildSettings::new();
    updates.insert("SWIFT_VERSION".to_string(), SettingValue::scalar("6.0"));
    updates.insert(
        "OTHER_SWIFT_FLAGS".to_string(),
        SettingValue::list(["-warnings-as-errors"]),
    );

    merge_settings(&mut settings, &updates);
    assert_eq!(
        settings.get("SWIFT_VERSION"),
        Some(&SettingValue::scalar("6.0"))
    );
    assert_eq!(
        settings.get("SDKROOT"),
        Some(&SettingValue::scalar("iphoneos"))
    );
    assert_eq!(
        settings.get("OTHER_SWIFT_FLAGS"),
        Some(&SettingValue::list(["-warnings-as-errors"]))
    );
}

#[test]
fn settings_iterate_in_key_order() {
    let mut settings = BuildSettings::new();
    settings.insert("SWIFT_VERSION".to_string(), SettingValue::scalar("5.0"));
    settings.insert("CODE_SIGN_STYLE".to_string(), SettingValue::scalar("Automatic"));
    settings.insert("ONLY_ACTIVE_ARCH".to_string(), SettingValue::scalar("YES"));
    let keys: Vec<&str> = settings.keys().map(String::as_str).collect();
    assert_eq!(keys, ["CODE_SIGN_STYLE", "ONLY_ACTIVE_ARCH", "SWIFT_VERSION"]);
}

#[test]
fn file_types_cover_common_sources() {
    assert_eq!(file_type_for_path("Sources/App.swift"), Some("sourcecode.swift"));
    assert_eq!(file_type_for_path("Assets.xcassets"), Some("folder.assetcatalog"));
    assert_eq!(file_type_for_path("Info.plist"), Some("text.plist.xml"));
    assert_eq!(
        file_type_for_path("System/Library/Frameworks/UIKit.framework"),
        Some("wrapper.framework")
    );
    assert_eq!(file_type_for_path("Main.storyboard"), Some("file.storyboard"));
    assert_eq!(file_type_for_path("noextension"), None);
    assert_eq!(file_type_for_path("weird.zzz"), None);
}

#[test]
fn setting_value_untagged_serde_shapes() {
    let scalar: SettingValue = toml::from_str::<std::collections::BTreeMap<String, SettingValue>>(
        "SWIFT_VERSION = \"5.0\"",
    )
    .unwrap()
    .remove("SWIFT_VERSION")
    .unwrap();
    assert_eq!(scalar, SettingValue::scalar("5.0"));

    let list: SettingValue = toml::from_str::<std::collections::BTreeMap<String, SettingValue>>(
        "OTHER_SWIFT_FLAGS = [\"-X\", \"-Y\"]",
    )
    .unwrap()
    .remove("OTHER_SWIFT_FLAGS")
    .unwrap();
    assert_eq!(list, SettingValue::list(["-X", "-Y"]));
}
