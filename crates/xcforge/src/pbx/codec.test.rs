use super::*;

fn id(tag: &str) -> ObjectId {
    ObjectId::new(format!("{tag:0>24}"))
}

fn graph_from(objects: Vec<(ObjectId, Object)>, root: &ObjectId, name: &str) -> ProjectGraph {
    let mut store = ObjectStore::new();
    let mut allocator = IdAllocator::new(name);
    for (object_id, object) in objects {
        allocator.register(&object_id);
        store.add(object_id, object).unwrap();
    }
    ProjectGraph::from_parts(name, "1", "56", store, allocator, root.clone()).unwrap()
}

fn small_graph() -> ProjectGraph {
    let mut settings = BuildSettings::new();
    settings.insert("SDKROOT".to_string(), SettingValue::scalar("iphoneos"));
    settings.insert(
        "OTHER_LDFLAGS".to_string(),
        SettingValue::list(["-ObjC", "-lz"]),
    );
    graph_from(
        vec![
            (
                id("G1"),
                Object::Group(Group {
                    children: Vec::new(),
                    name: None,
                    path: None,
                    source_tree: SourceTree::Group,
                }),
            ),
            (
                id("C1"),
                Object::BuildConfiguration(BuildConfiguration {
                    build_settings: settings,
                    name: "Release".to_string(),
                }),
            ),
            (
                id("L1"),
                Object::ConfigurationList(ConfigurationList {
                    build_configurations: vec![id("C1")],
                    default_configuration_is_visible: false,
                    default_configuration_name: Some("Release".to_string()),
                }),
            ),
            (
                id("R1"),
                Object::Project(Project {
                    build_configuration_list: id("L1"),
                    compatibility_version: "Xcode 14.0".to_string(),
                    development_region: "en".to_string(),
                    has_scanned_for_encodings: false,
                    known_regions: vec!["en".to_string(), "Base".to_string()],
                    main_group: id("G1"),
                    package_references: Vec::new(),
                    product_ref_group: None,
                    project_dir_path: String::new(),
                    project_root: String::new(),
                    targets: Vec::new(),
                }),
            ),
        ],
        &id("R1"),
        "Demo",
    )
}

const SMALL_TEXT: &str = concat!(
    "// !$*UTF8*$!\n",
    "{\n",
    "\tarchiveVersion = 1;\n",
    "\tclasses = {\n",
    "\t};\n",
    "\tobjectVersion = 56;\n",
    "\tobjects = {\n",
    "\n",
    "/* Begin PBXGroup section */\n",
    "\t\t0000000000000000000000G1 = {\n",
    "\t\t\tisa = PBXGroup;\n",
    "\t\t\tchildren = (\n",
    "\t\t\t);\n",
    "\t\t\tsourceTree = \"<group>\";\n",
    "\t\t};\n",
    "/* End PBXGroup section */\n",
    "\n",
    "/* Begin PBXProject section */\n",
    "\t\t0000000000000000000000R1 /* Project object */ = {\n",
    "\t\t\tisa = PBXProject;\n",
    "\t\t\tbuildConfigurationList = 0000000000000000000000L1 /* Build configuration list for PBXProject \"Demo\" */;\n",
    "\t\t\tcompatibilityVersion = \"Xcode 14.0\";\n",
    "\t\t\tdevelopmentRegion = en;\n",
    "\t\t\thasScannedForEncodings = 0;\n",
    "\t\t\tknownRegions = (\n",
    "\t\t\t\ten,\n",
    "\t\t\t\tBase,\n",
    "\t\t\t);\n",
    "\t\t\tmainGroup = 0000000000000000000000G1;\n",
    "\t\t\tprojectDirPath = \"\";\n",
    "\t\t\tprojectRoot = \"\";\n",
    "\t\t\ttargets = (\n",
    "\t\t\t);\n",
    "\t\t};\n",
    "/* End PBXProject section */\n",
    "\n",
    "/* Begin XCBuildConfiguration section */\n",
    "\t\t0000000000000000000000C1 /* Release */ = {\n",
    "\t\t\tisa = XCBuildConfiguration;\n",
    "\t\t\tbuildSettings = {\n",
    "\t\t\t\tOTHER_LDFLAGS = (\n",
    "\t\t\t\t\t\"-ObjC\",\n",
    "\t\t\t\t\t\"-lz\",\n",
    "\t\t\t\t);\n",
    "\t\t\t\tSDKROOT = iphoneos;\n",
    "\t\t\t};\n",
    "\t\t\tname = Release;\n",
    "\t\t};\n",
    "/* End XCBuildConfiguration section */\n",
    "\n",
    "/* Begin XCConfigurationList section */\n",
    "\t\t0000000000000000000000L1 /* Build configuration list for PBXProject \"Demo\" */ = {\n",
    "\t\t\tisa = XCConfigurationList;\n",
    "\t\t\tbuildConfigurations = (\n",
    "\t\t\t\t0000000000000000000000C1 /* Release */,\n",
    "\t\t\t);\n",
    "\t\t\tdefaultConfigurationIsVisible = 0;\n",
    "\t\t\tdefaultConfigurationName = Release;\n",
    "\t\t};\n",
    "/* End XCConfigurationList section */\n",
    "\t};\n",
    "\trootObject = 0000000000000000000000R1 /* Project object */;\n",
    "}\n",
);

fn rich_graph() -> ProjectGraph {
    let mut debug = BuildConfiguration::new("Debug");
    debug.set("SWIFT_VERSION", "5.0");
    let mut release = BuildConfiguration::new("Release");
    release.set("SWIFT_VERSION", "5.0");
    let mut project_release = BuildConfiguration::new("Release");
    project_release.set("SDKROOT", "iphoneos");

    let sources = BuildPhase {
        files: vec![id("B1")],
        ..BuildPhase::new(PhaseKind::Sources)
    };
    let frameworks = BuildPhase {
        files: vec![id("B2")],
        ..BuildPhase::new(PhaseKind::Frameworks)
    };
    let mut lint = BuildPhase::run_script("Lint", "echo \"lint\"\n");
    lint.input_paths.push("$(SRCROOT)/scripts".to_string());

    graph_from(
        vec![
            (
                id("R1"),
                Object::Project(Project {
                    build_configuration_list: id("L2"),
                    compatibility_version: "Xcode 14.0".to_string(),
                    development_region: "en".to_string(),
                    has_scanned_for_encodings: false,
                    known_regions: vec!["en".to_string(), "Base".to_string()],
                    main_group: id("G0"),
                    package_references: vec![id("K1")],
                    product_ref_group: Some(id("G2")),
                    project_dir_path: String::new(),
                    project_root: String::new(),
                    targets: vec![id("T1"), id("T2")],
                }),
            ),
            (
                id("G0"),
                Object::Group(Group {
                    children: vec![id("G1"), id("G2")],
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
                    path: Some("App".to_string()),
                    source_tree: SourceTree::Group,
                }),
            ),
            (
                id("G2"),
                Object::Group(Group {
                    children: vec![id("F2")],
                    name: Some("Products".to_string()),
                    path: None,
                    source_tree: SourceTree::Group,
                }),
            ),
            (
                id("F1"),
                Object::FileReference(FileReference {
                    explicit_file_type: None,
                    include_in_index: None,
                    last_known_file_type: Some("sourcecode.swift".to_string()),
                    name: Some("main.swift".to_string()),
                    path: "App/main.swift".to_string(),
                    source_tree: SourceTree::Group,
                }),
            ),
            (
                id("F2"),
                Object::FileReference(FileReference {
                    explicit_file_type: Some("wrapper.application".to_string()),
                    include_in_index: Some(false),
                    last_known_file_type: None,
                    name: None,
                    path: "Demo.app".to_string(),
                    source_tree: SourceTree::BuiltProductsDir,
                }),
            ),
            (id("B1"), Object::BuildFile(BuildFile::for_file(id("F1")))),
            (id("B2"), Object::BuildFile(BuildFile::for_product(id("D2")))),
            (id("P1"), Object::BuildPhase(sources)),
            (id("P2"), Object::BuildPhase(frameworks)),
            (id("P3"), Object::BuildPhase(lint)),
            (
                id("T1"),
                Object::NativeTarget(NativeTarget {
                    build_configuration_list: Some(id("L1")),
                    build_phases: vec![id("P1"), id("P2"), id("P3")],
                    build_rules: Vec::new(),
                    dependencies: Vec::new(),
                    name: "Demo".to_string(),
                    package_product_dependencies: vec![id("D2")],
                    product_name: Some("Demo".to_string()),
                    product_reference: Some(id("F2")),
                    product_type: ProductType::Application,
                }),
            ),
            (
                id("T2"),
                Object::NativeTarget(NativeTarget {
                    build_configuration_list: None,
                    build_phases: Vec::new(),
                    build_rules: Vec::new(),
                    dependencies: vec![id("D1")],
                    name: "DemoTests".to_string(),
                    package_product_dependencies: Vec::new(),
                    product_name: None,
                    product_reference: None,
                    product_type: ProductType::UnitTestBundle,
                }),
            ),
            (
                id("D1"),
                Object::TargetDependency(TargetDependency {
                    target: Some(id("T1")),
                    target_proxy: Some(id("X1")),
                }),
            ),
            (
                id("X1"),
                Object::ContainerItemProxy(ContainerItemProxy {
                    container_portal: id("R1"),
                    proxy_type: 1,
                    remote_global_id: id("T1"),
                    remote_info: Some("Demo".to_string()),
                }),
            ),
            (
                id("K1"),
                Object::RemotePackageReference(RemotePackageReference {
                    repository_url: "https://github.com/realm/realm-swift.git".to_string(),
                    requirement: PackageRequirement::UpToNextMajor {
                        minimum_version: "10.0.0".to_string(),
                    },
                }),
            ),
            (
                id("D2"),
                Object::PackageProductDependency(PackageProductDependency {
                    package: Some(id("K1")),
                    product_name: "RealmSwift".to_string(),
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
                    build_configurations: vec![id("C3")],
                    default_configuration_is_visible: false,
                    default_configuration_name: Some("Release".to_string()),
                }),
            ),
            (id("C1"), Object::BuildConfiguration(debug)),
            (id("C2"), Object::BuildConfiguration(release)),
            (id("C3"), Object::BuildConfiguration(project_release)),
        ],
        &id("R1"),
        "Demo",
    )
}

#[test]
fn encodes_small_graph_exactly() {
    assert_eq!(encode(&small_graph()), SMALL_TEXT);
}

#[test]
fn small_text_round_trips_byte_for_byte() {
    let decoded = decode(SMALL_TEXT, "Demo").unwrap();
    assert!(decoded.same_structure(&small_graph()));
    assert_eq!(encode(&decoded), SMALL_TEXT);
}

#[test]
fn rich_graph_round_trips() {
    let graph = rich_graph();
    let text = encode(&graph);
    let decoded = decode(&text, "Demo").unwrap();
    assert!(decoded.same_structure(&graph));
    assert_eq!(encode(&decoded), text);
}

#[test]
fn groups_phases_into_sections_by_kind() {
    let text = encode(&rich_graph());
    assert!(text.contains("\n/* Begin PBXSourcesBuildPhase section */\n"));
    assert!(text.contains("/* End PBXSourcesBuildPhase section */\n"));
    assert!(text.contains("\n/* Begin PBXFrameworksBuildPhase section */\n"));
    assert!(text.contains("\n/* Begin PBXShellScriptBuildPhase section */\n"));
}

#[test]
fn annotates_build_files_with_phase_labels() {
    let text = encode(&rich_graph());
    assert!(text.contains("/* main.swift in Sources */"));
    assert!(text.contains("/* RealmSwift in Frameworks */"));
}

#[test]
fn annotates_configuration_lists_with_their_owners() {
    let text = encode(&rich_graph());
    assert!(text.contains("/* Build configuration list for PBXNativeTarget \"Demo\" */"));
    assert!(text.contains("/* Build configuration list for PBXProject \"Demo\" */"));
}

#[test]
fn emits_build_files_and_file_references_on_one_line() {
    let text = encode(&rich_graph());
    let build_file = format!(
        "\t\t{} /* main.swift in Sources */ = {{isa = PBXBuildFile; fileRef = {} /* main.swift */; }};\n",
        id("B1"),
        id("F1"),
    );
    assert!(text.contains(&build_file));
    let file_reference = format!(
        "\t\t{} /* main.swift */ = {{isa = PBXFileReference; lastKnownFileType = sourcecode.swift; name = main.swift; path = App/main.swift; sourceTree = \"<group>\"; }};\n",
        id("F1"),
    );
    assert!(text.contains(&file_reference));
}

#[test]
fn leaves_remote_global_id_bare() {
    let text = encode(&rich_graph());
    let line = format!("\t\t\tremoteGlobalIDString = {};\n", id("T1"));
    assert!(text.contains(&line));
}

#[test]
fn orders_requirement_keys_alphabetically() {
    let text = encode(&rich_graph());
    let requirement = concat!(
        "\t\t\trequirement = {\n",
        "\t\t\t\tkind = upToNextMajorVersion;\n",
        "\t\t\t\tminimumVersion = 10.0.0;\n",
        "\t\t\t};\n",
    );
    assert!(text.contains(requirement));

    let mut graph = rich_graph();
    let package = graph
        .store_mut()
        .get_mut(&id("K1"))
        .and_then(Object::as_remote_package_reference_mut)
        .unwrap();
    package.requirement = PackageRequirement::Branch {
        branch: "main".to_string(),
    };
    let branch_text = encode(&graph);
    let branch_requirement = concat!(
        "\t\t\trequirement = {\n",
        "\t\t\t\tbranch = main;\n",
        "\t\t\t\tkind = branch;\n",
        "\t\t\t};\n",
    );
    assert!(branch_text.contains(branch_requirement));
}

#[test]
fn omits_absent_optional_target_fields() {
    let text = encode(&rich_graph());
    let start = text
        .find(&format!("\t\t{} /* DemoTests */ = {{\n", id("T2")))
        .unwrap();
    let end = start + text[start..].find("\n\t\t};").unwrap();
    let record = &text[start..end];
    assert!(!record.contains("buildConfigurationList"));
    assert!(!record.contains("productName"));
    assert!(!record.contains("productReference"));
    assert!(!record.contains("packageProductDependencies"));
    assert!(record.contains("\t\t\tbuildRules = (\n"));
    assert!(record.contains("\t\t\tdependencies = (\n"));
}

#[test]
fn escapes_shell_script_content() {
    let text = encode(&rich_graph());
    assert!(text.contains("\t\t\tshellScript = \"echo \\\"lint\\\"\\n\";\n"));
    assert!(text.contains("\t\t\tshellPath = /bin/sh;\n"));
    assert!(text.contains("\t\t\t\t\"$(SRCROOT)/scripts\",\n"));
}

#[test]
fn decodes_defaults_and_ignores_unmodeled_fields() {
    let text = r#"// !$*UTF8*$!
{
    archiveVersion = 1;
    classes = {};
    objectVersion = 56;
    objects = {
        0000000000000000000000G1 = {isa = PBXGroup; children = (); sourceTree = "<group>"; };
        0000000000000000000000C1 = {isa = XCBuildConfiguration; buildSettings = {SDKROOT = iphoneos; OTHER_LDFLAGS = ("-ObjC", "-lz"); }; name = Release; };
        0000000000000000000000L1 = {isa = XCConfigurationList; buildConfigurations = (0000000000000000000000C1); defaultConfigurationIsVisible = 0; };
        0000000000000000000000R1 = {isa = PBXProject; attributes = {LastUpgradeCheck = 1500; }; buildConfigurationList = 0000000000000000000000L1; knownRegions = (en, Base); mainGroup = 0000000000000000000000G1; targets = (); };
    };
    rootObject = 0000000000000000000000R1;
}
"#;
    let graph = decode(text, "Demo").unwrap();
    assert_eq!(graph.archive_version(), "1");
    assert_eq!(graph.object_version(), "56");
    assert_eq!(graph.root_id(), &id("R1"));

    let project = graph.store().get(&id("R1")).unwrap().as_project().unwrap();
    assert_eq!(project.compatibility_version, "Xcode 14.0");
    assert_eq!(project.development_region, "en");
    assert!(!project.has_scanned_for_encodings);
    assert_eq!(project.known_regions, vec!["en", "Base"]);
    assert!(project.package_references.is_empty());
    assert!(project.product_ref_group.is_none());

    let config = graph
        .store()
        .get(&id("C1"))
        .unwrap()
        .as_build_configuration()
        .unwrap();
    assert_eq!(
        config.get("SDKROOT"),
        Some(&SettingValue::scalar("iphoneos"))
    );
    assert_eq!(
        config.get("OTHER_LDFLAGS"),
        Some(&SettingValue::list(["-ObjC", "-lz"]))
    );

    let list = graph
        .store()
        .get(&id("L1"))
        .unwrap()
        .as_configuration_list()
        .unwrap();
    assert_eq!(list.default_configuration_name, None);
}

#[test]
fn decode_rejects_missing_isa() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = { AAA = {name = x; }; };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert_eq!(
        err,
        CodecError::MissingIsa {
            id: ObjectId::new("AAA")
        }
    );
}

#[test]
fn decode_rejects_unknown_isa() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = { AAA = {isa = PBXLegacyTarget; }; };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert_eq!(
        err,
        CodecError::UnsupportedIsa {
            id: ObjectId::new("AAA"),
            isa: "PBXLegacyTarget".to_string(),
        }
    );
}

#[test]
fn decode_reports_missing_required_field() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = { AAA = {isa = PBXFileReference; sourceTree = "<group>"; }; };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert_eq!(
        err,
        CodecError::MissingField {
            id: ObjectId::new("AAA"),
            isa: "PBXFileReference".to_string(),
            field: "path",
        }
    );
}

#[test]
fn decode_reports_malformed_list_field() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = {
        AAA = {isa = PBXProject; buildConfigurationList = LLL; mainGroup = GGG; targets = notalist; };
    };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert_eq!(
        err,
        CodecError::MalformedField {
            id: ObjectId::new("AAA"),
            field: "targets",
        }
    );
}

#[test]
fn decode_rejects_unknown_product_type() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = {
        AAA = {isa = PBXNativeTarget; name = Demo; productType = "com.apple.product-type.kernel-extension"; };
    };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert!(matches!(
        err,
        CodecError::Vocabulary {
            source: VocabularyError::UnknownProductType { .. },
            ..
        }
    ));
}

#[test]
fn decode_rejects_unknown_requirement_kind() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = {
        AAA = {isa = XCRemoteSwiftPackageReference; repositoryURL = "https://example.com/pkg.git"; requirement = {kind = fancy; }; };
    };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert_eq!(
        err,
        CodecError::UnknownRequirementKind {
            id: ObjectId::new("AAA"),
            kind: "fancy".to_string(),
        }
    );
}

#[test]
fn decode_requires_top_level_keys() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = {};
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert_eq!(err, CodecError::MissingTopLevelKey { key: "rootObject" });
}

#[test]
fn decode_rejects_non_dictionary_root() {
    let err = decode("(a, b)", "Demo").unwrap_err();
    assert_eq!(
        err,
        CodecError::RootNotDict {
            found: "array".to_string(),
        }
    );
}

#[test]
fn decode_requires_root_to_be_a_project() {
    let text = r#"{
    archiveVersion = 1;
    objectVersion = 56;
    objects = { AAA = {isa = PBXGroup; children = (); sourceTree = "<group>"; }; };
    rootObject = AAA;
}"#;
    let err = decode(text, "Demo").unwrap_err();
    assert!(matches!(err, CodecError::Graph { .. }));
}

#[test]
fn decode_registers_every_identifier_with_the_allocator() {
    let mut graph = decode(SMALL_TEXT, "Demo").unwrap();
    let fresh = graph.allocate_id();
    assert!(graph.store().get(&fresh).is_none());
    assert!(fresh.is_canonical());
}
