//! Mapping between manifest text and the typed object graph
//!
//! Decoding is lenient about fields this engine does not model and strict
//! about the ones it does: a record with a recognized `isa` must carry its
//! required fields with the right shapes. Encoding is fully deterministic,
//! the byte layout follows what Xcode itself writes so a decode and
//! re-encode of engine output reproduces it exactly: header line, grouped
//! sections in ASCII `isa` order, entries in ASCII identifier order, fields
//! with `isa` first and the rest in ASCII key order, and annotation
//! comments regenerated from the graph.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::trace;

use crate::pbx::graph::{GraphError, ProjectGraph};
use crate::pbx::id::{IdAllocator, ObjectId};
use crate::pbx::objects::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, ContainerItemProxy,
    FileReference, Group, NativeTarget, Object, PackageProductDependency, PackageRequirement,
    Project, RemotePackageReference, TargetDependency, DEFAULT_BUILD_ACTION_MASK,
};
use crate::pbx::plist::{self, PlistError, PlistValue, quote};
use crate::pbx::store::{ObjectStore, StoreError};
use crate::primitives::{
    BuildSettings, PhaseKind, ProductType, SettingValue, SourceTree, VocabularyError,
};

/// Header line opening every manifest file
pub const MANIFEST_HEADER: &str = "// !$*UTF8*$!";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("manifest text does not parse: {source}")]
    Plist {
        #[from]
        source: PlistError,
    },

    #[error("manifest root must be a dictionary, found {found}")]
    RootNotDict { found: String },

    #[error("missing top-level key {key}")]
    MissingTopLevelKey { key: &'static str },

    #[error("top-level key {key} has unexpected shape")]
    MalformedTopLevelKey { key: &'static str },

    #[error("object {id} has no isa field")]
    MissingIsa { id: ObjectId },

    #[error("unsupported object kind {isa} on {id}")]
    UnsupportedIsa { id: ObjectId, isa: String },

    #[error("object {id} ({isa}) is missing required field {field}")]
    MissingField {
        id: ObjectId,
        isa: String,
        field: &'static str,
    },

    #[error("object {id} field {field} has unexpected shape")]
    MalformedField { id: ObjectId, field: &'static str },

    #[error("object {id} requirement kind {kind} is not recognized")]
    UnknownRequirementKind { id: ObjectId, kind: String },

    #[error("object {id}: {source}")]
    Vocabulary { id: ObjectId, source: VocabularyError },

    #[error("object graph rejected decoded objects: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("decoded graph is not rooted in a project: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },
}

/// Decode manifest text into a graph named `project_name`
///
/// The name seeds the identifier allocator and feeds configuration list
/// annotations, callers derive it from the manifest bundle's file name.
pub fn decode(text: &str, project_name: &str) -> Result<ProjectGraph, CodecError> {
    let root_value = plist::parse(text)?;
    if root_value.as_dict().is_none() {
        return Err(CodecError::RootNotDict {
            found: root_value.to_string(),
        });
    }

    let archive_version = top_level_string(&root_value, "archiveVersion")?;
    let object_version = top_level_string(&root_value, "objectVersion")?;
    let root_object = top_level_string(&root_value, "rootObject")?;
    let objects = root_value
        .get("objects")
        .ok_or(CodecError::MissingTopLevelKey { key: "objects" })?
        .as_dict()
        .ok_or(CodecError::MalformedTopLevelKey { key: "objects" })?;

    let mut store = ObjectStore::new();
    let mut allocator = IdAllocator::new(project_name);
    for (key, value) in objects {
        let id = ObjectId::new(key.as_str());
        allocator.register(&id);
        let object = decode_object(&id, value)?;
        store.add(id, object)?;
    }
    trace!(objects = store.len(), name = project_name, "decoded manifest");

    Ok(ProjectGraph::from_parts(
        project_name,
        archive_version,
        object_version,
        store,
        allocator,
        ObjectId::new(root_object),
    )?)
}

fn top_level_string(root: &PlistValue, key: &'static str) -> Result<String, CodecError> {
    root.get(key)
        .ok_or(CodecError::MissingTopLevelKey { key })?
        .as_str()
        .map(str::to_string)
        .ok_or(CodecError::MalformedTopLevelKey { key })
}

struct Record<'a> {
    id: &'a ObjectId,
    isa: &'a str,
    dict: &'a PlistValue,
}

impl Record<'_> {
    fn missing(&self, field: &'static str) -> CodecError {
        CodecError::MissingField {
            id: self.id.clone(),
            isa: self.isa.to_string(),
            field,
        }
    }

    fn malformed(&self, field: &'static str) -> CodecError {
        CodecError::MalformedField {
            id: self.id.clone(),
            field,
        }
    }

    fn string(&self, field: &'static str) -> Result<String, CodecError> {
        self.dict
            .get(field)
            .ok_or_else(|| self.missing(field))?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.malformed(field))
    }

    fn string_or(&self, field: &'static str, default: &str) -> Result<String, CodecError> {
        match self.dict.get(field) {
            None => Ok(default.to_string()),
            Some(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| self.malformed(field)),
        }
    }

    fn opt_string(&self, field: &'static str) -> Result<Option<String>, CodecError> {
        match self.dict.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.malformed(field)),
        }
    }

    fn id(&self, field: &'static str) -> Result<ObjectId, CodecError> {
        Ok(ObjectId::new(self.string(field)?))
    }

    fn opt_id(&self, field: &'static str) -> Result<Option<ObjectId>, CodecError> {
        Ok(self.opt_string(field)?.map(ObjectId::new))
    }

    fn id_list(&self, field: &'static str) -> Result<Vec<ObjectId>, CodecError> {
        match self.dict.get(field) {
            None => Ok(Vec::new()),
            Some(value) => value
                .as_array()
                .ok_or_else(|| self.malformed(field))?
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(ObjectId::new)
                        .ok_or_else(|| self.malformed(field))
                })
                .collect(),
        }
    }

    fn string_list(&self, field: &'static str) -> Result<Vec<String>, CodecError> {
        match self.dict.get(field) {
            None => Ok(Vec::new()),
            Some(value) => value
                .as_array()
                .ok_or_else(|| self.malformed(field))?
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.malformed(field))
                })
                .collect(),
        }
    }

    fn int_or(&self, field: &'static str, default: i64) -> Result<i64, CodecError> {
        match self.dict.get(field) {
            None => Ok(default),
            Some(value) => value
                .as_str()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| self.malformed(field)),
        }
    }

    fn opt_int(&self, field: &'static str) -> Result<Option<i64>, CodecError> {
        match self.dict.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .and_then(|s| s.parse().ok())
                .map(Some)
                .ok_or_else(|| self.malformed(field)),
        }
    }

    fn bool_or(&self, field: &'static str, default: bool) -> Result<bool, CodecError> {
        match self.int_or(field, if default { 1 } else { 0 })? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(self.malformed(field)),
        }
    }

    fn opt_bool(&self, field: &'static str) -> Result<Option<bool>, CodecError> {
        match self.opt_int(field)? {
            None => Ok(None),
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            Some(_) => Err(self.malformed(field)),
        }
    }

    fn vocabulary<T>(&self, result: Result<T, VocabularyError>) -> Result<T, CodecError> {
        result.map_err(|source| CodecError::Vocabulary {
            id: self.id.clone(),
            source,
        })
    }
}

fn decode_object(id: &ObjectId, value: &PlistValue) -> Result<Object, CodecError> {
    let isa = value
        .get("isa")
        .and_then(PlistValue::as_str)
        .ok_or_else(|| CodecError::MissingIsa { id: id.clone() })?;
    let record = Record {
        id,
        isa,
        dict: value,
    };

    match isa {
        "PBXProject" => decode_project(&record),
        "PBXNativeTarget" => decode_native_target(&record),
        "PBXGroup" => decode_group(&record),
        "PBXFileReference" => decode_file_reference(&record),
        "PBXBuildFile" => decode_build_file(&record),
        "PBXSourcesBuildPhase"
        | "PBXFrameworksBuildPhase"
        | "PBXResourcesBuildPhase"
        | "PBXCopyFilesBuildPhase"
        | "PBXShellScriptBuildPhase" => {
            let kind = record.vocabulary(PhaseKind::from_isa(isa))?;
            decode_build_phase(&record, kind)
        }
        "XCBuildConfiguration" => decode_build_configuration(&record),
        "XCConfigurationList" => decode_configuration_list(&record),
        "PBXTargetDependency" => decode_target_dependency(&record),
        "PBXContainerItemProxy" => decode_container_item_proxy(&record),
        "XCRemoteSwiftPackageReference" => decode_remote_package_reference(&record),
        "XCSwiftPackageProductDependency" => decode_package_product_dependency(&record),
        other => Err(CodecError::UnsupportedIsa {
            id: id.clone(),
            isa: other.to_string(),
        }),
    }
}

fn decode_project(record: &Record<'_>) -> Result<Object, CodecError> {
    Ok(Object::Project(Project {
        build_configuration_list: record.id("buildConfigurationList")?,
        compatibility_version: record.string_or("compatibilityVersion", "Xcode 14.0")?,
        development_region: record.string_or("developmentRegion", "en")?,
        has_scanned_for_encodings: record.bool_or("hasScannedForEncodings", false)?,
        known_regions: record.string_list("knownRegions")?,
        main_group: record.id("mainGroup")?,
        package_references: record.id_list("packageReferences")?,
        product_ref_group: record.opt_id("productRefGroup")?,
        project_dir_path: record.string_or("projectDirPath", "")?,
        project_root: record.string_or("projectRoot", "")?,
        targets: record.id_list("targets")?,
    }))
}

fn decode_native_target(record: &Record<'_>) -> Result<Object, CodecError> {
    let product_type = record.vocabulary(ProductType::from_identifier(
        &record.string("productType")?,
    ))?;
    Ok(Object::NativeTarget(NativeTarget {
        build_configuration_list: record.opt_id("buildConfigurationList")?,
        build_phases: record.id_list("buildPhases")?,
        build_rules: record.id_list("buildRules")?,
        dependencies: record.id_list("dependencies")?,
        name: record.string("name")?,
        package_product_dependencies: record.id_list("packageProductDependencies")?,
        product_name: record.opt_string("productName")?,
        product_reference: record.opt_id("productReference")?,
        product_type,
    }))
}

fn decode_group(record: &Record<'_>) -> Result<Object, CodecError> {
    let source_tree = record.vocabulary(SourceTree::from_anchor(&record.string("sourceTree")?))?;
    Ok(Object::Group(Group {
        children: record.id_list("children")?,
        name: record.opt_string("name")?,
        path: record.opt_string("path")?,
        source_tree,
    }))
}

fn decode_file_reference(record: &Record<'_>) -> Result<Object, CodecError> {
    let source_tree = record.vocabulary(SourceTree::from_anchor(&record.string("sourceTree")?))?;
    Ok(Object::FileReference(FileReference {
        explicit_file_type: record.opt_string("explicitFileType")?,
        include_in_index: record.opt_bool("includeInIndex")?,
        last_known_file_type: record.opt_string("lastKnownFileType")?,
        name: record.opt_string("name")?,
        path: record.string("path")?,
        source_tree,
    }))
}

fn decode_build_file(record: &Record<'_>) -> Result<Object, CodecError> {
    Ok(Object::BuildFile(BuildFile {
        file_ref: record.opt_id("fileRef")?,
        product_ref: record.opt_id("productRef")?,
    }))
}

fn decode_build_phase(record: &Record<'_>, kind: PhaseKind) -> Result<Object, CodecError> {
    Ok(Object::BuildPhase(BuildPhase {
        kind,
        build_action_mask: record.int_or("buildActionMask", DEFAULT_BUILD_ACTION_MASK)?,
        files: record.id_list("files")?,
        name: record.opt_string("name")?,
        run_only_for_deployment_postprocessing: record
            .bool_or("runOnlyForDeploymentPostprocessing", false)?,
        dst_path: record.opt_string("dstPath")?,
        dst_subfolder_spec: record.opt_int("dstSubfolderSpec")?,
        shell_path: record.opt_string("shellPath")?,
        shell_script: record.opt_string("shellScript")?,
        input_paths: record.string_list("inputPaths")?,
        output_paths: record.string_list("outputPaths")?,
    }))
}

fn decode_build_configuration(record: &Record<'_>) -> Result<Object, CodecError> {
    let mut build_settings = BuildSettings::new();
    if let Some(value) = record.dict.get("buildSettings") {
        let entries = value
            .as_dict()
            .ok_or_else(|| record.malformed("buildSettings"))?;
        for (key, setting) in entries {
            let decoded = match setting {
                PlistValue::String(scalar) => SettingValue::Scalar(scalar.clone()),
                PlistValue::Array(items) => SettingValue::List(
                    items
                        .iter()
                        .map(|item| {
                            item.as_str()
                                .map(str::to_string)
                                .ok_or_else(|| record.malformed("buildSettings"))
                        })
                        .collect::<Result<_, _>>()?,
                ),
                PlistValue::Dict(_) => return Err(record.malformed("buildSettings")),
            };
            build_settings.insert(key.clone(), decoded);
        }
    }
    Ok(Object::BuildConfiguration(BuildConfiguration {
        build_settings,
        name: record.string("name")?,
    }))
}

fn decode_configuration_list(record: &Record<'_>) -> Result<Object, CodecError> {
    Ok(Object::ConfigurationList(ConfigurationList {
        build_configurations: record.id_list("buildConfigurations")?,
        default_configuration_is_visible: record.bool_or("defaultConfigurationIsVisible", false)?,
        default_configuration_name: record.opt_string("defaultConfigurationName")?,
    }))
}

fn decode_target_dependency(record: &Record<'_>) -> Result<Object, CodecError> {
    Ok(Object::TargetDependency(TargetDependency {
        target: record.opt_id("target")?,
        target_proxy: record.opt_id("targetProxy")?,
    }))
}

fn decode_container_item_proxy(record: &Record<'_>) -> Result<Object, CodecError> {
    Ok(Object::ContainerItemProxy(ContainerItemProxy {
        container_portal: record.id("containerPortal")?,
        proxy_type: record.int_or("proxyType", 1)?,
        remote_global_id: record.id("remoteGlobalIDString")?,
        remote_info: record.opt_string("remoteInfo")?,
    }))
}

fn decode_remote_package_reference(record: &Record<'_>) -> Result<Object, CodecError> {
    let requirement_value = record
        .dict
        .get("requirement")
        .ok_or_else(|| record.missing("requirement"))?;
    let kind = requirement_value
        .get("kind")
        .and_then(PlistValue::as_str)
        .ok_or_else(|| record.malformed("requirement"))?;
    let value_for = |key: &'static str| -> Result<String, CodecError> {
        requirement_value
            .get(key)
            .and_then(PlistValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| record.malformed("requirement"))
    };
    let requirement = match kind {
        "upToNextMajorVersion" => PackageRequirement::UpToNextMajor {
            minimum_version: value_for("minimumVersion")?,
        },
        "upToNextMinorVersion" => PackageRequirement::UpToNextMinor {
            minimum_version: value_for("minimumVersion")?,
        },
        "exactVersion" => PackageRequirement::Exact {
            version: value_for("version")?,
        },
        "branch" => PackageRequirement::Branch {
            branch: value_for("branch")?,
        },
        "revision" => PackageRequirement::Revision {
            revision: value_for("revision")?,
        },
        other => {
            return Err(CodecError::UnknownRequirementKind {
                id: record.id.clone(),
                kind: other.to_string(),
            });
        }
    };
    Ok(Object::RemotePackageReference(RemotePackageReference {
        repository_url: record.string("repositoryURL")?,
        requirement,
    }))
}

fn decode_package_product_dependency(record: &Record<'_>) -> Result<Object, CodecError> {
    Ok(Object::PackageProductDependency(PackageProductDependency {
        package: record.opt_id("package")?,
        product_name: record.string("productName")?,
    }))
}

/// Serialize the graph into manifest text
pub fn encode(graph: &ProjectGraph) -> String {
    let annotator = Annotator::new(graph);

    let mut sections: BTreeMap<&'static str, Vec<&ObjectId>> = BTreeMap::new();
    for (id, object) in graph.store().iter() {
        sections.entry(object.isa()).or_default().push(id);
    }
    for ids in sections.values_mut() {
        ids.sort();
    }

    let mut out = String::new();
    out.push_str(MANIFEST_HEADER);
    out.push('\n');
    out.push_str("{\n");
    out.push_str(&format!("\tarchiveVersion = {};\n", quote(graph.archive_version())));
    out.push_str("\tclasses = {\n\t};\n");
    out.push_str(&format!("\tobjectVersion = {};\n", quote(graph.object_version())));
    out.push_str("\tobjects = {\n");

    for (isa, ids) in &sections {
        out.push_str(&format!("\n/* Begin {isa} section */\n"));
        for id in ids {
            if let Some(object) = graph.store().get(id) {
                encode_record(&mut out, &annotator, id, object);
            }
        }
        out.push_str(&format!("/* End {isa} section */\n"));
    }

    out.push_str("\t};\n");
    out.push_str(&format!(
        "\trootObject = {};\n",
        annotator.reference(graph.root_id())
    ));
    out.push_str("}\n");
    out
}

/// Regenerates the annotation comments Xcode decorates identifiers with
struct Annotator<'a> {
    graph: &'a ProjectGraph,
    phase_of_build_file: HashMap<&'a ObjectId, &'a ObjectId>,
    list_owner: HashMap<&'a ObjectId, (&'static str, &'a str)>,
}

impl<'a> Annotator<'a> {
    fn new(graph: &'a ProjectGraph) -> Self {
        let mut phase_of_build_file = HashMap::new();
        for (phase_id, phase) in graph.store().build_phases() {
            for build_file in &phase.files {
                phase_of_build_file.insert(build_file, phase_id);
            }
        }

        let mut list_owner: HashMap<&ObjectId, (&'static str, &str)> = HashMap::new();
        for (_, object) in graph.store().iter() {
            match object {
                Object::Project(project) => {
                    list_owner.insert(
                        &project.build_configuration_list,
                        ("PBXProject", graph.name()),
                    );
                }
                Object::NativeTarget(target) => {
                    if let Some(list) = &target.build_configuration_list {
                        list_owner.insert(list, ("PBXNativeTarget", target.name.as_str()));
                    }
                }
                _ => {}
            }
        }

        Annotator {
            graph,
            phase_of_build_file,
            list_owner,
        }
    }

    /// Identifier plus its annotation, or the bare identifier
    fn reference(&self, id: &ObjectId) -> String {
        match self.comment(id) {
            Some(comment) => format!("{id} /* {comment} */"),
            None => id.to_string(),
        }
    }

    fn comment(&self, id: &ObjectId) -> Option<String> {
        match self.graph.store().get(id)? {
            Object::Project(_) => Some("Project object".to_string()),
            Object::NativeTarget(target) => Some(target.name.clone()),
            Object::Group(group) => group.display_name().map(str::to_string),
            Object::FileReference(reference) => Some(reference.display_name().to_string()),
            Object::BuildFile(build_file) => {
                let subject = self.build_file_subject(build_file)?;
                match self
                    .phase_of_build_file
                    .get(id)
                    .and_then(|phase_id| self.graph.store().get(phase_id))
                    .and_then(Object::as_build_phase)
                {
                    Some(phase) => Some(format!("{subject} in {}", phase.label())),
                    None => Some(subject),
                }
            }
            Object::BuildPhase(phase) => Some(phase.label().to_string()),
            Object::BuildConfiguration(configuration) => Some(configuration.name.clone()),
            Object::ConfigurationList(_) => match self.list_owner.get(id) {
                Some((kind, owner)) => {
                    Some(format!("Build configuration list for {kind} \"{owner}\""))
                }
                None => Some("Build configuration list".to_string()),
            },
            Object::TargetDependency(_) => Some("PBXTargetDependency".to_string()),
            Object::ContainerItemProxy(_) => Some("PBXContainerItemProxy".to_string()),
            Object::RemotePackageReference(reference) => Some(format!(
                "XCRemoteSwiftPackageReference \"{}\"",
                reference.repository_name()
            )),
            Object::PackageProductDependency(dependency) => Some(dependency.product_name.clone()),
        }
    }

    fn build_file_subject(&self, build_file: &BuildFile) -> Option<String> {
        if let Some(file_ref) = &build_file.file_ref {
            let reference = self
                .graph
                .store()
                .get(file_ref)
                .and_then(Object::as_file_reference)?;
            return Some(reference.display_name().to_string());
        }
        let product_ref = build_file.product_ref.as_ref()?;
        let dependency = self
            .graph
            .store()
            .get(product_ref)
            .and_then(Object::as_package_product_dependency)?;
        Some(dependency.product_name.clone())
    }
}

fn encode_record(out: &mut String, annotator: &Annotator<'_>, id: &ObjectId, object: &Object) {
    match object {
        Object::BuildFile(build_file) => encode_build_file(out, annotator, id, build_file),
        Object::FileReference(reference) => encode_file_reference(out, annotator, id, reference),
        Object::Project(project) => encode_project(out, annotator, id, project),
        Object::NativeTarget(target) => encode_native_target(out, annotator, id, target),
        Object::Group(group) => encode_group(out, annotator, id, group),
        Object::BuildPhase(phase) => encode_build_phase(out, annotator, id, phase),
        Object::BuildConfiguration(configuration) => {
            encode_build_configuration(out, annotator, id, configuration)
        }
        Object::ConfigurationList(list) => encode_configuration_list(out, annotator, id, list),
        Object::TargetDependency(dependency) => {
            encode_target_dependency(out, annotator, id, dependency)
        }
        Object::ContainerItemProxy(proxy) => encode_container_item_proxy(out, annotator, id, proxy),
        Object::RemotePackageReference(reference) => {
            encode_remote_package_reference(out, annotator, id, reference)
        }
        Object::PackageProductDependency(dependency) => {
            encode_package_product_dependency(out, annotator, id, dependency)
        }
    }
}

fn open_record(out: &mut String, annotator: &Annotator<'_>, id: &ObjectId) {
    out.push_str(&format!("\t\t{} = {{\n", annotator.reference(id)));
}

fn close_record(out: &mut String) {
    out.push_str("\t\t};\n");
}

fn push_field(out: &mut String, key: &str, rendered: &str) {
    out.push_str(&format!("\t\t\t{key} = {rendered};\n"));
}

fn push_string_field(out: &mut String, key: &str, value: &str) {
    push_field(out, key, &quote(value));
}

fn push_ref_list(out: &mut String, annotator: &Annotator<'_>, key: &str, ids: &[ObjectId]) {
    out.push_str(&format!("\t\t\t{key} = (\n"));
    for id in ids {
        out.push_str(&format!("\t\t\t\t{},\n", annotator.reference(id)));
    }
    out.push_str("\t\t\t);\n");
}

fn push_string_list(out: &mut String, key: &str, values: &[String]) {
    out.push_str(&format!("\t\t\t{key} = (\n"));
    for value in values {
        out.push_str(&format!("\t\t\t\t{},\n", quote(value)));
    }
    out.push_str("\t\t\t);\n");
}

fn push_settings(out: &mut String, settings: &BuildSettings) {
    out.push_str("\t\t\tbuildSettings = {\n");
    for (key, value) in settings {
        match value {
            SettingValue::Scalar(scalar) => {
                out.push_str(&format!("\t\t\t\t{} = {};\n", quote(key), quote(scalar)));
            }
            SettingValue::List(items) => {
                out.push_str(&format!("\t\t\t\t{} = (\n", quote(key)));
                for item in items {
                    out.push_str(&format!("\t\t\t\t\t{},\n", quote(item)));
                }
                out.push_str("\t\t\t\t);\n");
            }
        }
    }
    out.push_str("\t\t\t};\n");
}

fn bool_wire(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn encode_build_file(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    build_file: &BuildFile,
) {
    let mut fields = String::new();
    if let Some(file_ref) = &build_file.file_ref {
        fields.push_str(&format!("fileRef = {}; ", annotator.reference(file_ref)));
    }
    if let Some(product_ref) = &build_file.product_ref {
        fields.push_str(&format!("productRef = {}; ", annotator.reference(product_ref)));
    }
    out.push_str(&format!(
        "\t\t{} = {{isa = PBXBuildFile; {}}};\n",
        annotator.reference(id),
        fields
    ));
}

fn encode_file_reference(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    reference: &FileReference,
) {
    let mut fields = String::new();
    if let Some(explicit) = &reference.explicit_file_type {
        fields.push_str(&format!("explicitFileType = {}; ", quote(explicit)));
    }
    if let Some(include) = reference.include_in_index {
        fields.push_str(&format!("includeInIndex = {}; ", bool_wire(include)));
    }
    if let Some(last_known) = &reference.last_known_file_type {
        fields.push_str(&format!("lastKnownFileType = {}; ", quote(last_known)));
    }
    if let Some(name) = &reference.name {
        fields.push_str(&format!("name = {}; ", quote(name)));
    }
    fields.push_str(&format!("path = {}; ", quote(&reference.path)));
    fields.push_str(&format!(
        "sourceTree = {}; ",
        quote(reference.source_tree.anchor())
    ));
    out.push_str(&format!(
        "\t\t{} = {{isa = PBXFileReference; {}}};\n",
        annotator.reference(id),
        fields
    ));
}

fn encode_project(out: &mut String, annotator: &Annotator<'_>, id: &ObjectId, project: &Project) {
    open_record(out, annotator, id);
    push_field(out, "isa", "PBXProject");
    push_field(
        out,
        "buildConfigurationList",
        &annotator.reference(&project.build_configuration_list),
    );
    push_string_field(out, "compatibilityVersion", &project.compatibility_version);
    push_string_field(out, "developmentRegion", &project.development_region);
    push_field(
        out,
        "hasScannedForEncodings",
        bool_wire(project.has_scanned_for_encodings),
    );
    push_string_list(out, "knownRegions", &project.known_regions);
    push_field(out, "mainGroup", &annotator.reference(&project.main_group));
    if !project.package_references.is_empty() {
        push_ref_list(out, annotator, "packageReferences", &project.package_references);
    }
    if let Some(products) = &project.product_ref_group {
        push_field(out, "productRefGroup", &annotator.reference(products));
    }
    push_string_field(out, "projectDirPath", &project.project_dir_path);
    push_string_field(out, "projectRoot", &project.project_root);
    push_ref_list(out, annotator, "targets", &project.targets);
    close_record(out);
}

fn encode_native_target(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    target: &NativeTarget,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "PBXNativeTarget");
    if let Some(list) = &target.build_configuration_list {
        push_field(out, "buildConfigurationList", &annotator.reference(list));
    }
    push_ref_list(out, annotator, "buildPhases", &target.build_phases);
    push_ref_list(out, annotator, "buildRules", &target.build_rules);
    push_ref_list(out, annotator, "dependencies", &target.dependencies);
    push_string_field(out, "name", &target.name);
    if !target.package_product_dependencies.is_empty() {
        push_ref_list(
            out,
            annotator,
            "packageProductDependencies",
            &target.package_product_dependencies,
        );
    }
    if let Some(product_name) = &target.product_name {
        push_string_field(out, "productName", product_name);
    }
    if let Some(product_reference) = &target.product_reference {
        push_field(out, "productReference", &annotator.reference(product_reference));
    }
    push_string_field(out, "productType", target.product_type.identifier());
    close_record(out);
}

fn encode_group(out: &mut String, annotator: &Annotator<'_>, id: &ObjectId, group: &Group) {
    open_record(out, annotator, id);
    push_field(out, "isa", "PBXGroup");
    push_ref_list(out, annotator, "children", &group.children);
    if let Some(name) = &group.name {
        push_string_field(out, "name", name);
    }
    if let Some(path) = &group.path {
        push_string_field(out, "path", path);
    }
    push_string_field(out, "sourceTree", group.source_tree.anchor());
    close_record(out);
}

fn encode_build_phase(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    phase: &BuildPhase,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", phase.kind.isa());
    push_field(out, "buildActionMask", &phase.build_action_mask.to_string());
    if phase.kind == PhaseKind::CopyFiles {
        if let Some(dst_path) = &phase.dst_path {
            push_string_field(out, "dstPath", dst_path);
        }
        if let Some(spec) = phase.dst_subfolder_spec {
            push_field(out, "dstSubfolderSpec", &spec.to_string());
        }
    }
    push_ref_list(out, annotator, "files", &phase.files);
    if phase.kind == PhaseKind::RunScript {
        push_string_list(out, "inputPaths", &phase.input_paths);
    }
    if let Some(name) = &phase.name {
        push_string_field(out, "name", name);
    }
    if phase.kind == PhaseKind::RunScript {
        push_string_list(out, "outputPaths", &phase.output_paths);
    }
    push_field(
        out,
        "runOnlyForDeploymentPostprocessing",
        bool_wire(phase.run_only_for_deployment_postprocessing),
    );
    if phase.kind == PhaseKind::RunScript {
        if let Some(shell_path) = &phase.shell_path {
            push_string_field(out, "shellPath", shell_path);
        }
        if let Some(shell_script) = &phase.shell_script {
            push_string_field(out, "shellScript", shell_script);
        }
    }
    close_record(out);
}

fn encode_build_configuration(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    configuration: &BuildConfiguration,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "XCBuildConfiguration");
    push_settings(out, &configuration.build_settings);
    push_string_field(out, "name", &configuration.name);
    close_record(out);
}

fn encode_configuration_list(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    list: &ConfigurationList,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "XCConfigurationList");
    push_ref_list(out, annotator, "buildConfigurations", &list.build_configurations);
    push_field(
        out,
        "defaultConfigurationIsVisible",
        bool_wire(list.default_configuration_is_visible),
    );
    if let Some(default_name) = &list.default_configuration_name {
        push_string_field(out, "defaultConfigurationName", default_name);
    }
    close_record(out);
}

fn encode_target_dependency(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    dependency: &TargetDependency,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "PBXTargetDependency");
    if let Some(target) = &dependency.target {
        push_field(out, "target", &annotator.reference(target));
    }
    if let Some(proxy) = &dependency.target_proxy {
        push_field(out, "targetProxy", &annotator.reference(proxy));
    }
    close_record(out);
}

fn encode_container_item_proxy(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    proxy: &ContainerItemProxy,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "PBXContainerItemProxy");
    push_field(
        out,
        "containerPortal",
        &annotator.reference(&proxy.container_portal),
    );
    push_field(out, "proxyType", &proxy.proxy_type.to_string());
    // Xcode leaves the remote id bare
    push_field(out, "remoteGlobalIDString", proxy.remote_global_id.as_str());
    if let Some(remote_info) = &proxy.remote_info {
        push_string_field(out, "remoteInfo", remote_info);
    }
    close_record(out);
}

fn encode_remote_package_reference(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    reference: &RemotePackageReference,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "XCRemoteSwiftPackageReference");
    push_string_field(out, "repositoryURL", &reference.repository_url);
    let mut entries = vec![
        ("kind", reference.requirement.kind().to_string()),
        (
            reference.requirement.value_key(),
            reference.requirement.value().to_string(),
        ),
    ];
    entries.sort_by(|a, b| a.0.cmp(b.0));
    out.push_str("\t\t\trequirement = {\n");
    for (key, value) in entries {
        out.push_str(&format!("\t\t\t\t{key} = {};\n", quote(&value)));
    }
    out.push_str("\t\t\t};\n");
    close_record(out);
}

fn encode_package_product_dependency(
    out: &mut String,
    annotator: &Annotator<'_>,
    id: &ObjectId,
    dependency: &PackageProductDependency,
) {
    open_record(out, annotator, id);
    push_field(out, "isa", "XCSwiftPackageProductDependency");
    if let Some(package) = &dependency.package {
        push_field(out, "package", &annotator.reference(package));
    }
    push_string_field(out, "productName", &dependency.product_name);
    close_record(out);
}

#[cfg(test)]
mod tests {
    include!("codec.test.rs");
}
