//! Typed object model for the manifest graph
//!
//! One struct per record kind the engine understands, plus the closed
//! [`Object`] sum over all of them. Field names mirror the wire keys in
//! snake case; identifier-valued fields hold [`ObjectId`] links that the
//! consistency checker validates before every write.

use crate::pbx::id::ObjectId;
use crate::primitives::{BuildSettings, PhaseKind, ProductType, SettingValue, SourceTree};

/// Root record, one per graph
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub build_configuration_list: ObjectId,
    pub compatibility_version: String,
    pub development_region: String,
    pub has_scanned_for_encodings: bool,
    pub known_regions: Vec<String>,
    pub main_group: ObjectId,
    pub package_references: Vec<ObjectId>,
    pub product_ref_group: Option<ObjectId>,
    pub project_dir_path: String,
    pub project_root: String,
    pub targets: Vec<ObjectId>,
}

/// Buildable target producing one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTarget {
    pub build_configuration_list: Option<ObjectId>,
    pub build_phases: Vec<ObjectId>,
    pub build_rules: Vec<ObjectId>,
    pub dependencies: Vec<ObjectId>,
    pub name: String,
    pub package_product_dependencies: Vec<ObjectId>,
    pub product_name: Option<String>,
    pub product_reference: Option<ObjectId>,
    pub product_type: ProductType,
}

/// Hierarchy node owning child groups and file references
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub children: Vec<ObjectId>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub source_tree: SourceTree,
}

impl Group {
    /// Label shown in annotations, the explicit name or the path
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }
}

/// Pointer to an on-disk file or produced artifact
#[derive(Debug, Clone, PartialEq)]
pub struct FileReference {
    pub explicit_file_type: Option<String>,
    pub include_in_index: Option<bool>,
    pub last_known_file_type: Option<String>,
    pub name: Option<String>,
    pub path: String,
    pub source_tree: SourceTree,
}

impl FileReference {
    /// Label shown in annotations, the explicit name or the last path component
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| match self.path.rsplit('/').next() {
                Some(last) if !last.is_empty() => last,
                _ => &self.path,
            })
    }
}

/// Join entity binding a file reference or package product to one phase
///
/// Exactly one of `file_ref` and `product_ref` is set in a consistent graph.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFile {
    pub file_ref: Option<ObjectId>,
    pub product_ref: Option<ObjectId>,
}

impl BuildFile {
    pub fn for_file(file_ref: ObjectId) -> Self {
        BuildFile {
            file_ref: Some(file_ref),
            product_ref: None,
        }
    }

    pub fn for_product(product_ref: ObjectId) -> Self {
        BuildFile {
            file_ref: None,
            product_ref: Some(product_ref),
        }
    }
}

/// Build step within a target, discriminated by [`PhaseKind`]
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPhase {
    pub kind: PhaseKind,
    pub build_action_mask: i64,
    pub files: Vec<ObjectId>,
    pub name: Option<String>,
    pub run_only_for_deployment_postprocessing: bool,
    /// Copy-files destination, only meaningful for [`PhaseKind::CopyFiles`]
    pub dst_path: Option<String>,
    pub dst_subfolder_spec: Option<i64>,
    /// Script fields, only meaningful for [`PhaseKind::RunScript`]
    pub shell_path: Option<String>,
    pub shell_script: Option<String>,
    pub input_paths: Vec<String>,
    pub output_paths: Vec<String>,
}

pub const DEFAULT_BUILD_ACTION_MASK: i64 = 2147483647;

impl BuildPhase {
    /// Empty phase of the given kind with wire defaults
    pub fn new(kind: PhaseKind) -> Self {
        BuildPhase {
            kind,
            build_action_mask: DEFAULT_BUILD_ACTION_MASK,
            files: Vec::new(),
            name: None,
            run_only_for_deployment_postprocessing: false,
            dst_path: None,
            dst_subfolder_spec: None,
            shell_path: None,
            shell_script: None,
            input_paths: Vec::new(),
            output_paths: Vec::new(),
        }
    }

    /// Named shell script phase running under `/bin/sh`
    pub fn run_script(name: impl Into<String>, script: impl Into<String>) -> Self {
        let mut phase = BuildPhase::new(PhaseKind::RunScript);
        phase.name = Some(name.into());
        phase.shell_path = Some("/bin/sh".to_string());
        phase.shell_script = Some(script.into());
        phase
    }

    /// Label shown in annotations for build files in this phase
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_label())
    }
}

/// Named settings bucket, one per configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfiguration {
    pub build_settings: BuildSettings,
    pub name: String,
}

impl BuildConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        BuildConfiguration {
            build_settings: BuildSettings::new(),
            name: name.into(),
        }
    }

    /// Replace the value stored under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.build_settings.insert(key.into(), value.into());
    }

    /// Append items under `key`, creating an empty list when absent
    pub fn append(&mut self, key: &str, items: &[String]) {
        self.build_settings
            .entry(key.to_string())
            .or_insert_with(|| SettingValue::List(Vec::new()))
            .append(items.iter().cloned());
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.build_settings.get(key)
    }
}

/// Ordered set of configurations shared by a project or target
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationList {
    pub build_configurations: Vec<ObjectId>,
    pub default_configuration_is_visible: bool,
    pub default_configuration_name: Option<String>,
}

/// Edge from one target to another it must be built after
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDependency {
    pub target: Option<ObjectId>,
    pub target_proxy: Option<ObjectId>,
}

/// Indirection record Xcode uses for cross-container target links
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerItemProxy {
    pub container_portal: ObjectId,
    pub proxy_type: i64,
    pub remote_global_id: ObjectId,
    pub remote_info: Option<String>,
}

/// Version constraint on a remote package reference
#[derive(Debug, Clone, PartialEq)]
pub enum PackageRequirement {
    UpToNextMajor { minimum_version: String },
    UpToNextMinor { minimum_version: String },
    Exact { version: String },
    Branch { branch: String },
    Revision { revision: String },
}

impl PackageRequirement {
    /// Wire discriminator stored under the `kind` key
    pub fn kind(&self) -> &'static str {
        match self {
            PackageRequirement::UpToNextMajor { .. } => "upToNextMajorVersion",
            PackageRequirement::UpToNextMinor { .. } => "upToNextMinorVersion",
            PackageRequirement::Exact { .. } => "exactVersion",
            PackageRequirement::Branch { .. } => "branch",
            PackageRequirement::Revision { .. } => "revision",
        }
    }

    /// Wire key holding the constraint value
    pub fn value_key(&self) -> &'static str {
        match self {
            PackageRequirement::UpToNextMajor { .. } | PackageRequirement::UpToNextMinor { .. } => {
                "minimumVersion"
            }
            PackageRequirement::Exact { .. } => "version",
            PackageRequirement::Branch { .. } => "branch",
            PackageRequirement::Revision { .. } => "revision",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            PackageRequirement::UpToNextMajor { minimum_version }
            | PackageRequirement::UpToNextMinor { minimum_version } => minimum_version,
            PackageRequirement::Exact { version } => version,
            PackageRequirement::Branch { branch } => branch,
            PackageRequirement::Revision { revision } => revision,
        }
    }
}

/// Remote Swift package pinned to a repository and version requirement
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePackageReference {
    pub repository_url: String,
    pub requirement: PackageRequirement,
}

impl RemotePackageReference {
    /// Repository name, the last URL component without a `.git` suffix
    pub fn repository_name(&self) -> &str {
        let trimmed = self.repository_url.trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        last.strip_suffix(".git").unwrap_or(last)
    }
}

/// Product of a remote package a target links against
#[derive(Debug, Clone, PartialEq)]
pub struct PackageProductDependency {
    pub package: Option<ObjectId>,
    pub product_name: String,
}

/// Closed sum of every record kind the engine models
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Project(Project),
    NativeTarget(NativeTarget),
    Group(Group),
    FileReference(FileReference),
    BuildFile(BuildFile),
    BuildPhase(BuildPhase),
    BuildConfiguration(BuildConfiguration),
    ConfigurationList(ConfigurationList),
    TargetDependency(TargetDependency),
    ContainerItemProxy(ContainerItemProxy),
    RemotePackageReference(RemotePackageReference),
    PackageProductDependency(PackageProductDependency),
}

impl Object {
    /// Wire record kind under the `isa` key
    pub fn isa(&self) -> &'static str {
        match self {
            Object::Project(_) => "PBXProject",
            Object::NativeTarget(_) => "PBXNativeTarget",
            Object::Group(_) => "PBXGroup",
            Object::FileReference(_) => "PBXFileReference",
            Object::BuildFile(_) => "PBXBuildFile",
            Object::BuildPhase(phase) => phase.kind.isa(),
            Object::BuildConfiguration(_) => "XCBuildConfiguration",
            Object::ConfigurationList(_) => "XCConfigurationList",
            Object::TargetDependency(_) => "PBXTargetDependency",
            Object::ContainerItemProxy(_) => "PBXContainerItemProxy",
            Object::RemotePackageReference(_) => "XCRemoteSwiftPackageReference",
            Object::PackageProductDependency(_) => "XCSwiftPackageProductDependency",
        }
    }
}

macro_rules! impl_object_accessors {
    ($($variant:ident, $inner:ty, $as_ref:ident, $as_mut:ident;)*) => {
        impl Object {
            $(
                pub fn $as_ref(&self) -> Option<&$inner> {
                    match self {
                        Object::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                pub fn $as_mut(&mut self) -> Option<&mut $inner> {
                    match self {
                        Object::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )*
        }
    };
}

impl_object_accessors! {
    Project, Project, as_project, as_project_mut;
    NativeTarget, NativeTarget, as_native_target, as_native_target_mut;
    Group, Group, as_group, as_group_mut;
    FileReference, FileReference, as_file_reference, as_file_reference_mut;
    BuildFile, BuildFile, as_build_file, as_build_file_mut;
    BuildPhase, BuildPhase, as_build_phase, as_build_phase_mut;
    BuildConfiguration, BuildConfiguration, as_build_configuration, as_build_configuration_mut;
    ConfigurationList, ConfigurationList, as_configuration_list, as_configuration_list_mut;
    TargetDependency, TargetDependency, as_target_dependency, as_target_dependency_mut;
    ContainerItemProxy, ContainerItemProxy, as_container_item_proxy, as_container_item_proxy_mut;
    RemotePackageReference, RemotePackageReference, as_remote_package_reference, as_remote_package_reference_mut;
    PackageProductDependency, PackageProductDependency, as_package_product_dependency, as_package_product_dependency_mut;
}

#[cfg(test)]
mod tests {
    include!("objects.test.rs");
}
