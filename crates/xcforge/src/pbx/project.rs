//! Loaded-session mutation surface
//!
//! [`XcodeProject`] couples one decoded graph with the filesystem
//! collaborator that persists it. Every mutation stages its changes on a
//! copy of the graph, runs the consistency checker, rewrites the manifest
//! through the collaborator, and only then replaces the live graph, so a
//! failed operation leaves both the session and the file untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::application::session::{FileSystemProvider, ProcessProvider};
use crate::pbx::codec::{self, CodecError};
use crate::pbx::consistency::{self, ConsistencyError};
use crate::pbx::graph::{GraphError, ProjectGraph};
use crate::pbx::id::ObjectId;
use crate::pbx::objects::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, FileReference, Group,
    NativeTarget, Object, PackageProductDependency, PackageRequirement, RemotePackageReference,
};
use crate::pbx::resolver::{self, ResolverError};
use crate::pbx::store::StoreError;
use crate::primitives::{BuildSettings, PhaseKind, ProductType, SourceTree, merge_settings};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("no target named {name}")]
    TargetNotFound { name: String },

    #[error("no group with path {path}")]
    GroupNotFound { path: String },

    #[error("no file reference with path {path}")]
    FileNotFound { path: String },

    #[error("no package product named {name}")]
    PackageProductNotFound { name: String },

    #[error("target {target} has no {kind} phase")]
    PhaseNotFound { target: String, kind: PhaseKind },

    #[error("{owner} has no build configuration list")]
    ConfigurationListMissing { owner: String },

    #[error("path {path} is not under the source root {source_root}")]
    PathNotUnderSourceRoot { path: String, source_root: String },

    #[error("{version} is not a valid package version")]
    InvalidPackageVersion { version: String },

    #[error("{path} does not name a project directory")]
    InvalidProjectPath { path: String },

    #[error("external collaborator failed: {message}")]
    Collaborator { message: String },

    #[error(transparent)]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error(transparent)]
    Store {
        #[from]
        source: StoreError,
    },

    #[error(transparent)]
    Codec {
        #[from]
        source: CodecError,
    },

    #[error("mutation would leave the graph inconsistent: {source}")]
    Consistency {
        #[from]
        source: ConsistencyError,
    },
}

impl From<ResolverError> for ProjectError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::PathNotUnderSourceRoot { path, source_root } => {
                ProjectError::PathNotUnderSourceRoot { path, source_root }
            }
            ResolverError::Graph { source } => ProjectError::Graph { source },
            ResolverError::Store { source } => ProjectError::Store { source },
        }
    }
}

fn collaborator(err: anyhow::Error) -> ProjectError {
    ProjectError::Collaborator {
        message: format!("{err:#}"),
    }
}

/// One loaded project manifest bound to its on-disk location
///
/// Constructed by [`XcodeProject::load`] or the scaffold, so an unloaded
/// session cannot be represented. The handle borrows the filesystem
/// collaborator for the lifetime of the session and rewrites the manifest
/// after every successful mutation.
pub struct XcodeProject<'fs> {
    fs: &'fs dyn FileSystemProvider,
    graph: ProjectGraph,
    project_dir: PathBuf,
    name: String,
}

// The provider field is a trait object, so Debug is written by hand.
impl fmt::Debug for XcodeProject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XcodeProject")
            .field("name", &self.name)
            .field("project_dir", &self.project_dir)
            .field("objects", &self.graph.store().len())
            .finish_non_exhaustive()
    }
}

impl<'fs> XcodeProject<'fs> {
    /// Load `<dir>/<name>.xcodeproj/project.pbxproj` where `name` is the
    /// last component of `dir`
    pub fn load(fs: &'fs dyn FileSystemProvider, project_dir: &Path) -> Result<Self, ProjectError> {
        let name = project_dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ProjectError::InvalidProjectPath {
                path: project_dir.display().to_string(),
            })?
            .to_string();
        Self::load_named(fs, project_dir, &name)
    }

    /// Load a project whose name differs from its directory's last component
    pub fn load_named(
        fs: &'fs dyn FileSystemProvider,
        project_dir: &Path,
        name: &str,
    ) -> Result<Self, ProjectError> {
        let manifest = manifest_path(project_dir, name);
        let text = fs.read_text_file(&manifest).map_err(collaborator)?;
        let graph = codec::decode(&text, name)?;
        consistency::check(&graph)?;
        debug!(name, objects = graph.store().len(), "loaded project");
        Ok(XcodeProject {
            fs,
            graph,
            project_dir: project_dir.to_path_buf(),
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.project_dir, &self.name)
    }

    /// Directory holding the main target's sources
    pub fn main_target_dir(&self) -> PathBuf {
        self.project_dir.join(&self.name)
    }

    pub fn graph(&self) -> &ProjectGraph {
        &self.graph
    }

    /// Current manifest text for the live graph
    pub fn manifest_text(&self) -> String {
        codec::encode(&self.graph)
    }

    /// Target names in manifest order
    pub fn get_targets(&self) -> Vec<String> {
        self.graph.target_names()
    }

    pub fn find_target(&self, name: &str) -> Option<ObjectId> {
        self.graph.target_id_named(name)
    }

    fn target_id(&self, name: &str) -> Result<ObjectId, ProjectError> {
        self.graph
            .target_id_named(name)
            .ok_or_else(|| ProjectError::TargetNotFound {
                name: name.to_string(),
            })
    }

    fn phase_id(
        &self,
        graph: &ProjectGraph,
        target_id: &ObjectId,
        target_name: &str,
        kind: PhaseKind,
    ) -> Result<ObjectId, ProjectError> {
        graph
            .phase_of_kind(target_id, kind)
            .ok_or_else(|| ProjectError::PhaseNotFound {
                target: target_name.to_string(),
                kind,
            })
    }

    /// On-disk directory a group's files live in
    ///
    /// The main group carries the project name as its path and maps to the
    /// main target directory itself rather than a nested folder.
    fn group_dir(&self, inside: Option<&str>, group_path: &str) -> PathBuf {
        let mut dir = self.main_target_dir();
        if let Some(parent) = inside {
            dir = dir.join(parent);
        }
        if group_path != self.name {
            dir = dir.join(group_path);
        }
        dir
    }

    /// Validate the staged graph, persist it, and make it live
    fn commit(&mut self, staged: ProjectGraph) -> Result<(), ProjectError> {
        consistency::check(&staged)?;
        let text = codec::encode(&staged);
        self.fs
            .write_text_file(&self.manifest_path(), &text)
            .map_err(collaborator)?;
        self.graph = staged;
        Ok(())
    }

    /// Create a target with one configuration per entry of `settings`
    ///
    /// The target gets a built-products file reference, filed under the
    /// products group when the project has one. Configurations are created
    /// in ASCII order of their names so the
    /// serialized manifest is reproducible. An existing target with the
    /// same name and product type makes this a no-op returning its id; the
    /// supplied settings are not merged into it.
    pub fn add_target(
        &mut self,
        name: &str,
        product_type: ProductType,
        settings: &BTreeMap<String, BuildSettings>,
    ) -> Result<ObjectId, ProjectError> {
        if let Some(existing) = self.graph.target_id_named(name) {
            if self.graph.native_target(&existing)?.product_type == product_type {
                debug!(name, "target already exists, reusing");
                return Ok(existing);
            }
        }

        let mut graph = self.graph.clone();
        let mut configuration_ids = Vec::new();
        for (configuration_name, configuration_settings) in settings {
            let mut configuration = BuildConfiguration::new(configuration_name.clone());
            merge_settings(&mut configuration.build_settings, configuration_settings);
            configuration_ids.push(graph.add_object(Object::BuildConfiguration(configuration))?);
        }
        let list_id = graph.add_object(Object::ConfigurationList(ConfigurationList {
            build_configurations: configuration_ids,
            default_configuration_is_visible: false,
            default_configuration_name: settings.contains_key("Release").then(|| "Release".to_string()),
        }))?;
        let product_ref = graph.add_object(Object::FileReference(FileReference {
            explicit_file_type: Some(product_type.artifact_file_type().to_string()),
            include_in_index: Some(false),
            last_known_file_type: None,
            name: None,
            path: artifact_path(name, product_type),
            source_tree: SourceTree::BuiltProductsDir,
        }))?;
        let target_id = graph.add_object(Object::NativeTarget(NativeTarget {
            build_configuration_list: Some(list_id),
            build_phases: Vec::new(),
            build_rules: Vec::new(),
            dependencies: Vec::new(),
            name: name.to_string(),
            package_product_dependencies: Vec::new(),
            product_name: Some(name.to_string()),
            product_reference: Some(product_ref.clone()),
            product_type,
        }))?;
        graph.project_mut()?.targets.push(target_id.clone());
        if let Some(products_group) = graph.project()?.product_ref_group.clone() {
            graph.group_mut(&products_group)?.children.push(product_ref);
        }
        self.commit(graph)?;
        debug!(name, id = %target_id, "added target");
        Ok(target_id)
    }

    /// Reference `file_path` and compile it in `target_name`'s sources phase
    ///
    /// Idempotent per (path, target): an existing reference with the same
    /// resolved relative path is reused and an existing (file, phase)
    /// binding is never duplicated.
    pub fn add_file(
        &mut self,
        target_name: &str,
        file_path: &str,
        source_root: &str,
    ) -> Result<(), ProjectError> {
        let target_id = self.target_id(target_name)?;
        let mut graph = self.graph.clone();
        let phase_id = self.phase_id(&graph, &target_id, target_name, PhaseKind::Sources)?;
        let (file_ref, _) = resolver::find_or_create_file_reference(&mut graph, file_path, source_root)?;
        resolver::ensure_build_file(&mut graph, &phase_id, &file_ref)?;
        self.commit(graph)
    }

    /// Create a named group under the main group referencing `files`
    pub fn add_group_and_files(
        &mut self,
        group_name: &str,
        files: &[String],
        source_root: &str,
    ) -> Result<ObjectId, ProjectError> {
        let mut graph = self.graph.clone();
        let group_id = graph.add_object(Object::Group(Group {
            children: Vec::new(),
            name: Some(group_name.to_string()),
            path: None,
            source_tree: SourceTree::Group,
        }))?;
        let main_group = graph.project()?.main_group.clone();
        graph.group_mut(&main_group)?.children.push(group_id.clone());
        for file in files {
            let (ref_id, created) =
                resolver::find_or_create_file_reference(&mut graph, file, source_root)?;
            // A reused reference stays where its current parent put it
            if created || graph.parent_group_of(&ref_id).is_none() {
                let group = graph.group_mut(&group_id)?;
                if !group.children.contains(&ref_id) {
                    group.children.push(ref_id);
                }
            }
        }
        self.commit(graph)?;
        Ok(group_id)
    }

    /// Link a framework into the target's frameworks phase
    pub fn add_dependency(
        &mut self,
        target_name: &str,
        framework_path: &str,
    ) -> Result<(), ProjectError> {
        let target_id = self.target_id(target_name)?;
        let mut graph = self.graph.clone();
        let phase_id = self.phase_id(&graph, &target_id, target_name, PhaseKind::Frameworks)?;
        let ref_id = match graph.file_reference_id_with_path(framework_path) {
            Some(existing) => existing,
            None => graph.add_object(Object::FileReference(FileReference {
                explicit_file_type: None,
                include_in_index: None,
                last_known_file_type: Some("wrapper.framework".to_string()),
                name: None,
                path: framework_path.to_string(),
                source_tree: SourceTree::SdkRoot,
            }))?,
        };
        resolver::ensure_build_file(&mut graph, &phase_id, &ref_id)?;
        self.commit(graph)
    }

    /// Reference `resource_paths` and copy them in the resources phase
    pub fn add_resources(
        &mut self,
        target_name: &str,
        resource_paths: &[String],
        source_root: &str,
    ) -> Result<(), ProjectError> {
        let target_id = self.target_id(target_name)?;
        let mut graph = self.graph.clone();
        let phase_id = self.phase_id(&graph, &target_id, target_name, PhaseKind::Resources)?;
        for path in resource_paths {
            let (ref_id, _) = resolver::find_or_create_file_reference(&mut graph, path, source_root)?;
            resolver::ensure_build_file(&mut graph, &phase_id, &ref_id)?;
        }
        self.commit(graph)
    }

    /// Insert a run-script phase immediately before the sources phase
    ///
    /// A target with no sources phase gets the script appended at the end
    /// of its phase list.
    pub fn add_build_script_before_compile_sources(
        &mut self,
        target_name: &str,
        script_name: &str,
        script: &str,
    ) -> Result<ObjectId, ProjectError> {
        let target_id = self.target_id(target_name)?;
        let mut graph = self.graph.clone();
        let phase_id = graph.add_object(Object::BuildPhase(BuildPhase::run_script(
            script_name,
            script,
        )))?;
        let phases = graph.native_target(&target_id)?.build_phases.clone();
        let sources_index = phases.iter().position(|id| {
            graph
                .build_phase(id)
                .map(|phase| phase.kind == PhaseKind::Sources)
                .unwrap_or(false)
        });
        let target = graph.native_target_mut(&target_id)?;
        match sources_index {
            Some(index) => target.build_phases.insert(index, phase_id.clone()),
            None => target.build_phases.push(phase_id.clone()),
        }
        self.commit(graph)?;
        Ok(phase_id)
    }

    fn update_target_configurations(
        &mut self,
        target_name: &str,
        apply: impl Fn(&mut BuildConfiguration),
    ) -> Result<(), ProjectError> {
        let target_id = self.target_id(target_name)?;
        let list_id = self
            .graph
            .native_target(&target_id)?
            .build_configuration_list
            .clone()
            .ok_or_else(|| ProjectError::ConfigurationListMissing {
                owner: format!("target {target_name}"),
            })?;
        let mut graph = self.graph.clone();
        let configuration_ids = graph.configuration_list(&list_id)?.build_configurations.clone();
        for configuration_id in &configuration_ids {
            apply(graph.build_configuration_mut(configuration_id)?);
        }
        self.commit(graph)
    }

    /// Overwrite `PRODUCT_BUNDLE_IDENTIFIER` across the target's configurations
    pub fn update_bundle_identifier(
        &mut self,
        target_name: &str,
        new_identifier: &str,
    ) -> Result<(), ProjectError> {
        self.update_target_configurations(target_name, |configuration| {
            configuration.set("PRODUCT_BUNDLE_IDENTIFIER", new_identifier);
        })
    }

    /// Overwrite the bundle display name across the target's configurations
    pub fn update_display_name(
        &mut self,
        target_name: &str,
        new_display_name: &str,
    ) -> Result<(), ProjectError> {
        self.update_target_configurations(target_name, |configuration| {
            configuration.set("INFOPLIST_KEY_CFBundleDisplayName", new_display_name);
        })
    }

    /// Set the development team, and optionally a provisioning profile
    pub fn set_signing_account(
        &mut self,
        target_name: &str,
        development_team: &str,
        provisioning_profile_specifier: Option<&str>,
    ) -> Result<(), ProjectError> {
        self.update_target_configurations(target_name, |configuration| {
            configuration.set("DEVELOPMENT_TEAM", development_team);
            if let Some(specifier) = provisioning_profile_specifier {
                configuration.set("PROVISIONING_PROFILE_SPECIFIER", specifier);
            }
        })
    }

    /// Append flags to `OTHER_SWIFT_FLAGS` across the target's configurations
    pub fn set_swift_compiler_flags(
        &mut self,
        target_name: &str,
        flags: &[String],
    ) -> Result<(), ProjectError> {
        self.update_target_configurations(target_name, |configuration| {
            configuration.append("OTHER_SWIFT_FLAGS", flags);
        })
    }

    /// Point `INFOPLIST_FILE` at `<name>/Info.plist` for the target
    pub fn update_info_plist_file_path(&mut self, target_name: &str) -> Result<(), ProjectError> {
        let info_plist = format!("{}/Info.plist", self.name);
        self.update_target_configurations(target_name, |configuration| {
            configuration.set("INFOPLIST_FILE", info_plist.clone());
        })
    }

    /// Merge `settings` into every project-level configuration
    ///
    /// Later writes to the same key replace the prior value wholesale.
    pub fn set_project_build_settings(
        &mut self,
        settings: &BuildSettings,
    ) -> Result<(), ProjectError> {
        let list_id = self.graph.project()?.build_configuration_list.clone();
        let mut graph = self.graph.clone();
        let configuration_ids = graph
            .configuration_list(&list_id)
            .map_err(|_| ProjectError::ConfigurationListMissing {
                owner: "project".to_string(),
            })?
            .build_configurations
            .clone();
        for configuration_id in &configuration_ids {
            merge_settings(
                &mut graph.build_configuration_mut(configuration_id)?.build_settings,
                settings,
            );
        }
        self.commit(graph)
    }

    /// Reference a file sitting next to the manifest, under the main group
    pub fn reference_file_in_project_root(
        &mut self,
        file_name: &str,
    ) -> Result<ObjectId, ProjectError> {
        if let Some(existing) = self.graph.file_reference_id_with_path(file_name) {
            debug!(file = file_name, "file already referenced in project root");
            return Ok(existing);
        }
        let mut graph = self.graph.clone();
        let ref_id = resolver::create_group_relative_reference(&mut graph, file_name)?;
        let main_group = graph.project()?.main_group.clone();
        graph.group_mut(&main_group)?.children.push(ref_id.clone());
        self.commit(graph)?;
        Ok(ref_id)
    }

    /// Reference an already-on-disk file inside a group and compile it
    ///
    /// A no-op when the path is already referenced or names `.DS_Store`.
    pub fn add_existing_file_reference_to_target(
        &mut self,
        file_path: &str,
        group_path: &str,
        target_name: &str,
    ) -> Result<(), ProjectError> {
        if file_path.ends_with(".DS_Store") {
            return Ok(());
        }
        if self.graph.file_reference_id_with_path(file_path).is_some() {
            return Ok(());
        }
        let target_id = self.target_id(target_name)?;
        let group_id =
            self.graph
                .group_id_with_path(group_path)
                .ok_or_else(|| ProjectError::GroupNotFound {
                    path: group_path.to_string(),
                })?;
        let mut graph = self.graph.clone();
        let phase_id = self.phase_id(&graph, &target_id, target_name, PhaseKind::Sources)?;
        let ref_id = resolver::create_group_relative_reference(&mut graph, file_path)?;
        graph.group_mut(&group_id)?.children.push(ref_id.clone());
        resolver::ensure_build_file(&mut graph, &phase_id, &ref_id)?;
        self.commit(graph)
    }

    /// Reference every regular file under `dir` inside `group_path`
    pub fn add_file_references_to_target(
        &mut self,
        dir: &Path,
        group_path: &str,
        target_name: &str,
    ) -> Result<(), ProjectError> {
        let files = self.fs.walk_files(dir).map_err(collaborator)?;
        for file in files {
            let Some(file_name) = file.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            self.add_existing_file_reference_to_target(file_name, group_path, target_name)?;
        }
        Ok(())
    }

    /// Write a new source file and link it into a group plus sources phase
    ///
    /// A file already referenced by that name makes the call a no-op.
    pub fn create_and_add_new_file_to_target(
        &mut self,
        file_name: &str,
        inside: Option<&str>,
        group_path: &str,
        target_name: &str,
        content: Option<&str>,
    ) -> Result<(), ProjectError> {
        if self.graph.file_reference_id_with_path(file_name).is_some() {
            debug!(file = file_name, "file already referenced, skipping");
            return Ok(());
        }
        let target_id = self.target_id(target_name)?;
        let group_id =
            self.graph
                .group_id_with_path(group_path)
                .ok_or_else(|| ProjectError::GroupNotFound {
                    path: group_path.to_string(),
                })?;
        let mut graph = self.graph.clone();
        let phase_id = self.phase_id(&graph, &target_id, target_name, PhaseKind::Sources)?;
        let ref_id = resolver::create_group_relative_reference(&mut graph, file_name)?;
        graph.group_mut(&group_id)?.children.push(ref_id.clone());
        resolver::ensure_build_file(&mut graph, &phase_id, &ref_id)?;

        let file_path = self
            .group_dir(inside, group_path)
            .join(file_name);
        if !self.fs.file_exists(&file_path) {
            self.fs
                .write_text_file(&file_path, content.unwrap_or(""))
                .map_err(collaborator)?;
        }
        self.commit(graph)
    }

    /// Delete a referenced file from disk, its group entry, and its build file
    ///
    /// Every piece is resolved before anything is touched; a missing piece
    /// reports its `NotFound` error with the graph and disk unchanged.
    pub fn remove_existing_file_from_target(
        &mut self,
        file_name: &str,
        inside: Option<&str>,
        group_path: &str,
        target_name: &str,
    ) -> Result<(), ProjectError> {
        let ref_id = self
            .graph
            .file_reference_id_with_path(file_name)
            .ok_or_else(|| ProjectError::FileNotFound {
                path: file_name.to_string(),
            })?;
        let target_id = self.target_id(target_name)?;
        self.graph
            .group_id_with_path(group_path)
            .ok_or_else(|| ProjectError::GroupNotFound {
                path: group_path.to_string(),
            })?;
        let phase_id = self.phase_id(&self.graph, &target_id, target_name, PhaseKind::Sources)?;
        self.graph
            .build_file_in_phase(&phase_id, &ref_id)
            .ok_or_else(|| ProjectError::FileNotFound {
                path: file_name.to_string(),
            })?;

        let mut graph = self.graph.clone();
        graph.remove_file_reference_everywhere(&ref_id);
        self.fs
            .remove_item(&self.group_dir(inside, group_path).join(file_name))
            .map_err(collaborator)?;
        self.commit(graph)
    }

    /// Create an empty group bound to a new on-disk folder
    ///
    /// The group lands under the main target's group, the folder under the
    /// main target directory.
    pub fn create_new_empty_group_with_its_folder(
        &mut self,
        group_name: &str,
        target_name: &str,
    ) -> Result<ObjectId, ProjectError> {
        let parent_path = self.name.clone();
        self.create_group_under(group_name, &parent_path, target_name, None)
    }

    /// Create an empty group and folder nested inside another group
    pub fn create_new_empty_group_with_its_folder_inside_group(
        &mut self,
        group_name: &str,
        inside: &str,
        target_name: &str,
    ) -> Result<ObjectId, ProjectError> {
        self.create_group_under(group_name, inside, target_name, Some(inside))
    }

    fn create_group_under(
        &mut self,
        group_name: &str,
        parent_path: &str,
        target_name: &str,
        folder_inside: Option<&str>,
    ) -> Result<ObjectId, ProjectError> {
        self.target_id(target_name)?;
        let parent_id =
            self.graph
                .group_id_with_path(parent_path)
                .ok_or_else(|| ProjectError::GroupNotFound {
                    path: parent_path.to_string(),
                })?;
        let mut graph = self.graph.clone();
        let group_id = graph.add_object(Object::Group(Group {
            children: Vec::new(),
            name: None,
            path: Some(group_name.to_string()),
            source_tree: SourceTree::Group,
        }))?;
        graph.group_mut(&parent_id)?.children.push(group_id.clone());

        let folder = match folder_inside {
            Some(inside) => self.main_target_dir().join(inside).join(group_name),
            None => self.main_target_dir().join(group_name),
        };
        self.fs.create_directory(&folder).map_err(collaborator)?;
        self.commit(graph)?;
        Ok(group_id)
    }

    /// Delete a group's folder and remove its whole subtree from the graph
    pub fn remove_group_with_its_folder(
        &mut self,
        group_name: &str,
        inside: Option<&str>,
    ) -> Result<(), ProjectError> {
        let group_id =
            self.graph
                .group_id_with_path(group_name)
                .ok_or_else(|| ProjectError::GroupNotFound {
                    path: group_name.to_string(),
                })?;
        if let Some(parent_path) = inside {
            self.graph
                .group_id_with_path(parent_path)
                .ok_or_else(|| ProjectError::GroupNotFound {
                    path: parent_path.to_string(),
                })?;
        }

        let mut graph = self.graph.clone();
        graph.remove_group_cascade(&group_id)?;
        let folder = match inside {
            Some(parent) => self.main_target_dir().join(parent).join(group_name),
            None => self.main_target_dir().join(group_name),
        };
        self.fs.remove_item(&folder).map_err(collaborator)?;
        self.commit(graph)
    }

    /// Remove a target and everything only it owns
    pub fn remove_target(&mut self, target_name: &str) -> Result<(), ProjectError> {
        let target_id = self.target_id(target_name)?;
        let mut graph = self.graph.clone();
        graph.remove_target_cascade(&target_id)?;
        self.commit(graph)
    }

    /// Bind a remote Swift package product to the target
    ///
    /// The package reference is reused when the repository is already
    /// pinned; a product the target already depends on makes this a no-op.
    pub fn add_spm_library(
        &mut self,
        target_name: &str,
        product_name: &str,
        git_url: &str,
        version: &str,
    ) -> Result<(), ProjectError> {
        semver::Version::parse(version).map_err(|_| ProjectError::InvalidPackageVersion {
            version: version.to_string(),
        })?;
        let target_id = self.target_id(target_name)?;
        let already_bound = self
            .graph
            .native_target(&target_id)?
            .package_product_dependencies
            .iter()
            .any(|id| {
                self.graph
                    .store()
                    .get(id)
                    .and_then(Object::as_package_product_dependency)
                    .map(|dependency| dependency.product_name == product_name)
                    .unwrap_or(false)
            });
        if already_bound {
            debug!(product = product_name, target = target_name, "package already bound");
            return Ok(());
        }

        let mut graph = self.graph.clone();
        let existing_package = graph
            .store()
            .remote_package_references()
            .find(|(_, reference)| reference.repository_url == git_url)
            .map(|(id, _)| id.clone());
        let package_id = match existing_package {
            Some(id) => id,
            None => {
                let id = graph.add_object(Object::RemotePackageReference(RemotePackageReference {
                    repository_url: git_url.to_string(),
                    requirement: PackageRequirement::UpToNextMajor {
                        minimum_version: version.to_string(),
                    },
                }))?;
                graph.project_mut()?.package_references.push(id.clone());
                id
            }
        };
        let product_id = graph.add_object(Object::PackageProductDependency(
            PackageProductDependency {
                package: Some(package_id),
                product_name: product_name.to_string(),
            },
        ))?;
        graph
            .native_target_mut(&target_id)?
            .package_product_dependencies
            .push(product_id.clone());
        if let Some(phase_id) = graph.phase_of_kind(&target_id, PhaseKind::Frameworks) {
            let build_file =
                graph.add_object(Object::BuildFile(BuildFile::for_product(product_id)))?;
            graph.build_phase_mut(&phase_id)?.files.push(build_file);
        } else {
            warn!(target = target_name, "target has no frameworks phase, package not linked");
        }
        self.commit(graph)
    }

    /// Unbind a package product everywhere, dropping unused package references
    pub fn remove_spm_library(&mut self, product_name: &str) -> Result<(), ProjectError> {
        let product_ids: Vec<ObjectId> = self
            .graph
            .store()
            .package_product_dependencies()
            .filter(|(_, dependency)| dependency.product_name == product_name)
            .map(|(id, _)| id.clone())
            .collect();
        if product_ids.is_empty() {
            return Err(ProjectError::PackageProductNotFound {
                name: product_name.to_string(),
            });
        }
        let mut graph = self.graph.clone();
        for product_id in &product_ids {
            graph.remove_package_product_everywhere(product_id);
        }
        self.commit(graph)
    }
}

/// Built-artifact path for a product reference, `Demo.app` style
fn artifact_path(name: &str, product_type: ProductType) -> String {
    let extension = product_type.artifact_extension();
    if extension.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}

fn manifest_path(project_dir: &Path, name: &str) -> PathBuf {
    project_dir
        .join(format!("{name}.xcodeproj"))
        .join("project.pbxproj")
}

/// Read the development team from the host's Xcode preferences and apply it
///
/// Returns the applied team id, or `None` when the host has never selected
/// one; absence is not an error.
pub fn apply_host_signing_team(
    project: &mut XcodeProject<'_>,
    process: &dyn ProcessProvider,
    target_name: &str,
) -> Result<Option<String>, ProjectError> {
    match crate::application::session::fetch_last_selected_team_id(process) {
        Some(team) => {
            project.set_signing_account(target_name, &team, None)?;
            Ok(Some(team))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    include!("project.test.rs");
}
