//! Graph-level view over the object store
//!
//! Couples the store with the identifier allocator and the root record,
//! and layers on the structural queries and cascade removals the mutation
//! API is built from. Removal helpers scrub every inbound link before an
//! object leaves the store so no operation can strand a dangling
//! identifier.

use thiserror::Error;
use tracing::trace;

use crate::pbx::id::{IdAllocator, ObjectId};
use crate::pbx::objects::{
    BuildConfiguration, BuildPhase, ConfigurationList, FileReference, Group, NativeTarget, Object,
    Project,
};
use crate::pbx::store::{ObjectStore, StoreError};
use crate::primitives::PhaseKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("root object {id} is not present in the graph")]
    RootMissing { id: ObjectId },

    #[error("root object {id} is not a PBXProject record")]
    RootNotProject { id: ObjectId },

    #[error("object {id} is not present in the graph")]
    ObjectMissing { id: ObjectId },

    #[error("object {id} is not a {expected} record")]
    WrongKind { id: ObjectId, expected: &'static str },
}

/// One manifest graph: store, allocator, root, and the file-level metadata
/// that round-trips alongside the objects
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    name: String,
    archive_version: String,
    object_version: String,
    store: ObjectStore,
    allocator: IdAllocator,
    root: ObjectId,
}

impl ProjectGraph {
    /// Assemble a graph from decoded parts, validating the root record
    pub fn from_parts(
        name: impl Into<String>,
        archive_version: impl Into<String>,
        object_version: impl Into<String>,
        store: ObjectStore,
        allocator: IdAllocator,
        root: ObjectId,
    ) -> Result<Self, GraphError> {
        match store.get(&root) {
            None => return Err(GraphError::RootMissing { id: root }),
            Some(Object::Project(_)) => {}
            Some(_) => return Err(GraphError::RootNotProject { id: root }),
        }
        Ok(ProjectGraph {
            name: name.into(),
            archive_version: archive_version.into(),
            object_version: object_version.into(),
            store,
            allocator,
            root,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archive_version(&self) -> &str {
        &self.archive_version
    }

    pub fn object_version(&self) -> &str {
        &self.object_version
    }

    pub fn root_id(&self) -> &ObjectId {
        &self.root
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    pub fn allocate_id(&mut self) -> ObjectId {
        self.allocator.allocate()
    }

    /// Insert a new object under a freshly allocated identifier
    pub fn add_object(&mut self, object: Object) -> Result<ObjectId, StoreError> {
        let id = self.allocator.allocate();
        self.store.add(id.clone(), object)?;
        Ok(id)
    }

    /// Equality over the persisted parts, allocator state excluded
    pub fn same_structure(&self, other: &ProjectGraph) -> bool {
        self.name == other.name
            && self.archive_version == other.archive_version
            && self.object_version == other.object_version
            && self.root == other.root
            && self.store == other.store
    }

    pub fn project(&self) -> Result<&Project, GraphError> {
        self.store
            .get(&self.root)
            .ok_or_else(|| GraphError::RootMissing {
                id: self.root.clone(),
            })?
            .as_project()
            .ok_or_else(|| GraphError::RootNotProject {
                id: self.root.clone(),
            })
    }

    pub fn project_mut(&mut self) -> Result<&mut Project, GraphError> {
        let id = self.root.clone();
        self.store
            .get_mut(&id)
            .ok_or_else(|| GraphError::RootMissing { id: id.clone() })?
            .as_project_mut()
            .ok_or(GraphError::RootNotProject { id })
    }

    fn typed<'s, T>(
        &'s self,
        id: &ObjectId,
        expected: &'static str,
        pick: impl Fn(&'s Object) -> Option<&'s T>,
    ) -> Result<&'s T, GraphError> {
        let object = self
            .store
            .get(id)
            .ok_or_else(|| GraphError::ObjectMissing { id: id.clone() })?;
        pick(object).ok_or_else(|| GraphError::WrongKind {
            id: id.clone(),
            expected,
        })
    }

    fn typed_mut<'s, T>(
        &'s mut self,
        id: &ObjectId,
        expected: &'static str,
        pick: impl Fn(&'s mut Object) -> Option<&'s mut T>,
    ) -> Result<&'s mut T, GraphError> {
        let object = self
            .store
            .get_mut(id)
            .ok_or_else(|| GraphError::ObjectMissing { id: id.clone() })?;
        pick(object).ok_or_else(|| GraphError::WrongKind {
            id: id.clone(),
            expected,
        })
    }

    pub fn native_target(&self, id: &ObjectId) -> Result<&NativeTarget, GraphError> {
        self.typed(id, "PBXNativeTarget", Object::as_native_target)
    }

    pub fn native_target_mut(&mut self, id: &ObjectId) -> Result<&mut NativeTarget, GraphError> {
        self.typed_mut(id, "PBXNativeTarget", Object::as_native_target_mut)
    }

    pub fn group(&self, id: &ObjectId) -> Result<&Group, GraphError> {
        self.typed(id, "PBXGroup", Object::as_group)
    }

    pub fn group_mut(&mut self, id: &ObjectId) -> Result<&mut Group, GraphError> {
        self.typed_mut(id, "PBXGroup", Object::as_group_mut)
    }

    pub fn file_reference(&self, id: &ObjectId) -> Result<&FileReference, GraphError> {
        self.typed(id, "PBXFileReference", Object::as_file_reference)
    }

    pub fn build_phase(&self, id: &ObjectId) -> Result<&BuildPhase, GraphError> {
        self.typed(id, "a build phase", Object::as_build_phase)
    }

    pub fn build_phase_mut(&mut self, id: &ObjectId) -> Result<&mut BuildPhase, GraphError> {
        self.typed_mut(id, "a build phase", Object::as_build_phase_mut)
    }

    pub fn configuration_list(&self, id: &ObjectId) -> Result<&ConfigurationList, GraphError> {
        self.typed(id, "XCConfigurationList", Object::as_configuration_list)
    }

    pub fn build_configuration(&self, id: &ObjectId) -> Result<&BuildConfiguration, GraphError> {
        self.typed(id, "XCBuildConfiguration", Object::as_build_configuration)
    }

    pub fn build_configuration_mut(
        &mut self,
        id: &ObjectId,
    ) -> Result<&mut BuildConfiguration, GraphError> {
        self.typed_mut(id, "XCBuildConfiguration", Object::as_build_configuration_mut)
    }

    /// Target names in manifest order
    pub fn target_names(&self) -> Vec<String> {
        let Ok(project) = self.project() else {
            return Vec::new();
        };
        project
            .targets
            .iter()
            .filter_map(|id| Some(self.native_target(id).ok()?.name.clone()))
            .collect()
    }

    pub fn target_id_named(&self, name: &str) -> Option<ObjectId> {
        let project = self.project().ok()?;
        project
            .targets
            .iter()
            .find(|id| {
                self.native_target(id)
                    .map(|target| target.name == name)
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// First phase of the given kind on a target, in phase order
    pub fn phase_of_kind(&self, target_id: &ObjectId, kind: PhaseKind) -> Option<ObjectId> {
        let target = self.native_target(target_id).ok()?;
        target
            .build_phases
            .iter()
            .find(|id| {
                self.build_phase(id)
                    .map(|phase| phase.kind == kind)
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Existing build file binding `file_ref` into `phase_id`, if any
    pub fn build_file_in_phase(&self, phase_id: &ObjectId, file_ref: &ObjectId) -> Option<ObjectId> {
        let phase = self.build_phase(phase_id).ok()?;
        phase
            .files
            .iter()
            .find(|id| {
                self.store
                    .get(id)
                    .and_then(Object::as_build_file)
                    .map(|bf| bf.file_ref.as_ref() == Some(file_ref))
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Group located by its path component
    pub fn group_id_with_path(&self, path: &str) -> Option<ObjectId> {
        self.store
            .groups()
            .find(|(_, group)| group.path.as_deref() == Some(path))
            .map(|(id, _)| id.clone())
    }

    /// File reference located by its exact stored path
    pub fn file_reference_id_with_path(&self, path: &str) -> Option<ObjectId> {
        self.store
            .file_references()
            .find(|(_, reference)| reference.path == path)
            .map(|(id, _)| id.clone())
    }

    /// Detach one occurrence of `child` from a group, true when removed
    pub fn detach_child(&mut self, group_id: &ObjectId, child: &ObjectId) -> Result<bool, GraphError> {
        let group = self.group_mut(group_id)?;
        match group.children.iter().position(|id| id == child) {
            Some(index) => {
                group.children.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Group that lists `child` among its children, if any
    pub fn parent_group_of(&self, child: &ObjectId) -> Option<ObjectId> {
        self.store
            .groups()
            .find(|(_, group)| group.children.contains(child))
            .map(|(id, _)| id.clone())
    }

    /// Remove a file reference plus every build file and group entry
    /// pointing at it
    pub fn remove_file_reference_everywhere(&mut self, ref_id: &ObjectId) {
        let build_file_ids: Vec<ObjectId> = self
            .store
            .build_files()
            .filter(|(_, bf)| bf.file_ref.as_ref() == Some(ref_id))
            .map(|(id, _)| id.clone())
            .collect();
        for build_file_id in &build_file_ids {
            self.scrub_phase_entries(build_file_id);
            self.store.remove(build_file_id);
        }
        self.scrub_group_entries(ref_id);
        self.store.remove(ref_id);
        trace!(reference = %ref_id, build_files = build_file_ids.len(), "removed file reference");
    }

    /// Remove a group and its whole subtree, scrubbing every binding
    pub fn remove_group_cascade(&mut self, group_id: &ObjectId) -> Result<(), GraphError> {
        // Gather the subtree before touching anything
        let mut groups = Vec::new();
        let mut references = Vec::new();
        let mut pending = vec![group_id.clone()];
        while let Some(id) = pending.pop() {
            match self.store.get(&id) {
                Some(Object::Group(group)) => {
                    pending.extend(group.children.iter().cloned());
                    groups.push(id);
                }
                Some(Object::FileReference(_)) => references.push(id),
                Some(_) | None => {}
            }
        }
        if groups.is_empty() {
            return Err(GraphError::ObjectMissing {
                id: group_id.clone(),
            });
        }

        for reference in &references {
            self.remove_file_reference_everywhere(reference);
        }
        for group in &groups {
            self.scrub_group_entries(group);
            self.store.remove(group);
        }
        trace!(
            group = %group_id,
            subtree_groups = groups.len(),
            subtree_references = references.len(),
            "removed group subtree"
        );
        Ok(())
    }

    /// Remove a target and everything only it owns
    pub fn remove_target_cascade(&mut self, target_id: &ObjectId) -> Result<(), GraphError> {
        let target = self.native_target(target_id)?.clone();

        // Phases and their build files
        for phase_id in &target.build_phases {
            if let Ok(phase) = self.build_phase(phase_id) {
                for build_file_id in phase.files.clone() {
                    self.store.remove(&build_file_id);
                }
            }
            self.store.remove(phase_id);
        }

        // Configuration list and its configurations
        if let Some(list_id) = &target.build_configuration_list {
            if let Ok(list) = self.configuration_list(list_id) {
                for configuration_id in list.build_configurations.clone() {
                    self.store.remove(&configuration_id);
                }
            }
            self.store.remove(list_id);
        }

        // Dependency edges owned by the target
        for dependency_id in &target.dependencies {
            self.remove_target_dependency(dependency_id);
        }

        // Package products, dropping package references nothing else uses
        for product_dep_id in &target.package_product_dependencies {
            self.remove_package_product_dependency(product_dep_id);
        }

        // Produced artifact reference
        if let Some(product_ref) = &target.product_reference {
            self.remove_file_reference_everywhere(product_ref);
        }

        self.store.remove(target_id);

        // Inbound links: project target list, other targets' dependency
        // edges, and proxies addressing the removed target
        if let Ok(project) = self.project_mut() {
            project.targets.retain(|id| id != target_id);
        }
        let stale_dependencies: Vec<ObjectId> = self
            .store
            .iter()
            .filter_map(|(id, object)| {
                let dependency = object.as_target_dependency()?;
                let direct = dependency.target.as_ref() == Some(target_id);
                let via_proxy = dependency
                    .target_proxy
                    .as_ref()
                    .and_then(|proxy_id| self.store.get(proxy_id))
                    .and_then(Object::as_container_item_proxy)
                    .map(|proxy| &proxy.remote_global_id == target_id)
                    .unwrap_or(false);
                (direct || via_proxy).then(|| id.clone())
            })
            .collect();
        let all_target_ids: Vec<ObjectId> = self
            .store
            .native_targets()
            .map(|(id, _)| id.clone())
            .collect();
        for dependency_id in &stale_dependencies {
            for owner_id in &all_target_ids {
                if let Some(owner) = self
                    .store
                    .get_mut(owner_id)
                    .and_then(Object::as_native_target_mut)
                {
                    owner.dependencies.retain(|id| id != dependency_id);
                }
            }
            self.remove_target_dependency(dependency_id);
        }

        trace!(target = %target_id, name = %target.name, "removed target");
        Ok(())
    }

    /// Remove a package product dependency plus every binding to it
    ///
    /// Build files linking the product are scrubbed from their phases, the
    /// owning targets drop the dependency, and a package reference no other
    /// product still uses leaves the graph with it.
    pub fn remove_package_product_everywhere(&mut self, product_id: &ObjectId) {
        let build_file_ids: Vec<ObjectId> = self
            .store
            .build_files()
            .filter(|(_, bf)| bf.product_ref.as_ref() == Some(product_id))
            .map(|(id, _)| id.clone())
            .collect();
        for build_file_id in &build_file_ids {
            self.scrub_phase_entries(build_file_id);
            self.store.remove(build_file_id);
        }

        let owner_ids: Vec<ObjectId> = self
            .store
            .native_targets()
            .filter(|(_, target)| target.package_product_dependencies.contains(product_id))
            .map(|(id, _)| id.clone())
            .collect();
        for owner_id in owner_ids {
            if let Some(owner) = self
                .store
                .get_mut(&owner_id)
                .and_then(Object::as_native_target_mut)
            {
                owner
                    .package_product_dependencies
                    .retain(|id| id != product_id);
            }
        }

        self.remove_package_product_dependency(product_id);
        trace!(product = %product_id, build_files = build_file_ids.len(), "removed package product");
    }

    fn remove_target_dependency(&mut self, dependency_id: &ObjectId) {
        if let Some(Object::TargetDependency(dependency)) = self.store.get(dependency_id) {
            if let Some(proxy_id) = dependency.target_proxy.clone() {
                self.store.remove(&proxy_id);
            }
        }
        self.store.remove(dependency_id);
    }

    fn remove_package_product_dependency(&mut self, product_dep_id: &ObjectId) {
        let package_id = self
            .store
            .get(product_dep_id)
            .and_then(Object::as_package_product_dependency)
            .and_then(|dep| dep.package.clone());
        self.store.remove(product_dep_id);

        if let Some(package_id) = package_id {
            let still_used = self
                .store
                .package_product_dependencies()
                .any(|(_, dep)| dep.package.as_ref() == Some(&package_id));
            if !still_used {
                if let Ok(project) = self.project_mut() {
                    project.package_references.retain(|id| id != &package_id);
                }
                self.store.remove(&package_id);
            }
        }
    }

    fn scrub_group_entries(&mut self, child: &ObjectId) {
        let parents: Vec<ObjectId> = self
            .store
            .groups()
            .filter(|(_, group)| group.children.contains(child))
            .map(|(id, _)| id.clone())
            .collect();
        for parent in parents {
            if let Some(group) = self.store.get_mut(&parent).and_then(Object::as_group_mut) {
                group.children.retain(|id| id != child);
            }
        }
    }

    fn scrub_phase_entries(&mut self, build_file: &ObjectId) {
        let phases: Vec<ObjectId> = self
            .store
            .build_phases()
            .filter(|(_, phase)| phase.files.contains(build_file))
            .map(|(id, _)| id.clone())
            .collect();
        for phase_id in phases {
            if let Some(phase) = self
                .store
                .get_mut(&phase_id)
                .and_then(Object::as_build_phase_mut)
            {
                phase.files.retain(|id| id != build_file);
            }
        }
    }

}

#[cfg(test)]
mod tests {
    include!("graph.test.rs");
}
