//! Flat identifier-keyed object storage
//!
//! The store is a plain map with duplicate-key insertion treated as a hard
//! error. Typed iterators keep callers out of the `Object` match when they
//! only care about one record kind.

use std::collections::HashMap;

use thiserror::Error;

use crate::pbx::id::ObjectId;
use crate::pbx::objects::{
    BuildFile, BuildPhase, FileReference, Group, NativeTarget, Object, PackageProductDependency,
    RemotePackageReference,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate object identifier: {id}")]
    DuplicateIdentifier { id: ObjectId },
}

/// All objects of one manifest graph, keyed by identifier
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectStore {
    objects: HashMap<ObjectId, Object>,
}

impl ObjectStore {
    pub fn new() -> Self {
        ObjectStore::default()
    }

    /// Insert a new object, rejecting identifier collisions
    pub fn add(&mut self, id: ObjectId, object: Object) -> Result<(), StoreError> {
        match self.objects.entry(id) {
            std::collections::hash_map::Entry::Occupied(entry) => Err(StoreError::DuplicateIdentifier {
                id: entry.key().clone(),
            }),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(object);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<Object> {
        self.objects.remove(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &Object)> {
        self.objects.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.keys()
    }

    pub fn native_targets(&self) -> impl Iterator<Item = (&ObjectId, &NativeTarget)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_native_target()?)))
    }

    pub fn groups(&self) -> impl Iterator<Item = (&ObjectId, &Group)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_group()?)))
    }

    pub fn file_references(&self) -> impl Iterator<Item = (&ObjectId, &FileReference)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_file_reference()?)))
    }

    pub fn build_files(&self) -> impl Iterator<Item = (&ObjectId, &BuildFile)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_build_file()?)))
    }

    pub fn build_phases(&self) -> impl Iterator<Item = (&ObjectId, &BuildPhase)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_build_phase()?)))
    }

    pub fn remote_package_references(
        &self,
    ) -> impl Iterator<Item = (&ObjectId, &RemotePackageReference)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_remote_package_reference()?)))
    }

    pub fn package_product_dependencies(
        &self,
    ) -> impl Iterator<Item = (&ObjectId, &PackageProductDependency)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| Some((id, object.as_package_product_dependency()?)))
    }
}

#[cfg(test)]
mod tests {
    include!("store.test.rs");
}
