//! Path resolution into file references and build file bindings
//!
//! Turns absolute filesystem paths into source-root-relative manifest
//! paths, reuses existing file references instead of minting duplicates,
//! and binds references into phases through build files exactly once per
//! (reference, phase) pair.

use std::path::{Component, Path};

use thiserror::Error;
use tracing::debug;

use crate::pbx::graph::{GraphError, ProjectGraph};
use crate::pbx::id::ObjectId;
use crate::pbx::objects::{BuildFile, FileReference, Object};
use crate::pbx::store::StoreError;
use crate::primitives::{SourceTree, file_type_for_path};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("path {path} is not under the source root {source_root}")]
    PathNotUnderSourceRoot { path: String, source_root: String },

    #[error("graph lookup failed: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("object storage failed: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

/// Rewrite an absolute path relative to the source root
///
/// Comparison is component-wise, so trailing separators and `.` segments do
/// not defeat the prefix test. The source root itself is not a file path
/// under the root and is rejected.
pub fn relative_to_source_root(path: &str, source_root: &str) -> Result<String, ResolverError> {
    let reject = || ResolverError::PathNotUnderSourceRoot {
        path: path.to_string(),
        source_root: source_root.to_string(),
    };

    let mut remaining = Path::new(path).components().filter(significant);
    for root_component in Path::new(source_root).components().filter(significant) {
        match remaining.next() {
            Some(component) if component == root_component => {}
            _ => return Err(reject()),
        }
    }

    let parts: Vec<&str> = remaining
        .map(|component| component.as_os_str().to_str().unwrap_or(""))
        .collect();
    if parts.is_empty() {
        return Err(reject());
    }
    Ok(parts.join("/"))
}

fn significant(component: &Component<'_>) -> bool {
    !matches!(component, Component::CurDir)
}

/// File reference for `path`, reusing an existing one when the relative
/// path already appears in the graph
pub fn find_or_create_file_reference(
    graph: &mut ProjectGraph,
    path: &str,
    source_root: &str,
) -> Result<(ObjectId, bool), ResolverError> {
    let relative = relative_to_source_root(path, source_root)?;
    if let Some(existing) = graph.file_reference_id_with_path(&relative) {
        return Ok((existing, false));
    }
    let id = create_group_relative_reference(graph, &relative)?;
    debug!(path = %relative, id = %id, "created file reference");
    Ok((id, true))
}

/// Insert a `<group>`-anchored file reference for an already relative path
pub fn create_group_relative_reference(
    graph: &mut ProjectGraph,
    relative_path: &str,
) -> Result<ObjectId, ResolverError> {
    let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let name = if file_name == relative_path {
        None
    } else {
        Some(file_name.to_string())
    };
    let reference = FileReference {
        explicit_file_type: None,
        include_in_index: None,
        last_known_file_type: file_type_for_path(relative_path).map(str::to_string),
        name,
        path: relative_path.to_string(),
        source_tree: SourceTree::Group,
    };
    Ok(graph.add_object(Object::FileReference(reference))?)
}

/// Bind a file reference into a phase, reusing an existing build file
///
/// Returns the build file identifier and whether it was newly created.
pub fn ensure_build_file(
    graph: &mut ProjectGraph,
    phase_id: &ObjectId,
    file_ref: &ObjectId,
) -> Result<(ObjectId, bool), ResolverError> {
    if let Some(existing) = graph.build_file_in_phase(phase_id, file_ref) {
        return Ok((existing, false));
    }
    graph.build_phase(phase_id)?;
    let build_file = graph.add_object(Object::BuildFile(BuildFile::for_file(file_ref.clone())))?;
    graph
        .build_phase_mut(phase_id)?
        .files
        .push(build_file.clone());
    debug!(phase = %phase_id, file = %file_ref, "bound file into phase");
    Ok((build_file, true))
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
