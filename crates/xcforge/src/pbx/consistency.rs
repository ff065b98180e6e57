//! Whole-graph validation run before every persisted mutation
//!
//! Builds the ownership relation as a directed graph and rejects dangling
//! identifiers, duplicate bindings, shared ownership, and ownership cycles.
//! Objects nothing owns are tolerated with a warning so manifests written
//! by other tools still load, the engine just never creates one itself.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;
use tracing::warn;

use crate::pbx::graph::{GraphError, ProjectGraph};
use crate::pbx::id::ObjectId;
use crate::pbx::objects::Object;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("invalid root record: {source}")]
    RootInvalid { source: GraphError },

    #[error("graph holds {count} PBXProject records, expected exactly one")]
    MultipleProjects { count: usize },

    #[error("object {from} references {to}, which is not in the graph")]
    DanglingReference { from: ObjectId, to: ObjectId },

    #[error("group {group} lists child {child} more than once")]
    DuplicateChild { group: ObjectId, child: ObjectId },

    #[error("phase {phase} binds {binding} more than once")]
    DuplicateBuildFile { phase: ObjectId, binding: ObjectId },

    #[error("object {object} is owned by more than one container")]
    MultipleOwners { object: ObjectId },

    #[error("ownership cycle through {start}")]
    OwnershipCycle { start: ObjectId },

    #[error("build file {build_file} binds neither a file reference nor a package product")]
    EmptyBuildFile { build_file: ObjectId },

    #[error("build file {build_file} binds both a file reference and a package product")]
    AmbiguousBuildFile { build_file: ObjectId },
}

/// Validate the whole graph, returning the first violation found
pub fn check(graph: &ProjectGraph) -> Result<(), ConsistencyError> {
    graph
        .project()
        .map_err(|source| ConsistencyError::RootInvalid { source })?;

    let project_count = graph
        .store()
        .iter()
        .filter(|(_, object)| matches!(object, Object::Project(_)))
        .count();
    if project_count != 1 {
        return Err(ConsistencyError::MultipleProjects {
            count: project_count,
        });
    }

    // Store iteration order is arbitrary; sorting keeps the reported
    // violation stable for a graph broken in more than one place.
    let mut entries: Vec<(&ObjectId, &Object)> = graph.store().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    // Build-file shape is checked in its own pass so a malformed binding is
    // always reported as such, not as a phase-level duplicate.
    for (id, object) in &entries {
        if let Object::BuildFile(build_file) = object {
            match (&build_file.file_ref, &build_file.product_ref) {
                (None, None) => {
                    return Err(ConsistencyError::EmptyBuildFile {
                        build_file: (*id).clone(),
                    });
                }
                (Some(_), Some(_)) => {
                    return Err(ConsistencyError::AmbiguousBuildFile {
                        build_file: (*id).clone(),
                    });
                }
                _ => {}
            }
        }
    }

    let mut ownership: Vec<(ObjectId, ObjectId)> = Vec::new();
    let mut references: Vec<(ObjectId, ObjectId)> = Vec::new();

    for (id, object) in entries {
        let own = |targets: &[ObjectId], edges: &mut Vec<(ObjectId, ObjectId)>| {
            for to in targets {
                edges.push((id.clone(), to.clone()));
            }
        };
        match object {
            Object::Project(project) => {
                own(
                    std::slice::from_ref(&project.build_configuration_list),
                    &mut ownership,
                );
                own(std::slice::from_ref(&project.main_group), &mut ownership);
                own(&project.targets, &mut ownership);
                own(&project.package_references, &mut ownership);
                if let Some(products) = &project.product_ref_group {
                    references.push((id.clone(), products.clone()));
                }
            }
            Object::NativeTarget(target) => {
                if let Some(list) = &target.build_configuration_list {
                    own(std::slice::from_ref(list), &mut ownership);
                }
                own(&target.build_phases, &mut ownership);
                own(&target.build_rules, &mut ownership);
                own(&target.dependencies, &mut ownership);
                own(&target.package_product_dependencies, &mut ownership);
                if let Some(product) = &target.product_reference {
                    references.push((id.clone(), product.clone()));
                }
            }
            Object::Group(group) => {
                own(&group.children, &mut ownership);
                if let Some(dup) = first_duplicate(&group.children) {
                    return Err(ConsistencyError::DuplicateChild {
                        group: id.clone(),
                        child: dup,
                    });
                }
            }
            Object::BuildPhase(phase) => {
                own(&phase.files, &mut ownership);
                if let Some(dup) = first_duplicate(&phase.files) {
                    return Err(ConsistencyError::DuplicateBuildFile {
                        phase: id.clone(),
                        binding: dup,
                    });
                }
                let mut bound = HashSet::new();
                for build_file_id in &phase.files {
                    let Some(build_file) = graph
                        .store()
                        .get(build_file_id)
                        .and_then(Object::as_build_file)
                    else {
                        continue;
                    };
                    for target in [&build_file.file_ref, &build_file.product_ref] {
                        if let Some(bound_id) = target {
                            if !bound.insert(bound_id.clone()) {
                                return Err(ConsistencyError::DuplicateBuildFile {
                                    phase: id.clone(),
                                    binding: bound_id.clone(),
                                });
                            }
                        }
                    }
                }
            }
            Object::BuildFile(build_file) => {
                if let Some(file_ref) = &build_file.file_ref {
                    references.push((id.clone(), file_ref.clone()));
                }
                if let Some(product_ref) = &build_file.product_ref {
                    references.push((id.clone(), product_ref.clone()));
                }
            }
            Object::ConfigurationList(list) => {
                own(&list.build_configurations, &mut ownership);
            }
            Object::TargetDependency(dependency) => {
                if let Some(proxy) = &dependency.target_proxy {
                    own(std::slice::from_ref(proxy), &mut ownership);
                }
                if let Some(target) = &dependency.target {
                    references.push((id.clone(), target.clone()));
                }
            }
            Object::ContainerItemProxy(proxy) => {
                references.push((id.clone(), proxy.container_portal.clone()));
                references.push((id.clone(), proxy.remote_global_id.clone()));
            }
            Object::PackageProductDependency(dependency) => {
                if let Some(package) = &dependency.package {
                    references.push((id.clone(), package.clone()));
                }
            }
            Object::BuildConfiguration(_) | Object::FileReference(_)
            | Object::RemotePackageReference(_) => {}
        }
    }

    for (from, to) in &references {
        if !graph.store().contains(to) {
            return Err(ConsistencyError::DanglingReference {
                from: from.clone(),
                to: to.clone(),
            });
        }
    }

    let mut dag: DiGraph<ObjectId, ()> = DiGraph::new();
    let mut node_map: HashMap<ObjectId, NodeIndex> = HashMap::new();
    let mut ids: Vec<&ObjectId> = graph.store().ids().collect();
    ids.sort();
    for id in ids {
        node_map.insert(id.clone(), dag.add_node(id.clone()));
    }
    for (from, to) in &ownership {
        let Some(to_index) = node_map.get(to) else {
            return Err(ConsistencyError::DanglingReference {
                from: from.clone(),
                to: to.clone(),
            });
        };
        let from_index = node_map[from];
        dag.add_edge(from_index, *to_index, ());
    }

    for index in dag.node_indices() {
        let owners = dag
            .neighbors_directed(index, petgraph::Direction::Incoming)
            .count();
        let id = &dag[index];
        if id == graph.root_id() {
            if owners > 0 {
                return Err(ConsistencyError::MultipleOwners { object: id.clone() });
            }
        } else if owners > 1 {
            return Err(ConsistencyError::MultipleOwners { object: id.clone() });
        } else if owners == 0 {
            warn!(object = %id, "object is not owned by any container");
        }
    }

    if let Err(cycle) = toposort(&dag, None) {
        return Err(ConsistencyError::OwnershipCycle {
            start: dag[cycle.node_id()].clone(),
        });
    }

    Ok(())
}

fn first_duplicate(ids: &[ObjectId]) -> Option<ObjectId> {
    let mut seen = HashSet::new();
    ids.iter().find(|id| !seen.insert(*id)).map(|id| (*id).clone())
}

#[cfg(test)]
mod tests {
    include!("consistency.test.rs");
}
