//! Object-graph engine for `project.pbxproj` manifests
//!
//! Layered bottom-up: `plist` lexes and parses the nested-record text,
//! `codec` maps records to and from the typed object model in `objects`,
//! `store` and `id` hold the graph with collision-free identifier
//! allocation, `graph` adds structural queries and cascade removal,
//! `resolver` turns filesystem paths into file references and build file
//! bindings, `consistency` validates the whole graph before any write, and
//! `project` exposes the loaded-session mutation API. `scaffold` stamps new
//! project trees out of on-disk templates.

pub mod codec;
pub mod consistency;
pub mod graph;
pub mod id;
pub mod objects;
pub mod plist;
pub mod project;
pub mod resolver;
pub mod scaffold;
pub mod store;
