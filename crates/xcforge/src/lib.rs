//! # xcforge Library
//!
//! Xcode `project.pbxproj` manifest engine.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Closed manifest vocabulary shared by every layer
//! - [`pbx`] - Object graph, wire codec, consistency checks, and the
//!   loaded-project mutation API
//! - [`application`] - Collaborator traits reaching the filesystem and
//!   host processes, with live and mock implementations
//!
//! ## Quick Start
//!
//! ```no_run
//! use xcforge::{LiveFileSystemProvider, XcodeProject};
//!
//! let fs = LiveFileSystemProvider;
//! let mut project = XcodeProject::load(&fs, std::path::Path::new("/projects/Demo"))?;
//! project.add_file("Demo", "/projects/Demo/Sources/Feature.swift", "/projects/Demo")?;
//! # Ok::<(), xcforge::ProjectError>(())
//! ```

pub mod application;
pub mod pbx;
pub mod primitives;

// Re-export commonly used types for convenience
pub use application::{
    FileSystemProvider, LiveFileSystemProvider, LiveProcessProvider, ProcessOutput,
    ProcessProvider, fetch_last_selected_team_id,
};
#[cfg(any(test, feature = "test-utils"))]
pub use application::{MockFileSystemProvider, MockProcessProvider};
pub use pbx::codec::{CodecError, MANIFEST_HEADER, decode, encode};
pub use pbx::consistency::ConsistencyError;
pub use pbx::graph::{GraphError, ProjectGraph};
pub use pbx::id::ObjectId;
pub use pbx::objects::Object;
pub use pbx::project::{ProjectError, XcodeProject, apply_host_signing_team};
pub use pbx::scaffold::{
    NewProjectSpec, ProjectKind, ScaffoldError, TemplateManifest, TemplateRegistry,
    create_new_project,
};
pub use primitives::{
    BuildSettings, PhaseKind, ProductType, SettingValue, SourceTree, VocabularyError,
};
