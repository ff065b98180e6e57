//! Application layer modules
//!
//! Holds the collaborator traits the engine reaches the outside world
//! through, plus their live and mock implementations.

pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod session_mocks;

// Re-export main types for convenience
pub use session::{
    FileSystemProvider, LiveFileSystemProvider, LiveProcessProvider, ProcessOutput,
    ProcessProvider, fetch_last_selected_team_id,
};
#[cfg(any(test, feature = "test-utils"))]
pub use session_mocks::{MockFileSystemProvider, MockProcessProvider};
