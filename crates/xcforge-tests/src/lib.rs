pub mod fixtures;
pub mod test_env;

// Re-export key testing utilities
pub use fixtures::{DEMO_DIR, demo_manifest_text, demo_project_fs, signing_command_line};
pub use test_env::{TestEnvironment, init_tracing};
