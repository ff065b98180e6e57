//! Hermetic test environment for workflow testing
//!
//! Provides an isolated on-disk sandbox for the integration scenarios that
//! exercise the live filesystem provider, plus one-time tracing setup so
//! `RUST_LOG` works under the test harness.

use std::path::PathBuf;
use std::sync::Once;

use anyhow::Result;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a tracing subscriber honoring `RUST_LOG`, once per process
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Isolated on-disk sandbox for live-filesystem scenarios
pub struct TestEnvironment {
    /// Owns the sandbox, dropped when the test ends
    pub temp_dir: TempDir,
    /// Sandbox root
    pub root_path: PathBuf,
    /// Directory scaffolded projects land in
    pub work_path: PathBuf,
    /// Template registry root local to the sandbox
    pub templates_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        init_tracing();
        let temp_dir = TempDir::new()?;
        let root_path = temp_dir.path().to_path_buf();
        let work_path = root_path.join("work");
        let templates_path = root_path.join("templates");
        std::fs::create_dir_all(&work_path)?;
        std::fs::create_dir_all(&templates_path)?;
        Ok(Self {
            temp_dir,
            root_path,
            work_path,
            templates_path,
        })
    }
}
