//! Test environment abstraction for isolated testing.
//!
//! Provides `TestEnvironment` to manage:
//! - An isolated probe scratch directory
//! - A work root for directories under test
//!
//! # Usage
//!
//! ```ignore
//! use dircase_config::testing::TestEnvironment;
//!
//! #[test]
//! fn test_something() {
//!     let env = TestEnvironment::new().unwrap();
//!     let dir = env.create_dir("CaseSensitivityTest").unwrap();
//!     // env.scratch_dir and env.work_root are unique to this test
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated test environment with unique paths
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    _temp_dir: TempDir,
    /// Probe scratch directory (not created until the probe runs)
    pub scratch_dir: PathBuf,
    /// Root under which tests create their directories
    pub work_root: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let work_root = root.join(format!("work-{}", test_id));
        std::fs::create_dir_all(&work_root)?;

        Ok(Self {
            scratch_dir: root.join(format!("{}-{}", crate::SCRATCH_DIR_NAME, test_id)),
            _temp_dir: temp_dir,
            work_root,
            test_id,
        })
    }

    /// Resolve a path relative to the work root
    pub fn path(&self, relative_path: impl AsRef<Path>) -> PathBuf {
        self.work_root.join(relative_path)
    }

    /// Create a test file with content
    pub fn create_file(&self, relative_path: &str, content: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.path(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test directory
    pub fn create_dir(&self, relative_path: &str) -> anyhow::Result<PathBuf> {
        let path = self.path(relative_path);
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// A config pointing the probe at this environment's scratch directory
    pub fn config(&self) -> crate::Config {
        let mut cfg = crate::Config::default();
        cfg.probe.scratch_dir = self.scratch_dir.clone();
        cfg
    }
}
