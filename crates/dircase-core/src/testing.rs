//! In-memory [`NativeInfo`] for exercising the core without Windows.
//!
//! `FakeInfo` keeps a table of directories with their flag and entry
//! names, counts every handle it hands out and every handle dropped, and
//! lets tests inject statuses and open failures.
//!
//! # Usage
//!
//! ```ignore
//! let fake = FakeInfo::new();
//! fake.add_dir("/work/d", false);
//! let cs = CaseSensitivity::new(fake.clone(), "/scratch");
//! cs.set_case_sensitive(Path::new("/work/d"), true)?;
//! assert_eq!(fake.opens(), fake.closes());
//! ```

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::native::{Access, NativeInfo};
use crate::status::{CaseSensitiveFlags, NtStatus};

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    write_opens: AtomicUsize,
    closes: AtomicUsize,
    queries: AtomicUsize,
    sets: AtomicUsize,
    creates: AtomicUsize,
}

#[derive(Debug, Default)]
struct FakeDir {
    flags: CaseSensitiveFlags,
    entries: Vec<String>,
}

impl FakeDir {
    /// Two entries differing only in case
    fn has_collisions(&self) -> bool {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .any(|name| !seen.insert(name.to_lowercase()))
    }
}

#[derive(Debug)]
struct FakeState {
    /// Status every request gets when the feature is missing
    unsupported: Option<NtStatus>,
    dirs: HashMap<PathBuf, FakeDir>,
    open_errors: HashMap<PathBuf, io::ErrorKind>,
    query_override: Option<NtStatus>,
    set_override: Option<NtStatus>,
    create_error: Option<io::ErrorKind>,
}

/// Shared-state fake; clones observe the same directories and counters.
#[derive(Debug, Clone)]
pub struct FakeInfo {
    state: Arc<Mutex<FakeState>>,
    counters: Arc<Counters>,
}

/// Handle returned by [`FakeInfo::open`]; counts itself closed on drop.
#[derive(Debug)]
pub struct FakeHandle {
    path: PathBuf,
    access: Access,
    counters: Arc<Counters>,
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeInfo {
    /// A system that supports directory case sensitivity
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A system that answers every request with `status`
    pub fn unsupported_with(status: NtStatus) -> Self {
        Self::build(Some(status))
    }

    fn build(unsupported: Option<NtStatus>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                unsupported,
                dirs: HashMap::new(),
                open_errors: HashMap::new(),
                query_override: None,
                set_override: None,
                create_error: None,
            })),
            counters: Arc::new(Counters::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a directory (its parent's entry list gains its name).
    pub fn add_dir(&self, path: impl AsRef<Path>, case_sensitive: bool) {
        let path = path.as_ref();
        let mut state = self.state();
        register(&mut state, path);
        if let Some(dir) = state.dirs.get_mut(path) {
            dir.flags = CaseSensitiveFlags::for_enabled(case_sensitive);
        }
    }

    /// Add a file name to a registered directory.
    ///
    /// The fake does not stop colliding names from being added; it only
    /// refuses to make such a directory insensitive afterwards.
    pub fn add_entry(&self, dir: impl AsRef<Path>, name: &str) {
        if let Some(dir) = self.state().dirs.get_mut(dir.as_ref()) {
            dir.entries.push(name.to_string());
        }
    }

    pub fn remove_entry(&self, dir: impl AsRef<Path>, name: &str) {
        if let Some(dir) = self.state().dirs.get_mut(dir.as_ref()) {
            dir.entries.retain(|entry| entry != name);
        }
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.state().dirs.contains_key(path.as_ref())
    }

    /// Stored flag of a registered directory
    pub fn is_case_sensitive(&self, path: impl AsRef<Path>) -> Option<bool> {
        self.state()
            .dirs
            .get(path.as_ref())
            .map(|dir| dir.flags.is_case_sensitive())
    }

    /// Make every open of `path` fail with `kind`.
    pub fn fail_open(&self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.state()
            .open_errors
            .insert(path.as_ref().to_path_buf(), kind);
    }

    /// Make `create_dir_all` fail with `kind` (`None` to stop).
    pub fn fail_create(&self, kind: Option<io::ErrorKind>) {
        self.state().create_error = kind;
    }

    /// Force the status of every query (`None` to stop).
    pub fn override_query(&self, status: Option<NtStatus>) {
        self.state().query_override = status;
    }

    /// Force the status of every set (`None` to stop).
    pub fn override_set(&self, status: Option<NtStatus>) {
        self.state().set_override = status;
    }

    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Opens that requested `FILE_WRITE_ATTRIBUTES`
    pub fn write_opens(&self) -> usize {
        self.counters.write_opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.counters.queries.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.counters.sets.load(Ordering::SeqCst)
    }

    /// Calls to `create_dir_all`, successful or not
    pub fn creates(&self) -> usize {
        self.counters.creates.load(Ordering::SeqCst)
    }
}

impl Default for FakeInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Register `path` and any missing ancestors as case-insensitive
/// directories, linking each into its parent's entries.
fn register(state: &mut FakeState, path: &Path) {
    if path.as_os_str().is_empty() || state.dirs.contains_key(path) {
        return;
    }
    if let Some(parent) = path.parent() {
        register(state, parent);
        if let (Some(dir), Some(name)) = (state.dirs.get_mut(parent), path.file_name()) {
            dir.entries.push(name.to_string_lossy().into_owned());
        }
    }
    state.dirs.insert(path.to_path_buf(), FakeDir::default());
}

impl NativeInfo for FakeInfo {
    type Handle = FakeHandle;

    fn open(&self, path: &Path, access: Access) -> io::Result<FakeHandle> {
        let state = self.state();
        if let Some(kind) = state.open_errors.get(path) {
            return Err(io::Error::from(*kind));
        }
        if !state.dirs.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if access == Access::WriteAttributes {
            self.counters.write_opens.fetch_add(1, Ordering::SeqCst);
        }
        Ok(FakeHandle {
            path: path.to_path_buf(),
            access,
            counters: Arc::clone(&self.counters),
        })
    }

    fn query_case_sensitivity(&self, handle: &FakeHandle) -> (NtStatus, CaseSensitiveFlags) {
        self.counters.queries.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if let Some(status) = state.query_override.or(state.unsupported) {
            return (status, CaseSensitiveFlags::empty());
        }
        match state.dirs.get(&handle.path) {
            Some(dir) => (NtStatus::SUCCESS, dir.flags),
            // Deleted while the handle was open
            None => (NtStatus(0xC000_0056), CaseSensitiveFlags::empty()),
        }
    }

    fn set_case_sensitivity(&self, handle: &FakeHandle, flags: CaseSensitiveFlags) -> NtStatus {
        self.counters.sets.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        if let Some(status) = state.set_override.or(state.unsupported) {
            return status;
        }
        if handle.access != Access::WriteAttributes {
            return NtStatus::ACCESS_DENIED;
        }
        let Some(dir) = state.dirs.get_mut(&handle.path) else {
            return NtStatus(0xC000_0056);
        };
        if !flags.is_case_sensitive() && dir.has_collisions() {
            return NtStatus::DIRECTORY_NOT_EMPTY;
        }
        dir.flags = flags;
        NtStatus::SUCCESS
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.counters.creates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        if let Some(kind) = state.create_error {
            return Err(io::Error::from(kind));
        }
        register(&mut state, path);
        Ok(())
    }
}
