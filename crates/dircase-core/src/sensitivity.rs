//! Query, set, inherit and create directories with a case sensitivity
//! setting.
//!
//! Every operation opens at most one handle per directory it touches and
//! releases it by scope before returning, on success and on error alike.

use std::io;
use std::path::{Path, PathBuf};

use dircase_config::{log_core_debug, log_core_info, log_core_warn};
use once_cell::sync::Lazy;
use tracing::field::display;

use crate::error::{CaseError, Result};
use crate::native::{Access, NativeInfo, PlatformInfo};
use crate::status::{CaseSensitiveFlags, StatusClass};
use crate::support::SupportState;

/// Case sensitivity operations over a [`NativeInfo`] backend.
///
/// Each instance memoizes support detection once. The process-wide
/// instance behind [`global`] is the one the free functions use.
#[derive(Debug)]
pub struct CaseSensitivity<N: NativeInfo = PlatformInfo> {
    native: N,
    scratch_dir: PathBuf,
    support: SupportState,
}

impl CaseSensitivity<PlatformInfo> {
    /// Platform backend probing the configured scratch directory.
    pub fn platform() -> Self {
        let scratch_dir = dircase_config::config().probe.scratch_dir.clone();
        Self::new(PlatformInfo, scratch_dir)
    }
}

impl<N: NativeInfo> CaseSensitivity<N> {
    pub fn new(native: N, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            native,
            scratch_dir: scratch_dir.into(),
            support: SupportState::new(),
        }
    }

    /// Directory opened by [`is_supported`](Self::is_supported)'s probe
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Whether this version of Windows supports directory case sensitivity.
    ///
    /// Computed once; later calls return the memoized answer. The probe
    /// creates the scratch directory if it is missing.
    pub fn is_supported(&self) -> Result<bool> {
        if let Some(supported) = self.support.get() {
            return Ok(supported);
        }

        let scratch = self.scratch_dir.as_path();
        log_core_debug!("Probing case sensitivity support", scratch = display(scratch.display()));

        self.native
            .create_dir_all(scratch)
            .map_err(|source| CaseError::DirectoryUnavailable {
                path: scratch.to_path_buf(),
                source,
            })?;

        let handle = self
            .native
            .open(scratch, Access::ReadMetadata)
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => CaseError::DirectoryNotFound(scratch.to_path_buf()),
                io::ErrorKind::PermissionDenied => CaseError::DirectoryUnavailable {
                    path: scratch.to_path_buf(),
                    source: err,
                },
                _ => CaseError::Io(err),
            })?;
        let (status, _) = self.native.query_case_sensitivity(&handle);

        let supported = match status.classify() {
            StatusClass::Success => self.support.set(true),
            StatusClass::Unsupported => self.support.set(false),
            StatusClass::DirectoryNotEmpty | StatusClass::Unknown(_) => {
                log_core_warn!("Unexpected status while probing support", status = display(status));
                return Err(CaseError::UnexpectedStatus(status));
            }
        };

        log_core_info!("Directory case sensitivity support detected", supported = supported);
        Ok(supported)
    }

    /// Fail with [`CaseError::NotSupported`] unless the feature exists.
    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_supported()? {
            Ok(())
        } else {
            Err(CaseError::NotSupported)
        }
    }

    /// Whether `directory` is case sensitive.
    ///
    /// Always `false` when the OS lacks the feature; no handle is opened.
    pub fn is_case_sensitive(&self, directory: &Path) -> Result<bool> {
        require_path(directory)?;
        if !self.is_supported()? {
            return Ok(false);
        }

        let handle = self.open(directory, Access::ReadMetadata)?;
        let (status, flags) = self.native.query_case_sensitivity(&handle);

        match status.classify() {
            StatusClass::Success => {
                let enabled = flags.is_case_sensitive();
                log_core_debug!(
                    "Queried case sensitivity",
                    path = display(directory.display()),
                    enabled = enabled,
                );
                Ok(enabled)
            }
            // The filesystem holding this directory lacks the feature
            StatusClass::Unsupported => Ok(false),
            StatusClass::DirectoryNotEmpty | StatusClass::Unknown(_) => {
                log_core_warn!(
                    "Unexpected status from query",
                    path = display(directory.display()),
                    status = display(status),
                );
                Err(CaseError::UnexpectedStatus(status))
            }
        }
    }

    /// Enable or disable case sensitivity on `directory`.
    ///
    /// Disabling fails with [`CaseError::DirectoryNotEmpty`] while the
    /// directory holds names that collide case-insensitively.
    pub fn set_case_sensitive(&self, directory: &Path, enable: bool) -> Result<()> {
        require_path(directory)?;
        self.ensure_supported()?;

        let handle = self.open(directory, Access::WriteAttributes)?;
        let status = self
            .native
            .set_case_sensitivity(&handle, CaseSensitiveFlags::for_enabled(enable));

        match status.classify() {
            StatusClass::Success => {
                log_core_info!(
                    "Set case sensitivity",
                    path = display(directory.display()),
                    enabled = enable,
                );
                Ok(())
            }
            StatusClass::DirectoryNotEmpty => {
                Err(CaseError::DirectoryNotEmpty(directory.to_path_buf()))
            }
            StatusClass::Unsupported => Err(CaseError::NotSupported),
            StatusClass::Unknown(_) => {
                log_core_warn!(
                    "Unexpected status from set",
                    path = display(directory.display()),
                    status = display(status),
                );
                Err(CaseError::UnexpectedStatus(status))
            }
        }
    }

    /// Give an existing `directory` its parent's case sensitivity and
    /// return the value applied. `false` without touching anything when
    /// the OS lacks the feature.
    pub fn inherit(&self, directory: &Path) -> Result<bool> {
        require_path(directory)?;
        let parent = parent_of(directory).ok_or_else(|| {
            CaseError::InvalidArgument(format!(
                "Cannot inherit, directory \"{}\" is root!",
                directory.display()
            ))
        })?;

        if !self.is_supported()? {
            return Ok(false);
        }

        let enabled = self.is_case_sensitive(parent)?;
        self.set_case_sensitive(directory, enabled)?;
        Ok(enabled)
    }

    /// Create `directory` (and missing parents) and, when `enable` is set,
    /// make it case sensitive.
    ///
    /// New directories are always case insensitive, so `enable == false`
    /// needs neither a support check nor a set call.
    pub fn create(&self, directory: &Path, enable: bool) -> Result<()> {
        require_path(directory)?;
        require_parent(directory)?;
        if enable {
            self.ensure_supported()?;
        }

        self.native.create_dir_all(directory)?;
        log_core_debug!("Created directory", path = display(directory.display()));

        if enable {
            self.set_case_sensitive(directory, true)?;
        }
        Ok(())
    }

    /// Create `directory` with its parent's case sensitivity and return
    /// the inherited value.
    ///
    /// The parent is read before anything is created.
    pub fn create_inherit(&self, directory: &Path) -> Result<bool> {
        require_path(directory)?;
        let parent = require_parent(directory)?;

        let enabled = self.is_case_sensitive(parent)?;
        self.native.create_dir_all(directory)?;
        log_core_debug!(
            "Created directory",
            path = display(directory.display()),
            inherit = enabled,
        );

        if enabled {
            self.set_case_sensitive(directory, true)?;
        }
        Ok(enabled)
    }

    fn open(&self, directory: &Path, access: Access) -> Result<N::Handle> {
        self.native
            .open(directory, access)
            .map_err(|err| CaseError::from_open(directory, err))
    }
}

fn require_path(directory: &Path) -> Result<()> {
    if directory.as_os_str().is_empty() {
        return Err(CaseError::InvalidArgument("directory path is empty".to_string()));
    }
    Ok(())
}

fn require_parent(directory: &Path) -> Result<&Path> {
    parent_of(directory).ok_or_else(|| {
        CaseError::InvalidArgument(format!(
            "Cannot create root directory \"{}\"!",
            directory.display()
        ))
    })
}

/// Non-empty parent of `directory`, if it has one
fn parent_of(directory: &Path) -> Option<&Path> {
    directory.parent().filter(|p| !p.as_os_str().is_empty())
}

static GLOBAL: Lazy<CaseSensitivity> = Lazy::new(CaseSensitivity::platform);

/// The process-wide instance over the platform backend
pub fn global() -> &'static CaseSensitivity {
    &GLOBAL
}

/// See [`CaseSensitivity::is_supported`]
pub fn is_supported() -> Result<bool> {
    global().is_supported()
}

/// See [`CaseSensitivity::is_case_sensitive`]
pub fn is_case_sensitive(directory: impl AsRef<Path>) -> Result<bool> {
    global().is_case_sensitive(directory.as_ref())
}

/// See [`CaseSensitivity::set_case_sensitive`]
pub fn set_case_sensitive(directory: impl AsRef<Path>, enable: bool) -> Result<()> {
    global().set_case_sensitive(directory.as_ref(), enable)
}

/// See [`CaseSensitivity::inherit`]
pub fn inherit(directory: impl AsRef<Path>) -> Result<bool> {
    global().inherit(directory.as_ref())
}

/// See [`CaseSensitivity::create`]
pub fn create(directory: impl AsRef<Path>, enable: bool) -> Result<()> {
    global().create(directory.as_ref(), enable)
}

/// See [`CaseSensitivity::create_inherit`]
pub fn create_inherit(directory: impl AsRef<Path>) -> Result<bool> {
    global().create_inherit(directory.as_ref())
}
