//! Case sensitivity as methods on directory values.
//!
//! ```ignore
//! use dircase_core::DirectoryCaseExt;
//!
//! for entry in std::fs::read_dir(".")? {
//!     let entry = entry?;
//!     if entry.file_type()?.is_dir() {
//!         println!("{}: {}", entry.path().display(), entry.is_case_sensitive()?);
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::fs::DirEntry;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::native::NativeInfo;
use crate::sensitivity::{global, CaseSensitivity};

/// Delegates to [`CaseSensitivity`]; the plain methods use the
/// process-wide instance, the `_with` methods an explicit one.
pub trait DirectoryCaseExt {
    /// Path of the directory this value refers to
    fn directory_path(&self) -> Cow<'_, Path>;

    fn is_case_sensitive(&self) -> Result<bool> {
        self.is_case_sensitive_with(global())
    }

    fn set_case_sensitive(&self, enable: bool) -> Result<()> {
        self.set_case_sensitive_with(global(), enable)
    }

    fn inherit_case_sensitivity(&self) -> Result<bool> {
        self.inherit_case_sensitivity_with(global())
    }

    fn create_dir_case_sensitive(&self, enable: bool) -> Result<()> {
        self.create_dir_case_sensitive_with(global(), enable)
    }

    fn create_dir_inherit(&self) -> Result<bool> {
        self.create_dir_inherit_with(global())
    }

    fn is_case_sensitive_with<N: NativeInfo>(&self, core: &CaseSensitivity<N>) -> Result<bool> {
        core.is_case_sensitive(&self.directory_path())
    }

    fn set_case_sensitive_with<N: NativeInfo>(
        &self,
        core: &CaseSensitivity<N>,
        enable: bool,
    ) -> Result<()> {
        core.set_case_sensitive(&self.directory_path(), enable)
    }

    fn inherit_case_sensitivity_with<N: NativeInfo>(
        &self,
        core: &CaseSensitivity<N>,
    ) -> Result<bool> {
        core.inherit(&self.directory_path())
    }

    fn create_dir_case_sensitive_with<N: NativeInfo>(
        &self,
        core: &CaseSensitivity<N>,
        enable: bool,
    ) -> Result<()> {
        core.create(&self.directory_path(), enable)
    }

    fn create_dir_inherit_with<N: NativeInfo>(&self, core: &CaseSensitivity<N>) -> Result<bool> {
        core.create_inherit(&self.directory_path())
    }
}

impl DirectoryCaseExt for Path {
    fn directory_path(&self) -> Cow<'_, Path> {
        Cow::Borrowed(self)
    }
}

impl DirectoryCaseExt for PathBuf {
    fn directory_path(&self) -> Cow<'_, Path> {
        Cow::Borrowed(self.as_path())
    }
}

impl DirectoryCaseExt for DirEntry {
    fn directory_path(&self) -> Cow<'_, Path> {
        Cow::Owned(self.path())
    }
}
