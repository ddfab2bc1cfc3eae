//! # dircase-core
//!
//! Per-directory case sensitivity for Windows 10 (April 2018 update and
//! later).
//!
//! Windows can mark individual NTFS directories case sensitive, the same
//! flag `fsutil.exe file setCaseSensitiveInfo` toggles. This crate reads
//! and writes that flag through `NtQueryInformationFile` /
//! `NtSetInformationFile` and builds inherit/create helpers on top.
//!
//! ```ignore
//! use dircase_core::{create_inherit, is_supported, set_case_sensitive};
//!
//! if is_supported()? {
//!     set_case_sensitive("C:\\src\\linux", true)?;
//!     // New directories start insensitive; copy the parent's setting
//!     create_inherit("C:\\src\\linux\\drivers")?;
//! }
//! ```
//!
//! On an OS without the feature every query answers `false` and every
//! request to enable it fails with [`CaseError::NotSupported`].

pub mod error;
pub mod ext;
pub mod native;
pub mod sensitivity;
pub mod status;
pub mod support;
pub mod testing;

pub use error::{CaseError, Result};
pub use ext::DirectoryCaseExt;
pub use native::{Access, NativeInfo, PlatformInfo};
pub use sensitivity::{
    create, create_inherit, global, inherit, is_case_sensitive, is_supported, set_case_sensitive,
    CaseSensitivity,
};
pub use status::{CaseSensitiveFlags, NtStatus, StatusClass};
