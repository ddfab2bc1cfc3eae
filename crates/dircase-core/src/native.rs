//! Native file information protocol.
//!
//! The core only ever does three things with the OS: open a directory for
//! metadata access, query or set the `FileCaseSensitiveInformation` block
//! on that handle, and close the handle. [`NativeInfo`] is that contract;
//! [`PlatformInfo`] is the real implementation.
//!
//! # Implementation
//!
//! - **Windows**: `CreateFileW` with `FILE_FLAG_BACKUP_SEMANTICS` (through
//!   `std::fs::OpenOptions`) and `NtQueryInformationFile` /
//!   `NtSetInformationFile` from `ntdll`
//! - **Other platforms**: the directory is still opened so missing paths
//!   and permission problems surface, but every information request is
//!   answered with `STATUS_NOT_IMPLEMENTED`

use std::fs::File;
use std::io;
use std::path::Path;

use crate::status::{CaseSensitiveFlags, NtStatus};

/// Desired access when opening a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No data access; enough to query file information
    ReadMetadata,
    /// `FILE_WRITE_ATTRIBUTES`, required to set the flag
    WriteAttributes,
}

/// Raw handle-level operations the core is built on.
///
/// Dropping a `Handle` closes it.
pub trait NativeInfo: Send + Sync {
    type Handle;

    /// Open a directory (not a data stream) with the given access.
    fn open(&self, path: &Path, access: Access) -> io::Result<Self::Handle>;

    fn query_case_sensitivity(&self, handle: &Self::Handle) -> (NtStatus, CaseSensitiveFlags);

    fn set_case_sensitivity(&self, handle: &Self::Handle, flags: CaseSensitiveFlags) -> NtStatus;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// The operating system's implementation of [`NativeInfo`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformInfo;

impl NativeInfo for PlatformInfo {
    type Handle = File;

    fn open(&self, path: &Path, access: Access) -> io::Result<File> {
        #[cfg(windows)]
        {
            windows::open_directory(path, access)
        }

        #[cfg(not(windows))]
        {
            let _ = access;
            File::open(path)
        }
    }

    fn query_case_sensitivity(&self, handle: &File) -> (NtStatus, CaseSensitiveFlags) {
        #[cfg(windows)]
        {
            windows::query(handle)
        }

        #[cfg(not(windows))]
        {
            let _ = handle;
            (NtStatus::NOT_IMPLEMENTED, CaseSensitiveFlags::empty())
        }
    }

    fn set_case_sensitivity(&self, handle: &File, flags: CaseSensitiveFlags) -> NtStatus {
        #[cfg(windows)]
        {
            windows::set(handle, flags)
        }

        #[cfg(not(windows))]
        {
            let _ = (handle, flags);
            NtStatus::NOT_IMPLEMENTED
        }
    }
}

#[cfg(windows)]
mod windows {
    use std::ffi::c_void;
    use std::fs::{File, OpenOptions};
    use std::io;
    use std::mem::size_of;
    use std::os::windows::fs::OpenOptionsExt;
    use std::os::windows::io::AsRawHandle;
    use std::path::Path;

    use windows_sys::Win32::Foundation::{HANDLE, NTSTATUS};
    use windows_sys::Win32::Storage::FileSystem::{
        FILE_FLAG_BACKUP_SEMANTICS, FILE_SHARE_READ, FILE_SHARE_WRITE, FILE_WRITE_ATTRIBUTES,
    };

    use super::Access;
    use crate::status::{CaseSensitiveFlags, NtStatus, FILE_CASE_SENSITIVE_INFORMATION_CLASS};

    // The ntdll entry points and the structures below are not exposed by
    // windows-sys under the Win32 namespace we depend on.

    /// `IO_STATUS_BLOCK`: a status/pointer union followed by `Information`
    #[repr(C)]
    struct IoStatusBlock {
        status: usize,
        information: usize,
    }

    /// `FILE_CASE_SENSITIVE_INFORMATION`
    #[repr(C)]
    struct FileCaseSensitiveInformation {
        flags: u32,
    }

    #[link(name = "ntdll")]
    extern "system" {
        fn NtQueryInformationFile(
            file_handle: HANDLE,
            io_status_block: *mut IoStatusBlock,
            file_information: *mut c_void,
            length: u32,
            file_information_class: i32,
        ) -> NTSTATUS;

        fn NtSetInformationFile(
            file_handle: HANDLE,
            io_status_block: *mut IoStatusBlock,
            file_information: *mut c_void,
            length: u32,
            file_information_class: i32,
        ) -> NTSTATUS;
    }

    pub(super) fn open_directory(path: &Path, access: Access) -> io::Result<File> {
        let desired_access = match access {
            Access::ReadMetadata => 0,
            Access::WriteAttributes => FILE_WRITE_ATTRIBUTES,
        };

        OpenOptions::new()
            .access_mode(desired_access)
            .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE)
            .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
            .open(path)
    }

    pub(super) fn query(handle: &File) -> (NtStatus, CaseSensitiveFlags) {
        let mut iosb = IoStatusBlock {
            status: 0,
            information: 0,
        };
        let mut info = FileCaseSensitiveInformation { flags: 0 };

        // SAFETY: the handle is open for the lifetime of `handle`, and both
        // out-parameters are live, correctly sized stack values.
        let status = unsafe {
            NtQueryInformationFile(
                handle.as_raw_handle() as HANDLE,
                &mut iosb,
                &mut info as *mut FileCaseSensitiveInformation as *mut c_void,
                size_of::<FileCaseSensitiveInformation>() as u32,
                FILE_CASE_SENSITIVE_INFORMATION_CLASS,
            )
        };

        (
            NtStatus::from(status),
            CaseSensitiveFlags::from_bits_retain(info.flags),
        )
    }

    pub(super) fn set(handle: &File, flags: CaseSensitiveFlags) -> NtStatus {
        let mut iosb = IoStatusBlock {
            status: 0,
            information: 0,
        };
        let mut info = FileCaseSensitiveInformation {
            flags: flags.bits(),
        };

        // SAFETY: as in `query`; the information block is only read by the
        // kernel for the duration of the call.
        let status = unsafe {
            NtSetInformationFile(
                handle.as_raw_handle() as HANDLE,
                &mut iosb,
                &mut info as *mut FileCaseSensitiveInformation as *mut c_void,
                size_of::<FileCaseSensitiveInformation>() as u32,
                FILE_CASE_SENSITIVE_INFORMATION_CLASS,
            )
        };

        NtStatus::from(status)
    }
}
