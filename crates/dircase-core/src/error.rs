use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::status::NtStatus;

/// Errors that can occur while querying or changing case sensitivity
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Access denied: {}", .0.display())]
    AccessDenied(PathBuf),

    #[error("This version of Windows does not support directory case sensitivity")]
    NotSupported,

    #[error(
        "Cannot set case sensitivity because directory \"{}\" contains files with the same case-insensitive name",
        .0.display()
    )]
    DirectoryNotEmpty(PathBuf),

    #[error("Unknown NTSTATUS: {0}")]
    UnexpectedStatus(NtStatus),

    #[error("Scratch directory {} is unavailable: {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CaseError>;

impl CaseError {
    /// Map a failure to open `path` onto the error taxonomy.
    pub fn from_open(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CaseError::DirectoryNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => CaseError::AccessDenied(path.to_path_buf()),
            _ => CaseError::Io(err),
        }
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, CaseError::NotSupported)
    }

    pub fn is_directory_not_empty(&self) -> bool {
        matches!(self, CaseError::DirectoryNotEmpty(_))
    }
}
