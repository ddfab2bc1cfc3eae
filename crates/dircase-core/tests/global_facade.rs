//! The free functions and the plain `DirectoryCaseExt` methods go through
//! the process-wide instance over the platform backend.

#![cfg(not(windows))]

use std::fs;
use std::path::Path;

use dircase_core::{CaseError, DirectoryCaseExt};

#[test]
fn test_free_functions_report_unsupported() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path();

    assert!(!dircase_core::is_supported().unwrap());
    assert!(!dircase_core::global().is_supported().unwrap());
    assert!(dircase_core::global().scratch_dir().is_dir());

    assert!(!dircase_core::is_case_sensitive(dir).unwrap());
    assert!(matches!(
        dircase_core::set_case_sensitive(dir, true),
        Err(CaseError::NotSupported)
    ));
    assert!(!dircase_core::inherit(dir).unwrap());

    assert!(matches!(
        dircase_core::create(dir.join("enabled"), true),
        Err(CaseError::NotSupported)
    ));
    assert!(!dir.join("enabled").exists());
    dircase_core::create(dir.join("plain/nested"), false).unwrap();
    assert!(dir.join("plain/nested").is_dir());

    assert!(!dircase_core::create_inherit(dir.join("SubdirC")).unwrap());
    assert!(dir.join("SubdirC").is_dir());

    assert!(matches!(
        dircase_core::is_case_sensitive(""),
        Err(CaseError::InvalidArgument(_))
    ));
}

#[test]
fn test_path_methods_use_global_instance() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("CaseSensitivityTest");
    fs::create_dir(&dir).unwrap();

    assert!(!dir.is_case_sensitive().unwrap());
    assert!(!dir.as_path().is_case_sensitive().unwrap());
    assert!(dir.set_case_sensitive(true).unwrap_err().is_not_supported());
    assert!(!dir.inherit_case_sensitivity().unwrap());

    let child = dir.join("SubdirA");
    assert!(!child.create_dir_inherit().unwrap());
    assert!(child.is_dir());

    let enabled = dir.join("SubdirB");
    assert!(enabled
        .create_dir_case_sensitive(true)
        .unwrap_err()
        .is_not_supported());
    assert!(!enabled.exists());
    enabled.create_dir_case_sensitive(false).unwrap();
    assert!(enabled.is_dir());

    assert!(matches!(
        Path::new("").is_case_sensitive(),
        Err(CaseError::InvalidArgument(_))
    ));
}

#[test]
fn test_dir_entry_methods_use_global_instance() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir(temp.path().join("SubdirA")).unwrap();

    let entry = fs::read_dir(temp.path()).unwrap().next().unwrap().unwrap();
    assert!(!entry.is_case_sensitive().unwrap());
    assert!(entry.set_case_sensitive(false).unwrap_err().is_not_supported());
    assert!(!entry.inherit_case_sensitivity().unwrap());
}
