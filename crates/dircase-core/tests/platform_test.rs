//! Tests against the real platform backend.
//!
//! On Windows these need a build with directory case sensitivity and a
//! volume that allows it; they print a note and return early otherwise.
//! Elsewhere they check the "not supported" behaviour.

use std::fs;
use std::path::Path;

use dircase_config::testing::TestEnvironment;
use dircase_core::{CaseError, CaseSensitivity, PlatformInfo};

fn platform(env: &TestEnvironment) -> CaseSensitivity {
    CaseSensitivity::new(PlatformInfo, env.scratch_dir.clone())
}

#[test]
fn test_probe_is_stable_and_creates_scratch_dir() {
    let env = TestEnvironment::new().unwrap();
    let cs = platform(&env);

    let first = cs.is_supported().unwrap();
    assert!(env.scratch_dir.is_dir());
    assert_eq!(cs.is_supported().unwrap(), first);

    // Removing the scratch directory does not change the memoized answer
    fs::remove_dir_all(&env.scratch_dir).unwrap();
    assert_eq!(cs.is_supported().unwrap(), first);
}

#[test]
fn test_empty_path_is_invalid() {
    let env = TestEnvironment::new().unwrap();
    let cs = platform(&env);
    assert!(matches!(
        cs.is_case_sensitive(Path::new("")),
        Err(CaseError::InvalidArgument(_))
    ));
    assert!(matches!(
        cs.set_case_sensitive(Path::new(""), false),
        Err(CaseError::InvalidArgument(_))
    ));
}

#[cfg(not(windows))]
#[test]
fn test_unsupported_platform_behaviour() {
    let env = TestEnvironment::new().unwrap();
    let cs = platform(&env);
    let dir = env.create_dir("CaseSensitivityTest").unwrap();

    assert!(!cs.is_supported().unwrap());
    assert!(!cs.is_case_sensitive(&dir).unwrap());
    // Missing paths are not even opened
    assert!(!cs.is_case_sensitive(&env.path("missing")).unwrap());
    assert!(matches!(
        cs.set_case_sensitive(&dir, true),
        Err(CaseError::NotSupported)
    ));
    assert!(!cs.inherit(&dir).unwrap());

    assert!(matches!(
        cs.create(&env.path("enabled"), true),
        Err(CaseError::NotSupported)
    ));
    assert!(!env.path("enabled").exists());

    cs.create(&env.path("plain/nested"), false).unwrap();
    assert!(env.path("plain/nested").is_dir());

    assert!(!cs.create_inherit(&dir.join("SubdirC")).unwrap());
    assert!(dir.join("SubdirC").is_dir());
}

#[cfg(windows)]
mod windows {
    use super::*;
    use dircase_core::native::NativeInfo;

    /// Enable case sensitivity, or explain why this machine can't.
    fn try_enable<N: NativeInfo>(cs: &CaseSensitivity<N>, dir: &Path) -> bool {
        match cs.is_supported() {
            Ok(true) => {}
            Ok(false) => {
                eprintln!("Skipping: directory case sensitivity is not supported");
                return false;
            }
            Err(e) => {
                eprintln!("Skipping: support probe failed: {}", e);
                return false;
            }
        }
        match cs.set_case_sensitive(dir, true) {
            Ok(()) => true,
            Err(e) => {
                // Volumes other than NTFS, or builds that gate the flag
                // behind optional components, refuse the set.
                eprintln!("Skipping: cannot enable case sensitivity here: {}", e);
                false
            }
        }
    }

    #[test]
    fn test_set_then_query() {
        let env = TestEnvironment::new().unwrap();
        let cs = platform(&env);
        let dir = env.create_dir("roundtrip").unwrap();

        if !try_enable(&cs, &dir) {
            return;
        }
        assert!(cs.is_case_sensitive(&dir).unwrap());
        cs.set_case_sensitive(&dir, false).unwrap();
        assert!(!cs.is_case_sensitive(&dir).unwrap());
    }

    #[test]
    fn test_disable_fails_while_names_collide() {
        let env = TestEnvironment::new().unwrap();
        let cs = platform(&env);
        let dir = env.create_dir("CaseSensitivityTest").unwrap();

        if !try_enable(&cs, &dir) {
            return;
        }
        fs::write(dir.join("file1.txt"), b"").unwrap();
        fs::write(dir.join("FILE1.txt"), b"").unwrap();
        fs::write(dir.join("file2.txt"), b"").unwrap();
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 3);

        let err = cs.set_case_sensitive(&dir, false).unwrap_err();
        assert!(matches!(err, CaseError::DirectoryNotEmpty(ref p) if p == &dir));
        assert!(cs.is_case_sensitive(&dir).unwrap());

        fs::remove_file(dir.join("FILE1.txt")).unwrap();
        cs.set_case_sensitive(&dir, false).unwrap();
        assert!(!cs.is_case_sensitive(&dir).unwrap());
    }

    #[test]
    fn test_missing_directory() {
        let env = TestEnvironment::new().unwrap();
        let cs = platform(&env);
        if !cs.is_supported().unwrap_or(false) {
            eprintln!("Skipping: directory case sensitivity is not supported");
            return;
        }
        let missing = env.path("missing");
        assert!(matches!(
            cs.is_case_sensitive(&missing),
            Err(CaseError::DirectoryNotFound(_))
        ));
        assert!(matches!(
            cs.set_case_sensitive(&missing, true),
            Err(CaseError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_new_directories_do_not_inherit_by_default() {
        let env = TestEnvironment::new().unwrap();
        let cs = platform(&env);
        let parent = env.create_dir("parent").unwrap();
        if !try_enable(&cs, &parent) {
            return;
        }

        let plain = parent.join("SubdirA");
        fs::create_dir(&plain).unwrap();
        assert!(!cs.is_case_sensitive(&plain).unwrap());

        assert!(cs.inherit(&plain).unwrap());
        assert!(cs.is_case_sensitive(&plain).unwrap());

        let created = parent.join("SubdirB");
        cs.create(&created, true).unwrap();
        assert!(cs.is_case_sensitive(&created).unwrap());

        let inherited = parent.join("SubdirC");
        assert!(cs.create_inherit(&inherited).unwrap());
        assert!(cs.is_case_sensitive(&inherited).unwrap());
    }

    #[test]
    fn test_create_inherit_under_insensitive_parent() {
        let env = TestEnvironment::new().unwrap();
        let cs = platform(&env);
        let parent = env.create_dir("insensitive").unwrap();
        if !cs.is_supported().unwrap_or(false) {
            eprintln!("Skipping: directory case sensitivity is not supported");
            return;
        }

        let child = parent.join("child");
        assert!(!cs.create_inherit(&child).unwrap());
        assert!(child.is_dir());
        assert!(!cs.is_case_sensitive(&child).unwrap());
    }
}
