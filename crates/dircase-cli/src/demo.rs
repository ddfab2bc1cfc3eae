//! Guided walkthrough of directory case sensitivity.
//!
//! Builds `CaseSensitivityTest` under a base directory and shows, step by
//! step, what the flag allows and what it refuses.

use std::fs;
use std::path::Path;

use anyhow::Result;
use console::style;
use dircase_config::log_cli_info;
use dircase_core::{CaseError, CaseSensitivity};
use walkdir::WalkDir;

use crate::state_word;

pub fn run(cs: &CaseSensitivity, base: &Path) -> Result<()> {
    log_cli_info!("Starting demo", base = tracing::field::display(base.display()));

    println!(
        "{}",
        style("Does this version of Windows support directory case-sensitivity?").white()
    );
    let supported = cs.is_supported()?;
    println!("    {}", if supported { "Yes" } else { "No" });
    println!();

    if !supported {
        println!("{}", style("Not supported, ending demo.").yellow());
        return Ok(());
    }

    let dir1 = base.join("CaseSensitivityTest");
    let dir2a = dir1.join("SubdirA");
    let dir2b = dir1.join("SubdirB");
    let dir2c = dir1.join("SubdirC");
    let file1a = dir1.join("file1.txt");
    let file1b = dir1.join("FILE1.txt");
    let file2 = dir1.join("file2.txt");

    write_header("Initial Setup");
    create_directory(&dir1)?;
    if !check(cs, &dir1)? {
        set(cs, &dir1, true)?;
    }
    println!();

    write_header("Create case-sensitive files");
    create_file(&file1a)?;
    create_file(&file1b)?;
    create_file(&file2)?;
    list_files(&dir1);
    println!();

    write_header("Disable case-sensitivity of directory with matching files");
    // Refused: file1.txt and FILE1.txt would collide
    set(cs, &dir1, false)?;
    println!();

    write_header("Retry after clearing files");
    delete_file(&file1b)?;
    set(cs, &dir1, false)?;
    println!();

    create_file(&file1a)?;
    // Lands on file1.txt now that the directory is insensitive
    create_file(&file1b)?;
    list_files(&dir1);
    println!();

    write_header("Test new subdirectory case-sensitivity");
    set(cs, &dir1, true)?;
    create_directory(&dir2a)?;
    check(cs, &dir1)?;
    check(cs, &dir2a)?;
    println!();

    write_header(
        "Directories do not inherit case sensitivity by default:\n\
         Use inherit, create and create-inherit",
    );
    inherit(cs, &dir2a)?;
    create_directory_with(cs, &dir2b, true)?;
    create_directory_inherit(cs, &dir2c)?;
    check(cs, &dir1)?;
    check(cs, &dir2a)?;
    check(cs, &dir2b)?;
    check(cs, &dir2c)?;
    println!();

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_status(label: &str, path: &Path, extra: Option<&str>) {
    match extra {
        Some(extra) => println!(
            "{} {} {}",
            style(format!("{}:", label)).cyan(),
            style(file_name(path)).yellow(),
            style(extra).cyan()
        ),
        None => println!(
            "{} {}",
            style(format!("{}:", label)).cyan(),
            style(file_name(path)).yellow()
        ),
    }
}

fn write_header(message: &str) {
    println!("{}", style(format!("{}:", message)).green());
}

fn write_error(message: &str) {
    println!("{}", style(message).red());
}

/// Remove files in `directory` and in its immediate subdirectories, then
/// the subdirectories themselves.
fn clear_directory(directory: &Path) -> Result<()> {
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(2)
        .contents_first(true)
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    write_status("Directory Cleared", directory, None);
    Ok(())
}

fn list_files(directory: &Path) {
    println!(" + {}", style(file_name(directory)).white());
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        println!(" |-- {}", style(file_name(entry.path())).white());
    }
}

fn create_directory(directory: &Path) -> Result<()> {
    if directory.is_dir() {
        write_status("Directory Exists", directory, None);
        clear_directory(directory)
    } else {
        fs::create_dir_all(directory)?;
        write_status("Directory Created", directory, None);
        Ok(())
    }
}

fn create_directory_with(cs: &CaseSensitivity, directory: &Path, enable: bool) -> Result<()> {
    if directory.is_dir() {
        write_status("Directory Exists", directory, None);
        clear_directory(directory)
    } else {
        cs.create(directory, enable)?;
        write_status("Directory Created", directory, Some(state_word(enable)));
        Ok(())
    }
}

fn create_directory_inherit(cs: &CaseSensitivity, directory: &Path) -> Result<()> {
    if directory.is_dir() {
        write_status("Directory Exists", directory, None);
        clear_directory(directory)
    } else {
        let enabled = cs.create_inherit(directory)?;
        write_status(
            "Directory Inherit Created",
            directory,
            Some(state_word(enabled)),
        );
        Ok(())
    }
}

fn inherit(cs: &CaseSensitivity, directory: &Path) -> Result<()> {
    if directory.is_dir() {
        let enabled = cs.inherit(directory)?;
        write_status("Directory Inherited", directory, Some(state_word(enabled)));
    }
    Ok(())
}

fn create_file(file: &Path) -> Result<()> {
    if file.exists() {
        write_status("File Exists", file, None);
    } else {
        fs::File::create(file)?;
        write_status("File Created", file, None);
    }
    Ok(())
}

fn delete_file(file: &Path) -> Result<()> {
    if file.exists() {
        fs::remove_file(file)?;
        write_status("File Deleted", file, None);
    } else {
        write_status("File Does not Exist", file, None);
    }
    Ok(())
}

fn check(cs: &CaseSensitivity, directory: &Path) -> Result<bool> {
    let enabled = cs.is_case_sensitive(directory)?;
    write_status(
        "Check Case Sensitivity",
        directory,
        Some(state_word(enabled)),
    );
    Ok(enabled)
}

/// Apply a setting, printing a collision refusal instead of failing.
fn set(cs: &CaseSensitivity, directory: &Path, enable: bool) -> Result<()> {
    match cs.set_case_sensitive(directory, enable) {
        Ok(()) => {
            write_status("Set Case Sensitivity", directory, Some(state_word(enable)));
            Ok(())
        }
        Err(e @ CaseError::DirectoryNotEmpty(_)) => {
            write_error(&e.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
