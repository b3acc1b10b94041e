//! Checks that must pass before any analysis starts.

use snapsort::error::PreflightError;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Absolute, symlink-resolved input directory
pub fn resolve_input(path: &Path) -> Result<PathBuf, PreflightError> {
    match path.canonicalize() {
        Ok(resolved) if resolved.is_dir() => Ok(resolved),
        _ => Err(PreflightError::InputMissing {
            path: absolute(path),
        }),
    }
}

pub fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// The output base must be writable (or creatable); moving also needs the
/// input directory to be writable.
pub fn check_writable(
    output_base: &Path,
    input_dir: &Path,
    keep_originals: bool,
) -> Result<(), PreflightError> {
    if !writable_for_create_or_write(output_base) {
        return Err(PreflightError::OutputNotWritable {
            path: output_base.to_path_buf(),
        });
    }

    if !keep_originals && !can_write_into(input_dir) {
        return Err(PreflightError::InputNotWritable {
            path: input_dir.to_path_buf(),
        });
    }

    Ok(())
}

/// Probe the path itself, or its nearest existing ancestor
fn writable_for_create_or_write(path: &Path) -> bool {
    let mut dir = path;
    while !dir.exists() {
        match dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => dir = parent,
            _ => return false,
        }
    }
    can_write_into(dir)
}

fn can_write_into(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let probe = dir.join(format!(".snapsort-probe-{}", std::process::id()));
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_input_is_rejected() {
        let temp = TempDir::new().unwrap();
        let result = resolve_input(&temp.path().join("missing"));
        assert!(matches!(result, Err(PreflightError::InputMissing { .. })));
    }

    #[test]
    fn file_as_input_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("photo.jpg");
        fs::write(&file, b"x").unwrap();
        assert!(resolve_input(&file).is_err());
    }

    #[test]
    fn writable_directories_pass() {
        let temp = TempDir::new().unwrap();
        assert!(check_writable(temp.path(), temp.path(), false).is_ok());
    }

    #[test]
    fn output_that_does_not_exist_yet_passes_under_writable_parent() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("new/nested/out");
        assert!(check_writable(&output, temp.path(), true).is_ok());
        assert!(!output.exists());
    }

    #[test]
    fn probe_leaves_no_file_behind() {
        let temp = TempDir::new().unwrap();
        assert!(can_write_into(temp.path()));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn output_path_that_is_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("taken");
        fs::write(&file, b"x").unwrap();
        let result = check_writable(&file, temp.path(), true);
        assert!(matches!(result, Err(PreflightError::OutputNotWritable { .. })));
    }
}
