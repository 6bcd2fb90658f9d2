//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::Path;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Recursively copy a directory tree, skipping `.git` directories.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), FilesystemError> {
    let copy_error = |e: std::io::Error| FilesystemError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        error: e.to_string(),
    };

    if src.is_file() {
        std::fs::copy(src, dst).map_err(copy_error)?;
        return Ok(());
    }

    std::fs::create_dir_all(dst).map_err(copy_error)?;
    for entry in std::fs::read_dir(src).map_err(copy_error)? {
        let entry = entry.map_err(copy_error)?;
        if entry.file_name() == ".git" {
            continue;
        }

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).map_err(copy_error)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_dir_skips_git_internals() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");

        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::create_dir_all(src.join(".git/objects")).unwrap();
        std::fs::write(src.join("file.txt"), "data").unwrap();
        std::fs::write(src.join("nested/inner.txt"), "inner").unwrap();
        std::fs::write(src.join(".git/HEAD"), "ref").unwrap();

        copy_dir(&src, &dst).unwrap();

        assert!(dst.join("file.txt").exists());
        assert!(dst.join("nested/inner.txt").exists());
        assert!(!dst.join(".git").exists());
    }

    #[test]
    fn test_write_file_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.txt");

        write_file(&path, "hello").unwrap();
        assert_eq!(read_file(&path).unwrap(), "hello");
    }
}
