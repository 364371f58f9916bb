//! Atomic translation-file writer.
//!
//! Write to a sibling `.tmp` file, then rename into place, so a crashed
//! or failed run never leaves a partially written translation file.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Write `content` to `path` atomically. Parent directories are created
/// as needed; the temp file is removed if the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = PathBuf::from(format!("{}.quickaitrans.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_content_to_the_target_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("de.json");
        write_atomic(&path, "{\n}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n}\n");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locales").join("sv").join("app.json");
        write_atomic(&path, "{\n}\n").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("de.json");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn tmp_file_is_cleaned_up_after_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("de.json");
        write_atomic(&path, "{\n}\n").unwrap();
        let tmp = PathBuf::from(format!("{}.quickaitrans.tmp", path.display()));
        assert!(!tmp.exists(), ".tmp file must be cleaned up");
    }

    #[test]
    #[cfg(unix)]
    fn failed_write_leaves_original_intact() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let readonly = dir.path().join("readonly");
        fs::create_dir_all(&readonly).unwrap();
        let path = readonly.join("de.json");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly, perms).unwrap();

        let err = write_atomic(&path, "replacement");
        assert!(err.is_err());
        let mut perms = fs::metadata(&readonly).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly, perms).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }
}
