//! Settings file reading and atomic writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{ParamsError, Result};

use super::document::SettingsDocument;

/// Read and parse a settings file.
pub(crate) fn read_document(path: &Path) -> Result<SettingsDocument> {
    let text = fs::read_to_string(path).map_err(|e| ParamsError::io("read", path, e))?;
    SettingsDocument::parse(&text).map_err(|source| ParamsError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `text` to `path` through a temp file and rename.
pub(crate) fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let temp_path = path.with_extension("toml.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ParamsError::io("create directory", parent, e))?;
    }

    let mut file = File::create(&temp_path).map_err(|e| ParamsError::io("create", &temp_path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| ParamsError::io("write", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| ParamsError::io("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ParamsError::io("rename", path, e)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        write_atomic(&path, "[Probe]\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[Probe]\n");
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_read_document_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_document(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ParamsError::Io { operation: "read", .. }));
    }

    #[test]
    fn test_read_document_reports_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[Probe\n").unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, ParamsError::Toml { .. }));
    }
}
