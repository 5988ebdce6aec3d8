//! Crash-safe replacement of the store file.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PersistenceError, Result};

/// Replaces `path` with `data` via a sibling temp file and a rename, so
/// readers never observe a half-written document.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let write_err = |source: std::io::Error| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(data).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Serializes `value` as pretty JSON and replaces `path` with it.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    replace_file(path, &json)
}

/// Reads a JSON document, or `None` when the file does not exist yet.
pub fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(Some(serde_json::from_slice(&data)?))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        users: Vec<u64>,
    }

    #[test]
    fn test_replace_file_creates_missing_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state/nested/db.json");

        replace_file(&path, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_replace_file_overwrites_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        replace_file(&path, b"first version, longer").unwrap();
        replace_file(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_read_json_optional_missing_file() {
        let dir = tempdir().unwrap();
        let loaded: Option<Doc> = read_json_optional(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_json_optional_reads_written_doc() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        write_json(&path, &Doc { users: vec![1, 2] }).unwrap();

        let loaded: Option<Doc> = read_json_optional(&path).unwrap();
        assert_eq!(loaded, Some(Doc { users: vec![1, 2] }));
    }

    #[test]
    fn test_read_json_optional_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "not json").unwrap();

        let result: Result<Option<Doc>> = read_json_optional(&path);
        assert!(matches!(result, Err(PersistenceError::Json(_))));
    }
}
