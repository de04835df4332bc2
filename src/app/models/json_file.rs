use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::app::error::{Result, StartieError};

/// Reads and decodes a JSON document.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StartieError::read_failure(path, e)),
    };

    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| StartieError::read_failure(path, e))
}

/// Writes `value` pretty-printed next to `path` and renames it into place,
/// so the target holds either the previous or the new document.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StartieError::write_failure(path, e))?;

    let json = serde_json::to_string_pretty(value).map_err(|e| StartieError::write_failure(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StartieError::write_failure(path, e))?;
    tmp.write_all(json.as_bytes())
        .map_err(|e| StartieError::write_failure(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StartieError::write_failure(path, e))?;
    tmp.persist(path)
        .map_err(|e| StartieError::write_failure(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let value: Option<Vec<String>> = read_json(&dir.path().join("absent.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn writes_create_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("answer".to_string(), 42);

        write_json_atomic(&path, &doc).unwrap();
        let back: Option<BTreeMap<String, i32>> = read_json(&path).unwrap();
        assert_eq!(back, Some(doc));
    }

    #[test]
    fn parent_that_is_a_file_is_a_write_failure() {
        let dir = tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "file, not a dir").unwrap();

        let err = write_json_atomic(&blocked.join("doc.json"), &vec![4]).unwrap_err();
        assert!(matches!(err, StartieError::PersistenceWrite { .. }));
        assert_eq!(fs::read_to_string(&blocked).unwrap(), "file, not a dir");
    }

    #[test]
    fn rewrite_replaces_whole_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();
        write_json_atomic(&path, &vec![4]).unwrap();

        let back: Option<Vec<i32>> = read_json(&path).unwrap();
        assert_eq!(back, Some(vec![4]));
    }

    #[test]
    fn malformed_document_is_a_read_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "[1, 2,").unwrap();

        let err = read_json::<Vec<i32>>(&path).unwrap_err();
        assert!(matches!(err, StartieError::PersistenceRead { .. }));
    }
}
