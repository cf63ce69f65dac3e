//! Whole-document JSON snapshots.
//!
//! Snapshots are UTF-8 JSON with 4-space indentation and non-ASCII text
//! kept as-is. Writes go to a temporary file in the target directory which
//! is then renamed over the destination, so readers never see a partial
//! document.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

const INDENT: &[u8] = b"    ";

/// Serialize a value to pretty JSON bytes with a 4-space indent.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> StorageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Load a whole JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> StorageResult<T> {
    if !path.exists() {
        return Err(StorageError::not_found(path));
    }

    let bytes = fs::read(path)?;
    let value = serde_json::from_slice(&bytes)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Loaded snapshot");
    Ok(value)
}

/// Atomically replace `path` with the JSON rendering of `value`.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let bytes = to_pretty_json(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| StorageError::persist_failed(path, e.error.to_string()))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Saved snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");

        let mut doc = BTreeMap::new();
        doc.insert("scene".to_string(), "Мяч летит в ворота".to_string());
        save_json(&path, &doc).unwrap();

        let loaded: BTreeMap<String, String> = load_json(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_pretty_format() {
        let mut doc = BTreeMap::new();
        doc.insert("1", vec!["shot_1"]);
        let text = String::from_utf8(to_pretty_json(&doc).unwrap()).unwrap();
        assert_eq!(text, "{\n    \"1\": [\n        \"shot_1\"\n    ]\n}");
    }

    #[test]
    fn test_non_ascii_preserved() {
        let text = String::from_utf8(to_pretty_json("сцена").unwrap()).unwrap();
        assert_eq!(text, "\"сцена\"");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json::<BTreeMap<String, String>>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<BTreeMap<String, String>>(&path).unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        save_json(&path, &vec![1, 2, 3]).unwrap();
        save_json(&path, &vec![4]).unwrap();

        let loaded: Vec<i32> = load_json(&path).unwrap();
        assert_eq!(loaded, vec![4]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
