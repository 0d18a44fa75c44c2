//! # EXIF Store
//!
//! Scrive i metadata EXIF in `<dir>/.exif/<name>.exif.json` come
//! `{ "exif": { ... } }`.
//!
//! La directory `.exif` viene creata una volta per directory padre: si
//! ricorda solo l'ultima directory vista, quindi la memoizzazione vale per
//! file visitati in modo contiguo. Il fallimento nella creazione della
//! directory è fatale, il fallimento nella scrittura del file no.

use crate::converter::path_resolver::FileTask;
use crate::error::ConvertError;
use crate::exif_reader::ExifData;
use crate::platform::Permissions;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Serialize)]
struct ExifDocument<'a> {
    exif: &'a BTreeMap<String, JsonValue>,
}

/// Persists EXIF JSON documents next to converted files
#[derive(Debug, Default)]
pub struct ExifStore {
    last_dir: Option<PathBuf>,
}

impl ExifStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the `.exif` folder of `task` exists.
    ///
    /// Skips the filesystem when the parent is the same as the previous call.
    pub fn ensure_dir(&mut self, task: &FileTask) -> Result<(), ConvertError> {
        if self.last_dir.as_deref() == Some(task.directory.as_path()) {
            return Ok(());
        }

        let exif_dir = task.exif_dir();
        Permissions::create_private_dir(&exif_dir)
            .map_err(|e| ConvertError::ExifDirectory(exif_dir.clone(), e))?;
        debug!("EXIF directory ready: {}", exif_dir.display());

        self.last_dir = Some(task.directory.clone());
        Ok(())
    }

    /// Write the metadata of `task`.
    ///
    /// Returns `Ok(false)` when the JSON file could not be written and
    /// `Err` only for the fatal directory-creation failure. Failing to
    /// restrict the file's permissions is logged and otherwise ignored.
    pub fn write(&mut self, task: &FileTask, data: &ExifData) -> Result<bool, ConvertError> {
        self.ensure_dir(task)?;

        let document = ExifDocument { exif: &data.fields };
        let written = serde_json::to_string_pretty(&document)
            .map_err(ConvertError::from)
            .and_then(|json| fs::write(&task.exif_json_path, json).map_err(ConvertError::from));

        if let Err(e) = written {
            warn!(
                "Failed to write EXIF data for {}: {}",
                task.original_path.display(),
                e
            );
            return Ok(false);
        }

        if let Err(e) = Permissions::restrict_file(&task.exif_json_path) {
            warn!(
                "Failed to set permissions on {}: {}",
                task.exif_json_path.display(),
                e
            );
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn sample_exif() -> ExifData {
        let mut data = ExifData::default();
        data.fields.insert("Make".to_string(), JsonValue::from("Test"));
        data.fields.insert("Orientation".to_string(), JsonValue::from(1));
        data.orientation = Some(1);
        data
    }

    #[test]
    fn test_write_document() {
        let temp_dir = TempDir::new().unwrap();
        let task = FileTask::new(&temp_dir.path().join("a.jpg")).unwrap();
        let mut store = ExifStore::new();

        assert!(store.write(&task, &sample_exif()).unwrap());

        let content = fs::read_to_string(&task.exif_json_path).unwrap();
        let parsed: JsonValue = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["exif"]["Make"], "Test");
        assert_eq!(parsed["exif"]["Orientation"], 1);
    }

    #[test]
    fn test_ensure_dir_memoizes_last_directory() {
        let temp_dir = TempDir::new().unwrap();
        let task_a = FileTask::new(&temp_dir.path().join("a.jpg")).unwrap();
        let task_b = FileTask::new(&temp_dir.path().join("b.jpg")).unwrap();
        let mut store = ExifStore::new();

        store.ensure_dir(&task_a).unwrap();
        assert!(task_a.exif_dir().is_dir());

        // removing the folder behind the store's back shows the second call
        // never touched the filesystem
        fs::remove_dir(task_a.exif_dir()).unwrap();
        store.ensure_dir(&task_b).unwrap();
        assert!(!task_b.exif_dir().exists());
    }

    #[test]
    fn test_directory_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".exif"), b"blocker").unwrap();
        let task = FileTask::new(&temp_dir.path().join("a.jpg")).unwrap();

        let err = ExifStore::new().write(&task, &sample_exif()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let task = FileTask::new(&temp_dir.path().join("a.jpg")).unwrap();
        // a directory where the JSON file should go makes the write fail
        fs::create_dir_all(&task.exif_json_path).unwrap();

        let written = ExifStore::new().write(&task, &sample_exif()).unwrap();
        assert!(!written);
        assert!(Path::new(&task.exif_json_path).is_dir());
    }
}
