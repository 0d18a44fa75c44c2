//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path derivati di un file da convertire:
//! il `.webp` accanto all'originale e il JSON EXIF in `.exif/`.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the per-directory metadata folder
pub const EXIF_DIR_NAME: &str = ".exif";

/// One JPEG to convert and the paths derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct FileTask {
    pub original_path: PathBuf,
    pub directory: PathBuf,
    pub filename: String,
    pub webp_path: PathBuf,
    pub exif_json_path: PathBuf,
}

impl FileTask {
    pub fn new(original_path: &Path) -> Result<Self> {
        let filename = original_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", original_path.display()))?
            .to_string_lossy()
            .to_string();
        let stem = original_path
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", original_path.display()))?
            .to_string_lossy()
            .to_string();
        let directory = original_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            original_path: original_path.to_path_buf(),
            webp_path: original_path.with_extension("webp"),
            exif_json_path: directory.join(EXIF_DIR_NAME).join(format!("{}.exif.json", stem)),
            directory,
            filename,
        })
    }

    /// The `.exif` folder for this file's directory
    pub fn exif_dir(&self) -> PathBuf {
        self.directory.join(EXIF_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let task = FileTask::new(Path::new("/photos/2023/IMG_001.JPG")).unwrap();
        assert_eq!(task.directory, PathBuf::from("/photos/2023"));
        assert_eq!(task.filename, "IMG_001.JPG");
        assert_eq!(task.webp_path, PathBuf::from("/photos/2023/IMG_001.webp"));
        assert_eq!(
            task.exif_json_path,
            PathBuf::from("/photos/2023/.exif/IMG_001.exif.json")
        );
        assert_eq!(task.exif_dir(), PathBuf::from("/photos/2023/.exif"));
    }

    #[test]
    fn test_dotted_stem() {
        let task = FileTask::new(Path::new("/p/holiday.beach.jpeg")).unwrap();
        assert_eq!(task.webp_path, PathBuf::from("/p/holiday.beach.webp"));
        assert_eq!(task.exif_json_path, PathBuf::from("/p/.exif/holiday.beach.exif.json"));
    }

    #[test]
    fn test_invalid_path() {
        assert!(FileTask::new(Path::new("/")).is_err());
    }
}
