//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file JPEG e le utilità sui file.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di file JPEG in una directory
//! - Segue opzionalmente i link simbolici
//! - Utilità per calcoli dimensioni e percentuali
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati supportati:
//! - **Input**: JPG, JPEG (case-insensitive)
//!
//! ## Discovery:
//! La directory viene enumerata una sola volta e il risultato bufferizzato,
//! così il totale usato per le percentuali coincide con i file elaborati.
//! Gli errori durante l'iterazione (sottodirectory illeggibili, loop di link)
//! vengono riportati su stderr e la scansione continua.
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_jpeg_files(Path::new("/photos"), false)?;
//! for file in files {
//!     let size = FileManager::file_size(&file);
//! }
//! ```

use crate::error::ConvertError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Manages file discovery and size helpers
pub struct FileManager;

impl FileManager {
    /// Size of a file in bytes, 0 if it cannot be read
    pub fn file_size(path: &Path) -> u64 {
        fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }

    /// Find all JPEG files below `root`
    pub fn find_jpeg_files(root: &Path, follow_symlinks: bool) -> Result<Vec<PathBuf>, ConvertError> {
        if !root.is_dir() {
            return Err(ConvertError::DirectoryAccess(
                root.to_path_buf(),
                "not a directory".to_string(),
            ));
        }
        fs::read_dir(root).map_err(|e| ConvertError::DirectoryAccess(root.to_path_buf(), e.to_string()))?;

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(follow_symlinks)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Error while scanning {}: {}", root.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && Self::is_jpeg(entry.path()) {
                files.push(entry.into_path());
            } else if entry.path_is_symlink() && !follow_symlinks {
                debug!("Skipping symbolic link {} (use --follow-symlinks)", entry.path().display());
            }
        }

        Ok(files)
    }

    /// Check if a file name ends in `.jpg` or `.jpeg`, ignoring case
    pub fn is_jpeg(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(ext_lower.as_str(), "jpg" | "jpeg")
        } else {
            false
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Percentage of `original_size` saved by `new_size` (negative when it grew)
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
