//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di conversione
//! - Normalizza la qualità WebP (clamp a 0-100)
//! - Valida la directory root (esistenza, lettura, scrittura)
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `root_directory`: Directory da convertire (ricorsivamente)
//! - `quality`: Qualità WebP (0-100, default: 90)
//! - `preserve_exif`: Salva EXIF in `.exif/<name>.exif.json` (default: true)
//! - `rotate`: Ruota secondo l'orientamento EXIF (default: false)
//! - `cleanup_originals`: Cancella i JPEG dopo conversione verificata (default: false)
//! - `follow_symlinks`: Segue i link simbolici durante la scansione (default: false)
//! - `verbose`: Progress e report finale (default: false)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     root_directory: PathBuf::from("/photos"),
//!     quality: validate_quality(85.0),
//!     rotate: true,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::ConvertError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default WebP quality
pub const DEFAULT_QUALITY: u8 = 90;

/// Configuration for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the directory tree to convert
    pub root_directory: PathBuf,
    /// WebP quality (0-100)
    pub quality: u8,
    /// Persist EXIF metadata next to the converted file
    pub preserve_exif: bool,
    /// Rotate according to the EXIF orientation
    pub rotate: bool,
    /// Delete originals after a verified conversion
    pub cleanup_originals: bool,
    /// Traverse symbolic links while scanning
    pub follow_symlinks: bool,
    /// Progress lines and final report
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_directory: PathBuf::new(),
            quality: DEFAULT_QUALITY,
            preserve_exif: true,
            rotate: false,
            cleanup_originals: false,
            follow_symlinks: false,
            verbose: false,
        }
    }
}

/// Truncate to an integer and clamp to the 0-100 WebP quality range
pub fn validate_quality(quality: f64) -> u8 {
    if quality.is_nan() {
        return 0;
    }
    quality.trunc().clamp(0.0, 100.0) as u8
}

impl Config {
    /// Validate configuration parameters.
    ///
    /// The root must exist, be a readable directory and accept new files.
    /// Writability is probed by creating (and dropping) a temporary file in it.
    pub fn validate(&self) -> Result<(), ConvertError> {
        let root = &self.root_directory;

        if !root.exists() {
            return Err(ConvertError::DirectoryAccess(root.clone(), "does not exist".to_string()));
        }
        if !root.is_dir() {
            return Err(ConvertError::DirectoryAccess(root.clone(), "not a directory".to_string()));
        }
        fs::read_dir(root).map_err(|e| ConvertError::DirectoryAccess(root.clone(), e.to_string()))?;

        Self::check_writable(root)
    }

    fn check_writable(dir: &Path) -> Result<(), ConvertError> {
        match tempfile::Builder::new().prefix(".jpeg2webp-probe").tempfile_in(dir) {
            Ok(probe) => {
                debug!("Write probe succeeded: {}", probe.path().display());
                Ok(())
            }
            Err(_) => Err(ConvertError::NotWritable(dir.to_path_buf())),
        }
    }

    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.quality = config.quality.min(100);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_quality_clamps() {
        assert_eq!(validate_quality(90.0), 90);
        assert_eq!(validate_quality(150.0), 100);
        assert_eq!(validate_quality(-5.0), 0);
        assert_eq!(validate_quality(85.7), 85);
        assert_eq!(validate_quality(-0.5), 0);
        assert_eq!(validate_quality(f64::NAN), 0);
    }

    #[test]
    fn test_validate_quality_range() {
        for q in -200..=300 {
            let v = validate_quality(q as f64);
            assert!(v <= 100);
            assert_eq!(v as i64, (q as i64).clamp(0, 100));
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.quality, 90);
        assert!(config.preserve_exif);
        assert!(!config.rotate);
        assert!(!config.cleanup_originals);
        assert!(!config.follow_symlinks);
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_validation() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config {
            root_directory: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        // the write probe must not leave anything behind
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);

        config.root_directory = temp_dir.path().join("missing");
        assert!(matches!(config.validate(), Err(ConvertError::DirectoryAccess(..))));

        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        config.root_directory = file;
        assert!(matches!(config.validate(), Err(ConvertError::DirectoryAccess(..))));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            root_directory: PathBuf::from("/photos"),
            quality: 75,
            preserve_exif: false,
            rotate: true,
            cleanup_originals: true,
            follow_symlinks: false,
            verbose: true,
        };

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = Config::from_file(&config_path).unwrap();

        assert_eq!(loaded_config.root_directory, PathBuf::from("/photos"));
        assert_eq!(loaded_config.quality, 75);
        assert!(!loaded_config.preserve_exif);
        assert!(loaded_config.rotate);
        assert!(loaded_config.cleanup_originals);
        assert!(loaded_config.verbose);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.json");
        fs::write(&config_path, r#"{ "rotate": true, "quality": 250 }"#).unwrap();

        let loaded = Config::from_file(&config_path).unwrap();
        assert!(loaded.rotate);
        assert!(loaded.preserve_exif);
        assert_eq!(loaded.quality, 100);
    }

    #[test]
    fn test_config_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");

        let err = Config::from_file(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.json"));
    }
}
