//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` enum per categorizzare tutti gli errori possibili
//! - Distingue errori fatali (abortiscono il run) da errori per-file
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `DirectoryAccess`: Directory root non apribile (fatale)
//! - `NotWritable`: Directory root non scrivibile (fatale)
//! - `ExifDirectory`: Impossibile creare la directory `.exif` (fatale)
//! - `Decode` / `Rotation` / `Encode` / `Verification`: Errori per-file
//! - `Io` / `Json`: Conversioni automatiche da errori standard
//!
//! ## Esempio:
//! ```rust,ignore
//! if !root.is_dir() {
//!     return Err(ConvertError::DirectoryAccess(root.to_path_buf(), "not a directory".into()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for JPEG to WebP conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Cannot open directory {0}: {1}")]
    DirectoryAccess(PathBuf, String),

    #[error("Directory is not writable: {0}")]
    NotWritable(PathBuf),

    #[error("Failed to create EXIF directory {0}: {1}")]
    ExifDirectory(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode {0}: {1}")]
    Decode(PathBuf, String),

    #[error("Unsupported rotation angle: {0} degrees")]
    Rotation(i32),

    #[error("Failed to encode {0}: {1}")]
    Encode(PathBuf, String),

    #[error("Output verification failed for {0}")]
    Verification(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Errors that must abort the whole run instead of failing a single file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DirectoryAccess(..) | Self::NotWritable(_) | Self::ExifDirectory(..)
        )
    }
}
