//! # Image Processing Module
//!
//! Questo modulo gestisce decodifica JPEG, rotazione e codifica WebP in memoria.
//!
//! ## Pipeline:
//! 1. **Decodifica**: `decode_jpeg()` forza il decoder JPEG (un file `.jpg`
//!    che non è un JPEG fallisce qui)
//! 2. **Rotazione**: `rotation_degrees()` mappa l'orientamento EXIF in gradi,
//!    `rotate()` applica il quarto di giro corrispondente
//! 3. **Codifica**: `encode_webp()` codifica lossy con libwebp e scrive il file
//! 4. **Verifica**: `verify_output()` controlla che il file esista e non sia vuoto
//!
//! ## Mappa orientamento -> gradi (antiorario positivo):
//!
//! | Orientation | Gradi |
//! |-------------|-------|
//! | 3           | 180   |
//! | 6           | -90   |
//! | 8           | 90    |
//! | altro       | 0     |
//!
//! ## Nota sulla verifica
//! Il valore di ritorno dell'encoder non basta: solo `verify_output()` decide
//! se la conversione è riuscita.

use crate::error::ConvertError;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Decode, rotate and encode images with a fixed WebP quality
pub struct ImageProcessor {
    quality: u8,
}

impl ImageProcessor {
    /// Creates a processor encoding at `quality`, clamped to 0-100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Decodes `path` as a JPEG into an in-memory raster.
    ///
    /// # Errors
    /// `ConvertError::Decode` when the file cannot be opened, is not a JPEG,
    /// or is truncated.
    pub fn decode_jpeg(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
        let mut reader = ImageReader::open(path)
            .map_err(|e| ConvertError::Decode(path.to_path_buf(), e.to_string()))?;
        reader.set_format(ImageFormat::Jpeg);

        reader
            .decode()
            .map_err(|e| ConvertError::Decode(path.to_path_buf(), e.to_string()))
    }

    /// Maps an EXIF orientation to a counter-clockwise rotation in degrees.
    pub fn rotation_degrees(orientation: Option<u32>) -> i32 {
        match orientation {
            Some(3) => 180,
            Some(6) => -90,
            Some(8) => 90,
            _ => 0,
        }
    }

    /// Rotates `raster` counter-clockwise by `degrees`.
    ///
    /// Only the identity and quarter turns are supported, anything else is a
    /// `ConvertError::Rotation` and the caller keeps the unrotated raster.
    /// The input is left untouched so it can serve as that fallback.
    pub fn rotate(raster: &DynamicImage, degrees: i32) -> Result<DynamicImage, ConvertError> {
        match degrees.rem_euclid(360) {
            0 => Ok(raster.clone()),
            90 => Ok(raster.rotate270()),
            180 => Ok(raster.rotate180()),
            270 => Ok(raster.rotate90()),
            _ => Err(ConvertError::Rotation(degrees)),
        }
    }

    /// Encodes `raster` as lossy WebP and writes it to `dest`.
    ///
    /// `Ok` only means the encoder and the write reported no error. Callers
    /// must still run [`ImageProcessor::verify_output`] before trusting it.
    pub fn encode_webp(&self, raster: &DynamicImage, dest: &Path) -> Result<(), ConvertError> {
        let rgb = raster.to_rgb8();
        let encoder = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height());

        let memory = encoder
            .encode_simple(false, self.quality as f32)
            .map_err(|e| ConvertError::Encode(dest.to_path_buf(), format!("{:?}", e)))?;

        fs::write(dest, &*memory).map_err(|e| ConvertError::Encode(dest.to_path_buf(), e.to_string()))?;
        debug!("Encoded {} ({} bytes, quality {})", dest.display(), memory.len(), self.quality);

        Ok(())
    }

    /// The authoritative success check: `path` exists and is not empty.
    pub fn verify_output(path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
    }

    /// Best-effort removal of a partial or empty output file.
    pub fn discard_output(path: &Path) {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                debug!("Failed to remove partial output {}: {}", path.display(), e);
            }
        }
    }
}
