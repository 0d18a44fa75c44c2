//! # File Converter
//!
//! Pipeline per singolo file:
//! Start -> Decoded -> (Rotated) -> Encoded -> Verified -> (ExifPersisted)
//! -> (OriginalDeleted) -> Done.
//!
//! Gli errori per-file finiscono nel `ConversionResult`; solo gli errori
//! fatali (creazione della directory `.exif`) vengono propagati come `Err`.
//!
//! Due JPEG con lo stesso nome base (`a.jpg`, `a.jpeg`) puntano allo stesso
//! `a.webp`: il secondo viene saltato e il suo originale resta al suo posto.

use crate::config::Config;
use crate::converter::exif_store::ExifStore;
use crate::converter::path_resolver::FileTask;
use crate::error::ConvertError;
use crate::exif_reader::{self, ExifData};
use crate::file_manager::FileManager;
use crate::image_processor::ImageProcessor;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Outcome of one file's pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConversionResult {
    pub webp_written: bool,
    pub exif_written: bool,
    /// Original and converted sizes, recorded only with cleanup enabled
    pub bytes: Option<(u64, u64)>,
    pub original_deleted: bool,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        self.webp_written && self.exif_written
    }
}

/// Runs the per-file pipeline with one shared EXIF store
pub struct FileConverter<'a> {
    config: &'a Config,
    processor: ImageProcessor,
    exif_store: ExifStore,
    /// WebP files written so far in this run
    written: HashSet<PathBuf>,
}

impl<'a> FileConverter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            processor: ImageProcessor::new(config.quality),
            exif_store: ExifStore::new(),
            written: HashSet::new(),
        }
    }

    /// Convert one JPEG.
    ///
    /// # Errors
    /// Only fatal conditions; every per-file failure is reported through the
    /// returned `ConversionResult`.
    pub fn convert(&mut self, task: &FileTask) -> Result<ConversionResult, ConvertError> {
        let mut result = ConversionResult::default();

        if self.written.contains(&task.webp_path) {
            warn!(
                "Skipping {}: {} was already written from another file, keeping the original",
                task.original_path.display(),
                task.webp_path.display()
            );
            return Ok(result);
        }

        let exif = if self.config.preserve_exif || self.config.rotate {
            exif_reader::read_exif(&task.original_path)
        } else {
            None
        };

        let orientation = exif.as_ref().and_then(|data| data.orientation);
        match self.write_webp(task, orientation) {
            Ok(written) => result.webp_written = written,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("{}", e);
                return Ok(result);
            }
        }
        if !result.webp_written {
            return Ok(result);
        }
        self.written.insert(task.webp_path.clone());

        result.exif_written = self.persist_exif(task, exif.as_ref())?;

        if self.config.cleanup_originals {
            let original_size = FileManager::file_size(&task.original_path);
            let converted_size = FileManager::file_size(&task.webp_path);
            result.bytes = Some((original_size, converted_size));
            result.original_deleted = self.delete_original(task, &result);
        }

        Ok(result)
    }

    /// Decode, rotate, encode and verify. `Ok(false)` means the encoder
    /// claimed success but the output did not pass verification.
    fn write_webp(&self, task: &FileTask, orientation: Option<u32>) -> Result<bool, ConvertError> {
        let raster = self.processor.decode_jpeg(&task.original_path)?;

        let degrees = ImageProcessor::rotation_degrees(orientation);
        let raster = if self.config.rotate && degrees != 0 {
            match ImageProcessor::rotate(&raster, degrees) {
                Ok(rotated) => {
                    debug!("Rotated {} by {} degrees", task.filename, degrees);
                    rotated
                }
                Err(e) => {
                    warn!("Rotation failed for {}, keeping original orientation: {}", task.filename, e);
                    raster
                }
            }
        } else {
            raster
        };

        if let Err(e) = self.processor.encode_webp(&raster, &task.webp_path) {
            ImageProcessor::discard_output(&task.webp_path);
            return Err(e);
        }
        drop(raster);

        if !ImageProcessor::verify_output(&task.webp_path) {
            warn!("{}", ConvertError::Verification(task.webp_path.clone()));
            ImageProcessor::discard_output(&task.webp_path);
            return Ok(false);
        }

        Ok(true)
    }

    /// `true` when nothing had to be written or the JSON document was written
    fn persist_exif(&mut self, task: &FileTask, exif: Option<&ExifData>) -> Result<bool, ConvertError> {
        if !self.config.preserve_exif {
            return Ok(true);
        }

        match exif {
            Some(data) => self.exif_store.write(task, data),
            None => {
                debug!("No EXIF data in {}", task.filename);
                Ok(true)
            }
        }
    }

    fn delete_original(&self, task: &FileTask, result: &ConversionResult) -> bool {
        if !result.is_success() {
            warn!(
                "Keeping original {}: conversion did not fully succeed",
                task.original_path.display()
            );
            return false;
        }

        match fs::remove_file(&task.original_path) {
            Ok(()) => {
                debug!("Deleted original {}", task.original_path.display());
                true
            }
            Err(e) => {
                warn!("Failed to delete original {}: {}", task.original_path.display(), e);
                false
            }
        }
    }
}
