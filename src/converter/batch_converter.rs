//! # Batch Converter Main Orchestrator
//!
//! Orchestratore principale che delega responsabilità ai moduli specializzati:
//! scansione della directory, pipeline per file, statistiche e report.
//!
//! Le statistiche vengono aggiornate solo qui, una volta per file.

use crate::{
    config::Config,
    converter::{file_converter::FileConverter, path_resolver::FileTask},
    file_manager::FileManager,
    progress::{ConversionStats, ProgressManager},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Drives a whole conversion run
pub struct BatchConverter {
    config: Config,
    stats: ConversionStats,
    elapsed: Option<Duration>,
}

impl BatchConverter {
    /// Validate `config` and prepare a run
    pub fn new(config: Config) -> Result<Self> {
        config
            .validate()
            .with_context(|| format!("Invalid directory: {}", config.root_directory.display()))?;

        Ok(Self {
            config,
            stats: ConversionStats::default(),
            elapsed: None,
        })
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Esegue la conversione
    pub fn run(&mut self) -> Result<&ConversionStats> {
        let start_time = Instant::now();
        let root = self.config.root_directory.clone();

        let files = FileManager::find_jpeg_files(&root, self.config.follow_symlinks)?;
        self.stats = ConversionStats::new(files.len());
        self.log_configuration(&files);

        if files.is_empty() {
            info!("No JPEG files found in {}", root.display());
            self.elapsed = Some(start_time.elapsed());
            return Ok(&self.stats);
        }

        self.process_files(files)?;

        self.elapsed = Some(start_time.elapsed());
        info!("{}", self.stats.format_summary());
        Ok(&self.stats)
    }

    fn log_configuration(&self, files: &[PathBuf]) {
        info!("Starting WebP conversion in: {}", self.config.root_directory.display());
        debug!("Quality: {}", self.config.quality);
        debug!(
            "EXIF: {} | Rotate: {} | Cleanup: {} | Follow symlinks: {}",
            if self.config.preserve_exif { "preserve" } else { "skip" },
            self.config.rotate,
            self.config.cleanup_originals,
            self.config.follow_symlinks
        );
        info!("Found {} JPEG files to process", files.len());
    }

    fn process_files(&mut self, files: Vec<PathBuf>) -> Result<()> {
        let progress = ProgressManager::new(files.len() as u64, !self.config.verbose);
        let mut converter = FileConverter::new(&self.config);

        for path in files {
            let task = match FileTask::new(&path) {
                Ok(task) => task,
                Err(e) => {
                    progress.suspend(|| error!("Skipping {}: {}", path.display(), e));
                    self.stats.record_result(false);
                    continue;
                }
            };

            let result = match converter.convert(&task) {
                Ok(result) => result,
                Err(e) => {
                    progress.finish();
                    return Err(e).context("Aborting conversion");
                }
            };

            if let Some((original, converted)) = result.bytes {
                self.stats.record_bytes(original, converted);
            }
            self.stats.record_result(result.is_success());

            let status = if result.is_success() { "[OK]" } else { "[FAILED]" };
            progress.update(&format!("{} {}", status, task.filename));
            if self.config.verbose {
                info!("{} {}", status, task.original_path.display());
                info!("{}", self.stats.progress_line());
            }
        }

        progress.finish();
        Ok(())
    }
}
