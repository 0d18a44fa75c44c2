//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di conversione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking contatori (processati, riusciti, falliti) e byte
//! - Riga di progresso testuale per la modalità verbose
//! - Report finale tabellare
//!
//! ## Componenti principali:
//! - `ProgressManager`: Gestisce progress bar principale
//! - `ConversionStats`: Traccia statistiche cumulative
//!
//! ## Invarianti:
//! - `processed == succeeded + failed`
//! - `succeeded <= total`
//! - I byte vengono accumulati solo con cleanup attivo
//!
//! ## Visual feedback (verbose):
//! ```text
//! 12/40 (30.0%) - Success: 11, Failed: 1 - Storage saved: 3.42 MB (41.7%)
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages the progress bar shown while converting
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; a hidden one draws nothing
    pub fn new(total_files: u64, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Run `f` with the bar cleared, so lines printed meanwhile stay readable
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Counters and byte totals for one conversion run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConversionStats {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_original: u64,
    pub bytes_converted: u64,
    /// Set once any bytes have been recorded
    pub byte_accounting: bool,
}

impl ConversionStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_result(&mut self, success: bool) {
        self.processed += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn record_bytes(&mut self, original: u64, converted: u64) {
        self.byte_accounting = true;
        self.bytes_original += original;
        self.bytes_converted += converted;
    }

    /// Share of `total` represented by `count`, in percent
    pub fn percent_of_total(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    /// Percentage of the original bytes saved (negative when storage grew)
    pub fn saved_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.bytes_original, self.bytes_converted)
    }

    /// "saved" or "increased" with the absolute delta and its percentage
    fn storage_delta(&self) -> (&'static str, String, f64) {
        let (word, delta) = if self.bytes_converted <= self.bytes_original {
            ("saved", self.bytes_original - self.bytes_converted)
        } else {
            ("increased", self.bytes_converted - self.bytes_original)
        };
        (word, FileManager::format_size(delta), self.saved_percent().abs())
    }

    pub fn progress_line(&self) -> String {
        let mut line = format!(
            "{}/{} ({:.1}%) - Success: {}, Failed: {}",
            self.processed,
            self.total,
            self.percent_of_total(self.processed),
            self.succeeded,
            self.failed
        );

        if self.byte_accounting {
            let (word, size, percent) = self.storage_delta();
            line.push_str(&format!(" - Storage {}: {} ({:.1}%)", word, size, percent));
        }

        line
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Converted: {} files | Success: {} | Failed: {} | Total found: {}",
            self.processed, self.succeeded, self.failed, self.total
        )
    }

    /// Bordered table with counts, percentages and (with cleanup) sizes
    pub fn final_report(&self, elapsed: Option<Duration>) -> String {
        let mut rows: Vec<(String, String)> = vec![
            ("Total files".to_string(), self.total.to_string()),
            (
                "Successful".to_string(),
                format!("{} ({:.1}%)", self.succeeded, self.percent_of_total(self.succeeded)),
            ),
            (
                "Failed".to_string(),
                format!("{} ({:.1}%)", self.failed, self.percent_of_total(self.failed)),
            ),
        ];

        if self.byte_accounting {
            let (word, size, percent) = self.storage_delta();
            rows.push(("Original size".to_string(), FileManager::format_size(self.bytes_original)));
            rows.push(("Converted size".to_string(), FileManager::format_size(self.bytes_converted)));
            rows.push((format!("Storage {}", word), format!("{} ({:.1}%)", size, percent)));
        }

        if let Some(elapsed) = elapsed {
            rows.push(("Duration".to_string(), format!("{:.1}s", elapsed.as_secs_f64())));
        }

        render_table("Conversion Summary", &rows)
    }
}

fn render_table(title: &str, rows: &[(String, String)]) -> String {
    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
    let inner = (key_width + value_width + 3).max(title.chars().count());
    let value_width = inner - key_width - 3;

    let border = format!("+{}+", "-".repeat(inner + 2));
    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(border.clone());
    out.push(format!("| {:^width$} |", title, width = inner));
    out.push(border.clone());
    for (key, value) in rows {
        out.push(format!(
            "| {:<kw$} | {:>vw$} |",
            key,
            value,
            kw = key_width,
            vw = value_width
        ));
    }
    out.push(border);
    out.join("\n")
}
