//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di compressione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Righe di stato persistenti per ogni file processato
//! - Tracking statistiche cumulative (successi, errori, byte risparmiati)
//! - Riepilogo finale con riduzione aggregata
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_succeeded**: File compressi con successo
//! - **files_failed**: File falliti (errore per-file)
//! - **total_input_bytes** / **total_output_bytes**: Solo file riusciti
//!
//! ## Visual feedback:
//! ```text
//! ✅ photo.jpg: 1.20MB → 412.5KB (66.4% reduction)
//! [====================>-------------------] 3/6 (50%)
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::size::format_size;

/// Manages progress reporting for the file list
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Print a persistent per-file status line and advance the bar
    pub fn update(&self, line: &str) {
        self.bar.println(line);
        self.bar.inc(1);
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for compression results
#[derive(Debug, Default)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub files_succeeded: usize,
    pub files_failed: usize,
    /// Input bytes of successful files only
    pub total_input_bytes: u64,
    /// Output bytes of successful files only
    pub total_output_bytes: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self, input_size: u64, output_size: u64) {
        self.files_processed += 1;
        self.files_succeeded += 1;
        self.total_input_bytes += input_size;
        self.total_output_bytes += output_size;
    }

    pub fn add_failure(&mut self) {
        self.files_processed += 1;
        self.files_failed += 1;
    }

    /// Aggregate reduction across successful files
    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_input_bytes > 0 {
            ((self.total_input_bytes as f64 - self.total_output_bytes as f64)
                / self.total_input_bytes as f64)
                * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        let mut summary = format!(
            "Processed: {} files | Succeeded: {} | Failed: {}",
            self.files_processed, self.files_succeeded, self.files_failed
        );

        if self.files_succeeded > 0 {
            summary.push_str(&format!(
                " | Total: {} → {} ({:.1}% reduction)",
                format_size(self.total_input_bytes),
                format_size(self.total_output_bytes),
                self.overall_reduction_percent()
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulation() {
        let mut stats = OptimizationStats::new();
        stats.add_success(1000, 400);
        stats.add_success(3000, 600);
        stats.add_failure();

        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.files_succeeded, 2);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.total_input_bytes, 4000);
        assert_eq!(stats.total_output_bytes, 1000);
        assert_eq!(stats.overall_reduction_percent(), 75.0);
    }

    #[test]
    fn test_stats_empty_reduction() {
        let stats = OptimizationStats::new();
        assert_eq!(stats.overall_reduction_percent(), 0.0);
    }

    #[test]
    fn test_format_summary_skips_totals_without_successes() {
        let mut stats = OptimizationStats::new();
        stats.add_failure();
        let summary = stats.format_summary();
        assert!(summary.contains("Failed: 1"));
        assert!(!summary.contains("Total:"));
    }
}
