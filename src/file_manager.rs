//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui path e sui file di input.
//!
//! ## Responsabilità:
//! - Ispezione estensioni e riconoscimento formati supportati
//! - Derivazione del path di output (in-place, cambio formato, `_compressed`)
//! - Lettura dimensioni file
//! - Calcolo percentuale di riduzione
//!
//! ## Formati supportati:
//! - **Raster**: PNG, JPG, JPEG, WebP
//! - **Vettoriale**: SVG
//!
//! ## Derivazione output path:
//! - `keep = true`: stessa directory, `{base}_compressed.{new_ext}`
//! - formato esplicito diverso dall'estensione: stessa directory, `{base}.{new_ext}`
//! - altrimenti: path di input invariato (sovrascrittura in-place)
//!
//! `get_output_path()` accetta qualsiasi stringa come estensione di output:
//! la validazione dei formati avviene prima, nell'orchestratore.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manages path derivation and file inspection
pub struct FileManager;

impl FileManager {
    /// Lower-cased extension after the final dot, empty string if none.
    pub fn get_extension(path: &Path) -> String {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Check if an extension belongs to the supported input set
    pub fn is_supported_format(ext: &str) -> bool {
        matches!(ext, "png" | "jpg" | "jpeg" | "webp" | "svg")
    }

    /// Check if an extension is a raster (pixel-grid) format
    pub fn is_raster_format(ext: &str) -> bool {
        matches!(ext, "png" | "jpg" | "jpeg" | "webp")
    }

    /// Derive the output path for a compressed file.
    ///
    /// `output_ext` is the explicitly requested output extension, if any.
    /// The extension is taken as-is; supportedness is not checked here.
    pub fn get_output_path(input_path: &Path, output_ext: Option<&str>, keep: bool) -> PathBuf {
        let ext = Self::get_extension(input_path);
        let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
        let new_ext = output_ext.unwrap_or(&ext);

        if keep {
            return input_path.with_file_name(format!("{}_compressed.{}", stem, new_ext));
        }

        match output_ext {
            Some(requested) if requested != ext => {
                input_path.with_file_name(format!("{}.{}", stem, requested))
            }
            _ => input_path.to_path_buf(),
        }
    }

    /// Get the size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path).await?;
        Ok(metadata.len())
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
