//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione di una singola invocazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Options` con tutti i parametri di compressione
//! - Definisce l'enum `OutputFormat` (formati di output supportati)
//! - Fornisce validazione robusta dei parametri di input
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `quality`: Qualità di compressione (1-100, default: 80)
//! - `format`: Formato di output esplicito (default: None = formato di input)
//! - `keep`: Preserva il file originale creando `{base}_compressed.{ext}`
//! - `target_size`: Dimensione obiettivo in byte per la ricerca binaria
//! - `json_output`: Emette eventi JSON su stdout invece del report testuale
//!
//! Le opzioni sono immutabili per invocazione: vengono validate una volta e
//! poi passate per riferimento attraverso tutti gli stadi.
//!
//! ## Esempio:
//! ```rust
//! use imgc::config::{Options, OutputFormat};
//!
//! let options = Options {
//!     quality: 60,
//!     format: Some(OutputFormat::Webp),
//!     ..Default::default()
//! };
//! options.validate().unwrap();
//! ```

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output formats selectable with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpg,
    Webp,
    Svg,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
            OutputFormat::Svg => "svg",
        }
    }

    /// Map a supported input extension to its output format.
    ///
    /// `jpeg` normalizes to `Jpg`. Returns `None` for anything outside the
    /// supported set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpg),
            "webp" => Some(OutputFormat::Webp),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Configuration for a single compression run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Compression quality (1-100)
    pub quality: u8,
    /// Explicit output format (None = keep input format)
    pub format: Option<OutputFormat>,
    /// Keep the original file and write `{base}_compressed.{ext}`
    pub keep: bool,
    /// Target output size in bytes for the binary search
    pub target_size: Option<u64>,
    /// Emit progress and results as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            quality: 80,
            format: None,
            keep: false,
            target_size: None,
            json_output: false,
        }
    }
}

impl Options {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(anyhow::anyhow!("Quality must be between 1 and 100"));
        }

        if let Some(target) = self.target_size {
            if target == 0 {
                return Err(anyhow::anyhow!("Target size must be greater than 0"));
            }
        }

        Ok(())
    }
}
