//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico
//! (script, wrapper Python/Electron).
//!
//! ## Responsabilità:
//! - Emette messaggi JSON strutturati, uno per riga su stdout
//! - Si appoggia a `ProcessResult` e `OptimizationStats` esistenti
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del run con numero file e opzioni
//! - `file_complete`: Esito di un singolo file
//! - `complete`: Fine del run con statistiche aggregate

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{Options, OutputFormat};
use crate::optimizer::ProcessResult;
use crate::progress::OptimizationStats;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del run di compressione
    #[serde(rename = "start")]
    Start {
        total_files: usize,
        options: JsonOptions,
    },

    /// Esito di un singolo file
    #[serde(rename = "file_complete")]
    FileComplete {
        input_path: PathBuf,
        output_path: PathBuf,
        input_size: u64,
        output_size: u64,
        format: String,
        reduction_percent: f64,
        success: bool,
        error: Option<String>,
    },

    /// Run completato
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_succeeded: usize,
        files_failed: usize,
        total_input_bytes: u64,
        total_output_bytes: u64,
        overall_reduction_percent: f64,
    },
}

/// Opzioni riportate nel messaggio di start
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOptions {
    pub quality: u8,
    pub format: Option<OutputFormat>,
    pub keep: bool,
    pub target_size: Option<u64>,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea il messaggio di inizio run
    pub fn start(total_files: usize, options: &Options) -> Self {
        Self::Start {
            total_files,
            options: JsonOptions::from(options),
        }
    }

    /// Crea il messaggio di esito per un file
    pub fn file_complete(result: &ProcessResult) -> Self {
        Self::FileComplete {
            input_path: result.input_path.clone(),
            output_path: result.output_path.clone(),
            input_size: result.input_size,
            output_size: result.output_size,
            format: result.format.clone(),
            reduction_percent: result.reduction_percent(),
            success: result.success,
            error: result.error.clone(),
        }
    }

    /// Crea il messaggio di fine run
    pub fn complete(stats: &OptimizationStats) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_succeeded: stats.files_succeeded,
            files_failed: stats.files_failed,
            total_input_bytes: stats.total_input_bytes,
            total_output_bytes: stats.total_output_bytes,
            overall_reduction_percent: stats.overall_reduction_percent(),
        }
    }
}

impl From<&Options> for JsonOptions {
    fn from(options: &Options) -> Self {
        Self {
            quality: options.quality,
            format: options.format,
            keep: options.keep,
            target_size: options.target_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_message_serialization() {
        let options = Options {
            quality: 60,
            format: Some(OutputFormat::Webp),
            ..Default::default()
        };
        let json = serde_json::to_string(&JsonMessage::start(3, &options)).unwrap();
        assert!(json.contains(r#""type":"start""#));
        assert!(json.contains(r#""total_files":3"#));
        assert!(json.contains(r#""quality":60"#));
        assert!(json.contains(r#""format":"webp""#));
    }

    #[test]
    fn test_complete_message_serialization() {
        let mut stats = OptimizationStats::new();
        stats.add_success(1000, 500);
        let json = serde_json::to_string(&JsonMessage::complete(&stats)).unwrap();
        assert!(json.contains(r#""type":"complete""#));
        assert!(json.contains(r#""files_succeeded":1"#));
        assert!(json.contains(r#""overall_reduction_percent":50.0"#));
    }
}
