//! # imgc Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//!
//! ## Architettura dei moduli:
//! - `config`: Opzioni di invocazione e formati di output
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `size`: Parsing e formattazione dimensioni ("100KB" ↔ byte)
//! - `file_manager`: Ispezione estensioni e derivazione path di output
//! - `image_processor`: Adapter encoder raster (PNG/JPEG/WebP, render SVG)
//! - `svg_processor`: Adapter ottimizzatore vettoriale (SVG → SVG)
//! - `target_size`: Ricerca binaria della qualità verso una dimensione target
//! - `optimizer`: Orchestratore per-file e runner sequenziale
//! - `progress`: Progress tracking e statistiche
//! - `json_output`: Stream di eventi JSON per uso programmatico
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use imgc::{ImageOptimizer, Options};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let optimizer = ImageOptimizer::new(Options::default())?;
//! let stats = optimizer.run(&[std::path::PathBuf::from("photo.png")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod optimizer;
pub mod progress;
pub mod size;
pub mod svg_processor;
pub mod target_size;

pub use config::{Options, OutputFormat};
pub use error::OptimizeError;
pub use optimizer::{ImageOptimizer, ProcessResult};
