//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (permessi, scritture fallite, etc.)
//! - `Image`: Errori di decodifica/codifica raster
//! - `Svg`: Errori di parsing SVG
//! - `NotFound`: File di input non trovato
//! - `UnsupportedFormat`: Formato file non supportato
//! - `VectorizationUnsupported`: Conversione raster → SVG richiesta
//! - `Encode`: Fallimento dell'encoder
//! - `SearchExhausted`: Ricerca target-size senza alcun buffer prodotto
//! - `InvalidSize`: Stringa dimensione non parsabile (es. "100GB")
//!
//! Gli errori di validazione CLI sono fatali e gestiti con `anyhow` nel main;
//! tutti gli altri sono per-file: vengono catturati dall'orchestratore e
//! convertiti in `ProcessResult` falliti senza bloccare gli altri file.

/// Custom error types for image compression and conversion
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported format: {0} (supported: png, jpg, jpeg, webp, svg)")]
    UnsupportedFormat(String),

    #[error("Cannot convert a raster image to SVG (vectorization is not supported)")]
    VectorizationUnsupported,

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Target-size search produced no output")]
    SearchExhausted,

    #[error("Invalid size format: {0} (examples: 100KB, 1MB, 500000)")]
    InvalidSize(String),
}
