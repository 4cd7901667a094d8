//! # imgc - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Validazione degli input dell'utente
//! - Creazione delle opzioni e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (file, quality, format, target-size, etc.)
//! 2. Configura il logging su stderr (WARN, o DEBUG con --verbose)
//! 3. Valida le opzioni (range qualità, target size parsabile)
//! 4. Avvia l'`ImageOptimizer` sulla lista di file
//! 5. Esce con 1 se un qualsiasi file è fallito, 0 altrimenti
//!
//! ## Esempio di utilizzo:
//! ```bash
//! imgc photo.png                     # compressione di default (quality 80)
//! imgc *.png -q 60                   # quality 60
//! imgc photo.jpg -f webp             # conversione a WebP
//! imgc logo.png -k                   # preserva l'originale
//! imgc banner.jpg -t 100KB           # compressione verso 100KB
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use imgc::{size, ImageOptimizer, Options, OutputFormat};

#[derive(Parser)]
#[command(name = "imgc")]
#[command(about = "Compress and convert images (PNG, JPG, WebP, SVG)")]
struct Args {
    /// Image files to process
    files: Vec<PathBuf>,

    /// Compression quality (1-100)
    #[arg(short, long, default_value = "80")]
    quality: u8,

    /// Output format (default: keep the input format)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Keep the original file and write {base}_compressed.{ext}
    #[arg(short, long)]
    keep: bool,

    /// Replace the original file in place (default)
    #[arg(short, long, conflicts_with = "keep")]
    replace: bool,

    /// Target output size (e.g. 200KB, 1MB, 500000)
    #[arg(short, long)]
    target_size: Option<String>,

    /// Output progress and results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr so status lines and JSON own stdout
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.files.is_empty() {
        Args::command().print_help()?;
        return Ok(());
    }

    let target_size = match args.target_size {
        Some(ref text) => Some(size::parse_size(text)?),
        None => None,
    };

    // --replace is the default; clap rejects combining it with --keep
    let keep = args.keep && !args.replace;

    let options = Options {
        quality: args.quality,
        format: args.format,
        keep,
        target_size,
        json_output: args.json,
    };

    let optimizer = ImageOptimizer::new(options)?;
    let stats = optimizer.run(&args.files).await?;

    if stats.files_failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
