//! # Main Optimizer Orchestrator Module
//!
//! Questo è il modulo principale che orchestra il processo di compressione.
//!
//! ## Responsabilità:
//! - Validazione per-file (esistenza, formato, destinazione)
//! - Selezione del percorso di codifica e delega agli adapter
//! - Scrittura dell'output e rimozione dell'originale quando richiesto
//! - Report dei risultati (righe di stato, progress bar o stream JSON)
//!
//! ## Processing pipeline per file:
//! 1. Risolve il path assoluto (fallisce con `NotFound` se inaccessibile)
//! 2. Verifica che l'estensione sia nel set supportato
//! 3. Risolve il formato di output (opzione esplicita, altrimenti estensione
//!    di input con `jpeg` normalizzato a `jpg`)
//! 4. Rifiuta le conversioni raster → SVG (vettorizzazione non definita)
//! 5. Dispatch: SVG→SVG ottimizzazione vettoriale; target size → ricerca
//!    binaria; SVG→raster rasterizzazione diretta; raster→raster ricodifica
//! 6. Scrive l'output (il percorso SVG→SVG scrive dentro l'adapter)
//! 7. Elimina l'originale se `keep = false` e il path di output è diverso
//! 8. Produce un `ProcessResult`; ogni errore negli step 3-7 diventa un
//!    risultato fallito senza bloccare i file successivi
//!
//! ## Error handling:
//! - Errori per singoli file non interrompono il run
//! - Nessun retry: un file fallito resta fallito
//!
//! I file vengono processati in modo strettamente sequenziale: nessuno stato
//! condiviso mutabile, nessun fan-out parallelo.

use crate::{
    config::{Options, OutputFormat},
    error::OptimizeError,
    file_manager::FileManager,
    image_processor,
    json_output::JsonMessage,
    progress::{OptimizationStats, ProgressManager},
    size::format_size,
    svg_processor, target_size,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of processing a single file. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_size: u64,
    pub output_size: u64,
    /// Resolved output format, or the input extension when resolution failed
    pub format: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ProcessResult {
    fn success(
        input_path: PathBuf,
        output_path: PathBuf,
        input_size: u64,
        output_size: u64,
        format: String,
    ) -> Self {
        Self {
            input_path,
            output_path,
            input_size,
            output_size,
            format,
            success: true,
            error: None,
        }
    }

    fn failure(
        input_path: PathBuf,
        output_path: PathBuf,
        input_size: u64,
        format: String,
        error: String,
    ) -> Self {
        Self {
            input_path,
            output_path,
            input_size,
            output_size: 0,
            format,
            success: false,
            error: Some(error),
        }
    }

    /// Percentage saved relative to the input size
    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.input_size, self.output_size)
    }
}

/// Per-file orchestrator and batch runner
pub struct ImageOptimizer {
    options: Options,
}

impl ImageOptimizer {
    /// Create a new optimizer with validated options
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Process the file list strictly sequentially and report results.
    ///
    /// Per-file failures are recorded in the returned stats; only setup
    /// problems abort the run.
    pub async fn run(&self, files: &[PathBuf]) -> Result<OptimizationStats> {
        info!(
            "Starting compression of {} files (quality: {})",
            files.len(),
            self.options.quality
        );
        if let Some(format) = self.options.format {
            info!("🎯 Output format: {}", format);
        }
        if let Some(target) = self.options.target_size {
            info!("🎯 Target size: {}", format_size(target));
        }
        if self.options.keep {
            info!("📁 Keeping originals, writing *_compressed files");
        }

        let progress = if self.options.json_output {
            JsonMessage::start(files.len(), &self.options).emit();
            None
        } else {
            Some(ProgressManager::new(files.len() as u64))
        };

        let mut stats = OptimizationStats::new();
        for file in files {
            let result = self.process_file(file).await;

            if result.success {
                stats.add_success(result.input_size, result.output_size);
            } else {
                stats.add_failure();
            }

            match progress {
                Some(ref progress) => progress.update(&Self::format_status_line(&result)),
                None => JsonMessage::file_complete(&result).emit(),
            }
        }

        match progress {
            Some(ref progress) => progress.finish(&stats.format_summary()),
            None => JsonMessage::complete(&stats).emit(),
        }

        Ok(stats)
    }

    /// Process a single file. Never returns an error: every failure is
    /// converted into a failed `ProcessResult` so the batch can continue.
    pub async fn process_file(&self, input_path: &Path) -> ProcessResult {
        let input_ext = FileManager::get_extension(input_path);

        let absolute = match tokio::fs::canonicalize(input_path).await {
            Ok(path) => path,
            Err(_) => {
                let error = OptimizeError::NotFound(input_path.display().to_string());
                return ProcessResult::failure(
                    input_path.to_path_buf(),
                    PathBuf::new(),
                    0,
                    input_ext,
                    error.to_string(),
                );
            }
        };

        if !FileManager::is_supported_format(&input_ext) {
            let error = OptimizeError::UnsupportedFormat(input_ext.clone());
            return ProcessResult::failure(absolute, PathBuf::new(), 0, input_ext, error.to_string());
        }

        // Membership above guarantees the mapping resolves
        let Some(output_format) = self
            .options
            .format
            .or_else(|| OutputFormat::from_extension(&input_ext))
        else {
            let error = OptimizeError::UnsupportedFormat(input_ext.clone());
            return ProcessResult::failure(absolute, PathBuf::new(), 0, input_ext, error.to_string());
        };

        if FileManager::is_raster_format(&input_ext) && output_format == OutputFormat::Svg {
            return ProcessResult::failure(
                absolute,
                PathBuf::new(),
                0,
                input_ext,
                OptimizeError::VectorizationUnsupported.to_string(),
            );
        }

        let input_size = match FileManager::file_size(&absolute).await {
            Ok(size) => size,
            Err(e) => {
                return ProcessResult::failure(
                    absolute,
                    PathBuf::new(),
                    0,
                    input_ext,
                    e.to_string(),
                );
            }
        };

        let output_path = FileManager::get_output_path(
            &absolute,
            self.options.format.map(|f| f.extension()),
            self.options.keep,
        );

        debug!(
            "Processing {} -> {} ({})",
            absolute.display(),
            output_path.display(),
            output_format
        );

        let outcome = async {
            let output_bytes = self
                .compress(&absolute, &input_ext, output_format, &output_path)
                .await?;

            if !self.options.keep && output_path != absolute {
                tokio::fs::remove_file(&absolute).await?;
            }

            Ok::<_, OptimizeError>(output_bytes)
        }
        .await;

        match outcome {
            Ok(output_bytes) => ProcessResult::success(
                absolute,
                output_path,
                input_size,
                output_bytes.len() as u64,
                output_format.to_string(),
            ),
            Err(e) => ProcessResult::failure(
                absolute,
                output_path,
                input_size,
                output_format.to_string(),
                e.to_string(),
            ),
        }
    }

    /// Select the encoding path and produce the output bytes on disk
    async fn compress(
        &self,
        absolute: &Path,
        input_ext: &str,
        output_format: OutputFormat,
        output_path: &Path,
    ) -> Result<Vec<u8>, OptimizeError> {
        // SVG → SVG: vector optimization, the adapter writes the file itself
        if input_ext == "svg" && output_format == OutputFormat::Svg {
            return svg_processor::optimize_svg(absolute, output_path).await;
        }

        let data = tokio::fs::read(absolute).await?;
        let is_svg_source = input_ext == "svg";

        let encoded = if let Some(target) = self.options.target_size {
            let result = target_size::compress_to_target(
                |quality| {
                    if is_svg_source {
                        image_processor::rasterize_svg(&data, output_format, quality)
                    } else {
                        image_processor::compress_raster(&data, input_ext, output_format, quality)
                    }
                },
                target,
            )?;
            debug!(
                "Target-size search settled on quality {} ({} bytes for {} target)",
                result.quality,
                result.data.len(),
                target
            );
            result.data
        } else if is_svg_source {
            image_processor::rasterize_svg(&data, output_format, self.options.quality)?
        } else {
            image_processor::compress_raster(&data, input_ext, output_format, self.options.quality)?
        };

        tokio::fs::write(output_path, &encoded).await?;
        Ok(encoded)
    }

    fn format_status_line(result: &ProcessResult) -> String {
        let name = result
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| result.input_path.display().to_string());

        if result.success {
            format!(
                "✅ {}: {} → {} ({:.1}% reduction)",
                name,
                format_size(result.input_size),
                format_size(result.output_size),
                result.reduction_percent()
            )
        } else {
            format!(
                "❌ {}: {}",
                name,
                result.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><rect x="10" y="10" width="80" height="80" fill="#00ff00"/></svg>"##;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let img = image::RgbaImage::from_fn(32, 32, |x, y| {
            image::Rgba([(x * 8) as u8, (y * 8) as u8, 128, 255])
        });
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    fn optimizer(options: Options) -> ImageOptimizer {
        ImageOptimizer::new(options).unwrap()
    }

    #[tokio::test]
    async fn test_png_recompressed_in_place() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "photo.png");

        let opt = optimizer(Options {
            quality: 60,
            ..Default::default()
        });
        let result = opt.process_file(&input).await;

        assert!(result.success, "error: {:?}", result.error);
        assert_eq!(result.input_path, result.output_path);
        assert_eq!(result.format, "png");
        assert!(input.exists(), "in-place output must stay at the input path");
        assert_eq!(
            result.output_size,
            std::fs::metadata(&input).unwrap().len(),
            "reported output size must match the file on disk"
        );
    }

    #[tokio::test]
    async fn test_keep_writes_compressed_sibling() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "logo.png");

        let opt = optimizer(Options {
            keep: true,
            ..Default::default()
        });
        let result = opt.process_file(&input).await;

        assert!(result.success, "error: {:?}", result.error);
        assert!(input.exists(), "original must be preserved with --keep");
        assert!(dir.path().join("logo_compressed.png").exists());
    }

    #[tokio::test]
    async fn test_format_conversion_deletes_original() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "photo.png");

        let opt = optimizer(Options {
            format: Some(OutputFormat::Jpg),
            ..Default::default()
        });
        let result = opt.process_file(&input).await;

        assert!(result.success, "error: {:?}", result.error);
        assert_eq!(result.format, "jpg");
        assert!(dir.path().join("photo.jpg").exists());
        assert!(!input.exists(), "original must be deleted after conversion");
    }

    #[tokio::test]
    async fn test_raster_to_svg_is_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "photo.png");

        let opt = optimizer(Options {
            format: Some(OutputFormat::Svg),
            ..Default::default()
        });
        let result = opt.process_file(&input).await;

        assert!(!result.success);
        assert!(
            result.error.as_deref().unwrap().contains("vectorization"),
            "unexpected error: {:?}",
            result.error
        );
        assert!(!dir.path().join("photo.svg").exists(), "no encode may be attempted");
        assert!(input.exists());
    }

    #[tokio::test]
    async fn test_missing_file_fails_not_found() {
        let opt = optimizer(Options::default());
        let result = opt.process_file(Path::new("/nonexistent/image.png")).await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("not found"));
        assert_eq!(result.input_size, 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("anim.gif");
        std::fs::write(&input, b"GIF89a").unwrap();

        let opt = optimizer(Options::default());
        let result = opt.process_file(&input).await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("Unsupported format"));
    }

    #[tokio::test]
    async fn test_svg_optimized_in_place() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("icon.svg");
        std::fs::write(&input, SAMPLE_SVG).unwrap();

        let opt = optimizer(Options::default());
        let result = opt.process_file(&input).await;

        assert!(result.success, "error: {:?}", result.error);
        assert_eq!(result.format, "svg");

        let optimized = std::fs::read_to_string(&input).unwrap();
        let root = &optimized[..optimized.find('>').unwrap()];
        assert!(root.contains(r#"viewBox="0 0 100 100""#));
        assert!(!root.contains("width="));
        assert!(!root.contains("height="));
    }

    #[tokio::test]
    async fn test_svg_rasterized_to_png() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("icon.svg");
        std::fs::write(&input, SAMPLE_SVG).unwrap();

        let opt = optimizer(Options {
            format: Some(OutputFormat::Png),
            ..Default::default()
        });
        let result = opt.process_file(&input).await;

        assert!(result.success, "error: {:?}", result.error);
        let output = dir.path().join("icon.png");
        assert!(output.exists());
        assert!(!input.exists(), "original svg is replaced by the png");
        assert!(image::open(&output).is_ok());
    }

    #[tokio::test]
    async fn test_target_size_produces_output() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "photo.png");

        let opt = optimizer(Options {
            format: Some(OutputFormat::Jpg),
            target_size: Some(2 * 1024),
            ..Default::default()
        });
        let result = opt.process_file(&input).await;

        assert!(result.success, "error: {:?}", result.error);
        let output = dir.path().join("photo.jpg");
        assert_eq!(
            result.output_size,
            std::fs::metadata(&output).unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_run_isolates_failures() {
        let dir = TempDir::new().unwrap();
        let good = write_png(dir.path(), "good.png");
        let missing = dir.path().join("missing.png");

        let opt = optimizer(Options::default());
        let stats = opt.run(&[good, missing]).await.unwrap();

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_succeeded, 1);
        assert_eq!(stats.files_failed, 1);
    }
}
