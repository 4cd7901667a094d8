//! # SVG Processing Module
//!
//! Questo modulo è l'adapter verso l'ottimizzatore vettoriale (`usvg`).
//!
//! ## Responsabilità:
//! - `optimize_svg()`: Legge un SVG, lo minifica e scrive il risultato
//!
//! ## Pipeline di ottimizzazione:
//! 1. **Parse + serialize**: `usvg` normalizza il markup e scarta tutto ciò
//!    che non contribuisce al rendering (commenti, metadata, attributi editor)
//! 2. **Multipass**: il passaggio viene ripetuto finché l'output non è stabile
//!    (con un tetto fisso di passate)
//! 3. **Remove dimensions**: gli attributi espliciti `width`/`height` vengono
//!    rimossi dall'elemento radice, il `viewBox` viene sempre preservato
//!
//! La qualità non si applica qui: l'ottimizzazione vettoriale ha una singola
//! configurazione fissa. A differenza degli adapter raster, la scrittura su
//! disco avviene dentro l'adapter stesso.

use crate::error::OptimizeError;
use std::path::Path;
use tracing::debug;
use usvg::{TreeParsing, TreeWriting};

/// Stability cap for the multipass loop
const MAX_PASSES: usize = 10;

/// Optimize an SVG file and write the result to `output_path`.
///
/// Returns the optimized bytes.
pub async fn optimize_svg(input_path: &Path, output_path: &Path) -> Result<Vec<u8>, OptimizeError> {
    let content = tokio::fs::read_to_string(input_path).await?;
    let optimized = minify(&content)?;

    debug!(
        "SVG optimized: {} -> {} bytes",
        content.len(),
        optimized.len()
    );

    tokio::fs::write(output_path, optimized.as_bytes()).await?;
    Ok(optimized.into_bytes())
}

/// Minify SVG markup: repeated usvg parse/serialize passes until stable,
/// then explicit width/height removal on the root element.
fn minify(content: &str) -> Result<String, OptimizeError> {
    let parse_opt = usvg::Options::default();
    let xml_opt = usvg::XmlOptions {
        writer_opts: xmlwriter::Options {
            use_single_quote: false,
            indent: xmlwriter::Indent::None,
            attributes_indent: xmlwriter::Indent::None,
        },
        ..usvg::XmlOptions::default()
    };

    let mut current = content.to_string();
    for _ in 0..MAX_PASSES {
        let tree = usvg::Tree::from_str(&current, &parse_opt)?;
        let serialized = tree.to_string(&xml_opt);
        if serialized == current {
            break;
        }
        current = serialized;
    }

    Ok(strip_root_dimensions(&current))
}

/// Remove explicit `width`/`height` attributes from the root `<svg>` tag.
///
/// The viewBox attribute is untouched, so the image stays scalable.
fn strip_root_dimensions(svg: &str) -> String {
    let Some(start) = svg.find("<svg") else {
        return svg.to_string();
    };
    let Some(tag_len) = svg[start..].find('>') else {
        return svg.to_string();
    };
    let end = start + tag_len;

    let mut tag = svg[start..=end].to_string();
    for attr in ["width", "height"] {
        tag = remove_attribute(tag, attr);
    }

    format!("{}{}{}", &svg[..start], tag, &svg[end + 1..])
}

/// Remove a ` name="value"` attribute from a single element tag
fn remove_attribute(tag: String, name: &str) -> String {
    let needle = format!(" {}=\"", name);
    let Some(pos) = tag.find(&needle) else {
        return tag;
    };
    let value_start = pos + needle.len();
    match tag[value_start..].find('"') {
        Some(quote) => format!("{}{}", &tag[..pos], &tag[value_start + quote + 1..]),
        None => tag,
    }
}
