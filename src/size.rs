//! # Size Utilities Module
//!
//! Parsing e formattazione di dimensioni in byte.
//!
//! ## Responsabilità:
//! - `parse_size()`: Converte stringhe tipo "100KB", "1.5MB", "500000" in byte
//! - `format_size()`: Converte byte in formato leggibile per il report
//!
//! ## Unità supportate:
//! - `B` (o nessuna unità): byte
//! - `KB`: ×1024
//! - `MB`: ×1024×1024
//!
//! Le unità sono case-insensitive; qualsiasi altra unità (es. "GB") è un
//! errore `InvalidSize`.

use crate::error::OptimizeError;

/// Parse a human-readable size string into bytes.
///
/// Accepts an optional decimal number followed by an optional unit suffix
/// (`B`, `KB`, `MB`, case-insensitive, optional whitespace before the unit).
/// A missing unit means bytes.
pub fn parse_size(text: &str) -> Result<u64, OptimizeError> {
    let invalid = || OptimizeError::InvalidSize(text.to_string());

    let digits_end = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (number, rest) = text.split_at(digits_end);

    let value: f64 = number.parse().map_err(|_| invalid())?;

    let multiplier = match rest.trim_start().to_ascii_uppercase().as_str() {
        "" | "B" => 1.0,
        "KB" => 1024.0,
        "MB" => 1024.0 * 1024.0,
        _ => return Err(invalid()),
    };

    Ok((value * multiplier) as u64)
}

/// Format a byte count for display.
///
/// Below 1024 bytes: integer + "B". Below 1 MiB: one decimal + "KB".
/// Otherwise: two decimals + "MB".
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
