//! # Target-Size Search Module
//!
//! Ricerca binaria sulla qualità per avvicinarsi a una dimensione di output
//! richiesta dall'utente.
//!
//! ## Responsabilità:
//! - `compress_to_target()`: Guida un encoder "qualità → byte" verso il
//!   target con al massimo 10 probe nell'intervallo [1, 100]
//!
//! ## Strategia:
//! - Qualità mediana `floor((low + high) / 2)` a ogni iterazione
//! - L'accumulatore best-seen (buffer + qualità + diff) viene aggiornato a
//!   ogni probe, indipendentemente da come termina il loop: la dimensione
//!   dell'output NON è garantita monotona nella qualità, quindi non ci si
//!   fida dello stato finale della ricerca
//! - Output più grande del target → si cerca in basso; più piccolo → in alto;
//!   match esatto → stop immediato
//!
//! È un'approssimazione greedy: restituisce il migliore tra i probe fatti,
//! non necessariamente la dimensione più vicina raggiungibile.

use crate::error::OptimizeError;
use tracing::debug;

/// Probe budget for the search
const MAX_ITERATIONS: u32 = 10;

/// Best buffer found by the target-size search
#[derive(Debug)]
pub struct SearchResult {
    /// Encoded bytes closest to the target size
    pub data: Vec<u8>,
    /// Quality that produced `data`
    pub quality: u8,
}

/// Binary-search quality in [1, 100] to approximate `target_size` bytes.
///
/// `encode` produces the encoded bytes for a given quality; encoder errors
/// abort the search immediately. `SearchExhausted` is returned only if no
/// probe ever produced a buffer, which cannot happen while the initial range
/// is non-empty.
pub fn compress_to_target<F>(mut encode: F, target_size: u64) -> Result<SearchResult, OptimizeError>
where
    F: FnMut(u8) -> Result<Vec<u8>, OptimizeError>,
{
    let mut low: i32 = 1;
    let mut high: i32 = 100;
    let mut best: Option<SearchResult> = None;
    let mut best_diff = u64::MAX;

    let mut iteration = 0;
    while iteration < MAX_ITERATIONS && low <= high {
        let mid = ((low + high) / 2) as u8;

        let data = encode(mid)?;
        let produced = data.len() as u64;
        let diff = produced.abs_diff(target_size);

        debug!(
            "Probe {}: quality {} -> {} bytes (target {}, diff {})",
            iteration + 1,
            mid,
            produced,
            target_size,
            diff
        );

        if diff < best_diff {
            best_diff = diff;
            best = Some(SearchResult { data, quality: mid });
        }

        if produced > target_size {
            high = mid as i32 - 1;
        } else if produced < target_size {
            low = mid as i32 + 1;
        } else {
            break;
        }

        iteration += 1;
    }

    best.ok_or(OptimizeError::SearchExhausted)
}
