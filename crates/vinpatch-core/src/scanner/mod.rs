//! Binary scanning module for finding VIN candidates in ECU dumps.
//!
//! ## Algorithm Overview
//!
//! 1. **Structural pass**: read 17 bytes at each offset known to hold a VIN in
//!    common firmware layouts ([`STRUCTURAL_OFFSETS`])
//! 2. **Sweep**: slide a 17-byte window across the whole image
//! 3. Keep every window whose bytes are VIN characters and whose text passes
//!    [`is_plausible_vin`](crate::vin::is_plausible_vin)
//! 4. Deduplicate by `(value, offset)`: the same VIN at two offsets is two
//!    locations, and both must be rewritten later
//!
//! Structural hits come first, in list order, followed by sweep hits in
//! ascending offset order.
//!
//! ## Extensibility
//!
//! The [`ScanStrategy`] trait allows custom scanning algorithms:
//!
//! ```no_run
//! use vinpatch_core::scanner::{ScanReport, ScanStrategy};
//!
//! struct HeaderOnly;
//!
//! impl ScanStrategy for HeaderOnly {
//!     fn scan(&self, data: &[u8]) -> ScanReport {
//!         // Custom scanning logic
//!         ScanReport::default()
//!     }
//! }
//! ```

mod offsets;
mod report;

use crate::error::{Error, Result};
use crate::vin::{is_vin_char, Vin, VIN_LEN};
use std::collections::HashSet;
use tracing::{debug, trace};

pub use offsets::STRUCTURAL_OFFSETS;
pub use report::{ScanReport, VinCandidate};

/// Configuration for the scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Offsets checked before the sweep, in order
    pub structural_offsets: Vec<usize>,
    /// Run the full-image sweep after the structural pass
    pub sweep: bool,
    /// Maximum number of candidates to report (0 = unlimited)
    pub max_results: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            structural_offsets: STRUCTURAL_OFFSETS.to_vec(),
            sweep: true,
            max_results: 0,
        }
    }
}

impl ScannerConfig {
    /// Creates a new scanner config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the structural offset list
    pub fn structural_offsets(mut self, offsets: impl Into<Vec<usize>>) -> Self {
        self.structural_offsets = offsets.into();
        self
    }

    /// Enables or disables the full-image sweep
    pub fn sweep(mut self, sweep: bool) -> Self {
        self.sweep = sweep;
        self
    }

    /// Sets the maximum number of results to return
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

/// Trait for implementing custom scanning strategies
///
/// Scanning is pure: the same bytes always produce the same report, and a
/// well-formed buffer never makes a scan fail.
pub trait ScanStrategy: Send + Sync {
    /// Scan the provided data for VIN candidates
    fn scan(&self, data: &[u8]) -> ScanReport;
}

/// Primary scanner for VIN candidates
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    /// Creates a new scanner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }
}

impl ScanStrategy for Scanner {
    fn scan(&self, data: &[u8]) -> ScanReport {
        debug!("Starting scan of {} bytes", data.len());

        let structural = structural_pass(data, &self.config.structural_offsets);
        let swept = if self.config.sweep {
            sweep_pass(data)
        } else {
            Vec::new()
        };

        debug!(
            "Structural pass: {} hit(s), sweep: {} hit(s)",
            structural.len(),
            swept.len()
        );

        let report = merge(structural, swept, self.config.max_results);
        debug!("Scan complete: {} candidate(s)", report.len());
        report
    }
}

/// Reads the window at `offset`, if it fits and holds a plausible VIN
fn candidate_at(data: &[u8], offset: usize) -> Option<VinCandidate> {
    let end = offset.checked_add(VIN_LEN)?;
    let window = data.get(offset..end)?;
    Vin::from_window(window).map(|vin| VinCandidate::new(vin, offset))
}

/// Checks each offset in `offsets`, in order.
///
/// Offsets whose window would run past the end of `data` are skipped.
pub fn structural_pass(data: &[u8], offsets: &[usize]) -> Vec<VinCandidate> {
    offsets
        .iter()
        .filter_map(|&offset| {
            let hit = candidate_at(data, offset);
            if let Some(c) = &hit {
                trace!("Structural hit {} at {}", c.value, c.offset_label());
            }
            hit
        })
        .collect()
}

/// Tests every window from offset 0 to `len - 17`, ascending.
///
/// Tracks the length of the current run of VIN characters so each byte is
/// classified once; a window is only parsed when all 17 of its bytes belong
/// to the run. This reports exactly what testing every window would.
pub fn sweep_pass(data: &[u8]) -> Vec<VinCandidate> {
    let mut hits = Vec::new();
    let mut run = 0usize;

    for (i, &byte) in data.iter().enumerate() {
        if !is_vin_char(byte) {
            run = 0;
            continue;
        }
        run += 1;

        if run >= VIN_LEN {
            let start = i + 1 - VIN_LEN;
            if let Some(vin) = Vin::from_window(&data[start..=i]) {
                trace!("Sweep hit {} at {:#X}", vin, start);
                hits.push(VinCandidate::new(vin, start));
            }
        }
    }

    hits
}

/// Concatenates both passes, dropping repeated `(value, offset)` pairs
fn merge(structural: Vec<VinCandidate>, swept: Vec<VinCandidate>, max: usize) -> ScanReport {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for candidate in structural.into_iter().chain(swept) {
        if max > 0 && out.len() >= max {
            break;
        }
        if seen.insert((candidate.value, candidate.offset)) {
            out.push(candidate);
        }
    }

    ScanReport::from_candidates(out)
}

/// Scans `data` with the default configuration
pub fn scan(data: &[u8]) -> ScanReport {
    Scanner::new().scan(data)
}

/// Scan a file for VIN candidates
///
/// This is a convenience function that reads the file and scans it.
pub fn scan_file(path: impl AsRef<std::path::Path>) -> Result<ScanReport> {
    scan_file_with_config(path, ScannerConfig::default())
}

/// Scan a file with custom configuration
pub fn scan_file_with_config(
    path: impl AsRef<std::path::Path>,
    config: ScannerConfig,
) -> Result<ScanReport> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    Ok(Scanner::with_config(config).scan(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIN_A: &[u8] = b"WVWZZZ3CZWE123456";
    const VIN_B: &[u8] = b"VF1BURHE0JC014588";

    fn image(len: usize, placements: &[(usize, &[u8])]) -> Vec<u8> {
        let mut data = vec![0xFFu8; len];
        for &(offset, bytes) in placements {
            data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        data
    }

    fn pairs(report: &ScanReport) -> Vec<(String, usize)> {
        report
            .iter()
            .map(|c| (c.value.to_string(), c.offset))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(scan(&[]).is_empty());
        assert!(scan(&[b'A'; 16]).is_empty());
    }

    #[test]
    fn test_no_candidates() {
        let data = b"this is just some random data without any vin content";
        assert!(scan(data).is_empty());
    }

    #[test]
    fn test_single_structural_hit() {
        let data = image(0x2000, &[(0x500, VIN_A)]);
        let report = scan(&data);
        assert_eq!(pairs(&report), vec![("WVWZZZ3CZWE123456".into(), 0x500)]);
    }

    #[test]
    fn test_structural_hits_precede_sweep_hits() {
        // 0x123 is not a structural offset, 0x1000 is
        let data = image(0x2000, &[(0x123, VIN_B), (0x1000, VIN_A)]);
        let report = scan(&data);
        assert_eq!(
            pairs(&report),
            vec![
                ("WVWZZZ3CZWE123456".into(), 0x1000),
                ("VF1BURHE0JC014588".into(), 0x123),
            ]
        );
    }

    #[test]
    fn test_structural_order_follows_list() {
        let data = image(0x2000, &[(0x1000, VIN_A), (0x400, VIN_B)]);
        let hits = structural_pass(&data, &[0x1000, 0x400]);
        assert_eq!(hits[0].offset, 0x1000);
        assert_eq!(hits[1].offset, 0x400);
    }

    #[test]
    fn test_same_value_at_several_offsets() {
        let data = image(0x6000, &[(0x400, VIN_A), (0x1000, VIN_A), (0x5000, VIN_B)]);
        let report = scan(&data);
        assert_eq!(report.len(), 3);
        assert_eq!(report.distinct_values().len(), 2);
    }

    #[test]
    fn test_window_at_last_offset() {
        let len = 0x800;
        let data = image(len, &[(len - 17, VIN_A)]);
        let report = scan(&data);
        assert_eq!(pairs(&report), vec![("WVWZZZ3CZWE123456".into(), len - 17)]);
    }

    #[test]
    fn test_structural_offset_past_end_skipped() {
        let data = image(0x500 + 10, &[]);
        assert!(structural_pass(&data, STRUCTURAL_OFFSETS).is_empty());
    }

    #[test]
    fn test_sweep_matches_naive_windows() {
        // Long run of VIN characters: several overlapping windows qualify
        let mut data = image(0x100, &[]);
        data[0x10..0x10 + 20].copy_from_slice(b"WVWZZZ3CZWE123456ABC");
        let naive: Vec<_> = (0..=data.len() - VIN_LEN)
            .filter_map(|o| candidate_at(&data, o))
            .collect();
        assert_eq!(sweep_pass(&data), naive);
        assert!(!naive.is_empty());
    }

    #[test]
    fn test_invalid_byte_aborts_only_that_window() {
        let mut data = image(0x100, &[]);
        // An 'O' right before a valid VIN breaks windows containing it, not the VIN
        data[0x20] = b'O';
        data[0x21..0x21 + 17].copy_from_slice(VIN_A);
        let report = scan(&data);
        assert_eq!(pairs(&report), vec![("WVWZZZ3CZWE123456".into(), 0x21)]);
    }

    #[test]
    fn test_filler_is_not_a_vin() {
        let data = vec![b'F'; 0x1000];
        assert!(scan(&data).is_empty());
    }

    #[test]
    fn test_sweep_disabled() {
        let data = image(0x2000, &[(0x123, VIN_B), (0x1000, VIN_A)]);
        let report = Scanner::with_config(ScannerConfig::new().sweep(false)).scan(&data);
        assert_eq!(pairs(&report), vec![("WVWZZZ3CZWE123456".into(), 0x1000)]);
    }

    #[test]
    fn test_max_results() {
        let data = image(0x6000, &[(0x400, VIN_A), (0x1000, VIN_A), (0x5000, VIN_B)]);
        let report = Scanner::with_config(ScannerConfig::new().max_results(2)).scan(&data);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let data = image(0x6000, &[(0x400, VIN_A), (0x777, VIN_B), (0x5000, VIN_B)]);
        assert_eq!(scan(&data), scan(&data));
    }

    #[test]
    fn test_scan_file_missing() {
        let err = scan_file("/nonexistent/vinpatch/dump.bin").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_scanner_config_builder() {
        let config = ScannerConfig::new()
            .structural_offsets(vec![0x10, 0x20])
            .sweep(false)
            .max_results(5);

        assert_eq!(config.structural_offsets, vec![0x10, 0x20]);
        assert!(!config.sweep);
        assert_eq!(config.max_results, 5);
    }
}
