//! # vinpatch-core
//!
//! A library for locating and rewriting Vehicle Identification Numbers in ECU
//! EEPROM and flash dumps.
//!
//! This crate provides the core functionality for:
//! - Matching a dump against known hardware platforms by its exact size
//! - Scanning raw bytes for VIN-like 17-character runs
//! - Writing a corrected VIN back to every location, without changing the size
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`platform`]: Platform catalog and size matching
//! - [`vin`]: VIN alphabet, plausibility heuristic, validated [`Vin`] type
//! - [`scanner`]: Two-phase candidate scanner
//! - [`rewrite`]: Copy-on-write VIN writes
//! - [`analysis`]: Platform match plus scan in one call
//! - [`session`]: Load / select / edit / export workflow
//! - [`intake`]: Upload gate (extension and size)
//! - [`record`]: Catalog row for a processed dump
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use vinpatch_core::{analyze, EditSession, LoadOutcome};
//! use std::fs;
//!
//! let data = fs::read("./dump.bin")?;
//! let analysis = analyze(&data, data.len());
//! for candidate in &analysis.report {
//!     println!("{} at {}", candidate.value, candidate.offset_label());
//! }
//!
//! let mut session = EditSession::new();
//! if let LoadOutcome::Unique { .. } = session.load("dump.bin", data) {
//!     session.start_edit()?;
//!     session.set_pending("WVWZZZ3CZWE123456")?;
//!     session.save()?;
//!     let export = session.export()?;
//!     fs::write(&export.file_name, &export.bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Limitations
//!
//! VINs are matched heuristically. The ISO 3779 check digit is never
//! verified, so a reported candidate is only VIN-shaped.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod analysis;
pub mod error;
pub mod intake;
pub mod platform;
pub mod record;
pub mod rewrite;
pub mod scanner;
pub mod session;
pub mod vin;

// Re-export primary types for convenience
pub use analysis::{analyze, analyze_with, Advisory, Analysis, VinResolution};
pub use error::{Error, Result};
pub use intake::{format_file_size, validate_upload};
pub use platform::{match_platforms, select_platform, PlatformMatch, PlatformProfile, CATALOG};
pub use record::{build_record, FileRecord, RecordStatus};
pub use rewrite::{fan_out, rewrite};
pub use scanner::{scan, ScanReport, ScanStrategy, Scanner, ScannerConfig, VinCandidate};
pub use session::{EditSession, Export, LoadOutcome, SessionState};
pub use vin::{is_plausible_vin, is_vin_char, Vin, VIN_LEN};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
