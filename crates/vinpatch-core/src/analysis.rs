//! One-shot analysis of a dump: platform match plus VIN scan.

use crate::platform::{match_platforms, PlatformMatch, PlatformProfile};
use crate::scanner::{ScanReport, ScanStrategy, Scanner};
use crate::vin::Vin;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Result of [`analyze`]
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Profiles whose size equals the declared length
    pub platforms: Vec<&'static PlatformProfile>,
    /// Every VIN candidate found in the image
    pub report: ScanReport,
    /// Value of the first candidate; a suggestion, never applied implicitly
    pub first_value: Option<Vin>,
}

/// How many distinct VIN values an image holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VinResolution {
    /// No candidate at all
    None,
    /// One value, possibly at several offsets
    Unique(Vin),
    /// Several values; the user has to say which is authoritative
    Ambiguous(Vec<Vin>),
}

/// Non-fatal findings that need the user's attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The declared size matches no catalog entry
    UnknownPlatform,
    /// Several platforms share the declared size
    AmbiguousPlatform {
        /// Number of matching platforms
        count: usize,
    },
    /// The scan found nothing
    NoCandidatesFound,
    /// More than one distinct VIN value was found
    AmbiguousVin {
        /// Number of distinct values
        count: usize,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlatform => write!(f, "size does not match any known platform"),
            Self::AmbiguousPlatform { count } => {
                write!(f, "{} platforms share this size, choose one", count)
            }
            Self::NoCandidatesFound => write!(f, "no VINs detected in this file"),
            Self::AmbiguousVin { count } => {
                write!(f, "{} different VINs found, choose the correct one", count)
            }
        }
    }
}

impl Analysis {
    /// Classification of the platform list
    pub fn platform_match(&self) -> PlatformMatch {
        PlatformMatch::from_matches(self.platforms.clone())
    }

    /// Classification of the distinct VIN values
    pub fn vin_resolution(&self) -> VinResolution {
        let mut values = self.report.distinct_values();
        match values.len() {
            0 => VinResolution::None,
            1 => VinResolution::Unique(values.remove(0)),
            _ => VinResolution::Ambiguous(values),
        }
    }

    /// Everything the caller should surface before committing to an edit
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();
        match self.platforms.len() {
            0 => out.push(Advisory::UnknownPlatform),
            1 => {}
            count => out.push(Advisory::AmbiguousPlatform { count }),
        }
        match self.vin_resolution() {
            VinResolution::None => out.push(Advisory::NoCandidatesFound),
            VinResolution::Unique(_) => {}
            VinResolution::Ambiguous(values) => out.push(Advisory::AmbiguousVin {
                count: values.len(),
            }),
        }
        out
    }
}

/// Analyzes `buffer` with the default scanner.
///
/// `declared_len` is the size reported by whoever supplied the bytes (the
/// upload's file size) and drives platform matching.
pub fn analyze(buffer: &[u8], declared_len: usize) -> Analysis {
    analyze_with(&Scanner::new(), buffer, declared_len)
}

/// Analyzes `buffer` with a custom scan strategy
pub fn analyze_with(
    strategy: &dyn ScanStrategy,
    buffer: &[u8],
    declared_len: usize,
) -> Analysis {
    if declared_len != buffer.len() {
        debug!(
            "Declared length {} differs from buffer length {}",
            declared_len,
            buffer.len()
        );
    }

    let platforms = match_platforms(declared_len);
    let report = strategy.scan(buffer);
    let first_value = report.first().map(|c| c.value);

    info!(
        "Analyzed {} bytes: {} platform(s), {} VIN location(s), {} distinct",
        buffer.len(),
        platforms.len(),
        report.len(),
        report.distinct_values().len()
    );

    Analysis {
        platforms,
        report,
        first_value,
    }
}
