//! Catalog of known ECU platforms, keyed by dump size.
//!
//! A dump carries no header naming the hardware it came from, so the only
//! signal available is its exact length. Several platforms share an EEPROM
//! size and cannot be told apart this way; callers must ask the user.

use crate::error::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// A named hardware variant identified by the size of its memory image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    /// Platform name, e.g. `EDC17CP11`
    pub name: &'static str,
    /// Exact dump size in bytes
    pub size_bytes: usize,
    /// Human readable size label
    pub label: &'static str,
}

/// Every platform the matcher knows about, in display order
pub const CATALOG: &[PlatformProfile] = &[
    PlatformProfile {
        name: "EDC17CP11",
        size_bytes: 131_072,
        label: "128KB EEPROM",
    },
    PlatformProfile {
        name: "EDC17CP42",
        size_bytes: 131_072,
        label: "128KB EEPROM",
    },
    PlatformProfile {
        name: "EDC17CP55",
        size_bytes: 262_144,
        label: "256KB EEPROM",
    },
    PlatformProfile {
        name: "MEDC17.9",
        size_bytes: 196_608,
        label: "192KB EEPROM",
    },
];

/// Returns every catalog profile whose size equals `len` exactly
pub fn match_platforms(len: usize) -> Vec<&'static PlatformProfile> {
    let matches: Vec<_> = CATALOG.iter().filter(|p| p.size_bytes == len).collect();
    debug!("{} platform(s) match {} bytes", matches.len(), len);
    matches
}

/// Looks a profile up by its name (case-insensitive)
pub fn find_platform(name: &str) -> Option<&'static PlatformProfile> {
    CATALOG.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Outcome of matching an image size against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformMatch {
    /// No profile has this size
    Unknown,
    /// Exactly one profile; safe to auto-select
    Unique(&'static PlatformProfile),
    /// Several profiles share the size; the user has to pick
    Ambiguous(Vec<&'static PlatformProfile>),
}

impl PlatformMatch {
    /// Classifies the profiles matching `len`
    pub fn for_size(len: usize) -> Self {
        Self::from_matches(match_platforms(len))
    }

    /// Classifies an existing match list
    pub fn from_matches(mut matches: Vec<&'static PlatformProfile>) -> Self {
        match matches.len() {
            0 => Self::Unknown,
            1 => Self::Unique(matches.remove(0)),
            _ => Self::Ambiguous(matches),
        }
    }

    /// All candidate profiles, in catalog order
    pub fn candidates(&self) -> Vec<&'static PlatformProfile> {
        match self {
            Self::Unknown => Vec::new(),
            Self::Unique(p) => vec![*p],
            Self::Ambiguous(ps) => ps.clone(),
        }
    }
}

/// Resolves which platform a `size`-byte dump belongs to.
///
/// A unique match wins without a choice, but an explicit `choice` must still
/// name it. Ambiguous matches require `choice`.
pub fn select_platform(size: usize, choice: Option<&str>) -> Result<&'static PlatformProfile> {
    let matches = match_platforms(size);
    if let Some(name) = choice {
        return matches
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| Error::unknown_platform(name));
    }

    match matches.as_slice() {
        [] => Err(Error::NoPlatformForSize { size }),
        [only] => Ok(*only),
        many => Err(Error::PlatformSelectionRequired {
            candidates: many.iter().map(|p| p.name.to_string()).collect(),
        }),
    }
}
