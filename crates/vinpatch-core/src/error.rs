//! Error types for the vinpatch-core library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate.
//! Conditions that merely need a user decision (several platforms, several VINs,
//! no VIN at all) are not errors; see [`crate::analysis::Advisory`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vinpatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all vinpatch operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// VIN is not exactly 17 characters long
    #[error("VIN must be exactly 17 characters, got {length}")]
    InvalidVinLength {
        /// Number of characters supplied
        length: usize,
    },

    /// VIN has the right length but fails the format heuristic
    #[error("invalid VIN format: '{value}'")]
    InvalidVinFormat {
        /// The rejected value
        value: String,
    },

    /// A 17-byte write at this offset would run past the end of the buffer
    #[error("offset {offset:#X} out of range: 17 bytes do not fit in a {len}-byte buffer")]
    OffsetOutOfRange {
        /// Requested write offset
        offset: usize,
        /// Length of the target buffer
        len: usize,
    },

    /// File name does not carry the `.bin` extension
    #[error("unsupported file type '{file_name}': only .bin dumps are accepted")]
    UnsupportedExtension {
        /// The rejected file name
        file_name: String,
    },

    /// File is smaller than the intake minimum
    #[error("file is too small to be an ECU dump ({size} bytes, minimum {min})")]
    FileTooSmall {
        /// Actual size in bytes
        size: u64,
        /// Minimum accepted size
        min: u64,
    },

    /// File exceeds the intake maximum
    #[error("file size {size} exceeds the {max}-byte limit")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Maximum accepted size
        max: u64,
    },

    /// No catalog profile has the requested name
    #[error("no known platform for '{what}'")]
    UnknownPlatform {
        /// The name that was looked up
        what: String,
    },

    /// No catalog profile has the image's size
    #[error("no known platform for a {size}-byte image")]
    NoPlatformForSize {
        /// Image size in bytes
        size: usize,
    },

    /// Several platforms share the image size and none was chosen
    #[error("platform is ambiguous, choose one of: {}", .candidates.join(", "))]
    PlatformSelectionRequired {
        /// Names of the matching platforms
        candidates: Vec<String>,
    },

    /// The chosen VIN is not one of the values found in the image
    #[error("VIN '{value}' was not found in the image")]
    UnknownVinSelection {
        /// The requested value
        value: String,
    },

    /// Session operation not allowed in the current state
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        /// Attempted operation
        action: &'static str,
        /// Name of the current state
        state: &'static str,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new VIN format error
    pub fn invalid_vin_format(value: impl Into<String>) -> Self {
        Self::InvalidVinFormat {
            value: value.into(),
        }
    }

    /// Creates a new unknown platform error
    pub fn unknown_platform(what: impl ToString) -> Self {
        Self::UnknownPlatform {
            what: what.to_string(),
        }
    }

    /// Creates a new invalid transition error
    pub fn invalid_transition(action: &'static str, state: &'static str) -> Self {
        Self::InvalidTransition { action, state }
    }

    /// Returns true if the error is about user-supplied VIN text
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidVinLength { .. } | Self::InvalidVinFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::OffsetOutOfRange {
            offset: 0x500,
            len: 1024,
        };
        assert!(err.to_string().contains("0x500"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn test_platform_selection_lists_candidates() {
        let err = Error::PlatformSelectionRequired {
            candidates: vec!["EDC17CP11".into(), "EDC17CP42".into()],
        };
        assert!(err.to_string().contains("EDC17CP11, EDC17CP42"));
    }

    #[test]
    fn test_is_invalid_input() {
        assert!(Error::InvalidVinLength { length: 3 }.is_invalid_input());
        assert!(Error::invalid_vin_format("X").is_invalid_input());
        assert!(!Error::unknown_platform("EDC16").is_invalid_input());
    }

    #[test]
    fn test_no_platform_for_size_names_size() {
        let err = Error::NoPlatformForSize { size: 4096 };
        assert_eq!(err.to_string(), "no known platform for a 4096-byte image");
    }
}
