//! Upload gate applied before a file reaches the engine.
//!
//! Dumps are accepted by name and size alone: the `.bin` extension and a size
//! between 1 KiB and 50 MiB. The bytes themselves are never inspected here.

use crate::error::{Error, Result};
use std::path::Path;

/// Smallest accepted dump, in bytes
pub const MIN_FILE_SIZE: u64 = 1024;

/// Largest accepted dump, in bytes
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Accepted file extension, compared case-insensitively
pub const BIN_EXTENSION: &str = "bin";

/// Checks a file's name and size against the intake rules
pub fn validate_upload(file_name: &str, size: u64) -> Result<()> {
    if !has_bin_extension(file_name) {
        return Err(Error::UnsupportedExtension {
            file_name: file_name.to_string(),
        });
    }

    if size > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }

    if size < MIN_FILE_SIZE {
        return Err(Error::FileTooSmall {
            size,
            min: MIN_FILE_SIZE,
        });
    }

    Ok(())
}

/// True if `file_name` ends in `.bin`, in any case
pub fn has_bin_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(BIN_EXTENSION))
}

/// Formats a byte count for display: `0 Bytes`, `512 Bytes`, `128 KB`, `1.5 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // Two decimals at most, trailing zeros dropped
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
