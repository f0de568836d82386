//! VIN alphabet, plausibility heuristic and the validated [`Vin`] type.
//!
//! ## Layers
//!
//! - [`is_vin_char`]: single-byte classifier used while sliding over an image
//! - [`is_plausible_vin`]: structural heuristic over a whole 17-character string
//! - [`Vin`]: a value that passed both, and is therefore safe to write back
//!   into an image and find again on the next scan

mod charset;
mod format;

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use charset::{is_vin_char, is_vin_window, VIN_LEN};
pub use format::is_plausible_vin;

/// A 17-character VIN that passed the charset and format checks
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vin([u8; VIN_LEN]);

impl Vin {
    /// Parses and validates a VIN.
    ///
    /// Fails with [`Error::InvalidVinLength`] unless the input has exactly 17
    /// characters, and with [`Error::InvalidVinFormat`] when it is not a
    /// plausible VIN or contains characters outside the VIN alphabet.
    /// No case folding happens here.
    pub fn parse(value: &str) -> Result<Self> {
        let length = value.chars().count();
        if length != VIN_LEN {
            return Err(Error::InvalidVinLength { length });
        }

        if !is_plausible_vin(value) || !is_vin_window(value.as_bytes()) {
            return Err(Error::invalid_vin_format(value));
        }

        let mut bytes = [0u8; VIN_LEN];
        bytes.copy_from_slice(value.as_bytes());
        Ok(Self(bytes))
    }

    /// Builds a VIN from a 17-byte window of an image, if it qualifies
    pub fn from_window(window: &[u8]) -> Option<Self> {
        if !is_vin_window(window) {
            return None;
        }
        // Only ASCII survives the window check
        let text = std::str::from_utf8(window).ok()?;
        if !is_plausible_vin(text) {
            return None;
        }

        let mut bytes = [0u8; VIN_LEN];
        bytes.copy_from_slice(window);
        Some(Self(bytes))
    }

    /// Returns the VIN as a string slice
    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the raw ASCII bytes
    pub fn as_bytes(&self) -> &[u8; VIN_LEN] {
        &self.0
    }
}

impl FromStr for Vin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vin").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Vin {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Vin {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Vin {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let vin = Vin::parse("WVWZZZ3CZWE123456").unwrap();
        assert_eq!(vin.as_str(), "WVWZZZ3CZWE123456");
        assert_eq!(vin.to_string(), "WVWZZZ3CZWE123456");
        assert_eq!(vin, "WVWZZZ3CZWE123456");
    }

    #[test]
    fn test_parse_wrong_length() {
        let err = Vin::parse("WVWZZZ").unwrap_err();
        assert!(matches!(err, Error::InvalidVinLength { length: 6 }));
    }

    #[test]
    fn test_parse_bad_format() {
        let err = Vin::parse("WWWWWWWWWWWWWWWWW").unwrap_err();
        assert!(matches!(err, Error::InvalidVinFormat { .. }));
    }

    #[test]
    fn test_parse_rejects_lowercase() {
        // Passes the structural rules but would never be found by a scan
        assert!(is_plausible_vin("Wvwzzz3czwe123456"));
        assert!(Vin::parse("Wvwzzz3czwe123456").is_err());
    }

    #[test]
    fn test_from_window() {
        assert!(Vin::from_window(b"VF1BURHE0JC014588").is_some());
        assert!(Vin::from_window(b"VF1BURHE0JC01458\xFF").is_none());
        assert!(Vin::from_window(b"FFFFFFFFFFFFFFFFF").is_none());
    }

    #[test]
    fn test_debug_shows_text() {
        let vin = Vin::parse("WVWZZZ3CZWE123456").unwrap();
        assert_eq!(format!("{vin:?}"), r#"Vin("WVWZZZ3CZWE123456")"#);
        assert_eq!(format!("{:?}", Some(vin)), r#"Some(Vin("WVWZZZ3CZWE123456"))"#);
    }

    #[test]
    fn test_from_str() {
        let vin: Vin = "VF1BURHE0JC014588".parse().unwrap();
        assert_eq!(vin.as_bytes(), b"VF1BURHE0JC014588");
    }
}
