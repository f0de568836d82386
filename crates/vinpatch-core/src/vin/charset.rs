//! Byte-level VIN alphabet.
//!
//! ISO 3779 drops the letters `I`, `O` and `Q` because they are easily
//! confused with `1` and `0`. Every other uppercase letter and every digit
//! may appear in a VIN.

/// Length of a VIN in bytes
pub const VIN_LEN: usize = 17;

/// Returns true if `byte`, read as ASCII, may appear in a VIN.
#[inline]
pub fn is_vin_char(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'A'..=b'H' | b'J'..=b'N' | b'P' | b'R'..=b'Z')
}

/// Returns true if every byte of `window` is a VIN character.
#[inline]
pub fn is_vin_window(window: &[u8]) -> bool {
    window.len() == VIN_LEN && window.iter().all(|&b| is_vin_char(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_accepted() {
        for b in b'0'..=b'9' {
            assert!(is_vin_char(b), "{}", b as char);
        }
    }

    #[test]
    fn test_excluded_letters() {
        assert!(!is_vin_char(b'I'));
        assert!(!is_vin_char(b'O'));
        assert!(!is_vin_char(b'Q'));
    }

    #[test]
    fn test_letter_ranges() {
        let accepted: String = (b'A'..=b'Z')
            .filter(|&b| is_vin_char(b))
            .map(char::from)
            .collect();
        assert_eq!(accepted, "ABCDEFGHJKLMNPRSTUVWXYZ");
    }

    #[test]
    fn test_non_ascii_and_lowercase_rejected() {
        assert!(!is_vin_char(b'a'));
        assert!(!is_vin_char(b'z'));
        assert!(!is_vin_char(0x00));
        assert!(!is_vin_char(0xFF));
        assert!(!is_vin_char(b' '));
    }

    #[test]
    fn test_window() {
        assert!(is_vin_window(b"WVWZZZ3CZWE123456"));
        assert!(!is_vin_window(b"WVWZZZ3CZWE12345"));
        assert!(!is_vin_window(b"WVWZZZ3CZWE12345\0"));
    }
}
