//! Plausibility heuristic for 17-character VIN candidates.
//!
//! This is a filter against noise in binary images, not VIN validation: the
//! ISO 3779 check digit is never computed, and strings that no manufacturer
//! would issue still pass as long as they look structurally VIN-like.

use super::charset::VIN_LEN;

/// Inclusive bounds on how many digits a plausible VIN carries
const DIGIT_RANGE: std::ops::RangeInclusive<usize> = 3..=10;

/// A run of this many identical characters marks filler, not a VIN
const MAX_RUN: usize = 5;

/// Returns true if `candidate` looks like a VIN.
///
/// All of the following must hold:
/// 1. exactly 17 characters
/// 2. no `I`, `O` or `Q`
/// 3. the first character is a letter from `[A-HJ-NPR-Z]`
/// 4. between 3 and 10 digits
/// 5. no character repeated 5 or more times in a row
pub fn is_plausible_vin(candidate: &str) -> bool {
    if candidate.chars().count() != VIN_LEN {
        return false;
    }

    if candidate.contains(['I', 'O', 'Q']) {
        return false;
    }

    match candidate.chars().next() {
        Some(c) if is_leading_letter(c) => {}
        _ => return false,
    }

    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if !DIGIT_RANGE.contains(&digits) {
        return false;
    }

    !has_run(candidate, MAX_RUN)
}

fn is_leading_letter(c: char) -> bool {
    matches!(c, 'A'..='H' | 'J'..='N' | 'P' | 'R'..='Z')
}

/// True if some character repeats `len` or more times consecutively
fn has_run(s: &str, len: usize) -> bool {
    let mut prev = None;
    let mut run = 0;
    for c in s.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= len {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_vins() {
        assert!(is_plausible_vin("WVWZZZ3CZWE123456"));
        assert!(is_plausible_vin("VF1BURHE0JC014588"));
        assert!(is_plausible_vin("WBAPH5C55BA123456"));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!is_plausible_vin(""));
        assert!(!is_plausible_vin("WVWZZZ3CZWE12345"));
        assert!(!is_plausible_vin("WVWZZZ3CZWE1234567"));
    }

    #[test]
    fn test_rejects_ambiguous_letters() {
        assert!(!is_plausible_vin("IO1234567890ABCDE"));
        assert!(!is_plausible_vin("WVWZZZ3CZWE12345Q"));
    }

    #[test]
    fn test_rejects_leading_digit() {
        assert!(!is_plausible_vin("12345678901234567"));
        // Starts with a digit and carries 12 digits
        assert!(!is_plausible_vin("1HGCM82633A004352"));
    }

    #[test]
    fn test_digit_count_bounds() {
        // 2 digits
        assert!(!is_plausible_vin("WVWZZZACZWEABC12D"));
        // 3 digits
        assert!(is_plausible_vin("WVWZZZACZWEABC123"));
        // 10 digits
        assert!(is_plausible_vin("WVWZZZ1234567890A"));
        // 11 digits
        assert!(!is_plausible_vin("WVWZZ12345678901A"));
    }

    #[test]
    fn test_rejects_filler_runs() {
        assert!(!is_plausible_vin("WWWWWWWWWWWWWWWWW"));
        assert!(!is_plausible_vin("WVWZZZZZ3CE123456"));
        // Four in a row is still fine
        assert!(is_plausible_vin("WVWZZZZ3CE1234567"));
    }

    #[test]
    fn test_has_run() {
        assert!(has_run("AAAAA", 5));
        assert!(!has_run("AAAAB", 5));
        assert!(has_run("BAAAAA", 5));
    }
}
