//! Offsets where known firmware layouts tend to store the VIN.
//!
//! Collected from dumps of the supported platforms. The order is significant:
//! hits at these offsets are reported before anything the sweep finds.

/// Structural VIN offsets, checked in this order
pub const STRUCTURAL_OFFSETS: &[usize] = &[
    0x400, 0x4F0, 0x500, 0x530, 0x550, 0x580, 0x5A0, 0x5F0, // boot / identification block
    0x600, 0x650, 0x680, 0x6F0, 0x700, 0x750, 0x7F0, //
    0x800, 0x900, 0xA00, 0xB00, 0xC00, 0xD00, 0xE00, 0xF00, // 256-byte pages
    0x1000, 0x1100, 0x1200, 0x1500, 0x1800, 0x2000, 0x2500, 0x3000, //
    0x4000, 0x5000, 0x6000, 0x7000, 0x8000, 0xA000, 0xC000, 0x10000, // sector starts
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_offsets_unique() {
        let unique: HashSet<_> = STRUCTURAL_OFFSETS.iter().collect();
        assert_eq!(unique.len(), STRUCTURAL_OFFSETS.len());
    }

    #[test]
    fn test_offsets_fit_smallest_platform() {
        let smallest = crate::platform::CATALOG
            .iter()
            .map(|p| p.size_bytes)
            .min()
            .unwrap();
        assert!(STRUCTURAL_OFFSETS.iter().all(|&o| o + 17 <= smallest));
    }
}
