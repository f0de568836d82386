//! Scan results.

use crate::vin::Vin;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashSet;

/// A 17-byte window that looks like a VIN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VinCandidate {
    /// The VIN text found in the window
    pub value: Vin,
    /// Byte offset of the first character
    pub offset: usize,
}

impl VinCandidate {
    /// Creates a new candidate
    pub fn new(value: Vin, offset: usize) -> Self {
        Self { value, offset }
    }

    /// Offset formatted as `0x` followed by uppercase hex, e.g. `0x4F0`
    pub fn offset_label(&self) -> String {
        format!("0x{:X}", self.offset)
    }
}

impl Serialize for VinCandidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("VinCandidate", 3)?;
        s.serialize_field("value", &self.value)?;
        s.serialize_field("offset", &self.offset)?;
        s.serialize_field("offset_label", &self.offset_label())?;
        s.end()
    }
}

/// Ordered, deduplicated list of candidates from one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ScanReport {
    candidates: Vec<VinCandidate>,
}

impl ScanReport {
    pub(crate) fn from_candidates(candidates: Vec<VinCandidate>) -> Self {
        Self { candidates }
    }

    /// All candidates in report order
    pub fn candidates(&self) -> &[VinCandidate] {
        &self.candidates
    }

    /// Iterates candidates in report order
    pub fn iter(&self) -> std::slice::Iter<'_, VinCandidate> {
        self.candidates.iter()
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if nothing was found
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The first candidate, if any
    pub fn first(&self) -> Option<&VinCandidate> {
        self.candidates.first()
    }

    /// Unique VIN values, in the order they were first reported
    pub fn distinct_values(&self) -> Vec<Vin> {
        let mut seen = HashSet::new();
        self.candidates
            .iter()
            .filter(|c| seen.insert(c.value))
            .map(|c| c.value)
            .collect()
    }

    /// Every offset at which `value` was found, in report order
    pub fn offsets_of(&self, value: &Vin) -> Vec<usize> {
        self.candidates
            .iter()
            .filter(|c| &c.value == value)
            .map(|c| c.offset)
            .collect()
    }
}

impl<'a> IntoIterator for &'a ScanReport {
    type Item = &'a VinCandidate;
    type IntoIter = std::slice::Iter<'a, VinCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vin(s: &str) -> Vin {
        Vin::parse(s).unwrap()
    }

    fn sample() -> ScanReport {
        let a = vin("WVWZZZ3CZWE123456");
        let b = vin("VF1BURHE0JC014588");
        ScanReport::from_candidates(vec![
            VinCandidate::new(a, 0x400),
            VinCandidate::new(b, 0x5000),
            VinCandidate::new(a, 0x1000),
        ])
    }

    #[test]
    fn test_offset_label() {
        let c = VinCandidate::new(vin("WVWZZZ3CZWE123456"), 0x4F0);
        assert_eq!(c.offset_label(), "0x4F0");
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let values: Vec<String> = sample()
            .distinct_values()
            .iter()
            .map(Vin::to_string)
            .collect();
        assert_eq!(values, vec!["WVWZZZ3CZWE123456", "VF1BURHE0JC014588"]);
    }

    #[test]
    fn test_offsets_of() {
        let report = sample();
        assert_eq!(
            report.offsets_of(&vin("WVWZZZ3CZWE123456")),
            vec![0x400, 0x1000]
        );
        assert!(report.offsets_of(&vin("WBAPH5C55BA123456")).is_empty());
    }

    #[test]
    fn test_serialize() {
        let report = ScanReport::from_candidates(vec![VinCandidate::new(
            vin("WVWZZZ3CZWE123456"),
            0x500,
        )]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "value": "WVWZZZ3CZWE123456", "offset": 1280, "offset_label": "0x500" }
            ])
        );
    }
}
