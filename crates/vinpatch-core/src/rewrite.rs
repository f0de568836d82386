//! Copy-on-write VIN rewriting.
//!
//! Every write allocates a fresh image and leaves its input untouched, so an
//! error can never leave a half-written buffer behind. The output always has
//! the same length as the input.

use crate::error::{Error, Result};
use crate::vin::{Vin, VIN_LEN};
use bytes::{Bytes, BytesMut};
use tracing::debug;

/// Returns a copy of `buffer` with `value` written at `offset`.
///
/// Fails with [`Error::InvalidVinLength`] or [`Error::InvalidVinFormat`] if
/// `value` is not a plausible VIN, and with [`Error::OffsetOutOfRange`] if
/// the 17 bytes do not fit.
pub fn rewrite(buffer: &[u8], value: &str, offset: usize) -> Result<Bytes> {
    let vin = Vin::parse(value)?;
    fan_out(buffer, &vin, &[offset])
}

/// Returns a copy of `buffer` with `vin` written at every offset in `offsets`.
///
/// All offsets are checked before anything is copied; one bad offset fails
/// the whole call.
pub fn fan_out(buffer: &[u8], vin: &Vin, offsets: &[usize]) -> Result<Bytes> {
    if let Some(&offset) = offsets.iter().find(|&&o| !fits(buffer.len(), o)) {
        return Err(Error::OffsetOutOfRange {
            offset,
            len: buffer.len(),
        });
    }

    let mut out = BytesMut::from(buffer);
    for &offset in offsets {
        out[offset..offset + VIN_LEN].copy_from_slice(vin.as_bytes());
    }

    debug!(
        "Wrote {} to {} location(s) in {} bytes",
        vin,
        offsets.len(),
        out.len()
    );

    Ok(out.freeze())
}

fn fits(len: usize, offset: usize) -> bool {
    offset.checked_add(VIN_LEN).is_some_and(|end| end <= len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrite_preserves_length_and_input() {
        let original = vec![0u8; 1024];
        let out = rewrite(&original, "WVWZZZ3CZWE123456", 0x100).unwrap();

        assert_eq!(out.len(), original.len());
        assert_eq!(&out[0x100..0x111], b"WVWZZZ3CZWE123456");
        assert_eq!(&out[..0x100], &original[..0x100]);
        assert_eq!(&out[0x111..], &original[0x111..]);
        assert!(original.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rewrite_is_discoverable() {
        let original = vec![0u8; 0x800];
        for offset in [0, 0x400, 0x123, 0x800 - 17] {
            let out = rewrite(&original, "VF1BURHE0JC014588", offset).unwrap();
            assert!(scan(&out)
                .iter()
                .any(|c| c.offset == offset && c.value == "VF1BURHE0JC014588"));
        }
    }

    #[test]
    fn test_rewrite_rejects_bad_value() {
        let original = vec![0u8; 64];
        assert!(matches!(
            rewrite(&original, "SHORT", 0),
            Err(Error::InvalidVinLength { length: 5 })
        ));
        assert!(matches!(
            rewrite(&original, "WWWWWWWWWWWWWWWWW", 0),
            Err(Error::InvalidVinFormat { .. })
        ));
    }

    #[test]
    fn test_rewrite_rejects_out_of_range() {
        let original = vec![0u8; 64];
        assert!(rewrite(&original, "WVWZZZ3CZWE123456", 64 - 17).is_ok());
        assert!(matches!(
            rewrite(&original, "WVWZZZ3CZWE123456", 64 - 16),
            Err(Error::OffsetOutOfRange { offset: 48, len: 64 })
        ));
        assert!(rewrite(&original, "WVWZZZ3CZWE123456", usize::MAX).is_err());
    }

    #[test]
    fn test_fan_out_fails_closed() {
        let original = vec![0u8; 64];
        let vin = Vin::parse("WVWZZZ3CZWE123456").unwrap();
        assert!(fan_out(&original, &vin, &[0, 100]).is_err());
        assert!(original.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fan_out_writes_every_offset() {
        let original = vec![0u8; 0x100];
        let vin = Vin::parse("WVWZZZ3CZWE123456").unwrap();
        let out = fan_out(&original, &vin, &[0x10, 0x80]).unwrap();
        assert_eq!(&out[0x10..0x21], vin.as_bytes());
        assert_eq!(&out[0x80..0x91], vin.as_bytes());
        assert_eq!(out.len(), 0x100);
    }
}
