// common.rs
//! Byte and bit arithmetic shared by the descriptor and iteration modules.
//!
//! Descriptors express every layout quantity in bits; the raw buffers are
//! addressed in bytes. The helpers here do the conversion and the checked
//! little-endian reads used for explicit timestamp fields.

// ============================================================================
// Bit/Byte Conversion
// ============================================================================

/// Convert a bit count from a descriptor into bytes.
///
/// # Panics
/// Panics if `bits` is not a multiple of 8. Such a descriptor is malformed
/// upstream and there is no meaningful way to continue reading with it.
#[inline]
pub(crate) fn bits_to_bytes(bits: u64, field: &'static str) -> u64 {
    assert!(
        bits % 8 == 0,
        "{field} of {bits} bits is not byte aligned"
    );
    bits / 8
}

/// Convert a byte position into a slice index, if it fits the platform.
#[inline]
pub(crate) fn to_index(position: u64) -> Option<usize> {
    usize::try_from(position).ok()
}

// ============================================================================
// Byte Parsing Helpers
// ============================================================================

/// Read a little-endian u64 at `offset`, or `None` if fewer than 8 bytes remain.
#[inline]
pub(crate) fn read_u64_checked(bytes: &[u8], offset: u64) -> Option<u64> {
    let start = to_index(offset)?;
    let end = start.checked_add(8)?;
    let field: [u8; 8] = bytes.get(start..end)?.try_into().ok()?;
    Some(u64::from_le_bytes(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_to_bytes_aligned() {
        assert_eq!(bits_to_bytes(0, "stride"), 0);
        assert_eq!(bits_to_bytes(64, "stride"), 8);
        assert_eq!(bits_to_bytes(128, "offset"), 16);
    }

    #[test]
    #[should_panic(expected = "not byte aligned")]
    fn test_bits_to_bytes_misaligned() {
        bits_to_bytes(12, "stride");
    }

    #[test]
    fn test_read_u64_checked() {
        let bytes = [0xAA, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
        assert_eq!(read_u64_checked(&bytes, 1), Some(0x0200_0000_0000_0001));
        assert_eq!(read_u64_checked(&bytes, 2), None);
        assert_eq!(read_u64_checked(&bytes, u64::MAX), None);
    }
}
