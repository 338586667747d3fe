//! Items produced by a [`crate::StreamIterator`].

/// Kind of a range fed to the stream iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum RangeKind {
    /// Samples backed by block memory
    Data = 0,
    /// Synthesized marker for indices outside every valid region
    Invalid = 1,
}

impl From<RangeKind> for u8 {
    fn from(kind: RangeKind) -> Self {
        kind as u8
    }
}

/// One step of a channel traversal.
///
/// `data` borrows the sample's slot inside the block buffer and is `None` for
/// invalid markers. The slot starts at the sample and spans one stride, so it
/// may contain neighbouring fields (such as the explicit timestamp) as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample<'a> {
    pub timestamp: u64,
    pub kind: RangeKind,
    pub data: Option<&'a [u8]>,
}

impl<'a> Sample<'a> {
    /// Returns true for gap markers.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.kind == RangeKind::Invalid
    }

    /// Interpret the start of the sample slot as a little-endian `T`.
    ///
    /// Returns `None` for gap markers and for slots shorter than `T`.
    ///
    /// ```
    /// use daqstream_rs::{RangeKind, Sample};
    ///
    /// let bytes = 1.5f32.to_le_bytes();
    /// let sample = Sample { timestamp: 0, kind: RangeKind::Data, data: Some(&bytes) };
    /// assert_eq!(sample.value::<f32>(), Some(1.5));
    /// assert_eq!(sample.value::<f64>(), None);
    /// ```
    pub fn value<T: SampleValue>(&self) -> Option<T> {
        if self.is_invalid() {
            return None;
        }
        T::from_le_slice(self.data?)
    }
}

/// Fixed-size numeric types a sample slot can be read as.
pub trait SampleValue: Sized {
    /// Size of the value in bytes.
    const SIZE: usize;

    /// Decode from the first [`Self::SIZE`] bytes of `bytes`.
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_sample_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SampleValue for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                #[inline]
                fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                    let raw = bytes.get(..Self::SIZE)?.try_into().ok()?;
                    Some(<$ty>::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_sample_value!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_values() {
        let bytes = [0x34, 0x12, 0xFF, 0xFF];
        let sample = Sample {
            timestamp: 3,
            kind: RangeKind::Data,
            data: Some(&bytes),
        };
        assert_eq!(sample.value::<u16>(), Some(0x1234));
        assert_eq!(sample.value::<u8>(), Some(0x34));
        assert_eq!(sample.value::<i32>(), Some(-0xEDCC));
        assert_eq!(sample.value::<u64>(), None);
    }

    #[test]
    fn test_gap_has_no_value() {
        let sample = Sample {
            timestamp: 9,
            kind: RangeKind::Invalid,
            data: None,
        };
        assert!(sample.is_invalid());
        assert_eq!(sample.value::<u8>(), None);
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(u8::from(RangeKind::Data), 0);
        assert_eq!(u8::from(RangeKind::Invalid), 1);
    }
}
