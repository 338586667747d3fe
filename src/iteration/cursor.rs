use crate::common::{read_u64_checked, to_index};

/// How a cursor obtains the timestamp of the sample it points at.
///
/// Resolved once when a range is built, never per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Timestamp stored inside each sample, `position` bytes from its start.
    Explicit { position: u64 },
    /// Timestamp derived from the sample index; `next` is the current value.
    Implicit { next: u64 },
}

/// Positional cursor over one contiguous run of samples.
///
/// A data cursor points into a borrowed block buffer and moves by the
/// channel's byte stride. A gap cursor has no buffer: its position is a
/// sample index that moves by one, and that index is also its timestamp.
///
/// Cursors of the same run compare by position.
#[derive(Debug, Clone, Copy)]
pub struct SampleCursor<'a> {
    data: Option<&'a [u8]>,
    position: u64,
    stride: u64,
    timestamp: TimestampSource,
}

impl<'a> SampleCursor<'a> {
    /// Cursor over samples whose timestamps are read from the sample itself.
    ///
    /// `position` and `stride` are in bytes, `timestamp_position` is the byte
    /// offset of the u64 timestamp field inside each sample.
    pub fn explicit(data: &'a [u8], position: u64, stride: u64, timestamp_position: u64) -> Self {
        let cursor = Self {
            data: Some(data),
            position,
            stride,
            timestamp: TimestampSource::Explicit {
                position: timestamp_position,
            },
        };
        if cursor.try_timestamp().is_none() {
            tracing::warn!(
                position,
                timestamp_position,
                bytes = data.len(),
                "explicit timestamp field lies outside the buffer"
            );
        }
        cursor
    }

    /// Cursor over samples with implicit timestamps starting at `first_index`.
    pub fn implicit(data: &'a [u8], position: u64, stride: u64, first_index: u64) -> Self {
        Self {
            data: Some(data),
            position,
            stride,
            timestamp: TimestampSource::Implicit { next: first_index },
        }
    }

    /// Cursor over a gap, positioned at sample `index`.
    pub fn gap(index: u64) -> Self {
        Self {
            data: None,
            position: index,
            stride: 1,
            timestamp: TimestampSource::Implicit { next: index },
        }
    }

    /// Byte offset into the block, or the sample index for gap cursors.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn timestamp_source(&self) -> TimestampSource {
        self.timestamp
    }

    /// Returns true if the cursor points at real data.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Timestamp of the current sample, or `None` if its explicit field
    /// lies outside the buffer.
    pub fn try_timestamp(&self) -> Option<u64> {
        match (self.timestamp, self.data) {
            (TimestampSource::Explicit { position }, Some(data)) => self
                .position
                .checked_add(position)
                .and_then(|offset| read_u64_checked(data, offset)),
            (TimestampSource::Implicit { next }, _) => Some(next),
            (TimestampSource::Explicit { .. }, None) => Some(self.position),
        }
    }

    /// Timestamp of the current sample.
    ///
    /// Explicit fields are read live from the buffer. Ranges built by
    /// [`crate::StreamReader`] are bounds-checked up front; for hand-built
    /// cursors a field outside the buffer reads as 0. Use
    /// [`try_timestamp`](Self::try_timestamp) to detect that case.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.try_timestamp().unwrap_or_default()
    }

    /// Bytes of the current sample slot.
    ///
    /// The slot spans one stride, clipped to the end of the buffer; a zero
    /// stride yields everything from the sample to the end of the buffer.
    pub fn data(&self) -> Option<&'a [u8]> {
        let data = self.data?;
        let start = to_index(self.position)?;
        let end = match to_index(self.stride) {
            Some(0) | None => data.len(),
            Some(stride) => start.saturating_add(stride).min(data.len()),
        };
        data.get(start..end)
    }

    /// Move to the next sample.
    pub fn advance(&mut self) {
        self.position = self.position.saturating_add(self.stride);
        if let TimestampSource::Implicit { next } = &mut self.timestamp {
            *next = next.saturating_add(1);
        }
    }

    /// Number of samples from `self` to `end`, both inclusive.
    ///
    /// `None` if `end` lies before `self` or is not reachable by whole strides.
    pub fn steps_to(&self, end: &SampleCursor<'_>) -> Option<u64> {
        let distance = end.position.checked_sub(self.position)?;
        if self.stride == 0 {
            return (distance == 0).then_some(1);
        }
        if distance % self.stride != 0 {
            return None;
        }
        (distance / self.stride).checked_add(1)
    }
}

impl PartialEq for SampleCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl PartialOrd for SampleCursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.position.cmp(&other.position))
    }
}
