// src/iteration/mod.rs
//! Zero-copy traversal of channel samples.
//!
//! - [`SampleCursor`]: position, stride and timestamp source of one run of samples
//! - [`StreamIterator`]: merges data runs and gap runs into one time-ordered sequence
//! - [`Sample`]: an item of that sequence, with typed access through [`SampleValue`]

mod cursor;
mod sample;
mod stream_iterator;

pub use cursor::{SampleCursor, TimestampSource};
pub use sample::{RangeKind, Sample, SampleValue};
pub use stream_iterator::{RangeInfo, StreamIterator};
