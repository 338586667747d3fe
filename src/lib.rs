#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # daqstream-rs
//!
//! A Rust library for walking the samples of data-acquisition streams
//! directly inside the raw memory blocks delivered by an acquisition device.
//!
//! A device delivers its measurements as blocks. Each block packs samples of
//! several channels, every channel with its own stride, sample count and
//! timestamp encoding (a timestamp field stored inside each sample, or an
//! implicit timestamp equal to the sample index). Separately, the device
//! reports which sample-index regions of a channel actually hold valid data.
//!
//! This crate indexes those blocks and regions and answers one question per
//! channel: *give me every sample in time order, with its timestamp and its
//! bytes, and tell me where there is no data.* Nothing is copied; the
//! iterator hands out slices of the borrowed block buffers.
//!
//! ## Features
//!
//! - **Zero-copy**: samples are `&[u8]` slots inside the caller's buffers
//! - **Two timestamp encodings**: explicit per-sample fields and implicit indices
//! - **Gap markers**: the complement of the declared valid regions is yielded
//!   as explicit invalid entries
//! - **Time-ordered merge** across any number of blocks
//! - **no_std** with `alloc` (disable default features)
//!
//! ## Quick Start
//!
//! ```
//! use daqstream_rs::{
//!     BlockChannelDescriptor, BlockDescriptor, ChannelDescriptor, DataRegion, RangeKind,
//!     StreamDescriptor, StreamReader, Result,
//! };
//!
//! fn main() -> Result<()> {
//!     // Channel 1: f64 value followed by a u64 timestamp, 16 bytes per sample
//!     let mut raw = Vec::new();
//!     for (value, time) in [(0.5f64, 1000u64), (0.75, 1010), (1.0, 1020)] {
//!         raw.extend_from_slice(&value.to_le_bytes());
//!         raw.extend_from_slice(&time.to_le_bytes());
//!     }
//!
//!     let stream = StreamDescriptor::new(1)
//!         .with_channel(ChannelDescriptor::new(1, 128).with_timestamp_position(64));
//!     let mut reader = StreamReader::with_descriptor(stream);
//!     reader.add_data_block(
//!         BlockDescriptor::new(1).with_channel(BlockChannelDescriptor::new(1, 0, 3, 0)),
//!         &raw,
//!     );
//!
//!     for sample in reader.create_channel_iterator(1)? {
//!         assert_eq!(sample.kind, RangeKind::Data);
//!         println!("{} -> {:?}", sample.timestamp, sample.value::<f64>());
//!     }
//!
//!     // Declaring valid regions turns everything outside them into gap markers
//!     reader.add_data_region(DataRegion::new(1, 1000, 1020));
//!     let first = reader.create_channel_iterator(1)?.next();
//!     assert_eq!(first.map(|s| s.kind), Some(RangeKind::Invalid));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`descriptors`] | Stream, channel, block and region metadata |
//! | [`iteration`] | Sample cursors and the time-ordered [`StreamIterator`] |
//! | [`reader`] | The [`StreamReader`] block and region index |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T>`]. Requesting a channel that the
//! stream descriptor does not contain yields [`Error::InvalidChannel`].
//! Descriptors whose strides or offsets are not whole bytes are a bug in the
//! producer and cause a panic.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` when iterators are built or
//! state is cleared, `trace` for every indexed block and region, and `warn`
//! for overlapping regions.

extern crate alloc;

mod common;

pub mod descriptors;
pub mod error;
pub mod iteration;
pub mod reader;

// Re-export commonly used types at the crate root
pub use descriptors::{
    BlockChannelDescriptor, BlockDescriptor, ChannelDescriptor, DataRegion, Region, RegionSet,
    StreamDescriptor,
};
pub use error::{Error, Result};
pub use iteration::{RangeKind, Sample, SampleCursor, SampleValue, StreamIterator};
pub use reader::StreamReader;
