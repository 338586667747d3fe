//! Error types for stream reading operations.
//!
//! This module defines the [`Error`] enum which represents the failures a
//! caller can recover from when building channel iterators or persisting
//! descriptors.
//!
//! Malformed descriptors (a stride, block offset or timestamp position that is
//! not a whole number of bytes) are not represented here: they indicate a bug
//! in whatever produced the descriptor and cause a panic when an iterator is
//! built.
//!
//! # Example
//!
//! ```
//! use daqstream_rs::{Error, StreamDescriptor, StreamReader};
//!
//! let reader = StreamReader::with_descriptor(StreamDescriptor::new(1));
//! match reader.create_channel_iterator(42) {
//!     Err(Error::InvalidChannel { channel_id }) => assert_eq!(channel_id, 42),
//!     _ => unreachable!("stream has no channels"),
//! }
//! ```

use alloc::string::String;
use core::fmt;

/// Errors that can occur while reading acquisition streams.
#[derive(Debug)]
pub enum Error {
    /// The requested channel is not part of the current stream descriptor.
    ///
    /// Use [`crate::StreamReader::has_channel`] to check beforehand.
    InvalidChannel {
        /// The channel id that was requested
        channel_id: u64,
    },

    /// A block buffer is too small for the samples its descriptor places in it.
    ///
    /// Either the last sample of a channel placement or its explicit
    /// timestamp field lies beyond the end of the borrowed buffer.
    TooShortBuffer {
        /// Actual number of bytes available
        actual: usize,
        /// Minimum number of bytes required
        expected: usize,
        /// Source file where the error was detected
        file: &'static str,
        /// Line number where the error was detected
        line: u32,
    },

    /// An I/O error occurred while reading or writing a descriptor file.
    ///
    /// Only available with the `std` feature.
    #[cfg(feature = "std")]
    IOError(std::io::Error),

    /// A descriptor could not be converted to or from JSON.
    DescriptorSerializationError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannel { channel_id } => {
                write!(f, "Invalid channel ID: {channel_id}")
            }
            Error::TooShortBuffer {
                actual,
                expected,
                file,
                line,
            } => write!(
                f,
                "Buffer too small at {file}:{line}: need at least {expected} bytes, got {actual}"
            ),
            #[cfg(feature = "std")]
            Error::IOError(e) => write!(f, "I/O error: {e}"),
            Error::DescriptorSerializationError(s) => {
                write!(f, "Descriptor serialization error: {s}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}

/// A specialized Result type for stream reading operations.
///
/// This is defined as `core::result::Result<T, Error>` for convenience.
pub type Result<T> = core::result::Result<T, Error>;
