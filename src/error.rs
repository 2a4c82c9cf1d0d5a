use nom::error::{ErrorKind, ParseError};
use std::io;
use thiserror::Error;

/// Errors raised while reading or writing pcapng blocks
///
/// Errors fall in two families: I/O errors (the underlying handle failed, or returned less
/// data than a block declared), and format errors (the data was read but does not describe a
/// valid block). Both are terminal for the current block operation.
#[derive(Debug, Error)]
pub enum PcapError {
    /// No more data: the input ended cleanly on a block boundary
    #[error("end of file")]
    Eof,
    /// The underlying handle returned an error (read, write or seek)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The input ended in the middle of a block
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// The byte-order magic of a section header is not a known value
    #[error("byte-order magic {0:#010x} not recognized")]
    HeaderNotRecognized(u32),
    /// The section header declares a version other than 1.0
    #[error("unsupported section version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },
    /// An option declares more content than allowed
    #[error("option {code} length {len} larger than limit {max}")]
    OptionTooLong { code: u16, len: u16, max: usize },
    /// The leading and trailing block lengths differ
    #[error("block length mismatch: header {header}, trailer {trailer}")]
    LengthMismatch { header: u32, trailer: u32 },
    /// The declared block length is inconsistent with the block content
    #[error("invalid block length {0}")]
    InvalidBlockLength(u32),
    /// The interface snapshot length is not realistic (probably a byte-order problem)
    #[error("snapshot length {0} unrealistic")]
    SnaplenTooLarge(u32),
    /// The packet captured length cannot fit in the declared block
    #[error("captured length {caplen} does not fit in block of length {block_len}")]
    PayloadTooLarge { caplen: u32, block_len: u32 },
    /// A block of the wrong type was found where a specific type is required
    #[error("unexpected block type {found:#010x}, expected {expected}")]
    UnexpectedBlock { expected: &'static str, found: u32 },

    /// This block type cannot be written
    #[error("writing block type {0:#010x} is not supported")]
    UnsupportedBlockWrite(u32),
    /// Operation is not allowed in the current reader state
    #[error("invalid reader state: {0}")]
    InvalidState(&'static str),
    /// Serialization failed for a reason other than I/O
    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("nom error: {0:?}")]
    NomError(ErrorKind),
}

impl PcapError {
    /// Returns true if the error was raised by the underlying handle
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            PcapError::Eof | PcapError::Io(_) | PcapError::ShortRead { .. }
        )
    }

    /// Returns true if the error describes malformed data
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PcapError::HeaderNotRecognized(_)
                | PcapError::UnsupportedVersion { .. }
                | PcapError::OptionTooLong { .. }
                | PcapError::LengthMismatch { .. }
                | PcapError::InvalidBlockLength(_)
                | PcapError::SnaplenTooLarge(_)
                | PcapError::PayloadTooLarge { .. }
                | PcapError::UnexpectedBlock { .. }
                | PcapError::NomError(_)
        )
    }
}

impl<I> ParseError<I> for PcapError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        PcapError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        PcapError::NomError(kind)
    }
}

impl From<nom::Err<PcapError>> for PcapError {
    fn from(err: nom::Err<PcapError>) -> Self {
        match err {
            nom::Err::Incomplete(_) => PcapError::NomError(ErrorKind::Eof),
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

#[cfg(feature = "serialize")]
impl From<cookie_factory::GenError> for PcapError {
    fn from(err: cookie_factory::GenError) -> Self {
        match err {
            cookie_factory::GenError::IoError(e) => PcapError::Io(e),
            e => PcapError::Serialize(format!("{:?}", e)),
        }
    }
}
