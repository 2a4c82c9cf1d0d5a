use std::io::Read;

use crate::endianness::PcapEndianness;
use crate::utils::{padded_block_len, read_full};
use crate::PcapError;

use super::SessionState;

/// Size of the block header (type and total length)
pub const BLOCK_HEADER_LEN: usize = 8;
/// Size of the trailing copy of the total length
pub const BLOCK_TRAILER_LEN: usize = 4;

/// The common header of every block
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockHeader {
    pub block_type: u32,
    /// Total length of the block, including header and trailer
    pub block_total_length: u32,
    // length bytes as found in the file, before any byte order was applied
    raw_length: [u8; 4],
}

impl BlockHeader {
    pub fn new(block_type: u32, block_total_length: u32) -> Self {
        BlockHeader {
            block_type,
            block_total_length,
            raw_length: block_total_length.to_ne_bytes(),
        }
    }

    /// Total length rounded up to the next multiple of 4
    #[inline]
    pub fn padded_length(&self) -> u64 {
        padded_block_len(self.block_total_length)
    }

    /// Decode the total length again, once the byte order of the section is known
    pub(crate) fn reinterpret_length(&mut self, en: PcapEndianness) {
        self.block_total_length = en.u32_from_bytes(self.raw_length);
    }
}

/// Read a block header
///
/// Both fields are swapped if the byte order is already known to be swapped. For a
/// Section Header Block, the length must be decoded again after the byte-order magic
/// has been read.
///
/// Returns `PcapError::Eof` if the input ends cleanly before the header.
pub fn read_header<R: Read + ?Sized>(
    r: &mut R,
    state: &SessionState,
) -> Result<BlockHeader, PcapError> {
    let mut buf = [0u8; BLOCK_HEADER_LEN];
    let actual = read_full(r, &mut buf)?;
    if actual == 0 {
        return Err(PcapError::Eof);
    }
    if actual != BLOCK_HEADER_LEN {
        return Err(PcapError::ShortRead {
            expected: BLOCK_HEADER_LEN,
            actual,
        });
    }
    let en = state.endianness();
    let (i, block_type) = en.parse_u32::<PcapError>(&buf)?;
    let (_, block_total_length) = en.parse_u32::<PcapError>(i)?;
    Ok(BlockHeader {
        block_type,
        block_total_length,
        raw_length: [buf[4], buf[5], buf[6], buf[7]],
    })
}
