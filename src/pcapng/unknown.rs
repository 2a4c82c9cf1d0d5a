use std::io::Seek;

use tracing::debug;

use crate::utils::skip;
use crate::PcapError;

use super::*;

/// Minimum total length of any block (header and trailer)
pub const BLOCK_MIN_LEN: u32 = (BLOCK_HEADER_LEN + BLOCK_TRAILER_LEN) as u32;

/// Unknown block (type not recognized, or not interpreted)
///
/// The body is skipped without being read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownBlock {
    pub block_type: u32,
    pub block_len: u32,
    /// Number of body bytes skipped
    pub skipped: u64,
}

/// Skip the body of a block
///
/// Returns the block and the number of bytes skipped.
pub(crate) fn skip_unknown_block<R: Seek + ?Sized>(
    r: &mut R,
    bh: &BlockHeader,
) -> Result<(UnknownBlock, usize), PcapError> {
    let skipped = bh.padded_length() - u64::from(BLOCK_MIN_LEN);
    debug!(
        "skipping block type {:?}, {} bytes",
        BlockType(bh.block_type),
        skipped
    );
    skip(r, skipped)?;
    let block = UnknownBlock {
        block_type: bh.block_type,
        block_len: bh.block_total_length,
        skipped,
    };
    Ok((block, skipped as usize))
}
