use std::io::{Read, Seek};
#[cfg(feature = "serialize")]
use std::io::Write;

use tracing::warn;

use crate::config::ReaderConfig;
use crate::utils::read_fixed;
use crate::PcapError;

use super::*;

/// A block from a PcapNG file
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Block {
    SectionHeader(SectionHeaderBlock),
    InterfaceDescription(InterfaceDescriptionBlock),
    /// Enhanced Packet Block, or obsolete Packet Block
    Packet(PacketBlock),
    SimplePacket(SimplePacketBlock),
    Unknown(UnknownBlock),
}

impl Block {
    /// Returns true if the block is an Enhanced Packet Block or an obsolete Packet Block
    ///
    /// Simple Packet Blocks are not reported as packets by the reader.
    pub fn is_packet_block(&self) -> bool {
        matches!(self, Block::Packet(_))
    }

    /// Return the magic number of the block
    pub fn block_type(&self) -> u32 {
        match self {
            Block::SectionHeader(_) => SHB_MAGIC,
            Block::InterfaceDescription(_) => IDB_MAGIC,
            Block::Packet(pb) => pb.block_type,
            Block::SimplePacket(_) => SPB_MAGIC,
            Block::Unknown(ub) => ub.block_type,
        }
    }
}

fn min_block_len(block_type: u32) -> u32 {
    match block_type {
        SHB_MAGIC => SHB_MIN_LEN,
        IDB_MAGIC => IDB_MIN_LEN,
        PB_MAGIC | EPB_MAGIC => PB_MIN_LEN,
        SPB_MAGIC => SPB_MIN_LEN,
        _ => BLOCK_MIN_LEN,
    }
}

/// Read one block
///
/// The block header is read, then the body is decoded according to the block type, and the
/// trailing copy of the block length is checked. Packet data (for packet blocks) is read
/// into `data`. Blocks of unknown type are skipped.
///
/// `state` is updated by Section Header Blocks (byte order and version) and Interface
/// Description Blocks (FCS length), and must be kept between calls for the same input.
///
/// Returns the block and the total number of bytes consumed.
///
/// ## Errors
///
/// `PcapError::Eof` is returned if the input ends cleanly before the next block. Other
/// errors leave the input at an unspecified position.
pub fn read_block<R: Read + Seek + ?Sized>(
    r: &mut R,
    state: &mut SessionState,
    config: &ReaderConfig,
    data: &mut Vec<u8>,
) -> Result<(Block, usize), PcapError> {
    let mut bh = read_header(r, state)?;
    let (block, body_len) = match bh.block_type {
        SHB_MAGIC => {
            // the length is checked once the byte order is known
            let (shb, sz) = read_section_header(r, &mut bh, state, config)?;
            (Block::SectionHeader(shb), sz)
        }
        block_type => {
            if bh.block_total_length < min_block_len(block_type) {
                warn!(
                    "block type {:?}: total length {} too small",
                    BlockType(block_type),
                    bh.block_total_length
                );
                return Err(PcapError::InvalidBlockLength(bh.block_total_length));
            }
            match block_type {
                IDB_MAGIC => {
                    let (idb, sz) = read_interface_description(r, &bh, state, config)?;
                    (Block::InterfaceDescription(idb), sz)
                }
                PB_MAGIC | EPB_MAGIC => {
                    let (pb, sz) = read_packet(r, &bh, state, config, data)?;
                    (Block::Packet(pb), sz)
                }
                SPB_MAGIC => {
                    let (spb, sz) = read_simple_packet(r, &bh, state, data)?;
                    (Block::SimplePacket(spb), sz)
                }
                _ => {
                    let (ub, sz) = skip_unknown_block(r, &bh)?;
                    (Block::Unknown(ub), sz)
                }
            }
        }
    };
    let trailer = read_fixed::<_, BLOCK_TRAILER_LEN>(r)?;
    let block_len2 = state.endianness().u32_from_bytes(trailer);
    if block_len2 != bh.block_total_length {
        warn!(
            "block type {:?}: total length {} differs from trailing length {}",
            BlockType(bh.block_type),
            bh.block_total_length,
            block_len2
        );
        return Err(PcapError::LengthMismatch {
            header: bh.block_total_length,
            trailer: block_len2,
        });
    }
    Ok((block, BLOCK_HEADER_LEN + body_len + BLOCK_TRAILER_LEN))
}

/// Write one block, in native byte order
///
/// Only Section Header Blocks, Interface Description Blocks and Enhanced Packet Blocks can be
/// written. For an Enhanced Packet Block, `data` is the packet data and the captured length is
/// its length; `data` is ignored for other blocks.
///
/// Returns the number of bytes written.
#[cfg(feature = "serialize")]
pub fn write_block<W: Write>(w: &mut W, block: &Block, data: &[u8]) -> Result<usize, PcapError> {
    use crate::serialize::*;
    match block {
        Block::SectionHeader(shb) => write_section_header(w, shb),
        Block::InterfaceDescription(idb) => write_interface_description(w, idb),
        Block::Packet(pb) if pb.is_enhanced() => write_enhanced_packet(w, pb, data),
        _ => {
            warn!(
                "writing block type {:?} is not supported",
                BlockType(block.block_type())
            );
            Err(PcapError::UnsupportedBlockWrite(block.block_type()))
        }
    }
}
