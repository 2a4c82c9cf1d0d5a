//! PCAPNG file format
//!
//! See <https://github.com/pcapng/pcapng> for details.
//!
//! This module reads blocks one at a time from any input providing `Read` and `Seek`, and
//! writes them to any output providing `Write`.
//!
//! The preferred method is to use a [`PcapNGReader`](struct.PcapNGReader.html), which checks
//! that the file starts with a Section Header Block followed by an Interface Description
//! Block, and then gives sequential or random access to packets.
//!
//! Blocks can also be read manually using [`read_block`](fn.read_block.html), threading a
//! [`SessionState`](struct.SessionState.html) between calls.
//!
//! ## File format and parsing
//!
//! A capture file is organized in blocks. Each block starts with its type and total length,
//! and ends with a second copy of the total length:
//!
//! ```text
//! u32 block_type | u32 block_total_length | body and options | u32 block_total_length
//! ```
//!
//! Blocks are organized in sections, each section starting with a Section Header Block
//! (SHB), and followed by blocks (interface description, statistics, packets, etc.).
//!
//! ## Endianness
//!
//! The byte order of a section is given by the byte-order magic of its Section Header Block.
//! All multi-byte fields of the blocks of this section are encoded in that order. Since the
//! byte order is not known before the magic is read, the length of the Section Header Block
//! itself is decoded again once the magic is known.
//!
//! Blocks are always written in the native byte order.

use rusticata_macros::newtype_enum;

mod block;
mod header;
mod interface_description;
mod option;
mod packet;
mod reader;
mod section_header;
mod simple_packet;
mod state;
mod time;
mod unknown;
#[cfg(feature = "serialize")]
mod writer;

pub use block::*;
pub use header::*;
pub use interface_description::*;
pub use option::*;
pub use packet::*;
pub use reader::*;
pub use section_header::*;
pub use simple_packet::*;
pub use state::*;
pub use time::*;
pub use unknown::*;
#[cfg(feature = "serialize")]
pub use writer::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Packet Block magic (obsolete)
pub const PB_MAGIC: u32 = 0x0000_0002;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Name Resolution Block magic
pub const NRB_MAGIC: u32 = 0x0000_0004;
/// Interface Statistic Block magic
pub const ISB_MAGIC: u32 = 0x0000_0005;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;

/// Byte Order magic, as read when the section uses the native byte order
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;
/// Byte Order magic, as read when the section uses the opposite byte order
pub const BOM_MAGIC_SWAPPED: u32 = 0x4D3C_2B1A;

/// Block type, as found in the block header
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct BlockType(pub u32);

newtype_enum! {
impl debug BlockType {
    InterfaceDescription = 0x0000_0001,
    Packet = 0x0000_0002,
    SimplePacket = 0x0000_0003,
    NameResolution = 0x0000_0004,
    InterfaceStatistics = 0x0000_0005,
    EnhancedPacket = 0x0000_0006,
    SectionHeader = 0x0A0D_0D0A,
}
}
