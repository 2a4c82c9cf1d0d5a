use std::io::{Read, Seek};

use tracing::{debug, trace, warn};

use crate::config::ReaderConfig;
use crate::utils::{padding_len, read_fixed, read_to_vec, skip};
use crate::PcapError;

use super::*;

/// Fixed part of the packet block bodies (interface, timestamp and lengths)
const PB_FIXED_LEN: usize = 20;

/// Minimum total length of a Packet Block or Enhanced Packet Block
pub const PB_MIN_LEN: u32 = 32;

/// A packet record, read from an Enhanced Packet Block (EPB) or from the obsolete
/// Packet Block (PB)
///
/// Both kinds are handled identically, except for the width of the interface ID. The packet
/// data is not stored in the block: it is read into a buffer provided by the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PacketBlock {
    /// `EPB_MAGIC` or `PB_MAGIC`
    pub block_type: u32,
    pub if_id: u32,
    pub ts_high: u32,
    pub ts_low: u32,
    /// Captured packet length
    pub caplen: u32,
    /// Original packet length
    pub origlen: u32,
    /// Frame check sequence length, or -1 if unknown
    pub fcs_len: i8,
    pub comment: Option<String>,
    pub drop_count: Option<u64>,
    pub flags: Option<u32>,
}

impl PacketBlock {
    /// Build an Enhanced Packet Block on interface 0
    pub fn enhanced(ts_high: u32, ts_low: u32, caplen: u32, origlen: u32) -> Self {
        PacketBlock {
            block_type: EPB_MAGIC,
            if_id: 0,
            ts_high,
            ts_low,
            caplen,
            origlen,
            fcs_len: -1,
            comment: None,
            drop_count: None,
            flags: None,
        }
    }

    #[inline]
    pub fn is_enhanced(&self) -> bool {
        self.block_type == EPB_MAGIC
    }

    #[inline]
    pub fn truncated(&self) -> bool {
        self.origlen != self.caplen
    }

    /// Decode the packet timestamp
    ///
    /// The resolution is given by the `if_tsresol` option of the Interface Description Block.
    ///
    /// Return the timestamp seconds and fractional part (in resolution units)
    #[inline]
    pub fn decode_ts(&self, resolution: u64) -> (u32, u32) {
        build_ts(self.ts_high, self.ts_low, resolution)
    }

    #[cfg(feature = "serialize")]
    pub(crate) fn options(&self) -> Result<Vec<PcapNGOption>, PcapError> {
        let mut options = Vec::new();
        if let Some(comment) = &self.comment {
            options.push(PcapNGOption::from_text(OptionCode::Comment, comment)?);
        }
        if let Some(flags) = self.flags {
            options.push(PcapNGOption::new(
                OptionCode::EpbFlags,
                flags.to_ne_bytes().to_vec(),
            )?);
        }
        if let Some(drop_count) = self.drop_count {
            options.push(PcapNGOption::new(
                OptionCode::EpbDropCount,
                drop_count.to_ne_bytes().to_vec(),
            )?);
        }
        Ok(options)
    }
}

impl OptionHandler for PacketBlock {
    const NAME: &'static str = "PB";

    fn handle_option(&mut self, option: &PcapNGOption, state: &mut SessionState) {
        match option.code {
            OptionCode::Comment => {
                self.comment = option_string(Self::NAME, "opt_comment", option);
            }
            OptionCode::EpbFlags => match option.as_u32(state.endianness()) {
                Some(flags) => {
                    self.flags = Some(flags);
                    trace!("PB: pack_flags {:#x}", flags);
                }
                None => warn!("PB: pack_flags length {} not 4 as expected", option.len),
            },
            OptionCode::EpbDropCount if self.is_enhanced() => {
                match option.as_u64(state.endianness()) {
                    Some(count) => {
                        self.drop_count = Some(count);
                        trace!("PB: drop_count {}", count);
                    }
                    None => warn!("PB: drop_count length {} not 8 as expected", option.len),
                }
            }
            _ => {
                debug!(
                    "PB: unknown option {} - ignoring {} bytes",
                    option.code.0, option.len
                );
            }
        }
    }
}

/// Read the body of a packet block (enhanced or obsolete)
///
/// The packet data is read into `data`, which is resized to the captured length.
///
/// Returns the block and the number of bytes consumed after the header.
pub(crate) fn read_packet<R: Read + Seek + ?Sized>(
    r: &mut R,
    bh: &BlockHeader,
    state: &mut SessionState,
    config: &ReaderConfig,
    data: &mut Vec<u8>,
) -> Result<(PacketBlock, usize), PcapError> {
    let fixed = read_fixed::<_, PB_FIXED_LEN>(r)?;
    let en = state.endianness();
    let (i, if_id, drop_count) = if bh.block_type == PB_MAGIC {
        let (i, if_id) = en.parse_u16::<PcapError>(&fixed)?;
        let (i, drops) = en.parse_u16::<PcapError>(i)?;
        let drop_count = if drops == u16::MAX {
            None
        } else {
            Some(u64::from(drops))
        };
        (i, u32::from(if_id), drop_count)
    } else {
        let (i, if_id) = en.parse_u32::<PcapError>(&fixed)?;
        (i, if_id, None)
    };
    let (i, ts_high) = en.parse_u32::<PcapError>(i)?;
    let (i, ts_low) = en.parse_u32::<PcapError>(i)?;
    let (i, caplen) = en.parse_u32::<PcapError>(i)?;
    let (_, origlen) = en.parse_u32::<PcapError>(i)?;
    // some producers do not count the data padding in the block length
    let padded_len = bh.padded_length();
    if u64::from(caplen) + u64::from(PB_MIN_LEN) > padded_len {
        warn!(
            "PB: captured length {} too large for block length {}",
            caplen, bh.block_total_length
        );
        return Err(PcapError::PayloadTooLarge {
            caplen,
            block_len: bh.block_total_length,
        });
    }
    trace!(
        "PB: if_id {}, caplen {}, origlen {}",
        if_id,
        caplen,
        origlen
    );
    read_to_vec(r, data, caplen)?;
    let padding = padding_len(caplen);
    skip(r, u64::from(padding))?;
    let mut pb = PacketBlock {
        block_type: bh.block_type,
        if_id,
        ts_high,
        ts_low,
        caplen,
        origlen,
        fcs_len: state.fcs_len,
        comment: None,
        drop_count,
        flags: None,
    };
    let consumed = PB_FIXED_LEN + caplen as usize + padding as usize;
    let remaining =
        padded_len as i64 - (BLOCK_HEADER_LEN + consumed + BLOCK_TRAILER_LEN) as i64;
    let options_len = read_options(
        r,
        state,
        config,
        bh.block_total_length,
        remaining,
        &mut pb,
    )?;
    Ok((pb, consumed + options_len))
}
