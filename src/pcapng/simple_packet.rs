use std::io::{Read, Seek};

use tracing::trace;

use crate::utils::{padding_len, read_fixed, read_to_vec, skip};
use crate::PcapError;

use super::*;

/// Fixed part of the Simple Packet Block body (original length)
const SPB_FIXED_LEN: usize = 4;

/// Minimum total length of a Simple Packet Block
pub const SPB_MIN_LEN: u32 = 16;

/// The Simple Packet Block (SPB) is a lightweight container for storing
/// the packets coming from the network.
///
/// The captured length is not stored in the block: it is derived from the block length, and
/// bounded by the original length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimplePacketBlock {
    /// Original packet length
    pub origlen: u32,
    /// Captured packet length
    pub caplen: u32,
    /// Frame check sequence length, or -1 if unknown
    pub fcs_len: i8,
}

/// Read the body of a Simple Packet Block
///
/// The packet data is read into `data`. Bytes of the block beyond the original length are
/// skipped.
///
/// Returns the block and the number of bytes consumed after the header.
pub(crate) fn read_simple_packet<R: Read + Seek + ?Sized>(
    r: &mut R,
    bh: &BlockHeader,
    state: &SessionState,
    data: &mut Vec<u8>,
) -> Result<(SimplePacketBlock, usize), PcapError> {
    let fixed = read_fixed::<_, SPB_FIXED_LEN>(r)?;
    let (_, origlen) = state.endianness().parse_u32::<PcapError>(&fixed)?;
    let data_len = bh
        .block_total_length
        .checked_sub(SPB_MIN_LEN)
        .ok_or(PcapError::InvalidBlockLength(bh.block_total_length))?;
    let caplen = data_len.min(origlen);
    trace!("SPB: origlen {}, caplen {}", origlen, caplen);
    read_to_vec(r, data, caplen)?;
    let padding = padding_len(data_len);
    skip(r, u64::from(data_len - caplen) + u64::from(padding))?;
    let spb = SimplePacketBlock {
        origlen,
        caplen,
        fcs_len: state.fcs_len,
    };
    Ok((spb, SPB_FIXED_LEN + data_len as usize + padding as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn spb_caplen_from_block_length() {
        let mut body = Vec::new();
        body.extend_from_slice(&60u32.to_ne_bytes());
        body.extend_from_slice(&[0xaa; 6]);
        body.extend_from_slice(&[0, 0]);
        // 8 (header) + 4 (origlen) + 6 (data) + 4 (trailer)
        let bh = BlockHeader::new(SPB_MAGIC, 22);
        let state = SessionState::default();
        let mut data = Vec::new();
        let mut c = Cursor::new(body);
        let (spb, sz) = read_simple_packet(&mut c, &bh, &state, &mut data).unwrap();
        assert_eq!(spb.caplen, 6);
        assert_eq!(spb.origlen, 60);
        assert_eq!(sz, 12);
        assert_eq!(c.position(), 12);
        assert_eq!(data, vec![0xaa; 6]);
    }

    #[test]
    fn spb_padding_trimmed_to_origlen() {
        let mut body = Vec::new();
        body.extend_from_slice(&3u32.to_ne_bytes());
        body.extend_from_slice(&[1, 2, 3, 0]);
        let bh = BlockHeader::new(SPB_MAGIC, 20);
        let state = SessionState::default();
        let mut data = Vec::new();
        let mut c = Cursor::new(body);
        let (spb, sz) = read_simple_packet(&mut c, &bh, &state, &mut data).unwrap();
        assert_eq!(spb.caplen, 3);
        assert_eq!(sz, 8);
        assert_eq!(c.position(), 8);
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn spb_huge_block_short_input() {
        let mut body = Vec::new();
        body.extend_from_slice(&u32::MAX.to_ne_bytes());
        body.extend_from_slice(&[1, 2, 3, 4]);
        let bh = BlockHeader::new(SPB_MAGIC, 0xffff_fff0);
        let state = SessionState::default();
        let mut data = Vec::new();
        let res = read_simple_packet(&mut Cursor::new(body), &bh, &state, &mut data);
        assert!(matches!(res, Err(PcapError::ShortRead { actual: 4, .. })));
        assert!(data.capacity() < 0x10_0000);
    }
}
