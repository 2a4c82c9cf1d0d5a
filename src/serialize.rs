use crate::pcapng::*;
use crate::PcapError;
use cookie_factory::bytes::{ne_i64, ne_u16, ne_u32};
use cookie_factory::combinator::slice;
use cookie_factory::multi::many_ref;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, SerializeFn};
use rusticata_macros::align32;
use std::convert::TryFrom;
use std::io::Write;

/// Common trait for all serialization functions
///
/// Blocks are serialized in the native byte order. Lengths are computed from the content,
/// and an end-of-options marker is appended when the block has options.
pub trait ToVec {
    /// Serialize to bytes representation (native byte order)
    fn to_vec(&self) -> Result<Vec<u8>, PcapError>;
}

fn padding_for<'a, W: Write + 'a>(unaligned_length: u32) -> impl SerializeFn<W> + 'a {
    let length = align32!(unaligned_length) - unaligned_length;
    slice(if length > 0 {
        &[0, 0, 0, 0][..length as usize]
    } else {
        b""
    })
}

fn pcapngoption_ne<'a, 'b: 'a, W: Write + 'a>(i: &'b PcapNGOption) -> impl SerializeFn<W> + 'a {
    tuple((
        ne_u16(i.code.0),
        ne_u16(i.len),
        slice(&i.value),
        padding_for(i.value.len() as u32),
    ))
}

impl ToVec for PcapNGOption {
    fn to_vec(&self) -> Result<Vec<u8>, PcapError> {
        let mut v = Vec::with_capacity(self.padded_len());
        gen(pcapngoption_ne(self), &mut v)?;
        Ok(v)
    }
}

fn options_length(options: &[PcapNGOption]) -> usize {
    options.iter().map(|o| o.padded_len()).sum()
}

fn fix_options(options: &mut Vec<PcapNGOption>) {
    options.retain(|e| e.code != OptionCode::EndOfOpt);
    if options.is_empty() {
        // No EndOfOpt is required if there are no options.
    } else {
        options.push(PcapNGOption::end_of_options());
    }
}

fn block_length(content_length: usize) -> Result<u32, PcapError> {
    let length = BLOCK_HEADER_LEN + content_length + BLOCK_TRAILER_LEN;
    u32::try_from(length).map_err(|_| PcapError::Serialize(format!("block too large ({})", length)))
}

/// Serialize a Section Header Block to `w`
///
/// Returns the number of bytes written.
pub(crate) fn write_section_header<W: Write>(
    w: &mut W,
    shb: &SectionHeaderBlock,
) -> Result<usize, PcapError> {
    let mut options = shb.options()?;
    fix_options(&mut options);
    let length = block_length(16 + options_length(&options))?;
    let (_, sz) = gen(
        tuple((
            ne_u32(SHB_MAGIC),
            ne_u32(length),
            ne_u32(BOM_MAGIC),
            ne_u16(1),
            ne_u16(0),
            ne_i64(-1),
            many_ref(&options, pcapngoption_ne),
            ne_u32(length),
        )),
        w,
    )?;
    Ok(sz as usize)
}

/// Serialize an Interface Description Block to `w`
///
/// Returns the number of bytes written.
pub(crate) fn write_interface_description<W: Write>(
    w: &mut W,
    idb: &InterfaceDescriptionBlock,
) -> Result<usize, PcapError> {
    let mut options = idb.options()?;
    fix_options(&mut options);
    let length = block_length(8 + options_length(&options))?;
    let (_, sz) = gen(
        tuple((
            ne_u32(IDB_MAGIC),
            ne_u32(length),
            ne_u16(idb.linktype.0),
            ne_u16(0),
            ne_u32(idb.snaplen),
            many_ref(&options, pcapngoption_ne),
            ne_u32(length),
        )),
        w,
    )?;
    Ok(sz as usize)
}

/// Serialize an Enhanced Packet Block to `w`
///
/// The captured length is the length of `data`, which is padded to 4 bytes.
///
/// Returns the number of bytes written.
pub(crate) fn write_enhanced_packet<W: Write>(
    w: &mut W,
    pb: &PacketBlock,
    data: &[u8],
) -> Result<usize, PcapError> {
    let caplen = u32::try_from(data.len())
        .map_err(|_| PcapError::Serialize(format!("packet too large ({})", data.len())))?;
    let mut options = pb.options()?;
    fix_options(&mut options);
    let length = block_length(20 + align32!(data.len()) + options_length(&options))?;
    let (_, sz) = gen(
        tuple((
            ne_u32(EPB_MAGIC),
            ne_u32(length),
            ne_u32(pb.if_id),
            ne_u32(pb.ts_high),
            ne_u32(pb.ts_low),
            ne_u32(caplen),
            ne_u32(pb.origlen),
            slice(data),
            padding_for(caplen),
            many_ref(&options, pcapngoption_ne),
            ne_u32(length),
        )),
        w,
    )?;
    Ok(sz as usize)
}

impl ToVec for SectionHeaderBlock {
    fn to_vec(&self) -> Result<Vec<u8>, PcapError> {
        let mut v = Vec::with_capacity(64);
        write_section_header(&mut v, self)?;
        Ok(v)
    }
}

impl ToVec for InterfaceDescriptionBlock {
    fn to_vec(&self) -> Result<Vec<u8>, PcapError> {
        let mut v = Vec::with_capacity(64);
        write_interface_description(&mut v, self)?;
        Ok(v)
    }
}
