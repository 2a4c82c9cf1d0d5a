use std::io::Write;

use tracing::debug;

use crate::capture::Capture;
use crate::error::PcapError;
use crate::linktype::Linktype;
use crate::pcapng::*;

/// Packet writer producing a pcap-ng file
///
/// A Section Header Block and an Interface Description Block are written when the writer is
/// created. Each packet is then written as an Enhanced Packet Block on interface 0. All
/// blocks use the native byte order.
///
/// ## Example
///
/// ```rust
/// use pcapng_codec::*;
///
/// let mut file = Vec::new();
/// let mut writer = PcapNGWriter::new(&mut file, Linktype::ETHERNET, 65535).expect("writer");
/// let record = PacketRecord {
///     caplen: 4,
///     origlen: 60,
///     ts_sec: 1_340_954_905,
///     ts_frac: 298_858,
///     ..PacketRecord::default()
/// };
/// writer.write_packet(&record, &[1, 2, 3, 4]).expect("write_packet");
/// // SHB (28) + IDB (20) + EPB (36)
/// assert_eq!(writer.bytes_dumped(), 84);
/// ```
pub struct PcapNGWriter<W>
where
    W: Write,
{
    writer: W,
    linktype: Linktype,
    snaplen: u32,
    ts_precision: TsPrecision,
    bytes_dumped: u64,
}

impl<W> PcapNGWriter<W>
where
    W: Write,
{
    /// Creates a new `PcapNGWriter<W>` with microsecond timestamps, and writes the file
    /// headers
    pub fn new(writer: W, linktype: Linktype, snaplen: u32) -> Result<PcapNGWriter<W>, PcapError> {
        Self::with_precision(writer, linktype, snaplen, TsPrecision::Micro)
    }

    /// Creates a new `PcapNGWriter<W>` with the provided timestamp precision, and writes the
    /// file headers
    pub fn with_precision(
        writer: W,
        linktype: Linktype,
        snaplen: u32,
        ts_precision: TsPrecision,
    ) -> Result<PcapNGWriter<W>, PcapError> {
        let mut w = PcapNGWriter {
            writer,
            linktype,
            snaplen,
            ts_precision,
            bytes_dumped: 0,
        };
        let idb = InterfaceDescriptionBlock {
            if_tsresol: ts_precision.tsresol(),
            ..InterfaceDescriptionBlock::new(linktype, snaplen)
        };
        w.write_block(&Block::SectionHeader(SectionHeaderBlock::default()), &[])?;
        w.write_block(&Block::InterfaceDescription(idb), &[])?;
        debug!(
            "pcapng: writer created, linktype {}, snaplen {}",
            linktype, snaplen
        );
        Ok(w)
    }

    /// Write one block. See [`write_block`](fn.write_block.html).
    pub fn write_block(&mut self, block: &Block, data: &[u8]) -> Result<usize, PcapError> {
        let sz = write_block(&mut self.writer, block, data)?;
        self.bytes_dumped += sz as u64;
        Ok(sz)
    }

    /// Write a packet as an Enhanced Packet Block
    ///
    /// The captured length written is the length of `data`.
    pub fn write_packet(&mut self, record: &PacketRecord, data: &[u8]) -> Result<usize, PcapError> {
        let pb = record.to_block(self.ts_precision);
        self.write_block(&Block::Packet(pb), data)
    }

    /// Number of bytes written so far
    #[inline]
    pub fn bytes_dumped(&self) -> u64 {
        self.bytes_dumped
    }

    pub fn flush(&mut self) -> Result<(), PcapError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Capture for PcapNGWriter<W>
where
    W: Write,
{
    fn get_datalink(&self) -> Linktype {
        self.linktype
    }

    fn get_snaplen(&self) -> u32 {
        self.snaplen
    }

    fn get_ts_precision(&self) -> TsPrecision {
        self.ts_precision
    }
}
