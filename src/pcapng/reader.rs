use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, warn};

use crate::capture::Capture;
use crate::config::ReaderConfig;
use crate::error::PcapError;
use crate::linktype::Linktype;
use crate::pcapng::*;

/// Progress of a reader through the start of a file
///
/// A file is usable only once it has been opened: its first block must be a Section Header
/// Block, and its second block an Interface Description Block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReaderState {
    Unopened,
    ExpectSectionHeader,
    ExpectInterfaceDescription,
    Ready,
    Closed,
}

/// File-wide attributes, established when the file is opened
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptureInfo {
    /// Declared packet encapsulation
    pub linktype: Linktype,
    pub snaplen: u32,
    pub ts_precision: TsPrecision,
    /// First Section Header Block of the file
    pub section: SectionHeaderBlock,
    /// First Interface Description Block of the file
    pub interface: InterfaceDescriptionBlock,
}

impl Capture for CaptureInfo {
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

/// A packet, as returned by the reader or given to the writer
///
/// For microsecond and nanosecond precisions, `ts_sec` is the number of seconds since the
/// epoch, and `ts_frac` the fractional part in precision units. For other precisions the
/// timestamp is not converted: `ts_sec` and `ts_frac` hold the high and low 32 bits of the
/// raw timestamp.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PacketRecord {
    pub caplen: u32,
    pub origlen: u32,
    pub ts_sec: u32,
    pub ts_frac: u32,
    /// Frame check sequence length, or -1 if unknown
    pub fcs_len: i8,
    pub flags: Option<u32>,
    pub comment: Option<String>,
    pub drop_count: Option<u64>,
}

impl PacketRecord {
    /// Build a record from a packet block, converting the timestamp to `precision`
    pub fn from_block(pb: &PacketBlock, precision: TsPrecision) -> Self {
        let (ts_sec, ts_frac) = match precision.resolution() {
            Some(resolution) => pb.decode_ts(resolution),
            None => (pb.ts_high, pb.ts_low),
        };
        PacketRecord {
            caplen: pb.caplen,
            origlen: pb.origlen,
            ts_sec,
            ts_frac,
            fcs_len: pb.fcs_len,
            flags: pb.flags,
            comment: pb.comment.clone(),
            drop_count: pb.drop_count,
        }
    }

    /// Build an Enhanced Packet Block from this record, converting the timestamp from
    /// `precision`
    pub fn to_block(&self, precision: TsPrecision) -> PacketBlock {
        let (ts_high, ts_low) = match precision.resolution() {
            Some(resolution) => split_ts(self.ts_sec, self.ts_frac, resolution),
            None => (self.ts_sec, self.ts_frac),
        };
        PacketBlock {
            comment: self.comment.clone(),
            drop_count: self.drop_count,
            flags: self.flags,
            fcs_len: self.fcs_len,
            ..PacketBlock::enhanced(ts_high, ts_low, self.caplen, self.origlen)
        }
    }
}

/// Packet reader over a pcap-ng file
///
/// ## Pcap-NG Reader
///
/// The reader works on any input providing the `Read` and `Seek` traits, and reads one block
/// at a time. The packet data of the last packet read is kept in an internal buffer, reused
/// between calls, and accessible with [`data`](#method.data).
///
/// The file must be opened before packets can be read: [`open`](#method.open) checks that
/// the file starts with a Section Header Block followed by an Interface Description Block, and
/// establishes the capture attributes (link type, snapshot length, timestamp precision).
///
/// Packets are then read sequentially using [`next_packet`](#method.next_packet), which skips
/// all blocks not holding a packet (statistics, name resolution, simple packet blocks, etc.),
/// or randomly using [`seek_read`](#method.seek_read) with an offset returned by
/// `next_packet`.
///
/// ## Example
///
/// ```rust
/// use pcapng_codec::*;
/// use std::io::Cursor;
///
/// # let mut file = Vec::new();
/// # let mut writer = PcapNGWriter::new(&mut file, Linktype::ETHERNET, 65535).unwrap();
/// # writer.write_packet(&PacketRecord { caplen: 3, origlen: 3, ..PacketRecord::default() }, &[1, 2, 3]).unwrap();
/// # drop(writer);
/// let mut reader = PcapNGReader::from_reader(Cursor::new(file)).expect("PcapNGReader");
/// assert_eq!(reader.info().unwrap().linktype, Linktype::ETHERNET);
/// let mut num_packets = 0;
/// loop {
///     match reader.next_packet() {
///         Ok((_offset, record)) => {
///             assert_eq!(reader.data().len(), record.caplen as usize);
///             num_packets += 1;
///         }
///         Err(PcapError::Eof) => break,
///         Err(e) => panic!("error while reading: {:?}", e),
///     }
/// }
/// assert_eq!(num_packets, 1);
/// ```
pub struct PcapNGReader<R>
where
    R: Read + Seek,
{
    reader: R,
    state: ReaderState,
    session: SessionState,
    config: ReaderConfig,
    info: Option<CaptureInfo>,
    data: Vec<u8>,
}

impl<R> PcapNGReader<R>
where
    R: Read + Seek,
{
    /// Creates a new `PcapNGReader<R>`. The file is not read until `open` is called.
    pub fn new(reader: R) -> PcapNGReader<R> {
        Self::with_config(reader, ReaderConfig::default())
    }

    /// Creates a new `PcapNGReader<R>` using the provided limits
    pub fn with_config(reader: R, config: ReaderConfig) -> PcapNGReader<R> {
        PcapNGReader {
            reader,
            state: ReaderState::Unopened,
            session: SessionState::default(),
            config,
            info: None,
            data: Vec::new(),
        }
    }

    /// Creates a new `PcapNGReader<R>` and opens the file
    pub fn from_reader(reader: R) -> Result<PcapNGReader<R>, PcapError> {
        let mut r = Self::new(reader);
        r.open()?;
        Ok(r)
    }

    /// Read the first two blocks of the file, and establish the capture attributes
    ///
    /// On error, the reader is closed.
    pub fn open(&mut self) -> Result<&CaptureInfo, PcapError> {
        if self.state != ReaderState::Unopened {
            return Err(PcapError::InvalidState("reader already opened"));
        }
        match self.read_first_blocks() {
            Ok(info) => {
                self.state = ReaderState::Ready;
                Ok(self.info.get_or_insert(info))
            }
            Err(e) => {
                warn!("pcapng: could not open file: {}", e);
                self.state = ReaderState::Closed;
                Err(e)
            }
        }
    }

    fn read_first_blocks(&mut self) -> Result<CaptureInfo, PcapError> {
        self.state = ReaderState::ExpectSectionHeader;
        let section = match self.read_one()? {
            Block::SectionHeader(shb) => shb,
            b => {
                return Err(PcapError::UnexpectedBlock {
                    expected: "section header",
                    found: b.block_type(),
                })
            }
        };
        self.state = ReaderState::ExpectInterfaceDescription;
        let interface = match self.read_one()? {
            Block::InterfaceDescription(idb) => idb,
            b => {
                return Err(PcapError::UnexpectedBlock {
                    expected: "interface description",
                    found: b.block_type(),
                })
            }
        };
        let ts_precision = interface.ts_precision();
        if let TsPrecision::Unsupported(tsresol) = ts_precision {
            warn!(
                "pcapng: if_tsresol {} unsupported, timestamps will not be converted",
                tsresol
            );
        }
        debug!(
            "pcapng: opened, linktype {}, snaplen {}, precision {:?}",
            interface.linktype, interface.snaplen, ts_precision
        );
        Ok(CaptureInfo {
            linktype: interface.linktype,
            snaplen: interface.snaplen,
            ts_precision,
            section,
            interface,
        })
    }

    fn read_one(&mut self) -> Result<Block, PcapError> {
        let (block, _) = read_block(
            &mut self.reader,
            &mut self.session,
            &self.config,
            &mut self.data,
        )?;
        Ok(block)
    }

    fn check_ready(&self) -> Result<TsPrecision, PcapError> {
        match (&self.state, &self.info) {
            (ReaderState::Ready, Some(info)) => Ok(info.ts_precision),
            (ReaderState::Closed, _) => Err(PcapError::InvalidState("reader is closed")),
            _ => Err(PcapError::InvalidState("reader not opened")),
        }
    }

    /// Read the next packet
    ///
    /// Blocks other than Enhanced Packet Blocks and obsolete Packet Blocks are skipped. The
    /// packet data is available using [`data`](#method.data).
    ///
    /// Returns the offset of the packet block in the input, and the packet record.
    /// `PcapError::Eof` is returned at the end of the input. Any other error closes the reader.
    pub fn next_packet(&mut self) -> Result<(u64, PacketRecord), PcapError> {
        let precision = self.check_ready()?;
        loop {
            let offset = match self.reader.stream_position() {
                Ok(offset) => offset,
                Err(e) => return Err(self.abort(e.into())),
            };
            match self.read_one() {
                Ok(Block::Packet(pb)) => {
                    return Ok((offset, PacketRecord::from_block(&pb, precision)))
                }
                Ok(b) => debug!(
                    "pcapng: skipping block type {:?} at offset {}",
                    BlockType(b.block_type()),
                    offset
                ),
                Err(e) => return Err(self.abort(e)),
            }
        }
    }

    /// Read the packet at `offset`
    ///
    /// Exactly one block is read, and it must be a packet block. The position for sequential
    /// reads is restored afterwards, and the session state is not modified. A malformed block
    /// closes the reader.
    pub fn seek_read(&mut self, offset: u64) -> Result<PacketRecord, PcapError> {
        let precision = self.check_ready()?;
        match self.read_at(offset) {
            Ok((Block::Packet(pb), _)) => Ok(PacketRecord::from_block(&pb, precision)),
            Ok((b, _)) => Err(PcapError::UnexpectedBlock {
                expected: "packet",
                found: b.block_type(),
            }),
            Err(e) => Err(self.abort(e)),
        }
    }

    fn read_at(&mut self, offset: u64) -> Result<(Block, usize), PcapError> {
        let position = self.reader.stream_position()?;
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut session = self.session;
        let res = read_block(&mut self.reader, &mut session, &self.config, &mut self.data);
        self.reader.seek(SeekFrom::Start(position))?;
        res
    }

    /// Close the reader after a read error, except at a clean end of input
    fn abort(&mut self, e: PcapError) -> PcapError {
        if !matches!(e, PcapError::Eof) {
            warn!("pcapng: closing reader after error: {}", e);
            self.state = ReaderState::Closed;
        }
        e
    }

    /// Packet data of the last packet read
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Capture attributes, if the file has been opened
    #[inline]
    pub fn info(&self) -> Option<&CaptureInfo> {
        self.info.as_ref()
    }

    #[inline]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Current decoding context (byte order, version, FCS length)
    #[inline]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Close the reader. Further reads fail with `PcapError::InvalidState`.
    pub fn close(&mut self) {
        self.state = ReaderState::Closed;
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
