//! # PCAPNG block codec
//!
//! This crate reads and writes files in the pcap-ng capture format, one block at a time.
//!
//! Blocks are read from any input providing `Read` and `Seek`. All the block lengths are
//! cross-checked (leading and trailing copies, option lengths, padding), files in both byte
//! orders are supported, and files with multiple sections are handled. A corrupted or
//! truncated block is reported as an error; the reader never tries to resynchronize.
//!
//! Blocks are written in the native byte order, with all lengths computed from the content.
//!
//! # Example: reading packets
//!
//! The following code shows how to read the packets of a file, using a
//! [PcapNGReader](struct.PcapNGReader.html).
//!
//! ```rust
//! use pcapng_codec::*;
//! use std::io::Cursor;
//!
//! # let mut file = Vec::new();
//! # let mut writer = PcapNGWriter::new(&mut file, Linktype::ETHERNET, 65535).unwrap();
//! # writer.write_packet(&PacketRecord { caplen: 2, origlen: 2, ..PacketRecord::default() }, &[1, 2]).unwrap();
//! # drop(writer);
//! let mut reader = PcapNGReader::new(Cursor::new(file));
//! let info = reader.open().expect("not a pcap-ng file");
//! println!("linktype: {}", info.get_datalink());
//! let mut num_packets = 0;
//! loop {
//!     match reader.next_packet() {
//!         Ok((offset, record)) => {
//!             println!("packet at offset {}: {} bytes", offset, record.caplen);
//!             num_packets += 1;
//!         }
//!         Err(PcapError::Eof) => break,
//!         Err(e) => panic!("error while reading: {:?}", e),
//!     }
//! }
//! println!("num_packets: {}", num_packets);
//! ```
//!
//! See [read_block](fn.read_block.html) to read blocks manually, and
//! [PcapNGWriter](struct.PcapNGWriter.html) to create files.
//!
//! # Logging
//!
//! Diagnostics (unknown options, inconsistent lengths, etc.) are emitted using the `tracing`
//! crate. No subscriber is installed by the library.

mod utils;

mod capture;
mod config;
mod endianness;
mod error;
mod linktype;
pub use capture::*;
pub use config::*;
pub use error::*;
pub use linktype::*;

pub mod pcapng;
pub use pcapng::*;

#[cfg(feature = "serialize")]
mod serialize;
#[cfg(feature = "serialize")]
pub use serialize::ToVec;
