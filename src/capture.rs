use crate::linktype::Linktype;
use crate::pcapng::TsPrecision;

/// Generic interface to the file-wide attributes of a capture
///
/// These attributes come from the first Interface Description Block of the file, for a
/// reader, or are given when the file is created, for a writer.
pub trait Capture {
    fn get_datalink(&self) -> Linktype;

    fn get_snaplen(&self) -> u32;

    fn get_ts_precision(&self) -> TsPrecision;
}
