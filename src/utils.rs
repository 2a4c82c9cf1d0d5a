use std::convert::TryFrom;
use std::io::{self, Read, Seek, SeekFrom};

use rusticata_macros::align32;

use crate::error::PcapError;

/// Number of zero bytes needed after `len` bytes to reach a 4-byte boundary
#[inline]
pub(crate) fn padding_len(len: u32) -> u32 {
    (4 - len % 4) % 4
}

/// Round a block length up to the next multiple of 4 bytes
///
/// Some producers do not count the padding of the packet data in the total block length.
#[inline]
pub(crate) fn padded_block_len(len: u32) -> u64 {
    align32!(u64::from(len))
}

/// Read as many bytes as possible into `buf`, stopping at end of input
///
/// Returns the number of bytes read, which is lower than `buf.len()` only at end of input.
pub(crate) fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => (),
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Fill `buf` completely, or fail with `ShortRead`
pub(crate) fn fill_exact<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<(), PcapError> {
    let actual = read_full(r, buf)?;
    if actual != buf.len() {
        return Err(PcapError::ShortRead {
            expected: buf.len(),
            actual,
        });
    }
    Ok(())
}

/// Replace the content of `data` with the next `len` bytes, or fail with `ShortRead`
///
/// The buffer grows with the bytes actually read, not with the declared length.
pub(crate) fn read_to_vec<R: Read + ?Sized>(
    r: &mut R,
    data: &mut Vec<u8>,
    len: u32,
) -> Result<(), PcapError> {
    data.clear();
    let actual = (&mut *r).take(u64::from(len)).read_to_end(data)?;
    if actual != len as usize {
        return Err(PcapError::ShortRead {
            expected: len as usize,
            actual,
        });
    }
    Ok(())
}

/// Read a fixed-size part of a block
pub(crate) fn read_fixed<R: Read + ?Sized, const N: usize>(r: &mut R) -> Result<[u8; N], PcapError> {
    let mut buf = [0u8; N];
    fill_exact(r, &mut buf)?;
    Ok(buf)
}

/// Move forward by `count` bytes
pub(crate) fn skip<R: Seek + ?Sized>(r: &mut R, count: u64) -> Result<(), PcapError> {
    if count == 0 {
        return Ok(());
    }
    let offset = i64::try_from(count).map_err(|_| {
        PcapError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "seek offset too large",
        ))
    })?;
    r.seek(SeekFrom::Current(offset))?;
    Ok(())
}
