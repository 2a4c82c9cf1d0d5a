use std::convert::TryFrom;
use std::io::{Read, Seek};

use rusticata_macros::newtype_enum;
use tracing::{trace, warn};

use crate::config::ReaderConfig;
use crate::endianness::PcapEndianness;
use crate::utils::{fill_exact, padding_len, read_fixed, skip};
use crate::PcapError;

use super::SessionState;

/// Size of the option header (code and length)
pub const OPTION_HEADER_LEN: usize = 4;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    IfName = 2,
    EpbFlags = 2,
    ShbOs = 3,
    IfDescription = 3,
    ShbUserAppl = 4,
    EpbDropCount = 4,
    IfSpeed = 8,
    IfTsresol = 9,
    IfOs = 12,
    IfFcslen = 13,
}
}

/// A pcapng option: a typed, variable-length value attached to a block
///
/// The value is stored without its padding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PcapNGOption {
    pub code: OptionCode,
    pub len: u16,
    pub value: Vec<u8>,
}

impl PcapNGOption {
    /// Build an option from raw bytes
    ///
    /// Values larger than the maximum option length (65535) are rejected.
    pub fn new(code: OptionCode, value: Vec<u8>) -> Result<Self, PcapError> {
        let len = u16::try_from(value.len()).map_err(|_| {
            PcapError::Serialize(format!(
                "option {} value too long ({} bytes)",
                code.0,
                value.len()
            ))
        })?;
        Ok(PcapNGOption { code, len, value })
    }

    pub fn from_text(code: OptionCode, s: &str) -> Result<Self, PcapError> {
        PcapNGOption::new(code, s.as_bytes().to_vec())
    }

    pub(crate) fn end_of_options() -> Self {
        PcapNGOption {
            code: OptionCode::EndOfOpt,
            len: 0,
            value: Vec::new(),
        }
    }

    /// Return a reference to the option value, as raw bytes
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Return the option value as a string, or None if value is empty
    ///
    /// Trailing NUL bytes are removed, and invalid UTF-8 sequences are replaced.
    pub fn as_string(&self) -> Option<String> {
        let end = self
            .value
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |pos| pos + 1);
        if end == 0 {
            return None;
        }
        Some(String::from_utf8_lossy(&self.value[..end]).into_owned())
    }

    /// Return the option value interpreted as u8, or None
    ///
    /// Option data length must be exactly 1 byte
    pub fn as_u8(&self) -> Option<u8> {
        match self.value() {
            [b] if self.len == 1 => Some(*b),
            _ => None,
        }
    }

    /// Return the option value interpreted as u32, or None
    ///
    /// Option data length must be exactly 4 bytes
    pub(crate) fn as_u32(&self, en: PcapEndianness) -> Option<u32> {
        if self.len != 4 {
            return None;
        }
        en.parse_u32::<PcapError>(self.value())
            .ok()
            .map(|(_, v)| v)
    }

    /// Return the option value interpreted as u64, or None
    ///
    /// Option data length must be exactly 8 bytes
    pub(crate) fn as_u64(&self, en: PcapEndianness) -> Option<u64> {
        if self.len != 8 {
            return None;
        }
        en.parse_u64::<PcapError>(self.value())
            .ok()
            .map(|(_, v)| v)
    }

    /// Size of the option once serialized, including header and padding
    #[inline]
    pub fn padded_len(&self) -> usize {
        OPTION_HEADER_LEN + usize::from(self.len) + padding_len(u32::from(self.len)) as usize
    }
}

/// Read one option
///
/// The option is rejected if its declared length exceeds `max_len`. Padding bytes are
/// skipped.
///
/// Returns the option and the number of bytes consumed (header, value and padding).
pub(crate) fn read_option<R: Read + Seek + ?Sized>(
    r: &mut R,
    en: PcapEndianness,
    max_len: usize,
) -> Result<(PcapNGOption, usize), PcapError> {
    let hdr = read_fixed::<_, OPTION_HEADER_LEN>(r)?;
    let (i, code) = en.parse_u16::<PcapError>(&hdr)?;
    let (_, len) = en.parse_u16::<PcapError>(i)?;
    if usize::from(len) > max_len {
        warn!("option {} length {} larger than limit {}", code, len, max_len);
        return Err(PcapError::OptionTooLong {
            code,
            len,
            max: max_len,
        });
    }
    let mut value = vec![0u8; usize::from(len)];
    fill_exact(r, &mut value)?;
    let padding = padding_len(u32::from(len));
    skip(r, u64::from(padding))?;
    let option = PcapNGOption {
        code: OptionCode(code),
        len,
        value,
    };
    Ok((option, OPTION_HEADER_LEN + usize::from(len) + padding as usize))
}

/// Per-block interpretation of options
pub(crate) trait OptionHandler {
    /// Block name, used in diagnostics
    const NAME: &'static str;

    /// Interpret one option. Unknown or invalid options must only be reported.
    fn handle_option(&mut self, option: &PcapNGOption, state: &mut SessionState);
}

/// Read options until `remaining` bytes have been consumed, or an end-of-options marker
/// is found
///
/// `remaining` is the length of the options region, computed by the caller from the
/// declared block length. A negative value, or an option crossing the end of the region,
/// means the declared length is inconsistent with the block content.
///
/// Returns the number of bytes consumed.
pub(crate) fn read_options<R, H>(
    r: &mut R,
    state: &mut SessionState,
    config: &ReaderConfig,
    block_len: u32,
    remaining: i64,
    handler: &mut H,
) -> Result<usize, PcapError>
where
    R: Read + Seek + ?Sized,
    H: OptionHandler,
{
    if remaining < 0 {
        warn!(
            "{}: block length {} too small for its content",
            H::NAME,
            block_len
        );
        return Err(PcapError::InvalidBlockLength(block_len));
    }
    let mut to_read = remaining;
    let mut consumed = 0;
    while to_read > 0 {
        let (option, sz) = read_option(r, state.endianness(), config.max_option_len)?;
        consumed += sz;
        to_read -= sz as i64;
        if to_read < 0 {
            warn!(
                "{}: option {:?} crosses the end of the block",
                H::NAME,
                option.code
            );
            return Err(PcapError::InvalidBlockLength(block_len));
        }
        if option.code == OptionCode::EndOfOpt {
            if to_read != 0 {
                warn!("{}: {} bytes after opt_endofopt", H::NAME, to_read);
                skip(r, to_read as u64)?;
                consumed += to_read as usize;
            }
            break;
        }
        trace!("{}: option {:?} ({} bytes)", H::NAME, option.code, option.len);
        handler.handle_option(&option, state);
    }
    Ok(consumed)
}

/// Interpret a string option, reporting empty values
pub(crate) fn option_string(block: &str, field: &str, option: &PcapNGOption) -> Option<String> {
    let s = option.as_string();
    if s.is_none() {
        warn!("{}: {} length {} seems strange", block, field, option.len);
    }
    s
}
