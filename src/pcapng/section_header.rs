use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::config::ReaderConfig;
use crate::utils::read_fixed;
use crate::PcapError;

use super::*;

/// Fixed part of the Section Header Block body (magic, version, section length)
const SHB_FIXED_LEN: usize = 16;

/// Minimum total length of a Section Header Block
pub const SHB_MIN_LEN: u32 = 28;

/// The Section Header Block (SHB) identifies the beginning of a section of the capture file.
///
/// The Section Header Block does not contain data but it rather identifies a list of blocks
/// (interfaces, packets) that are logically correlated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SectionHeaderBlock {
    /// True if the section uses the opposite of the native byte order
    pub byte_swapped: bool,
    pub major_version: u16,
    pub minor_version: u16,
    /// Section length. Always -1 (unknown), the value stored in the file is not trusted.
    pub section_len: i64,
    pub comment: Option<String>,
    pub hardware: Option<String>,
    pub os: Option<String>,
    pub user_appl: Option<String>,
}

impl Default for SectionHeaderBlock {
    fn default() -> Self {
        SectionHeaderBlock {
            byte_swapped: false,
            major_version: 1,
            minor_version: 0,
            section_len: -1,
            comment: None,
            hardware: None,
            os: None,
            user_appl: None,
        }
    }
}

impl OptionHandler for SectionHeaderBlock {
    const NAME: &'static str = "SHB";

    fn handle_option(&mut self, option: &PcapNGOption, _state: &mut SessionState) {
        match option.code {
            OptionCode::Comment => {
                self.comment = option_string(Self::NAME, "opt_comment", option);
            }
            OptionCode::ShbHardware => {
                self.hardware = option_string(Self::NAME, "shb_hardware", option);
            }
            OptionCode::ShbOs => {
                self.os = option_string(Self::NAME, "shb_os", option);
            }
            OptionCode::ShbUserAppl => {
                self.user_appl = option_string(Self::NAME, "shb_userappl", option);
            }
            _ => {
                debug!(
                    "SHB: unknown option {} - ignoring {} bytes",
                    option.code.0, option.len
                );
            }
        }
    }
}

impl SectionHeaderBlock {
    #[cfg(feature = "serialize")]
    pub(crate) fn options(&self) -> Result<Vec<PcapNGOption>, PcapError> {
        let strings = [
            (OptionCode::Comment, &self.comment),
            (OptionCode::ShbHardware, &self.hardware),
            (OptionCode::ShbOs, &self.os),
            (OptionCode::ShbUserAppl, &self.user_appl),
        ];
        let mut options = Vec::new();
        for (code, value) in strings.iter() {
            if let Some(s) = value {
                options.push(PcapNGOption::from_text(*code, s)?);
            }
        }
        Ok(options)
    }
}

/// Read the body of a Section Header Block
///
/// The byte-order magic decides the byte order of the whole section. It is stored in
/// `state`, and the total length of `bh` (read before the byte order was known) is decoded
/// again.
///
/// Returns the block and the number of bytes consumed after the header.
pub(crate) fn read_section_header<R: Read + Seek + ?Sized>(
    r: &mut R,
    bh: &mut BlockHeader,
    state: &mut SessionState,
    config: &ReaderConfig,
) -> Result<(SectionHeaderBlock, usize), PcapError> {
    let fixed = read_fixed::<_, SHB_FIXED_LEN>(r)?;
    let magic = u32::from_ne_bytes([fixed[0], fixed[1], fixed[2], fixed[3]]);
    state.byte_swapped = match magic {
        BOM_MAGIC => false,
        BOM_MAGIC_SWAPPED => true,
        _ => {
            warn!(
                "SHB: unknown magic number {:#010x} (probably not a pcapng file)",
                magic
            );
            return Err(PcapError::HeaderNotRecognized(magic));
        }
    };
    let en = state.endianness();
    bh.reinterpret_length(en);
    let i = &fixed[4..];
    let (i, major_version) = en.parse_u16::<PcapError>(i)?;
    let (_, minor_version) = en.parse_u16::<PcapError>(i)?;
    state.version_major = major_version;
    state.version_minor = minor_version;
    debug!(
        "SHB: swapped={} V{}.{}, len {}",
        state.byte_swapped, major_version, minor_version, bh.block_total_length
    );
    // only SHB V1.0 is understood
    if major_version != 1 || minor_version != 0 {
        warn!("SHB: unknown version {}.{}", major_version, minor_version);
        return Err(PcapError::UnsupportedVersion {
            major: major_version,
            minor: minor_version,
        });
    }
    if bh.block_total_length < SHB_MIN_LEN {
        return Err(PcapError::InvalidBlockLength(bh.block_total_length));
    }
    // 64-bit section length is not trusted
    let mut shb = SectionHeaderBlock {
        byte_swapped: state.byte_swapped,
        major_version,
        minor_version,
        ..SectionHeaderBlock::default()
    };
    let remaining = i64::from(bh.block_total_length)
        - (BLOCK_HEADER_LEN + SHB_FIXED_LEN + BLOCK_TRAILER_LEN) as i64;
    let options_len = read_options(
        r,
        state,
        config,
        bh.block_total_length,
        remaining,
        &mut shb,
    )?;
    Ok((shb, SHB_FIXED_LEN + options_len))
}
