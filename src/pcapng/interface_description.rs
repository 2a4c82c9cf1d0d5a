use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::config::ReaderConfig;
use crate::utils::read_fixed;
use crate::{Linktype, PcapError};

use super::*;

/// Fixed part of the Interface Description Block body (linktype, reserved, snaplen)
const IDB_FIXED_LEN: usize = 8;

/// Minimum total length of an Interface Description Block
pub const IDB_MIN_LEN: u32 = 20;

/// An Interface Description Block (IDB) is the container for information
/// describing an interface on which packet data is captured.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceDescriptionBlock {
    pub linktype: Linktype,
    pub reserved: u16,
    pub snaplen: u32,
    pub comment: Option<String>,
    pub if_name: Option<String>,
    pub if_description: Option<String>,
    pub if_os: Option<String>,
    /// Interface speed in bits per second, `None` if unknown
    pub if_speed: Option<u64>,
    pub if_tsresol: u8,
    /// Frame check sequence length, or -1 if unknown
    pub if_fcslen: i8,
}

impl Default for InterfaceDescriptionBlock {
    fn default() -> Self {
        InterfaceDescriptionBlock {
            linktype: Linktype::NULL,
            reserved: 0,
            snaplen: 0,
            comment: None,
            if_name: None,
            if_description: None,
            if_os: None,
            if_speed: None,
            if_tsresol: 6,
            if_fcslen: -1,
        }
    }
}

impl InterfaceDescriptionBlock {
    pub fn new(linktype: Linktype, snaplen: u32) -> Self {
        InterfaceDescriptionBlock {
            linktype,
            snaplen,
            ..InterfaceDescriptionBlock::default()
        }
    }

    /// Timestamp precision of the packets captured on this interface
    #[inline]
    pub fn ts_precision(&self) -> TsPrecision {
        TsPrecision::from_tsresol(self.if_tsresol)
    }

    #[cfg(feature = "serialize")]
    pub(crate) fn options(&self) -> Result<Vec<PcapNGOption>, PcapError> {
        let mut options = Vec::new();
        let strings = [
            (OptionCode::Comment, &self.comment),
            (OptionCode::IfName, &self.if_name),
            (OptionCode::IfDescription, &self.if_description),
        ];
        for (code, value) in strings.iter() {
            if let Some(s) = value {
                options.push(PcapNGOption::from_text(*code, s)?);
            }
        }
        if let Some(speed) = self.if_speed {
            options.push(PcapNGOption::new(
                OptionCode::IfSpeed,
                speed.to_ne_bytes().to_vec(),
            )?);
        }
        if self.if_tsresol != 6 {
            options.push(PcapNGOption::new(
                OptionCode::IfTsresol,
                vec![self.if_tsresol],
            )?);
        }
        if let Some(os) = &self.if_os {
            options.push(PcapNGOption::from_text(OptionCode::IfOs, os)?);
        }
        if self.if_fcslen >= 0 {
            options.push(PcapNGOption::new(
                OptionCode::IfFcslen,
                vec![self.if_fcslen as u8],
            )?);
        }
        Ok(options)
    }
}

impl OptionHandler for InterfaceDescriptionBlock {
    const NAME: &'static str = "IDB";

    fn handle_option(&mut self, option: &PcapNGOption, state: &mut SessionState) {
        match option.code {
            OptionCode::Comment => {
                self.comment = option_string(Self::NAME, "opt_comment", option);
            }
            OptionCode::IfName => {
                self.if_name = option_string(Self::NAME, "if_name", option);
            }
            OptionCode::IfDescription => {
                self.if_description = option_string(Self::NAME, "if_description", option);
            }
            OptionCode::IfSpeed => match option.as_u64(state.endianness()) {
                Some(speed) => {
                    self.if_speed = Some(speed);
                    debug!("IDB: if_speed {}", speed);
                }
                None => warn!("IDB: if_speed length {} not 8 as expected", option.len),
            },
            OptionCode::IfTsresol => match option.as_u8() {
                Some(tsresol) => {
                    self.if_tsresol = tsresol;
                    debug!("IDB: if_tsresol {}", tsresol);
                }
                None => warn!("IDB: if_tsresol length {} not 1 as expected", option.len),
            },
            OptionCode::IfOs => {
                self.if_os = option_string(Self::NAME, "if_os", option);
            }
            OptionCode::IfFcslen => match option.as_u8() {
                Some(fcslen) => {
                    self.if_fcslen = fcslen as i8;
                    state.fcs_len = self.if_fcslen;
                    debug!("IDB: if_fcslen {}", fcslen);
                }
                None => warn!("IDB: if_fcslen length {} not 1 as expected", option.len),
            },
            _ => {
                debug!(
                    "IDB: unknown option {} - ignoring {} bytes",
                    option.code.0, option.len
                );
            }
        }
    }
}

/// Read the body of an Interface Description Block
///
/// Returns the block and the number of bytes consumed after the header.
pub(crate) fn read_interface_description<R: Read + Seek + ?Sized>(
    r: &mut R,
    bh: &BlockHeader,
    state: &mut SessionState,
    config: &ReaderConfig,
) -> Result<(InterfaceDescriptionBlock, usize), PcapError> {
    let fixed = read_fixed::<_, IDB_FIXED_LEN>(r)?;
    let en = state.endianness();
    let (i, linktype) = en.parse_u16::<PcapError>(&fixed)?;
    let (i, reserved) = en.parse_u16::<PcapError>(i)?;
    let (_, snaplen) = en.parse_u32::<PcapError>(i)?;
    debug!(
        "IDB: linktype {}, snaplen {}",
        Linktype(linktype),
        snaplen
    );
    if snaplen > config.max_snaplen {
        warn!("IDB: snapshot length {} unrealistic", snaplen);
        return Err(PcapError::SnaplenTooLarge(snaplen));
    }
    let mut idb = InterfaceDescriptionBlock {
        linktype: Linktype(linktype),
        reserved,
        snaplen,
        ..InterfaceDescriptionBlock::default()
    };
    let remaining = i64::from(bh.block_total_length)
        - (BLOCK_HEADER_LEN + IDB_FIXED_LEN + BLOCK_TRAILER_LEN) as i64;
    let options_len = read_options(
        r,
        state,
        config,
        bh.block_total_length,
        remaining,
        &mut idb,
    )?;
    Ok((idb, IDB_FIXED_LEN + options_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn idb_body(snaplen: u32, options: &[u8]) -> (BlockHeader, Vec<u8>) {
        let mut v = Vec::new();
        v.extend_from_slice(&1u16.to_ne_bytes());
        v.extend_from_slice(&0u16.to_ne_bytes());
        v.extend_from_slice(&snaplen.to_ne_bytes());
        v.extend_from_slice(options);
        let total = (v.len() + 12) as u32;
        (BlockHeader::new(IDB_MAGIC, total), v)
    }

    #[test]
    fn idb_snaplen_too_large() {
        let (bh, body) = idb_body(70000, &[]);
        let mut state = SessionState::default();
        let res = read_interface_description(
            &mut Cursor::new(body),
            &bh,
            &mut state,
            &ReaderConfig::default(),
        );
        assert!(matches!(res, Err(PcapError::SnaplenTooLarge(70000))));
        // a larger limit accepts it
        let (bh, body) = idb_body(70000, &[]);
        let config = ReaderConfig::default().with_max_snaplen(262144);
        let (idb, _) =
            read_interface_description(&mut Cursor::new(body), &bh, &mut state, &config)
                .unwrap();
        assert_eq!(idb.snaplen, 70000);
    }

    #[test]
    fn idb_options() {
        let mut options = Vec::new();
        // if_tsresol = 9
        options.extend_from_slice(&9u16.to_ne_bytes());
        options.extend_from_slice(&1u16.to_ne_bytes());
        options.extend_from_slice(&[9, 0, 0, 0]);
        // if_speed with a wrong length is ignored
        options.extend_from_slice(&8u16.to_ne_bytes());
        options.extend_from_slice(&4u16.to_ne_bytes());
        options.extend_from_slice(&[1, 2, 3, 4]);
        // if_fcslen = 4
        options.extend_from_slice(&13u16.to_ne_bytes());
        options.extend_from_slice(&1u16.to_ne_bytes());
        options.extend_from_slice(&[4, 0, 0, 0]);
        // end of options
        options.extend_from_slice(&[0, 0, 0, 0]);
        let (bh, body) = idb_body(65535, &options);
        let mut state = SessionState::default();
        let (idb, sz) = read_interface_description(
            &mut Cursor::new(body),
            &bh,
            &mut state,
            &ReaderConfig::default(),
        )
        .unwrap();
        assert_eq!(sz, 8 + options.len());
        assert_eq!(idb.linktype, Linktype::ETHERNET);
        assert_eq!(idb.ts_precision(), TsPrecision::Nano);
        assert_eq!(idb.if_speed, None);
        assert_eq!(idb.if_fcslen, 4);
        assert_eq!(state.fcs_len, 4);
    }
}
