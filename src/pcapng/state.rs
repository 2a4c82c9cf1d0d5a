use crate::endianness::PcapEndianness;

/// Per-file decoding context
///
/// The state is created when a file is opened, and threaded into every block handler. It
/// is updated by the Section Header Block (byte order and version) and by the Interface
/// Description Block (default FCS length), and read by all other blocks.
///
/// A `SessionState` belongs to exactly one input. Files read in parallel must each use
/// their own state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionState {
    /// True if the current section uses the opposite of the native byte order
    pub byte_swapped: bool,
    pub version_major: u16,
    pub version_minor: u16,
    /// Frame check sequence length for the following packets, or -1 if unknown
    pub fcs_len: i8,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            byte_swapped: false,
            version_major: 0,
            version_minor: 0,
            fcs_len: -1,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    #[inline]
    pub(crate) fn endianness(&self) -> PcapEndianness {
        PcapEndianness::new(self.byte_swapped)
    }
}
