/// Default limit for the content of one option, in bytes
pub const DEFAULT_MAX_OPTION_LEN: usize = 4096;

/// Default limit for the interface snapshot length
///
/// Larger values are valid in theory, but in practice are a symptom of a byte-order problem
/// or of a corrupted file.
pub const DEFAULT_MAX_SNAPLEN: u32 = 65535;

/// Limits applied while decoding blocks
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderConfig {
    /// Maximum declared length accepted for the content of an option
    ///
    /// Options are read into a scratch buffer sized from their declared length. An option
    /// declaring more than this limit is rejected, and the block is considered malformed.
    pub max_option_len: usize,
    /// Maximum snapshot length accepted in an Interface Description Block
    pub max_snaplen: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            max_option_len: DEFAULT_MAX_OPTION_LEN,
            max_snaplen: DEFAULT_MAX_SNAPLEN,
        }
    }
}

impl ReaderConfig {
    /// Set the maximum length accepted for the content of an option
    pub fn with_max_option_len(mut self, max_option_len: usize) -> Self {
        self.max_option_len = max_option_len;
        self
    }

    /// Set the maximum snapshot length accepted in interface descriptions
    pub fn with_max_snaplen(mut self, max_snaplen: u32) -> Self {
        self.max_snaplen = max_snaplen;
        self
    }
}
