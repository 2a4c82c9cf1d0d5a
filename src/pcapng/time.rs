/// Timestamp precision declared for a capture
///
/// The precision comes from the `if_tsresol` option of the Interface Description Block
/// (default 6, microseconds).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TsPrecision {
    Micro,
    Nano,
    /// Any other resolution. Timestamps are not converted.
    Unsupported(u8),
}

impl Default for TsPrecision {
    fn default() -> Self {
        TsPrecision::Micro
    }
}

impl TsPrecision {
    pub fn from_tsresol(ts_resol: u8) -> Self {
        match ts_resol {
            6 => TsPrecision::Micro,
            9 => TsPrecision::Nano,
            n => TsPrecision::Unsupported(n),
        }
    }

    /// The `if_tsresol` value encoding this precision
    pub fn tsresol(self) -> u8 {
        match self {
            TsPrecision::Micro => 6,
            TsPrecision::Nano => 9,
            TsPrecision::Unsupported(n) => n,
        }
    }

    /// Number of timestamp units per second, or `None` if timestamps are not converted
    pub fn resolution(self) -> Option<u64> {
        match self {
            TsPrecision::Micro | TsPrecision::Nano => build_ts_resolution(self.tsresol()),
            TsPrecision::Unsupported(_) => None,
        }
    }
}

/// Compute the timestamp resolution, in units per second
///
/// Return the resolution, or `None` if the resolution is invalid (for ex. greater than `2^64`)
pub fn build_ts_resolution(ts_resol: u8) -> Option<u64> {
    let ts_mode = ts_resol & 0x80;
    let unit = if ts_mode == 0 {
        // 10^if_tsresol
        // check that if_tsresol <= 19 (10^19 is the largest power of 10 to fit in a u64)
        if ts_resol > 19 {
            return None;
        }
        10u64.pow(u32::from(ts_resol))
    } else {
        // 2^if_tsresol
        let exp = ts_resol & 0x7f;
        if exp > 63 {
            return None;
        }
        1u64 << exp
    };
    Some(unit)
}

/// Given the timestamp halves and the resolution, return the timestamp seconds and
/// fractional part (in resolution units)
pub fn build_ts(ts_high: u32, ts_low: u32, resolution: u64) -> (u32, u32) {
    let ts: u64 = (u64::from(ts_high) << 32) | u64::from(ts_low);
    let ts_sec = (ts / resolution) as u32;
    let ts_fractional = (ts % resolution) as u32;
    (ts_sec, ts_fractional)
}

/// Split a timestamp given in resolution units into its high and low halves
pub fn split_ts(ts_sec: u32, ts_frac: u32, resolution: u64) -> (u32, u32) {
    let ts = u64::from(ts_sec)
        .wrapping_mul(resolution)
        .wrapping_add(u64::from(ts_frac));
    ((ts >> 32) as u32, ts as u32)
}
