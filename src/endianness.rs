use nom::error::ParseError;
use nom::number::complete as number;
use nom::number::Endianness;
use nom::IResult;

/// Byte order of the data, relative to the host byte order
///
/// Files are written in the byte order of the machine that produced them. A reader only
/// needs to know whether values must be swapped compared to the native order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PcapEndianness {
    swapped: bool,
}

impl PcapEndianness {
    #[inline]
    pub(crate) const fn new(swapped: bool) -> Self {
        PcapEndianness { swapped }
    }

    /// The byte order of the data, as a nom `Endianness` value
    #[inline]
    pub(crate) fn nom(self) -> Endianness {
        match (self.swapped, cfg!(target_endian = "big")) {
            (false, _) => Endianness::Native,
            (true, true) => Endianness::Little,
            (true, false) => Endianness::Big,
        }
    }

    #[inline]
    pub(crate) fn parse_u16<'a, E: ParseError<&'a [u8]>>(
        self,
        i: &'a [u8],
    ) -> IResult<&'a [u8], u16, E> {
        number::u16(self.nom())(i)
    }

    #[inline]
    pub(crate) fn parse_u32<'a, E: ParseError<&'a [u8]>>(
        self,
        i: &'a [u8],
    ) -> IResult<&'a [u8], u32, E> {
        number::u32(self.nom())(i)
    }

    #[inline]
    pub(crate) fn parse_u64<'a, E: ParseError<&'a [u8]>>(
        self,
        i: &'a [u8],
    ) -> IResult<&'a [u8], u64, E> {
        number::u64(self.nom())(i)
    }

    #[inline]
    pub(crate) fn u32_from_bytes(self, i: [u8; 4]) -> u32 {
        let n = u32::from_ne_bytes(i);
        if self.swapped {
            n.swap_bytes()
        } else {
            n
        }
    }
}
