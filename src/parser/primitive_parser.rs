use nom::bytes::complete::tag;
use nom::{number, IResult, Parser};

/// Parse big-endian unsigned short
pub fn parse_u16(i: &[u8]) -> IResult<&[u8], u16> {
    number::complete::be_u16(i)
}

/// Parse big-endian unsigned int
pub fn parse_u32(i: &[u8]) -> IResult<&[u8], u32> {
    number::complete::be_u32(i)
}

/// Parse a chunk prelude: 4 bytes `signature` followed by its big-endian length.
pub fn parse_chunk_prelude(signature: &'static [u8]) -> impl FnMut(&[u8]) -> IResult<&[u8], u32> {
    move |i: &[u8]| {
        let (i, (_, length)) = (tag(signature), parse_u32).parse(i)?;
        log::debug!("Chunk {:?} declares {length} bytes", String::from_utf8_lossy(signature));
        Ok((i, length))
    }
}

/// Position of the first `signature` in `i`, looking no further than `limit` bytes ahead.
pub fn find_signature(i: &[u8], signature: &[u8], limit: usize) -> Option<usize> {
    (0..limit.min(i.len())).find(|&p| i[p..].starts_with(signature))
}
