use crate::parser::chunk_types::{HeaderRecord, HEADER_CHUNK_LENGTH, MTHD};
use crate::parser::primitive_parser::{parse_chunk_prelude, parse_u16};
use nom::{IResult, Parser};

/// Parse the raw header chunk fields, returns `(chunk_length, format_type, track_count, time_division)`.
fn parse_header_chunk(i: &[u8]) -> IResult<&[u8], (u32, u16, u16, u16)> {
    (parse_chunk_prelude(MTHD), parse_u16, parse_u16, parse_u16).parse(i)
}

/// Extracts a header record from the start of `i`.
///
/// Returns `None` when no `MThd` chunk starts here, which is a regular outcome while scanning.
/// On success exactly [`HEADER_SIZE`](crate::parser::chunk_types::HEADER_SIZE) bytes are
/// consumed, whatever length the chunk declares.
pub fn extract_header(i: &[u8]) -> Option<HeaderRecord> {
    let (_rest, (chunk_length, format_type, track_count, time_division)) =
        parse_header_chunk(i).ok()?;

    if chunk_length == HEADER_CHUNK_LENGTH {
        log::debug!("Header indicates {HEADER_CHUNK_LENGTH} bytes length");
    } else {
        log::warn!("Header size says {chunk_length} bytes, it should be {HEADER_CHUNK_LENGTH}. Continuing anyway");
    }

    if format_type <= 2 {
        log::info!("MIDI file says it is type {format_type}");
    } else {
        log::warn!("MIDI file is type {format_type} (should be 0-2). Continuing anyway");
    }
    log::info!("MIDI says there should be {track_count} tracks here");

    let format_type = if format_type == 0 && track_count != 1 {
        log::warn!("Type 0 should have only 1 track, altering type to 1");
        1
    } else {
        format_type
    };

    // the time division cannot be verified
    log::debug!("MIDI time division: {time_division}");

    Some(HeaderRecord {
        format_type,
        track_count,
        time_division,
        ..HeaderRecord::default()
    })
}
