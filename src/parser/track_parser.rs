use crate::parser::chunk_types::{TrackRecord, END_OF_TRACK, MTHD, MTRK, TRACK_PRELUDE_SIZE};
use crate::parser::primitive_parser::parse_chunk_prelude;

/// How the trailer of a track chunk was validated or repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRepair {
    /// Complete end-of-track where the declared length puts it.
    ExactTerminator,
    /// Only `FF 2F 00` found, one byte further than expected.
    PartialTerminator,
    /// The track was saved over by another file starting at this chunk offset.
    OverwrittenAt(usize),
    /// No end-of-track and no foreign header, terminator appended.
    Truncated,
}

/// Extracts a track record from the start of `i`, repairing its trailer when needed.
///
/// Returns `None` when no `MTrk` chunk starts here. Once the signature is confirmed a record is
/// always produced. `i` must extend past the chunk so the trailer can be checked;
/// `backtrack_floor` bounds the backward search for a foreign header (never below the prelude).
pub fn extract_track(i: &[u8], backtrack_floor: usize) -> Option<(TrackRecord, TrackRepair)> {
    let (_rest, length) = parse_chunk_prelude(MTRK)(i).ok()?;
    let length = length as usize;
    log::debug!("MTrk is {length} bytes long");

    // end-of-track is expected in the last 4 bytes of the declared payload
    let terminator_at = length + TRACK_PRELUDE_SIZE - END_OF_TRACK.len();

    if i.get(terminator_at..terminator_at + 4) == Some(&END_OF_TRACK[..]) {
        log::debug!("Got complete end-of-track, seems consistent enough");
        let payload = i[TRACK_PRELUDE_SIZE..TRACK_PRELUDE_SIZE + length].to_vec();
        return Some((TrackRecord::new(payload, false), TrackRepair::ExactTerminator));
    }

    if i.get(terminator_at + 1..terminator_at + 4) == Some(&END_OF_TRACK[1..]) {
        log::info!("Got partial (0xFF2F00) end-of-track, it's unusual but OK");
        let payload = i[TRACK_PRELUDE_SIZE..TRACK_PRELUDE_SIZE + length].to_vec();
        return Some((TrackRecord::new(payload, false), TrackRepair::PartialTerminator));
    }

    log::warn!(
        "Expected end-of-track but couldn't find it, instead got {:02X?}",
        i.get(terminator_at..(terminator_at + 4).min(i.len())).unwrap_or_default()
    );
    log::warn!("Sometimes this indicates the song has been overwritten, trying to backtrack");

    let floor = backtrack_floor.max(TRACK_PRELUDE_SIZE);
    let start = terminator_at.min(i.len().saturating_sub(MTHD.len()));
    let overwritten_at = (floor + 1..=start).rev().find(|&p| i[p..].starts_with(MTHD));

    let (body, repair) = match overwritten_at {
        Some(p) => {
            log::warn!("Song was saved over, terminating and splitting here ({length} -> {p})");
            (&i[TRACK_PRELUDE_SIZE..p], TrackRepair::OverwrittenAt(p))
        }
        None => {
            log::warn!("File was simply damaged, appending a terminator");
            let end = (TRACK_PRELUDE_SIZE + length).min(i.len());
            (&i[TRACK_PRELUDE_SIZE..end], TrackRepair::Truncated)
        }
    };

    let mut payload = Vec::with_capacity(body.len() + END_OF_TRACK.len());
    payload.extend_from_slice(body);
    payload.extend_from_slice(&END_OF_TRACK);
    Some((TrackRecord::new(payload, true), repair))
}
