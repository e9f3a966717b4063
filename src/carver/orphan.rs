use crate::carver::CarvePolicy;
use crate::parser::chunk_types::{has_signature, HeaderRecord, MTHD, MTRK};

/// Counts the `MTrk` tags from the start of `i` up to the next `MThd` or the end of data.
pub fn count_orphan_tracks(i: &[u8]) -> u16 {
    let count = (0..i.len())
        .map(|p| &i[p..])
        .take_while(|rest| !has_signature(rest, MTHD))
        .filter(|rest| has_signature(rest, MTRK))
        .count();
    u16::try_from(count).unwrap_or(u16::MAX)
}

/// Fabricates a default type 1 header governing the orphan tracks starting at `i`.
pub fn synthesize_header(i: &[u8], policy: &CarvePolicy) -> HeaderRecord {
    log::info!("Generating a default type 1 MThd, counting MTrks from here to next MThd");
    let track_count = count_orphan_tracks(i);
    log::info!("Found {track_count} MTrk tags, beginning extraction");
    HeaderRecord {
        format_type: 1,
        track_count,
        time_division: policy.orphan_time_division,
        is_damaged: true,
        is_synthesized: true,
        tracks: Vec::new(),
    }
}
