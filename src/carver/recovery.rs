use crate::carver::midi_writer::MidiSink;
use crate::carver::CarvePolicy;
use crate::parser::chunk_types::{has_signature, CarveStatus, HeaderRecord, MTHD, MTRK};
use crate::parser::primitive_parser::find_signature;
use crate::parser::track_parser::extract_track;
use crate::CarveError;

/// Outcome of handing a completed header record to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Written {
        file_name: String,
        status: CarveStatus,
        track_count: u16,
    },
    Refused,
    Failed(String),
}

/// Fills `header` with the tracks found in `region`, the bytes following the header.
///
/// Returns the offset in `region` where scanning should resume. `track_count` is
/// shrunk to the tracks actually recovered.
pub fn recover_tracks(header: &mut HeaderRecord, region: &[u8], policy: &CarvePolicy) -> usize {
    let mut cursor = 0;
    let mut recovered: u16 = 0;

    loop {
        let rest = &region[cursor..];
        if has_signature(rest, MTHD) {
            log::warn!(
                "Collision with another MIDI, came up short in tracks (expected {}, got {recovered})",
                header.track_count
            );
            header.is_damaged = true;
            break;
        }

        if let Some((track, repair)) = extract_track(rest, policy.backtrack_floor) {
            log::info!("Found MTrk for track {recovered} ({repair:?})");
            if track.truncation_adjustment {
                header.is_damaged = true;
            }
            cursor += track.consumed();
            header.tracks.push(track);
            recovered = recovered.saturating_add(1);
            if recovered >= header.track_count {
                break;
            }
            continue;
        }

        log::warn!("Missing MTrk tag for track {recovered}, this indicates a damaged MIDI file. Starting recovery search");
        header.is_damaged = true;
        match resync(rest, policy.max_resync_distance) {
            Some(gap) => {
                log::info!(
                    "Found an MTrk tag at point {}, {gap} bytes were lost but sync is regained",
                    cursor + gap
                );
                cursor += gap;
            }
            None => {
                log::warn!("Recovery search exceeded end of data or max distance, or entered another MIDI header. Truncating MIDI file here");
                break;
            }
        }
    }

    header.track_count = recovered;
    cursor
}

/// Distance to the next `MTrk` in `rest`, skipping its first byte.
///
/// Gives up past `max_distance` bytes or on reaching an `MThd`, never syncing into another file.
fn resync(rest: &[u8], max_distance: usize) -> Option<usize> {
    let limit = rest.len().min(max_distance);
    let header_at = find_signature(rest, MTHD, limit).unwrap_or(limit);
    (1..header_at).find(|&j| has_signature(&rest[j..], MTRK))
}

/// Recovers the tracks of `header` then hands it over to `sink`, exactly once.
///
/// `offset` is the position of the chunk that started this file in the blob, it names the output.
/// Returns the resume offset within `region` and what became of the record.
pub fn carve_midi(
    mut header: HeaderRecord,
    region: &[u8],
    offset: usize,
    policy: &CarvePolicy,
    sink: &mut dyn MidiSink,
) -> (usize, Emission) {
    let consumed = recover_tracks(&mut header, region, policy);
    if !header.has_tracks() {
        log::warn!("Refusing to write trackless MIDI file found at {offset}");
        return (consumed, Emission::Refused);
    }
    let (status, track_count) = (header.status(), header.track_count);
    let emission = match sink.emit(header, offset) {
        Ok(file_name) => Emission::Written {
            file_name,
            status,
            track_count,
        },
        Err(CarveError::TracklessMidi { offset }) => {
            log::warn!("Refusing to write trackless MIDI file found at {offset}");
            Emission::Refused
        }
        Err(err) => {
            log::error!("{err}");
            Emission::Failed(err.to_string())
        }
    };
    (consumed, emission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::chunk_types::END_OF_TRACK;

    fn track(events: &[u8]) -> Vec<u8> {
        let mut data = MTRK.to_vec();
        data.extend_from_slice(&((events.len() + 4) as u32).to_be_bytes());
        data.extend_from_slice(events);
        data.extend_from_slice(&END_OF_TRACK);
        data
    }

    fn header(track_count: u16) -> HeaderRecord {
        HeaderRecord {
            format_type: 1,
            track_count,
            time_division: 96,
            ..HeaderRecord::default()
        }
    }

    #[test]
    fn test_recover_all_declared_tracks() {
        let mut region = track(&[0x00, 0x90, 0x3C, 0x40]);
        region.extend(track(&[0x00, 0xC0, 0x05]));
        let end_of_tracks = region.len();
        region.extend(track(&[0x00, 0x80, 0x3C, 0x00]));

        let mut midi = header(2);
        let cursor = recover_tracks(&mut midi, &region, &CarvePolicy::default());
        assert_eq!(cursor, end_of_tracks);
        assert_eq!(midi.tracks.len(), 2);
        assert_eq!(midi.track_count, 2);
        assert!(!midi.is_damaged);
    }

    #[test]
    fn test_collision_shrinks_track_count() {
        let mut region = track(&[0x00, 0x90, 0x3C, 0x40]);
        let collision = region.len();
        region.extend_from_slice(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60");

        let mut midi = header(3);
        let cursor = recover_tracks(&mut midi, &region, &CarvePolicy::default());
        assert_eq!(cursor, collision);
        assert_eq!(midi.track_count, 1);
        assert!(midi.is_damaged);
    }

    #[test]
    fn test_repaired_trailer_marks_damage() {
        let mut region = MTRK.to_vec();
        region.extend_from_slice(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x90, 0x3C, 0x40]);

        let mut midi = header(1);
        let cursor = recover_tracks(&mut midi, &region, &CarvePolicy::default());
        assert_eq!(cursor, region.len());
        assert_eq!(midi.track_count, 1);
        assert!(midi.tracks[0].truncation_adjustment);
        assert!(midi.is_damaged);
    }

    #[test]
    fn test_resync_over_garbage() {
        let mut region = track(&[0x00, 0x90, 0x3C, 0x40]);
        region.extend_from_slice(&[0xEE; 25]);
        region.extend(track(&[0x00, 0x80, 0x3C, 0x00]));

        let mut midi = header(2);
        let cursor = recover_tracks(&mut midi, &region, &CarvePolicy::default());
        assert_eq!(cursor, region.len());
        assert_eq!(midi.track_count, 2);
        assert_eq!(midi.tracks.len(), 2);
        assert!(midi.is_damaged);
    }

    #[test]
    fn test_resync_bounded_by_max_distance() {
        let mut region = track(&[0x00, 0x90, 0x3C, 0x40]);
        let gap_start = region.len();
        region.extend_from_slice(&[0xEE; 64]);
        region.extend(track(&[0x00, 0x80, 0x3C, 0x00]));

        let policy = CarvePolicy {
            max_resync_distance: 32,
            ..CarvePolicy::default()
        };
        let mut midi = header(2);
        let cursor = recover_tracks(&mut midi, &region, &policy);
        assert_eq!(cursor, gap_start);
        assert_eq!(midi.track_count, 1);
        assert!(midi.is_damaged);
    }

    #[test]
    fn test_resync_never_enters_another_header() {
        let mut region = vec![0xEE; 10];
        region.extend_from_slice(b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60");
        region.extend(track(&[0x00, 0x90, 0x3C, 0x40]));

        let mut midi = header(1);
        let cursor = recover_tracks(&mut midi, &region, &CarvePolicy::default());
        assert_eq!(cursor, 0);
        assert_eq!(midi.track_count, 0);
        assert!(!midi.has_tracks());
        assert!(midi.is_damaged);
    }

    #[test]
    fn test_empty_region() {
        let mut midi = header(1);
        assert_eq!(recover_tracks(&mut midi, &[], &CarvePolicy::default()), 0);
        assert_eq!(midi.track_count, 0);
        assert!(midi.is_damaged);
    }

    #[derive(Default)]
    struct Collect(Vec<(HeaderRecord, usize)>);

    impl MidiSink for Collect {
        fn emit(&mut self, header: HeaderRecord, offset: usize) -> Result<String, CarveError> {
            self.0.push((header, offset));
            Ok(format!("file-{offset}"))
        }
    }

    #[test]
    fn test_carve_midi_emits_once() {
        let region = track(&[0x00, 0x90, 0x3C, 0x40]);
        let mut sink = Collect::default();
        let (cursor, emission) =
            carve_midi(header(1), &region, 14, &CarvePolicy::default(), &mut sink);
        assert_eq!(cursor, region.len());
        assert_eq!(
            emission,
            Emission::Written {
                file_name: "file-14".to_string(),
                status: CarveStatus::Intact,
                track_count: 1,
            }
        );
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].1, 14);
    }

    #[test]
    fn test_carve_midi_refuses_trackless() {
        let mut sink = Collect::default();
        let (cursor, emission) =
            carve_midi(header(2), b"MThd", 0, &CarvePolicy::default(), &mut sink);
        assert_eq!(cursor, 0);
        assert_eq!(emission, Emission::Refused);
        assert!(sink.0.is_empty());
    }
}
