//! Standard MIDI File chunk records
//!
//! Reference: <https://www.midi.org/specifications/file-format-specifications/standard-midi-files>

/// Signature of a header chunk
pub const MTHD: &[u8] = b"MThd";

/// Signature of a track chunk
pub const MTRK: &[u8] = b"MTrk";

/// "End of track" meta event closing every track chunk
pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Chunk length carried by every well-formed header chunk
pub const HEADER_CHUNK_LENGTH: u32 = 6;

/// Bytes consumed by the header parser: signature, length and three u16 fields
pub const HEADER_SIZE: usize = 14;

/// Signature and length field in front of every track payload
pub const TRACK_PRELUDE_SIZE: usize = 8;

/// Returns true if `i` starts with the chunk signature `signature`.
pub fn has_signature(i: &[u8], signature: &[u8]) -> bool {
    i.starts_with(signature)
}

/// One `MThd` chunk and the chain of tracks recovered for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderRecord {
    pub format_type: u16,
    /// Expected number of tracks, shrunk to the tracks actually recovered.
    pub track_count: u16,
    pub time_division: u16,
    /// Set whenever a repair heuristic touched the file structure.
    pub is_damaged: bool,
    /// Set only for headers fabricated around orphan tracks.
    pub is_synthesized: bool,
    pub tracks: Vec<TrackRecord>,
}

impl HeaderRecord {
    pub const fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Suffix used in the output file name, a triage signal for the operator.
    pub const fn status(&self) -> CarveStatus {
        if self.is_synthesized {
            CarveStatus::Orphan
        } else if self.is_damaged {
            CarveStatus::Damaged
        } else {
            CarveStatus::Intact
        }
    }
}

/// One `MTrk` chunk, its payload always closed by [`END_OF_TRACK`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    payload: Vec<u8>,
    /// The last four payload bytes were synthesized and are absent from the source buffer.
    pub truncation_adjustment: bool,
}

impl TrackRecord {
    pub(crate) const fn new(payload: Vec<u8>, truncation_adjustment: bool) -> Self {
        Self {
            payload,
            truncation_adjustment,
        }
    }

    /// Payload length as carried in the output chunk.
    pub fn length(&self) -> usize {
        self.payload.len()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of source buffer bytes covered by this chunk.
    pub fn consumed(&self) -> usize {
        let chunk = TRACK_PRELUDE_SIZE + self.length();
        if self.truncation_adjustment {
            chunk - END_OF_TRACK.len()
        } else {
            chunk
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveStatus {
    Intact,
    Damaged,
    Orphan,
}

impl CarveStatus {
    pub const fn suffix(&self) -> &'static str {
        match self {
            CarveStatus::Intact => "OK",
            CarveStatus::Damaged => "BAD",
            CarveStatus::Orphan => "ORPH",
        }
    }
}
