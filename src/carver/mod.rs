pub mod midi_writer;
pub mod orphan;
pub mod recovery;
pub mod scanner;

use serde::Deserialize;

/// Furthest distance searched for the next `MTrk` after losing sync
pub const MAX_RESYNC_DISTANCE: usize = 32768;

/// Backward search for a foreign header never goes below this chunk offset
pub const BACKTRACK_FLOOR: usize = 8;

/// Time division given to headers fabricated around orphan tracks
pub const ORPHAN_TIME_DIVISION: u16 = 120;

/// Tunables of the carving heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CarvePolicy {
    pub max_resync_distance: usize,
    pub backtrack_floor: usize,
    pub orphan_time_division: u16,
}

impl Default for CarvePolicy {
    fn default() -> Self {
        Self {
            max_resync_distance: MAX_RESYNC_DISTANCE,
            backtrack_floor: BACKTRACK_FLOOR,
            orphan_time_division: ORPHAN_TIME_DIVISION,
        }
    }
}
