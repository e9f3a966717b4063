//! Midicarve - Standard MIDI File carver
//!
//! This library provides:
//! - Detection of `MThd`/`MTrk` chunks inside raw binary blobs
//! - Repair of truncated, overwritten or interleaved track chunks
//! - Reconstruction of headers for orphaned tracks
//! - Serialization of recovered files as canonical Standard MIDI Files
//!
//! # Example
//!
//! ```no_run
//! use midicarve::{scan_blob, CarvePolicy, DirectoryWriter};
//!
//! let blob = std::fs::read("disk.img").unwrap();
//! let mut writer = DirectoryWriter::new("mcut-out");
//! let report = scan_blob(&blob, &CarvePolicy::default(), &mut writer);
//! println!("{} files carved", report.carved.len());
//! ```

pub mod carver;
pub mod error;
pub mod parser;

// Re-export main types for convenience
pub use carver::{
    midi_writer::{output_file_name, write_midi, DirectoryWriter, MidiSink},
    orphan::synthesize_header,
    recovery::{carve_midi, recover_tracks, Emission},
    scanner::{load_blob, scan_blob, CarvedFile, ScanReport},
    CarvePolicy, BACKTRACK_FLOOR, MAX_RESYNC_DISTANCE, ORPHAN_TIME_DIVISION,
};
pub use error::CarveError;
pub use parser::chunk_types::{CarveStatus, HeaderRecord, TrackRecord, END_OF_TRACK};
pub use parser::header_parser::extract_header;
pub use parser::track_parser::{extract_track, TrackRepair};
