//! Error types for the midicarve library

use std::io;

/// Library error type for midicarve operations
#[derive(Debug, thiserror::Error)]
pub enum CarveError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A header record without any track was handed to the writer
    #[error("refusing to write trackless MIDI file found at offset {offset}")]
    TracklessMidi { offset: usize },

    /// A track payload does not fit the 32 bits chunk length
    #[error("track of {length} bytes does not fit a chunk length")]
    TrackTooLong { length: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for CarveError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
