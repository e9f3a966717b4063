use crate::parser::chunk_types::{HeaderRecord, HEADER_CHUNK_LENGTH, MTHD, MTRK};
use crate::CarveError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the file carved from `header` found at `offset` in the blob.
pub fn output_file_name(header: &HeaderRecord, offset: usize) -> String {
    format!("mc-{offset:08}-{}.mid", header.status().suffix())
}

/// Serializes `header` and its tracks as a canonical Standard MIDI File.
pub fn write_midi<W: Write>(header: &HeaderRecord, out: &mut W) -> Result<(), CarveError> {
    out.write_all(MTHD)?;
    out.write_all(&HEADER_CHUNK_LENGTH.to_be_bytes())?;
    out.write_all(&header.format_type.to_be_bytes())?;
    out.write_all(&header.track_count.to_be_bytes())?;
    out.write_all(&header.time_division.to_be_bytes())?;
    for track in &header.tracks {
        let length = chunk_length(track.length())?;
        out.write_all(MTRK)?;
        out.write_all(&length.to_be_bytes())?;
        out.write_all(track.payload())?;
    }
    Ok(())
}

/// Length field of a track chunk carrying `length` payload bytes.
fn chunk_length(length: usize) -> Result<u32, CarveError> {
    u32::try_from(length).map_err(|_| CarveError::TrackTooLong { length })
}

/// Receives every header record once its recovery is complete.
pub trait MidiSink {
    /// Takes ownership of `header`, found at `offset` in the blob, and returns the output name.
    fn emit(&mut self, header: HeaderRecord, offset: usize) -> Result<String, CarveError>;
}

/// Writes carved files into an existing directory.
pub struct DirectoryWriter {
    out_dir: PathBuf,
}

impl DirectoryWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl MidiSink for DirectoryWriter {
    fn emit(&mut self, header: HeaderRecord, offset: usize) -> Result<String, CarveError> {
        if !header.has_tracks() {
            return Err(CarveError::TracklessMidi { offset });
        }
        let file_name = output_file_name(&header, offset);
        let path = self.out_dir.join(&file_name);
        let file = File::create(&path).map_err(|err| {
            CarveError::IoError(format!("could not open {} for writing: {err}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        write_midi(&header, &mut writer)?;
        writer.flush()?;
        log::info!("Success! Wrote {} to disk", path.display());
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::chunk_types::TrackRecord;

    fn sample_header() -> HeaderRecord {
        HeaderRecord {
            format_type: 1,
            track_count: 2,
            time_division: 0x01E0,
            tracks: vec![
                TrackRecord::new(vec![0x00, 0xFF, 0x2F, 0x00], false),
                TrackRecord::new(vec![0x00, 0x90, 0x3C, 0x40, 0x00, 0xFF, 0x2F, 0x00], true),
            ],
            ..HeaderRecord::default()
        }
    }

    #[test]
    fn test_output_file_name() {
        let mut header = sample_header();
        assert_eq!(output_file_name(&header, 1234), "mc-00001234-OK.mid");
        header.is_damaged = true;
        assert_eq!(output_file_name(&header, 0), "mc-00000000-BAD.mid");
        header.is_synthesized = true;
        assert_eq!(output_file_name(&header, 100), "mc-00000100-ORPH.mid");
        assert_eq!(output_file_name(&header, 123_456_789), "mc-123456789-ORPH.mid");
    }

    #[test]
    fn test_write_midi() {
        let mut out = Vec::new();
        write_midi(&sample_header(), &mut out).unwrap();
        let mut expected = b"MThd\x00\x00\x00\x06\x00\x01\x00\x02\x01\xE0".to_vec();
        expected.extend_from_slice(b"MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00");
        expected.extend_from_slice(b"MTrk\x00\x00\x00\x08\x00\x90\x3C\x40\x00\xFF\x2F\x00");
        assert_eq!(out, expected);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_chunk_length_limit() {
        assert_eq!(chunk_length(0x0102_0304).unwrap(), 0x0102_0304);
        assert_eq!(chunk_length(u32::MAX as usize).unwrap(), u32::MAX);
        let too_long = u32::MAX as usize + 1;
        let err = chunk_length(too_long).unwrap_err();
        assert!(matches!(err, CarveError::TrackTooLong { length } if length == too_long));
    }

    #[test]
    fn test_directory_writer() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DirectoryWriter::new(dir.path());
        let name = writer.emit(sample_header(), 42).unwrap();
        assert_eq!(name, "mc-00000042-OK.mid");
        let written = std::fs::read(dir.path().join(name)).unwrap();
        assert_eq!(&written[..4], b"MThd");
        assert_eq!(written.len(), 14 + 12 + 16);
    }

    #[test]
    fn test_refuse_trackless_midi() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DirectoryWriter::new(dir.path());
        let header = HeaderRecord {
            format_type: 1,
            ..HeaderRecord::default()
        };
        let err = writer.emit(header, 7).unwrap_err();
        assert!(matches!(err, CarveError::TracklessMidi { offset: 7 }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = DirectoryWriter::new(dir.path().join("does-not-exist"));
        let err = writer.emit(sample_header(), 0).unwrap_err();
        assert!(matches!(err, CarveError::IoError(_)));
    }
}
