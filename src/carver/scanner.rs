use crate::carver::midi_writer::MidiSink;
use crate::carver::orphan::synthesize_header;
use crate::carver::recovery::{carve_midi, Emission};
use crate::carver::CarvePolicy;
use crate::parser::chunk_types::{has_signature, CarveStatus, HEADER_SIZE, MTRK};
use crate::parser::header_parser::extract_header;
use crate::CarveError;
use std::path::Path;

/// One file handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarvedFile {
    /// Blob offset of the chunk starting the file.
    pub offset: usize,
    pub file_name: String,
    pub status: CarveStatus,
    /// Tracks actually written.
    pub track_count: u16,
}

/// Summary of a full scan over a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub carved: Vec<CarvedFile>,
    /// Headers dropped because no track could be recovered.
    pub refused: usize,
    /// Files the sink failed to write.
    pub failed: usize,
}

impl ScanReport {
    fn record(&mut self, emission: Emission, offset: usize) {
        match emission {
            Emission::Written {
                file_name,
                status,
                track_count,
            } => self.carved.push(CarvedFile {
                offset,
                file_name,
                status,
                track_count,
            }),
            Emission::Refused => self.refused += 1,
            Emission::Failed(_) => self.failed += 1,
        }
    }
}

/// Reads the whole blob at `path` into memory.
pub fn load_blob(path: &Path) -> Result<Vec<u8>, CarveError> {
    let blob = std::fs::read(path)
        .map_err(|err| CarveError::IoError(format!("could not open {}: {err}", path.display())))?;
    log::info!("Opened {} for reading, {} bytes long", path.display(), blob.len());
    Ok(blob)
}

/// Walks the whole `blob` looking for MIDI chunks, every recovered file goes to `sink`.
pub fn scan_blob(blob: &[u8], policy: &CarvePolicy, sink: &mut dyn MidiSink) -> ScanReport {
    let mut report = ScanReport::default();
    let mut position = 0;

    while position < blob.len() {
        let rest = &blob[position..];
        if has_signature(rest, MTRK) {
            // MTrk outside of an MThd, it needs a new generic MThd to contain it
            log::info!("Found an orphan MIDI track at {position}, source is maybe fragmented");
            let header = synthesize_header(rest, policy);
            let (consumed, emission) = carve_midi(header, rest, position, policy, sink);
            report.record(emission, position);
            // a bare signature without its length field yields nothing
            position += consumed.max(1);
        } else if let Some(header) = extract_header(rest) {
            log::info!("Found a MIDI header starting at {position}");
            let region = &rest[HEADER_SIZE..];
            let (consumed, emission) = carve_midi(header, region, position, policy, sink);
            report.record(emission, position);
            position += HEADER_SIZE + consumed;
        } else {
            position += 1;
        }
    }

    log::info!(
        "Scan complete: {} files carved, {} refused, {} failed",
        report.carved.len(),
        report.refused,
        report.failed
    );
    report
}
