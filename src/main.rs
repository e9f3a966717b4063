use clap::Parser;
use config::Config;
use midicarve::{load_blob, scan_blob, CarveError, DirectoryWriter};
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

mod config;

/// Output folder created next to the scanned blob
const DEFAULT_OUT_FOLDER: &str = "mcut-out";

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("midicarve=info"))
        .init();

    // args
    let args = CliArgs::parse();
    let blob_path = PathBuf::from(&args.blob);

    // read local config, the built-in policy is good enough without it
    let mut policy = match Config::read_config() {
        Ok(config) => config.policy(),
        Err(err) => {
            log::warn!("Ignoring local configuration: {err}");
            Config::default().policy()
        }
    };
    if let Some(max_resync_distance) = args.max_resync_distance {
        policy.max_resync_distance = max_resync_distance;
    }

    // load the whole blob
    let blob = load_blob(&blob_path)?;

    // somewhere to dump output files
    let out_dir = args
        .output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| default_out_dir(&blob_path));
    if let Err(err) = create_dir_all(&out_dir) {
        log::error!("Could not create output folder {out_dir:?}: {err}");
    }

    log::info!("Writing carved files to {out_dir:?}");
    log::debug!("Carving with {policy:?}");

    // go!
    let mut writer = DirectoryWriter::new(out_dir);
    let report = scan_blob(&blob, &policy, &mut writer);
    for carved in &report.carved {
        log::debug!(
            "{} <- offset {}, {} tracks",
            carved.file_name, carved.offset, carved.track_count
        );
    }
    Ok(())
}

fn default_out_dir(blob_path: &Path) -> PathBuf {
    blob_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUT_FOLDER)
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the binary blob to scan.
    blob: String,
    /// Optional folder receiving the carved files, defaults to `mcut-out` next to the blob.
    #[arg(long)]
    output_dir: Option<String>,
    /// Optional furthest distance searched for a track after losing sync.
    #[arg(long)]
    max_resync_distance: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("input error: {0}")]
    InputError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<CarveError> for AppError {
    fn from(error: CarveError) -> Self {
        match error {
            // the blob is the only thing read before scanning
            CarveError::IoError(s) => Self::InputError(s),
            CarveError::ConfigError(s) => Self::ConfigError(s),
            err @ (CarveError::TracklessMidi { .. } | CarveError::TrackTooLong { .. }) => {
                Self::OtherError(err.to_string())
            }
        }
    }
}
