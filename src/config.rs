use std::{fs::File, io::BufReader, path::PathBuf};

use home::home_dir;
use serde::Deserialize;

use midicarve::{CarveError, CarvePolicy};

/// Local settings, `~/.midicarve/config.json`.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct Config {
    policy: Option<CarvePolicy>,
}

impl Config {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".midicarve";
    const FILE: &'static str = "config.json";

    pub fn policy(&self) -> CarvePolicy {
        self.policy.unwrap_or_default()
    }

    fn get_path() -> Result<PathBuf, CarveError> {
        let home = home_dir()
            .ok_or_else(|| CarveError::ConfigError("Could not find home directory".to_string()))?;
        Ok(home.join(Self::FOLDER).join(Self::FILE))
    }

    /// Falls back to the defaults when no config file exists
    pub fn read_config() -> Result<Self, CarveError> {
        let config_path = Self::get_path()?;
        if !config_path.exists() {
            log::debug!("No local configuration at {config_path:?}");
            return Ok(Config::default());
        }
        Self::read_from(File::open(config_path)?)
    }

    fn read_from(file: File) -> Result<Self, CarveError> {
        serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            CarveError::ConfigError(format!("Could not read local configuration {err:}"))
        })
    }
}
