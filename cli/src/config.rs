use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_FILE_NAME: &str = "melanges.json";
pub const COUNTER_FILE_NAME: &str = "visits.json";

pub struct Config {
    pub data_dir: PathBuf,
    pub data_file: PathBuf,
    pub counter_file: PathBuf,
}

impl Config {
    /// Resolve the data directory: an explicit one wins, then the directory
    /// holding the executable (if `melanges.json` sits next to it), then the
    /// platform data directory.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = data_dir {
            return Ok(Self::in_dir(dir));
        }

        if let Some(dir) = exe_dir().filter(|d| d.join(DATA_FILE_NAME).is_file()) {
            return Ok(Self::in_dir(dir));
        }

        let proj_dirs =
            ProjectDirs::from("", "", "tisane").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self::in_dir(data_dir))
    }

    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Config {
            data_file: data_dir.join(DATA_FILE_NAME),
            counter_file: data_dir.join(COUNTER_FILE_NAME),
            data_dir,
        }
    }
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
