use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "colorsmith";
pub const DATA_DIR_ENV: &str = "COLORSMITH_DATA_DIR";

/// Runtime configuration shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve from an optional command-line override and the process environment.
    pub fn from_env(data_dir: Option<PathBuf>) -> Self {
        Self::resolve(data_dir, |key| std::env::var(key).ok())
    }

    /// Explicit override, then `COLORSMITH_DATA_DIR`, then the XDG data
    /// home, then `~/.local/share`, then the system temp dir.
    pub fn resolve(data_dir: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

        let data_dir = data_dir
            .or_else(|| non_empty(DATA_DIR_ENV).map(PathBuf::from))
            .or_else(|| non_empty("XDG_DATA_HOME").map(|d| Path::new(&d).join(APP_DIR_NAME)))
            .or_else(|| {
                non_empty("HOME").map(|home| {
                    Path::new(&home)
                        .join(".local")
                        .join("share")
                        .join(APP_DIR_NAME)
                })
            })
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME));

        Self { data_dir }
    }
}
