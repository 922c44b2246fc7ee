use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const PALETTES_FILE: &str = "palettes.json";
pub const RECENT_COLORS_FILE: &str = "recent-colors.json";

/// On-disk shape of `palettes.json`. Only user palettes are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalettesFile {
    #[serde(default)]
    pub palettes: Vec<PaletteRecord>,
    #[serde(default)]
    pub current_palette_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `#aarrggbb` strings.
    #[serde(default)]
    pub colors: Vec<String>,
}

/// The data directory holding the palette files.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn palettes_path(&self) -> PathBuf {
        self.dir.join(PALETTES_FILE)
    }

    pub fn recent_colors_path(&self) -> PathBuf {
        self.dir.join(RECENT_COLORS_FILE)
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load_palettes(&self) -> Result<Option<PalettesFile>, StoreError> {
        let Some(content) = read_optional(&self.palettes_path())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save_palettes(&self, data: &PalettesFile) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(data)?;
        write_atomic(&self.palettes_path(), &payload)
    }

    /// Hex strings, newest first. Empty when the file does not exist yet.
    pub fn load_recent_colors(&self) -> Result<Vec<String>, StoreError> {
        let Some(content) = read_optional(&self.recent_colors_path())? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_recent_colors(&self, colors: &[String]) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(colors)?;
        write_atomic(&self.recent_colors_path(), &payload)
    }
}

pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Write through a temporary sibling and rename over the target.
pub(crate) fn write_atomic(path: &Path, payload: &str) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, payload.as_bytes())?;
    std::fs::rename(tmp_path, path)?;
    Ok(())
}
