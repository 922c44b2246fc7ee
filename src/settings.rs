use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::StoreError;
use crate::format::ColorFormat;
use crate::store::storage::{read_optional, write_atomic};

pub const SETTINGS_FILE: &str = "settings.json";

/// Small user preferences kept next to the palette files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_color: Option<String>,
    #[serde(default)]
    pub output_format: ColorFormat,
}

impl Settings {
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE)
    }

    /// Read `settings.json` from `dir`. Missing or unreadable files give defaults.
    pub fn load(dir: &Path) -> Self {
        let path = Self::path(dir);
        let content = match read_optional(&path) {
            Ok(Some(content)) => content,
            Ok(None) => return Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read settings");
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed settings");
            Self::default()
        })
    }

    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(self)?;
        write_atomic(&Self::path(dir), &payload)
    }

    /// The last picked color, if one was stored and still parses.
    pub fn last_color(&self) -> Option<Color> {
        self.last_color
            .as_deref()
            .and_then(|text| Color::from_hex(text).ok())
    }

    pub fn set_last_color(&mut self, color: Color) {
        self.last_color = Some(color.to_hex_argb());
    }
}
