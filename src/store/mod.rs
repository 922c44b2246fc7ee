//! Palettes and the store that owns, ranks and persists them.

pub mod event;
pub mod palette;
pub mod standard;
pub mod storage;

use std::sync::mpsc::Receiver;

use crate::color::Color;
use crate::error::StoreError;

pub use event::{EventBus, PaletteEvent};
pub use palette::{Palette, PaletteKind};
pub use standard::{standard_palette, STANDARD_COLORS_PALETTE_ID};
pub use storage::{PaletteRecord, PalettesFile, Storage};

pub const RECENTLY_PICKED_PALETTE_ID: &str = "recently-picked-colors";
pub const RECENTLY_PICKED_PALETTE_NAME: &str = "Recently Picked";
/// Most recent colors kept; older ones are evicted first.
pub const MAX_RECENT_COLORS: usize = 24;

/// Every palette known to the application, plus which one is current.
///
/// Index 0 is always the recently-picked palette and index 1 the standard
/// colors once [`PaletteStore::load`] has run; user palettes follow.
/// Callers sharing a store across threads must serialize access themselves.
#[derive(Debug)]
pub struct PaletteStore {
    storage: Storage,
    palettes: Vec<Palette>,
    current: Option<String>,
    events: EventBus,
}

impl PaletteStore {
    /// An empty store. Call [`PaletteStore::load`] before use.
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            palettes: Vec::new(),
            current: None,
            events: EventBus::default(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<PaletteEvent> {
        self.events.subscribe()
    }

    /// Rebuild the store from disk: system palettes first, then user palettes,
    /// then the remembered current palette.
    pub fn load(&mut self) {
        self.palettes.clear();
        self.current = None;

        self.palettes.push(self.load_recent_palette());
        self.palettes.push(standard_palette());

        let file = match self.storage.load_palettes() {
            Ok(file) => file.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(
                    path = %self.storage.palettes_path().display(),
                    %err,
                    "failed to load palettes, starting without user palettes"
                );
                PalettesFile::default()
            }
        };

        for record in file.palettes {
            if let Some(palette) = self.palette_from_record(record) {
                self.palettes.push(palette);
            }
        }

        self.current = self.resolve_current(&file.current_palette_id);
        tracing::info!(
            palettes = self.palettes.len(),
            current = ?self.current,
            "palette store loaded"
        );
    }

    fn load_recent_palette(&self) -> Palette {
        let mut recent = Palette::with_id(
            RECENTLY_PICKED_PALETTE_ID,
            RECENTLY_PICKED_PALETTE_NAME,
            PaletteKind::Recent,
        );
        let entries = self.storage.load_recent_colors().unwrap_or_else(|err| {
            tracing::warn!(%err, "failed to load recent colors");
            Vec::new()
        });
        for text in entries {
            if recent.color_count() >= MAX_RECENT_COLORS {
                break;
            }
            match Color::from_hex(&text) {
                Ok(color) if !recent.contains(color) => recent.push(color, ""),
                Ok(_) => {}
                Err(err) => tracing::debug!(%err, "skipping recent color"),
            }
        }
        recent
    }

    fn palette_from_record(&self, record: PaletteRecord) -> Option<Palette> {
        if record.id == RECENTLY_PICKED_PALETTE_ID || record.id == STANDARD_COLORS_PALETTE_ID {
            tracing::warn!(id = %record.id, "ignoring user palette with a reserved id");
            return None;
        }
        if !record.id.is_empty() && self.palette(&record.id).is_some() {
            tracing::warn!(
                id = %record.id,
                name = %record.name,
                "ignoring user palette with a duplicate id"
            );
            return None;
        }
        let mut palette = if record.id.is_empty() {
            Palette::new(record.name)
        } else {
            Palette::with_id(record.id, record.name, PaletteKind::User)
        };
        for text in &record.colors {
            palette.add_hex(text, "");
        }
        Some(palette)
    }

    /// Remembered id if it still exists, else the recent palette, else the
    /// first user palette, else the first palette.
    fn resolve_current(&self, remembered: &str) -> Option<String> {
        let pick = self
            .palettes
            .iter()
            .find(|p| !remembered.is_empty() && p.id() == remembered)
            .or_else(|| self.palette(RECENTLY_PICKED_PALETTE_ID))
            .or_else(|| self.palettes.iter().find(|p| !p.is_read_only()))
            .or_else(|| self.palettes.first());
        pick.map(|p| p.id().to_string())
    }

    /// Write user palettes and the current selection to `palettes.json`.
    pub fn save(&self) -> Result<(), StoreError> {
        let file = PalettesFile {
            palettes: self
                .palettes
                .iter()
                .filter(|p| !p.is_read_only())
                .map(|p| PaletteRecord {
                    id: p.id().to_string(),
                    name: p.name().to_string(),
                    colors: p.colors().iter().map(|c| c.to_hex_argb()).collect(),
                })
                .collect(),
            current_palette_id: self.current.clone().unwrap_or_default(),
        };
        self.storage.save_palettes(&file)
    }

    fn save_or_warn(&self) {
        if let Err(err) = self.save() {
            tracing::warn!(
                path = %self.storage.palettes_path().display(),
                %err,
                "failed to save palettes"
            );
        }
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn palette(&self, id: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.id() == id)
    }

    pub fn palette_mut(&mut self, id: &str) -> Option<&mut Palette> {
        self.palettes.iter_mut().find(|p| p.id() == id)
    }

    /// First palette whose name matches, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&Palette> {
        self.palettes
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn current_palette_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_palette(&self) -> Option<&Palette> {
        self.current.as_deref().and_then(|id| self.palette(id))
    }

    pub fn recent_colors(&self) -> &[Color] {
        self.palette(RECENTLY_PICKED_PALETTE_ID)
            .map(Palette::colors)
            .unwrap_or_default()
    }

    /// Append a new editable palette.
    pub fn create_palette(&mut self, name: &str) -> &Palette {
        let palette = Palette::new(name);
        let id = palette.id().to_string();
        self.palettes.push(palette);
        self.events.publish(PaletteEvent::Added { id });
        let last = self.palettes.len() - 1;
        &self.palettes[last]
    }

    /// Switch the current palette. Unknown ids and the already-current id are ignored.
    pub fn set_current_palette(&mut self, id: &str) -> bool {
        if self.palette(id).is_none() || self.current.as_deref() == Some(id) {
            return false;
        }
        self.current = Some(id.to_string());
        self.events.publish(PaletteEvent::CurrentChanged { id: id.to_string() });
        true
    }

    /// Remove a user palette. Read-only and unknown palettes are refused.
    ///
    /// If the removed palette was current, the first editable palette takes
    /// over, else the first palette of any kind.
    pub fn delete_palette(&mut self, id: &str) -> bool {
        let Some(index) = self.palettes.iter().position(|p| p.id() == id) else {
            return false;
        };
        if self.palettes[index].is_read_only() {
            return false;
        }

        let was_current = self.current.as_deref() == Some(id);
        self.palettes.remove(index);
        self.events.publish(PaletteEvent::Removed { id: id.to_string() });

        if was_current {
            self.current = self
                .palettes
                .iter()
                .find(|p| !p.is_read_only())
                .or_else(|| self.palettes.first())
                .map(|p| p.id().to_string());
            if let Some(current) = self.current.clone() {
                self.events
                    .publish(PaletteEvent::CurrentChanged { id: current });
            }
        }

        self.save_or_warn();
        true
    }

    pub fn rename_palette(&mut self, id: &str, new_name: &str) -> bool {
        let Some(palette) = self.palette_mut(id) else {
            return false;
        };
        palette.set_name(new_name);
        self.events.publish(PaletteEvent::Renamed { id: id.to_string() });
        true
    }

    /// Append a color to an editable palette and persist.
    pub fn add_color(&mut self, id: &str, color: Color, name: &str) -> bool {
        let added = self
            .palette_mut(id)
            .is_some_and(|palette| palette.add_color(color, name));
        if added {
            self.events.publish(PaletteEvent::ColorsChanged { id: id.to_string() });
            self.save_or_warn();
        }
        added
    }

    /// Remove a color from an editable palette and persist.
    pub fn remove_color(&mut self, id: &str, index: usize) -> bool {
        let removed = self
            .palette_mut(id)
            .is_some_and(|palette| palette.remove_color(index));
        if removed {
            self.events.publish(PaletteEvent::ColorsChanged { id: id.to_string() });
            self.save_or_warn();
        }
        removed
    }

    /// Record a picked color: it moves to the front of the recent palette,
    /// which keeps at most [`MAX_RECENT_COLORS`] entries. Persists immediately.
    pub fn add_to_recent_colors(&mut self, color: Color) {
        let Some(recent) = self
            .palettes
            .iter_mut()
            .find(|p| p.kind().allows_recency_mutation())
        else {
            tracing::warn!("no recent-colors palette; was the store loaded?");
            return;
        };
        if !recent.promote_recent(color, MAX_RECENT_COLORS) {
            return;
        }
        let id = recent.id().to_string();
        let hex: Vec<String> = recent.colors().iter().map(|c| c.to_hex_argb()).collect();

        if let Err(err) = self.storage.save_recent_colors(&hex) {
            tracing::warn!(
                path = %self.storage.recent_colors_path().display(),
                %err,
                "failed to save recent colors"
            );
        }
        self.events.publish(PaletteEvent::ColorsChanged { id });
    }
}
