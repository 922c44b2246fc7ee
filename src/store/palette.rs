use uuid::Uuid;

use crate::color::Color;

/// What a palette allows callers to do with its colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    /// Created by the user; freely editable and persisted.
    User,
    /// Shipped with the application; never edited.
    System,
    /// Read-only to ordinary edits, but reordered by recency updates.
    Recent,
}

impl PaletteKind {
    pub fn is_read_only(self) -> bool {
        !matches!(self, PaletteKind::User)
    }

    pub fn allows_recency_mutation(self) -> bool {
        matches!(self, PaletteKind::Recent)
    }
}

/// A named, ordered list of colors with optional per-color names.
///
/// `color_names` is index-aligned with `colors` and never longer.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    id: String,
    name: String,
    kind: PaletteKind,
    colors: Vec<Color>,
    color_names: Vec<String>,
}

impl Palette {
    /// A new editable palette with a fresh unique id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, PaletteKind::User)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, kind: PaletteKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            colors: Vec::new(),
            color_names: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    pub fn is_read_only(&self) -> bool {
        self.kind.is_read_only()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// The display name at `index`, if one was given.
    pub fn color_name(&self, index: usize) -> Option<&str> {
        self.color_names
            .get(index)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Append a color. Refused on read-only palettes.
    pub fn add_color(&mut self, color: Color, name: &str) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.push(color, name);
        true
    }

    /// Parse `text` as hex and append it. Unreadable text leaves the palette unchanged.
    pub fn add_hex(&mut self, text: &str, name: &str) -> bool {
        match Color::from_hex(text) {
            Ok(color) => self.add_color(color, name),
            Err(err) => {
                tracing::debug!(palette = %self.id, %err, "skipping invalid color");
                false
            }
        }
    }

    /// Remove the color at `index`; out-of-range indices are ignored.
    pub fn remove_color(&mut self, index: usize) -> bool {
        if self.is_read_only() || index >= self.colors.len() {
            return false;
        }
        self.colors.remove(index);
        if index < self.color_names.len() {
            self.color_names.remove(index);
        }
        true
    }

    /// Replace every color. Names are reset to empty.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.replace(colors);
        true
    }

    pub fn clear_colors(&mut self) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.colors.clear();
        self.color_names.clear();
        true
    }

    /// Move `color` to the front, dropping any earlier occurrence, and keep at
    /// most `cap` entries. Only recency palettes accept this.
    pub(crate) fn promote_recent(&mut self, color: Color, cap: usize) -> bool {
        if !self.kind.allows_recency_mutation() {
            return false;
        }
        let mut colors = Vec::with_capacity(cap.min(self.colors.len() + 1));
        colors.push(color);
        colors.extend(self.colors.iter().copied().filter(|c| *c != color));
        colors.truncate(cap);
        self.replace(colors);
        true
    }

    /// Bootstrap-only append that bypasses the read-only check.
    pub(crate) fn push(&mut self, color: Color, name: &str) {
        self.colors.push(color);
        self.color_names.push(name.to_string());
    }

    fn replace(&mut self, colors: Vec<Color>) {
        self.color_names = vec![String::new(); colors.len()];
        self.colors = colors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const GREEN: Color = Color::new(0, 255, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    fn user_palette() -> Palette {
        let mut palette = Palette::new("Mine");
        palette.add_color(RED, "red");
        palette.add_color(GREEN, "");
        palette.add_color(BLUE, "blue");
        palette
    }

    #[test]
    fn new_palettes_get_unique_ids() {
        let a = Palette::new("a");
        let b = Palette::new("a");
        assert_ne!(a.id(), b.id());
        assert!(!a.is_read_only());
    }

    #[test]
    fn add_color_appends_with_names() {
        let palette = user_palette();
        assert_eq!(palette.colors(), &[RED, GREEN, BLUE]);
        assert_eq!(palette.color_name(0), Some("red"));
        assert_eq!(palette.color_name(1), None);
        assert_eq!(palette.color_name(2), Some("blue"));
        assert_eq!(palette.color_name(3), None);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut palette = Palette::new("dupes");
        palette.add_color(RED, "");
        palette.add_color(RED, "");
        assert_eq!(palette.color_count(), 2);
    }

    #[test]
    fn invalid_hex_leaves_count_unchanged() {
        let mut palette = user_palette();
        assert!(!palette.add_hex("#nothex", "bad"));
        assert!(!palette.add_hex("", "empty"));
        assert_eq!(palette.color_count(), 3);
        assert!(palette.add_hex("#abcdef", "ok"));
        assert_eq!(palette.color_count(), 4);
    }

    #[test]
    fn remove_color_keeps_names_aligned() {
        let mut palette = user_palette();
        assert!(palette.remove_color(0));
        assert_eq!(palette.colors(), &[GREEN, BLUE]);
        assert_eq!(palette.color_name(1), Some("blue"));
        assert!(!palette.remove_color(5));
        assert_eq!(palette.color_count(), 2);
    }

    #[test]
    fn set_colors_resets_names() {
        let mut palette = user_palette();
        assert!(palette.set_colors(vec![BLUE, RED]));
        assert_eq!(palette.colors(), &[BLUE, RED]);
        assert_eq!(palette.color_name(0), None);
        assert_eq!(palette.color_name(1), None);
    }

    #[test]
    fn clear_empties_everything() {
        let mut palette = user_palette();
        assert!(palette.clear_colors());
        assert_eq!(palette.color_count(), 0);
        assert_eq!(palette.color_name(0), None);
    }

    #[test]
    fn read_only_palettes_refuse_edits() {
        let mut palette = Palette::with_id("sys", "System", PaletteKind::System);
        palette.push(RED, "red");
        assert!(!palette.add_color(GREEN, ""));
        assert!(!palette.remove_color(0));
        assert!(!palette.set_colors(vec![]));
        assert!(!palette.clear_colors());
        assert!(!palette.promote_recent(GREEN, 24));
        assert_eq!(palette.colors(), &[RED]);
    }

    #[test]
    fn recent_palettes_only_move_through_promotion() {
        let mut recent = Palette::with_id("recent", "Recent", PaletteKind::Recent);
        assert!(!recent.add_color(RED, ""));
        assert!(recent.promote_recent(RED, 2));
        assert!(recent.promote_recent(GREEN, 2));
        assert!(recent.promote_recent(RED, 2));
        assert_eq!(recent.colors(), &[RED, GREEN]);
        assert!(recent.promote_recent(BLUE, 2));
        assert_eq!(recent.colors(), &[BLUE, RED]);
    }
}
