use crate::color::Color;

/// WCAG AA threshold for body text, and AAA for large text.
pub const AA_NORMAL: f32 = 4.5;
pub const AA_LARGE: f32 = 3.0;
pub const AAA_NORMAL: f32 = 7.0;
pub const AAA_LARGE: f32 = 4.5;

const LIGHTNESS_STEP: f32 = 0.02;

/// Contrast between a text color and a background, with WCAG 2.0 verdicts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastReport {
    pub ratio: f32,
    pub aa_normal: bool,
    pub aa_large: bool,
    pub aaa_normal: bool,
    pub aaa_large: bool,
}

impl ContrastReport {
    pub fn new(text: Color, background: Color) -> Self {
        let ratio = Color::contrast_ratio(&text, &background);
        Self {
            ratio,
            aa_normal: ratio >= AA_NORMAL,
            aa_large: ratio >= AA_LARGE,
            aaa_normal: ratio >= AAA_NORMAL,
            aaa_large: ratio >= AAA_LARGE,
        }
    }

    /// `"4.58:1"`.
    pub fn format_ratio(&self) -> String {
        format!("{:.2}:1", self.ratio)
    }
}

/// Push `text` lighter or darker (Oklch lightness) until it reaches
/// `min_ratio` against `background`.
///
/// Moves away from the background's luminance. If that direction runs out of
/// range first, the opposite direction is tried; the best candidate seen is
/// returned when neither reaches the target.
pub fn ensure_contrast(text: Color, background: Color, min_ratio: f32) -> Color {
    if Color::contrast_ratio(&text, &background) >= min_ratio {
        return text;
    }
    let lighten_first = text.relative_luminance() >= background.relative_luminance();
    let directions = if lighten_first {
        [LIGHTNESS_STEP, -LIGHTNESS_STEP]
    } else {
        [-LIGHTNESS_STEP, LIGHTNESS_STEP]
    };

    let mut best = text;
    let mut best_ratio = Color::contrast_ratio(&text, &background);
    for step in directions {
        let mut candidate = text;
        let steps = (1.0 / LIGHTNESS_STEP).ceil() as usize;
        for _ in 0..steps {
            candidate = candidate.adjust_lightness(step);
            let ratio = Color::contrast_ratio(&candidate, &background);
            if ratio > best_ratio {
                best = candidate;
                best_ratio = ratio;
            }
            if ratio >= min_ratio {
                return candidate;
            }
        }
    }
    tracing::debug!(
        target_ratio = min_ratio,
        reached = best_ratio,
        "contrast target not reachable"
    );
    best
}
