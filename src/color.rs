use palette::{FromColor, IntoColor, Oklch, Srgb};
use rand::Rng;

use crate::error::ParseColorError;

/// Core color type shared by every part of the crate.
/// Four 8-bit channels; alpha is 255 unless a notation says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// An opaque color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Alpha as a fraction in [0, 1].
    pub fn alpha_f(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Parse a hex color such as `#ff8800`, `ff8800`, `#f80` or `#80ff8800`.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        crate::format::parse_hex(hex)
    }

    /// Lowercase `#rrggbb`, or `#aarrggbb` when the color is translucent.
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            self.to_hex_argb()
        }
    }

    /// Lowercase `#aarrggbb`, always including alpha. This is the persisted form.
    pub fn to_hex_argb(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }

    /// Convert to `palette::Srgb<u8>`, dropping alpha.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    pub fn to_srgb_f32(self) -> Srgb<f32> {
        self.to_srgb_u8().into_format()
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to an opaque Color.
    pub fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(r, g, b)
    }

    /// Convert to Oklch (lightness adjustments for contrast fixing).
    pub fn to_oklch(self) -> Oklch {
        self.to_srgb_f32().into_color()
    }

    /// Create an opaque color from Oklch.
    pub fn from_oklch(oklch: Oklch) -> Self {
        let srgb_f32: Srgb<f32> = Srgb::from_color(oklch);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Squared Euclidean distance in RGB space. Alpha is ignored.
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db) as u32
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.0 contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f32 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Adjust Oklch lightness by `delta`. Positive = lighter, negative = darker.
    /// Lightness is clamped to [0, 1]; alpha is preserved.
    pub fn adjust_lightness(self, delta: f32) -> Color {
        let mut oklch = self.to_oklch();
        oklch.l = (oklch.l + delta).clamp(0.0, 1.0);
        Color::from_oklch(oklch).with_alpha(self.a)
    }

    /// A uniformly random opaque color.
    pub fn random() -> Color {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Color::new(rng.gen(), rng.gen(), rng.gen())
    }

    /// Linear channel-wise interpolation, `t` in [0, 1].
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let a = f64::from(a);
            (a + t * (f64::from(b) - a)) as u8
        };
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::new(r, g, b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ParseColorError;

    /// Accepts any notation understood by [`crate::format::detect`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::format::detect(s).map(|(color, _)| color)
    }
}
