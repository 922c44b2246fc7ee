//! Text notations for [`Color`]: hex, rgb(), rgba(), hsl(), hsla(), hsv() and cmyk().
//!
//! Every `to_*` function is infallible. Every `parse_*` function returns a
//! [`ParseColorError`] for text it cannot read and never panics.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use palette::{encoding, FromColor, Hsl, Hsv, Srgb};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ParseColorError;

type Hsl64 = Hsl<encoding::Srgb, f64>;
type Hsv64 = Hsv<encoding::Srgb, f64>;

/// The notations a color can be rendered in or read from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    Hsv,
    Cmyk,
}

impl ColorFormat {
    pub const ALL: [ColorFormat; 7] = [
        ColorFormat::Hex,
        ColorFormat::Rgb,
        ColorFormat::Rgba,
        ColorFormat::Hsl,
        ColorFormat::Hsla,
        ColorFormat::Hsv,
        ColorFormat::Cmyk,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorFormat::Hex => "hex",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Rgba => "rgba",
            ColorFormat::Hsl => "hsl",
            ColorFormat::Hsla => "hsla",
            ColorFormat::Hsv => "hsv",
            ColorFormat::Cmyk => "cmyk",
        }
    }

    pub fn format(self, color: Color) -> String {
        match self {
            ColorFormat::Hex => to_hex(color),
            ColorFormat::Rgb => to_rgb(color),
            ColorFormat::Rgba => to_rgba(color),
            ColorFormat::Hsl => to_hsl(color),
            ColorFormat::Hsla => to_hsla(color),
            ColorFormat::Hsv => to_hsv(color),
            ColorFormat::Cmyk => to_cmyk(color),
        }
    }

    pub fn parse(self, text: &str) -> Result<Color, ParseColorError> {
        match self {
            ColorFormat::Hex => parse_hex(text),
            ColorFormat::Rgb => parse_rgb(text),
            ColorFormat::Rgba => parse_rgba(text),
            ColorFormat::Hsl => parse_hsl(text),
            ColorFormat::Hsla => parse_hsla(text),
            ColorFormat::Hsv => parse_hsv(text),
            ColorFormat::Cmyk => parse_cmyk(text),
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ColorFormat::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| format!("unknown color format: {s}"))
    }
}

/// Try every notation in turn and report which one matched.
pub fn detect(text: &str) -> Result<(Color, ColorFormat), ParseColorError> {
    if text.trim().is_empty() {
        return Err(ParseColorError::Empty);
    }
    ColorFormat::ALL
        .into_iter()
        .find_map(|format| format.parse(text).ok().map(|c| (c, format)))
        .ok_or_else(|| ParseColorError::Unrecognized(text.to_string()))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgb\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)").expect("valid rgb regex")
});
static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*([0-9]*\.?[0-9]+)\s*\)")
        .expect("valid rgba regex")
});
static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hsl\(\s*(\d+)\s*,\s*(\d+)%?\s*,\s*(\d+)%?\s*\)").expect("valid hsl regex")
});
static HSLA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hsla\(\s*(\d+)\s*,\s*(\d+)%?\s*,\s*(\d+)%?\s*,\s*([0-9]*\.?[0-9]+)\s*\)")
        .expect("valid hsla regex")
});
static HSV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hsv\(\s*(\d+)\s*,\s*(\d+)%?\s*,\s*(\d+)%?\s*\)").expect("valid hsv regex")
});
static CMYK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"cmyk\(\s*(\d+)%?\s*,\s*(\d+)%?\s*,\s*(\d+)%?\s*,\s*(\d+)%?\s*\)")
        .expect("valid cmyk regex")
});

fn captures<'t>(
    re: &Regex,
    notation: &'static str,
    text: &'t str,
) -> Result<Captures<'t>, ParseColorError> {
    re.captures(text).ok_or_else(|| ParseColorError::NoMatch {
        notation,
        text: text.to_string(),
    })
}

fn int_group(caps: &Captures<'_>, i: usize) -> Result<u32, ParseColorError> {
    let raw = &caps[i];
    raw.parse::<u32>()
        .map_err(|_| ParseColorError::OutOfRange(raw.to_string()))
}

fn channel_group(caps: &Captures<'_>, i: usize) -> Result<u8, ParseColorError> {
    let value = int_group(caps, i)?;
    u8::try_from(value).map_err(|_| ParseColorError::OutOfRange(value.to_string()))
}

/// A 0..=100 percent scaled to a byte with round-half-up on `pct * 2.55`.
pub fn percent_to_byte(pct: u32) -> Result<u8, ParseColorError> {
    if pct > 100 {
        return Err(ParseColorError::OutOfRange(format!("{pct}%")));
    }
    Ok((f64::from(pct) * 2.55 + 0.5).floor() as u8)
}

fn percent_group(caps: &Captures<'_>, i: usize) -> Result<u8, ParseColorError> {
    percent_to_byte(int_group(caps, i)?)
}

/// Fractional opacity in [0, 1] to an alpha byte.
fn alpha_group(caps: &Captures<'_>, i: usize) -> Result<u8, ParseColorError> {
    let raw = &caps[i];
    let alpha: f64 = raw
        .parse()
        .map_err(|_| ParseColorError::OutOfRange(raw.to_string()))?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(ParseColorError::OutOfRange(raw.to_string()));
    }
    Ok((alpha * 255.0).round() as u8)
}

fn hue_group(caps: &Captures<'_>, i: usize) -> Result<f64, ParseColorError> {
    Ok(f64::from(int_group(caps, i)? % 360))
}

fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

/// Whole degrees in 0..360, truncated from centidegrees; achromatic colors report 0.
fn hue_degrees(degrees: f64, saturation: f64) -> u32 {
    if saturation <= 0.0 {
        return 0;
    }
    let centidegrees = (degrees * 100.0).round() as u32;
    (centidegrees / 100) % 360
}

fn to_srgb_f64(color: Color) -> Srgb<f64> {
    color.to_srgb_u8().into_format()
}

fn from_srgb_f64(rgb: Srgb<f64>, alpha: u8) -> Color {
    let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::rgba(byte(rgb.red), byte(rgb.green), byte(rgb.blue), alpha)
}

fn byte_fraction(b: u8) -> f64 {
    f64::from(b) / 255.0
}

// ---------------------------------------------------------------------------
// HEX
// ---------------------------------------------------------------------------

/// `#rrggbb` when opaque, `#aarrggbb` otherwise.
pub fn to_hex(color: Color) -> String {
    color.to_hex()
}

/// Accepts `rgb`, `rrggbb` and `aarrggbb` digits, with or without a leading `#`.
pub fn parse_hex(text: &str) -> Result<Color, ParseColorError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseColorError::Empty);
    }
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let invalid = || ParseColorError::InvalidHex(text.to_string());
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    match digits.len() {
        3 => {
            let nibble = |i: usize| {
                u8::from_str_radix(&digits[i..i + 1], 16)
                    .map(|n| n * 17)
                    .map_err(|_| invalid())
            };
            Ok(Color::new(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Ok(Color::new(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Color::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        _ => Err(invalid()),
    }
}

// ---------------------------------------------------------------------------
// RGB / RGBA
// ---------------------------------------------------------------------------

pub fn to_rgb(color: Color) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

/// Reads `rgb(r, g, b)`; the result is opaque.
pub fn parse_rgb(text: &str) -> Result<Color, ParseColorError> {
    let caps = captures(&RGB_RE, "rgb", text)?;
    Ok(Color::new(
        channel_group(&caps, 1)?,
        channel_group(&caps, 2)?,
        channel_group(&caps, 3)?,
    ))
}

pub fn to_rgba(color: Color) -> String {
    format!(
        "rgba({}, {}, {}, {:.2})",
        color.r,
        color.g,
        color.b,
        color.alpha_f()
    )
}

pub fn parse_rgba(text: &str) -> Result<Color, ParseColorError> {
    let caps = captures(&RGBA_RE, "rgba", text)?;
    Ok(Color::rgba(
        channel_group(&caps, 1)?,
        channel_group(&caps, 2)?,
        channel_group(&caps, 3)?,
        alpha_group(&caps, 4)?,
    ))
}

// ---------------------------------------------------------------------------
// HSL / HSLA
// ---------------------------------------------------------------------------

fn hsl_parts(color: Color) -> (u32, u32, u32) {
    let hsl = Hsl64::from_color(to_srgb_f64(color));
    (
        hue_degrees(hsl.hue.into_positive_degrees(), hsl.saturation),
        percent(hsl.saturation),
        percent(hsl.lightness),
    )
}

fn from_hsl_bytes(hue: f64, saturation: u8, lightness: u8, alpha: u8) -> Color {
    let hsl = Hsl64::new(hue, byte_fraction(saturation), byte_fraction(lightness));
    from_srgb_f64(Srgb::from_color(hsl), alpha)
}

pub fn to_hsl(color: Color) -> String {
    let (h, s, l) = hsl_parts(color);
    format!("hsl({h}, {s}%, {l}%)")
}

pub fn parse_hsl(text: &str) -> Result<Color, ParseColorError> {
    let caps = captures(&HSL_RE, "hsl", text)?;
    Ok(from_hsl_bytes(
        hue_group(&caps, 1)?,
        percent_group(&caps, 2)?,
        percent_group(&caps, 3)?,
        255,
    ))
}

pub fn to_hsla(color: Color) -> String {
    let (h, s, l) = hsl_parts(color);
    format!("hsla({h}, {s}%, {l}%, {:.2})", color.alpha_f())
}

pub fn parse_hsla(text: &str) -> Result<Color, ParseColorError> {
    let caps = captures(&HSLA_RE, "hsla", text)?;
    Ok(from_hsl_bytes(
        hue_group(&caps, 1)?,
        percent_group(&caps, 2)?,
        percent_group(&caps, 3)?,
        alpha_group(&caps, 4)?,
    ))
}

// ---------------------------------------------------------------------------
// HSV
// ---------------------------------------------------------------------------

pub fn to_hsv(color: Color) -> String {
    let hsv = Hsv64::from_color(to_srgb_f64(color));
    format!(
        "hsv({}, {}%, {}%)",
        hue_degrees(hsv.hue.into_positive_degrees(), hsv.saturation),
        percent(hsv.saturation),
        percent(hsv.value)
    )
}

pub fn parse_hsv(text: &str) -> Result<Color, ParseColorError> {
    let caps = captures(&HSV_RE, "hsv", text)?;
    let hsv = Hsv64::new(
        hue_group(&caps, 1)?,
        byte_fraction(percent_group(&caps, 2)?),
        byte_fraction(percent_group(&caps, 3)?),
    );
    Ok(from_srgb_f64(Srgb::from_color(hsv), 255))
}

// ---------------------------------------------------------------------------
// CMYK
// ---------------------------------------------------------------------------

pub fn to_cmyk(color: Color) -> String {
    let (r, g, b) = (
        byte_fraction(color.r),
        byte_fraction(color.g),
        byte_fraction(color.b),
    );
    let k = 1.0 - r.max(g).max(b);
    let (c, m, y) = if k >= 1.0 {
        (0.0, 0.0, 0.0)
    } else {
        (
            (1.0 - r - k) / (1.0 - k),
            (1.0 - g - k) / (1.0 - k),
            (1.0 - b - k) / (1.0 - k),
        )
    };
    format!(
        "cmyk({}%, {}%, {}%, {}%)",
        percent(c),
        percent(m),
        percent(y),
        percent(k)
    )
}

pub fn parse_cmyk(text: &str) -> Result<Color, ParseColorError> {
    let caps = captures(&CMYK_RE, "cmyk", text)?;
    let c = byte_fraction(percent_group(&caps, 1)?);
    let m = byte_fraction(percent_group(&caps, 2)?);
    let y = byte_fraction(percent_group(&caps, 3)?);
    let k = byte_fraction(percent_group(&caps, 4)?);
    let channel = |v: f64| ((1.0 - v) * (1.0 - k) * 255.0).round() as u8;
    Ok(Color::new(channel(c), channel(m), channel(y)))
}
