//! Multi-stop gradients and their CSS/SVG renderings.

use rand::Rng;

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Color,
    /// Offset along the gradient, 0.0 to 1.0.
    pub position: f64,
}

impl GradientStop {
    pub fn new(color: Color, position: f64) -> Self {
        Self {
            color,
            position: position.clamp(0.0, 1.0),
        }
    }

    fn percent(&self) -> i64 {
        (self.position * 100.0).round() as i64
    }
}

impl std::str::FromStr for GradientStop {
    type Err = String;

    /// `COLOR@POSITION`, e.g. `#ff8800@0.5` or `rgb(0, 0, 255)@1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, position) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("expected COLOR@POSITION, got '{s}'"))?;
        let color: Color = color.trim().parse().map_err(|e| format!("{e}"))?;
        let position: f64 = position
            .trim()
            .parse()
            .map_err(|_| format!("invalid stop position '{position}'"))?;
        if !(0.0..=1.0).contains(&position) {
            return Err(format!("stop position {position} is outside 0..=1"));
        }
        Ok(Self::new(color, position))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    /// `rotation` is in degrees, 0 pointing right.
    Linear { rotation: u32 },
    Radial,
}

impl GradientKind {
    /// Same gradient with the rotation reduced to 0..360.
    pub fn normalized(self) -> Self {
        match self {
            GradientKind::Linear { rotation } => GradientKind::Linear {
                rotation: rotation % 360,
            },
            GradientKind::Radial => GradientKind::Radial,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    stops: Vec<GradientStop>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear { rotation: 45 },
            stops: vec![
                GradientStop::new(Color::new(0x07, 0xc8, 0xf9), 0.06),
                GradientStop::new(Color::new(0x0d, 0x41, 0xe1), 0.77),
            ],
        }
    }
}

impl Gradient {
    /// Returns `None` with fewer than two stops. Stops are sorted by position.
    pub fn new(kind: GradientKind, mut stops: Vec<GradientStop>) -> Option<Self> {
        if stops.len() < 2 {
            return None;
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Some(Self {
            kind: kind.normalized(),
            stops,
        })
    }

    /// Two to five random opaque stops, evenly spaced.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let count: usize = rng.gen_range(2..6);
        let stops = (0..count)
            .map(|i| GradientStop::new(Color::random_with(&mut rng), i as f64 / (count - 1) as f64))
            .collect();
        let kind = GradientKind::Linear {
            rotation: rng.gen_range(0..360),
        };
        Self { kind, stops }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at `position`, interpolated between the enclosing stops.
    /// Positions outside the first and last stop take the end colors.
    pub fn color_at(&self, position: f64) -> Color {
        let position = position.clamp(0.0, 1.0);
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::WHITE,
        };
        if position <= first.position {
            return first.color;
        }
        if position >= last.position {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if position >= a.position && position <= b.position {
                let span = b.position - a.position;
                if span <= f64::EPSILON {
                    return a.color;
                }
                return a.color.lerp(b.color, (position - a.position) / span);
            }
        }
        last.color
    }

    /// Insert a stop at `position` using the color already shown there.
    /// Returns the new stop's index.
    pub fn add_stop_at(&mut self, position: f64) -> usize {
        let stop = GradientStop::new(self.color_at(position), position);
        self.insert_stop(stop)
    }

    pub fn insert_stop(&mut self, stop: GradientStop) -> usize {
        let index = self
            .stops
            .iter()
            .position(|s| s.position > stop.position)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, stop);
        index
    }

    /// Refuses to drop below two stops.
    pub fn remove_stop(&mut self, index: usize) -> bool {
        if self.stops.len() <= 2 || index >= self.stops.len() {
            return false;
        }
        self.stops.remove(index);
        true
    }

    pub fn set_stop_color(&mut self, index: usize, color: Color) -> bool {
        match self.stops.get_mut(index) {
            Some(stop) => {
                stop.color = color;
                true
            }
            None => false,
        }
    }

    /// Moves a stop and re-sorts. Returns the stop's new index.
    pub fn move_stop(&mut self, index: usize, position: f64) -> Option<usize> {
        if index >= self.stops.len() {
            return None;
        }
        let mut stop = self.stops.remove(index);
        stop.position = position.clamp(0.0, 1.0);
        Some(self.insert_stop(stop))
    }

    fn css_stops(&self) -> String {
        self.stops
            .iter()
            .map(|s| format!(", {} {}%", opaque_hex(s.color), s.percent()))
            .collect()
    }

    /// `background:` declarations, vendor-prefixed first and standard last.
    pub fn to_css(&self) -> String {
        let stops = self.css_stops();
        let lines: Vec<String> = match self.kind {
            GradientKind::Linear { rotation } => {
                let angle = (rotation % 360 + 90) % 360;
                let horizontal = if angle >= 180 { "right" } else { "left" };
                let vertical = if angle % 180 >= 90 { " bottom" } else { " top" };
                vec![
                    format!(
                        "background: -webkit-gradient(linear, left top, {} {horizontal}{vertical}{stops});",
                        old_webkit_direction(angle)
                    ),
                    format!("background: -webkit-linear-gradient({angle}deg{stops});"),
                    format!("background: -moz-linear-gradient({angle}deg{stops});"),
                    format!("background: -o-linear-gradient({angle}deg{stops});"),
                    format!("background: -ms-linear-gradient({angle}deg{stops});"),
                    format!("background: linear-gradient({angle}deg{stops});"),
                ]
            }
            GradientKind::Radial => vec![
                format!(
                    "background: -webkit-gradient(radial, center center, 0, center center, 50%{stops});"
                ),
                format!("background: -webkit-radial-gradient(center, circle closest-side{stops});"),
                format!("background: -moz-radial-gradient(center, circle closest-side{stops});"),
                format!("background: -o-radial-gradient(circle closest-side at center{stops});"),
                format!("background: -ms-radial-gradient(circle closest-side at center{stops});"),
                format!("background: radial-gradient(circle closest-side at center{stops});"),
            ],
        };
        lines.join("\n")
    }

    fn svg_stops(&self, indent: &str) -> String {
        self.stops
            .iter()
            .map(|s| {
                format!(
                    "{indent}<stop offset=\"{}%\" stop-color=\"{}\" />\n",
                    s.percent(),
                    opaque_hex(s.color)
                )
            })
            .collect()
    }

    /// A standalone `<linearGradient>`/`<radialGradient>` element with id `grad`,
    /// in bounding-box percentages.
    pub fn to_svg_definition(&self) -> String {
        let mut svg = match self.kind {
            GradientKind::Linear { rotation } => {
                let (x1, y1, x2, y2) = linear_endpoints(rotation, 100.0, 100.0);
                format!(
                    "<linearGradient id=\"grad\" x1=\"{}%\" y1=\"{}%\" x2=\"{}%\" y2=\"{}%\" \
                     gradientUnits=\"objectBoundingBox\" color-interpolation=\"sRGB\">\n",
                    x1.round() as i64,
                    y1.round() as i64,
                    x2.round() as i64,
                    y2.round() as i64
                )
            }
            GradientKind::Radial => "<radialGradient id=\"grad\" cx=\"50%\" cy=\"50%\" r=\"50%\" \
                 gradientUnits=\"objectBoundingBox\" color-interpolation=\"sRGB\">\n"
                .to_string(),
        };
        svg.push_str(&self.svg_stops("  "));
        svg.push_str(self.closing_tag());
        svg
    }

    /// A complete SVG document filling `width` x `height` with the gradient.
    pub fn to_svg_document(&self, width: u32, height: u32) -> String {
        let (w, h) = (f64::from(width), f64::from(height));
        let mut svg = format!(
            "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" \
             xmlns=\"http://www.w3.org/2000/svg\">\n\n  <defs>\n"
        );
        match self.kind {
            GradientKind::Linear { rotation } => {
                let (x1, y1, x2, y2) = linear_endpoints(rotation, w, h);
                svg.push_str(&format!(
                    "    <linearGradient id=\"grad\" x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" \
                     gradientUnits=\"userSpaceOnUse\" color-interpolation=\"sRGB\">\n"
                ));
            }
            GradientKind::Radial => {
                svg.push_str(&format!(
                    "    <radialGradient id=\"grad\" cx=\"{}\" cy=\"{}\" r=\"{}\" \
                     gradientUnits=\"userSpaceOnUse\" color-interpolation=\"sRGB\">\n",
                    w / 2.0,
                    h / 2.0,
                    w.min(h) / 2.0
                ));
            }
        }
        svg.push_str(&self.svg_stops("      "));
        svg.push_str("    ");
        svg.push_str(self.closing_tag());
        svg.push_str("\n  </defs>\n\n");
        svg.push_str(&format!(
            "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"url(#grad)\"/>\n"
        ));
        svg.push_str("</svg>");
        svg
    }

    fn closing_tag(&self) -> &'static str {
        match self.kind {
            GradientKind::Linear { .. } => "</linearGradient>",
            GradientKind::Radial => "</radialGradient>",
        }
    }
}

/// CSS and SVG gradients have no alpha in the hex form used here.
fn opaque_hex(color: Color) -> String {
    color.with_alpha(255).to_hex()
}

/// Line through the center of a `w` x `h` box at `rotation` degrees, spanning its diagonal.
fn linear_endpoints(rotation: u32, w: f64, h: f64) -> (f64, f64, f64, f64) {
    let radians = f64::from(rotation).to_radians();
    let (cx, cy) = (w / 2.0, h / 2.0);
    let length = (w * w + h * h).sqrt() / 2.0;
    (
        cx - length * radians.cos(),
        cy - length * radians.sin(),
        cx + length * radians.cos(),
        cy + length * radians.sin(),
    )
}

fn old_webkit_direction(angle: u32) -> &'static str {
    match angle {
        a if !(45..315).contains(&a) => "right top",
        a if a < 135 => "right bottom",
        a if a < 225 => "left bottom",
        _ => "left top",
    }
}
