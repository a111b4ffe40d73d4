//! Colors and colormaps.
//!
//! Colors parse from the short specifications plotting users already know
//! (`"#1f77b4"`, `"k"`, `"C3"`, `"orange"`). Colormaps are built from anchor
//! lists and linearly interpolated; appending `_r` to a name reverses the map.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::{AnimoError, AnimoResult};

/// The default color cycle, used for successive lines on a shared axes.
const DEFAULT_CYCLE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Black
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// White
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Entry `index` of the default color cycle, wrapping around.
    pub const fn cycle(index: usize) -> Self {
        let (r, g, b) = DEFAULT_CYCLE[index % DEFAULT_CYCLE.len()];
        Self::new(r, g, b)
    }

    fn from_unit(rgb: [f64; 3]) -> Self {
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2]))
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convert to a plotters color
    pub const fn to_rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    /// Hex notation, e.g. `#1f77b4`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::cycle(0)
    }
}

impl FromStr for Color {
    type Err = AnimoError;

    fn from_str(s: &str) -> AnimoResult<Self> {
        let spec = s.trim();
        if let Some(color) = Self::from_hex(spec) {
            return Ok(color);
        }
        if let Some(n) = spec.strip_prefix('C')
            && let Ok(index) = n.parse::<usize>()
        {
            return Ok(Self::cycle(index));
        }

        let named = match spec.to_ascii_lowercase().as_str() {
            "b" | "blue" => Self::new(0, 0, 255),
            "g" | "green" => Self::new(0, 128, 0),
            "r" | "red" => Self::new(255, 0, 0),
            "c" | "cyan" => Self::new(0, 191, 191),
            "m" | "magenta" => Self::new(191, 0, 191),
            "y" | "yellow" => Self::new(191, 191, 0),
            "k" | "black" => Self::BLACK,
            "w" | "white" => Self::WHITE,
            "orange" => Self::new(255, 165, 0),
            "purple" => Self::new(128, 0, 128),
            "gray" | "grey" => Self::new(128, 128, 128),
            "brown" => Self::new(165, 42, 42),
            "navy" => Self::new(0, 0, 128),
            _ => return Err(AnimoError::InvalidColor(s.to_string())),
        };
        Ok(named)
    }
}

impl TryFrom<String> for Color {
    type Error = AnimoError;

    fn try_from(value: String) -> AnimoResult<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Anchor positions and colors of a base (non-reversed) colormap.
type Anchors = &'static [(f64, [f64; 3])];

fn hex_anchors(name: &str) -> Option<Vec<(f64, [f64; 3])>> {
    let hex: &[u32] = match name {
        "viridis" => &[
            0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58,
            0xb5de2b, 0xfde725,
        ],
        "plasma" => &[
            0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a,
            0xfdca26, 0xf0f921,
        ],
        "magma" => &[
            0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668,
            0xfeca8d, 0xfcfdbf,
        ],
        "inferno" => &[
            0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06,
            0xf7d13d, 0xfcffa4,
        ],
        "RdBu" => &[
            0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de,
            0x4393c3, 0x2166ac, 0x053061,
        ],
        _ => return None,
    };
    let last = (hex.len() - 1) as f64;
    Some(
        hex.iter()
            .enumerate()
            .map(|(i, &c)| {
                let channel = |shift: u32| f64::from((c >> shift) & 0xff) / 255.0;
                (i as f64 / last, [channel(16), channel(8), channel(0)])
            })
            .collect(),
    )
}

fn segment_anchors(name: &str) -> Option<Anchors> {
    let anchors: Anchors = match name {
        "terrain" => &[
            (0.00, [0.2, 0.2, 0.6]),
            (0.15, [0.0, 0.6, 1.0]),
            (0.25, [0.0, 0.8, 0.4]),
            (0.50, [1.0, 1.0, 0.6]),
            (0.75, [0.5, 0.36, 0.33]),
            (1.00, [1.0, 1.0, 1.0]),
        ],
        "gray" | "grey" => &[(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])],
        "coolwarm" => &[
            (0.0, [0.230, 0.299, 0.754]),
            (0.5, [0.865, 0.865, 0.865]),
            (1.0, [0.706, 0.016, 0.150]),
        ],
        "jet" => &[
            (0.0, [0.0, 0.0, 0.5]),
            (0.125, [0.0, 0.0, 1.0]),
            (0.375, [0.0, 1.0, 1.0]),
            (0.625, [1.0, 1.0, 0.0]),
            (0.875, [1.0, 0.0, 0.0]),
            (1.0, [0.5, 0.0, 0.0]),
        ],
        "hot" => &[
            (0.0, [0.0416, 0.0, 0.0]),
            (0.365, [1.0, 0.0, 0.0]),
            (0.746, [1.0, 1.0, 0.0]),
            (1.0, [1.0, 1.0, 1.0]),
        ],
        _ => return None,
    };
    Some(anchors)
}

/// A named colormap mapping `[0, 1]` onto colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colormap {
    name: String,
    anchors: Vec<(f64, [f64; 3])>,
    reversed: bool,
}

impl Colormap {
    /// Look a colormap up by name; a `_r` suffix reverses it.
    pub fn from_name(name: &str) -> AnimoResult<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let anchors = hex_anchors(base)
            .or_else(|| segment_anchors(base).map(<[_]>::to_vec))
            .ok_or_else(|| AnimoError::UnknownColormap(name.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            anchors,
            reversed,
        })
    }

    /// Name the colormap was looked up by
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the reversed variant of a base map
    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Map a normalized value onto a color.
    ///
    /// Values are clamped into `[0, 1]`. NaN is the "bad" value and yields `None`.
    pub fn map(&self, t: f64) -> Option<Color> {
        if t.is_nan() {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        let t = if self.reversed { 1.0 - t } else { t };

        let upper = self
            .anchors
            .iter()
            .position(|(pos, _)| *pos >= t)
            .unwrap_or(self.anchors.len() - 1);
        if upper == 0 {
            return Some(Color::from_unit(self.anchors[0].1));
        }

        let (p0, c0) = self.anchors[upper - 1];
        let (p1, c1) = self.anchors[upper];
        let w = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        Some(Color::from_unit([
            c0[0] + (c1[0] - c0[0]) * w,
            c0[1] + (c1[1] - c0[1]) * w,
            c0[2] + (c1[2] - c0[2]) * w,
        ]))
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self {
            name: "terrain_r".to_string(),
            anchors: segment_anchors("terrain").map(<[_]>::to_vec).unwrap_or_default(),
            reversed: true,
        }
    }
}

impl FromStr for Colormap {
    type Err = AnimoError;

    fn from_str(s: &str) -> AnimoResult<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for Colormap {
    type Error = AnimoError;

    fn try_from(value: String) -> AnimoResult<Self> {
        Self::from_name(&value)
    }
}

impl From<Colormap> for String {
    fn from(cmap: Colormap) -> Self {
        cmap.name
    }
}
