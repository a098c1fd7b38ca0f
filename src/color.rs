//! Color types, named-color lookup and categorical palettes.
//!
//! Styles carry [`Rgb`] channels in `[0, 1]`; drawing surfaces consume the 8-bit
//! [`Rgba`] device color. A [`Palette`] is an immutable value owned by each chart,
//! so automatic coloring never depends on process-wide state.

use std::sync::Arc;

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// RGB color with floating-point channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::raw(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::raw(1.0, 1.0, 1.0);
    /// Neutral gray used for outlier points.
    pub const OUTLIER_GRAY: Self = Self::raw(0.5, 0.5, 0.5);

    const fn raw(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color; channels are clamped to `[0, 1]`.
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
        }
    }

    /// Convert to a device color with the given alpha in `[0, 1]`.
    #[must_use]
    pub fn to_rgba(self, alpha: f32) -> Rgba {
        Rgba::new(
            unit_to_byte(self.r),
            unit_to_byte(self.g),
            unit_to_byte(self.b),
            unit_to_byte(alpha),
        )
    }
}

impl From<Rgba> for Rgb {
    fn from(c: Rgba) -> Self {
        Self::new(
            f32::from(c.r) / 255.0,
            f32::from(c.g) / 255.0,
            f32::from(c.b) / 255.0,
        )
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}

/// HSLA color with floating-point components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsla {
    /// Hue (0.0-360.0 degrees).
    pub h: f32,
    /// Saturation (0.0-1.0).
    pub s: f32,
    /// Lightness (0.0-1.0).
    pub l: f32,
    /// Alpha (0.0-1.0).
    pub a: f32,
}

impl Hsla {
    /// Create a new HSLA color.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Create an opaque HSL color (alpha = 1.0).
    #[must_use]
    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Convert to RGBA.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let h = self.h / 360.0;
        let s = self.s;
        let l = self.l;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;

            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Rgba::new(
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
            (self.a * 255.0) as u8,
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        hsla.to_rgba()
    }
}

// ============================================================================
// Named colors
// ============================================================================

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("brown", (165, 42, 42)),
    ("pink", (255, 192, 203)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("lightgray", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
    ("olive", (128, 128, 0)),
    ("navy", (0, 0, 128)),
    ("teal", (0, 128, 128)),
    ("steelblue", (70, 130, 180)),
    ("tab:blue", (31, 119, 180)),
    ("tab:orange", (255, 127, 14)),
    ("tab:green", (44, 160, 44)),
    ("tab:red", (214, 39, 40)),
    ("tab:purple", (148, 103, 189)),
    ("tab:brown", (140, 86, 75)),
    ("tab:pink", (227, 119, 194)),
    ("tab:gray", (127, 127, 127)),
    ("tab:olive", (188, 189, 34)),
    ("tab:cyan", (23, 190, 207)),
];

/// Resolve a color name or `#rrggbb` hex string.
///
/// Names are matched case-insensitively. Returns `None` for unknown names.
///
/// ```
/// use trueno_chart::color::{named, Rgb};
///
/// assert_eq!(named("Black"), Some(Rgb::BLACK));
/// assert!(named("#ff0000").is_some());
/// assert!(named("not-a-color").is_none());
/// ```
#[must_use]
pub fn named(name: &str) -> Option<Rgb> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, (r, g, b))| Rgb::from(Rgba::rgb(r, g, b)))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::from(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?)))
}

// ============================================================================
// Palette
// ============================================================================

/// Ten-color categorical palette used when a series does not specify a color.
const CATEGORICAL: [Rgb; 10] = [
    Rgb::raw(0.122, 0.467, 0.706),
    Rgb::raw(1.000, 0.498, 0.055),
    Rgb::raw(0.173, 0.627, 0.173),
    Rgb::raw(0.839, 0.153, 0.157),
    Rgb::raw(0.580, 0.404, 0.741),
    Rgb::raw(0.549, 0.337, 0.294),
    Rgb::raw(0.890, 0.467, 0.761),
    Rgb::raw(0.498, 0.498, 0.498),
    Rgb::raw(0.737, 0.741, 0.133),
    Rgb::raw(0.090, 0.745, 0.812),
];

/// Immutable, cheaply clonable list of automatic colors.
///
/// Indexing wraps around, so any series index maps to a color.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Arc<[Rgb]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: Arc::from(CATEGORICAL.as_slice()),
        }
    }
}

impl Palette {
    /// Create a palette from explicit colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if `colors` is empty.
    pub fn new(colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::EmptyData);
        }
        Ok(Self {
            colors: Arc::from(colors),
        })
    }

    /// Create a palette of `n` evenly spaced hues at fixed saturation/lightness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if `n` is zero.
    pub fn evenly_spaced(n: usize) -> Result<Self> {
        let colors = (0..n)
            .map(|i| {
                let hue = 360.0 * i as f32 / n as f32;
                Rgb::from(Hsla::hsl(hue, 0.65, 0.5).to_rgba())
            })
            .collect();
        Self::new(colors)
    }

    /// Color for an automatic index (wraps around).
    #[must_use]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    /// Number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
