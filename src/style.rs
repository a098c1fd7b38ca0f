//! Plot styles: marker shape, line dash, size, color and alpha.

use crate::color::{named, Palette, Rgb, Rgba};

/// Marker glyph drawn at each data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerShape {
    /// Filled or stroked circle.
    #[default]
    Circle,
    /// Axis-aligned square.
    Square,
    /// Upward-pointing triangle.
    Triangle,
    /// Diagonal cross.
    Cross,
}

/// Stroke dash pattern for lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineDash {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Short dots.
    Dotted,
    /// Alternating dash and dot.
    DashDot,
}

impl LineDash {
    /// On/off segment lengths in pixels at unit line width. Empty means solid.
    #[must_use]
    pub fn pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[6.0, 4.0],
            Self::Dotted => &[1.5, 3.0],
            Self::DashDot => &[6.0, 3.0, 1.5, 3.0],
        }
    }
}

/// Visual attributes of one series, line or bar group.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// Marker diameter in pixels.
    pub size: f64,
    /// Stroke width in pixels.
    pub line_width: f64,
    /// Base color.
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Optional legend label overriding the series name.
    pub label: Option<String>,
    /// Marker glyph.
    pub marker: MarkerShape,
    /// Line dash pattern.
    pub dash: LineDash,
    /// Whether markers are filled or only stroked.
    pub filled: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            size: 6.0,
            line_width: 2.0,
            color: Rgb::BLACK,
            alpha: 1.0,
            label: None,
            marker: MarkerShape::Circle,
            dash: LineDash::Solid,
            filled: true,
        }
    }
}

impl PlotStyle {
    /// Default style with the given color.
    #[must_use]
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Default style with a named color.
    ///
    /// Unknown names fall back to black and are logged at `warn`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match named(name) {
            Some(color) => Self::new(color),
            None => {
                tracing::warn!(color = name, "unknown color name, using black");
                Self::default()
            }
        }
    }

    /// Set marker size.
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size.max(0.0);
        self
    }

    /// Set stroke width.
    #[must_use]
    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width.max(0.0);
        self
    }

    /// Set color.
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Set opacity, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        self
    }

    /// Set legend label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set marker shape.
    #[must_use]
    pub fn with_marker(mut self, marker: MarkerShape) -> Self {
        self.marker = marker;
        self
    }

    /// Set dash pattern.
    #[must_use]
    pub fn with_dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }

    /// Draw markers as outlines only.
    #[must_use]
    pub fn hollow(mut self) -> Self {
        self.filled = false;
        self
    }

    /// Device color with this style's alpha applied.
    #[must_use]
    pub fn rgba(&self) -> Rgba {
        self.color.to_rgba(self.alpha)
    }
}

impl Palette {
    /// Default style colored with the palette entry at `index` (wraps around).
    #[must_use]
    pub fn auto_style(&self, index: usize) -> PlotStyle {
        PlotStyle::new(self.color(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known() {
        let style = PlotStyle::from_name("steelblue");
        assert_eq!(style.color, named("steelblue").unwrap());
        assert_eq!(style.marker, MarkerShape::Circle);
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let style = PlotStyle::from_name("no-such-color");
        assert_eq!(style.color, Rgb::BLACK);
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(PlotStyle::default().with_alpha(3.0).alpha, 1.0);
        assert_eq!(PlotStyle::default().with_alpha(-1.0).alpha, 0.0);
        assert_eq!(PlotStyle::default().with_alpha(f32::NAN).alpha, 1.0);
    }

    #[test]
    fn test_auto_style_uses_palette() {
        let palette = Palette::default();
        assert_eq!(palette.auto_style(3).color, palette.color(3));
        assert_eq!(palette.auto_style(13).color, palette.color(3));
    }

    #[test]
    fn test_dash_patterns() {
        assert!(LineDash::Solid.pattern().is_empty());
        assert_eq!(LineDash::Dashed.pattern().len(), 2);
        assert_eq!(LineDash::DashDot.pattern().len(), 4);
    }

    #[test]
    fn test_rgba_applies_alpha() {
        let style = PlotStyle::new(Rgb::WHITE).with_alpha(0.0);
        assert_eq!(style.rgba(), Rgba::new(255, 255, 255, 0));
    }
}
