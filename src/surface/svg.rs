//! SVG vector surface.
//!
//! Elements are recorded in device coordinates (the transform stack is applied as
//! they are added) and serialized by [`SvgSurface::render`].

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use super::{ApproxTextMetrics, DrawingSurface, TextAnchor, TextExtent, TextMeasure, TransformStack};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::style::{LineDash, MarkerShape};

/// A recorded SVG element.
#[derive(Debug, Clone, PartialEq)]
enum SvgElement {
    Rect {
        rect: Rect,
        fill: Option<Rgba>,
        stroke: Option<(Rgba, f64)>,
    },
    Circle {
        center: Point,
        r: f64,
        fill: Option<Rgba>,
        stroke: Option<(Rgba, f64)>,
    },
    Polyline {
        points: Vec<Point>,
        fill: Option<Rgba>,
        stroke: Option<(Rgba, f64)>,
        dash: Vec<f64>,
    },
    Text {
        pos: Point,
        text: String,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
        rotated: bool,
    },
}

/// Vector surface producing an SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
    transform: TransformStack,
}

impl SvgSurface {
    /// Create an empty document with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
            transform: TransformStack::default(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn with_background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Number of recorded elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Depth of the saved-transform stack.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.transform.depth()
    }

    /// Serialize to an SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 96);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                rgba_to_css(bg)
            );
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

impl TextMeasure for SvgSurface {
    fn measure_text(&self, text: &str, font_size: f64) -> TextExtent {
        ApproxTextMetrics.measure_text(text, font_size)
    }
}

impl DrawingSurface for SvgSurface {
    fn width(&self) -> f64 {
        f64::from(self.width)
    }

    fn height(&self) -> f64 {
        f64::from(self.height)
    }

    fn save(&mut self) {
        self.transform.save();
    }

    fn restore(&mut self) {
        self.transform.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translate(dx, dy);
    }

    fn scale(&mut self, factor: f64) {
        self.transform.scale(factor);
    }

    fn marker(&mut self, center: Point, size: f64, shape: MarkerShape, color: Rgba, filled: bool) {
        let c = self.transform.point(center);
        let h = self.transform.length(size) / 2.0;
        let stroke_width = (h / 3.0).max(1.0);
        let (fill, stroke) = if filled {
            (Some(color), None)
        } else {
            (None, Some((color, stroke_width)))
        };
        let element = match shape {
            MarkerShape::Circle => SvgElement::Circle {
                center: c,
                r: h,
                fill,
                stroke,
            },
            MarkerShape::Square => SvgElement::Rect {
                rect: Rect::new(c.x - h, c.y - h, 2.0 * h, 2.0 * h),
                fill,
                stroke,
            },
            MarkerShape::Triangle => SvgElement::Polyline {
                points: vec![
                    Point::new(c.x, c.y - h),
                    Point::new(c.x + h, c.y + h),
                    Point::new(c.x - h, c.y + h),
                    Point::new(c.x, c.y - h),
                ],
                fill,
                stroke,
                dash: Vec::new(),
            },
            MarkerShape::Cross => {
                for (a, b) in [((-h, -h), (h, h)), ((-h, h), (h, -h))] {
                    self.elements.push(SvgElement::Polyline {
                        points: vec![
                            Point::new(c.x + a.0, c.y + a.1),
                            Point::new(c.x + b.0, c.y + b.1),
                        ],
                        fill: None,
                        stroke: Some((color, stroke_width)),
                        dash: Vec::new(),
                    });
                }
                return;
            }
        };
        self.elements.push(element);
    }

    fn polyline(&mut self, points: &[Point], color: Rgba, width: f64, dash: LineDash) {
        if points.len() < 2 {
            return;
        }
        let width = self.transform.length(width);
        let scale = width.max(1.0);
        self.elements.push(SvgElement::Polyline {
            points: points.iter().map(|&p| self.transform.point(p)).collect(),
            fill: None,
            stroke: Some((color, width)),
            dash: dash.pattern().iter().map(|d| d * scale).collect(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.elements.push(SvgElement::Rect {
            rect: self.transform.rect(rect),
            fill: Some(color),
            stroke: None,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64) {
        self.elements.push(SvgElement::Rect {
            rect: self.transform.rect(rect),
            fill: None,
            stroke: Some((color, self.transform.length(width))),
        });
    }

    fn text(&mut self, pos: Point, text: &str, font_size: f64, color: Rgba, anchor: TextAnchor) {
        self.elements.push(SvgElement::Text {
            pos: self.transform.point(pos),
            text: text.to_string(),
            font_size: self.transform.length(font_size),
            fill: color,
            anchor,
            rotated: false,
        });
    }

    fn text_rotated(&mut self, pos: Point, text: &str, font_size: f64, color: Rgba) {
        self.elements.push(SvgElement::Text {
            pos: self.transform.point(pos),
            text: text.to_string(),
            font_size: self.transform.length(font_size),
            fill: color,
            anchor: TextAnchor::Middle,
            rotated: true,
        });
    }
}

/// Convert RGBA to a CSS color string.
fn rgba_to_css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            color.r,
            color.g,
            color.b,
            f32::from(color.a) / 255.0
        )
    }
}

fn paint_attrs(fill: Option<Rgba>, stroke: Option<(Rgba, f64)>) -> String {
    let mut attrs = format!(
        r#" fill="{}""#,
        fill.map_or_else(|| "none".to_string(), rgba_to_css)
    );
    if let Some((color, width)) = stroke {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            rgba_to_css(color),
            num(width)
        );
    }
    attrs
}

/// Compact number formatting for attributes.
fn num(v: f64) -> String {
    crate::ticks::format_value((v * 100.0).round() / 100.0)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { rect, fill, stroke } => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            paint_attrs(*fill, *stroke)
        ),
        SvgElement::Circle {
            center,
            r,
            fill,
            stroke,
        } => format!(
            r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
            num(center.x),
            num(center.y),
            num(*r),
            paint_attrs(*fill, *stroke)
        ),
        SvgElement::Polyline {
            points,
            fill,
            stroke,
            dash,
        } => {
            let points_str = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            let tag = if fill.is_some() { "polygon" } else { "polyline" };
            let dash_attr = if dash.is_empty() {
                String::new()
            } else {
                let values: Vec<String> = dash.iter().map(|&d| num(d)).collect();
                format!(r#" stroke-dasharray="{}""#, values.join(","))
            };
            format!(
                r#"<{tag} points="{points_str}"{}{dash_attr}/>"#,
                paint_attrs(*fill, *stroke)
            )
        }
        SvgElement::Text {
            pos,
            text,
            font_size,
            fill,
            anchor,
            rotated,
        } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let (x, y) = (num(pos.x), num(pos.y));
            let rotate = if *rotated {
                format!(r#" transform="rotate(-90 {x} {y})" dominant-baseline="middle""#)
            } else {
                String::new()
            };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif"{rotate}>{}</text>"#,
                num(*font_size),
                rgba_to_css(*fill),
                escape_xml(text)
            )
        }
    }
}
