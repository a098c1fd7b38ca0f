//! Primitive rasterization: lines, rectangles and marker glyphs.
//!
//! Every routine clips against the framebuffer and blends with the color's alpha,
//! so overlapping translucent markers darken as expected.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f64::EPSILON { 1.0 } else { dy / dx };
    let columns = if steep { fb.height() } else { fb.width() };
    let columns = i32::try_from(columns).unwrap_or(i32::MAX);

    let mut put = |x: i32, y: i32, intensity: f64| {
        let (px, py) = if steep { (y, x) } else { (x, y) };
        plot_intensity(fb, px, py, color, intensity);
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1.saturating_add(1), fpart(yend) * xgap);
    let (first_x, first_y) = (xend, yend);

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    put(xpxl2, ypxl2, rfpart(yend) * xgap);
    put(xpxl2, ypxl2.saturating_add(1), fpart(yend) * xgap);

    // Interior columns, limited to the framebuffer.
    let start = xpxl1.saturating_add(1).max(0);
    let end = xpxl2.min(columns);
    let mut intery = first_y + gradient * (f64::from(start) - first_x);
    for x in start..end {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart.saturating_add(1), fpart(intery));
        intery += gradient;
    }
}

/// Draw a line of the given pixel width.
///
/// Widths up to 1.5 use the anti-aliased single-pixel line; wider strokes are
/// filled as a quadrilateral.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    width: f64,
    color: Rgba,
) {
    if width <= 1.5 {
        draw_line_aa(fb, x0, y0, x1, y1, color);
        return;
    }
    let len = (x1 - x0).hypot(y1 - y0);
    if len < f64::EPSILON {
        draw_circle(fb, x0.round() as i32, y0.round() as i32, (width / 2.0) as i32, color);
        return;
    }
    let half = width / 2.0;
    let (nx, ny) = (-(y1 - y0) / len * half, (x1 - x0) / len * half);
    fill_polygon(
        fb,
        &[
            (x0 + nx, y0 + ny),
            (x1 + nx, y1 + ny),
            (x1 - nx, y1 - ny),
            (x0 - nx, y0 - ny),
        ],
        color,
    );
}

#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba) {
    if x >= 0 && y >= 0 {
        fb.blend_pixel(x as u32, y as u32, color);
    }
}

#[inline]
fn plot_intensity(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f64) {
    let alpha = (f64::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
    plot(fb, x, y, color.with_alpha(alpha));
}

#[inline]
fn fpart(x: f64) -> f64 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f64) -> f64 {
    1.0 - fpart(x)
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled rectangle.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    let (x, width) = clip_span(x, width);
    let (y, height) = clip_span(y, height);
    fb.blend_rect(x, y, width, height, color);
}

/// Draw a rectangle outline.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba,
    thickness: u32,
) {
    let t = thickness.max(1);
    let w = width as i32;
    let h = height as i32;
    let ti = t as i32;

    // Top and bottom edges
    draw_rect(fb, x, y, width, t, color);
    if height > t {
        draw_rect(fb, x, y + h - ti, width, t, color);
    }
    // Left and right edges between them
    if height > 2 * t {
        draw_rect(fb, x, y + ti, t, height - 2 * t, color);
        if width > t {
            draw_rect(fb, x + w - ti, y + ti, t, height - 2 * t, color);
        }
    }
}

/// Clip a signed start and length to the non-negative axis.
fn clip_span(start: i32, len: u32) -> (u32, u32) {
    if start >= 0 {
        (start as u32, len)
    } else {
        (0, len.saturating_sub(start.unsigned_abs()))
    }
}

// ============================================================================
// Markers
// ============================================================================

/// Draw a filled circle, one horizontal span per row.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 {
            plot(fb, cx, cy, color);
        }
        return;
    }
    let r2 = f64::from(radius).powi(2);
    for dy in -radius..=radius {
        let half = (r2 - f64::from(dy).powi(2)).sqrt().round() as i32;
        draw_horizontal_line(fb, cx - half, cx + half, cy + dy, color);
    }
}

/// Draw a circle outline using the midpoint algorithm.
pub fn draw_circle_outline(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 {
            plot(fb, cx, cy, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            plot(fb, px, py, color);
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Draw an upward triangle inscribed in a `size` box centered at (cx, cy).
pub fn draw_triangle(fb: &mut Framebuffer, cx: f64, cy: f64, size: f64, color: Rgba, filled: bool) {
    let h = size / 2.0;
    let vertices = [(cx, cy - h), (cx + h, cy + h), (cx - h, cy + h)];
    if filled {
        fill_polygon(fb, &vertices, color);
    } else {
        for i in 0..3 {
            let (a, b) = (vertices[i], vertices[(i + 1) % 3]);
            draw_line_aa(fb, a.0, a.1, b.0, b.1, color);
        }
    }
}

/// Draw a diagonal cross spanning a `size` box centered at (cx, cy).
pub fn draw_cross(fb: &mut Framebuffer, cx: f64, cy: f64, size: f64, color: Rgba) {
    let h = size / 2.0;
    let width = (size / 4.0).max(1.0);
    draw_thick_line(fb, (cx - h, cy - h), (cx + h, cy + h), width, color);
    draw_thick_line(fb, (cx - h, cy + h), (cx + h, cy - h), width, color);
}

/// Fill a convex or simple polygon with even-odd scanlines sampled at pixel centers.
pub fn fill_polygon(fb: &mut Framebuffer, vertices: &[(f64, f64)], color: Rgba) {
    if vertices.len() < 3 {
        return;
    }
    let (min_y, max_y) = vertices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v.1), hi.max(v.1)));
    let y_start = min_y.floor().max(0.0) as i32;
    let y_end = max_y.ceil().min(f64::from(fb.height())) as i32;

    let mut crossings = Vec::with_capacity(vertices.len());
    for y in y_start..y_end {
        let sample = f64::from(y) + 0.5;
        crossings.clear();
        for i in 0..vertices.len() {
            let (ax, ay) = vertices[i];
            let (bx, by) = vertices[(i + 1) % vertices.len()];
            if (ay <= sample) != (by <= sample) {
                crossings.push(ax + (sample - ay) / (by - ay) * (bx - ax));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).floor() as i32;
            draw_horizontal_line(fb, x0, x1, y, color);
        }
    }
}

/// Blend the inclusive span `x1..=x2` on row `y`.
#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 || x2 < x1 {
        return;
    }
    let x_start = x1.max(0);
    let x_end = (x2 + 1).min(fb.width() as i32);
    if x_start < x_end {
        fb.blend_rect(x_start as u32, y as u32, (x_end - x_start) as u32, 1, color);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_draw_line_aa_horizontal() {
        let mut fb = white(100, 100);
        draw_line_aa(&mut fb, 10.0, 50.0, 90.0, 50.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 40), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_line_aa_offscreen_is_clipped() {
        let mut fb = white(10, 10);
        draw_line_aa(&mut fb, -1e12, 5.0, 1e12, 5.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(0, 5), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(9, 5), Some(Rgba::BLACK));

        let mut fb = white(10, 10);
        draw_line_aa(&mut fb, 5.0, -1e12, 5.0, 1e12, Rgba::BLACK);
        assert_eq!(fb.get_pixel(5, 0), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(5, 9), Some(Rgba::BLACK));
    }

    #[test]
    fn test_thick_line_covers_width() {
        let mut fb = white(100, 100);
        draw_thick_line(&mut fb, (10.0, 50.0), (90.0, 50.0), 6.0, Rgba::RED);
        assert_eq!(fb.get_pixel(50, 48), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(50, 52), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(50, 40), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_rect_negative_origin() {
        let mut fb = white(20, 20);
        draw_rect(&mut fb, -5, -5, 10, 10, Rgba::RED);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(4, 4), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut fb = white(100, 100);
        draw_rect_outline(&mut fb, 20, 20, 30, 30, Rgba::BLUE, 2);
        assert_eq!(fb.get_pixel(20, 20), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(49, 49), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(35, 35), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle_filled() {
        let mut fb = white(100, 100);
        draw_circle(&mut fb, 50, 50, 10, Rgba::GREEN);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(50, 41), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(70, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_translucent_circle_blends_once_per_pixel() {
        let mut fb = white(40, 40);
        draw_circle(&mut fb, 20, 20, 8, Rgba::new(0, 0, 0, 128));
        let center = fb.get_pixel(20, 20).unwrap();
        let edge = fb.get_pixel(20, 13).unwrap();
        assert_eq!(center, edge);
    }

    #[test]
    fn test_draw_circle_outline_hollow() {
        let mut fb = white(100, 100);
        draw_circle_outline(&mut fb, 50, 50, 10, Rgba::BLACK);
        assert_eq!(fb.get_pixel(60, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_triangle_filled_center() {
        let mut fb = white(50, 50);
        draw_triangle(&mut fb, 25.0, 25.0, 20.0, Rgba::RED, true);
        assert_eq!(fb.get_pixel(25, 28), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_cross_marks_center() {
        let mut fb = white(50, 50);
        draw_cross(&mut fb, 25.0, 25.0, 16.0, Rgba::BLACK);
        assert_ne!(fb.get_pixel(25, 25), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(25, 17), Some(Rgba::WHITE));
    }
}
