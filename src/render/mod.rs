//! Rasterization of geometric primitives onto a [`Framebuffer`](crate::framebuffer::Framebuffer).
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: Smooth line rendering with sub-pixel accuracy
//! - **Midpoint Circle**: Circle outlines
//! - **Scanline fill**: Filled circles, triangles and thick strokes
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod primitives;

pub use primitives::{
    draw_circle, draw_circle_outline, draw_cross, draw_line_aa, draw_rect,
    draw_rect_outline, draw_thick_line, draw_triangle, fill_polygon,
};
