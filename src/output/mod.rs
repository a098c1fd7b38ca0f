//! File sinks: render a finished chart or grid and write it out.
//!
//! The format follows the file extension: `.png` renders through a
//! [`RasterSurface`], `.svg` through an [`SvgSurface`].

mod png_encoder;

pub use png_encoder::PngEncoder;

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::surface::{DrawingSurface, RasterSurface, SvgSurface};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raster PNG.
    Png,
    /// Vector SVG.
    Svg,
}

impl OutputFormat {
    /// Format for `path`, chosen by its extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for a missing or unknown extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Svg => "svg",
        })
    }
}

/// Something that draws itself onto a fixed-size canvas.
pub trait Renderable {
    /// Canvas size in pixels.
    fn canvas_size(&self) -> (u32, u32);
    /// Canvas background.
    fn background(&self) -> Rgba;
    /// Draw onto `surface`.
    fn render_to(&self, surface: &mut dyn DrawingSurface);
}

/// Render `item` and write it to `path`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for an unknown extension,
/// [`Error::InvalidDimensions`] for an empty canvas, or the I/O or encoding error.
pub fn try_save<R: Renderable + ?Sized, P: AsRef<Path>>(item: &R, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let (width, height) = item.canvas_size();
    match format {
        OutputFormat::Png => {
            let mut surface = RasterSurface::new(width, height, item.background())?;
            item.render_to(&mut surface);
            surface.write_png(path)?;
        }
        OutputFormat::Svg => {
            if width == 0 || height == 0 {
                return Err(Error::InvalidDimensions { width, height });
            }
            let mut surface = SvgSurface::new(width, height).with_background(Some(item.background()));
            item.render_to(&mut surface);
            surface.write_to_file(path)?;
        }
    }
    debug!(path = %path.display(), %format, width, height, "wrote output");
    Ok(())
}

/// Render `item` and write it to `path`, reporting only success.
///
/// Failures are logged at `warn` with their cause.
pub fn save<R: Renderable + ?Sized, P: AsRef<Path>>(item: &R, path: P) -> bool {
    let path = path.as_ref();
    match try_save(item, path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to save output");
            false
        }
    }
}
