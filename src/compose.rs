//! Scale-to-fit placement of artwork on the fixed preview canvas.
//!
//! ```text
//!   (0,0)                                   640
//!     ┌──────────────────────────────────────┐
//!     │   (15,65)                            │
//!     │     ┌──────────┐                     │
//!     │     │ artwork  │ <- max 320 x 350    │ 480
//!     │     └──────────┘                     │
//!     └──────────────────────────────────────┘
//! ```

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::error::{ArtgenError, Result};

pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 480;

pub const ARTWORK_X: u32 = 15;
pub const ARTWORK_Y: u32 = 65;
pub const ARTWORK_MAX_WIDTH: u32 = 320;
pub const ARTWORK_MAX_HEIGHT: u32 = 350;

/// A 640x480 RGBA preview image.
pub type Canvas = RgbaImage;

/// Scaled size and canvas position of one piece of artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl Geometry {
    /// Fit a `orig_w` x `orig_h` image into the artwork region.
    ///
    /// Width is filled first; if the resulting height overflows the region the
    /// height is clamped instead. The box is then centered in the region.
    pub fn fit(orig_w: u32, orig_h: u32) -> Result<Self> {
        if orig_w == 0 || orig_h == 0 {
            return Err(ArtgenError::InvalidSource {
                width: orig_w,
                height: orig_h,
            });
        }

        let ratio = f64::from(orig_w) / f64::from(orig_h);
        let mut w = f64::from(ARTWORK_MAX_WIDTH);
        let mut h = w / ratio;
        if h > f64::from(ARTWORK_MAX_HEIGHT) {
            h = f64::from(ARTWORK_MAX_HEIGHT);
            w = h * ratio;
        }

        let width = (w.round() as u32).clamp(1, ARTWORK_MAX_WIDTH);
        let height = (h.round() as u32).clamp(1, ARTWORK_MAX_HEIGHT);

        Ok(Self {
            width,
            height,
            x: ARTWORK_X + (ARTWORK_MAX_WIDTH - width) / 2,
            y: ARTWORK_Y + (ARTWORK_MAX_HEIGHT - height) / 2,
        })
    }
}

/// Render `source` onto a fresh transparent canvas.
pub fn compose(source: &DynamicImage) -> Result<Canvas> {
    let geometry = Geometry::fit(source.width(), source.height())?;
    tracing::trace!(?geometry, src_w = source.width(), src_h = source.height(), "placing artwork");

    let scaled = imageops::resize(
        source,
        geometry.width,
        geometry.height,
        FilterType::CatmullRom,
    );

    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    imageops::overlay(
        &mut canvas,
        &scaled,
        i64::from(geometry.x),
        i64::from(geometry.y),
    );
    Ok(canvas)
}
