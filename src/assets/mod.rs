//! Turning located input files into uniform PNG frames.

/// Per-file format normalization (SVG rasterization, raster re-encoding).
pub mod normalize;
/// SVG parsing and rasterization helpers.
pub mod svg_raster;

use std::path::PathBuf;

use crate::foundation::error::{FramegifError, FramegifResult};

/// A decoded frame: straight (non-premultiplied) RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub fn into_rgba_image(self) -> FramegifResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        image::RgbaImage::from_raw(w, h, self.data).ok_or_else(|| {
            FramegifError::validation(format!("frame buffer size mismatch for {w}x{h} rgba8"))
        })
    }
}

/// Output of the normalizer for one input file.
#[derive(Clone, Debug)]
pub struct NormalizedFrame {
    pub source: PathBuf,
    /// PNG encoding of `frame`.
    pub png: Vec<u8>,
    pub frame: FrameBuffer,
}
