use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    assets::{FrameBuffer, NormalizedFrame, svg_raster},
    foundation::error::ConversionError,
    locate::ImageReference,
};

/// Which conversion path an input file takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Svg,
    Png,
    /// Anything else `image` can decode (JPEG, BMP, WebP, ...).
    Raster,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if ext.eq_ignore_ascii_case("svg") {
            Self::Svg
        } else if ext.eq_ignore_ascii_case("png") {
            Self::Png
        } else {
            Self::Raster
        }
    }
}

/// Converts located files into PNG frames.
///
/// Holds the state shared across files of one run: the SVG resolution and the font database.
pub struct Normalizer {
    dpi: u32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Normalizer {
    /// Normalizer with system fonts available to SVG text.
    pub fn new(dpi: u32) -> Self {
        Self::with_fontdb(dpi, svg_raster::build_svg_fontdb())
    }

    pub fn with_fontdb(dpi: u32, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { dpi, fontdb }
    }

    /// Read and convert one file. Every failure is reported against `reference.path`.
    pub fn normalize(&self, reference: &ImageReference) -> Result<NormalizedFrame, ConversionError> {
        let path = reference.path.as_path();
        self.normalize_path(path)
            .map_err(|source| ConversionError::new(path, source))
    }

    fn normalize_path(&self, path: &Path) -> anyhow::Result<NormalizedFrame> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;

        let (png, frame) = match SourceKind::from_path(path) {
            SourceKind::Svg => {
                let tree = svg_raster::parse_svg(
                    &bytes,
                    self.dpi,
                    path.parent(),
                    Arc::clone(&self.fontdb),
                )?;
                let img = svg_raster::rasterize_svg(&tree)?;
                let png = encode_png(&img)?;
                (png, FrameBuffer::from_rgba_image(img))
            }
            SourceKind::Png => normalize_png_bytes(bytes)?,
            SourceKind::Raster => {
                let img = image::load_from_memory(&bytes)
                    .context("decode image")?
                    .to_rgba8();
                let png = encode_png(&img)?;
                (png, FrameBuffer::from_rgba_image(img))
            }
        };

        tracing::debug!(
            path = %path.display(),
            width = frame.width,
            height = frame.height,
            "normalized frame"
        );

        Ok(NormalizedFrame {
            source: path.to_path_buf(),
            png,
            frame,
        })
    }
}

/// Normalize PNG bytes that are already in memory. PNG input is returned unchanged once it is
/// known to decode, so normalizing twice is byte-identical.
pub fn normalize_png_bytes(bytes: Vec<u8>) -> anyhow::Result<(Vec<u8>, FrameBuffer)> {
    let frame = decode_png(&bytes)?;
    Ok((bytes, frame))
}

fn decode_png(bytes: &[u8]) -> anyhow::Result<FrameBuffer> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("decode png")?;
    Ok(FrameBuffer::from_rgba_image(img.to_rgba8()))
}

pub fn encode_png(img: &image::RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}
