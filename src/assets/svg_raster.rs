use std::{path::Path, sync::Arc};

use anyhow::{Context as _, bail};

/// Largest raster edge we are willing to allocate for one SVG frame.
pub const MAX_DIM: u32 = 16_384;

/// Font database shared by every SVG parsed in one run.
pub fn build_svg_fontdb() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
}

/// Parse `bytes` as SVG. `dpi` resolves physical units (`in`, `cm`, `mm`, `pt`, `pc`), and
/// relative `href`s are resolved against `resources_dir`.
pub fn parse_svg(
    bytes: &[u8],
    dpi: u32,
    resources_dir: Option<&Path>,
    fontdb: Arc<usvg::fontdb::Database>,
) -> anyhow::Result<usvg::Tree> {
    let opts = usvg::Options {
        dpi: dpi as f32,
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb,
        ..Default::default()
    };
    usvg::Tree::from_data(bytes, &opts).context("parse svg tree")
}

/// Render `tree` at its intrinsic pixel size into a straight-alpha RGBA image.
pub fn rasterize_svg(tree: &usvg::Tree) -> anyhow::Result<image::RgbaImage> {
    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    if width > MAX_DIM || height > MAX_DIM {
        bail!("svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})");
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .context("failed to allocate svg pixmap")?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    image::RgbaImage::from_raw(width, height, rgba).context("svg raster buffer size mismatch")
}
