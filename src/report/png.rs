use anyhow::{Context, Result, anyhow};
use resvg::{tiny_skia, usvg};

/// Rasterises one SVG document to PNG bytes at `scale` pixels per unit.
pub fn render_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow!("usvg parse failed: {e}"))?;

    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .context("image size out of range")?;
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .context("failed to allocate image")?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    pixmap
        .encode_png()
        .map_err(|e| anyhow!("png encoding failed: {e}"))
}
