use anyhow::{Context, Result, anyhow};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};
use std::collections::HashMap;
use svg2pdf::ConversionOptions;
use svg2pdf::usvg;
use tracing::debug;

const SVG_XOBJECT: Name<'static> = Name(b"S1");

/// SVG parsing state shared by every page of one document. Created once,
/// before the first page is converted.
pub struct RenderContext {
    options: usvg::Options<'static>,
}

impl RenderContext {
    pub fn init() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        debug!(faces = options.fontdb.len(), "render context ready");
        Self { options }
    }

    fn parse(&self, svg: &str) -> Result<usvg::Tree> {
        usvg::Tree::from_str(svg, &self.options).map_err(|e| anyhow!("usvg parse failed: {e}"))
    }
}

/// Converts each SVG page into one PDF page, in order.
pub fn render_document(ctx: &RenderContext, pages: &[String]) -> Result<Vec<u8>> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let mut pdf = Pdf::new();
    let mut page_ids = Vec::with_capacity(pages.len());

    for (i, svg) in pages.iter().enumerate() {
        let page_no = i + 1;
        let tree = ctx
            .parse(svg)
            .with_context(|| format!("failed to parse page {page_no}"))?;
        let (chunk, svg_ref) = svg2pdf::to_chunk(&tree, ConversionOptions::default())
            .map_err(|e| anyhow!("svg2pdf conversion failed on page {page_no}: {e}"))?;

        let mut map = HashMap::new();
        let chunk = chunk.renumber(|old| *map.entry(old).or_insert_with(|| alloc.bump()));
        let svg_id = *map
            .get(&svg_ref)
            .with_context(|| format!("page {page_no} has no SVG object"))?;

        let page_id = alloc.bump();
        let content_id = alloc.bump();
        let size = tree.size();
        let (w, h) = (size.width(), size.height());

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, w, h));
        page.parent(page_tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        resources.x_objects().pair(SVG_XOBJECT, svg_id);
        resources.finish();
        page.finish();

        let mut content = Content::new();
        content
            .save_state()
            .transform([w, 0.0, 0.0, h, 0.0, 0.0])
            .x_object(SVG_XOBJECT)
            .restore_state();
        pdf.stream(content_id, &content.finish());
        pdf.extend(&chunk);
        page_ids.push(page_id);
    }

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::chart::{Page, TablePage};

    fn page(title: &str) -> String {
        Page::Table(TablePage {
            title: title.to_string(),
            rows: vec![("Info".to_string(), "No features found".to_string())],
            note: None,
        })
        .to_svg()
        .unwrap()
    }

    #[test]
    fn one_pdf_page_per_svg() {
        let ctx = RenderContext::init();
        let bytes = render_document(&ctx, &[page("a"), page("b"), page("c")]).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 3"));
    }

    #[test]
    fn broken_svg_is_an_error() {
        let ctx = RenderContext::init();
        let err = render_document(&ctx, &["<svg".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("page 1"));
    }
}
