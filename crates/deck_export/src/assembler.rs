//! Page/Document Assembler
//!
//! Turns a deck into a PDF. Each visible slide becomes one page: the
//! background first, then every element in list order. Element preparation
//! for a slide runs concurrently, but drawing is committed strictly in
//! element order, so output is deterministic.

use crate::drawers::draw_element;
use crate::error::Result;
use crate::pdf::{
    ImageRenderInfo, Paint, PageRenderInfo, PdfDocumentWriter, PdfRenderItem, RectRenderInfo,
};
use crate::prepare::{PreparedElement, Preparer};
use crate::services::{AssetResolver, Rasterizer, SyntaxHighlighter};
use crate::settings::ExportSettings;
use deck_model::{defaults, CanvasSize, Color, Deck, Element, Slide, Theme};
use futures_util::stream::{self, StreamExt};
use std::path::Path;

/// Slide colour, then theme background, then the default
pub fn background_color(slide: Option<&Slide>, theme: &Theme) -> Color {
    slide
        .and_then(|s| s.background.as_ref())
        .and_then(|b| b.color.as_deref())
        .and_then(Color::parse)
        .or_else(|| theme.background.as_deref().and_then(Color::parse))
        .unwrap_or_else(|| Color::parse_or(None, defaults::BACKGROUND_COLOR))
}

/// Page size for a deck, falling back to the default canvas when invalid
fn page_size(deck: &Deck) -> CanvasSize {
    match deck.canvas.validate() {
        Ok(()) => deck.canvas,
        Err(e) => {
            tracing::warn!("{}; using the default canvas", e);
            CanvasSize::default()
        }
    }
}

/// Whether an element has drawable geometry, warning when it does not
fn is_drawable(element: &&Element) -> bool {
    match element.validate() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Skipping {} element: {}", element.type_name(), e);
            false
        }
    }
}

/// Exports decks to PDF through a set of collaborators
pub struct DeckExporter<A, H, R> {
    assets: A,
    highlighter: H,
    rasterizer: R,
    settings: ExportSettings,
}

impl<A, H, R> DeckExporter<A, H, R>
where
    A: AssetResolver,
    H: SyntaxHighlighter,
    R: Rasterizer,
{
    pub fn new(assets: A, highlighter: H, rasterizer: R) -> Self {
        Self {
            assets,
            highlighter,
            rasterizer,
            settings: ExportSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Build the draw descriptors of every page.
    ///
    /// Always returns at least one page.
    pub async fn render_pages(&self, deck: &Deck) -> Result<Vec<PageRenderInfo>> {
        let canvas = page_size(deck);
        let theme = deck.theme();
        let preparer = Preparer::new(&self.assets, &self.highlighter, &self.rasterizer, &theme);

        let mut pages = Vec::new();
        for slide in deck.visible_slides() {
            tracing::debug!("Rendering slide {} ({} elements)", slide.id, slide.elements.len());
            pages.push(self.render_slide(&preparer, canvas, &theme, slide).await);
        }

        if pages.is_empty() {
            tracing::debug!("Deck has no visible slides, emitting a blank page");
            let mut page = PageRenderInfo::new(canvas.width, canvas.height);
            fill_background(&mut page, background_color(None, &theme));
            pages.push(page);
        }
        Ok(pages)
    }

    async fn render_slide(
        &self,
        preparer: &Preparer<'_, A, H, R>,
        canvas: CanvasSize,
        theme: &Theme,
        slide: &Slide,
    ) -> PageRenderInfo {
        let mut page = PageRenderInfo::new(canvas.width, canvas.height);
        fill_background(&mut page, background_color(Some(slide), theme));

        let background_image = slide.background.as_ref().and_then(|b| b.image.as_deref());
        if let Some(src) = background_image {
            if let Some(image) = preparer.load_image(src).await {
                page.add_item(PdfRenderItem::Image(ImageRenderInfo {
                    image,
                    x: 0.0,
                    y: 0.0,
                    width: page.width,
                    height: page.height,
                }));
            }
        }

        let elements = slide.elements.iter().filter(is_drawable);
        let prepared: Vec<PreparedElement<'_>> = stream::iter(elements)
            .map(|element| preparer.prepare(element))
            .buffered(self.settings.prefetch_concurrency.max(1))
            .collect()
            .await;

        let options = self.settings.draw_options();
        for element in &prepared {
            for item in draw_element(element, &options) {
                page.add_item(item);
            }
        }
        page
    }

    /// Export a deck to PDF bytes
    pub async fn export(&self, deck: &Deck) -> Result<Vec<u8>> {
        let pages = self.render_pages(deck).await?;

        let mut options = self.settings.pdf.clone();
        if options.title.is_none() && !deck.title.trim().is_empty() {
            options.title = Some(deck.title.clone());
        }

        let bytes = PdfDocumentWriter::new(options).write_to_bytes(&pages)?;
        tracing::info!("Exported {} pages ({} bytes)", pages.len(), bytes.len());
        Ok(bytes)
    }

    /// Export a deck and write the PDF to `path`
    pub async fn export_to_path(&self, deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.export(deck).await?;
        tokio::fs::write(path.as_ref(), bytes).await?;
        Ok(())
    }
}

fn fill_background(page: &mut PageRenderInfo, color: Color) {
    if color.is_transparent() {
        return;
    }
    page.add_item(PdfRenderItem::Rectangle(RectRenderInfo {
        x: 0.0,
        y: 0.0,
        width: page.width,
        height: page.height,
        corner_radius: 0.0,
        paint: Paint::fill(color.into()),
    }));
}
