//! Element Preparation
//!
//! The asynchronous half of an export. Every suspension point an element
//! needs (asset fetches, highlighting, rasterization) happens here, and the
//! result is a `Prepared` value that drawing can consume without awaiting.
//! A preparation that fails is logged and becomes `Prepared::Skipped`.

use crate::pdf::ImageData;
use crate::raster::{Raster, RasterBridge};
use crate::services::{plain_markup, AssetResolver, Rasterizer, SyntaxHighlighter};
use deck_model::{
    CodeStyle, Element, ElementKind, ResolvedCodeStyle, ResolvedShapeStyle, ResolvedTableStyle,
    ResolvedTextStyle, ShapeKind, ShapeStyle, TableStyle, TextStyle, Theme,
};
use layout_engine::{parse_document, parse_highlighted, CodeLine, MathMode, MathSize, ParsedLine};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Decode result shared by every element using the same source
type ImageSlot = Arc<OnceCell<Option<Arc<ImageData>>>>;

/// Text element content with every math expression already rasterised
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedText {
    pub lines: Vec<ParsedLine>,
    pub style: ResolvedTextStyle,
    math: HashMap<(String, MathMode), Raster>,
}

impl PreparedText {
    pub fn new(lines: Vec<ParsedLine>, style: ResolvedTextStyle) -> Self {
        Self {
            lines,
            style,
            math: HashMap::new(),
        }
    }

    pub fn insert_math(&mut self, expr: impl Into<String>, mode: MathMode, raster: Raster) {
        self.math.insert((expr.into(), mode), raster);
    }

    pub fn math(&self, expr: &str, mode: MathMode) -> Option<&Raster> {
        self.math.get(&(expr.to_string(), mode))
    }

    /// Natural size lookup for the layout engine
    pub fn math_size(&self, expr: &str, mode: MathMode) -> Option<MathSize> {
        self.math(expr, mode)
            .map(|raster| MathSize::new(raster.width, raster.height))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCode {
    pub lines: Vec<CodeLine>,
    pub style: ResolvedCodeStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub style: ResolvedTableStyle,
}

/// Fully resolved draw input for one element
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared {
    Text(PreparedText),
    Code(PreparedCode),
    Shape(ShapeKind, ResolvedShapeStyle),
    Table(PreparedTable),
    Image(Arc<ImageData>),
    Diagram(Raster),
    Video,
    /// Preparation failed; nothing is drawn
    Skipped,
}

/// An element paired with its prepared content
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedElement<'a> {
    pub element: &'a Element,
    pub prepared: Prepared,
}

/// Math expressions a document needs, deduplicated, in first-use order
fn math_requests(lines: &[ParsedLine]) -> Vec<(String, MathMode)> {
    let mut requests: Vec<(String, MathMode)> = Vec::new();
    let mut push = |expr: &str, mode: MathMode| {
        if !requests.iter().any(|(e, m)| e == expr && *m == mode) {
            requests.push((expr.to_string(), mode));
        }
    };
    for line in lines {
        if let Some(expr) = line.block_math_expr() {
            push(expr, MathMode::Display);
        }
        for run in line.runs().iter().filter(|run| run.math) {
            push(&run.text, MathMode::Inline);
        }
    }
    requests
}

/// Runs the asynchronous preparation of slide elements
pub struct Preparer<'a, A, H, R> {
    assets: &'a A,
    highlighter: &'a H,
    raster: RasterBridge<'a, R>,
    theme: &'a Theme,
    /// Decoded images by source reference, so repeated images embed once
    images: Mutex<HashMap<String, ImageSlot>>,
}

impl<'a, A, H, R> Preparer<'a, A, H, R>
where
    A: AssetResolver,
    H: SyntaxHighlighter,
    R: Rasterizer,
{
    pub fn new(assets: &'a A, highlighter: &'a H, rasterizer: &'a R, theme: &'a Theme) -> Self {
        Self {
            assets,
            highlighter,
            raster: RasterBridge::new(rasterizer),
            theme,
            images: Mutex::new(HashMap::new()),
        }
    }

    /// Prepare one element
    pub async fn prepare<'e>(&self, element: &'e Element) -> PreparedElement<'e> {
        let prepared = match &element.kind {
            ElementKind::Text { content, style } => {
                Prepared::Text(self.prepare_text(element, content, style.as_ref()).await)
            }
            ElementKind::Code {
                code,
                language,
                style,
            } => Prepared::Code(self.prepare_code(code, language, style.as_ref()).await),
            ElementKind::Shape { shape, style } => Prepared::Shape(
                *shape,
                ShapeStyle::resolve(self.theme.shape.as_ref(), style.as_ref()),
            ),
            ElementKind::Table {
                headers,
                rows,
                style,
            } => Prepared::Table(PreparedTable {
                headers: headers.clone(),
                rows: rows.clone(),
                style: TableStyle::resolve(self.theme.table.as_ref(), style.as_ref()),
            }),
            ElementKind::Image { src, .. } => match self.load_image(src).await {
                Some(image) => Prepared::Image(image),
                None => Prepared::Skipped,
            },
            ElementKind::Diagram { src, svg } => {
                match self.prepare_diagram(src.as_deref(), svg.as_deref()).await {
                    Some(raster) => Prepared::Diagram(raster),
                    None => Prepared::Skipped,
                }
            }
            ElementKind::Video { .. } => Prepared::Video,
        };

        if prepared == Prepared::Skipped {
            tracing::warn!("Skipping {} element {}", element.type_name(), element.id);
        }
        PreparedElement { element, prepared }
    }

    async fn prepare_text(
        &self,
        element: &Element,
        content: &str,
        style: Option<&TextStyle>,
    ) -> PreparedText {
        let style = TextStyle::resolve(self.theme.text.as_ref(), style);
        let document = parse_document(content);
        if let Some(buffer) = &document.unterminated_math {
            tracing::warn!(
                "Text element {} has an unclosed $$ block; {} lines dropped",
                element.id,
                buffer.lines().count()
            );
        }

        let mut prepared = PreparedText::new(document.lines, style);
        for (expr, mode) in math_requests(&prepared.lines) {
            let raster = self
                .raster
                .expression(&expr, mode, prepared.style.font_size, prepared.style.color)
                .await;
            if let Some(raster) = raster {
                prepared.insert_math(expr, mode, raster);
            }
        }
        prepared
    }

    async fn prepare_code(
        &self,
        code: &str,
        language: &str,
        style: Option<&CodeStyle>,
    ) -> PreparedCode {
        let style = CodeStyle::resolve(self.theme.code.as_ref(), style);
        let markup = match self.highlighter.highlight(code, language, &style.theme).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Highlighting {} code failed, drawing plain: {}", language, e);
                plain_markup(code)
            }
        };
        PreparedCode {
            lines: parse_highlighted(&markup, style.foreground),
            style,
        }
    }

    async fn prepare_diagram(&self, src: Option<&str>, svg: Option<&str>) -> Option<Raster> {
        let bytes = match (svg, src) {
            (Some(svg), _) if !svg.trim().is_empty() => svg.as_bytes().to_vec(),
            (_, Some(src)) => self.fetch_asset(src).await?,
            _ => return None,
        };
        self.raster.svg(&bytes).await
    }

    /// Resolve and fetch an asset, retrying with the raw reference when the
    /// resolved URL cannot be fetched
    pub async fn fetch_asset(&self, src: &str) -> Option<Vec<u8>> {
        let url = match self.assets.resolve(src).await {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Could not resolve {}: {}", src, e);
                src.to_string()
            }
        };

        match self.assets.fetch(&url).await {
            Ok(bytes) => return Some(bytes),
            Err(e) if url == src => {
                tracing::warn!("Failed to fetch {}: {}", src, e);
                return None;
            }
            Err(e) => tracing::debug!("Failed to fetch {}, retrying as given: {}", url, e),
        }

        match self.assets.fetch(src).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", src, e);
                None
            }
        }
    }

    /// Fetch and decode an image, once per distinct source.
    ///
    /// Concurrent loads of one source wait on the same slot, so every
    /// element receives the same shared image.
    pub async fn load_image(&self, src: &str) -> Option<Arc<ImageData>> {
        let slot = self.image_slot(src)?;
        slot.get_or_init(|| self.decode_image(src)).await.clone()
    }

    fn image_slot(&self, src: &str) -> Option<ImageSlot> {
        let mut images = match self.images.lock() {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!("Image cache unavailable: {}", e);
                return None;
            }
        };
        Some(Arc::clone(images.entry(src.to_string()).or_default()))
    }

    async fn decode_image(&self, src: &str) -> Option<Arc<ImageData>> {
        let bytes = self.fetch_asset(src).await?;
        match ImageData::decode(&bytes) {
            Ok(image) => Some(Arc::new(image)),
            Err(e) => {
                tracing::warn!("Cannot embed image {}: {}", src, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::png_fixture;
    use crate::raster::tests::FixedRasterizer;
    use crate::services::{AssetError, HighlightError, NullRasterizer, PlainHighlighter};
    use deck_model::Color;
    use layout_engine::code_tokens::line_text;

    /// Resolver serving a fixed set of paths from memory
    struct MemoryAssets {
        files: HashMap<String, Vec<u8>>,
    }

    impl MemoryAssets {
        fn new(files: &[(&str, Vec<u8>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, bytes)| (path.to_string(), bytes.clone()))
                    .collect(),
            }
        }
    }

    impl AssetResolver for MemoryAssets {
        async fn resolve(&self, path: &str) -> Result<String, AssetError> {
            if path.starts_with("unresolvable") {
                return Err(AssetError::NotFound(path.to_string()));
            }
            Ok(format!("mem://{path}"))
        }

        async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
            tokio::task::yield_now().await;
            let path = url.strip_prefix("mem://").unwrap_or(url);
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| AssetError::NotFound(url.to_string()))
        }
    }

    struct BrokenHighlighter;

    impl SyntaxHighlighter for BrokenHighlighter {
        async fn highlight(
            &self,
            _code: &str,
            _language: &str,
            _theme: &str,
        ) -> Result<String, HighlightError> {
            Err(HighlightError("service down".to_string()))
        }
    }

    fn element(json: &str) -> Element {
        serde_json::from_str(json).unwrap()
    }

    fn raster() -> FixedRasterizer {
        FixedRasterizer {
            width: 30.0,
            height: 12.0,
        }
    }

    #[test]
    fn test_math_requests_are_deduplicated() {
        let lines = layout_engine::parse_markdown("$a$ and $a$\n$$a$$\n$b$");
        assert_eq!(
            math_requests(&lines),
            vec![
                ("a".to_string(), MathMode::Inline),
                ("a".to_string(), MathMode::Display),
                ("b".to_string(), MathMode::Inline),
            ]
        );
    }

    #[tokio::test]
    async fn test_text_collects_math_rasters() {
        let assets = MemoryAssets::new(&[]);
        let rasterizer = raster();
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &PlainHighlighter, &rasterizer, &theme);
        let el = element(
            r#"{"id":"t","type":"text","x":0,"y":0,"width":400,"height":200,"content":"E = $mc^2$\n$$\\sum x$$"}"#,
        );
        let Prepared::Text(text) = preparer.prepare(&el).await.prepared else {
            panic!("expected text");
        };
        assert_eq!(text.lines.len(), 2);
        assert_eq!(
            text.math_size("mc^2", MathMode::Inline),
            Some(MathSize::new(30.0, 12.0))
        );
        assert!(text.math("\\sum x", MathMode::Display).is_some());
        assert!(text.math("mc^2", MathMode::Display).is_none());
    }

    #[tokio::test]
    async fn test_highlighter_failure_falls_back_to_plain() {
        let assets = MemoryAssets::new(&[]);
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &BrokenHighlighter, &NullRasterizer, &theme);
        let el = element(
            r#"{"id":"c","type":"code","x":0,"y":0,"width":400,"height":200,"code":"a < b\nc","language":"js"}"#,
        );
        let Prepared::Code(code) = preparer.prepare(&el).await.prepared else {
            panic!("expected code");
        };
        let texts: Vec<String> = code.lines.iter().map(|l| line_text(l)).collect();
        assert_eq!(texts, vec!["a < b", "c"]);
        assert_eq!(code.lines[0][0].color, Color::parse("#d4d4d4").unwrap());
    }

    #[tokio::test]
    async fn test_missing_image_is_skipped() {
        let assets = MemoryAssets::new(&[]);
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &PlainHighlighter, &NullRasterizer, &theme);
        let el = element(
            r#"{"id":"i","type":"image","x":0,"y":0,"width":40,"height":40,"src":"nope.png"}"#,
        );
        assert_eq!(preparer.prepare(&el).await.prepared, Prepared::Skipped);
    }

    #[tokio::test]
    async fn test_unresolvable_image_falls_back_to_source() {
        let assets = MemoryAssets::new(&[("unresolvable.png", png_fixture())]);
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &PlainHighlighter, &NullRasterizer, &theme);
        let image = preparer.load_image("unresolvable.png").await.unwrap();
        assert_eq!((image.width, image.height), (1, 1));
    }

    #[tokio::test]
    async fn test_repeated_images_share_data() {
        let assets = MemoryAssets::new(&[("logo.png", png_fixture())]);
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &PlainHighlighter, &NullRasterizer, &theme);
        let first = preparer.load_image("logo.png").await.unwrap();
        let second = preparer.load_image("logo.png").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_image() {
        let assets = MemoryAssets::new(&[("logo.png", png_fixture())]);
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &PlainHighlighter, &NullRasterizer, &theme);
        let (first, second) = futures_util::future::join(
            preparer.load_image("logo.png"),
            preparer.load_image("logo.png"),
        )
        .await;
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    }

    #[tokio::test]
    async fn test_diagram_from_inline_svg_and_asset() {
        let assets = MemoryAssets::new(&[("chart.svg", b"<svg/>".to_vec())]);
        let rasterizer = raster();
        let theme = Theme::default();
        let preparer = Preparer::new(&assets, &PlainHighlighter, &rasterizer, &theme);

        let inline = element(
            r#"{"id":"d1","type":"diagram","x":0,"y":0,"width":40,"height":40,"svg":"<svg/>"}"#,
        );
        assert!(matches!(preparer.prepare(&inline).await.prepared, Prepared::Diagram(_)));

        let linked = element(
            r#"{"id":"d2","type":"diagram","x":0,"y":0,"width":40,"height":40,"src":"chart.svg"}"#,
        );
        assert!(matches!(preparer.prepare(&linked).await.prepared, Prepared::Diagram(_)));

        let empty = element(r#"{"id":"d3","type":"diagram","x":0,"y":0,"width":40,"height":40}"#);
        assert_eq!(preparer.prepare(&empty).await.prepared, Prepared::Skipped);
    }
}
