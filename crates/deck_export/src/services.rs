//! External collaborators
//!
//! The export engine resolves assets, highlights code and rasterises math
//! and SVG through these traits. Their failures never abort an export; the
//! affected element is skipped or drawn with a fallback.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use deck_model::Color;
use layout_engine::code_tokens::escape_html;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Error resolving or fetching an asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("Asset path escapes the asset root: {0}")]
    OutsideRoot(String),
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error from a syntax highlighter
#[derive(Debug, Error)]
#[error("Highlighting failed: {0}")]
pub struct HighlightError(pub String);

/// Error from a rasterizer
#[derive(Debug, Error)]
#[error("Rasterization failed: {0}")]
pub struct RasterError(pub String);

/// Resolves deck asset references and fetches their bytes.
#[trait_variant::make(Send)]
pub trait AssetResolver: Send + Sync {
    /// Turn an asset reference from the deck into a fetchable URL.
    async fn resolve(&self, path: &str) -> Result<String, AssetError>;

    /// Fetch the bytes behind a resolved URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Produces colour-annotated markup for source code.
///
/// The markup is parsed by `layout_engine::parse_highlighted`.
#[trait_variant::make(Send)]
pub trait SyntaxHighlighter: Send + Sync {
    async fn highlight(&self, code: &str, language: &str, theme: &str)
        -> Result<String, HighlightError>;
}

/// An encoded image (PNG or JPEG) plus its natural size in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub data: Vec<u8>,
    pub width: f64,
    pub height: f64,
}

/// Renders content with no native PDF representation into images.
///
/// `Ok(None)` means the content rendered to nothing.
#[trait_variant::make(Send)]
pub trait Rasterizer: Send + Sync {
    async fn rasterize_expression(
        &self,
        expr: &str,
        display: bool,
        font_size: f64,
        color: Color,
    ) -> Result<Option<RasterImage>, RasterError>;

    async fn rasterize_svg(&self, svg: &[u8]) -> Result<Option<RasterImage>, RasterError>;
}

const DATA_URL_PREFIX: &str = "data:";

/// Decode a `data:` URL, base64 or percent-free plain text
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, AssetError> {
    let invalid = || AssetError::InvalidDataUrl(truncate(url, 48));
    let rest = url.strip_prefix(DATA_URL_PREFIX).ok_or_else(invalid)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
    if meta.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|_| invalid())
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Encode bytes as a base64 `data:` URL
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("{DATA_URL_PREFIX}{mime};base64,{}", STANDARD.encode(bytes))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Resolves asset paths against a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    root: PathBuf,
}

impl FsAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetResolver for FsAssetResolver {
    async fn resolve(&self, path: &str) -> Result<String, AssetError> {
        if path.starts_with(DATA_URL_PREFIX) {
            return Ok(path.to_string());
        }
        let relative = path
            .strip_prefix("file://")
            .unwrap_or(path)
            .trim_start_matches('/');
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(AssetError::OutsideRoot(path.to_string()));
        }
        Ok(self.root.join(relative).to_string_lossy().into_owned())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        if url.starts_with(DATA_URL_PREFIX) {
            return decode_data_url(url);
        }
        match tokio::fs::read(url).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(url.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Highlighter that emits line-wrapped markup with no colours
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl SyntaxHighlighter for PlainHighlighter {
    async fn highlight(
        &self,
        code: &str,
        _language: &str,
        _theme: &str,
    ) -> Result<String, HighlightError> {
        Ok(plain_markup(code))
    }
}

/// Uncoloured highlighter markup for `code`
pub fn plain_markup(code: &str) -> String {
    let lines: Vec<String> = code
        .split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            format!("<span class=\"line\">{}</span>", escape_html(line))
        })
        .collect();
    format!("<pre><code>{}</code></pre>", lines.join("\n"))
}

/// Rasterizer that renders nothing; math falls back to source text and
/// diagrams are skipped
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRasterizer;

impl Rasterizer for NullRasterizer {
    async fn rasterize_expression(
        &self,
        _expr: &str,
        _display: bool,
        _font_size: f64,
        _color: Color,
    ) -> Result<Option<RasterImage>, RasterError> {
        Ok(None)
    }

    async fn rasterize_svg(&self, _svg: &[u8]) -> Result<Option<RasterImage>, RasterError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_engine::code_tokens::line_text;
    use layout_engine::parse_highlighted;

    #[test]
    fn test_data_url_round_trip() {
        let url = encode_data_url("image/png", &[1, 2, 3, 250]);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), vec![1, 2, 3, 250]);
    }

    #[test]
    fn test_plain_data_url() {
        assert_eq!(decode_data_url("data:text/plain,hi").unwrap(), b"hi".to_vec());
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[tokio::test]
    async fn test_fs_resolver_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/logo.bin"), b"bytes").unwrap();

        let resolver = FsAssetResolver::new(dir.path());
        let url = resolver.resolve("/img/logo.bin").await.unwrap();
        assert_eq!(resolver.fetch(&url).await.unwrap(), b"bytes".to_vec());

        let missing = resolver.resolve("img/none.png").await.unwrap();
        assert!(matches!(
            resolver.fetch(&missing).await,
            Err(AssetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fs_resolver_rejects_parent_paths() {
        let resolver = FsAssetResolver::new("/srv/assets");
        assert!(matches!(
            resolver.resolve("../secret.png").await,
            Err(AssetError::OutsideRoot(_))
        ));
    }

    #[tokio::test]
    async fn test_fs_resolver_passes_data_urls_through() {
        let resolver = FsAssetResolver::new("/unused");
        let url = encode_data_url("image/jpeg", b"abc");
        assert_eq!(resolver.resolve(&url).await.unwrap(), url);
        assert_eq!(resolver.fetch(&url).await.unwrap(), b"abc".to_vec());
    }

    #[tokio::test]
    async fn test_plain_highlighter_round_trips_source() {
        let code = "if a < b {\n    print(\"&\");\n}";
        let markup = PlainHighlighter.highlight(code, "rust", "github-dark").await.unwrap();
        let lines = parse_highlighted(&markup, Color::WHITE);
        let texts: Vec<String> = lines.iter().map(|l| line_text(l)).collect();
        assert_eq!(texts, code.split('\n').collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_null_rasterizer_renders_nothing() {
        let result = NullRasterizer
            .rasterize_expression("x^2", false, 24.0, Color::BLACK)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(NullRasterizer.rasterize_svg(b"<svg/>").await.unwrap().is_none());
    }
}
