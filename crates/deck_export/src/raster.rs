//! Rasterization Bridge
//!
//! Math and SVG diagrams have no native PDF representation. They are handed
//! to a [`Rasterizer`], and the returned PNG or JPEG is decoded into an image
//! XObject together with its natural size. Anything that does not produce a
//! drawable image becomes `None` so the caller can skip the content.

use crate::pdf::ImageData;
use crate::services::{RasterImage, Rasterizer};
use deck_model::{Bounds, Color};
use layout_engine::MathMode;
use std::sync::Arc;

/// A decoded raster and the size it occupies on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub image: Arc<ImageData>,
    pub width: f64,
    pub height: f64,
}

/// Decode a rasterizer result, rejecting empty or undecodable images
pub fn decode_raster(raster: RasterImage, what: &str) -> Option<Raster> {
    let drawable = |v: f64| v.is_finite() && v > 0.0;
    if !drawable(raster.width) || !drawable(raster.height) {
        tracing::warn!(
            "{} rendered with zero size ({}x{}), skipping",
            what,
            raster.width,
            raster.height
        );
        return None;
    }
    match ImageData::decode(&raster.data) {
        Ok(image) => Some(Raster {
            image: Arc::new(image),
            width: raster.width,
            height: raster.height,
        }),
        Err(e) => {
            tracing::warn!("{} produced an unusable image: {}", what, e);
            None
        }
    }
}

/// Turns rasterizer calls into optional, decoded rasters
pub struct RasterBridge<'a, R> {
    rasterizer: &'a R,
}

impl<'a, R: Rasterizer> RasterBridge<'a, R> {
    pub fn new(rasterizer: &'a R) -> Self {
        Self { rasterizer }
    }

    pub async fn expression(
        &self,
        expr: &str,
        mode: MathMode,
        font_size: f64,
        color: Color,
    ) -> Option<Raster> {
        if expr.trim().is_empty() {
            return None;
        }
        let display = mode == MathMode::Display;
        match self
            .rasterizer
            .rasterize_expression(expr, display, font_size, color)
            .await
        {
            Ok(Some(raster)) => decode_raster(raster, "math expression"),
            Ok(None) => {
                tracing::debug!("math expression {:?} rendered to nothing", expr);
                None
            }
            Err(e) => {
                tracing::warn!("math expression {:?} failed: {}", expr, e);
                None
            }
        }
    }

    pub async fn svg(&self, svg: &[u8]) -> Option<Raster> {
        if svg.is_empty() {
            return None;
        }
        match self.rasterizer.rasterize_svg(svg).await {
            Ok(Some(raster)) => decode_raster(raster, "SVG diagram"),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("SVG diagram failed: {}", e);
                None
            }
        }
    }
}

/// Largest box with the raster's aspect ratio that fits centred in `bounds`
pub fn fit_contain(bounds: Bounds, width: f64, height: f64) -> Bounds {
    if width <= 0.0 || height <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width / width).min(bounds.height / height);
    let (w, h) = (width * scale, height * scale);
    Bounds::new(
        bounds.x + (bounds.width - w) / 2.0,
        bounds.y + (bounds.height - h) / 2.0,
        w,
        h,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pdf::png_fixture;
    use crate::services::RasterError;

    /// Rasterizer returning a fixed 1x1 PNG at a configurable size
    pub(crate) struct FixedRasterizer {
        pub width: f64,
        pub height: f64,
    }

    impl Rasterizer for FixedRasterizer {
        async fn rasterize_expression(
            &self,
            _expr: &str,
            _display: bool,
            _font_size: f64,
            _color: Color,
        ) -> Result<Option<RasterImage>, RasterError> {
            Ok(Some(RasterImage {
                data: png_fixture(),
                width: self.width,
                height: self.height,
            }))
        }

        async fn rasterize_svg(&self, svg: &[u8]) -> Result<Option<RasterImage>, RasterError> {
            if svg.starts_with(b"<broken") {
                return Err(RasterError("bad svg".to_string()));
            }
            Ok(Some(RasterImage {
                data: png_fixture(),
                width: self.width,
                height: self.height,
            }))
        }
    }

    #[tokio::test]
    async fn test_expression_decodes_raster() {
        let rasterizer = FixedRasterizer {
            width: 40.0,
            height: 20.0,
        };
        let raster = RasterBridge::new(&rasterizer)
            .expression("x^2", MathMode::Inline, 24.0, Color::BLACK)
            .await
            .unwrap();
        assert_eq!((raster.width, raster.height), (40.0, 20.0));
        assert_eq!(raster.image.width, 1);
    }

    #[tokio::test]
    async fn test_zero_size_is_no_image() {
        let rasterizer = FixedRasterizer {
            width: 0.0,
            height: 20.0,
        };
        let bridge = RasterBridge::new(&rasterizer);
        assert!(bridge
            .expression("x", MathMode::Display, 24.0, Color::BLACK)
            .await
            .is_none());
        assert!(bridge.svg(b"<svg/>").await.is_none());
    }

    #[tokio::test]
    async fn test_errors_and_empty_input_are_no_image() {
        let rasterizer = FixedRasterizer {
            width: 10.0,
            height: 10.0,
        };
        let bridge = RasterBridge::new(&rasterizer);
        assert!(bridge.svg(b"<broken").await.is_none());
        assert!(bridge.svg(b"").await.is_none());
        assert!(bridge
            .expression("  ", MathMode::Inline, 24.0, Color::BLACK)
            .await
            .is_none());
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let raster = RasterImage {
            data: b"GIF89a".to_vec(),
            width: 10.0,
            height: 10.0,
        };
        assert!(decode_raster(raster, "test").is_none());
    }

    #[test]
    fn test_fit_contain_preserves_aspect_ratio() {
        let fitted = fit_contain(Bounds::new(0.0, 0.0, 200.0, 100.0), 50.0, 50.0);
        assert_eq!(fitted, Bounds::new(50.0, 0.0, 100.0, 100.0));

        let wide = fit_contain(Bounds::new(10.0, 10.0, 100.0, 100.0), 400.0, 100.0);
        assert_eq!(wide, Bounds::new(10.0, 47.5, 100.0, 25.0));
    }
}
