//! Image and diagram drawers

use crate::pdf::{ImageData, ImageRenderInfo, PdfRenderItem};
use crate::raster::{fit_contain, Raster};
use deck_model::Bounds;
use std::sync::Arc;

fn image_item(image: &Arc<ImageData>, bounds: Bounds) -> PdfRenderItem {
    PdfRenderItem::Image(ImageRenderInfo {
        image: Arc::clone(image),
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
    })
}

/// Images fill the element box
pub fn draw_image(image: &Arc<ImageData>, bounds: Bounds) -> Vec<PdfRenderItem> {
    vec![image_item(image, bounds)]
}

/// Diagrams keep their aspect ratio, centred in the box
pub fn draw_diagram(raster: &Raster, bounds: Bounds) -> Vec<PdfRenderItem> {
    let target = fit_contain(bounds, raster.width, raster.height);
    vec![image_item(&raster.image, target)]
}
