//! Inventory-slot hover highlight

use super::{EffectContext, EffectResult, ImageEffect};
use crate::error::GeneratorResult;
use image::{Rgba, RgbaImage};

const OPACITY: f32 = 0.5;

/// Blends the item halfway toward white and fills the empty slot area
///
/// Output pixels are always opaque so animated output stays GIF-friendly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverImageEffect;

impl HoverImageEffect {
    pub fn highlight(image: &RgbaImage) -> RgbaImage {
        let lightness = (255.0 * OPACITY) as u8;
        RgbaImage::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            if a == 0 {
                return Rgba([lightness, lightness, lightness, 255]);
            }
            let blend = |c: u8| (c as f32 * (1.0 - OPACITY) + 255.0 * OPACITY).min(255.0) as u8;
            Rgba([blend(r), blend(g), blend(b), 255])
        })
    }
}

impl ImageEffect for HoverImageEffect {
    fn name(&self) -> &str {
        "hover"
    }

    fn priority(&self) -> i32 {
        200
    }

    fn can_apply(&self, context: &EffectContext) -> bool {
        context.is_hovered()
    }

    fn apply(&self, context: &EffectContext) -> GeneratorResult<EffectResult> {
        Ok(EffectResult::map_frames(context, Self::highlight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_becomes_gray() {
        let out = HoverImageEffect::highlight(&RgbaImage::new(1, 1));
        assert_eq!(out.get_pixel(0, 0), &Rgba([127, 127, 127, 255]));
    }

    #[test]
    fn test_opaque_blends_toward_white() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([0, 100, 255, 40]));
        let out = HoverImageEffect::highlight(&image);
        assert_eq!(out.get_pixel(0, 0), &Rgba([127, 177, 255, 255]));
    }

    #[test]
    fn test_only_when_hovered() {
        let image = RgbaImage::new(1, 1);
        let idle = EffectContext::builder(image.clone()).build();
        let hovered = EffectContext::builder(image).hovered(true).build();
        assert!(!HoverImageEffect.can_apply(&idle));
        assert!(HoverImageEffect.can_apply(&hovered));
    }
}
