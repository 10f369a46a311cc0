//! Overlay recoloring and armor trims as a pipeline stage

use super::{EffectContext, EffectResult, ImageEffect, META_ARMOR_TRIM, META_COLOR, META_DATA};
use crate::canvas;
use crate::error::GeneratorResult;
use crate::overlay::{ColorMode, ItemOverlay, OverlayConfig, OverlayRenderer};
use crate::sprites::SpriteStore;
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Armor pieces that accept a trim, paired with their trim overlay
const TRIM_OVERLAYS: [(&str, &str); 4] = [
    ("helmet", "helmet_trim"),
    ("chestplate", "chestplate_trim"),
    ("leggings", "leggings_trim"),
    ("boots", "boots_trim"),
];

/// Trim overlay name for an armor item id.
pub fn trim_overlay_name(item_id: &str) -> Option<&'static str> {
    let item_id = item_id.to_lowercase();
    TRIM_OVERLAYS.iter().find(|(piece, _)| item_id.contains(piece)).map(|(_, overlay)| *overlay)
}

/// Colors items with their bound overlay and draws armor trims
pub struct OverlayApplicationEffect {
    sprites: Arc<dyn SpriteStore>,
}

impl OverlayApplicationEffect {
    pub fn new(sprites: Arc<dyn SpriteStore>) -> Self {
        Self { sprites }
    }

    fn color_option(context: &EffectContext) -> String {
        context
            .metadata_text(META_COLOR)
            .filter(|c| !c.trim().is_empty())
            .or_else(|| context.metadata_text(META_DATA))
            .unwrap_or_default()
            .to_string()
    }

    fn armor_trim(context: &EffectContext) -> Option<&str> {
        context.metadata_text(META_ARMOR_TRIM).filter(|t| !t.trim().is_empty())
    }

    fn apply_overlay(base: &RgbaImage, overlay: &ItemOverlay, option: &str) -> RgbaImage {
        let options = overlay.color_options.as_deref();
        let colors = options.and_then(|o| o.colors_for_option(Some(option))).unwrap_or_default();
        if colors.is_empty() {
            warn!("No colors parsed from option '{}' for overlay '{}'", option, overlay.name);
        }

        let overlay_mode = overlay.color_mode == ColorMode::Overlay;
        let mut config = OverlayConfig::new(colors);
        if let Some(options) = options {
            config = config.with_color_map(options.map().clone());
            if !overlay_mode {
                config = config.with_default_colors(options.default_colors().to_vec());
            }
        }

        let (tinted_base, tinted_overlay) = if overlay_mode {
            let mut layer = RgbaImage::new(overlay.image.width(), overlay.image.height());
            overlay.renderer.render(&mut layer, &overlay.image, &config);
            debug!("Colored overlay layer of '{}'", overlay.name);
            (base.clone(), layer)
        } else {
            let mut tinted = RgbaImage::new(base.width(), base.height());
            overlay.renderer.render(&mut tinted, base, &config);
            debug!("Colored base item under '{}'", overlay.name);
            (tinted, overlay.image.clone())
        };

        canvas::composite(base.width(), base.height(), &[&tinted_base, &tinted_overlay])
    }

    fn apply_trim(base: &RgbaImage, trim: &ItemOverlay, material: &str) -> RgbaImage {
        let Some(options) = trim.color_options.as_deref() else {
            warn!("Trim overlay '{}' has no color options, skipping trim", trim.name);
            return base.clone();
        };
        let colors = options.colors_for_option(Some(material)).unwrap_or_default();
        if colors.is_empty() {
            warn!("No colors found for trim material '{}', skipping trim", material);
            return base.clone();
        }

        let config = OverlayConfig::new(colors).with_color_map(options.map().clone());
        let mut layer = RgbaImage::new(trim.image.width(), trim.image.height());
        OverlayRenderer::Mapped.render(&mut layer, &trim.image, &config);

        canvas::composite(base.width(), base.height(), &[base, &layer])
    }
}

impl ImageEffect for OverlayApplicationEffect {
    fn name(&self) -> &str {
        "overlay"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn can_apply(&self, context: &EffectContext) -> bool {
        let item_id = context.item_id();
        if self.sprites.overlay_for_item(item_id).is_some() {
            return true;
        }
        Self::armor_trim(context).is_some() && trim_overlay_name(item_id).is_some()
    }

    fn apply(&self, context: &EffectContext) -> GeneratorResult<EffectResult> {
        let item_id = context.item_id();
        let mut result = context.image().clone();

        if let Some(overlay) = self.sprites.overlay_for_item(item_id) {
            let option = Self::color_option(context);
            debug!("Applying overlay to item '{}' with color option '{}'", item_id, option);
            result = Self::apply_overlay(&result, overlay, &option);
        }

        if let Some(material) = Self::armor_trim(context) {
            match trim_overlay_name(item_id) {
                Some(trim_name) => match self.sprites.overlay(trim_name) {
                    Some(trim) => {
                        debug!("Applying armor trim '{}' to item '{}' using '{}'", material, item_id, trim_name);
                        result = Self::apply_trim(&result, trim, material);
                    }
                    None => warn!("Trim overlay '{}' not found for item '{}'", trim_name, item_id),
                },
                None => warn!("Item '{}' does not support armor trims", item_id),
            }
        }

        Ok(EffectResult::Single(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayColorOptions;
    use crate::sprites::SpriteSheet;
    use image::Rgba;
    use std::collections::HashMap;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn leather_options() -> Arc<OverlayColorOptions> {
        Arc::new(
            OverlayColorOptions::new("leather")
                .with_option("red", vec![0xFFFF_0000])
                .with_hex_colors(true)
                .with_default_colors(vec![0xFFFF_FFFF], true),
        )
    }

    fn trim_options() -> Arc<OverlayColorOptions> {
        Arc::new(
            OverlayColorOptions::new("trim")
                .with_option("gold", vec![0xFFDE_B12D])
                .with_map(HashMap::from([(0xFF00_0000, 0)])),
        )
    }

    fn store() -> Arc<dyn SpriteStore> {
        // overlay covers only the top-left pixel
        let mut overlay_image = RgbaImage::new(2, 2);
        overlay_image.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        let mut trim_image = RgbaImage::new(2, 2);
        trim_image.put_pixel(1, 1, Rgba([0, 0, 0, 255]));

        let sheet = SpriteSheet::in_memory()
            .with_overlay(
                ItemOverlay::new("leather_helmet", overlay_image.clone(), OverlayRenderer::Normal)
                    .with_color_options(leather_options()),
            )
            .with_overlay(
                ItemOverlay::new("potion", overlay_image, OverlayRenderer::Normal)
                    .with_color_mode(ColorMode::Overlay)
                    .with_color_options(leather_options()),
            )
            .with_overlay(
                ItemOverlay::new("helmet_trim", trim_image, OverlayRenderer::Mapped).with_color_options(trim_options()),
            )
            .bind("leather_helmet", "leather_helmet")
            .bind("potion", "potion");
        Arc::new(sheet)
    }

    fn context(item: &str) -> crate::effect::EffectContextBuilder {
        EffectContext::builder(RgbaImage::from_pixel(2, 2, WHITE)).item_id(item)
    }

    fn single(result: EffectResult) -> RgbaImage {
        match result {
            EffectResult::Single(image) => image,
            EffectResult::Animated { .. } => panic!("overlay effect is never animated"),
        }
    }

    #[test]
    fn test_trim_overlay_names() {
        assert_eq!(trim_overlay_name("DIAMOND_HELMET"), Some("helmet_trim"));
        assert_eq!(trim_overlay_name("netherite_boots"), Some("boots_trim"));
        assert_eq!(trim_overlay_name("diamond_sword"), None);
    }

    #[test]
    fn test_base_mode_tints_base_under_overlay() {
        let effect = OverlayApplicationEffect::new(store());
        let ctx = context("leather_helmet").metadata(META_COLOR, "red").build();
        assert!(effect.can_apply(&ctx));

        let out = single(effect.apply(&ctx).unwrap());
        // base is tinted red; the untinted overlay pixel sits on top
        assert_eq!(out.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn test_overlay_mode_tints_overlay_layer() {
        let effect = OverlayApplicationEffect::new(store());
        let ctx = context("potion").metadata(META_DATA, "#0000ff").build();
        let out = single(effect.apply(&ctx).unwrap());
        assert_eq!(out.get_pixel(1, 1), &WHITE);
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 10, 255]));
    }

    #[test]
    fn test_color_wins_over_data() {
        let ctx = context("potion").metadata(META_COLOR, "red").metadata(META_DATA, "blue").build();
        assert_eq!(OverlayApplicationEffect::color_option(&ctx), "red");
        let blank = context("potion").metadata(META_COLOR, "  ").metadata(META_DATA, "blue").build();
        assert_eq!(OverlayApplicationEffect::color_option(&blank), "blue");
    }

    #[test]
    fn test_trim_on_plain_armor() {
        let effect = OverlayApplicationEffect::new(store());
        let ctx = context("iron_helmet").metadata(META_ARMOR_TRIM, "gold").build();
        assert!(effect.can_apply(&ctx));
        let out = single(effect.apply(&ctx).unwrap());
        assert_eq!(out.get_pixel(1, 1), &Rgba([0xDE, 0xB1, 0x2D, 255]));
        assert_eq!(out.get_pixel(0, 0), &WHITE);
    }

    #[test]
    fn test_unknown_trim_material_is_skipped() {
        let effect = OverlayApplicationEffect::new(store());
        let ctx = context("iron_helmet").metadata(META_ARMOR_TRIM, "obsidian").build();
        let out = single(effect.apply(&ctx).unwrap());
        assert_eq!(out, RgbaImage::from_pixel(2, 2, WHITE));
    }

    #[test]
    fn test_not_applicable_without_overlay_or_trim() {
        let effect = OverlayApplicationEffect::new(store());
        assert!(!effect.can_apply(&context("stone").build()));
        assert!(!effect.can_apply(&context("diamond_sword").metadata(META_ARMOR_TRIM, "gold").build()));
    }
}
