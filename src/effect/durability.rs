//! Durability bar drawn along the bottom of damaged items

use super::{EffectContext, EffectResult, ImageEffect, META_DURABILITY};
use crate::canvas::fill_rect;
use crate::error::GeneratorResult;
use image::{Rgba, RgbaImage};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Two stacked bars: a colored fill over black, above a black row
///
/// The fill fades green to yellow above 50% and yellow to red below.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurabilityBarEffect;

impl DurabilityBarEffect {
    /// Bar color for a durability percentage.
    pub fn bar_color(percent: u8) -> Rgba<u8> {
        let percent = percent.min(100) as f64;
        if percent > 50.0 {
            let red = (255.0 * 2.0 * (100.0 - percent) / 100.0) as u8;
            Rgba([red, 255, 0, 255])
        } else {
            let green = (255.0 * 2.0 * percent / 100.0) as u8;
            Rgba([255, green, 0, 255])
        }
    }

    pub fn draw(item: &RgbaImage, percent: u8) -> RgbaImage {
        let mut out = item.clone();
        let scale = item.width() / 16;
        let bar_width = (item.width() + scale).saturating_sub(4 * scale);
        let bar_x = 2 * scale as i64;
        let color_bar_y = item.height() as i64 - 3 * scale as i64;
        let black_bar_y = item.height() as i64 - 2 * scale as i64;

        fill_rect(&mut out, bar_x, black_bar_y, bar_width, scale, BLACK);
        fill_rect(&mut out, bar_x, color_bar_y, bar_width, scale, BLACK);

        if percent > 0 {
            let filled = (bar_width as f64 * percent.min(100) as f64 / 100.0) as u32;
            fill_rect(&mut out, bar_x, color_bar_y, filled, scale, Self::bar_color(percent));
        }
        out
    }
}

fn durability(context: &EffectContext) -> Option<u8> {
    context.metadata_int(META_DURABILITY).map(|p| p.clamp(0, 100) as u8)
}

impl ImageEffect for DurabilityBarEffect {
    fn name(&self) -> &str {
        "durability"
    }

    fn priority(&self) -> i32 {
        300
    }

    fn can_apply(&self, context: &EffectContext) -> bool {
        durability(context).is_some_and(|p| p < 100)
    }

    fn apply(&self, context: &EffectContext) -> GeneratorResult<EffectResult> {
        match durability(context) {
            Some(percent) if percent < 100 => Ok(EffectResult::map_frames(context, |frame| Self::draw(frame, percent))),
            _ => Ok(EffectResult::map_frames(context, RgbaImage::clone)),
        }
    }
}
