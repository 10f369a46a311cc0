//! Animated enchantment glint
//!
//! Two rotated, scrolling samples of a tiling glint texture are added on top
//! of every opaque pixel. The animation covers six seconds at roughly 30
//! frames per second; frames are rendered in parallel.

use super::{EffectContext, EffectResult, ImageEffect};
use crate::error::GeneratorResult;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

pub const FRAME_DELAY_MS: u32 = 33;
pub const TOTAL_DURATION_MS: u32 = 6000;
const UV_SCALE: f64 = 8.0;
const SCROLL_SPEED: f64 = 0.3;
const BASE_SPRITE_PIXELS: f64 = 16.0;
const GLINT_TINT: [f32; 3] = [0.5, 0.25, 0.8];
const GLINT_INTENSITY: f32 = 0.75;

/// Number of frames in one glint cycle.
pub const fn frame_count() -> u32 {
    TOTAL_DURATION_MS.div_ceil(FRAME_DELAY_MS)
}

#[derive(Debug, Clone, Copy)]
struct GlintPass {
    period_ms: f64,
    rotation_deg: f64,
    direction: f64,
}

const PRIMARY: GlintPass = GlintPass { period_ms: 3000.0, rotation_deg: -50.0, direction: 1.0 };
const SECONDARY: GlintPass = GlintPass { period_ms: 4875.0, rotation_deg: 10.0, direction: -1.0 };

/// Per-image sampling parameters shared by every frame
#[derive(Debug, Clone, Copy)]
struct Projection {
    span_u: f64,
    span_v: f64,
    uv_scale: f64,
}

/// Glint overlay for enchanted items
#[derive(Debug, Clone)]
pub struct GlintImageEffect {
    texture: RgbaImage,
}

impl GlintImageEffect {
    pub fn new(texture: RgbaImage) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &RgbaImage {
        &self.texture
    }

    /// Render the full glint cycle over `base`.
    pub fn render_frames(&self, base: &RgbaImage) -> Vec<RgbaImage> {
        if self.texture.width() == 0 || self.texture.height() == 0 {
            return (0..frame_count()).map(|_| base.clone()).collect();
        }

        let resolution_scale = (base.width().max(base.height()) as f64 / BASE_SPRITE_PIXELS).max(1.0);
        let projection = Projection {
            span_u: BASE_SPRITE_PIXELS / self.texture.width() as f64,
            span_v: BASE_SPRITE_PIXELS / self.texture.height() as f64,
            uv_scale: UV_SCALE / resolution_scale,
        };

        (0..frame_count())
            .into_par_iter()
            .map(|index| {
                let time_ms = (index * FRAME_DELAY_MS) as f64;
                let mut frame = base.clone();
                self.apply_pass(&mut frame, time_ms, PRIMARY, projection);
                self.apply_pass(&mut frame, time_ms, SECONDARY, projection);
                frame
            })
            .collect()
    }

    fn apply_pass(&self, frame: &mut RgbaImage, time_ms: f64, pass: GlintPass, projection: Projection) {
        let (width, height) = frame.dimensions();
        let offset = (time_ms % pass.period_ms) / pass.period_ms;
        let shift = pass.direction * offset * SCROLL_SPEED / projection.uv_scale;
        let (sin, cos) = pass.rotation_deg.to_radians().sin_cos();

        for y in 0..height {
            let base_v = y as f64 / height as f64 * projection.span_v;
            for x in 0..width {
                let pixel = frame.get_pixel_mut(x, y);
                let [r, g, b, a] = pixel.0;
                if a == 0 {
                    continue;
                }

                let base_u = x as f64 / width as f64 * projection.span_u;
                let rotated_u = base_u * cos - base_v * sin;
                let rotated_v = base_u * sin + base_v * cos;
                let u = (rotated_u + shift) * projection.uv_scale;
                let v = rotated_v * projection.uv_scale;

                let sampled = self.sample(u, v);
                let glint_alpha = sampled[3] * GLINT_INTENSITY;
                if glint_alpha <= 0.0 {
                    continue;
                }

                let add = |channel: u8, i: usize| {
                    let value = (channel as f32 / 255.0 + sampled[i] * GLINT_TINT[i] * glint_alpha).min(1.0);
                    (value * 255.0 + 0.5) as u8
                };
                *pixel = Rgba([add(r, 0), add(g, 1), add(b, 2), a]);
            }
        }
    }

    /// Bilinear sample with wrap-around, returned as normalized RGBA.
    fn sample(&self, u: f64, v: f64) -> [f32; 4] {
        let (tw, th) = self.texture.dimensions();
        let tex_x = (u - u.floor()) * tw as f64 - 0.5;
        let tex_y = (v - v.floor()) * th as f64 - 0.5;
        let base_x = tex_x.floor();
        let base_y = tex_y.floor();

        let left = (base_x as i64).rem_euclid(tw as i64) as u32;
        let top = (base_y as i64).rem_euclid(th as i64) as u32;
        let right = (left + 1) % tw;
        let bottom = (top + 1) % th;

        let fx = tex_x - base_x;
        let fy = tex_y - base_y;
        let weights = [
            ((left, top), (1.0 - fx) * (1.0 - fy)),
            ((right, top), fx * (1.0 - fy)),
            ((left, bottom), (1.0 - fx) * fy),
            ((right, bottom), fx * fy),
        ];

        let mut out = [0.0f64; 4];
        for ((px, py), weight) in weights {
            let texel = self.texture.get_pixel(px, py).0;
            for (acc, channel) in out.iter_mut().zip(texel) {
                *acc += channel as f64 * weight;
            }
        }
        out.map(|c| (c / 255.0) as f32)
    }
}

impl ImageEffect for GlintImageEffect {
    fn name(&self) -> &str {
        "glint"
    }

    fn can_apply(&self, context: &EffectContext) -> bool {
        context.is_enchanted()
    }

    fn apply(&self, context: &EffectContext) -> GeneratorResult<EffectResult> {
        Ok(EffectResult::Animated { frames: self.render_frames(context.image()), delay_ms: FRAME_DELAY_MS })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_texture() -> RgbaImage {
        RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(), 182);
    }

    #[test]
    fn test_constant_texture_adds_constant_tint() {
        let effect = GlintImageEffect::new(white_texture());
        let base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let frames = effect.render_frames(&base);
        assert_eq!(frames.len(), 182);

        // each pass adds tint * 0.75; two passes on black
        let expected = |tint: f32| {
            let once = ((tint * 0.75) * 255.0 + 0.5) as u8;
            ((once as f32 / 255.0 + tint * 0.75).min(1.0) * 255.0 + 0.5) as u8
        };
        let pixel = frames[10].get_pixel(1, 2);
        assert_eq!(pixel, &Rgba([expected(0.5), expected(0.25), expected(0.8), 255]));
    }

    #[test]
    fn test_transparent_pixels_stay_transparent() {
        let effect = GlintImageEffect::new(white_texture());
        let frames = effect.render_frames(&RgbaImage::new(2, 2));
        assert!(frames.iter().all(|f| f.pixels().all(|p| p.0 == [0, 0, 0, 0])));
    }

    #[test]
    fn test_glint_is_deterministic() {
        let texture = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 128, ((x + y) * 8) as u8]));
        let effect = GlintImageEffect::new(texture);
        let base = RgbaImage::from_pixel(16, 16, Rgba([40, 40, 40, 255]));
        assert_eq!(effect.render_frames(&base), effect.render_frames(&base));
    }

    #[test]
    fn test_apply_is_animated() {
        let effect = GlintImageEffect::new(white_texture());
        let ctx = EffectContext::builder(RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255]))).enchanted(true).build();
        assert!(effect.can_apply(&ctx));
        match effect.apply(&ctx).unwrap() {
            EffectResult::Animated { frames, delay_ms } => {
                assert_eq!(delay_ms, 33);
                assert_eq!(frames.len(), 182);
            }
            EffectResult::Single(_) => panic!("glint must animate"),
        }
    }
}
