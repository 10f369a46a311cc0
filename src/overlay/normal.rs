//! Single-color multiplicative tint

use super::{copy_into, pack_argb, unpack_argb, OverlayConfig};
use image::RgbaImage;
use std::collections::HashMap;
use tracing::debug;

/// Grid samples taken along each axis when classifying a sprite
const GRAYSCALE_GRID: u32 = 10;
const GRAYSCALE_MAX_SAMPLES: usize = 100;
const GRAYSCALE_TOLERANCE: i16 = 2;

/// True when every sampled opaque pixel has near-equal channels.
///
/// Samples a coarse grid rather than every pixel. Only opaque samples count
/// toward the sample cap, and an image with no opaque samples is not
/// grayscale.
pub fn is_grayscale(image: &RgbaImage) -> bool {
    let step_x = (image.width() / GRAYSCALE_GRID).max(1) as usize;
    let step_y = (image.height() / GRAYSCALE_GRID).max(1) as usize;

    let mut samples = 0;
    let opaque = (0..image.height())
        .step_by(step_y)
        .flat_map(|y| (0..image.width()).step_by(step_x).map(move |x| (x, y)))
        .map(|(x, y)| image.get_pixel(x, y).0)
        .filter(|[_, _, _, a]| *a != 0)
        .take(GRAYSCALE_MAX_SAMPLES);

    for [r, g, b, _] in opaque {
        let (r, g, b) = (r as i16, g as i16, b as i16);
        if (r - g).abs() > GRAYSCALE_TOLERANCE
            || (g - b).abs() > GRAYSCALE_TOLERANCE
            || (r - b).abs() > GRAYSCALE_TOLERANCE
        {
            return false;
        }
        samples += 1;
    }
    samples > 0
}

fn tint_channel(src: u8, desired: u8) -> u8 {
    (src as f64 / 255.0 * desired as f64).round() as u8
}

fn detint_channel(src: u8, desired: u8, default: u8) -> u8 {
    if default == 0 {
        return tint_channel(src, desired);
    }
    (src as f64 * desired as f64 / default as f64).round().clamp(0.0, 255.0) as u8
}

/// Tint `source` with `config.colors[0]` into `target`.
///
/// When default colors are configured and the source is not grayscale,
/// each channel is first divided by the default color so pre-tinted
/// sprites recolor to the requested hue rather than a blend of both.
pub fn render(target: &mut RgbaImage, source: &RgbaImage, config: &OverlayConfig) {
    let Some(&color) = config.colors.first() else {
        copy_into(target, source);
        return;
    };
    let [_, red, green, blue] = color.to_be_bytes();

    let default = config
        .default_colors
        .as_ref()
        .and_then(|d| d.first().copied())
        .filter(|_| !is_grayscale(source));

    match default {
        Some(default) => {
            let [_, dr, dg, db] = default.to_be_bytes();
            debug!("De-tinting from ({dr}, {dg}, {db}) to ({red}, {green}, {blue})");
        }
        None => debug!("Tinting to ({red}, {green}, {blue})"),
    }

    let mut memo: HashMap<u32, u32> = HashMap::new();

    for (x, y, pixel) in source.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        let packed = pack_argb(*pixel);
        let recolored = *memo.entry(packed).or_insert_with(|| {
            let [a, r, g, b] = packed.to_be_bytes();
            let (r, g, b) = match default {
                Some(default) => {
                    let [_, dr, dg, db] = default.to_be_bytes();
                    (detint_channel(r, red, dr), detint_channel(g, green, dg), detint_channel(b, blue, db))
                }
                None => (tint_channel(r, red), tint_channel(g, green), tint_channel(b, blue)),
            };
            u32::from_be_bytes([a, r, g, b])
        });
        target.put_pixel(x, y, unpack_argb(recolored));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_white_becomes_desired_color() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let mut target = RgbaImage::new(1, 1);
        render(&mut target, &source, &OverlayConfig::new(vec![0xFF0000]));
        assert_eq!(pack_argb(*target.get_pixel(0, 0)), 0xFFFF_0000);
    }

    #[test]
    fn test_alpha_is_preserved() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 90]));
        let mut target = RgbaImage::new(1, 1);
        render(&mut target, &source, &OverlayConfig::new(vec![0x00FF00]));
        assert_eq!(target.get_pixel(0, 0), &Rgba([0, 128, 0, 90]));
    }

    #[test]
    fn test_transparent_pixels_untouched() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        let mut target = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
        render(&mut target, &source, &OverlayConfig::new(vec![0xFF0000]));
        assert_eq!(target.get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_no_colors_copies_source() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let mut target = RgbaImage::new(2, 2);
        render(&mut target, &source, &OverlayConfig::default());
        assert_eq!(target, source);
    }

    #[test]
    fn test_detint_restores_base_intensity() {
        // A sprite pre-tinted with (200, 100, 50) recolors to pure blue
        let source = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        let mut target = RgbaImage::new(1, 1);
        let config = OverlayConfig::new(vec![0x0000FF]).with_default_colors(vec![0xC86432]);
        render(&mut target, &source, &config);
        assert_eq!(target.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_detint_clamps_and_handles_zero_default() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        let mut target = RgbaImage::new(1, 1);
        // default red channel is zero, so red uses the plain tint
        let config = OverlayConfig::new(vec![0xFFFFFF]).with_default_colors(vec![0x00_32_32]);
        render(&mut target, &source, &config);
        assert_eq!(target.get_pixel(0, 0), &Rgba([200, 255, 255, 255]));
    }

    #[test]
    fn test_grayscale_source_skips_detint() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([100, 101, 99, 255]));
        let mut target = RgbaImage::new(1, 1);
        let config = OverlayConfig::new(vec![0xFF0000]).with_default_colors(vec![0x800000]);
        render(&mut target, &source, &config);
        assert_eq!(target.get_pixel(0, 0), &Rgba([100, 0, 0, 255]));
    }

    #[test]
    fn test_is_grayscale_ignores_transparent_pixels() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([50, 50, 50, 255]));
        image.put_pixel(0, 0, Rgba([255, 0, 0, 0]));
        assert!(is_grayscale(&image));
        image.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        assert!(!is_grayscale(&image));
    }

    #[test]
    fn test_is_grayscale_needs_an_opaque_sample() {
        assert!(!is_grayscale(&RgbaImage::new(4, 4)));
        assert!(!is_grayscale(&RgbaImage::new(0, 0)));
    }

    #[test]
    fn test_is_grayscale_caps_only_opaque_samples() {
        // 15x15 is sampled at every pixel; the first 105 samples are
        // transparent, so the colored pixel further down must still be seen
        let mut image = RgbaImage::new(15, 15);
        for y in 7..15 {
            for x in 0..15 {
                image.put_pixel(x, y, Rgba([90, 90, 90, 255]));
            }
        }
        assert!(is_grayscale(&image));
        image.put_pixel(0, 10, Rgba([255, 0, 0, 255]));
        assert!(!is_grayscale(&image));
    }
}
