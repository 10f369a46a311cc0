//! Palette-index recoloring for multi-channel overlays such as armor trims

use super::{copy_into, pack_argb, unpack_argb, OverlayConfig};
use image::RgbaImage;

/// Replace each mapped source color with `config.colors[index]`.
///
/// Unmapped colors and indices past the end of the palette leave the
/// target pixel as it was.
pub fn render(target: &mut RgbaImage, source: &RgbaImage, config: &OverlayConfig) {
    let Some(color_map) = config.color_map.as_ref().filter(|_| !config.colors.is_empty()) else {
        copy_into(target, source);
        return;
    };

    for (x, y, pixel) in source.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        let replacement = color_map.get(&pack_argb(*pixel)).and_then(|&index| config.colors.get(index));
        if let Some(&color) = replacement {
            target.put_pixel(x, y, unpack_argb(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::collections::HashMap;

    fn trim_source() -> RgbaImage {
        let mut source = RgbaImage::new(3, 1);
        source.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        source.put_pixel(1, 0, Rgba([20, 20, 20, 255]));
        source.put_pixel(2, 0, Rgba([30, 30, 30, 255]));
        source
    }

    #[test]
    fn test_mapped_colors_replace_pixels() {
        let map = HashMap::from([(0xFF0A_0A0A, 0), (0xFF14_1414, 1), (0xFF1E_1E1E, 7)]);
        let config = OverlayConfig::new(vec![0xFFAA_0000, 0xFF00_BB00]).with_color_map(map);
        let mut target = RgbaImage::from_pixel(3, 1, Rgba([1, 1, 1, 1]));
        render(&mut target, &trim_source(), &config);

        assert_eq!(target.get_pixel(0, 0), &Rgba([0xAA, 0, 0, 255]));
        assert_eq!(target.get_pixel(1, 0), &Rgba([0, 0xBB, 0, 255]));
        // index 7 is out of range
        assert_eq!(target.get_pixel(2, 0), &Rgba([1, 1, 1, 1]));
    }

    #[test]
    fn test_missing_map_copies_source() {
        let mut target = RgbaImage::new(3, 1);
        render(&mut target, &trim_source(), &OverlayConfig::new(vec![0xFFFF_FFFF]));
        assert_eq!(target, trim_source());
    }
}
