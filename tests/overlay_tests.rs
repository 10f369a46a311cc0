//! Integration tests for the overlay recoloring strategies

use image::{Rgba, RgbaImage};
use tooltipgen::overlay::{pack_argb, OverlayConfig, OverlayRenderer};

/// A small sprite with a gradient of grays and one transparent corner
fn gradient_sprite() -> RgbaImage {
    RgbaImage::from_fn(8, 8, |x, y| {
        if x == 0 && y == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            let v = (x * 32 + y * 3) as u8;
            Rgba([v, v, v, 255])
        }
    })
}

fn render(renderer: OverlayRenderer, source: &RgbaImage, config: &OverlayConfig) -> RgbaImage {
    let mut target = RgbaImage::new(source.width(), source.height());
    renderer.render(&mut target, source, config);
    target
}

#[test]
fn test_normal_tints_white_to_requested_color() {
    let source = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
    let target = render(OverlayRenderer::Normal, &source, &OverlayConfig::new(vec![0xFF0000]));
    assert_eq!(pack_argb(*target.get_pixel(0, 0)), 0xFFFF_0000);
}

#[test]
fn test_normal_leaves_transparent_pixels() {
    let source = gradient_sprite();
    let target = render(OverlayRenderer::Normal, &source, &OverlayConfig::new(vec![0x3366CC]));
    assert_eq!(target.get_pixel(0, 0)[3], 0);
    assert_eq!(target.get_pixel(7, 7)[3], 255);
}

#[test]
fn test_dual_layer_matches_two_normal_passes() {
    let source = gradient_sprite();
    let dual = render(OverlayRenderer::DualLayer, &source, &OverlayConfig::new(vec![0x00FF00, 0xFF0000]));

    let first = render(OverlayRenderer::Normal, &source, &OverlayConfig::new(vec![0xFF0000]));
    let manual = render(OverlayRenderer::Normal, &first, &OverlayConfig::new(vec![0x00FF00]));

    assert_eq!(dual, manual);
}

#[test]
fn test_dual_layer_ignores_default_colors() {
    let source = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
    let config = OverlayConfig::new(vec![0x808080, 0xFFFFFF]).with_default_colors(vec![0xC86432]);
    let dual = render(OverlayRenderer::DualLayer, &source, &config);

    let first = render(OverlayRenderer::Normal, &source, &OverlayConfig::new(vec![0xFFFFFF]));
    let manual = render(OverlayRenderer::Normal, &first, &OverlayConfig::new(vec![0x808080]));

    assert_eq!(dual, manual);
    assert_eq!(dual.get_pixel(0, 0), &Rgba([100, 50, 25, 255]));
}

#[test]
fn test_rendering_is_deterministic() {
    let source = gradient_sprite();
    let config = OverlayConfig::new(vec![0x00FF00, 0xFF0000]).with_default_colors(vec![0x808080]);

    for renderer in [OverlayRenderer::Normal, OverlayRenderer::Mapped, OverlayRenderer::DualLayer] {
        let a = render(renderer, &source, &config);
        let b = render(renderer, &source, &config);
        assert_eq!(a.as_raw(), b.as_raw(), "{}", renderer.name());
    }
}

#[test]
fn test_retinting_compounds() {
    let source = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 255]));
    let config = OverlayConfig::new(vec![0x808080]);
    let once = render(OverlayRenderer::Normal, &source, &config);
    let twice = render(OverlayRenderer::Normal, &once, &config);
    assert!(twice.get_pixel(0, 0)[0] < once.get_pixel(0, 0)[0]);
}

#[test]
fn test_mapped_writes_listed_colors_only() {
    let mut source = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
    source.put_pixel(1, 0, Rgba([40, 50, 60, 255]));

    let color_map = [(pack_argb(Rgba([10, 20, 30, 255])), 0usize)].into_iter().collect();
    let config = OverlayConfig::new(vec![0xFF00FF00]).with_color_map(color_map);
    let target = render(OverlayRenderer::Mapped, &source, &config);

    assert_eq!(target.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
    // unmapped colors leave the blank target pixel alone
    assert_eq!(target.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
}
