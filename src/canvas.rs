//! Pixel drawing primitives shared by the effects and the tooltip renderer

use image::{Rgba, RgbaImage};

/// Source-over blend of one pixel.
///
/// Opaque sources overwrite and transparent sources leave the destination
/// as it was, so exact colors survive compositing.
pub fn blend_over(dst: &Rgba<u8>, src: &Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => return *dst,
        255 => return *src,
        _ => {}
    }

    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let blend = |s: u8, d: u8| -> u8 {
        let out = (s as f32 / 255.0 * src_a + d as f32 / 255.0 * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([blend(src[0], dst[0]), blend(src[1], dst[1]), blend(src[2], dst[2]), (out_a * 255.0).round() as u8])
}

/// Alpha-blend `sprite` onto `canvas` with its top-left at (`x`, `y`).
///
/// Parts of the sprite outside the canvas, including negative offsets, are
/// clipped.
pub fn blit(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);

    for (sx, sy, pixel) in sprite.enumerate_pixels() {
        let dx = x + sx as i64;
        let dy = y + sy as i64;
        if dx < 0 || dy < 0 || dx >= cw || dy >= ch {
            continue;
        }
        let (dx, dy) = (dx as u32, dy as u32);
        let blended = blend_over(canvas.get_pixel(dx, dy), pixel);
        canvas.put_pixel(dx, dy, blended);
    }
}

/// Draw `layers` bottom to top onto a transparent canvas.
pub fn composite(width: u32, height: u32, layers: &[&RgbaImage]) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    for layer in layers {
        blit(&mut canvas, layer, 0, 0);
    }
    canvas
}

/// Overwrite a clipped rectangle with `color`.
pub fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width as i64).min(canvas.width() as i64);
    let y1 = (y + height as i64).min(canvas.height() as i64);

    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}
