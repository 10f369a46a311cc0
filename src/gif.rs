//! GIF animation rendering

use crate::output::{ensure_parent, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn write_frames<W: Write>(writer: W, frames: &[RgbaImage], duration_ms: u32, loop_anim: bool) -> Result<(), OutputError> {
    let mut encoder = GifEncoder::new(writer);

    let repeat = if loop_anim { Repeat::Infinite } else { Repeat::Finite(0) };
    encoder.set_repeat(repeat)?;

    // GIF delays are in centiseconds
    let delay_cs = (duration_ms / 10).max(1);
    for rgba_image in frames {
        let delay = Delay::from_numer_denom_ms(delay_cs * 10, 1);
        encoder.encode_frame(Frame::from_parts(rgba_image.clone(), 0, 0, delay))?;
    }
    Ok(())
}

/// Render a sequence of frames as an animated GIF file.
///
/// An empty frame list writes nothing. Delays are rounded down to whole
/// centiseconds with a minimum of 10 ms.
///
/// # Errors
///
/// Returns [`OutputError`] if the file cannot be created or encoded.
pub fn render_gif(frames: &[RgbaImage], duration_ms: u32, loop_anim: bool, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    ensure_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    write_frames(writer, frames, duration_ms, loop_anim)
}

/// Encode frames as GIF bytes.
pub fn encode_gif(frames: &[RgbaImage], duration_ms: u32, loop_anim: bool) -> Result<Vec<u8>, OutputError> {
    let mut bytes = Vec::new();
    if !frames.is_empty() {
        write_frames(&mut bytes, frames, duration_ms, loop_anim)?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    #[test]
    fn test_render_gif_creates_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glint.gif");
        let frames = vec![solid(2, 2, Rgba([255, 0, 0, 255])), solid(2, 2, Rgba([0, 255, 0, 255]))];

        render_gif(&frames, 50, true, &path).unwrap();
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_encode_gif_keeps_frame_count_and_delay() {
        let frames = vec![solid(4, 4, Rgba([255, 255, 0, 255])), solid(4, 4, Rgba([0, 255, 255, 255]))];
        let bytes = encode_gif(&frames, 50, true).unwrap();

        let decoded = GifDecoder::new(Cursor::new(bytes)).unwrap().into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 2);
        let (numer, denom) = decoded[0].delay().numer_denom_ms();
        assert_eq!(numer / denom, 50);
    }

    #[test]
    fn test_empty_frames_write_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        render_gif(&[], 100, true, &path).unwrap();
        assert!(!path.exists());
        assert!(encode_gif(&[], 100, true).unwrap().is_empty());
    }

    #[test]
    fn test_render_gif_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dirs/test.gif");
        render_gif(&[solid(2, 2, Rgba([255, 0, 0, 255]))], 5, false, &path).unwrap();
        assert!(path.exists());
    }
}
