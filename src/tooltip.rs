//! Tooltip assembly
//!
//! Lays styled lines out on the dark tooltip panel:
//!
//! ```text
//! pixel_size  = 2 * scale
//! start       = 5 * pixel_size        text inset from the edge
//! y_increment = 10 * pixel_size       line pitch
//! width       = 2 * start + widest line
//! height      = start + 4 * pixel_size + lines * y_increment + first-line gap
//! ```
//!
//! Drawing order per frame is background, text (shadow first), borders,
//! then outer padding. Obfuscated text turns the tooltip into a short
//! looping animation with the glyphs swapped every frame.

use crate::canvas::fill_rect;
use crate::config::MAX_SCALE;
use crate::error::{GeneratorError, GeneratorResult};
use crate::font::{self, GlyphStyle, GLYPH_HEIGHT};
use crate::format::ChatColor;
use crate::generator::GeneratedObject;
use crate::text::{LineSegment, TextSegment};
use image::{imageops, Rgba, RgbaImage};
use tracing::debug;

pub const DEFAULT_ALPHA: u8 = 245;
pub const OBFUSCATED_FRAME_COUNT: u32 = 10;
pub const OBFUSCATED_FRAME_DELAY_MS: u32 = 50;

const BACKGROUND_RGB: [u8; 3] = [18, 3, 18];
const BORDER_RGB: [u8; 3] = [37, 0, 94];

/// Pixel metrics derived from the scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    pixel_size: u32,
    start: u32,
    y_increment: u32,
}

impl Layout {
    fn new(scale: u32) -> Self {
        let pixel_size = 2 * scale;
        Self { pixel_size, start: 5 * pixel_size, y_increment: 10 * pixel_size }
    }
}

/// A tooltip ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    lines: Vec<LineSegment>,
    default_color: ChatColor,
    alpha: u8,
    padding: u32,
    padding_first_line: bool,
    render_border: bool,
    centered: bool,
    scale: u32,
}

/// Builder for [`Tooltip`]
///
/// Numeric settings are fitted into range instead of rejected.
#[derive(Debug, Clone)]
pub struct TooltipBuilder {
    tooltip: Tooltip,
}

impl Default for TooltipBuilder {
    fn default() -> Self {
        Self {
            tooltip: Tooltip {
                lines: Vec::new(),
                default_color: ChatColor::Gray,
                alpha: DEFAULT_ALPHA,
                padding: 0,
                padding_first_line: true,
                render_border: true,
                centered: false,
                scale: 1,
            },
        }
    }
}

impl TooltipBuilder {
    pub fn line(mut self, line: LineSegment) -> Self {
        self.tooltip.lines.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = LineSegment>) -> Self {
        self.tooltip.lines.extend(lines);
        self
    }

    /// Add a line made of `segments`.
    pub fn segments(self, segments: impl IntoIterator<Item = TextSegment>) -> Self {
        self.line(LineSegment::new(segments.into_iter().collect()))
    }

    /// Color for segments without one. Gray unless set.
    pub fn default_color(mut self, color: ChatColor) -> Self {
        self.tooltip.default_color = color;
        self
    }

    /// Background alpha, fitted into `0..=255`.
    pub fn alpha(mut self, alpha: i64) -> Self {
        self.tooltip.alpha = alpha.clamp(0, 255) as u8;
        self
    }

    /// Transparent border around the panel, negative values become 0.
    pub fn padding(mut self, padding: i64) -> Self {
        self.tooltip.padding = padding.clamp(0, u32::MAX as i64) as u32;
        self
    }

    pub fn padding_first_line(mut self, enabled: bool) -> Self {
        self.tooltip.padding_first_line = enabled;
        self
    }

    pub fn render_border(mut self, enabled: bool) -> Self {
        self.tooltip.render_border = enabled;
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.tooltip.centered = centered;
        self
    }

    /// Pixel multiplier, fitted into `1..=8`.
    pub fn scale(mut self, scale: u32) -> Self {
        self.tooltip.scale = scale.clamp(1, MAX_SCALE);
        self
    }

    pub fn build(self) -> Tooltip {
        self.tooltip
    }
}

impl Tooltip {
    pub fn builder() -> TooltipBuilder {
        TooltipBuilder::default()
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// True if any line has visible obfuscated text.
    pub fn is_animated(&self) -> bool {
        self.lines.iter().any(LineSegment::has_obfuscated)
    }

    fn layout(&self) -> Layout {
        Layout::new(self.scale)
    }

    fn first_line_gap(&self, layout: Layout) -> u32 {
        if self.padding_first_line {
            2 * layout.pixel_size
        } else {
            0
        }
    }

    /// Width of a line in screen pixels.
    fn line_width(line: &LineSegment, layout: Layout) -> u32 {
        line.segments.iter().map(|s| font::text_width(&s.text, s.bold)).sum::<u32>() * layout.pixel_size
    }

    /// Panel size before padding.
    pub fn panel_size(&self) -> (u32, u32) {
        let layout = self.layout();
        let widest = self.lines.iter().map(|l| Self::line_width(l, layout)).max().unwrap_or(0);
        let width = 2 * layout.start + widest;
        let height = layout.start
            + 4 * layout.pixel_size
            + self.lines.len() as u32 * layout.y_increment
            + self.first_line_gap(layout);
        (width, height)
    }

    /// Render every frame.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Generation`] when there are no lines.
    pub fn render(&self) -> GeneratorResult<GeneratedObject> {
        if self.lines.is_empty() {
            return Err(GeneratorError::generation("Tooltip has no lines to render"));
        }

        let animated = self.is_animated();
        let frame_count = if animated { OBFUSCATED_FRAME_COUNT } else { 1 };
        let (width, height) = self.panel_size();
        debug!("Rendering {}x{} tooltip with {} lines ({} frames)", width, height, self.lines.len(), frame_count);

        let frames: Vec<RgbaImage> =
            (0..frame_count).map(|frame| self.add_padding(self.render_frame(frame, animated, width, height))).collect();

        GeneratedObject::from_frames(frames, OBFUSCATED_FRAME_DELAY_MS)
            .ok_or_else(|| GeneratorError::generation("Tooltip rendered no frames"))
    }

    fn render_frame(&self, frame: u32, animated: bool, width: u32, height: u32) -> RgbaImage {
        let layout = self.layout();
        let ps = layout.pixel_size;
        let alpha = if animated { 255 } else { self.alpha };
        let mut image = RgbaImage::new(width, height);

        let [r, g, b] = BACKGROUND_RGB;
        fill_rect(
            &mut image,
            2 * ps as i64,
            2 * ps as i64,
            width.saturating_sub(4 * ps),
            height.saturating_sub(4 * ps),
            Rgba([r, g, b, alpha]),
        );

        let widest = self.lines.iter().map(|l| Self::line_width(l, layout)).max().unwrap_or(0);
        let mut y = layout.start as i64;
        for (index, line) in self.lines.iter().enumerate() {
            let mut x = layout.start as i64;
            if self.centered {
                x += ((widest - Self::line_width(line, layout)) / 2) as i64;
            }
            self.draw_line(&mut image, line, x, y, frame, layout);

            y += layout.y_increment as i64;
            if index == 0 {
                y += self.first_line_gap(layout) as i64;
            }
        }

        if self.render_border {
            Self::draw_borders(&mut image, layout, alpha);
        }
        image
    }

    fn draw_line(&self, image: &mut RgbaImage, line: &LineSegment, x: i64, y: i64, frame: u32, layout: Layout) {
        let ps = layout.pixel_size as i64;
        let mut x = x;
        let mut position = 0usize;

        for segment in &line.segments {
            let color = segment.color.unwrap_or(self.default_color);
            let [r, g, b] = color.rgb();
            let [sr, sg, sb] = color.shadow_rgb();
            let text_color = Rgba([r, g, b, 255]);
            let shadow_color = Rgba([sr, sg, sb, 255]);

            let glyphs: Vec<(char, i64)> = segment
                .text
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    let drawn = if segment.obfuscated { font::obfuscate(c, frame, position + i) } else { c };
                    (drawn, font::advance(c, segment.bold) as i64 * ps)
                })
                .collect();
            position += glyphs.len();
            let width: i64 = glyphs.iter().map(|(_, advance)| advance).sum();

            for (offset, color) in [(ps, shadow_color), (0, text_color)] {
                Self::draw_decorations(image, segment, x + offset, y + offset, width, layout, color);
                let style = GlyphStyle { color, unit: layout.pixel_size, bold: segment.bold, italic: segment.italic };
                let mut glyph_x = x + offset;
                for (c, advance) in &glyphs {
                    font::draw_glyph(image, *c, glyph_x, y + offset, style);
                    glyph_x += advance;
                }
            }

            x += width;
        }
    }

    /// Two-pixel strikethrough and underline rules.
    fn draw_decorations(
        image: &mut RgbaImage,
        segment: &TextSegment,
        x: i64,
        y: i64,
        width: i64,
        layout: Layout,
        color: Rgba<u8>,
    ) {
        let ps = layout.pixel_size as i64;
        let baseline = y + GLYPH_HEIGHT as i64 * ps;
        if segment.strikethrough && width > 0 {
            fill_rect(image, x, baseline - 4 * ps, width as u32, 2, color);
        }
        if segment.underlined && width > 0 {
            fill_rect(image, x - ps, baseline + ps / 2, (width + 2) as u32, 2, color);
        }
    }

    /// Dark outer edge with the two-step purple frame inside it.
    fn draw_borders(image: &mut RgbaImage, layout: Layout, alpha: u8) {
        let (width, height) = image.dimensions();
        let ps = layout.pixel_size;
        let [r, g, b] = BACKGROUND_RGB;
        let dark = Rgba([r, g, b, alpha]);

        let inner_w = width.saturating_sub(2 * ps);
        let inner_h = height.saturating_sub(2 * ps);
        fill_rect(image, 0, ps as i64, ps, inner_h, dark);
        fill_rect(image, ps as i64, 0, inner_w, ps, dark);
        fill_rect(image, (width - ps.min(width)) as i64, ps as i64, ps, inner_h, dark);
        fill_rect(image, ps as i64, (height - ps.min(height)) as i64, inner_w, ps, dark);

        let [r, g, b] = BORDER_RGB;
        let purple = Rgba([r, g, b, alpha]);
        let outer_thickness = (ps / 2).max(1);
        let inner_inset = ps + outer_thickness;
        let inner_thickness = ps.div_ceil(2).max(1);
        draw_frame(image, ps, outer_thickness, purple);
        if inner_inset * 2 < width && inner_inset * 2 < height {
            draw_frame(image, inner_inset, inner_thickness, purple);
        }
    }

    fn add_padding(&self, frame: RgbaImage) -> RgbaImage {
        if self.padding == 0 {
            return frame;
        }
        let mut padded = RgbaImage::new(frame.width() + 2 * self.padding, frame.height() + 2 * self.padding);
        imageops::replace(&mut padded, &frame, self.padding as i64, self.padding as i64);
        padded
    }
}

/// Rectangular ring `thickness` wide, `inset` from every edge.
fn draw_frame(image: &mut RgbaImage, inset: u32, thickness: u32, color: Rgba<u8>) {
    let (width, height) = image.dimensions();
    let (Some(inner_w), Some(inner_h)) = (width.checked_sub(2 * inset), height.checked_sub(2 * inset)) else {
        return;
    };
    if inner_w == 0 || inner_h == 0 {
        return;
    }

    let (x, y) = (inset as i64, inset as i64);
    fill_rect(image, x, y, inner_w, thickness, color);
    fill_rect(image, x, height.saturating_sub(inset + thickness) as i64, inner_w, thickness, color);

    let Some(vertical) = inner_h.checked_sub(2 * thickness).filter(|v| *v > 0) else {
        return;
    };
    fill_rect(image, x, y + thickness as i64, thickness, vertical, color);
    fill_rect(image, width.saturating_sub(inset + thickness) as i64, y + thickness as i64, thickness, vertical, color);
}
