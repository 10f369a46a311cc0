//! Overlay recoloring
//!
//! An overlay is a secondary sprite layer (dye mask, potion liquid, armor
//! trim) that is recolored and composited onto a base item sprite. Three
//! strategies exist, selected per overlay by the sprite sheet index:
//!
//! | Strategy | Behavior |
//! |----------|----------|
//! | `NORMAL` | single-color multiplicative tint, optional de-tint |
//! | `MAPPED` | exact source color to palette index lookup |
//! | `DUAL_LAYER` | two Normal passes, `colors[1]` then `colors[0]` |
//!
//! Colors are packed `0xAARRGGBB` values throughout.

pub mod mapped;
pub mod normal;
pub mod options;

pub use options::OverlayColorOptions;

use image::{Rgba, RgbaImage};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Pack an RGBA pixel into `0xAARRGGBB`.
pub fn pack_argb(pixel: Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    u32::from_be_bytes([a, r, g, b])
}

/// Unpack `0xAARRGGBB` into an RGBA pixel.
pub fn unpack_argb(argb: u32) -> Rgba<u8> {
    let [a, r, g, b] = argb.to_be_bytes();
    Rgba([r, g, b, a])
}

/// Recoloring parameters for one render call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayConfig {
    pub colors: Vec<u32>,
    pub color_map: Option<HashMap<u32, usize>>,
    pub default_colors: Option<Vec<u32>>,
}

impl OverlayConfig {
    pub fn new(colors: impl Into<Vec<u32>>) -> Self {
        Self { colors: colors.into(), ..Self::default() }
    }

    pub fn with_color_map(mut self, color_map: HashMap<u32, usize>) -> Self {
        self.color_map = Some(color_map);
        self
    }

    /// Default colors enable de-tinting in the Normal strategy.
    pub fn with_default_colors(mut self, default_colors: impl Into<Vec<u32>>) -> Self {
        let default_colors = default_colors.into();
        self.default_colors = (!default_colors.is_empty()).then_some(default_colors);
        self
    }
}

/// Recoloring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayRenderer {
    Normal,
    Mapped,
    DualLayer,
}

impl OverlayRenderer {
    pub fn name(self) -> &'static str {
        match self {
            OverlayRenderer::Normal => "NORMAL",
            OverlayRenderer::Mapped => "MAPPED",
            OverlayRenderer::DualLayer => "DUAL_LAYER",
        }
    }

    /// Recolor `source` into `target`.
    ///
    /// Fully transparent source pixels leave the target untouched. The
    /// target is reallocated when its size differs from the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{Rgba, RgbaImage};
    /// use tooltipgen::overlay::{OverlayConfig, OverlayRenderer};
    ///
    /// let source = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
    /// let mut target = RgbaImage::new(1, 1);
    /// OverlayRenderer::Normal.render(&mut target, &source, &OverlayConfig::new(vec![0xFF0000]));
    /// assert_eq!(target.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    /// ```
    pub fn render(self, target: &mut RgbaImage, source: &RgbaImage, config: &OverlayConfig) {
        if target.dimensions() != source.dimensions() {
            *target = RgbaImage::new(source.width(), source.height());
        }
        match self {
            OverlayRenderer::Normal => normal::render(target, source, config),
            OverlayRenderer::Mapped => mapped::render(target, source, config),
            OverlayRenderer::DualLayer => render_dual_layer(target, source, config),
        }
    }
}

fn render_dual_layer(target: &mut RgbaImage, source: &RgbaImage, config: &OverlayConfig) {
    if config.colors.len() < 2 {
        copy_into(target, source);
        return;
    }

    // Each pass is a plain tint; the color map and default colors do not apply
    normal::render(target, source, &OverlayConfig::new(vec![config.colors[1]]));

    let first = OverlayConfig::new(vec![config.colors[0]]);
    let layered = target.clone();
    normal::render(target, &layered, &first);
}

/// Straight copy used by every strategy when there is nothing to apply.
pub(crate) fn copy_into(target: &mut RgbaImage, source: &RgbaImage) {
    target.clone_from(source);
}

/// Which layer an overlay tints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorMode {
    /// Tint the base sprite, de-tinting with the option's default colors
    #[default]
    Base,
    /// Tint the overlay layer drawn above the base
    Overlay,
}

/// A loaded overlay sprite with its recoloring rules
#[derive(Debug, Clone)]
pub struct ItemOverlay {
    pub name: String,
    pub image: RgbaImage,
    pub renderer: OverlayRenderer,
    pub color_mode: ColorMode,
    pub color_options: Option<Arc<OverlayColorOptions>>,
}

impl ItemOverlay {
    pub fn new(name: impl Into<String>, image: RgbaImage, renderer: OverlayRenderer) -> Self {
        Self { name: name.into(), image, renderer, color_mode: ColorMode::Base, color_options: None }
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn with_color_options(mut self, options: Arc<OverlayColorOptions>) -> Self {
        self.color_options = Some(options);
        self
    }
}
