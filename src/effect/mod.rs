//! Image effects applied to rendered items
//!
//! Effects never mutate their input. Each one reads an [`EffectContext`]
//! and returns an [`EffectResult`], which the [`EffectPipeline`] turns back
//! into a fresh context for the next stage. Metadata, the item id and the
//! enchanted/hovered flags always come from the context the pipeline
//! started with, so a stage cannot drop or rewrite them.

pub mod durability;
pub mod glint;
pub mod hover;
pub mod overlay;
pub mod pipeline;

pub use durability::DurabilityBarEffect;
pub use glint::GlintImageEffect;
pub use hover::HoverImageEffect;
pub use overlay::OverlayApplicationEffect;
pub use pipeline::EffectPipeline;

use crate::error::GeneratorResult;
use image::RgbaImage;
use std::collections::HashMap;

/// Metadata key for a named or hex color option
pub const META_COLOR: &str = "color";
/// Metadata key for the fallback data option
pub const META_DATA: &str = "data";
/// Metadata key for an armor trim material
pub const META_ARMOR_TRIM: &str = "armor_trim";
/// Metadata key for remaining durability, 0 to 100
pub const META_DURABILITY: &str = "durability_percent";

/// Value stored in effect metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl MetadataValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

/// Immutable input to an effect
#[derive(Debug, Clone)]
pub struct EffectContext {
    image: RgbaImage,
    animation_frames: Vec<RgbaImage>,
    frame_delay_ms: u32,
    metadata: HashMap<String, MetadataValue>,
    item_id: String,
    enchanted: bool,
    hovered: bool,
}

impl EffectContext {
    pub fn builder(image: RgbaImage) -> EffectContextBuilder {
        EffectContextBuilder::new(image)
    }

    /// The still image, or the first frame when animated.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn animation_frames(&self) -> &[RgbaImage] {
        &self.animation_frames
    }

    /// Every frame to process: the animation, or just the still image.
    pub fn frames(&self) -> &[RgbaImage] {
        if self.is_animated() {
            &self.animation_frames
        } else {
            std::slice::from_ref(&self.image)
        }
    }

    pub fn frame_delay_ms(&self) -> u32 {
        self.frame_delay_ms
    }

    /// True when there are at least two frames.
    pub fn is_animated(&self) -> bool {
        self.animation_frames.len() >= 2
    }

    pub fn metadata(&self) -> &HashMap<String, MetadataValue> {
        &self.metadata
    }

    pub fn metadata_text(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(MetadataValue::as_text)
    }

    pub fn metadata_int(&self, key: &str) -> Option<i64> {
        self.metadata.get(key).and_then(MetadataValue::as_int)
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn is_enchanted(&self) -> bool {
        self.enchanted
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

/// Builder for [`EffectContext`]
#[derive(Debug, Clone)]
pub struct EffectContextBuilder {
    image: RgbaImage,
    animation_frames: Vec<RgbaImage>,
    frame_delay_ms: u32,
    metadata: HashMap<String, MetadataValue>,
    item_id: String,
    enchanted: bool,
    hovered: bool,
}

impl EffectContextBuilder {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            animation_frames: Vec::new(),
            frame_delay_ms: 0,
            metadata: HashMap::new(),
            item_id: String::new(),
            enchanted: false,
            hovered: false,
        }
    }

    /// Set the animation; the first frame also becomes the still image.
    pub fn animation(mut self, frames: Vec<RgbaImage>, delay_ms: u32) -> Self {
        if let Some(first) = frames.first() {
            self.image = first.clone();
        }
        self.animation_frames = frames;
        self.frame_delay_ms = delay_ms;
        self
    }

    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = item_id.into();
        self
    }

    pub fn enchanted(mut self, enchanted: bool) -> Self {
        self.enchanted = enchanted;
        self
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn metadata(mut self, key: &str, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Insert only when `value` is present.
    pub fn metadata_opt(self, key: &str, value: Option<impl Into<MetadataValue>>) -> Self {
        match value {
            Some(value) => self.metadata(key, value),
            None => self,
        }
    }

    pub fn metadata_map(mut self, metadata: HashMap<String, MetadataValue>) -> Self {
        self.metadata.extend(metadata);
        self
    }

    pub fn build(self) -> EffectContext {
        EffectContext {
            image: self.image,
            animation_frames: self.animation_frames,
            frame_delay_ms: self.frame_delay_ms,
            metadata: self.metadata,
            item_id: self.item_id,
            enchanted: self.enchanted,
            hovered: self.hovered,
        }
    }
}

/// Output of an effect
#[derive(Debug, Clone, PartialEq)]
pub enum EffectResult {
    Single(RgbaImage),
    Animated { frames: Vec<RgbaImage>, delay_ms: u32 },
}

impl EffectResult {
    /// Apply `f` to every frame of `context`, keeping the animation shape.
    pub fn map_frames(context: &EffectContext, f: impl Fn(&RgbaImage) -> RgbaImage) -> Self {
        if context.is_animated() {
            EffectResult::Animated {
                frames: context.animation_frames().iter().map(&f).collect(),
                delay_ms: context.frame_delay_ms(),
            }
        } else {
            EffectResult::Single(f(context.image()))
        }
    }

    /// Build the next context, carrying metadata and flags from `original`.
    pub fn into_context(self, original: &EffectContext) -> EffectContext {
        let builder = match self {
            EffectResult::Single(image) => EffectContextBuilder::new(image),
            EffectResult::Animated { frames, delay_ms } => {
                EffectContextBuilder::new(original.image().clone()).animation(frames, delay_ms)
            }
        };
        builder
            .item_id(original.item_id())
            .enchanted(original.is_enchanted())
            .hovered(original.is_hovered())
            .metadata_map(original.metadata().clone())
            .build()
    }
}

/// A stage in the effect pipeline
pub trait ImageEffect: Send + Sync {
    fn name(&self) -> &str;

    /// Lower runs earlier.
    fn priority(&self) -> i32 {
        100
    }

    fn can_apply(&self, context: &EffectContext) -> bool;

    fn apply(&self, context: &EffectContext) -> GeneratorResult<EffectResult>;
}
