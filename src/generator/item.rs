//! Single item sprite generator

use super::{GeneratedObject, Generator, Resources, DEFAULT_FRAME_DELAY_MS};
use crate::cache::{CacheKeyFields, FieldValue};
use crate::effect::{EffectContext, EffectPipeline, META_ARMOR_TRIM, META_COLOR, META_DATA, META_DURABILITY};
use crate::error::{GeneratorError, GeneratorResult};
use crate::output::scale_image;
use tracing::debug;

/// Sprites this size or smaller are enlarged by `big_image`
pub const BIG_IMAGE_MAX_SOURCE: u32 = 16;
pub const BIG_IMAGE_FACTOR: u32 = 10;

const MINECRAFT_NAMESPACE: &str = "minecraft:";

/// Renders an item sprite through the effect pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGenerator {
    item_id: String,
    data: Option<String>,
    color: Option<String>,
    armor_trim: Option<String>,
    enchanted: bool,
    hovered: bool,
    big_image: bool,
    durability: Option<u8>,
}

/// Builder for [`ItemGenerator`]
#[derive(Debug, Clone, Default)]
pub struct ItemGeneratorBuilder {
    item_id: String,
    data: Option<String>,
    color: Option<String>,
    armor_trim: Option<String>,
    enchanted: bool,
    hovered: bool,
    big_image: bool,
    durability: Option<i64>,
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

impl ItemGeneratorBuilder {
    /// Item id, with or without the `minecraft:` namespace.
    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = item_id.into();
        self
    }

    /// Overlay color option, such as a dye name or hex color.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = non_blank(data.into());
        self
    }

    /// Explicit color; takes precedence over `data` for overlays.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = non_blank(color.into());
        self
    }

    /// Trim material for armor pieces, such as `gold`.
    pub fn armor_trim(mut self, material: impl Into<String>) -> Self {
        self.armor_trim = non_blank(material.into());
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

    pub fn big_image(mut self, big_image: bool) -> Self {
        self.big_image = big_image;
        self
    }

    pub fn durability(mut self, percent: i64) -> Self {
        self.durability = Some(percent);
        self
    }

    /// # Errors
    ///
    /// Returns [`GeneratorError::Validation`] for a blank item id or a
    /// durability outside `0..=100`.
    pub fn build(self) -> GeneratorResult<ItemGenerator> {
        let item_id = self.item_id.trim().replace(MINECRAFT_NAMESPACE, "");
        if item_id.is_empty() {
            return Err(GeneratorError::validation("item id must not be blank"));
        }

        let durability = match self.durability {
            Some(percent) if !(0..=100).contains(&percent) => {
                return Err(GeneratorError::validation(format!(
                    "durability must be between 0 and 100, got {percent}"
                )));
            }
            Some(percent) => Some(percent as u8),
            None => None,
        };

        Ok(ItemGenerator {
            item_id,
            data: self.data,
            color: self.color,
            armor_trim: self.armor_trim,
            enchanted: self.enchanted,
            hovered: self.hovered,
            big_image: self.big_image,
            durability,
        })
    }
}

impl ItemGenerator {
    pub fn builder() -> ItemGeneratorBuilder {
        ItemGeneratorBuilder::default()
    }

    /// Item id without its namespace.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    fn context(&self, resources: &Resources) -> GeneratorResult<EffectContext> {
        let sprite = resources
            .sprites
            .sprite(&self.item_id)
            .ok_or_else(|| GeneratorError::generation(format!("Item with ID `{}` not found", self.item_id)))?;

        Ok(EffectContext::builder(sprite.clone())
            .item_id(self.item_id.as_str())
            .enchanted(self.enchanted)
            .hovered(self.hovered)
            .metadata_opt(META_DATA, self.data.clone())
            .metadata_opt(META_COLOR, self.color.clone())
            .metadata_opt(META_ARMOR_TRIM, self.armor_trim.clone())
            .metadata_opt(META_DURABILITY, self.durability.map(i64::from))
            .build())
    }
}

impl CacheKeyFields for ItemGenerator {
    fn config_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("item_id", self.item_id.as_str().into()),
            ("data", self.data.clone().into()),
            ("color", self.color.clone().into()),
            ("armor_trim", self.armor_trim.clone().into()),
            ("enchanted", self.enchanted.into()),
            ("hovered", self.hovered.into()),
            ("big_image", self.big_image.into()),
            ("durability", self.durability.map(u32::from).into()),
        ]
    }
}

impl Generator for ItemGenerator {
    fn render(&self, resources: &Resources) -> GeneratorResult<GeneratedObject> {
        let pipeline = EffectPipeline::default_item_pipeline(resources.sprites.clone());
        let result = pipeline.execute(self.context(resources)?)?;

        let mut frames = result.frames().to_vec();
        let (width, height) = result.image().dimensions();
        if self.big_image && width <= BIG_IMAGE_MAX_SOURCE && height <= BIG_IMAGE_MAX_SOURCE {
            debug!("Upscaling {} x{}", self.item_id, BIG_IMAGE_FACTOR);
            frames = frames.into_iter().map(|f| scale_image(f, BIG_IMAGE_FACTOR)).collect();
        }

        let delay = match result.frame_delay_ms() {
            0 => DEFAULT_FRAME_DELAY_MS,
            delay => delay,
        };
        GeneratedObject::from_frames(frames, delay)
            .ok_or_else(|| GeneratorError::generation(format!("No image produced for `{}`", self.item_id)))
    }
}
