//! Generators: configured, cacheable renders
//!
//! Each generator is an immutable configuration built and validated up
//! front. Rendering reads only that configuration plus the shared
//! [`Resources`], so equal configurations produce equal images and can
//! share a cache entry.

mod compose;
mod inventory;
mod item;
mod nbt;
mod tooltip;

pub use compose::ImageComposer;
pub use inventory::{resolve_slot_conflicts, InventoryGenerator, InventoryGeneratorBuilder};
pub use item::{ItemGenerator, ItemGeneratorBuilder};
pub use nbt::{parse_nbt, NbtFormat, NbtImport, NbtMetadata};
pub use tooltip::{TooltipGenerator, TooltipGeneratorBuilder};

use crate::cache::{derive_key, CacheKeyFields, GenerationCache};
use crate::error::GeneratorResult;
use crate::gif::render_gif;
use crate::output::{save_png, OutputError};
use crate::sprites::SpriteStore;
use crate::text::PlaceholderParser;
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;

/// Default delay for animations that don't specify one
pub const DEFAULT_FRAME_DELAY_MS: u32 = 50;

/// A rendered image or animation
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedObject {
    Static(RgbaImage),
    Animated { frames: Vec<RgbaImage>, frame_delay_ms: u32 },
}

impl GeneratedObject {
    /// Wrap frames, collapsing a single frame into a static image.
    pub fn from_frames(mut frames: Vec<RgbaImage>, frame_delay_ms: u32) -> Option<Self> {
        match frames.len() {
            0 => None,
            1 => frames.pop().map(Self::Static),
            _ => Some(Self::Animated { frames, frame_delay_ms }),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated { .. })
    }

    /// The static image, or the first animation frame.
    ///
    /// # Panics
    ///
    /// Panics on an `Animated` value built by hand with no frames;
    /// [`GeneratedObject::from_frames`] never produces one.
    pub fn first_frame(&self) -> &RgbaImage {
        match self {
            Self::Static(image) => image,
            Self::Animated { frames, .. } => &frames[0],
        }
    }

    /// Every frame; a static image is a single frame.
    pub fn frames(&self) -> &[RgbaImage] {
        match self {
            Self::Static(image) => std::slice::from_ref(image),
            Self::Animated { frames, .. } => frames,
        }
    }

    pub fn frame_delay_ms(&self) -> u32 {
        match self {
            Self::Static(_) => 0,
            Self::Animated { frame_delay_ms, .. } => *frame_delay_ms,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.first_frame().dimensions()
    }

    /// Write a PNG for static images or a looping GIF for animations.
    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        match self {
            Self::Static(image) => save_png(image, path),
            Self::Animated { frames, frame_delay_ms } => render_gif(frames, *frame_delay_ms, true, path),
        }
    }
}

/// Shared read-only inputs for rendering
#[derive(Clone)]
pub struct Resources {
    pub sprites: Arc<dyn SpriteStore>,
    pub parser: Arc<PlaceholderParser>,
}

impl Resources {
    pub fn new(sprites: Arc<dyn SpriteStore>, parser: Arc<PlaceholderParser>) -> Self {
        Self { sprites, parser }
    }

    /// Built-in stat tables over the given sprites.
    pub fn with_sprites(sprites: Arc<dyn SpriteStore>) -> Self {
        Self::new(sprites, Arc::new(PlaceholderParser::default()))
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources").field("stats", &self.parser.stats().len()).finish_non_exhaustive()
    }
}

/// Something that renders an image from its configuration
pub trait Generator: CacheKeyFields + Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::error::GeneratorError::Generation`] when a required
    /// image cannot be produced.
    fn render(&self, resources: &Resources) -> GeneratorResult<GeneratedObject>;
}

/// Render through the cache.
///
/// Concurrent misses for the same key each render and the last store wins.
pub fn generate_cached<G: Generator + ?Sized>(
    generator: &G,
    cache: &GenerationCache,
    resources: &Resources,
) -> GeneratorResult<Arc<GeneratedObject>> {
    if !cache.is_enabled() {
        return generator.render(resources).map(Arc::new);
    }

    let key = derive_key(generator);
    if let Some(hit) = cache.get(&key) {
        return Ok(hit);
    }

    let artifact = Arc::new(generator.render(resources)?);
    cache.put(key, Arc::clone(&artifact));
    Ok(artifact)
}
