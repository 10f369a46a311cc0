//! Side-by-side composition of several generators

use super::{GeneratedObject, Generator, Resources, DEFAULT_FRAME_DELAY_MS};
use crate::cache::{derive_key, CacheKeyFields, FieldValue};
use crate::error::{GeneratorError, GeneratorResult};
use image::{imageops, RgbaImage};
use tracing::debug;

/// Gap between neighbouring images
pub const IMAGE_PADDING_PX: u32 = 25;
/// Transparent margin around the whole composition
pub const BORDER_PX: u32 = 15;

/// Lays the output of several generators out left to right
///
/// Images are centered vertically. When any input is animated the result
/// is animated too: it runs for the longest input, shorter inputs loop,
/// and static inputs repeat on every frame.
#[derive(Default)]
pub struct ImageComposer {
    generators: Vec<Box<dyn Generator>>,
}

impl ImageComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generator; it is drawn to the right of the previous ones.
    pub fn with(mut self, generator: impl Generator + 'static) -> Self {
        self.generators.push(Box::new(generator));
        self
    }

    /// Insert a generator at `position`, clamped to the end of the list.
    pub fn insert(&mut self, position: usize, generator: Box<dyn Generator>) {
        let position = position.min(self.generators.len());
        self.generators.insert(position, generator);
    }

    pub fn push(&mut self, generator: Box<dyn Generator>) {
        self.generators.push(generator);
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl std::fmt::Debug for ImageComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.generators.iter().map(|g| derive_key(g.as_ref())).collect();
        f.debug_struct("ImageComposer").field("generators", &keys).finish()
    }
}

/// Canvas size and the vertical offset of each input.
fn layout(objects: &[GeneratedObject]) -> (u32, u32, Vec<(u32, u32)>) {
    let max_height = objects.iter().map(|o| o.dimensions().1).max().unwrap_or(0);
    let mut x = BORDER_PX;
    let mut positions = Vec::with_capacity(objects.len());

    for (i, object) in objects.iter().enumerate() {
        let (width, height) = object.dimensions();
        positions.push((x, BORDER_PX + (max_height - height) / 2));
        x += width;
        if i + 1 < objects.len() {
            x += IMAGE_PADDING_PX;
        }
    }

    (x + BORDER_PX, max_height + 2 * BORDER_PX, positions)
}

fn compose_frame(objects: &[GeneratedObject], frame: usize) -> RgbaImage {
    let (width, height, positions) = layout(objects);
    let mut canvas = RgbaImage::new(width, height);

    for (object, (x, y)) in objects.iter().zip(positions) {
        let frames = object.frames();
        let image = &frames[frame % frames.len()];
        imageops::replace(&mut canvas, image, x as i64, y as i64);
    }

    canvas
}

impl CacheKeyFields for ImageComposer {
    fn config_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let keys: Vec<FieldValue> = self.generators.iter().map(|g| FieldValue::Text(derive_key(g.as_ref()))).collect();
        vec![("generators", FieldValue::List(keys))]
    }
}

impl Generator for ImageComposer {
    fn render(&self, resources: &Resources) -> GeneratorResult<GeneratedObject> {
        if self.generators.is_empty() {
            return Err(GeneratorError::generation("No generators provided"));
        }

        let mut objects = Vec::with_capacity(self.generators.len());
        for generator in &self.generators {
            let object = generator.render(resources)?;
            if object.frames().is_empty() {
                return Err(GeneratorError::generation("Generated image is null"));
            }
            objects.push(object);
        }

        if !objects.iter().any(GeneratedObject::is_animated) {
            return Ok(GeneratedObject::Static(compose_frame(&objects, 0)));
        }

        let frame_count = objects.iter().map(|o| o.frames().len()).max().unwrap_or(1);
        let delay = objects
            .iter()
            .map(GeneratedObject::frame_delay_ms)
            .find(|&d| d > 0)
            .unwrap_or(DEFAULT_FRAME_DELAY_MS);
        debug!(inputs = objects.len(), frame_count, delay, "Composing animation");

        let frames = (0..frame_count).map(|frame| compose_frame(&objects, frame)).collect();
        Ok(GeneratedObject::Animated { frames, frame_delay_ms: delay })
    }
}
