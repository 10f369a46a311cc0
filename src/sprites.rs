//! Sprite and overlay lookup
//!
//! Renderers only read sprites through [`SpriteStore`]. The bundled
//! implementation, [`SpriteSheet`], slices packed sheets using JSON
//! coordinate indexes from a resource directory:
//!
//! ```text
//! <root>/spritesheets/items.png
//! <root>/spritesheets/overlays.png
//! <root>/json/item_coordinates.json      [{name, x, y, size}]
//! <root>/json/overlay_coordinates.json   [{name, x, y, size?, type, colorMode?, colorOptions?}]
//! <root>/json/overlay_colors.json        [OverlayColorOptions]
//! <root>/json/item_overlay_binding.json  [{name, overlays}]
//! <root>/textures/glint.png              optional
//! ```
//!
//! A store is immutable once loaded and is shared between render threads
//! behind an `Arc`.

use crate::error::{GeneratorError, GeneratorResult};
use crate::overlay::{ColorMode, ItemOverlay, OverlayColorOptions, OverlayRenderer};
use image::imageops;
use image::{Rgba, RgbaImage};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Overlay tiles without an explicit size
const DEFAULT_OVERLAY_SIZE: u32 = 128;
const PROCEDURAL_GLINT_SIZE: u32 = 64;

/// Read-only access to item sprites, overlays and the glint texture
///
/// Lookups are case-insensitive.
pub trait SpriteStore: Send + Sync {
    fn sprite(&self, name: &str) -> Option<&RgbaImage>;

    /// Overlay bound to an item id, if any.
    fn overlay_for_item(&self, item_id: &str) -> Option<&ItemOverlay>;

    /// Overlay by its own name, such as `helmet_trim`.
    fn overlay(&self, name: &str) -> Option<&ItemOverlay>;

    fn glint_texture(&self) -> &RgbaImage;
}

#[derive(Debug, Deserialize)]
struct SpriteCoordinate {
    name: String,
    x: u32,
    y: u32,
    size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverlayCoordinate {
    name: String,
    x: u32,
    y: u32,
    #[serde(default)]
    size: u32,
    #[serde(rename = "type")]
    renderer: OverlayRenderer,
    #[serde(default)]
    color_mode: Option<ColorMode>,
    #[serde(default)]
    color_options: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverlayBinding {
    name: String,
    overlays: String,
}

/// Sprites sliced from packed sheets
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    sprites: HashMap<String, RgbaImage>,
    overlays: HashMap<String, ItemOverlay>,
    bindings: HashMap<String, String>,
    glint: RgbaImage,
}

impl SpriteSheet {
    /// Empty store with the procedural glint texture.
    pub fn in_memory() -> Self {
        Self {
            sprites: HashMap::new(),
            overlays: HashMap::new(),
            bindings: HashMap::new(),
            glint: procedural_glint(PROCEDURAL_GLINT_SIZE),
        }
    }

    pub fn with_sprite(mut self, name: &str, image: RgbaImage) -> Self {
        self.sprites.insert(name.to_lowercase(), image);
        self
    }

    pub fn with_overlay(mut self, overlay: ItemOverlay) -> Self {
        self.overlays.insert(overlay.name.to_lowercase(), overlay);
        self
    }

    /// Bind `item_id` to a previously added overlay.
    pub fn bind(mut self, item_id: &str, overlay_name: &str) -> Self {
        self.bindings.insert(item_id.to_lowercase(), overlay_name.to_lowercase());
        self
    }

    pub fn with_glint(mut self, texture: RgbaImage) -> Self {
        self.glint = texture;
        self
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Load every sheet and index under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Resource`] when a required file is
    /// missing, malformed, or a coordinate falls outside its sheet.
    pub fn load(root: &Path) -> GeneratorResult<Self> {
        debug!("Loading sprite resources from {}", root.display());

        let items_sheet = read_image(&root.join("spritesheets/items.png"))?;
        let coordinates_path = root.join("json/item_coordinates.json");
        let coordinates: Vec<SpriteCoordinate> = read_json(&coordinates_path)?;
        let mut sprites = HashMap::with_capacity(coordinates.len());
        for c in coordinates {
            let image = slice(&items_sheet, &coordinates_path, &c.name, c.x, c.y, c.size)?;
            sprites.insert(c.name.to_lowercase(), image);
        }
        info!("Loaded {} item sprites", sprites.len());

        let color_options: Vec<OverlayColorOptions> = read_json(&root.join("json/overlay_colors.json"))?;
        let color_options: HashMap<String, Arc<OverlayColorOptions>> =
            color_options.into_iter().map(|o| (o.name.clone(), Arc::new(o))).collect();
        debug!("Loaded {} color option sets", color_options.len());

        let overlay_sheet = read_image(&root.join("spritesheets/overlays.png"))?;
        let overlay_path = root.join("json/overlay_coordinates.json");
        let overlay_coordinates: Vec<OverlayCoordinate> = read_json(&overlay_path)?;
        let mut overlays = HashMap::new();
        for c in overlay_coordinates {
            if c.name.contains("enchant") {
                continue;
            }
            let size = if c.size > 0 { c.size } else { DEFAULT_OVERLAY_SIZE };
            let image = slice(&overlay_sheet, &overlay_path, &c.name, c.x, c.y, size)?;
            let mut overlay =
                ItemOverlay::new(c.name.clone(), image, c.renderer).with_color_mode(c.color_mode.unwrap_or_default());
            match c.color_options.as_deref().map(|name| (name, color_options.get(name))) {
                Some((_, Some(options))) => overlay = overlay.with_color_options(Arc::clone(options)),
                Some((name, None)) => warn!("Overlay '{}' references unknown color options '{}'", c.name, name),
                None => {}
            }
            overlays.insert(c.name.to_lowercase(), overlay);
        }
        debug!("Loaded {} overlay definitions", overlays.len());

        let binding_list: Vec<OverlayBinding> = read_json(&root.join("json/item_overlay_binding.json"))?;
        let bindings: HashMap<String, String> = binding_list
            .into_iter()
            .map(|b| (b.name.to_lowercase(), b.overlays.to_lowercase()))
            .filter(|(_, overlay)| overlays.contains_key(overlay))
            .collect();
        info!("Loaded {} item overlays", bindings.len());

        let glint_path = root.join("textures/glint.png");
        let glint = if glint_path.exists() {
            read_image(&glint_path)?
        } else {
            debug!("No glint texture at {}, using procedural texture", glint_path.display());
            procedural_glint(PROCEDURAL_GLINT_SIZE)
        };

        Ok(Self { sprites, overlays, bindings, glint })
    }
}

impl SpriteStore for SpriteSheet {
    fn sprite(&self, name: &str) -> Option<&RgbaImage> {
        self.sprites.get(&name.to_lowercase())
    }

    fn overlay_for_item(&self, item_id: &str) -> Option<&ItemOverlay> {
        let overlay = self.bindings.get(&item_id.to_lowercase())?;
        self.overlays.get(overlay)
    }

    fn overlay(&self, name: &str) -> Option<&ItemOverlay> {
        self.overlays.get(&name.to_lowercase())
    }

    fn glint_texture(&self) -> &RgbaImage {
        &self.glint
    }
}

fn read_image(path: &Path) -> GeneratorResult<RgbaImage> {
    let image = image::open(path).map_err(|e| GeneratorError::resource(path, e.to_string()))?;
    Ok(image.to_rgba8())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> GeneratorResult<T> {
    let contents = fs::read_to_string(path).map_err(|e| GeneratorError::resource(path, e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| GeneratorError::resource(path, e.to_string()))
}

fn slice(sheet: &RgbaImage, index: &Path, name: &str, x: u32, y: u32, size: u32) -> GeneratorResult<RgbaImage> {
    let fits = x.checked_add(size).is_some_and(|r| r <= sheet.width())
        && y.checked_add(size).is_some_and(|b| b <= sheet.height());
    if !fits || size == 0 {
        return Err(GeneratorError::resource(
            index,
            format!("'{name}' at ({x}, {y}) size {size} is outside the {}x{} sheet", sheet.width(), sheet.height()),
        ));
    }
    Ok(imageops::crop_imm(sheet, x, y, size, size).to_image())
}

/// Diagonal streak texture used when no glint image ships with the
/// resources.
pub fn procedural_glint(size: u32) -> RgbaImage {
    let size = size.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        let phase = (x + 2 * y) as f32 / size as f32 * std::f32::consts::TAU;
        let streak = (phase.sin() * 0.5 + 0.5).powi(3);
        let value = (streak * 255.0) as u8;
        Rgba([value, value, value, value])
    })
}
