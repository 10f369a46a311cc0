//! Inventory grid generator
//!
//! Draws a chest-style panel of `rows x slots_per_row` slots and places the
//! items of an inventory string in them:
//!
//! ```text
//! scale       = item sprite size / 16, at least 1
//! slot        = 18 * scale
//! border      = 7 * scale, or 0 without a border
//! title_h     = border + 13 * scale with a title, 3 * scale less when
//!               the border is drawn too
//! width       = slots_per_row * slot + 2 * border
//! height      = rows * slot + title_h + border
//! ```
//!
//! The item sprite size is taken from the `stone` sprite so that packs with
//! larger textures get a proportionally larger grid.

use super::{GeneratedObject, Generator, ItemGenerator, Resources, DEFAULT_FRAME_DELAY_MS};
use crate::cache::{CacheKeyFields, FieldValue};
use crate::canvas::{blit, fill_rect};
use crate::effect::overlay::trim_overlay_name;
use crate::error::{GeneratorError, GeneratorResult};
use crate::font::{self, GlyphStyle, GLYPH_HEIGHT};
use crate::format::strip_color_codes;
use crate::inventory::{InventoryItem, InventoryParser};
use crate::sprites::SpriteStore;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::debug;

pub const MAX_GRID_SIDE: u32 = 32;
/// Sprite that sets the item size of the grid
pub const REFERENCE_SPRITE: &str = "stone";
const BASE_ITEM_SIZE: u32 = 16;
const EMPTY_MATERIALS: [&str; 2] = ["null", "air"];

const PANEL: Rgba<u8> = Rgba([198, 198, 198, 255]);
const PANEL_SHADOW: Rgba<u8> = Rgba([85, 85, 85, 255]);
const SLOT_FILL: Rgba<u8> = Rgba([139, 139, 139, 255]);
const SLOT_SHADOW: Rgba<u8> = Rgba([55, 55, 55, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TITLE_COLOR: Rgba<u8> = Rgba([63, 63, 63, 255]);

/// Pixel metrics derived from the item size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grid {
    scale: u32,
    slot: u32,
    border: u32,
    title_height: u32,
}

impl Grid {
    fn new(item_size: u32, draw_border: bool, has_title: bool) -> Self {
        let scale = (item_size / BASE_ITEM_SIZE).max(1);
        let border = if draw_border { 7 * scale } else { 0 };
        let mut title_height = border;
        if has_title {
            title_height += 13 * scale;
            if draw_border {
                title_height -= 3 * scale;
            }
        }
        Self { scale, slot: 18 * scale, border, title_height }
    }

    /// Top-left corner of a 1-indexed slot.
    fn slot_origin(&self, slot: u32, slots_per_row: u32) -> (i64, i64) {
        let index = slot.saturating_sub(1);
        let (col, row) = (index % slots_per_row, index / slots_per_row);
        ((self.border + col * self.slot) as i64, (self.title_height + row * self.slot) as i64)
    }
}

/// Renders an inventory grid with items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryGenerator {
    rows: u32,
    slots_per_row: u32,
    title: Option<String>,
    items: Vec<InventoryItem>,
    draw_border: bool,
    draw_background: bool,
    animate_glint: bool,
}

/// Builder for [`InventoryGenerator`]
#[derive(Debug, Clone)]
pub struct InventoryGeneratorBuilder {
    rows: i64,
    slots_per_row: i64,
    title: Option<String>,
    inventory: String,
    draw_border: bool,
    draw_background: bool,
    animate_glint: bool,
}

impl Default for InventoryGeneratorBuilder {
    fn default() -> Self {
        Self {
            rows: 3,
            slots_per_row: 9,
            title: None,
            inventory: String::new(),
            draw_border: true,
            draw_background: true,
            animate_glint: false,
        }
    }
}

impl InventoryGeneratorBuilder {
    pub fn rows(mut self, rows: i64) -> Self {
        self.rows = rows;
        self
    }

    pub fn slots_per_row(mut self, slots_per_row: i64) -> Self {
        self.slots_per_row = slots_per_row;
        self
    }

    /// Title drawn above the slots; legacy codes are ignored.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.trim().is_empty()).then_some(title);
        self
    }

    /// Inventory string, see [`crate::inventory`].
    pub fn inventory(mut self, inventory: impl Into<String>) -> Self {
        self.inventory = inventory.into();
        self
    }

    pub fn draw_border(mut self, enabled: bool) -> Self {
        self.draw_border = enabled;
        self
    }

    pub fn draw_background(mut self, enabled: bool) -> Self {
        self.draw_background = enabled;
        self
    }

    /// Animate enchanted items instead of drawing their first frame.
    pub fn animate_glint(mut self, enabled: bool) -> Self {
        self.animate_glint = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns [`GeneratorError::Validation`] when either grid side is
    /// outside `1..=32` or the inventory string cannot be parsed.
    pub fn build(self) -> GeneratorResult<InventoryGenerator> {
        let side = |name: &str, value: i64| {
            if (1..=MAX_GRID_SIDE as i64).contains(&value) {
                Ok(value as u32)
            } else {
                Err(GeneratorError::validation(format!("{name} must be between 1 and {MAX_GRID_SIDE}, got {value}")))
            }
        };
        let rows = side("rows", self.rows)?;
        let slots_per_row = side("slots per row", self.slots_per_row)?;
        let items = InventoryParser::new(rows * slots_per_row).parse(&self.inventory)?;

        Ok(InventoryGenerator {
            rows,
            slots_per_row,
            title: self.title,
            items,
            draw_border: self.draw_border,
            draw_background: self.draw_background,
            animate_glint: self.animate_glint,
        })
    }
}

/// Which item, and how many of it, ends up in each slot.
///
/// Later items win a contested slot; slots outside the grid are dropped.
pub fn resolve_slot_conflicts(items: &[InventoryItem], total_slots: u32) -> Vec<Option<(usize, u32)>> {
    let mut slots = vec![None; total_slots as usize];
    for (index, item) in items.iter().enumerate() {
        for (slot, amount) in item.placements() {
            if (1..=total_slots).contains(&slot) {
                slots[(slot - 1) as usize] = Some((index, amount));
            }
        }
    }
    slots
}

impl InventoryGenerator {
    pub fn builder() -> InventoryGeneratorBuilder {
        InventoryGeneratorBuilder::default()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn total_slots(&self) -> u32 {
        self.rows * self.slots_per_row
    }

    fn grid(&self, sprites: &dyn SpriteStore) -> Grid {
        let item_size = sprites.sprite(REFERENCE_SPRITE).map_or(BASE_ITEM_SIZE, |s| s.width());
        Grid::new(item_size, self.draw_border, self.title.is_some())
    }

    /// Canvas size for the given sprites.
    pub fn dimensions(&self, sprites: &dyn SpriteStore) -> (u32, u32) {
        let grid = self.grid(sprites);
        (self.slots_per_row * grid.slot + 2 * grid.border, self.rows * grid.slot + grid.title_height + grid.border)
    }

    fn render_items(&self, resources: &Resources) -> GeneratorResult<Vec<Option<GeneratedObject>>> {
        self.items
            .par_iter()
            .map(|item| {
                if EMPTY_MATERIALS.contains(&item.material.to_lowercase().as_str()) {
                    return Ok(None);
                }
                item_generator(item, resources.sprites.as_ref())?.render(resources).map(Some)
            })
            .collect()
    }

    fn draw_panel(&self, canvas: &mut RgbaImage, grid: Grid) {
        let (width, height) = canvas.dimensions();
        if self.draw_background {
            fill_rect(canvas, 0, 0, width, height, PANEL);
        }
        if !self.draw_border {
            return;
        }

        let s = grid.scale as i64;
        let (w, h) = (width as i64, height as i64);
        let span = |len: i64| len.max(0) as u32;
        // black outline with clipped corners
        fill_rect(canvas, 2 * s, 0, span(w - 4 * s), grid.scale, BLACK);
        fill_rect(canvas, 2 * s, h - s, span(w - 4 * s), grid.scale, BLACK);
        fill_rect(canvas, 0, 2 * s, grid.scale, span(h - 4 * s), BLACK);
        fill_rect(canvas, w - s, 2 * s, grid.scale, span(h - 4 * s), BLACK);
        for (x, y) in [(s, s), (w - 2 * s, s), (s, h - 2 * s), (w - 2 * s, h - 2 * s)] {
            fill_rect(canvas, x, y, grid.scale, grid.scale, BLACK);
        }
        // raised bevel
        fill_rect(canvas, 2 * s, s, span(w - 5 * s), 2 * grid.scale, WHITE);
        fill_rect(canvas, s, 2 * s, 2 * grid.scale, span(h - 5 * s), WHITE);
        fill_rect(canvas, 3 * s, h - 3 * s, span(w - 5 * s), 2 * grid.scale, PANEL_SHADOW);
        fill_rect(canvas, w - 3 * s, 3 * s, 2 * grid.scale, span(h - 5 * s), PANEL_SHADOW);
        if !self.draw_background {
            return;
        }
        fill_rect(canvas, 3 * s, 3 * s, span(w - 6 * s), span(h - 6 * s), PANEL);
    }

    fn draw_slot(canvas: &mut RgbaImage, grid: Grid, x: i64, y: i64) {
        let s = grid.scale as i64;
        let inner = grid.slot - 2 * grid.scale;
        fill_rect(canvas, x, y, grid.slot - grid.scale, grid.scale, SLOT_SHADOW);
        fill_rect(canvas, x, y, grid.scale, grid.slot - grid.scale, SLOT_SHADOW);
        fill_rect(canvas, x + s, y + grid.slot as i64 - s, grid.slot - grid.scale, grid.scale, WHITE);
        fill_rect(canvas, x + grid.slot as i64 - s, y + s, grid.scale, grid.slot - grid.scale, WHITE);
        fill_rect(canvas, x + s, y + s, inner, inner, SLOT_FILL);
    }

    fn draw_title(&self, canvas: &mut RgbaImage, grid: Grid) {
        let Some(title) = &self.title else {
            return;
        };
        let unit = grid.scale;
        let style = GlyphStyle { color: TITLE_COLOR, unit, bold: false, italic: false };
        let mut x = (grid.border + unit) as i64;
        let y = grid.title_height.saturating_sub(11 * unit) as i64;
        for c in strip_color_codes(title).chars() {
            font::draw_glyph(canvas, c, x, y, style);
            x += (font::advance(c, false) * unit) as i64;
        }
    }

    /// Stack size in the bottom-right corner of a slot, with a shadow.
    fn draw_amount(canvas: &mut RgbaImage, grid: Grid, x: i64, y: i64, amount: u32) {
        let text = amount.to_string();
        let s = grid.scale as i64;
        let width = (font::text_width(&text, false) * grid.scale) as i64;
        let right = x + grid.slot as i64 - s;
        let top = y + grid.slot as i64 - (GLYPH_HEIGHT as i64 + 1) * s;

        for (offset, color) in [(s, TITLE_COLOR), (0, WHITE)] {
            let style = GlyphStyle { color, unit: grid.scale, bold: false, italic: false };
            let mut glyph_x = right - width + offset;
            for c in text.chars() {
                font::draw_glyph(canvas, c, glyph_x, top + offset, style);
                glyph_x += (font::advance(c, false) * grid.scale) as i64;
            }
        }
    }

    fn render_frame(
        &self,
        frame: usize,
        grid: Grid,
        size: (u32, u32),
        slots: &[Option<(usize, u32)>],
        rendered: &[Option<GeneratedObject>],
    ) -> RgbaImage {
        let mut canvas = RgbaImage::new(size.0, size.1);
        self.draw_panel(&mut canvas, grid);
        self.draw_title(&mut canvas, grid);

        for (index, contents) in slots.iter().enumerate() {
            let (x, y) = grid.slot_origin(index as u32 + 1, self.slots_per_row);
            if self.draw_background {
                Self::draw_slot(&mut canvas, grid, x, y);
            }
            let Some((item, amount)) = contents else {
                continue;
            };
            if let Some(object) = &rendered[*item] {
                let frames = object.frames();
                let image = if self.animate_glint { &frames[frame % frames.len()] } else { &frames[0] };
                let offset_x = (grid.slot as i64 - image.width() as i64) / 2;
                let offset_y = (grid.slot as i64 - image.height() as i64) / 2;
                blit(&mut canvas, image, x + offset_x, y + offset_y);
            }
            if *amount > 1 {
                Self::draw_amount(&mut canvas, grid, x, y, *amount);
            }
        }
        canvas
    }
}

/// Item generator for one entry, reading its modifiers.
///
/// `enchant` and `hover` switch effects on, a trim material names the
/// armor trim, a color option of the item's overlay or a `#` hex color
/// sets the color, and everything else is passed on as data.
fn item_generator(item: &InventoryItem, sprites: &dyn SpriteStore) -> GeneratorResult<ItemGenerator> {
    let id = item.material.to_lowercase().replace("minecraft:", "");
    let trim_options =
        trim_overlay_name(&id).and_then(|name| sprites.overlay(name)).and_then(|o| o.color_options.clone());
    let color_options = sprites.overlay_for_item(&id).and_then(|o| o.color_options.clone());

    let mut builder = ItemGenerator::builder().item_id(id.as_str());
    let mut data = Vec::new();
    let mut trimmed = false;
    let mut colored = false;
    for token in item.modifiers() {
        match token.as_str() {
            "enchant" | "enchanted" => builder = builder.enchanted(true),
            "hover" | "hovered" => builder = builder.hovered(true),
            t if !trimmed && trim_options.as_ref().is_some_and(|o| o.has_option(t)) => {
                builder = builder.armor_trim(t);
                trimmed = true;
            }
            t if !colored && (t.starts_with('#') || color_options.as_ref().is_some_and(|o| o.has_option(t))) => {
                builder = builder.color(t);
                colored = true;
            }
            t => data.push(t.to_string()),
        }
    }
    if !data.is_empty() {
        builder = builder.data(data.join(","));
    }
    if let Some(durability) = item.durability {
        builder = builder.durability(durability.into());
    }
    builder.build()
}

impl CacheKeyFields for InventoryGenerator {
    fn config_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let items = self
            .items
            .iter()
            .map(|item| {
                let slots: Vec<String> = item.placements().map(|(slot, amount)| format!("{slot}x{amount}")).collect();
                FieldValue::Text(format!(
                    "{}|{}|{}|{}",
                    item.material,
                    item.data.as_deref().unwrap_or(""),
                    item.durability.map(|d| d.to_string()).unwrap_or_default(),
                    slots.join(",")
                ))
            })
            .collect();
        vec![
            ("rows", self.rows.into()),
            ("slots_per_row", self.slots_per_row.into()),
            ("title", self.title.clone().into()),
            ("items", FieldValue::List(items)),
            ("draw_border", self.draw_border.into()),
            ("draw_background", self.draw_background.into()),
            ("animate_glint", self.animate_glint.into()),
        ]
    }
}

impl Generator for InventoryGenerator {
    fn render(&self, resources: &Resources) -> GeneratorResult<GeneratedObject> {
        let grid = self.grid(resources.sprites.as_ref());
        let size = self.dimensions(resources.sprites.as_ref());
        let slots = resolve_slot_conflicts(&self.items, self.total_slots());
        let rendered = self.render_items(resources)?;
        debug!("Rendering {}x{} inventory with {} items", size.0, size.1, self.items.len());

        let animated: Vec<&GeneratedObject> = rendered.iter().flatten().filter(|o| o.is_animated()).collect();
        let frame_count =
            if self.animate_glint { animated.iter().map(|o| o.frames().len()).max().unwrap_or(1) } else { 1 };
        let delay = animated.iter().map(|o| o.frame_delay_ms()).find(|d| *d > 0).unwrap_or(DEFAULT_FRAME_DELAY_MS);

        let frames = (0..frame_count).map(|frame| self.render_frame(frame, grid, size, &slots, &rendered)).collect();
        GeneratedObject::from_frames(frames, delay)
            .ok_or_else(|| GeneratorError::generation("Inventory rendered no frames"))
    }
}
