//! Item tooltip generator

use super::{GeneratedObject, Generator, Resources};
use crate::cache::{CacheKeyFields, FieldValue};
use crate::config::{MAX_LINE_LENGTH_LIMIT, MAX_SCALE};
use crate::error::{GeneratorError, GeneratorResult};
use crate::text::{extract_footer, wrap, LineSegment, Rarity};
use crate::tooltip::{Tooltip, DEFAULT_ALPHA};
use tracing::debug;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 36;

/// Renders an item name, lore and rarity footer as a tooltip
///
/// When no rarity is set, a footer found at the end of the lore (such as
/// `&5&lEPIC SWORD`) supplies it and is removed from the lore so it is not
/// drawn twice.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipGenerator {
    name: String,
    rarity: Option<Rarity>,
    lore: String,
    item_type: Option<String>,
    alpha: u8,
    padding: u32,
    padding_first_line: bool,
    max_line_length: usize,
    centered: bool,
    scale: u32,
    render_border: bool,
}

/// Builder for [`TooltipGenerator`]
#[derive(Debug, Clone)]
pub struct TooltipGeneratorBuilder {
    name: String,
    rarity: Option<Rarity>,
    lore: String,
    item_type: Option<String>,
    alpha: i64,
    padding: i64,
    padding_first_line: bool,
    max_line_length: usize,
    centered: bool,
    scale: u32,
    render_border: bool,
}

impl Default for TooltipGeneratorBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            rarity: None,
            lore: String::new(),
            item_type: None,
            alpha: DEFAULT_ALPHA as i64,
            padding: 0,
            padding_first_line: true,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            centered: false,
            scale: 1,
            render_border: true,
        }
    }
}

impl TooltipGeneratorBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    /// Lore markup; lines are separated by `\n` or a literal `\\n`.
    pub fn lore(mut self, lore: impl Into<String>) -> Self {
        self.lore = lore.into();
        self
    }

    /// Text after the rarity in the footer, such as `SWORD`.
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    pub fn alpha(mut self, alpha: i64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn padding(mut self, padding: i64) -> Self {
        self.padding = padding;
        self
    }

    pub fn padding_first_line(mut self, enabled: bool) -> Self {
        self.padding_first_line = enabled;
        self
    }

    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn render_border(mut self, enabled: bool) -> Self {
        self.render_border = enabled;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Alpha, padding and scale are fitted into range the same way
    /// [`crate::tooltip::TooltipBuilder`] fits them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Validation`] when the max line length is
    /// outside `1..=128`.
    pub fn build(self) -> GeneratorResult<TooltipGenerator> {
        if !(1..=MAX_LINE_LENGTH_LIMIT).contains(&self.max_line_length) {
            return Err(GeneratorError::validation(format!(
                "max line length must be between 1 and {MAX_LINE_LENGTH_LIMIT}, got {}",
                self.max_line_length
            )));
        }

        Ok(TooltipGenerator {
            name: self.name,
            rarity: self.rarity,
            lore: self.lore,
            item_type: self.item_type.filter(|t| !t.trim().is_empty()),
            alpha: self.alpha.clamp(0, 255) as u8,
            padding: self.padding.clamp(0, u32::MAX as i64) as u32,
            padding_first_line: self.padding_first_line,
            max_line_length: self.max_line_length,
            centered: self.centered,
            scale: self.scale.clamp(1, MAX_SCALE),
            render_border: self.render_border,
        })
    }
}

impl TooltipGenerator {
    pub fn builder() -> TooltipGeneratorBuilder {
        TooltipGeneratorBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rarity(&self) -> Option<Rarity> {
        self.rarity
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Expand placeholders and lay the text out as tooltip lines.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Generation`] when there is nothing visible
    /// to draw.
    pub fn build_lines(&self, resources: &Resources) -> GeneratorResult<Vec<LineSegment>> {
        let parsed_lore = resources.parser.parse(&self.lore);
        let extracted = extract_footer(&parsed_lore);
        let rarity = self.rarity.or(extracted.rarity).unwrap_or(Rarity::None);
        let item_type = self.item_type.clone().or(extracted.item_type);

        let mut lines = Vec::new();

        if !self.name.trim().is_empty() {
            let mut name = resources.parser.parse(&self.name);
            if rarity != Rarity::None {
                name.insert_str(0, &rarity.color_code());
            }
            lines.push(LineSegment::parse_legacy(&name));
        }

        if !extracted.lore.trim().is_empty() {
            lines.extend(wrap(&extracted.lore, self.max_line_length));
        }

        if let Some(footer) = rarity.footer(item_type.as_deref()) {
            lines.push(LineSegment::parse_legacy(&footer));
        }

        if lines.iter().all(|line| line.plain_text().trim().is_empty()) {
            return Err(GeneratorError::generation("You cannot generate an empty tooltip!"));
        }

        debug!(lines = lines.len(), rarity = rarity.display(), "Built tooltip lines");
        Ok(lines)
    }

    /// The assembled, not yet rendered, tooltip.
    pub fn tooltip(&self, resources: &Resources) -> GeneratorResult<Tooltip> {
        let lines = self.build_lines(resources)?;
        let has_name = !self.name.trim().is_empty();

        Ok(Tooltip::builder()
            .lines(lines)
            .alpha(self.alpha as i64)
            .padding(self.padding as i64)
            .padding_first_line(self.padding_first_line && has_name)
            .render_border(self.render_border)
            .centered(self.centered)
            .scale(self.scale)
            .build())
    }
}

impl CacheKeyFields for TooltipGenerator {
    fn config_fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", self.name.as_str().into()),
            ("rarity", self.rarity.map_or(FieldValue::Null, |r| FieldValue::Enum(r.display()))),
            ("lore", self.lore.as_str().into()),
            ("item_type", self.item_type.clone().into()),
            ("alpha", (self.alpha as u32).into()),
            ("padding", self.padding.into()),
            ("padding_first_line", self.padding_first_line.into()),
            ("max_line_length", self.max_line_length.into()),
            ("centered", self.centered.into()),
            ("scale", self.scale.into()),
            ("render_border", self.render_border.into()),
        ]
    }
}

impl Generator for TooltipGenerator {
    fn render(&self, resources: &Resources) -> GeneratorResult<GeneratedObject> {
        self.tooltip(resources)?.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::derive_key;
    use crate::format::ChatColor;
    use crate::sprites::SpriteSheet;
    use std::sync::Arc;

    fn resources() -> Resources {
        Resources::with_sprites(Arc::new(SpriteSheet::in_memory()))
    }

    #[test]
    fn test_build_rejects_line_length_out_of_range() {
        for bad in [0, 129] {
            let err = TooltipGenerator::builder().name("x").max_line_length(bad).build().unwrap_err();
            assert!(matches!(err, GeneratorError::Validation(_)), "{bad}: {err}");
        }
        assert!(TooltipGenerator::builder().max_line_length(128).build().is_ok());
    }

    #[test]
    fn test_build_fits_numeric_fields() {
        let generator = TooltipGenerator::builder().alpha(999).padding(-4).scale(0).build().unwrap();
        assert_eq!(generator.alpha, 255);
        assert_eq!(generator.padding, 0);
        assert_eq!(generator.scale, 1);
    }

    #[test]
    fn test_name_footer_and_lore_lines() {
        let generator = TooltipGenerator::builder()
            .name("Aspect of the End")
            .rarity(Rarity::Rare)
            .item_type("SWORD")
            .lore("&7Damage: &c+100")
            .build()
            .unwrap();

        let lines = generator.build_lines(&resources()).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].segments[0].color, Some(ChatColor::Blue));
        assert_eq!(lines[0].plain_text(), "Aspect of the End");
        assert_eq!(lines[1].plain_text(), "Damage: +100");
        assert_eq!(lines[2].plain_text(), "RARE SWORD");
        assert!(lines[2].segments[0].bold);
    }

    #[test]
    fn test_footer_in_lore_supplies_rarity() {
        let generator = TooltipGenerator::builder()
            .name("Hyperion")
            .lore("&7Ability\\n\\n&6&lLEGENDARY SWORD")
            .build()
            .unwrap();

        let lines = generator.build_lines(&resources()).unwrap();
        let texts: Vec<String> = lines.iter().map(LineSegment::plain_text).collect();
        assert_eq!(texts.last().map(String::as_str), Some("LEGENDARY SWORD"));
        assert_eq!(texts.iter().filter(|t| t.contains("LEGENDARY")).count(), 1);
        assert_eq!(lines[0].segments[0].color, Some(ChatColor::Gold));
    }

    #[test]
    fn test_lore_wraps_at_max_line_length() {
        let generator = TooltipGenerator::builder()
            .lore("one two three four five six")
            .max_line_length(9)
            .build()
            .unwrap();

        let lines = generator.build_lines(&resources()).unwrap();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.plain_text().trim_end().chars().count() <= 9));
    }

    #[test]
    fn test_empty_tooltip_is_generation_error() {
        let generator = TooltipGenerator::builder().build().unwrap();
        let err = generator.render(&resources()).unwrap_err();
        assert!(matches!(err, GeneratorError::Generation(_)));
    }

    #[test]
    fn test_render_produces_panel() {
        let generator = TooltipGenerator::builder().name("Stick").rarity(Rarity::Common).build().unwrap();
        let image = generator.render(&resources()).unwrap();
        assert!(!image.is_animated());
        let (w, h) = image.dimensions();
        assert!(w > 20 && h > 20);
    }

    #[test]
    fn test_cache_key_tracks_configuration() {
        let base = TooltipGenerator::builder().name("Stick").rarity(Rarity::Epic).build().unwrap();
        let same = TooltipGenerator::builder().name("Stick").rarity(Rarity::Epic).build().unwrap();
        let other = TooltipGenerator::builder().name("Stick").rarity(Rarity::Rare).build().unwrap();

        assert_eq!(derive_key(&base), derive_key(&same));
        assert_ne!(derive_key(&base), derive_key(&other));
        assert!(derive_key(&base).contains("TooltipGenerator|"));
    }
}
