//! Importing items from NBT dumps
//!
//! Accepts the JSON form of an item stack in either layout Minecraft has
//! used:
//!
//! - legacy, with `tag.display.Name` and `tag.display.Lore` holding
//!   `§`-coded strings;
//! - components (1.20.5+), with `minecraft:custom_name` and
//!   `minecraft:lore` holding text components.
//!
//! The name and lore are turned back into placeholder markup so that the
//! import can be edited and re-rendered like any other tooltip.

use super::tooltip::DEFAULT_MAX_LINE_LENGTH;
use super::{ImageComposer, ItemGenerator, TooltipGenerator};
use crate::config::MAX_LINE_LENGTH_LIMIT;
use crate::error::{GeneratorError, GeneratorResult};
use crate::format::{visible_len, ChatColor, FormatCode, AMPERSAND, SECTION};
use crate::text::PlaceholderReverseMapper;
use serde_json::Value;
use tracing::debug;

const NAMESPACE: &str = "minecraft:";
pub const PLAYER_HEAD: &str = "player_head";
/// Pre-flattening id of every mob and player head
const LEGACY_SKULL: &str = "skull";

/// Which NBT layout an item was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtFormat {
    Legacy,
    Components,
}

impl NbtFormat {
    /// Components when the item has a `components` object, legacy otherwise.
    pub fn detect(root: &Value) -> Self {
        if root.get("components").is_some_and(Value::is_object) {
            Self::Components
        } else {
            Self::Legacy
        }
    }

    fn handler(self) -> &'static dyn NbtFormatHandler {
        match self {
            Self::Legacy => &LegacyFormat,
            Self::Components => &ComponentsFormat,
        }
    }
}

/// Facts about the item that are not part of its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbtMetadata {
    /// Base64 skin texture of a player head
    pub skin_texture: Option<String>,
    pub max_line_length: usize,
    pub enchanted: bool,
}

/// An imported item, ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbtImport {
    pub format: NbtFormat,
    pub item_id: String,
    /// Name markup with placeholders restored
    pub name: String,
    /// Lore markup, one line per entry, with placeholders restored
    pub lore: String,
    /// `#RRGGBB` dye color of leather armor and similar items
    pub dye_color: Option<String>,
    pub metadata: NbtMetadata,
}

impl NbtImport {
    /// Large item sprite, dyed and enchanted like the source item.
    ///
    /// # Errors
    ///
    /// See [`crate::generator::ItemGeneratorBuilder::build`].
    pub fn item_generator(&self) -> GeneratorResult<ItemGenerator> {
        let mut builder =
            ItemGenerator::builder().item_id(self.item_id.as_str()).big_image(true).enchanted(self.metadata.enchanted);
        if let Some(color) = &self.dye_color {
            builder = builder.data(color.as_str());
        }
        builder.build()
    }

    /// Tooltip with a border and a gap under the name.
    ///
    /// # Errors
    ///
    /// See [`crate::generator::TooltipGeneratorBuilder::build`].
    pub fn tooltip_generator(&self) -> GeneratorResult<TooltipGenerator> {
        TooltipGenerator::builder()
            .name(self.name.as_str())
            .lore(self.lore.as_str())
            .render_border(true)
            .padding_first_line(true)
            .max_line_length(self.metadata.max_line_length)
            .build()
    }

    /// The item sprite to the left of its tooltip.
    ///
    /// # Errors
    ///
    /// Returns the first error of either generator.
    pub fn composer(&self) -> GeneratorResult<ImageComposer> {
        Ok(ImageComposer::new().with(self.item_generator()?).with(self.tooltip_generator()?))
    }
}

/// Read a JSON item dump.
///
/// # Errors
///
/// Returns [`GeneratorError::Validation`] for invalid JSON, a missing item
/// id, or a legacy player head carrying more than one skin texture.
///
/// # Examples
///
/// ```
/// use tooltipgen::generator::parse_nbt;
/// use tooltipgen::text::{PlaceholderParser, PlaceholderReverseMapper};
///
/// let mapper = PlaceholderReverseMapper::for_parser(&PlaceholderParser::default()).unwrap();
/// let json = r#"{"id": "minecraft:iron_sword", "tag": {"display": {
///     "Name": "§fIron Sword", "Lore": ["§c+5 ❁ Strength§r"]}}}"#;
/// let item = parse_nbt(json, &mapper).unwrap();
/// assert_eq!(item.item_id, "iron_sword");
/// assert_eq!(item.lore, "%%STRENGTH:+5 %%");
/// ```
pub fn parse_nbt(json: &str, mapper: &PlaceholderReverseMapper) -> GeneratorResult<NbtImport> {
    let root: Value =
        serde_json::from_str(json).map_err(|e| GeneratorError::validation(format!("invalid NBT JSON: {e}")))?;
    let raw_id = root
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| GeneratorError::validation("NBT is missing an item id"))?;

    let mut item_id = raw_id.trim().to_lowercase().replace(NAMESPACE, "");
    if item_id == LEGACY_SKULL {
        item_id = PLAYER_HEAD.to_string();
    }

    let format = NbtFormat::detect(&root);
    let handler = format.handler();
    let (name, lore_lines) = handler.display(&root);
    let skin_texture = if item_id == PLAYER_HEAD { handler.skin_texture(&root)? } else { None };
    let longest = lore_lines.iter().map(|line| visible_len(line)).max();
    let metadata = NbtMetadata {
        skin_texture,
        max_line_length: longest.unwrap_or(DEFAULT_MAX_LINE_LENGTH).clamp(1, MAX_LINE_LENGTH_LIMIT),
        enchanted: handler.enchanted(&root),
    };
    debug!("Imported {:?} NBT for '{}' with {} lore lines", format, item_id, lore_lines.len());

    Ok(NbtImport {
        format,
        dye_color: handler.dye_color(&root).map(|color| format!("#{:06X}", color & 0xFF_FFFF)),
        name: mapper.map_placeholders(&name),
        lore: mapper.map_placeholders(&lore_lines.join("\n")),
        item_id,
        metadata,
    })
}

/// Field access for one NBT layout
trait NbtFormatHandler {
    /// `&`-coded name and lore lines.
    fn display(&self, root: &Value) -> (String, Vec<String>);

    fn dye_color(&self, root: &Value) -> Option<u32>;

    fn skin_texture(&self, root: &Value) -> GeneratorResult<Option<String>>;

    fn enchanted(&self, root: &Value) -> bool;
}

struct LegacyFormat;

impl LegacyFormat {
    fn display_tag(root: &Value) -> Option<&Value> {
        root.get("tag")?.get("display")
    }
}

fn to_ampersand(text: &str) -> String {
    text.replace(SECTION, &AMPERSAND.to_string())
}

impl NbtFormatHandler for LegacyFormat {
    fn display(&self, root: &Value) -> (String, Vec<String>) {
        let Some(display) = Self::display_tag(root) else {
            return (String::new(), Vec::new());
        };
        let name = display.get("Name").and_then(Value::as_str).map(to_ampersand).unwrap_or_default();
        let lore = display
            .get("Lore")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().filter_map(Value::as_str).map(to_ampersand).collect())
            .unwrap_or_default();
        (name, lore)
    }

    fn dye_color(&self, root: &Value) -> Option<u32> {
        Self::display_tag(root)?.get("color")?.as_i64().map(|c| c as u32)
    }

    fn skin_texture(&self, root: &Value) -> GeneratorResult<Option<String>> {
        let textures = root
            .get("tag")
            .and_then(|t| t.get("SkullOwner"))
            .and_then(|o| o.get("Properties"))
            .and_then(|p| p.get("textures"))
            .and_then(Value::as_array);
        let Some(textures) = textures else {
            return Ok(None);
        };
        if textures.len() > 1 {
            return Err(GeneratorError::validation("player head has more than one skin texture"));
        }
        Ok(textures.first().and_then(|t| t.get("Value")).and_then(Value::as_str).map(str::to_string))
    }

    fn enchanted(&self, root: &Value) -> bool {
        let Some(tag) = root.get("tag") else {
            return false;
        };
        ["Enchantments", "StoredEnchantments", "ench"].iter().any(|key| has_entries(tag.get(*key)))
    }
}

struct ComponentsFormat;

impl ComponentsFormat {
    fn component<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        root.get("components")?.get(key)
    }
}

impl NbtFormatHandler for ComponentsFormat {
    fn display(&self, root: &Value) -> (String, Vec<String>) {
        let name = Self::component(root, "minecraft:custom_name").map(text_component).unwrap_or_default();
        let lore = Self::component(root, "minecraft:lore")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().map(text_component).collect())
            .unwrap_or_default();
        (name, lore)
    }

    fn dye_color(&self, root: &Value) -> Option<u32> {
        let dyed = Self::component(root, "minecraft:dyed_color")?;
        dyed.as_i64().or_else(|| dyed.get("rgb").and_then(Value::as_i64)).map(|c| c as u32)
    }

    fn skin_texture(&self, root: &Value) -> GeneratorResult<Option<String>> {
        let properties = Self::component(root, "minecraft:profile").and_then(|p| p.get("properties"));
        let texture = properties
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|p| p.get("name").and_then(Value::as_str).is_some_and(|n| n.eq_ignore_ascii_case("textures")))
            .and_then(|p| p.get("value"))
            .and_then(Value::as_str);
        Ok(texture.map(str::to_string))
    }

    fn enchanted(&self, root: &Value) -> bool {
        if let Some(glint) = Self::component(root, "minecraft:enchantment_glint_override") {
            return is_truthy(glint);
        }
        ["minecraft:enchantments", "minecraft:stored_enchantments"]
            .iter()
            .any(|key| has_entries(Self::component(root, key)))
    }
}

/// Flatten a text component into `&`-coded text.
///
/// Plain strings that hold serialized JSON are decoded first. Each part
/// writes its color and formatting codes before its text.
fn text_component(value: &Value) -> String {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner @ (Value::Object(_) | Value::Array(_))) => text_component(&inner),
            _ => to_ampersand(text),
        },
        Value::Array(parts) => parts.iter().map(text_component).collect(),
        Value::Object(_) => {
            let mut out = String::new();
            if let Some(color) = value.get("color").and_then(Value::as_str).and_then(ChatColor::from_name) {
                out.push_str(&color.legacy());
            }
            for (key, format) in [
                ("bold", FormatCode::Bold),
                ("italic", FormatCode::Italic),
                ("underlined", FormatCode::Underline),
                ("strikethrough", FormatCode::Strikethrough),
                ("obfuscated", FormatCode::Obfuscated),
            ] {
                if value.get(key).is_some_and(is_truthy) {
                    out.push_str(&format.legacy());
                }
            }
            if let Some(text) = value.get("text").and_then(Value::as_str) {
                out.push_str(&to_ampersand(text));
            }
            if let Some(extra) = value.get("extra").and_then(Value::as_array) {
                out.extend(extra.iter().map(text_component));
            }
            out
        }
        _ => String::new(),
    }
}

/// `true`, a non-zero number, or the SNBT strings `1b` and `true`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => s == "1b" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Non-empty enchantment list, map, or `{levels: ...}` wrapper.
fn has_entries(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(entries)) => !entries.is_empty(),
        Some(Value::Object(map)) => match map.get("levels") {
            Some(levels) => has_entries(Some(levels)),
            None => !map.is_empty(),
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::PlaceholderParser;

    fn mapper() -> PlaceholderReverseMapper {
        PlaceholderReverseMapper::for_parser(&PlaceholderParser::default()).unwrap()
    }

    fn parse(json: &str) -> NbtImport {
        parse_nbt(json, &mapper()).unwrap()
    }

    #[test]
    fn test_legacy_display() {
        let item = parse(
            r#"{"id": "minecraft:diamond_sword", "tag": {"display": {
                "Name": "§6Aspect of the End",
                "Lore": ["§7Damage: §c+100", "", "§6§lLEGENDARY SWORD"]
            }}}"#,
        );
        assert_eq!(item.format, NbtFormat::Legacy);
        assert_eq!(item.item_id, "diamond_sword");
        assert_eq!(item.name, "&6Aspect of the End");
        assert_eq!(item.lore, "%%ITEM_STAT_RED:Damage:+100%%\n\n&6&lLEGENDARY SWORD");
        assert_eq!(item.metadata.max_line_length, 15);
        assert!(!item.metadata.enchanted);
    }

    #[test]
    fn test_components_display() {
        let item = parse(
            r#"{"id": "minecraft:leather_chestplate", "components": {
                "minecraft:custom_name": {"text": "", "extra": [{"text": "Cloak", "color": "gold", "bold": "1b"}]},
                "minecraft:lore": [
                    {"text": "", "extra": [{"text": "+5 ❁ Strength", "color": "red"}]},
                    "{\"text\":\"Plain\",\"italic\":false}"
                ],
                "minecraft:dyed_color": {"rgb": 16711680},
                "minecraft:enchantments": {"levels": {"minecraft:protection": 4}}
            }}"#,
        );
        assert_eq!(item.format, NbtFormat::Components);
        assert_eq!(item.name, "&6&lCloak");
        assert_eq!(item.lore, "%%STRENGTH:+5 %%\nPlain");
        assert_eq!(item.dye_color.as_deref(), Some("#FF0000"));
        assert!(item.metadata.enchanted);
    }

    #[test]
    fn test_glint_override_wins() {
        let item = parse(
            r#"{"id": "stick", "components": {
                "minecraft:enchantment_glint_override": false,
                "minecraft:enchantments": {"levels": {"minecraft:sharpness": 1}}
            }}"#,
        );
        assert!(!item.metadata.enchanted);
        assert!(parse(r#"{"id": "stick", "components": {"minecraft:enchantment_glint_override": "1b"}}"#)
            .metadata
            .enchanted);
        assert!(!parse(r#"{"id": "stick", "components": {"minecraft:enchantments": {"levels": {}}}}"#)
            .metadata
            .enchanted);
    }

    #[test]
    fn test_legacy_enchantments_and_dye() {
        let item = parse(r#"{"id": "leather_boots", "tag": {"ench": [{"id": 0}], "display": {"color": 10511680}}}"#);
        assert!(item.metadata.enchanted);
        assert_eq!(item.dye_color.as_deref(), Some("#A06540"));
        assert_eq!(item.metadata.max_line_length, DEFAULT_MAX_LINE_LENGTH);
    }

    #[test]
    fn test_skull_becomes_player_head() {
        let legacy = parse(
            r#"{"id": "minecraft:skull", "tag": {"SkullOwner": {"Properties": {"textures": [{"Value": "abc"}]}}}}"#,
        );
        assert_eq!(legacy.item_id, PLAYER_HEAD);
        assert_eq!(legacy.metadata.skin_texture.as_deref(), Some("abc"));

        let components = parse(
            r#"{"id": "player_head", "components": {"minecraft:profile": {"properties": [
                {"name": "other", "value": "x"}, {"name": "textures", "value": "def"}]}}}"#,
        );
        assert_eq!(components.metadata.skin_texture.as_deref(), Some("def"));
    }

    #[test]
    fn test_too_many_textures() {
        let json = r#"{"id": "skull", "tag": {"SkullOwner": {"Properties": {"textures": [{"Value": "a"}, {"Value": "b"}]}}}}"#;
        let err = parse_nbt(json, &mapper()).unwrap_err();
        assert!(matches!(err, GeneratorError::Validation(ref m) if m.contains("more than one skin texture")));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(parse_nbt("{not json", &mapper()), Err(GeneratorError::Validation(_))));
        assert!(matches!(parse_nbt(r#"{"tag": {}}"#, &mapper()), Err(GeneratorError::Validation(_))));
    }

    #[test]
    fn test_generators_follow_the_item() {
        let item = parse(
            r#"{"id": "leather_helmet", "tag": {"ench": [{}], "display": {"Name": "§aHat", "Lore": ["§7Worn"], "color": 255}}}"#,
        );
        let expected = ItemGenerator::builder()
            .item_id("leather_helmet")
            .big_image(true)
            .enchanted(true)
            .data("#0000FF")
            .build()
            .unwrap();
        assert_eq!(item.item_generator().unwrap(), expected);

        let tooltip = item.tooltip_generator().unwrap();
        assert_eq!(tooltip.name(), "&aHat");
        assert_eq!(tooltip.max_line_length(), 4);
        assert_eq!(item.composer().unwrap().len(), 2);
    }
}
