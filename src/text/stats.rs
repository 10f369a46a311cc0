//! Stat and flavor definitions consumed by the placeholder parser
//!
//! Each definition names an icon, a label, a primary color, an optional
//! secondary color and the [`ParseType`] strategy that composes them with
//! the placeholder's extra text. The table is read-only once built; the
//! built-in set can be replaced by a JSON file at startup.

use crate::error::{GeneratorError, GeneratorResult};
use crate::format::{ChatColor, FormatCode, AMPERSAND};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const ITEM_STAT_MISSING_DETAILS: &str = "[ITEM_STAT_MISSING_DETAILS]";
pub const ITEM_STAT_MISSING_SEPARATOR: &str = "[ITEM_STAT_MISSING_SEPARATOR]";
pub const ABILITY_MISSING_DETAILS: &str = "[ABILITY_MISSING_DETAILS]";
pub const ABILITY_MISSING_SEPARATOR: &str = "[ABILITY_MISSING_SEPARATOR]";

/// How a stat definition and the placeholder extra are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseType {
    /// Color and label only, extra ignored
    None,
    /// Extra followed by the icon and label
    Normal,
    /// Bold icon only
    Bold,
    /// Extra, bold icon, then label
    BoldIcon,
    /// Extra in the secondary color, then icon and label
    Dual,
    /// `* Label *` with bold stars
    Soulbound,
    /// Icon and label, then the extra
    Post,
    /// Label, then the extra in the secondary color
    PostDual,
    /// `name:amount` split into a gray name and a colored amount
    ItemStat,
    /// `name:type` split into an ability header
    Ability,
    /// Icon in the primary color, label in the secondary color
    DifferentIconColor,
}

/// A single stat or flavor definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatDefinition {
    pub name: String,
    pub icon: String,
    pub stat: String,
    pub color: ChatColor,
    pub sub_color: Option<ChatColor>,
    pub parse_type: ParseType,
}

impl StatDefinition {
    pub fn new(name: &str, icon: &str, stat: &str, color: ChatColor) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            stat: stat.to_string(),
            color,
            sub_color: None,
            parse_type: ParseType::Normal,
        }
    }

    pub fn with_sub_color(mut self, sub_color: ChatColor) -> Self {
        self.sub_color = Some(sub_color);
        self
    }

    pub fn with_parse_type(mut self, parse_type: ParseType) -> Self {
        self.parse_type = parse_type;
        self
    }

    /// Icon and label joined by a space, or the bare label without an icon.
    pub fn display(&self) -> String {
        if self.icon.is_empty() {
            self.stat.clone()
        } else {
            format!("{} {}", self.icon, self.stat)
        }
    }

    /// The secondary color, falling back to the primary one.
    pub fn secondary_color(&self) -> ChatColor {
        self.sub_color.unwrap_or(self.color)
    }

    /// Compose this definition with the placeholder's extra text.
    ///
    /// Malformed item-stat and ability extras produce a bracketed sentinel
    /// instead of an error.
    pub fn compose(&self, extra: Option<&str>) -> String {
        let c = code(self.color);
        let sub = code(self.secondary_color());
        let bold = FormatCode::Bold.legacy();
        let extra_text = extra.unwrap_or("");

        match self.parse_type {
            ParseType::None => format!("{c}{}", self.stat),
            ParseType::Normal => format!("{c}{extra_text}{}", self.display()),
            ParseType::Bold => format!("{c}{bold}{}", self.icon),
            ParseType::BoldIcon => {
                format!("{c}{extra_text}{c}{bold}{}{c} {}", self.icon, self.stat)
            }
            ParseType::Dual => {
                if extra_text.is_empty() {
                    format!("{c}{}", self.display())
                } else {
                    format!("{sub}{extra_text}{c}{}", self.display())
                }
            }
            ParseType::Soulbound => format!("{c}{bold}* {c}{} {c}{bold}*", self.stat),
            ParseType::Post => match extra {
                Some(e) if !e.is_empty() => format!("{c}{} {e}", self.display()),
                _ => format!("{c}{}", self.display()),
            },
            ParseType::PostDual => format!("{c}{} {sub}{extra_text}", self.stat),
            ParseType::ItemStat => match split_details(extra) {
                Details::Missing => ITEM_STAT_MISSING_DETAILS.to_string(),
                Details::NoSeparator => ITEM_STAT_MISSING_SEPARATOR.to_string(),
                Details::Split(item_stat, amount) => {
                    format!("{}{item_stat}: {sub}{amount}", code(ChatColor::Gray))
                }
            },
            ParseType::Ability => match split_details(extra) {
                Details::Missing => ABILITY_MISSING_DETAILS.to_string(),
                Details::NoSeparator => ABILITY_MISSING_SEPARATOR.to_string(),
                Details::Split(ability_name, ability_type) => {
                    format!("{c}{}: {ability_name} {sub}{bold}{ability_type}", self.stat)
                }
            },
            ParseType::DifferentIconColor => match extra {
                Some(e) if !e.is_empty() => format!("{c}{} {sub}{} {e}", self.icon, self.stat),
                _ => format!("{c}{} {sub}{}", self.icon, self.stat),
            },
        }
    }
}

enum Details<'a> {
    Missing,
    NoSeparator,
    Split(&'a str, &'a str),
}

fn split_details(extra: Option<&str>) -> Details<'_> {
    match extra {
        None => Details::Missing,
        Some("") => Details::Missing,
        Some(e) => match e.split_once(':') {
            Some((left, right)) => Details::Split(left, right),
            None => Details::NoSeparator,
        },
    }
}

fn code(color: ChatColor) -> String {
    format!("{}{}", AMPERSAND, color.code())
}

/// JSON shape of a definition; colors and strategies are given by name
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatRecord {
    name: String,
    #[serde(default)]
    icon: String,
    stat: String,
    color: String,
    #[serde(default)]
    sub_color: Option<String>,
    #[serde(default = "default_parse_type")]
    parse_type: ParseType,
}

fn default_parse_type() -> ParseType {
    ParseType::Normal
}

impl StatRecord {
    fn into_definition(self) -> Result<StatDefinition, String> {
        let color = ChatColor::from_name(&self.color)
            .ok_or_else(|| format!("stat '{}' has unknown color '{}'", self.name, self.color))?;
        let sub_color = match self.sub_color {
            Some(name) => Some(
                ChatColor::from_name(&name)
                    .ok_or_else(|| format!("stat '{}' has unknown sub color '{}'", self.name, name))?,
            ),
            None => None,
        };
        Ok(StatDefinition {
            name: self.name,
            icon: self.icon,
            stat: self.stat,
            color,
            sub_color,
            parse_type: self.parse_type,
        })
    }
}

/// Case-insensitive lookup table of stat definitions
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    by_name: HashMap<String, StatDefinition>,
}

impl StatTable {
    pub fn new(definitions: impl IntoIterator<Item = StatDefinition>) -> Self {
        let by_name = definitions.into_iter().map(|d| (d.name.to_ascii_uppercase(), d)).collect();
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&StatDefinition> {
        self.by_name.get(&name.to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatDefinition> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Parse a JSON array of definitions.
    ///
    /// # Examples
    ///
    /// ```
    /// use tooltipgen::text::StatTable;
    ///
    /// let table = StatTable::from_json(
    ///     r#"[{"name": "LUCK", "icon": "✯", "stat": "Luck", "color": "aqua"}]"#,
    /// ).unwrap();
    /// assert!(table.get("luck").is_some());
    /// ```
    pub fn from_json(json: &str) -> GeneratorResult<Self> {
        let records: Vec<StatRecord> = serde_json::from_str(json)
            .map_err(|e| GeneratorError::validation(format!("invalid stat table: {e}")))?;
        let definitions = records
            .into_iter()
            .map(StatRecord::into_definition)
            .collect::<Result<Vec<_>, _>>()
            .map_err(GeneratorError::validation)?;
        Ok(Self::new(definitions))
    }

    /// Load a JSON stat table from disk.
    pub fn load(path: &Path) -> GeneratorResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GeneratorError::resource(path, e.to_string()))?;
        Self::from_json(&contents)
    }

    /// The definitions shipped with the crate.
    pub fn builtin() -> Self {
        use ChatColor::*;
        use ParseType as P;

        let normal = |name: &str, icon: &str, stat: &str, color: ChatColor| StatDefinition::new(name, icon, stat, color);
        let typed = |name: &str, icon: &str, stat: &str, color: ChatColor, parse_type: ParseType| {
            StatDefinition::new(name, icon, stat, color).with_parse_type(parse_type)
        };
        let dual = |name: &str, icon: &str, stat: &str, color: ChatColor, sub: ChatColor, parse_type: ParseType| {
            StatDefinition::new(name, icon, stat, color).with_sub_color(sub).with_parse_type(parse_type)
        };

        Self::new([
            normal("STRENGTH", "❁", "Strength", Red),
            normal("DAMAGE", "❁", "Damage", Red),
            dual("HEALTH", "❤", "Health", Red, Green, P::Normal),
            normal("DEFENSE", "❈", "Defense", Green),
            normal("TRUE_DEFENSE", "❂", "True Defense", White),
            dual("SPEED", "✦", "Speed", White, Green, P::Normal),
            normal("INTELLIGENCE", "✎", "Intelligence", Aqua),
            normal("CRIT_CHANCE", "☣", "Crit Chance", Blue),
            normal("CRIT_DAMAGE", "☠", "Crit Damage", Blue),
            dual("ATTACK_SPEED", "⚔", "Bonus Attack Speed", Yellow, Green, P::Normal),
            normal("FEROCITY", "⫽", "Ferocity", Red),
            normal("MENDING", "☄", "Mending", Green),
            normal("VITALITY", "♨", "Vitality", DarkRed),
            normal("HEALTH_REGEN", "❣", "Health Regen", Red),
            normal("MAGIC_FIND", "✯", "Magic Find", Aqua),
            dual("PET_LUCK", "♣", "Pet Luck", LightPurple, White, P::Normal),
            typed("SEA_CREATURE_CHANCE", "α", "Sea Creature Chance", DarkAqua, P::BoldIcon),
            normal("FISHING_SPEED", "☂", "Fishing Speed", Aqua),
            normal("ABILITY_DAMAGE", "๑", "Ability Damage", Red),
            normal("MINING_SPEED", "⸕", "Mining Speed", Gold),
            normal("BREAKING_POWER", "Ⓟ", "Breaking Power", DarkGreen),
            normal("PRISTINE", "✧", "Pristine", DarkPurple),
            normal("MINING_FORTUNE", "☘", "Mining Fortune", Gold),
            normal("FARMING_FORTUNE", "☘", "Farming Fortune", Gold),
            normal("FORAGING_FORTUNE", "☘", "Foraging Fortune", Gold),
            normal("SOULFLOW", "⸎", "Soulflow", DarkAqua),
            normal("OVERFLOW_MANA", "ʬ", "Overflow Mana", DarkAqua),
            normal("SWING_RANGE", "Ⓢ", "Swing Range", Yellow),
            normal("MANA_REGEN", "⚡", "Mana Regen", Aqua),
            normal("RIFT_TIME", "ф", "Rift Time", Green),
            normal("RIFT_DAMAGE", "❁", "Rift Damage", DarkPurple),
            normal("COMBAT_WISDOM", "☯", "Combat Wisdom", DarkAqua),
            normal("MINING_WISDOM", "☯", "Mining Wisdom", DarkAqua),
            normal("FARMING_WISDOM", "☯", "Farming Wisdom", DarkAqua),
            normal("FISHING_WISDOM", "☯", "Fishing Wisdom", DarkAqua),
            typed("REQUIRE", "❣", "Requires", Red, P::Post),
            typed("RECIPE", "", "Right-click to view recipes!", Yellow, P::None),
            typed("REFORGABLE", "", "This item can be reforged!", DarkGray, P::None),
            typed("RIFT_TRANSFERABLE", "", "Rift-Transferable", DarkPurple, P::None),
            typed("SOULBOUND", "", "Soulbound", DarkGray, P::Soulbound),
            typed("COOP_SOULBOUND", "", "Co-op Soulbound", DarkGray, P::Soulbound),
            dual("ITEM_STAT_RED", "", "ITEM_STAT_RED", Gray, Red, P::ItemStat),
            dual("ITEM_STAT_GREEN", "", "ITEM_STAT_GREEN", Gray, Green, P::ItemStat),
            dual("ITEM_STAT_PINK", "", "ITEM_STAT_PINK", Gray, LightPurple, P::ItemStat),
            dual("MANA_COST", "", "Mana Cost:", DarkGray, DarkAqua, P::PostDual),
            dual("COOLDOWN", "", "Cooldown:", DarkGray, Green, P::PostDual),
            dual("ABILITY", "", "Ability", Gold, Yellow, P::Ability),
            dual("GEAR_SCORE", "", "Gear Score:", Gray, LightPurple, P::PostDual),
            dual("UNDEAD", "༕", "This armor piece is undead", DarkGreen, Green, P::DifferentIconColor),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_strategy_appends_extra() {
        let table = StatTable::builtin();
        let require = table.get("require").unwrap();
        assert_eq!(require.compose(Some("Combat Level 5")), "&c❣ Requires Combat Level 5");
        assert_eq!(require.compose(None), "&c❣ Requires");
    }

    #[test]
    fn test_normal_strategy_prefixes_extra() {
        let table = StatTable::builtin();
        assert_eq!(table.get("STRENGTH").unwrap().compose(Some("+10 ")), "&c+10 ❁ Strength");
    }

    #[test]
    fn test_dual_strategy_uses_secondary_color() {
        let def = StatDefinition::new("X", "☀", "Sun", ChatColor::Gold)
            .with_sub_color(ChatColor::Yellow)
            .with_parse_type(ParseType::Dual);
        assert_eq!(def.compose(Some("5 ")), "&e5 &6☀ Sun");
        assert_eq!(def.compose(Some("")), "&6☀ Sun");
    }

    #[test]
    fn test_soulbound_strategy() {
        let table = StatTable::builtin();
        assert_eq!(table.get("SOULBOUND").unwrap().compose(None), "&8&l* &8Soulbound &8&l*");
    }

    #[test]
    fn test_ability_strategy_splits_on_first_colon() {
        let table = StatTable::builtin();
        let ability = table.get("ABILITY").unwrap();
        assert_eq!(
            ability.compose(Some("Instant Transmission:RIGHT CLICK")),
            "&6Ability: Instant Transmission &e&lRIGHT CLICK"
        );
        assert_eq!(ability.compose(Some("A:B:C")), "&6Ability: A &e&lB:C");
    }

    #[test]
    fn test_malformed_details_produce_sentinels() {
        let table = StatTable::builtin();
        let ability = table.get("ABILITY").unwrap();
        assert_eq!(ability.compose(Some("NoSeparatorHere")), ABILITY_MISSING_SEPARATOR);
        assert_eq!(ability.compose(Some("")), ABILITY_MISSING_DETAILS);
        assert_eq!(ability.compose(None), ABILITY_MISSING_DETAILS);

        let item_stat = table.get("ITEM_STAT_RED").unwrap();
        assert_eq!(item_stat.compose(Some("Damage")), ITEM_STAT_MISSING_SEPARATOR);
        assert_eq!(item_stat.compose(Some("Damage:+50")), "&7Damage: &c+50");
    }

    #[test]
    fn test_from_json_rejects_unknown_color() {
        let err = StatTable::from_json(r#"[{"name": "X", "stat": "X", "color": "chartreuse"}]"#).unwrap_err();
        assert!(err.to_string().contains("chartreuse"));
    }

    #[test]
    fn test_from_json_reads_parse_type() {
        let table = StatTable::from_json(
            r#"[{"name": "COST", "stat": "Cost:", "color": "dark_gray", "subColor": "gold", "parseType": "POST_DUAL"}]"#,
        )
        .unwrap();
        assert_eq!(table.get("cost").unwrap().compose(Some("5 Coins")), "&8Cost: &65 Coins");
    }
}
