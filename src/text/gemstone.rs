//! Gemstone slot placeholders
//!
//! `%%ruby%%` renders an empty slot, `%%ruby:fine%%` a slot filled with a
//! gem of the given tier. Tiers are matched case-insensitively; an unknown
//! tier falls back to the empty slot.

use crate::format::ChatColor;
use std::collections::HashMap;

/// A gemstone or gemstone slot type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gemstone {
    pub name: String,
    pub icon: String,
    pub color: ChatColor,
}

impl Gemstone {
    pub fn new(name: &str, icon: &str, color: ChatColor) -> Self {
        Self { name: name.to_string(), icon: icon.to_string(), color }
    }

    /// Icon prefixed with the gem's own color code.
    pub fn formatted_icon(&self) -> String {
        format!("{}{}", self.color.legacy(), self.icon)
    }

    /// Bracketed slot text for the given tier.
    pub fn slot(&self, tier: Option<&str>) -> String {
        let Some(tier) = tier else {
            return format!("&8[{}]&r", self.icon);
        };
        let bracket = match tier.to_ascii_lowercase().as_str() {
            "unlocked" => return format!("&8[&7{}&8]&r", self.icon),
            "rough" => ChatColor::White,
            "flawed" => ChatColor::Green,
            "fine" => ChatColor::Blue,
            "flawless" => ChatColor::DarkPurple,
            "perfect" => ChatColor::Gold,
            _ => return format!("&8[{}]&r", self.icon),
        };
        let b = bracket.legacy();
        format!("{b}[{}{b}]&r", self.formatted_icon())
    }
}

/// Case-insensitive gemstone lookup
#[derive(Debug, Clone, Default)]
pub struct GemstoneTable {
    by_name: HashMap<String, Gemstone>,
}

impl GemstoneTable {
    pub fn new(gems: impl IntoIterator<Item = Gemstone>) -> Self {
        Self { by_name: gems.into_iter().map(|g| (g.name.to_ascii_uppercase(), g)).collect() }
    }

    pub fn get(&self, name: &str) -> Option<&Gemstone> {
        self.by_name.get(&name.to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gemstone> {
        self.by_name.values()
    }

    pub fn builtin() -> Self {
        use ChatColor::*;
        Self::new([
            Gemstone::new("GEM_RUBY", "❤", Red),
            Gemstone::new("GEM_AMETHYST", "❈", DarkPurple),
            Gemstone::new("GEM_JADE", "☘", Green),
            Gemstone::new("GEM_SAPPHIRE", "✎", Aqua),
            Gemstone::new("GEM_AMBER", "⸕", Gold),
            Gemstone::new("GEM_TOPAZ", "✧", Yellow),
            Gemstone::new("GEM_JASPER", "❁", LightPurple),
            Gemstone::new("GEM_OPAL", "❂", White),
            Gemstone::new("GEM_ONYX", "☠", DarkGray),
            Gemstone::new("GEM_AQUAMARINE", "α", Aqua),
            Gemstone::new("GEM_CITRINE", "☘", DarkRed),
            Gemstone::new("GEM_PERIDOT", "☘", DarkGreen),
            Gemstone::new("GEM_COMBAT", "⚔", DarkRed),
            Gemstone::new("GEM_OFFENSIVE", "☠", Blue),
            Gemstone::new("GEM_DEFENSIVE", "☤", Green),
            Gemstone::new("GEM_MINING", "✦", Gold),
            Gemstone::new("GEM_UNIVERSAL", "❂", White),
        ])
    }
}
