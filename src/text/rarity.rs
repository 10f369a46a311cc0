//! Item rarities and the rarity footer line
//!
//! Tooltips end with a bold rarity line such as `EPIC SWORD`. Lore pasted
//! from the game often already contains that line; [`extract_footer`]
//! strips it and reports what it found so the generator can redraw it
//! consistently.

use super::wrapper::normalize_newlines;
use crate::format::{strip_color_codes, ChatColor, FormatCode};

/// Item rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Divine,
    Special,
    VerySpecial,
    Ultimate,
    Admin,
    None,
}

impl Rarity {
    pub const ALL: [Rarity; 12] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Divine,
        Rarity::Special,
        Rarity::VerySpecial,
        Rarity::Ultimate,
        Rarity::Admin,
        Rarity::None,
    ];

    /// Footer text, empty for [`Rarity::None`].
    pub fn display(self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Uncommon => "UNCOMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
            Rarity::Mythic => "MYTHIC",
            Rarity::Divine => "DIVINE",
            Rarity::Special => "SPECIAL",
            Rarity::VerySpecial => "VERY SPECIAL",
            Rarity::Ultimate => "ULTIMATE",
            Rarity::Admin => "ADMIN",
            Rarity::None => "",
        }
    }

    pub fn color(self) -> ChatColor {
        match self {
            Rarity::Common => ChatColor::White,
            Rarity::Uncommon => ChatColor::Green,
            Rarity::Rare => ChatColor::Blue,
            Rarity::Epic => ChatColor::DarkPurple,
            Rarity::Legendary => ChatColor::Gold,
            Rarity::Mythic => ChatColor::LightPurple,
            Rarity::Divine => ChatColor::Aqua,
            Rarity::Special | Rarity::VerySpecial => ChatColor::Red,
            Rarity::Ultimate => ChatColor::DarkRed,
            Rarity::Admin => ChatColor::DarkRed,
            Rarity::None => ChatColor::Gray,
        }
    }

    /// Case-insensitive lookup by display text or identifier
    /// (`very special`, `VERY_SPECIAL`).
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('_', " ");
        Self::ALL.into_iter().find(|r| match r {
            Rarity::None => wanted.eq_ignore_ascii_case("none"),
            _ => r.display().eq_ignore_ascii_case(&wanted),
        })
    }

    /// `&<color>`, the prefix applied to the item name.
    pub fn color_code(self) -> String {
        self.color().legacy()
    }

    /// Bold colored footer, optionally followed by the item type.
    pub fn footer(self, item_type: Option<&str>) -> Option<String> {
        if self == Rarity::None {
            return None;
        }
        let mut footer = format!("{}{}{}", self.color_code(), FormatCode::Bold.legacy(), self.display());
        if let Some(item_type) = item_type.map(str::trim).filter(|t| !t.is_empty()) {
            footer.push(' ');
            footer.push_str(item_type);
        }
        Some(footer)
    }
}

/// Result of stripping a rarity footer from lore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterExtraction {
    pub lore: String,
    pub rarity: Option<Rarity>,
    pub item_type: Option<String>,
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_blank_line(line: &str) -> bool {
    strip_color_codes(line).trim().is_empty()
}

fn parse_footer_line(raw: &str) -> Option<(Rarity, Option<String>)> {
    let normalized = normalize_whitespace(&strip_color_codes(raw));
    if normalized.is_empty() {
        return None;
    }
    let upper = normalized.to_ascii_uppercase();

    // Longer displays first so VERY SPECIAL wins over SPECIAL
    let mut rarities: Vec<Rarity> = Rarity::ALL.into_iter().filter(|r| *r != Rarity::None).collect();
    rarities.sort_by_key(|r| std::cmp::Reverse(r.display().len()));

    for rarity in rarities {
        let display = rarity.display();
        if upper == display {
            return Some((rarity, None));
        }
        if upper.starts_with(&format!("{display} ")) {
            let remainder = normalized[display.len()..].trim();
            let item_type = (!remainder.is_empty()).then(|| remainder.to_string());
            return Some((rarity, item_type));
        }
    }

    None
}

/// Remove a trailing rarity footer line from `lore`.
///
/// Returns the lore unchanged, with no rarity, when the last visible line
/// is not a footer. A single blank separator line before the footer is
/// kept.
///
/// # Examples
///
/// ```
/// use tooltipgen::text::{extract_footer, Rarity};
///
/// let found = extract_footer("&7Damage: &c+5\\n\\n&5&lEPIC SWORD");
/// assert_eq!(found.rarity, Some(Rarity::Epic));
/// assert_eq!(found.item_type.as_deref(), Some("SWORD"));
/// assert_eq!(found.lore, "&7Damage: &c+5\\n");
/// ```
pub fn extract_footer(lore: &str) -> FooterExtraction {
    let unchanged = || FooterExtraction { lore: lore.to_string(), rarity: None, item_type: None };
    if lore.trim().is_empty() {
        return unchanged();
    }

    let normalized = normalize_newlines(lore);
    let mut lines: Vec<&str> = normalized.split('\n').collect();

    let Some(footer_index) = lines.iter().rposition(|l| !is_blank_line(l)) else {
        return unchanged();
    };
    let Some((rarity, item_type)) = parse_footer_line(lines[footer_index]) else {
        return unchanged();
    };

    let preserve_blank = footer_index > 0 && is_blank_line(lines[footer_index - 1]);
    lines.truncate(footer_index);
    let mut preserved = None;
    while let Some(last) = lines.last() {
        if !is_blank_line(last) {
            break;
        }
        if preserve_blank && preserved.is_none() {
            preserved = Some(*last);
        }
        lines.pop();
    }
    if let Some(blank) = preserved {
        lines.push(blank);
    }

    FooterExtraction { lore: lines.join("\\n"), rarity: Some(rarity), item_type }
}
