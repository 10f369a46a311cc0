//! Legacy chat color and formatting codes
//!
//! Text is styled with two-character codes: an introducer (`&`, or the
//! section sign `§`) followed by a hex digit for one of the sixteen colors
//! or one of `k l m n o r` for formatting. This module owns the code table,
//! the RGB values used when drawing, and small helpers for stripping codes
//! and measuring visible text.

use regex::Regex;
use std::sync::OnceLock;

/// Introducer used in user-authored markup
pub const AMPERSAND: char = '&';
/// Introducer used by the game itself
pub const SECTION: char = '§';

/// One of the sixteen legacy text colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl ChatColor {
    pub const ALL: [ChatColor; 16] = [
        ChatColor::Black,
        ChatColor::DarkBlue,
        ChatColor::DarkGreen,
        ChatColor::DarkAqua,
        ChatColor::DarkRed,
        ChatColor::DarkPurple,
        ChatColor::Gold,
        ChatColor::Gray,
        ChatColor::DarkGray,
        ChatColor::Blue,
        ChatColor::Green,
        ChatColor::Aqua,
        ChatColor::Red,
        ChatColor::LightPurple,
        ChatColor::Yellow,
        ChatColor::White,
    ];

    /// The code character following the introducer.
    pub fn code(self) -> char {
        match self {
            ChatColor::Black => '0',
            ChatColor::DarkBlue => '1',
            ChatColor::DarkGreen => '2',
            ChatColor::DarkAqua => '3',
            ChatColor::DarkRed => '4',
            ChatColor::DarkPurple => '5',
            ChatColor::Gold => '6',
            ChatColor::Gray => '7',
            ChatColor::DarkGray => '8',
            ChatColor::Blue => '9',
            ChatColor::Green => 'a',
            ChatColor::Aqua => 'b',
            ChatColor::Red => 'c',
            ChatColor::LightPurple => 'd',
            ChatColor::Yellow => 'e',
            ChatColor::White => 'f',
        }
    }

    /// Foreground color as `[r, g, b]`.
    pub fn rgb(self) -> [u8; 3] {
        unpack_rgb(match self {
            ChatColor::Black => 0x000000,
            ChatColor::DarkBlue => 0x0000AA,
            ChatColor::DarkGreen => 0x00AA00,
            ChatColor::DarkAqua => 0x00AAAA,
            ChatColor::DarkRed => 0xAA0000,
            ChatColor::DarkPurple => 0xAA00AA,
            ChatColor::Gold => 0xFFAA00,
            ChatColor::Gray => 0xAAAAAA,
            ChatColor::DarkGray => 0x555555,
            ChatColor::Blue => 0x5555FF,
            ChatColor::Green => 0x55FF55,
            ChatColor::Aqua => 0x55FFFF,
            ChatColor::Red => 0xFF5555,
            ChatColor::LightPurple => 0xFF55FF,
            ChatColor::Yellow => 0xFFFF55,
            ChatColor::White => 0xFFFFFF,
        })
    }

    /// Drop-shadow color as `[r, g, b]`.
    pub fn shadow_rgb(self) -> [u8; 3] {
        unpack_rgb(match self {
            ChatColor::Black => 0x000000,
            ChatColor::DarkBlue => 0x00002A,
            ChatColor::DarkGreen => 0x002A00,
            ChatColor::DarkAqua => 0x002A2A,
            ChatColor::DarkRed => 0x2A0000,
            ChatColor::DarkPurple => 0x2A002A,
            ChatColor::Gold => 0x2A2A00,
            ChatColor::Gray => 0x2A2A2A,
            ChatColor::DarkGray => 0x151515,
            ChatColor::Blue => 0x15153F,
            ChatColor::Green => 0x153F15,
            ChatColor::Aqua => 0x153F3F,
            ChatColor::Red => 0x3F1515,
            ChatColor::LightPurple => 0x3F153F,
            ChatColor::Yellow => 0x3F3F15,
            ChatColor::White => 0x3F3F3F,
        })
    }

    /// Upper snake case name, e.g. `DARK_AQUA`.
    pub fn name(self) -> &'static str {
        match self {
            ChatColor::Black => "BLACK",
            ChatColor::DarkBlue => "DARK_BLUE",
            ChatColor::DarkGreen => "DARK_GREEN",
            ChatColor::DarkAqua => "DARK_AQUA",
            ChatColor::DarkRed => "DARK_RED",
            ChatColor::DarkPurple => "DARK_PURPLE",
            ChatColor::Gold => "GOLD",
            ChatColor::Gray => "GRAY",
            ChatColor::DarkGray => "DARK_GRAY",
            ChatColor::Blue => "BLUE",
            ChatColor::Green => "GREEN",
            ChatColor::Aqua => "AQUA",
            ChatColor::Red => "RED",
            ChatColor::LightPurple => "LIGHT_PURPLE",
            ChatColor::Yellow => "YELLOW",
            ChatColor::White => "WHITE",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Case-insensitive lookup by name (`red`, `DARK_AQUA`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// The `&`-prefixed code, e.g. `&c`.
    pub fn legacy(self) -> String {
        format!("{}{}", AMPERSAND, self.code())
    }
}

fn unpack_rgb(packed: u32) -> [u8; 3] {
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}

/// A non-color formatting code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCode {
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl FormatCode {
    pub const ALL: [FormatCode; 6] = [
        FormatCode::Obfuscated,
        FormatCode::Bold,
        FormatCode::Strikethrough,
        FormatCode::Underline,
        FormatCode::Italic,
        FormatCode::Reset,
    ];

    pub fn code(self) -> char {
        match self {
            FormatCode::Obfuscated => 'k',
            FormatCode::Bold => 'l',
            FormatCode::Strikethrough => 'm',
            FormatCode::Underline => 'n',
            FormatCode::Italic => 'o',
            FormatCode::Reset => 'r',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatCode::Obfuscated => "OBFUSCATED",
            FormatCode::Bold => "BOLD",
            FormatCode::Strikethrough => "STRIKETHROUGH",
            FormatCode::Underline => "UNDERLINE",
            FormatCode::Italic => "ITALIC",
            FormatCode::Reset => "RESET",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn legacy(self) -> String {
        format!("{}{}", AMPERSAND, self.code())
    }
}

/// A parsed legacy code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyCode {
    Color(ChatColor),
    Format(FormatCode),
}

impl LegacyCode {
    pub fn from_code(code: char) -> Option<Self> {
        ChatColor::from_code(code)
            .map(LegacyCode::Color)
            .or_else(|| FormatCode::from_code(code).map(LegacyCode::Format))
    }
}

/// Returns true if `c` starts a legacy code.
pub fn is_introducer(c: char) -> bool {
    c == AMPERSAND || c == SECTION
}

fn strip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[&§][0-9a-fA-Fk-oK-OrR]").expect("strip pattern is a valid regex"))
}

/// Remove every legacy color and formatting code from `text`.
///
/// # Examples
///
/// ```
/// use tooltipgen::format::strip_color_codes;
///
/// assert_eq!(strip_color_codes("&c&lHello §7world"), "Hello world");
/// assert_eq!(strip_color_codes("50% & more"), "50% & more");
/// ```
pub fn strip_color_codes(text: &str) -> String {
    strip_pattern().replace_all(text, "").into_owned()
}

/// Number of characters a reader would see once codes are removed.
pub fn visible_len(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if is_introducer(c) {
            if let Some(&next) = chars.peek() {
                if LegacyCode::from_code(next).is_some() {
                    chars.next();
                    continue;
                }
            }
        }
        count += 1;
    }
    count
}
