//! Styled text segments
//!
//! A [`TextSegment`] is a run of characters that share one style. A
//! [`LineSegment`] is the ordered list of runs making up one rendered line.
//! Segments never inherit style from their neighbours: a segment without a
//! color is drawn in the renderer's default color.

use crate::format::{is_introducer, ChatColor, FormatCode, LegacyCode, AMPERSAND};

/// A run of text sharing a single color and set of formatting flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub color: Option<ChatColor>,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl TextSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    pub fn with_color(mut self, color: ChatColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underlined(mut self, underlined: bool) -> Self {
        self.underlined = underlined;
        self
    }

    pub fn with_strikethrough(mut self, strikethrough: bool) -> Self {
        self.strikethrough = strikethrough;
        self
    }

    pub fn with_obfuscated(mut self, obfuscated: bool) -> Self {
        self.obfuscated = obfuscated;
        self
    }

    /// True if any formatting flag is set.
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.underlined || self.strikethrough || self.obfuscated
    }

    /// Serialize this segment's style as legacy codes (color first).
    fn style_codes(&self, leading: bool) -> String {
        let mut codes = String::new();
        match self.color {
            Some(color) => codes.push_str(&color.legacy()),
            None if !leading => codes.push_str(&FormatCode::Reset.legacy()),
            None => {}
        }
        let flags = [
            (self.obfuscated, FormatCode::Obfuscated),
            (self.bold, FormatCode::Bold),
            (self.strikethrough, FormatCode::Strikethrough),
            (self.underlined, FormatCode::Underline),
            (self.italic, FormatCode::Italic),
        ];
        for (set, code) in flags {
            if set {
                codes.push_str(&code.legacy());
            }
        }
        codes
    }
}

/// Style accumulated while scanning legacy text
#[derive(Debug, Clone, Default)]
struct ScanStyle {
    color: Option<ChatColor>,
    bold: bool,
    italic: bool,
    underlined: bool,
    strikethrough: bool,
    obfuscated: bool,
}

impl ScanStyle {
    fn apply(&mut self, code: LegacyCode) {
        match code {
            // A color code starts a fresh style
            LegacyCode::Color(color) => *self = ScanStyle { color: Some(color), ..Default::default() },
            LegacyCode::Format(FormatCode::Reset) => *self = ScanStyle::default(),
            LegacyCode::Format(FormatCode::Bold) => self.bold = true,
            LegacyCode::Format(FormatCode::Italic) => self.italic = true,
            LegacyCode::Format(FormatCode::Underline) => self.underlined = true,
            LegacyCode::Format(FormatCode::Strikethrough) => self.strikethrough = true,
            LegacyCode::Format(FormatCode::Obfuscated) => self.obfuscated = true,
        }
    }

    fn segment(&self, text: String) -> TextSegment {
        TextSegment {
            text,
            color: self.color,
            bold: self.bold,
            italic: self.italic,
            underlined: self.underlined,
            strikethrough: self.strikethrough,
            obfuscated: self.obfuscated,
        }
    }
}

/// An ordered sequence of segments forming one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSegment {
    pub segments: Vec<TextSegment>,
}

impl LineSegment {
    pub fn new(segments: Vec<TextSegment>) -> Self {
        Self { segments }
    }

    /// A line with no segments, rendered as blank space.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Split legacy-coded text on `\n` and parse each line.
    ///
    /// Style does not carry from one line to the next.
    pub fn from_legacy(text: &str) -> Vec<LineSegment> {
        text.split('\n').map(LineSegment::parse_legacy).collect()
    }

    /// Parse a single line of `&`- or `§`-coded text.
    ///
    /// # Examples
    ///
    /// ```
    /// use tooltipgen::format::ChatColor;
    /// use tooltipgen::text::LineSegment;
    ///
    /// let line = LineSegment::parse_legacy("&cRed &lBold");
    /// assert_eq!(line.segments.len(), 2);
    /// assert_eq!(line.segments[0].color, Some(ChatColor::Red));
    /// assert!(line.segments[1].bold);
    /// ```
    pub fn parse_legacy(line: &str) -> LineSegment {
        let mut segments = Vec::new();
        let mut style = ScanStyle::default();
        let mut buffer = String::new();
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if is_introducer(c) {
                if let Some(code) = chars.peek().and_then(|&n| LegacyCode::from_code(n)) {
                    chars.next();
                    if !buffer.is_empty() {
                        segments.push(style.segment(std::mem::take(&mut buffer)));
                    }
                    style.apply(code);
                    continue;
                }
            }
            buffer.push(c);
        }

        if !buffer.is_empty() {
            segments.push(style.segment(buffer));
        }

        LineSegment { segments }
    }

    /// Serialize back to `&`-coded text that parses to an equivalent line.
    pub fn to_legacy(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            out.push_str(&segment.style_codes(i == 0));
            out.push_str(&segment.text);
        }
        out
    }

    /// Text without any styling.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Visible character count.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any segment is obfuscated and therefore animates.
    pub fn has_obfuscated(&self) -> bool {
        self.segments.iter().any(|s| s.obfuscated && !s.text.trim().is_empty())
    }
}

/// Prefix `text` with the legacy code for `color`.
pub fn colorize(color: ChatColor, text: &str) -> String {
    format!("{}{}{}", AMPERSAND, color.code(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        let line = LineSegment::parse_legacy("Plain");
        assert_eq!(line.segments, vec![TextSegment::new("Plain")]);
    }

    #[test]
    fn test_color_resets_formatting() {
        let line = LineSegment::parse_legacy("&l&cRed");
        assert_eq!(line.segments.len(), 1);
        assert_eq!(line.segments[0].color, Some(ChatColor::Red));
        assert!(!line.segments[0].bold);
    }

    #[test]
    fn test_formatting_accumulates_until_reset() {
        let line = LineSegment::parse_legacy("&6&lA&oB&rC");
        assert_eq!(line.segments.len(), 3);
        assert!(line.segments[0].bold && !line.segments[0].italic);
        assert!(line.segments[1].bold && line.segments[1].italic);
        assert_eq!(line.segments[1].color, Some(ChatColor::Gold));
        assert_eq!(line.segments[2], TextSegment::new("C"));
    }

    #[test]
    fn test_section_sign_is_recognized() {
        let line = LineSegment::parse_legacy("§aGreen");
        assert_eq!(line.segments[0].color, Some(ChatColor::Green));
    }

    #[test]
    fn test_unknown_code_is_literal() {
        let line = LineSegment::parse_legacy("R&D");
        assert_eq!(line.plain_text(), "R&D");
    }

    #[test]
    fn test_from_legacy_splits_lines() {
        let lines = LineSegment::from_legacy("&cOne\nTwo");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].segments[0].color, None);
    }

    #[test]
    fn test_round_trip_preserves_style() {
        let line = LineSegment::new(vec![
            TextSegment::new("Sharp ").with_color(ChatColor::Blue).with_bold(true),
            TextSegment::new("plain "),
            TextSegment::new("cut").with_color(ChatColor::Red).with_strikethrough(true).with_underlined(true),
        ]);
        let reparsed = LineSegment::parse_legacy(&line.to_legacy());
        assert_eq!(reparsed, line);
    }

    #[test]
    fn test_has_obfuscated_ignores_blank_runs() {
        assert!(!LineSegment::parse_legacy("&k ").has_obfuscated());
        assert!(LineSegment::parse_legacy("&kxx").has_obfuscated());
    }
}
