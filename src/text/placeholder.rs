//! `%%name[:extra]%%` placeholder expansion
//!
//! Placeholders are resolved against, in order: chat color and format
//! names, gemstones, then the stat table. The result is plain legacy-coded
//! text ready for the line wrapper.
//!
//! The extra text runs to the first `%%` that is not immediately followed
//! by another `%`, so `%%COINS:50%%%` carries the extra `50%`. The `regex`
//! crate has no lookahead, which is why the scanner below is hand-written.

use super::gemstone::GemstoneTable;
use super::stats::StatTable;
use crate::format::{ChatColor, FormatCode};
use tracing::debug;

/// A placeholder located in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the opening `%%`
    pub start: usize,
    /// Byte offset just past the closing `%%`
    pub end: usize,
    pub name: &'a str,
    pub extra: Option<&'a str>,
}

/// Find the first placeholder at or after byte offset `from`.
///
/// # Examples
///
/// ```
/// use tooltipgen::text::find_placeholder;
///
/// let token = find_placeholder("Cost %%COINS:50%%% total", 0).unwrap();
/// assert_eq!(token.name, "COINS");
/// assert_eq!(token.extra, Some("50%"));
/// ```
pub fn find_placeholder(input: &str, from: usize) -> Option<Placeholder<'_>> {
    let bytes = input.as_bytes();
    let mut i = from;

    while i + 1 < bytes.len() {
        if bytes[i] == b'%' && bytes[i + 1] == b'%' {
            if let Some(token) = match_at(input, i) {
                return Some(token);
            }
        }
        i += 1;
    }

    None
}

fn is_close(bytes: &[u8], at: usize) -> bool {
    at + 1 < bytes.len() && bytes[at] == b'%' && bytes[at + 1] == b'%' && bytes.get(at + 2) != Some(&b'%')
}

fn match_at(input: &str, start: usize) -> Option<Placeholder<'_>> {
    let bytes = input.as_bytes();
    let name_start = start + 2;
    let mut name_end = name_start;
    while name_end < bytes.len() && (bytes[name_end].is_ascii_alphabetic() || bytes[name_end] == b'_') {
        name_end += 1;
    }
    if name_end == name_start {
        return None;
    }
    let name = &input[name_start..name_end];

    if is_close(bytes, name_end) {
        return Some(Placeholder { start, end: name_end + 2, name, extra: None });
    }

    if bytes.get(name_end) != Some(&b':') {
        return None;
    }

    let extra_start = name_end + 1;
    let mut k = extra_start;
    while k < bytes.len() && bytes[k] != b'\n' {
        if is_close(bytes, k) {
            return Some(Placeholder { start, end: k + 2, name, extra: Some(&input[extra_start..k]) });
        }
        k += 1;
    }

    None
}

/// Expands placeholders into legacy-coded text
#[derive(Debug, Clone)]
pub struct PlaceholderParser {
    stats: StatTable,
    gemstones: GemstoneTable,
}

impl Default for PlaceholderParser {
    fn default() -> Self {
        Self::new(StatTable::builtin(), GemstoneTable::builtin())
    }
}

impl PlaceholderParser {
    pub fn new(stats: StatTable, gemstones: GemstoneTable) -> Self {
        Self { stats, gemstones }
    }

    pub fn stats(&self) -> &StatTable {
        &self.stats
    }

    pub fn gemstones(&self) -> &GemstoneTable {
        &self.gemstones
    }

    /// Replace every placeholder in `input`.
    ///
    /// Unknown names are dropped from the output. Malformed stat extras
    /// become visible sentinel strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use tooltipgen::text::PlaceholderParser;
    ///
    /// let parser = PlaceholderParser::default();
    /// assert_eq!(parser.parse("%%REQUIRE:Combat Level 5%%"), "&c❣ Requires Combat Level 5&r");
    /// assert_eq!(parser.parse("a%%NOT_A_THING%%b"), "ab");
    /// ```
    pub fn parse(&self, input: &str) -> String {
        if input.trim().is_empty() {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut cursor = 0;

        while let Some(token) = find_placeholder(input, cursor) {
            out.push_str(&input[cursor..token.start]);
            match self.resolve(token.name, token.extra) {
                Some(replacement) => out.push_str(&replacement),
                None => debug!("Dropping unknown placeholder '{}'", token.name),
            }
            cursor = token.end;
        }

        out.push_str(&input[cursor..]);
        out
    }

    /// Resolve a single placeholder name, or `None` if it is unknown.
    pub fn resolve(&self, name: &str, extra: Option<&str>) -> Option<String> {
        if let Some(color) = ChatColor::from_name(name) {
            return Some(color.legacy());
        }
        if let Some(format) = FormatCode::from_name(name) {
            return Some(format.legacy());
        }
        if let Some(gem) = self.gemstones.get(name) {
            return Some(gem.slot(extra));
        }

        let stat = self.stats.get(name)?;
        let composed = stat.compose(extra);
        debug!("Resolved stat '{}' with extra {:?}", name, extra);
        if composed.starts_with('[') {
            Some(composed)
        } else {
            Some(format!("{}{}", composed, FormatCode::Reset.legacy()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::stats::{ABILITY_MISSING_SEPARATOR, ITEM_STAT_MISSING_DETAILS};

    #[test]
    fn test_find_simple_placeholder() {
        let token = find_placeholder("x %%bold%% y", 0).unwrap();
        assert_eq!(token, Placeholder { start: 2, end: 10, name: "bold", extra: None });
    }

    #[test]
    fn test_extra_may_contain_percent() {
        let token = find_placeholder("%%X:100% sure%%", 0).unwrap();
        assert_eq!(token.extra, Some("100% sure"));
    }

    #[test]
    fn test_close_skips_run_of_three() {
        let token = find_placeholder("%%X:50%%%", 0).unwrap();
        assert_eq!(token.extra, Some("50%"));
        assert_eq!(token.end, 9);
    }

    #[test]
    fn test_unterminated_placeholder_is_literal() {
        assert!(find_placeholder("%%REQUIRE:never closed", 0).is_none());
        let parser = PlaceholderParser::default();
        assert_eq!(parser.parse("50%% off"), "50%% off");
    }

    #[test]
    fn test_color_and_format_names() {
        let parser = PlaceholderParser::default();
        assert_eq!(parser.parse("%%RED%%Hot %%bold%%Stuff"), "&cHot &lStuff");
    }

    #[test]
    fn test_require_scenario() {
        let parser = PlaceholderParser::default();
        let out = parser.parse("%%REQUIRE:Combat Level 5%%");
        let red = out.find("&c").unwrap();
        let label = out.find("Requires").unwrap();
        let extra = out.find("Combat Level 5").unwrap();
        assert!(red < label && label < extra);
    }

    #[test]
    fn test_sentinels_have_no_reset() {
        let parser = PlaceholderParser::default();
        assert_eq!(parser.parse("%%ABILITY:NoSeparatorHere%%"), ABILITY_MISSING_SEPARATOR);
        assert_eq!(parser.parse("%%ITEM_STAT_RED%%"), ITEM_STAT_MISSING_DETAILS);
    }

    #[test]
    fn test_unknown_names_are_dropped() {
        let parser = PlaceholderParser::default();
        assert_eq!(parser.parse("[%%UNKNOWN:data%%]"), "[]");
    }

    #[test]
    fn test_multiple_placeholders_on_one_line() {
        let parser = PlaceholderParser::default();
        let out = parser.parse("%%STRENGTH:+5 %% %%DEFENSE:+3 %%");
        assert_eq!(out, "&c+5 ❁ Strength&r &a+3 ❈ Defense&r");
    }

    #[test]
    fn test_gemstone_resolution() {
        let parser = PlaceholderParser::default();
        assert_eq!(parser.parse("%%GEM_JADE:perfect%%"), "&6[&a☘&6]&r");
    }
}
