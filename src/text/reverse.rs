//! Turning rendered legacy text back into placeholders
//!
//! Every stat and gemstone slot the [`super::PlaceholderParser`] can produce
//! is turned into a pattern over its output, with the placeholder extras
//! as capture groups. Lore copied out of the game can then be edited as
//! `%%STRENGTH:+5 %%` instead of `&c+5 ❁ Strength&r`.
//!
//! Rules run line by line: stats with details, stats without details, then
//! gemstone slots. Longer patterns run first so that `Co-op Soulbound` is
//! not claimed by `Soulbound`.

use super::gemstone::GemstoneTable;
use super::stats::{ParseType, StatTable};
use super::wrapper::normalize_newlines;
use super::PlaceholderParser;
use crate::error::{GeneratorError, GeneratorResult};
use crate::format::{is_introducer, AMPERSAND, SECTION};
use regex::{Captures, Regex};
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

const FIRST_EXTRA: char = '\u{E000}';
const SECOND_EXTRA: char = '\u{E001}';
const GEM_TIERS: [&str; 6] = ["unlocked", "rough", "flawed", "fine", "flawless", "perfect"];

enum Piece {
    Literal(String),
    Capture,
}

/// One compiled rule and the placeholder it emits
#[derive(Debug, Clone)]
struct Rule {
    name: String,
    pattern: Regex,
    /// Gem tier, or the stat extras taken from the capture groups
    tier: Option<&'static str>,
}

impl Rule {
    fn replacement(&self, caps: &Captures<'_>) -> String {
        let mut extras: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
        if let Some(tier) = self.tier {
            extras.push(tier);
        }
        if extras.is_empty() {
            format!("%%{}%%", self.name)
        } else {
            format!("%%{}:{}%%", self.name, extras.join(":"))
        }
    }
}

/// A rule before compilation, kept for ordering and deduplication
struct Candidate {
    name: String,
    source: String,
    captures: usize,
    literal_len: usize,
    tier: Option<&'static str>,
}

/// Maps rendered stat and gemstone text back to placeholders
#[derive(Debug, Clone)]
pub struct PlaceholderReverseMapper {
    rules: Vec<Rule>,
}

impl PlaceholderReverseMapper {
    /// # Errors
    ///
    /// Returns [`GeneratorError::Validation`] when a definition produces a
    /// pattern the regex engine rejects.
    pub fn new(stats: &StatTable, gemstones: &GemstoneTable) -> GeneratorResult<Self> {
        let mut stat_rules = stat_candidates(stats);
        stat_rules.sort_by(|a, b| {
            (a.captures == 0, Reverse(a.literal_len), &a.name).cmp(&(b.captures == 0, Reverse(b.literal_len), &b.name))
        });
        let mut gem_rules = gem_candidates(gemstones);
        gem_rules.sort_by(|a, b| (Reverse(a.literal_len), &a.name).cmp(&(Reverse(b.literal_len), &b.name)));

        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        for candidate in stat_rules.into_iter().chain(gem_rules) {
            if !seen.insert(candidate.source.clone()) {
                continue;
            }
            let pattern = Regex::new(&candidate.source).map_err(|e| {
                GeneratorError::validation(format!("cannot build reverse rule for '{}': {e}", candidate.name))
            })?;
            rules.push(Rule { name: candidate.name, pattern, tier: candidate.tier });
        }
        debug!("Built {} reverse placeholder rules", rules.len());
        Ok(Self { rules })
    }

    /// Rules for the parser's own stat and gemstone tables.
    ///
    /// # Errors
    ///
    /// See [`PlaceholderReverseMapper::new`].
    pub fn for_parser(parser: &PlaceholderParser) -> GeneratorResult<Self> {
        Self::new(parser.stats(), parser.gemstones())
    }

    /// Replace rendered stats and gem slots in `input` with placeholders.
    ///
    /// `§` codes are rewritten to `&` first; text no rule recognises is
    /// left as it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use tooltipgen::text::{PlaceholderParser, PlaceholderReverseMapper};
    ///
    /// let mapper = PlaceholderReverseMapper::for_parser(&PlaceholderParser::default()).unwrap();
    /// assert_eq!(mapper.map_placeholders("§c+5 ❁ Strength§r"), "%%STRENGTH:+5 %%");
    /// ```
    pub fn map_placeholders(&self, input: &str) -> String {
        let normalized = normalize_newlines(&input.replace(SECTION, &AMPERSAND.to_string()));
        normalized.split('\n').map(|line| self.map_line(line)).collect::<Vec<_>>().join("\n")
    }

    fn map_line(&self, line: &str) -> String {
        let mut line = line.to_string();
        for rule in &self.rules {
            if rule.pattern.is_match(&line) {
                line = rule.pattern.replace_all(&line, |caps: &Captures<'_>| rule.replacement(caps)).into_owned();
            }
        }
        line
    }
}

fn stat_candidates(stats: &StatTable) -> Vec<Candidate> {
    let first = FIRST_EXTRA.to_string();
    let pair = format!("{FIRST_EXTRA}:{SECOND_EXTRA}");

    let mut candidates = Vec::new();
    for stat in stats.iter() {
        let forms: Vec<Option<&str>> = match stat.parse_type {
            ParseType::None | ParseType::Bold | ParseType::Soulbound => vec![None],
            ParseType::ItemStat | ParseType::Ability => vec![Some(pair.as_str())],
            _ => vec![Some(first.as_str()), None],
        };
        for extra in forms {
            let composed = stat.compose(extra);
            // malformed-details sentinels never appear in rendered text
            if composed.starts_with('[') {
                continue;
            }
            candidates.push(candidate(&stat.name, &composed, None));
        }
    }
    candidates
}

fn gem_candidates(gemstones: &GemstoneTable) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for gem in gemstones.iter() {
        candidates.push(candidate(&gem.name, &gem.slot(None), None));
        for tier in GEM_TIERS {
            candidates.push(candidate(&gem.name, &gem.slot(Some(tier)), Some(tier)));
        }
    }
    candidates
}

fn candidate(name: &str, composed: &str, tier: Option<&'static str>) -> Candidate {
    let composed = composed.strip_suffix("&r").unwrap_or(composed);
    let pieces = split_pieces(composed);
    let literal_len = pieces
        .iter()
        .map(|p| match p {
            Piece::Literal(text) => text.chars().count(),
            Piece::Capture => 0,
        })
        .sum();
    let captures = pieces.iter().filter(|p| matches!(p, Piece::Capture)).count();

    let mut source = String::from("(?i)");
    for (i, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Literal(text) => source.push_str(&escape_literal(text)),
            // a trailing extra runs to the end of its color run
            Piece::Capture if i + 1 == pieces.len() => source.push_str("([^\n§&]+)"),
            Piece::Capture => source.push_str("([^\n§&]+?)"),
        }
    }
    source.push_str("(?:[§&]r)?");

    Candidate { name: name.to_string(), source, captures, literal_len, tier }
}

fn split_pieces(composed: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    for c in composed.chars() {
        if c == FIRST_EXTRA || c == SECOND_EXTRA {
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Capture);
        } else {
            literal.push(c);
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    pieces
}

/// Escape `text` for a regex, letting either code introducer match.
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_introducer(c) {
            escaped.push_str("[§&]");
        } else {
            escaped.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PlaceholderReverseMapper {
        PlaceholderReverseMapper::for_parser(&PlaceholderParser::default()).unwrap()
    }

    #[test]
    fn test_stat_with_details() {
        assert_eq!(mapper().map_placeholders("&c+5 ❁ Strength&r"), "%%STRENGTH:+5 %%");
    }

    #[test]
    fn test_stat_without_details() {
        assert_eq!(mapper().map_placeholders("&c❁ Strength"), "%%STRENGTH%%");
        assert_eq!(mapper().map_placeholders("&8&l* &8Co-op Soulbound &8&l*&r"), "%%COOP_SOULBOUND%%");
    }

    #[test]
    fn test_two_part_extras() {
        let parser = PlaceholderParser::default();
        let rendered = parser.parse("%%ABILITY:Instant Transmission:RIGHT CLICK%%");
        assert_eq!(mapper().map_placeholders(&rendered), "%%ABILITY:Instant Transmission:RIGHT CLICK%%");
        assert_eq!(mapper().map_placeholders("§7Damage: §c+50"), "%%ITEM_STAT_RED:Damage:+50%%");
    }

    #[test]
    fn test_trailing_extra_stops_at_reset() {
        let line = "&c❣ Requires Combat Level 5&r &7more";
        assert_eq!(mapper().map_placeholders(line), "%%REQUIRE:Combat Level 5%% &7more");
    }

    #[test]
    fn test_gem_slots() {
        let mapper = mapper();
        assert_eq!(mapper.map_placeholders("&8[❤]&r"), "%%GEM_RUBY%%");
        assert_eq!(mapper.map_placeholders("&9[&c❤&9]&r &8[&7❤&8]"), "%%GEM_RUBY:fine%% %%GEM_RUBY:unlocked%%");
    }

    #[test]
    fn test_lines_are_mapped_independently() {
        let input = "&c+5 ❁ Strength\\n&7Plain text\r\n§f+10 ✦ Speed";
        assert_eq!(mapper().map_placeholders(input), "%%STRENGTH:+5 %%\n&7Plain text\n%%SPEED:+10 %%");
    }

    #[test]
    fn test_parsed_stats_map_back() {
        let parser = PlaceholderParser::default();
        let mapper = mapper();
        for source in ["%%STRENGTH:+5 %%", "%%SPEED:+10 %%", "%%MANA_COST:50%%", "%%UNDEAD%%", "%%RECIPE%%"] {
            assert_eq!(mapper.map_placeholders(&parser.parse(source)), source);
        }
    }

    #[test]
    fn test_unknown_text_untouched() {
        assert_eq!(mapper().map_placeholders("&7Just some &ename"), "&7Just some &ename");
    }
}
