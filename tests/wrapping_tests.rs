//! Integration tests for placeholder expansion and line wrapping
//!
//! These tests drive markup from raw `%%placeholder%%` text through the
//! wrapper and back through the legacy serializer.

use tooltipgen::format::{visible_len, ChatColor};
use tooltipgen::text::stats::{ABILITY_MISSING_SEPARATOR, ITEM_STAT_MISSING_SEPARATOR};
use tooltipgen::text::{wrap, wrap_legacy, LineSegment, PlaceholderParser};

const LORE_SAMPLES: &[&str] = &[
    "&7Deals &c+50% &7damage to &aUndead &7monsters while held in the main hand.",
    "&6&lLEGENDARY &r&7but nothing else about this line is special at all",
    "&dsupercalifragilisticexpialidocious &eand then some trailing words",
    "&k&cObfuscated words &r&9mixed &l&nwith &ostyles &mand &ostrikes",
    "plain text with    several   runs of   whitespace in between",
];

#[test]
fn test_require_placeholder_orders_color_label_and_extra() {
    let parser = PlaceholderParser::default();
    let out = parser.parse("%%REQUIRE:Combat Level 5%%");

    let color = out.find(&ChatColor::Red.legacy()).expect("red marker");
    let label = out.find("Requires").expect("label");
    let extra = out.find("Combat Level 5").expect("extra text");
    assert!(color < label && label < extra, "{out:?}");
    assert!(out.contains('❣'));
}

#[test]
fn test_malformed_ability_becomes_sentinel() {
    let parser = PlaceholderParser::default();
    assert_eq!(parser.parse("%%ABILITY:NoSeparatorHere%%"), ABILITY_MISSING_SEPARATOR);
}

#[test]
fn test_malformed_item_stat_becomes_sentinel() {
    let parser = PlaceholderParser::default();
    let out = parser.parse("Before %%ITEM_STAT_RED:Strength%% after");
    assert_eq!(out, format!("Before {ITEM_STAT_MISSING_SEPARATOR} after"));
}

#[test]
fn test_unknown_placeholder_is_dropped() {
    let parser = PlaceholderParser::default();
    assert_eq!(parser.parse("&7Left %%NO_SUCH_STAT:5%%Right"), "&7Left Right");
}

#[test]
fn test_long_red_line_keeps_color_on_every_line() {
    let lines = wrap_legacy("&cHello this is a long line of lore text", 10);
    assert!(lines.len() >= 2);
    for line in &lines[1..] {
        assert!(line.starts_with("&c"), "{line:?}");
    }
}

#[test]
fn test_every_line_within_visible_limit() {
    for text in LORE_SAMPLES {
        for max in [1, 3, 7, 12, 24, 36] {
            for line in wrap_legacy(text, max) {
                assert!(visible_len(&line) <= max, "{line:?} longer than {max}");
            }
        }
    }
}

#[test]
fn test_unbroken_run_is_hard_split_at_limit() {
    let lines = wrap_legacy("&bAAAAAAAAAAAAAAAAAAAA", 8);
    let visible: Vec<usize> = lines.iter().map(|l| visible_len(l)).collect();
    assert_eq!(visible, vec![8, 8, 4]);
    assert!(lines.iter().all(|l| l.starts_with("&b")));
}

#[test]
fn test_wrapped_segments_survive_legacy_round_trip() {
    for text in LORE_SAMPLES {
        for line in wrap(text, 16) {
            let reparsed = LineSegment::parse_legacy(&line.to_legacy());
            assert_eq!(reparsed.plain_text(), line.plain_text());
            assert_eq!(reparsed.segments.len(), line.segments.len(), "{line:?}");
            for (a, b) in reparsed.segments.iter().zip(&line.segments) {
                assert_eq!(a.color, b.color);
                assert_eq!(a.bold, b.bold);
                assert_eq!(a.italic, b.italic);
                assert_eq!(a.underlined, b.underlined);
                assert_eq!(a.strikethrough, b.strikethrough);
            }
        }
    }
}

#[test]
fn test_parsed_stats_wrap_cleanly() {
    let parser = PlaceholderParser::default();
    let lore = parser.parse("%%DAMAGE:+120%% %%STRENGTH:+80%% %%CRIT_DAMAGE:+50%%");
    let lines = wrap(&lore, 12);
    assert!(lines.len() >= 2);
    assert!(lines.iter().all(|l| l.plain_text().chars().count() <= 12));
}
