//! Built-in 5x7 bitmap font
//!
//! Glyphs cover printable ASCII plus the stat and gemstone icons. Each
//! glyph is five column bytes, bit 0 at the top row. Widths are proportional: empty columns on either side are
//! trimmed and one column of spacing follows every glyph, the way the game
//! font advances. Characters outside the table draw as a hollow box.
//!
//! Coordinates here are in font units; the tooltip renderer multiplies by
//! its pixel size.

use crate::canvas::fill_rect;
use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Rows per glyph
pub const GLYPH_HEIGHT: u32 = 7;
/// Advance of a space
pub const SPACE_ADVANCE: u32 = 4;

const FIRST_CHAR: u32 = 0x20;
const MISSING_GLYPH: [u8; 5] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

/// Icons used by the built-in stat and gemstone tables, sorted by code point
#[rustfmt::skip]
const SYMBOL_GLYPHS: [(char, [u8; 5]); 30] = [
('\u{02AC}', [0x0F, 0x30, 0x0C, 0x30, 0x0F]), // ʬ
    ('\u{03B1}', [0x38, 0x44, 0x44, 0x38, 0x44]), // α
    ('\u{0444}', [0x0C, 0x12, 0x3F, 0x12, 0x0C]), // ф
    ('\u{0E51}', [0x1C, 0x22, 0x1A, 0x12, 0x0C]), // ๑
    ('\u{0F15}', [0x09, 0x12, 0x09, 0x12, 0x09]), // ༕
    ('\u{24C5}', [0x1E, 0x3F, 0x2B, 0x25, 0x1E]), // Ⓟ
    ('\u{24C8}', [0x1E, 0x35, 0x33, 0x2B, 0x1E]), // Ⓢ
    ('\u{2602}', [0x12, 0x23, 0x1F, 0x03, 0x02]), // ☂
    ('\u{2604}', [0x18, 0x3C, 0x1C, 0x0A, 0x01]), // ☄
    ('\u{2618}', [0x02, 0x17, 0x0E, 0x07, 0x02]), // ☘
    ('\u{2620}', [0x0E, 0x3B, 0x1F, 0x3B, 0x0E]), // ☠
    ('\u{2623}', [0x18, 0x0A, 0x05, 0x0A, 0x18]), // ☣
    ('\u{2624}', [0x01, 0x2A, 0x7F, 0x2A, 0x01]), // ☤
    ('\u{262F}', [0x1E, 0x39, 0x33, 0x27, 0x1E]), // ☯
    ('\u{2663}', [0x0C, 0x2A, 0x3F, 0x2A, 0x0C]), // ♣
    ('\u{2668}', [0x15, 0x22, 0x25, 0x22, 0x15]), // ♨
    ('\u{2694}', [0x11, 0x1A, 0x04, 0x1A, 0x11]), // ⚔
    ('\u{26A1}', [0x20, 0x14, 0x0E, 0x05, 0x04]), // ⚡
    ('\u{270E}', [0x38, 0x1C, 0x0E, 0x07, 0x03]), // ✎
    ('\u{2726}', [0x04, 0x0E, 0x1F, 0x0E, 0x04]), // ✦
    ('\u{2727}', [0x04, 0x0A, 0x11, 0x0A, 0x04]), // ✧
    ('\u{272F}', [0x12, 0x0E, 0x07, 0x0E, 0x12]), // ✯
    ('\u{2741}', [0x0A, 0x1B, 0x04, 0x1B, 0x0A]), // ❁
    ('\u{2742}', [0x15, 0x0E, 0x1B, 0x0E, 0x15]), // ❂
    ('\u{2748}', [0x0A, 0x04, 0x1F, 0x04, 0x0A]), // ❈
    ('\u{2763}', [0x02, 0x07, 0x2E, 0x07, 0x02]), // ❣
    ('\u{2764}', [0x06, 0x0F, 0x1E, 0x0F, 0x06]), // ❤
    ('\u{2AFD}', [0x30, 0x0C, 0x33, 0x0C, 0x03]), // ⫽
    ('\u{2E0E}', [0x08, 0x3E, 0x09, 0x09, 0x02]), // ⸎
    ('\u{2E15}', [0x0C, 0x10, 0x3F, 0x10, 0x0C]), // ⸕
];

/// Zero-width presentation selectors that follow some symbols
fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{FE0E}' | '\u{FE0F}')
}

/// Raw column bytes for `c`.
fn raw_columns(c: char) -> &'static [u8; 5] {
    if c.is_ascii() {
        let code = c as u32;
        return code.checked_sub(FIRST_CHAR).and_then(|index| GLYPHS.get(index as usize)).unwrap_or(&MISSING_GLYPH);
    }
    SYMBOL_GLYPHS
        .binary_search_by_key(&c, |(symbol, _)| *symbol)
        .map(|index| &SYMBOL_GLYPHS[index].1)
        .unwrap_or(&MISSING_GLYPH)
}

/// Inked columns of `c` with empty columns trimmed from both sides.
pub fn columns(c: char) -> &'static [u8] {
    let raw = raw_columns(c);
    let Some(first) = raw.iter().position(|&col| col != 0) else {
        return &[];
    };
    let last = raw.iter().rposition(|&col| col != 0).unwrap_or(first);
    &raw[first..=last]
}

/// Horizontal advance of `c` in font units, spacing included.
///
/// # Examples
///
/// ```
/// use tooltipgen::font::advance;
///
/// assert_eq!(advance('i', false), 4);
/// assert_eq!(advance('i', true), 5);
/// assert_eq!(advance(' ', false), 4);
/// ```
pub fn advance(c: char, bold: bool) -> u32 {
    if is_zero_width(c) {
        return 0;
    }
    if c == ' ' {
        return SPACE_ADVANCE + u32::from(bold);
    }
    columns(c).len() as u32 + 1 + u32::from(bold)
}

/// Total advance of `text` in font units.
pub fn text_width(text: &str, bold: bool) -> u32 {
    text.chars().map(|c| advance(c, bold)).sum()
}

/// Printable characters grouped by plain advance
fn width_groups() -> &'static BTreeMap<u32, Vec<char>> {
    static GROUPS: OnceLock<BTreeMap<u32, Vec<char>>> = OnceLock::new();
    GROUPS.get_or_init(|| {
        let mut groups: BTreeMap<u32, Vec<char>> = BTreeMap::new();
        for c in ('!'..='~').filter(|c| *c != '&') {
            groups.entry(advance(c, false)).or_default().push(c);
        }
        groups
    })
}

/// Pick a stand-in with the same advance as `c` for obfuscated text.
///
/// The choice depends only on `c`, `frame` and `position`, so a given
/// tooltip always animates the same way.
pub fn obfuscate(c: char, frame: u32, position: usize) -> char {
    if c == ' ' || is_zero_width(c) {
        return c;
    }
    let Some(candidates) = width_groups().get(&advance(c, false)) else {
        return c;
    };
    let seed = (frame as u64)
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add((position as u64).wrapping_mul(0x85EB_CA6B))
        .wrapping_add(c as u64);
    let mixed = (seed ^ (seed >> 15)).wrapping_mul(0x2C1B_3C6D);
    candidates[(mixed % candidates.len() as u64) as usize]
}

/// How a glyph is drawn
#[derive(Debug, Clone, Copy)]
pub struct GlyphStyle {
    pub color: Rgba<u8>,
    /// Screen pixels per font unit
    pub unit: u32,
    pub bold: bool,
    pub italic: bool,
}

/// Draw `c` with its top-left at (`x`, `y`) in screen pixels.
///
/// Bold draws the glyph a second time one unit to the right. Italic shears
/// rows so the top leans right by one unit.
pub fn draw_glyph(canvas: &mut RgbaImage, c: char, x: i64, y: i64, style: GlyphStyle) {
    let unit = style.unit.max(1) as i64;
    let strikes: &[i64] = if style.bold { &[0, 1] } else { &[0] };

    for (col_index, column) in columns(c).iter().enumerate() {
        for row in 0..GLYPH_HEIGHT as i64 {
            if column & (1 << row) == 0 {
                continue;
            }
            let shear = if style.italic { (GLYPH_HEIGHT as i64 - 1 - row) * unit / (GLYPH_HEIGHT as i64 - 1) } else { 0 };
            for strike in strikes {
                let px = x + (col_index as i64 + strike) * unit + shear;
                let py = y + row * unit;
                fill_rect(canvas, px, py, style.unit.max(1), style.unit.max(1), style.color);
            }
        }
    }
}
