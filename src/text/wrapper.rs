//! Greedy word wrapping that preserves legacy formatting across breaks
//!
//! Line width is measured in visible characters; `&`+code pairs are free.
//! When a line is broken automatically, the color and formatting codes that
//! were active at the end of the previous line are prepended to the next
//! one, so the wrapped output renders exactly as the unwrapped source
//! would have.

use super::segment::LineSegment;
use crate::error::{GeneratorError, GeneratorResult};
use crate::format::{is_introducer, visible_len, LegacyCode, FormatCode};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+|\s+").expect("token pattern is a valid regex"))
}

/// Collapse `\r\n`, `\r`, and literal `\n` escapes into real newlines.
///
/// A real newline directly followed (or preceded) by a literal `\n`
/// counts as a single break.
///
/// # Examples
///
/// ```
/// use tooltipgen::text::normalize_newlines;
///
/// assert_eq!(normalize_newlines(r"a\nb"), "a\nb");
/// assert_eq!(normalize_newlines("a\n\\nb"), "a\nb");
/// assert_eq!(normalize_newlines("a\r\nb"), "a\nb");
/// ```
pub fn normalize_newlines(input: &str) -> String {
    let input = if input.contains('\r') {
        input.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        input.to_string()
    };

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            out.push('\n');
            i += 1;
            while i + 1 < chars.len() && chars[i] == '\\' && chars[i + 1] == 'n' {
                i += 2;
            }
            continue;
        }
        if c == '\\' && chars.get(i + 1) == Some(&'n') {
            if chars.get(i + 2) == Some(&'\n') {
                i += 2;
                continue;
            }
            out.push('\n');
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Color and formatting active at the end of a flushed line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatState {
    last_color: String,
    formatting: String,
}

impl FormatState {
    /// Codes to prepend to a continuation line, e.g. `&c&l`.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.last_color, self.formatting)
    }

    /// State after reading `text`, starting from `self`.
    ///
    /// A color code replaces the color and clears formatting, format codes
    /// accumulate once each, and a reset clears both.
    pub fn advance(&self, text: &str) -> FormatState {
        let mut state = self.clone();
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;

        while i + 1 < chars.len() {
            if is_introducer(chars[i]) {
                let pair: String = chars[i..i + 2].iter().collect();
                match LegacyCode::from_code(chars[i + 1]) {
                    Some(LegacyCode::Color(_)) => {
                        state.last_color = pair;
                        state.formatting.clear();
                        i += 2;
                        continue;
                    }
                    Some(LegacyCode::Format(FormatCode::Reset)) => {
                        state = FormatState::default();
                        i += 2;
                        continue;
                    }
                    Some(LegacyCode::Format(_)) => {
                        let normalized = pair.to_ascii_lowercase();
                        if !state.formatting.to_ascii_lowercase().contains(&normalized) {
                            state.formatting.push_str(&pair);
                        }
                        i += 2;
                        continue;
                    }
                    None => {}
                }
            }
            i += 1;
        }

        state
    }
}

/// True if `line` opens with a color or reset code, which fully replaces
/// any carried-over style.
fn starts_with_style_override(line: &str) -> bool {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(intro), Some(code)) if is_introducer(intro) => matches!(
            LegacyCode::from_code(code),
            Some(LegacyCode::Color(_)) | Some(LegacyCode::Format(FormatCode::Reset))
        ),
        _ => false,
    }
}

/// Split `word` into pieces of at most `max` visible characters, never
/// separating a code from its introducer.
fn hard_split(word: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut visible = 0;
    let mut i = 0;

    while i < chars.len() {
        let is_code = is_introducer(chars[i])
            && chars.get(i + 1).is_some_and(|&c| LegacyCode::from_code(c).is_some());
        if is_code {
            current.push(chars[i]);
            current.push(chars[i + 1]);
            i += 2;
            continue;
        }
        if visible == max {
            chunks.push(std::mem::take(&mut current));
            visible = 0;
        }
        current.push(chars[i]);
        visible += 1;
        i += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Wraps legacy-coded text to a maximum visible line length
#[derive(Debug, Clone)]
pub struct LineWrapper {
    max_line_length: usize,
    lines: Vec<String>,
    state: FormatState,
    current: String,
    current_visible: usize,
}

impl LineWrapper {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            lines: Vec::new(),
            state: FormatState::default(),
            current: String::new(),
            current_visible: 0,
        }
    }

    /// Wrap `text` and return the lines as legacy-coded strings.
    pub fn wrap_text(mut self, text: &str) -> Vec<String> {
        let normalized = normalize_newlines(text);

        if self.max_line_length == 0 {
            return normalized.split('\n').map(str::to_string).collect();
        }

        for raw_line in normalized.split('\n') {
            if raw_line.is_empty() {
                self.lines.push(String::new());
                self.state = FormatState::default();
                debug!("Preserving empty line");
                continue;
            }

            let emitted_before = self.lines.len();
            let mut line_start = true;

            for token in token_pattern().find_iter(raw_line) {
                let token = token.as_str();
                if token.trim().is_empty() {
                    // Indentation survives only at the start of a source line
                    if !self.current.is_empty() || line_start {
                        self.push_text(token);
                    }
                } else {
                    self.add_word(token);
                }
                line_start = false;
            }

            if self.has_content() {
                self.flush();
            } else if self.lines.len() == emitted_before {
                self.clear_current();
                self.lines.push(String::new());
            } else {
                self.clear_current();
            }
        }

        debug!("Wrapped text into {} lines", self.lines.len());
        self.lines
    }

    fn has_content(&self) -> bool {
        !self.current.trim().is_empty()
    }

    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
        self.current_visible += visible_len(text);
    }

    fn clear_current(&mut self) {
        self.current.clear();
        self.current_visible = 0;
    }

    fn add_word(&mut self, word: &str) {
        let width = visible_len(word);

        if self.has_content() && self.current_visible + width > self.max_line_length {
            self.flush();
        } else if !self.has_content() && self.current_visible + width > self.max_line_length {
            // Leading indentation would push the word over the limit
            self.clear_current();
        }

        if width <= self.max_line_length {
            self.push_text(word);
            return;
        }

        debug!("Hard-splitting word of {} visible characters", width);
        let chunks = hard_split(word, self.max_line_length);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.into_iter().enumerate() {
            self.push_text(&chunk);
            if i < last {
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        let trimmed = self.current.trim_end();
        let line = if starts_with_style_override(trimmed) {
            trimmed.to_string()
        } else {
            format!("{}{}", self.state.prefix(), trimmed)
        };

        self.state = self.state.advance(&line);
        self.lines.push(line);
        self.clear_current();
    }
}

/// Wrap text into legacy-coded lines.
///
/// # Examples
///
/// ```
/// use tooltipgen::text::wrap_legacy;
///
/// let lines = wrap_legacy("&cHello this is a long line", 10);
/// assert_eq!(lines, vec!["&cHello this", "&cis a long", "&cline"]);
/// ```
pub fn wrap_legacy(text: &str, max_line_length: usize) -> Vec<String> {
    LineWrapper::new(max_line_length).wrap_text(text)
}

/// Wrap text into styled lines, one [`LineSegment`] per output line.
pub fn wrap(text: &str, max_line_length: usize) -> Vec<LineSegment> {
    wrap_legacy(text, max_line_length).iter().map(|l| LineSegment::parse_legacy(l)).collect()
}

/// Wrap several lore entries into one list of lines.
///
/// Blank entries become a single-space line. Fails if nothing visible is
/// left to draw.
pub fn split_lines<S: AsRef<str>>(entries: &[S], max_line_length: usize) -> GeneratorResult<Vec<LineSegment>> {
    let mut output = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        if entry.trim().is_empty() {
            output.push(LineSegment::parse_legacy(" "));
            continue;
        }
        output.extend(wrap(entry, max_line_length));
    }

    if output.iter().all(|line| line.plain_text().trim().is_empty()) {
        return Err(GeneratorError::generation("You cannot generate an empty tooltip!"));
    }

    Ok(output)
}
