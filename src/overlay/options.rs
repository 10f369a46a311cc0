//! Named and hex color choices for an overlay
//!
//! Loaded from `json/overlay_colors.json`:
//!
//! ```json
//! [{
//!   "name": "leather_armor",
//!   "options": { "red": [-5231066] },
//!   "map": {},
//!   "allowHexColors": true,
//!   "useDefaultIfMissing": true,
//!   "defaultColors": [-6265536]
//! }]
//! ```
//!
//! Color values are signed 32-bit ARGB integers as written by the sheet
//! tooling; map keys are the same integers rendered as strings.

use lru::LruCache;
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;

const HEX_CACHE_CAPACITY: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColorOptions {
    name: String,
    #[serde(default)]
    options: HashMap<String, Vec<i64>>,
    #[serde(default)]
    map: HashMap<String, usize>,
    #[serde(default)]
    allow_hex_colors: bool,
    #[serde(default)]
    use_default_if_missing: bool,
    #[serde(default)]
    default_colors: Vec<i64>,
}

impl TryFrom<RawColorOptions> for OverlayColorOptions {
    type Error = String;

    fn try_from(raw: RawColorOptions) -> Result<Self, Self::Error> {
        let map = raw
            .map
            .into_iter()
            .map(|(key, index)| {
                key.trim()
                    .parse::<i64>()
                    .map(|color| (to_argb(color), index))
                    .map_err(|_| format!("invalid map color '{key}' in '{}'", raw.name))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        let options = raw
            .options
            .into_iter()
            .map(|(name, colors)| (name.to_lowercase(), colors.into_iter().map(to_argb).collect()))
            .collect();

        Ok(OverlayColorOptions::new(raw.name)
            .with_options(options)
            .with_map(map)
            .with_hex_colors(raw.allow_hex_colors)
            .with_default_colors(raw.default_colors.into_iter().map(to_argb).collect(), raw.use_default_if_missing))
    }
}

fn to_argb(value: i64) -> u32 {
    value as u32
}

/// Color choices for one overlay
#[derive(Debug, Deserialize)]
#[serde(try_from = "RawColorOptions")]
pub struct OverlayColorOptions {
    pub name: String,
    options: HashMap<String, Vec<u32>>,
    map: HashMap<u32, usize>,
    allow_hex_colors: bool,
    use_default_if_missing: bool,
    default_colors: Vec<u32>,
    hex_cache: Mutex<LruCache<String, Vec<u32>>>,
}

impl OverlayColorOptions {
    pub fn new(name: impl Into<String>) -> Self {
        let capacity = NonZeroUsize::new(HEX_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            name: name.into(),
            options: HashMap::new(),
            map: HashMap::new(),
            allow_hex_colors: false,
            use_default_if_missing: false,
            default_colors: Vec::new(),
            hex_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Named options; names are matched lower-cased.
    pub fn with_options(mut self, options: HashMap<String, Vec<u32>>) -> Self {
        self.options = options.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
        self
    }

    pub fn with_option(mut self, name: &str, colors: Vec<u32>) -> Self {
        self.options.insert(name.to_lowercase(), colors);
        self
    }

    pub fn with_map(mut self, map: HashMap<u32, usize>) -> Self {
        self.map = map;
        self
    }

    pub fn with_hex_colors(mut self, allow: bool) -> Self {
        self.allow_hex_colors = allow;
        self
    }

    pub fn with_default_colors(mut self, default_colors: Vec<u32>, use_if_missing: bool) -> Self {
        self.default_colors = default_colors;
        self.use_default_if_missing = use_if_missing;
        self
    }

    /// Source color to palette index table used by the Mapped strategy.
    pub fn map(&self) -> &HashMap<u32, usize> {
        &self.map
    }

    pub fn default_colors(&self) -> &[u32] {
        &self.default_colors
    }

    /// True if `name` is one of the named options.
    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(&name.to_lowercase())
    }

    /// Resolve a user-supplied option to a color list.
    ///
    /// Tries, in order: a named option, a comma-separated hex list (when
    /// hex colors are allowed), then the default colors (when
    /// `use_default_if_missing` is set).
    ///
    /// # Examples
    ///
    /// ```
    /// use tooltipgen::overlay::OverlayColorOptions;
    ///
    /// let options = OverlayColorOptions::new("leather")
    ///     .with_option("red", vec![0xFFB02E26])
    ///     .with_hex_colors(true);
    /// assert_eq!(options.colors_for_option(Some("RED")), Some(vec![0xFFB02E26]));
    /// assert_eq!(options.colors_for_option(Some("#00ff00,0000FF")), Some(vec![0xFF00FF00, 0xFF0000FF]));
    /// assert_eq!(options.colors_for_option(Some("pink")), None);
    /// ```
    pub fn colors_for_option(&self, option: Option<&str>) -> Option<Vec<u32>> {
        let option = option.unwrap_or_default().to_lowercase();

        if let Some(colors) = self.options.get(&option) {
            return Some(colors.clone());
        }

        if self.allow_hex_colors {
            if let Some(colors) = self.parse_hex_cached(&option) {
                return Some(colors);
            }
        }

        self.use_default_if_missing.then(|| self.default_colors.clone())
    }

    fn parse_hex_cached(&self, option: &str) -> Option<Vec<u32>> {
        let mut cache = self.hex_cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(colors) = cache.get(option) {
            return Some(colors.clone());
        }
        let colors = parse_hex_list(option)?;
        cache.put(option.to_string(), colors.clone());
        Some(colors)
    }
}

/// Parse `#rrggbb[,#rrggbb...]` into opaque ARGB colors.
///
/// Characters other than hex digits and `#` are discarded first, so
/// `"# ff 00 00"` parses. The `#` is optional. Any invalid entry fails the
/// whole list.
pub fn parse_hex_list(input: &str) -> Option<Vec<u32>> {
    input
        .split(',')
        .map(|entry| {
            let cleaned: String = entry.chars().filter(|c| c.is_ascii_hexdigit() || *c == '#').collect();
            let digits = cleaned.strip_prefix('#').unwrap_or(&cleaned);
            if digits.is_empty() || digits.len() > 6 || digits.contains('#') {
                return None;
            }
            u32::from_str_radix(digits, 16).ok().map(|rgb| 0xFF00_0000 | rgb)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_option_wins_over_hex() {
        let options = OverlayColorOptions::new("potion").with_option("abc", vec![1]).with_hex_colors(true);
        assert_eq!(options.colors_for_option(Some("ABC")), Some(vec![1]));
    }

    #[test]
    fn test_has_option_ignores_case_and_hex() {
        let options = OverlayColorOptions::new("trim").with_option("Gold", vec![1]).with_hex_colors(true);
        assert!(options.has_option("GOLD"));
        assert!(!options.has_option("#ff0000"));
    }

    #[test]
    fn test_hex_disallowed() {
        let options = OverlayColorOptions::new("potion");
        assert_eq!(options.colors_for_option(Some("#ff0000")), None);
    }

    #[test]
    fn test_defaults_when_missing() {
        let options = OverlayColorOptions::new("dye").with_default_colors(vec![0xFFA06540], true);
        assert_eq!(options.colors_for_option(None), Some(vec![0xFFA06540]));
        assert_eq!(options.colors_for_option(Some("unknown")), Some(vec![0xFFA06540]));
    }

    #[test]
    fn test_hex_results_are_memoized() {
        let options = OverlayColorOptions::new("dye").with_hex_colors(true);
        assert_eq!(options.colors_for_option(Some("#123456")), Some(vec![0xFF12_3456]));
        assert_eq!(options.hex_cache.lock().unwrap().len(), 1);
        assert_eq!(options.colors_for_option(Some("#123456")), Some(vec![0xFF12_3456]));
        assert_eq!(options.hex_cache.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_hex_list_rejects_garbage() {
        assert_eq!(parse_hex_list("zzz"), None);
        assert_eq!(parse_hex_list("#1234567"), None);
        assert_eq!(parse_hex_list("#ff0000,"), None);
        assert_eq!(parse_hex_list(" #ff0000 "), Some(vec![0xFFFF_0000]));
    }

    #[test]
    fn test_deserialize_signed_colors() {
        let json = r#"[{
            "name": "leather_armor",
            "options": { "Red": [-65536] },
            "map": { "-16777216": 2 },
            "allowHexColors": true,
            "useDefaultIfMissing": false,
            "defaultColors": [-1]
        }]"#;
        let parsed: Vec<OverlayColorOptions> = serde_json::from_str(json).unwrap();
        let options = &parsed[0];
        assert_eq!(options.name, "leather_armor");
        assert_eq!(options.colors_for_option(Some("red")), Some(vec![0xFFFF_0000]));
        assert_eq!(options.map().get(&0xFF00_0000), Some(&2));
        assert_eq!(options.default_colors(), &[0xFFFF_FFFF]);
    }

    #[test]
    fn test_deserialize_rejects_bad_map_key() {
        let json = r#"{ "name": "x", "map": { "red": 0 } }"#;
        assert!(serde_json::from_str::<OverlayColorOptions>(json).is_err());
    }
}
