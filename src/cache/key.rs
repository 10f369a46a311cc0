//! Deterministic cache keys from generator configuration
//!
//! A key is `"<type name>|<sha256 hex>"`. The hash covers every
//! configuration field, sorted by name and rendered as `name=value;`, so two
//! generators with equal settings always share a key regardless of the
//! order their fields were declared in.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Values longer than this are replaced by their hash
const MAX_INLINE_LEN: usize = 64;

/// A configuration value as seen by the key deriver
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Symbolic name of an enum variant
    Enum(&'static str),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Canonical string form, long values abbreviated.
    pub fn normalize(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Enum(name) => (*name).to_string(),
            FieldValue::Text(text) => abbreviate(text),
            FieldValue::List(items) => {
                let parts: Vec<String> = items.iter().map(FieldValue::normalize).collect();
                abbreviate(&format!("[{}]", parts.join(", ")))
            }
            FieldValue::Bool(value) => abbreviate(&value.to_string()),
            FieldValue::Int(value) => abbreviate(&value.to_string()),
            FieldValue::Float(value) => abbreviate(&value.to_string()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Configuration fields that identify a render
///
/// Implementors list every field that influences the output. Fields that
/// don't, such as shared sprite handles, are left out.
pub trait CacheKeyFields {
    fn config_fields(&self) -> Vec<(&'static str, FieldValue)>;

    /// Type component of the key.
    fn key_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Lowercase hex SHA-256 of `value`.
pub fn sha256_hex(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Replace values longer than 64 characters with their hash.
pub fn abbreviate(value: &str) -> String {
    if value.chars().count() <= MAX_INLINE_LEN {
        value.to_string()
    } else {
        sha256_hex(value)
    }
}

/// The `name=value;` string that gets hashed.
pub fn canonical_representation(fields: &[(&'static str, FieldValue)]) -> String {
    let mut sorted: Vec<&(&'static str, FieldValue)> = fields.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (name, value) in sorted {
        let _ = write!(out, "{}={};", name, value.normalize());
    }
    out
}

/// Derive the cache key for a generator.
///
/// # Examples
///
/// ```
/// use tooltipgen::cache::{derive_key, CacheKeyFields, FieldValue};
///
/// struct Banner { text: String, scale: u32 }
///
/// impl CacheKeyFields for Banner {
///     fn config_fields(&self) -> Vec<(&'static str, FieldValue)> {
///         vec![("text", self.text.as_str().into()), ("scale", self.scale.into())]
///     }
/// }
///
/// let a = derive_key(&Banner { text: "hi".into(), scale: 2 });
/// let b = derive_key(&Banner { text: "hi".into(), scale: 2 });
/// let c = derive_key(&Banner { text: "hi".into(), scale: 3 });
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub fn derive_key<G: CacheKeyFields + ?Sized>(generator: &G) -> String {
    let canonical = canonical_representation(&generator.config_fields());
    format!("{}|{}", generator.key_type_name(), sha256_hex(&canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        fields: Vec<(&'static str, FieldValue)>,
    }

    impl CacheKeyFields for Fixture {
        fn config_fields(&self) -> Vec<(&'static str, FieldValue)> {
            self.fields.clone()
        }
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(sha256_hex("abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn test_normalize_scalars() {
        assert_eq!(FieldValue::Null.normalize(), "null");
        assert_eq!(FieldValue::Bool(true).normalize(), "true");
        assert_eq!(FieldValue::Int(-3).normalize(), "-3");
        assert_eq!(FieldValue::Enum("LEGENDARY").normalize(), "LEGENDARY");
        assert_eq!(FieldValue::from(Option::<&str>::None).normalize(), "null");
    }

    #[test]
    fn test_normalize_list() {
        let list = FieldValue::List(vec![FieldValue::Int(1), FieldValue::Null, "a".into()]);
        assert_eq!(list.normalize(), "[1, null, a]");
    }

    #[test]
    fn test_long_text_is_hashed() {
        let long = "x".repeat(65);
        assert_eq!(FieldValue::Text(long.clone()).normalize(), sha256_hex(&long));
        let edge = "y".repeat(64);
        assert_eq!(FieldValue::Text(edge.clone()).normalize(), edge);
    }

    #[test]
    fn test_canonical_sorts_by_name() {
        let fields = vec![("zeta", FieldValue::Int(1)), ("alpha", FieldValue::Bool(false))];
        assert_eq!(canonical_representation(&fields), "alpha=false;zeta=1;");
    }

    #[test]
    fn test_key_shape() {
        let key = derive_key(&Fixture { fields: vec![("a", FieldValue::Int(1))] });
        let (type_name, hash) = key.split_once('|').unwrap();
        assert!(type_name.ends_with("Fixture"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_ignores_field_order() {
        let a = Fixture { fields: vec![("a", 1i64.into()), ("b", "two".into())] };
        let b = Fixture { fields: vec![("b", "two".into()), ("a", 1i64.into())] };
        assert_eq!(derive_key(&a), derive_key(&b));
    }

    #[test]
    fn test_key_changes_with_any_field() {
        let base = Fixture { fields: vec![("a", 1i64.into()), ("b", "two".into())] };
        let changed = Fixture { fields: vec![("a", 1i64.into()), ("b", "three".into())] };
        assert_ne!(derive_key(&base), derive_key(&changed));
    }
}
