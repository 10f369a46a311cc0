//! Caching of rendered artifacts
//!
//! [`key`] turns a generator's configuration into a stable string and
//! [`store`] keeps the rendered results for reuse.

pub mod key;
pub mod store;

pub use key::{abbreviate, derive_key, sha256_hex, CacheKeyFields, FieldValue};
pub use store::{CacheStats, GenerationCache};
