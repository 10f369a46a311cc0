//! Markup handling: placeholder expansion, formatted segments and wrapping
//!
//! Text flows through this module in one direction:
//!
//! 1. [`PlaceholderParser`] expands `%%name[:extra]%%` tokens into legacy
//!    `&`-coded text.
//! 2. [`wrap`] splits the result into lines no wider than the configured
//!    visible length, carrying the active color and formats across breaks.
//! 3. [`LineSegment::parse_legacy`] turns each line into styled runs for
//!    the tooltip renderer.
//!
//! [`PlaceholderReverseMapper`] runs the first step backwards, turning
//! rendered stat lines into placeholders again.

pub mod gemstone;
pub mod placeholder;
pub mod rarity;
pub mod reverse;
pub mod segment;
pub mod stats;
pub mod wrapper;

pub use gemstone::{Gemstone, GemstoneTable};
pub use placeholder::{find_placeholder, Placeholder, PlaceholderParser};
pub use rarity::{extract_footer, FooterExtraction, Rarity};
pub use reverse::PlaceholderReverseMapper;
pub use segment::{colorize, LineSegment, TextSegment};
pub use stats::{ParseType, StatDefinition, StatTable};
pub use wrapper::{normalize_newlines, split_lines, wrap, wrap_legacy, FormatState, LineWrapper};
