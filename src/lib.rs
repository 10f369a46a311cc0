//! tooltipgen - Item tooltip and sprite image generation
//!
//! This library provides functionality to:
//! - Expand `%%placeholder%%` markup and wrap `&`-coded text into lines
//! - Assemble tooltip panels from styled lines, animated when obfuscated
//! - Recolor item sprites through overlays and run the effect pipeline
//! - Lay items out in inventory grids and import items from NBT
//! - Cache rendered images under keys derived from generator configuration

pub mod cache;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod effect;
pub mod error;
pub mod font;
pub mod format;
pub mod generator;
pub mod gif;
pub mod inventory;
pub mod output;
pub mod overlay;
pub mod sprites;
pub mod text;
pub mod tooltip;
