//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod render;
mod text;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, loader::merge_cli_overrides, CliOverrides, ConfigError, TooltipgenConfig};
use crate::error::GeneratorResult;
use crate::text::{GemstoneTable, PlaceholderParser, StatTable};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// tooltipgen - Render item tooltips and sprites to PNG or GIF
#[derive(Parser)]
#[command(name = "tooltipgen")]
#[command(about = "tooltipgen - Render item tooltips and sprites to PNG or GIF")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of searching for tooltipgen.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable or disable the render cache (overrides config)
    #[arg(long, global = true)]
    pub cache: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Tooltip content and layout options
#[derive(Args, Debug, Clone, Default)]
pub struct TooltipArgs {
    /// Item name, drawn as the first line
    #[arg(long, default_value = "")]
    pub name: String,

    /// Rarity such as `epic` or `very_special`
    #[arg(long)]
    pub rarity: Option<String>,

    /// Lore markup; separate lines with `\n`
    #[arg(long, default_value = "")]
    pub lore: String,

    /// Item type shown after the rarity in the footer
    #[arg(long = "type")]
    pub item_type: Option<String>,

    /// Wrap lore at this many visible characters (1-128)
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Background alpha (0-255)
    #[arg(long)]
    pub alpha: Option<u8>,

    /// Transparent border around the panel in pixels
    #[arg(long)]
    pub padding: Option<u32>,

    /// Pixel scale (1-8)
    #[arg(long)]
    pub scale: Option<u32>,

    /// Center each line horizontally
    #[arg(long)]
    pub centered: bool,

    /// Skip the purple border
    #[arg(long)]
    pub no_border: bool,

    /// Don't add the extra gap under the first line
    #[arg(long)]
    pub no_first_line_padding: bool,
}

impl TooltipArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            alpha: self.alpha,
            padding: self.padding,
            scale: self.scale,
            max_line_length: self.max_line_length,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render an item tooltip
    Tooltip {
        #[command(flatten)]
        tooltip: TooltipArgs,

        /// Output file; the extension is switched to .gif for animations
        #[arg(short, long, default_value = "tooltip.png")]
        output: PathBuf,
    },

    /// Render an item sprite with its effects
    Item {
        /// Item id, with or without the `minecraft:` namespace
        id: String,

        /// Overlay color option (dye name or hex color)
        #[arg(long)]
        data: Option<String>,

        /// Explicit overlay color, takes precedence over --data
        #[arg(long)]
        color: Option<String>,

        /// Armor trim material
        #[arg(long)]
        trim: Option<String>,

        /// Add the enchantment glint
        #[arg(long)]
        enchanted: bool,

        /// Add the inventory hover highlight
        #[arg(long)]
        hover: bool,

        /// Enlarge small sprites ten times
        #[arg(long)]
        big: bool,

        /// Durability bar fill in percent (0-100)
        #[arg(long)]
        durability: Option<i64>,

        /// Resource directory (overrides config)
        #[arg(long)]
        resources: Option<PathBuf>,

        /// Output file; defaults to `<id>.png`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render an inventory grid from an inventory string
    Inventory {
        /// Items such as `stone:1,32%%diamond_sword,enchant:[2-4]`
        inventory: String,

        /// Number of rows
        #[arg(long, default_value = "3")]
        rows: i64,

        /// Slots in each row
        #[arg(long, default_value = "9")]
        per_row: i64,

        /// Title drawn above the slots
        #[arg(long)]
        title: Option<String>,

        /// Skip the panel border
        #[arg(long)]
        no_border: bool,

        /// Skip the panel and slot backgrounds
        #[arg(long)]
        no_background: bool,

        /// Animate enchanted items
        #[arg(long)]
        animate: bool,

        /// Resource directory (overrides config)
        #[arg(long)]
        resources: Option<PathBuf>,

        /// Output file; the extension is switched to .gif for animations
        #[arg(short, long, default_value = "inventory.png")]
        output: PathBuf,
    },

    /// Render an item and its tooltip from a JSON NBT dump
    Nbt {
        /// JSON file holding the item
        file: PathBuf,

        /// Print the imported name and lore markup instead of rendering
        #[arg(long)]
        print: bool,

        /// Resource directory (overrides config)
        #[arg(long)]
        resources: Option<PathBuf>,

        /// Output file; the extension is switched to .gif for animations
        #[arg(short, long, default_value = "item.png")]
        output: PathBuf,
    },

    /// Print text with placeholders expanded
    Parse {
        text: String,

        /// Turn rendered stat text back into placeholders instead
        #[arg(long)]
        reverse: bool,
    },

    /// Print text wrapped into legacy-coded lines
    Wrap {
        text: String,

        /// Maximum visible characters per line
        #[arg(long, default_value = "36")]
        max: usize,
    },

    /// Print the cache key of a tooltip configuration
    Key {
        #[command(flatten)]
        tooltip: TooltipArgs,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the config file and apply command-line overrides.
pub(crate) fn load_settings(path: Option<&Path>, overrides: &CliOverrides) -> Result<TooltipgenConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    if let Err(e) = merge_cli_overrides(&mut config, overrides) {
        eprintln!("Error: {}", e);
        let code = if matches!(e, ConfigError::Validation(_)) { EXIT_INVALID_ARGS } else { EXIT_ERROR };
        return Err(ExitCode::from(code));
    }

    Ok(config)
}

/// Placeholder parser using the configured stat table, if any.
pub(crate) fn build_parser(config: &TooltipgenConfig) -> GeneratorResult<Arc<PlaceholderParser>> {
    let stats = match &config.resources.stats {
        Some(path) => StatTable::load(path)?,
        None => StatTable::builtin(),
    };
    Ok(Arc::new(PlaceholderParser::new(stats, GemstoneTable::builtin())))
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let cache = cli.cache;

    match cli.command {
        Commands::Tooltip { tooltip, output } => render::run_tooltip(config_path, cache, &tooltip, &output),
        Commands::Item { id, data, color, trim, enchanted, hover, big, durability, resources, output } => {
            let request = render::ItemRequest { id, data, color, trim, enchanted, hover, big, durability };
            render::run_item(config_path, cache, resources, &request, output.as_deref())
        }
        Commands::Inventory {
            inventory,
            rows,
            per_row,
            title,
            no_border,
            no_background,
            animate,
            resources,
            output,
        } => {
            let request = render::InventoryRequest {
                inventory,
                rows,
                slots_per_row: per_row,
                title,
                no_border,
                no_background,
                animate,
            };
            render::run_inventory(config_path, cache, resources, &request, &output)
        }
        Commands::Nbt { file, print, resources, output } => {
            render::run_nbt(config_path, cache, resources, &file, print, &output)
        }
        Commands::Parse { text, reverse } => text::run_parse(config_path, &text, reverse),
        Commands::Wrap { text, max } => text::run_wrap(&text, max),
        Commands::Key { tooltip } => text::run_key(config_path, &tooltip),
    }
}
