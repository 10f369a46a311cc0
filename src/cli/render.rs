//! Render commands: tooltip, item, inventory and nbt

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;

use crate::cache::GenerationCache;
use crate::config::{CliOverrides, TooltipgenConfig};
use crate::error::GeneratorError;
use crate::generator::{
    generate_cached, parse_nbt, Generator, InventoryGenerator, ItemGenerator, Resources, TooltipGenerator,
};
use crate::output::output_path_for;
use crate::sprites::SpriteSheet;
use crate::text::{PlaceholderReverseMapper, Rarity};

use super::{build_parser, load_settings, TooltipArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Inventory command options
#[derive(Debug, Clone)]
pub struct InventoryRequest {
    pub inventory: String,
    pub rows: i64,
    pub slots_per_row: i64,
    pub title: Option<String>,
    pub no_border: bool,
    pub no_background: bool,
    pub animate: bool,
}

/// Item command options
#[derive(Debug, Clone)]
pub struct ItemRequest {
    pub id: String,
    pub data: Option<String>,
    pub color: Option<String>,
    pub trim: Option<String>,
    pub enchanted: bool,
    pub hover: bool,
    pub big: bool,
    pub durability: Option<i64>,
}

fn exit_code_for(error: &GeneratorError) -> ExitCode {
    match error {
        GeneratorError::Validation(_) => ExitCode::from(EXIT_INVALID_ARGS),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Build a tooltip generator from config defaults and command-line flags.
pub(crate) fn tooltip_generator(config: &TooltipgenConfig, args: &TooltipArgs) -> Result<TooltipGenerator, ExitCode> {
    let settings = &config.tooltip;
    let mut builder = TooltipGenerator::builder()
        .name(args.name.as_str())
        .lore(args.lore.as_str())
        .alpha(settings.alpha as i64)
        .padding(settings.padding as i64)
        .padding_first_line(settings.padding_first_line && !args.no_first_line_padding)
        .max_line_length(settings.max_line_length)
        .centered(settings.centered || args.centered)
        .scale(settings.scale)
        .render_border(settings.render_border && !args.no_border);

    if let Some(name) = &args.rarity {
        match Rarity::from_name(name) {
            Some(rarity) => builder = builder.rarity(rarity),
            None => {
                eprintln!("Error: Unknown rarity '{}'", name);
                return Err(ExitCode::from(EXIT_INVALID_ARGS));
            }
        }
    }
    if let Some(item_type) = &args.item_type {
        builder = builder.item_type(item_type.as_str());
    }

    builder.build().map_err(|e| {
        eprintln!("Error: {}", e);
        exit_code_for(&e)
    })
}

fn render_to_file(
    generator: &dyn Generator,
    cache: &GenerationCache,
    resources: &Resources,
    output: &Path,
) -> ExitCode {
    let artifact = match generate_cached(generator, cache, resources) {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code_for(&e);
        }
    };

    let path = output_path_for(output, artifact.is_animated());
    if let Err(e) = artifact.save(&path) {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    let (width, height) = artifact.dimensions();
    info!("Saved {} ({}x{}, {} frame(s))", path.display(), width, height, artifact.frames().len());
    println!("{}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the tooltip command
pub fn run_tooltip(config_path: Option<&Path>, cache_enabled: Option<bool>, args: &TooltipArgs, output: &Path) -> ExitCode {
    let overrides = CliOverrides { cache_enabled, ..args.overrides() };
    let config = match load_settings(config_path, &overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let generator = match tooltip_generator(&config, args) {
        Ok(generator) => generator,
        Err(code) => return code,
    };

    let parser = match build_parser(&config) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let resources = Resources::new(Arc::new(SpriteSheet::in_memory()), parser);
    let cache = GenerationCache::new(config.cache.clone());
    render_to_file(&generator, &cache, &resources, output)
}

/// Execute the item command
pub fn run_item(
    config_path: Option<&Path>,
    cache_enabled: Option<bool>,
    resources_dir: Option<PathBuf>,
    request: &ItemRequest,
    output: Option<&Path>,
) -> ExitCode {
    let overrides = CliOverrides { cache_enabled, resources: resources_dir, ..Default::default() };
    let config = match load_settings(config_path, &overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let mut builder = ItemGenerator::builder()
        .item_id(request.id.as_str())
        .enchanted(request.enchanted)
        .hovered(request.hover)
        .big_image(request.big);
    if let Some(data) = &request.data {
        builder = builder.data(data.as_str());
    }
    if let Some(color) = &request.color {
        builder = builder.color(color.as_str());
    }
    if let Some(trim) = &request.trim {
        builder = builder.armor_trim(trim.as_str());
    }
    if let Some(durability) = request.durability {
        builder = builder.durability(durability);
    }
    let generator = match builder.build() {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code_for(&e);
        }
    };

    let resources = match load_resources(&config) {
        Ok(resources) => resources,
        Err(code) => return code,
    };
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", generator.item_id())));
    let cache = GenerationCache::new(config.cache.clone());
    render_to_file(&generator, &cache, &resources, &output)
}

/// Sprites from the configured resource directory and the placeholder parser.
fn load_resources(config: &TooltipgenConfig) -> Result<Resources, ExitCode> {
    let sprites = SpriteSheet::load(&config.resources.path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    let parser = build_parser(config).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    Ok(Resources::new(Arc::new(sprites), parser))
}

/// Build an inventory generator from command-line flags.
pub(crate) fn inventory_generator(request: &InventoryRequest) -> Result<InventoryGenerator, ExitCode> {
    let mut builder = InventoryGenerator::builder()
        .inventory(request.inventory.as_str())
        .rows(request.rows)
        .slots_per_row(request.slots_per_row)
        .draw_border(!request.no_border)
        .draw_background(!request.no_background)
        .animate_glint(request.animate);
    if let Some(title) = &request.title {
        builder = builder.title(title.as_str());
    }
    builder.build().map_err(|e| {
        eprintln!("Error: {}", e);
        exit_code_for(&e)
    })
}

/// Execute the inventory command
pub fn run_inventory(
    config_path: Option<&Path>,
    cache_enabled: Option<bool>,
    resources_dir: Option<PathBuf>,
    request: &InventoryRequest,
    output: &Path,
) -> ExitCode {
    let overrides = CliOverrides { cache_enabled, resources: resources_dir, ..Default::default() };
    let config = match load_settings(config_path, &overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let generator = match inventory_generator(request) {
        Ok(generator) => generator,
        Err(code) => return code,
    };
    let resources = match load_resources(&config) {
        Ok(resources) => resources,
        Err(code) => return code,
    };

    let cache = GenerationCache::new(config.cache.clone());
    render_to_file(&generator, &cache, &resources, output)
}

/// Execute the nbt command
///
/// With `print_only` the imported name and lore markup are printed instead
/// of rendered.
pub fn run_nbt(
    config_path: Option<&Path>,
    cache_enabled: Option<bool>,
    resources_dir: Option<PathBuf>,
    input: &Path,
    print_only: bool,
    output: &Path,
) -> ExitCode {
    let overrides = CliOverrides { cache_enabled, resources: resources_dir, ..Default::default() };
    let config = match load_settings(config_path, &overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let json = match std::fs::read_to_string(input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: Failed to read '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let imported = build_parser(&config)
        .and_then(|parser| PlaceholderReverseMapper::for_parser(&parser))
        .and_then(|mapper| parse_nbt(&json, &mapper));
    let imported = match imported {
        Ok(imported) => imported,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code_for(&e);
        }
    };

    if print_only {
        println!("{}", imported.name);
        println!("{}", imported.lore);
        return ExitCode::from(EXIT_SUCCESS);
    }

    let composer = match imported.composer() {
        Ok(composer) => composer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code_for(&e);
        }
    };
    let resources = match load_resources(&config) {
        Ok(resources) => resources,
        Err(code) => return code,
    };
    let cache = GenerationCache::new(config.cache.clone());
    render_to_file(&composer, &cache, &resources, output)
}
