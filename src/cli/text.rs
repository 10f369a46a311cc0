//! Markup inspection commands: parse, wrap and key

use std::path::Path;
use std::process::ExitCode;

use crate::cache::derive_key;
use crate::config::CliOverrides;
use crate::text::{wrap_legacy, PlaceholderReverseMapper};

use super::render::tooltip_generator;
use super::{build_parser, load_settings, TooltipArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the parse command, or its reverse with `reverse`
pub fn run_parse(config_path: Option<&Path>, text: &str, reverse: bool) -> ExitCode {
    let config = match load_settings(config_path, &CliOverrides::default()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let output = build_parser(&config).and_then(|parser| {
        if reverse {
            PlaceholderReverseMapper::for_parser(&parser).map(|mapper| mapper.map_placeholders(text))
        } else {
            Ok(parser.parse(text))
        }
    });
    match output {
        Ok(output) => {
            println!("{}", output);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the wrap command
pub fn run_wrap(text: &str, max: usize) -> ExitCode {
    if max == 0 {
        eprintln!("Error: --max must be at least 1");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    for line in wrap_legacy(text, max) {
        println!("{}", line);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the key command
pub fn run_key(config_path: Option<&Path>, args: &TooltipArgs) -> ExitCode {
    let config = match load_settings(config_path, &args.overrides()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match tooltip_generator(&config, args) {
        Ok(generator) => {
            println!("{}", derive_key(&generator));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(code) => code,
    }
}
