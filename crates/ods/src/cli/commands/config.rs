//! Implementation of `ods config`.

use std::process::ExitCode;

use ods_config::is_global_config;

use crate::cli::context::CommandContext;

/// Shows discovered configuration files and the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let style = ctx.style;
    let config_files = match ctx.source.files() {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", style.header("Config files (highest precedence first):"));
    if config_files.is_empty() {
        println!("  {}", style.dim("(none found; run 'ods init' to create one)"));
    }
    for path in &config_files {
        if ctx.source.is_explicit() {
            println!("  {} {}", path.display(), style.dim("(explicit)"));
        } else if is_global_config(path) {
            println!("  {} {}", path.display(), style.dim("(global)"));
        } else {
            println!("  {}", path.display());
        }
    }
    println!();

    let settings = match ctx.config.settings_to_toml() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", style.header("Effective settings:"));
    print!("{settings}");
    ExitCode::SUCCESS
}
