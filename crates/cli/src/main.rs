use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use cmdtree_cli::cli_args::Args;
use cmdtree_cli::shell::{self, colors::Theme, report};
use cmdtree_core::error::Result;
use cmdtree_core::resolver::{Resolver, Status};
use cmdtree_core::validation::ValidatorRegistry;
use cmdtree_core::{config, file_handling};

/// Load the definitions file and register it with a fresh resolver.
fn initialize(args: &Args) -> Result<(Resolver, Theme)> {
    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{}`", config_path);

    let definitions = file_handling::load_definitions(&config_path)?;
    info!("Loaded {} command(s)", definitions.command_count());

    let mut resolver = Resolver::new(ValidatorRegistry::with_builtins());
    definitions.register(&mut resolver)?;
    let theme = Theme::with_overrides(definitions.theme())?;

    Ok((resolver, theme))
}

fn execute() -> Result<ExitCode> {
    let args = Args::parse();
    let (mut resolver, theme) = initialize(&args)?;
    if !args.unlocked() {
        debug!("Access mask: {:#x}", args.mask);
    }

    match &args.line {
        Some(line) => {
            resolver.set_line(line);
            let status = resolver.resolve(args.mask)?;
            println!("{}", report::report(&resolver, args.mask));
            Ok(if status == Status::ValidCommand {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            shell::run(&mut resolver, args.mask, &args.prompt, theme)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
