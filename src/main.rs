mod cli;
mod commands;
mod confgen;
mod declaration;
mod engine;
mod error;
mod platform;
mod resource;
mod schema;
mod settings;
mod state;
mod system;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use declaration::Declaration;
use resource::ServiceAction;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if let Command::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let mut declaration = Declaration::load(&cli.declaration)?;

    match cli.command {
        Command::Install(args) => {
            if let Some(version) = args.package_version {
                declaration.version = version;
            }
            if let Some(config_path) = args.config_path {
                declaration.config_path = config_path;
            }
            commands::apply::install(&ctx, &declaration, args.dry_run)
        }
        Command::Uninstall(args) => commands::apply::uninstall(&ctx, &declaration, args.dry_run),
        Command::Enable => commands::service::run(&ctx, &declaration, ServiceAction::Enable),
        Command::Disable => commands::service::run(&ctx, &declaration, ServiceAction::Disable),
        Command::Start => commands::service::run(&ctx, &declaration, ServiceAction::Start),
        Command::Stop => commands::service::run(&ctx, &declaration, ServiceAction::Stop),
        Command::Status => commands::status::run(&ctx, &declaration),
        Command::Generate => commands::generate::generate(&ctx, &declaration),
        Command::Diff => commands::generate::diff(&ctx, &declaration),
        Command::Completions { .. } => unreachable!("handled above"),
    }
}
