use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hipachectl")]
#[command(version)]
#[command(about = "Declarative installer and lifecycle manager for the Hipache reverse proxy", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML declaration file
    #[arg(
        short,
        long,
        global = true,
        env = "HIPACHECTL_DECLARATION",
        default_value = crate::declaration::DEFAULT_DECLARATION
    )]
    pub declaration: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install the package, init script, and config file
    Install(InstallArgs),

    /// Stop the service and remove the package, config, and init script
    Uninstall(ApplyArgs),

    /// Enable the service at boot
    Enable,

    /// Disable the service at boot
    Disable,

    /// Start the service
    Start,

    /// Stop the service
    Stop,

    /// Show installed/enabled/running state of the declared instance
    Status,

    /// Print the generated configuration document
    Generate,

    /// Show a diff between the on-disk config file and the generated one
    Diff,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Don't make changes, just show what would happen
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct InstallArgs {
    /// Don't make changes, just show what would happen
    #[arg(long)]
    pub dry_run: bool,

    /// Package version to install ('latest' or 'x.y.z'), overriding the
    /// declaration file
    #[arg(long, value_name = "VERSION")]
    pub package_version: Option<String>,

    /// Config file destination, overriding the declaration file
    #[arg(long, value_name = "PATH")]
    pub config_path: Option<PathBuf>,
}
