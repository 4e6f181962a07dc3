use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};

use crate::backup::ConflictResolution;
use crate::config::DEFAULT_CONFIG_PATH;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "quire")]
#[command(bin_name = "quire")]
#[command(version)]
#[command(about = "Back up, restore and copy writing projects")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "QUIRE_DB_PATH",
        default_value = ".quire/quire.sqlite",
        help = "Path to the local SQLite project store."
    )]
    pub db: String,

    #[arg(
        short = 'c',
        long,
        env = "QUIRE_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Path to the TOML configuration file."
    )]
    pub config: PathBuf,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Log debug detail to stderr (overrides QUIRE_LOG)."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List local projects.")]
    Projects(ProjectsArgs),
    #[command(about = "Write one project to a backup file.")]
    Export(ExportArgs),
    #[command(name = "export-full", about = "Write every project and app settings to a backup file.")]
    ExportFull(ExportFullArgs),
    #[command(about = "Validate a backup file and summarize its contents.")]
    Inspect(InspectArgs),
    #[command(about = "Import a backup file into the local store.")]
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[arg(long, help = "Print JSON output.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(help = "Project id.")]
    pub id: String,

    #[arg(
        short = 'o',
        long = "out-dir",
        help = "Directory to write into (defaults to config backup_dir)."
    )]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportFullArgs {
    #[arg(
        short = 'o',
        long = "out-dir",
        help = "Directory to write into (defaults to config backup_dir)."
    )]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[arg(help = "Backup file to validate.")]
    pub file: PathBuf,

    #[arg(long, help = "Print JSON output.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(help = "Backup file to import.")]
    pub file: PathBuf,

    #[arg(
        long = "conflict",
        help = "What to do with projects that already exist: skip, replace or duplicate."
    )]
    pub conflict: Option<ConflictResolution>,

    #[arg(
        long = "restore-settings",
        help = "Also restore app settings and dictionary from a full backup."
    )]
    pub restore_settings: bool,

    #[arg(long, help = "Print JSON output.")]
    pub json: bool,
}
