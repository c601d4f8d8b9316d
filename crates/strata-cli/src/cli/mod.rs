//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use strata_core::domain::{Layer, MigrationVersion};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layer-aware scaffolds and versioned project migrations",
    long_about = "Strata keeps a generated project in step with the tool that \
                  generated it: it applies ordered, tracked migrations to the \
                  project tree and decides which scaffold documents each layer gets.",
    after_help = "EXAMPLES:\n\
        \x20 strata status\n\
        \x20 strata migrate --dry-run\n\
        \x20 strata apply 0.2.0 -C ../my-app\n\
        \x20 strata layer --layer react --source ./scaffold",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show applied, pending, and drifted migrations.
    #[command(
        visible_alias = "st",
        about = "Show migration status",
        after_help = "EXAMPLES:\n\
            \x20 strata status\n\
            \x20 strata status -C ../my-app --output-format json"
    )]
    Status,

    /// Preview a migration without writing anything.
    #[command(
        about = "Preview a migration",
        after_help = "EXAMPLES:\n\
            \x20 strata preview          # next pending migration\n\
            \x20 strata preview 0.2.0"
    )]
    Preview(PreviewArgs),

    /// Apply exactly one migration.
    #[command(
        about = "Apply a single migration",
        after_help = "EXAMPLES:\n\
            \x20 strata apply 0.2.0"
    )]
    Apply(ApplyArgs),

    /// Apply every pending migration in order.
    #[command(
        visible_alias = "up",
        about = "Apply all pending migrations",
        after_help = "EXAMPLES:\n\
            \x20 strata migrate\n\
            \x20 strata migrate --dry-run\n\
            \x20 strata migrate --to 0.2.0"
    )]
    Migrate(MigrateArgs),

    /// Resolve which scaffold documents a layer receives.
    #[command(
        about = "Show the scaffold plan for a layer",
        after_help = "EXAMPLES:\n\
            \x20 strata layer --layer sdk --source ./scaffold\n\
            \x20 strata layer --layer react --source ./scaffold --format json"
    )]
    Layer(LayerArgs),

    /// Initialise a Strata configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init\n\
            \x20 strata init --force"
    )]
    Init(InitArgs),

    /// Inspect the Strata configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get project.layer\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── preview / apply / migrate ─────────────────────────────────────────────────

/// Arguments for `strata preview`.
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Version to preview; defaults to the next pending migration.
    #[arg(value_name = "VERSION", help = "Migration version (e.g. 0.2.0)")]
    pub version: Option<MigrationVersion>,
}

/// Arguments for `strata apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[arg(value_name = "VERSION", help = "Migration version (e.g. 0.2.0)")]
    pub version: MigrationVersion,
}

/// Arguments for `strata migrate`.
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Preview every pending migration instead of applying it.
    #[arg(long = "dry-run", help = "Show what would change without writing")]
    pub dry_run: bool,

    /// Stop after this version (inclusive).
    #[arg(
        long = "to",
        value_name = "VERSION",
        help = "Stop after this version"
    )]
    pub to: Option<MigrationVersion>,
}

// ── layer ─────────────────────────────────────────────────────────────────────

/// Arguments for `strata layer`.
#[derive(Debug, Args)]
pub struct LayerArgs {
    /// Layer to resolve; falls back to `project.layer` from the config.
    #[arg(
        short = 'l',
        long = "layer",
        value_name = "LAYER",
        help = "Layer: sdk, framework, react, app"
    )]
    pub layer: Option<Layer>,

    /// Scaffold source directory holding `targets/` and `commands/`.
    #[arg(
        short = 's',
        long = "source",
        value_name = "DIR",
        help = "Scaffold source directory"
    )]
    pub source: PathBuf,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: PlanFormat,
}

/// Output format for the `layer` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Human-readable table.
    Table,
    /// JSON object.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `strata config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `project.layer`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
