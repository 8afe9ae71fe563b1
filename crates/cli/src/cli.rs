//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sketchgen - firmware sketch generator for modular sensor/actuator boards
#[derive(Parser, Debug)]
#[command(
    name = "sketchgen",
    author,
    version,
    about = "Generate and build firmware sketches from module declarations",
    long_about = "Generates a single firmware sketch from a project's module types and\n\
                  module instances, optionally extended by code-contributing plugins,\n\
                  then installs the required libraries and builds it with PlatformIO."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SKETCHGEN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SKETCHGEN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Project root (must contain platformio.ini)
    #[arg(
        short,
        long,
        default_value = ".",
        global = true,
        env = "SKETCHGEN_PROJECT_DIR"
    )]
    pub project_dir: PathBuf,

    /// Project configuration file (default: <project>/sketchgen.toml)
    #[arg(short, long, global = true, env = "SKETCHGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the sketch
    Generate(GenerateArgs),

    /// Generate, install libraries and build (or upload) with PlatformIO
    Build(BuildArgs),

    /// Check the project without writing anything
    Validate(ValidateArgs),

    /// Display resolved modules
    Info(InfoArgs),

    /// Create a minimal project skeleton
    Init(InitArgs),

    /// List registered plugins
    Plugins,
}

/// Overrides applied on top of the `[sketch]` table
#[derive(Args, Debug, Clone, Default)]
pub struct SketchOverrides {
    /// Enabled I/O category (repeatable; replaces the configured list)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Plugin to run (repeatable; replaces the configured list)
    #[arg(long = "plugin", value_name = "PLUGIN")]
    pub plugins: Vec<String>,

    /// Status update interval in seconds
    #[arg(long, value_name = "SECS", env = "SKETCHGEN_STATUS_INTERVAL")]
    pub status_interval: Option<f64>,
}

/// Arguments for the `generate` command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub overrides: SketchOverrides,

    /// Print the sketch to stdout instead of writing it
    #[arg(long)]
    pub stdout: bool,

    /// Write Prometheus-format run metrics to this file
    #[arg(long, value_name = "FILE", env = "SKETCHGEN_METRICS_OUT")]
    pub metrics_out: Option<PathBuf>,
}

/// Arguments for the `build` command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub overrides: SketchOverrides,

    /// What the toolchain should do
    #[arg(long, value_enum, default_value = "build")]
    pub target: TargetArg,

    /// Per-command timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "SKETCHGEN_TIMEOUT")]
    pub timeout: u64,

    /// Do not install libraries before building
    #[arg(long)]
    pub skip_install: bool,

    /// PlatformIO executable
    #[arg(long, default_value = "pio", env = "SKETCHGEN_PIO")]
    pub pio: PathBuf,

    /// Write Prometheus-format run metrics to this file
    #[arg(long, value_name = "FILE", env = "SKETCHGEN_METRICS_OUT")]
    pub metrics_out: Option<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show each module's exposed ports
    #[arg(long)]
    pub ports: bool,

    /// Show resolved library dependencies
    #[arg(long)]
    pub deps: bool,
}

/// Arguments for the `init` command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// PlatformIO board ID
    #[arg(long, default_value = "uno")]
    pub board: String,

    /// PlatformIO platform
    #[arg(long, default_value = "atmelavr")]
    pub platform: String,

    /// Overwrite existing platformio.ini / sketchgen.toml
    #[arg(long)]
    pub force: bool,
}

/// Toolchain target
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetArg {
    /// Compile only
    #[default]
    Build,
    /// Compile and flash
    Upload,
}

impl From<TargetArg> for toolchain::BuildTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Build => toolchain::BuildTarget::Build,
            TargetArg::Upload => toolchain::BuildTarget::Upload,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_overrides_parse() {
        let cli = Cli::try_parse_from([
            "sketchgen",
            "-p",
            "/tmp/board",
            "generate",
            "--category",
            "environmental",
            "--category",
            "status",
            "--plugin",
            "csv",
            "--status-interval",
            "2.5",
            "--stdout",
        ])
        .unwrap();

        assert_eq!(cli.project_dir, PathBuf::from("/tmp/board"));
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.overrides.categories, vec!["environmental", "status"]);
                assert_eq!(args.overrides.plugins, vec!["csv"]);
                assert_eq!(args.overrides.status_interval, Some(2.5));
                assert!(args.stdout);
            }
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["sketchgen", "build", "--target", "upload"]).unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.target, TargetArg::Upload);
                assert!(!args.skip_install);
                assert_eq!(args.pio, PathBuf::from("pio"));
            }
            other => panic!("expected build, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sketchgen", "-q", "-v", "plugins"]).is_err());
    }
}
