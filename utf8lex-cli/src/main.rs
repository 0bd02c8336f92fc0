//! utf8lex CLI - generate, validate and scaffold UTF-8 lexers.
//!
//! This is the main entry point for the utf8lex CLI application. It uses
//! clap for argument parsing and dispatches to appropriate command handlers
//! based on user input.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    check::{run_check, CheckArgs},
    generate::{run_generate, GenerateArgs},
    init::{run_init, InitArgs},
};
use config::Config;

/// utf8lex - a CLI front end for the utf8lex lexer generator.
#[derive(Parser, Debug)]
#[command(name = "utf8lex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate, validate and scaffold UTF-8 lexers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase logging verbosity (repeatable: -v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, env = "UTF8LEX_VERBOSE")]
    verbose: u8,

    /// Path to a utf8lex.toml project configuration file
    #[arg(long, global = true, env = "UTF8LEX_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "UTF8LEX_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the utf8lex CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold a new lexer project
    Init(InitCommandArgs),

    /// Generate a lexer from a spec file
    Generate(GenerateCommandArgs),

    /// Validate a spec file without generating output
    Check(CheckCommandArgs),
}

/// Arguments for the init subcommand.
#[derive(Parser, Debug)]
struct InitCommandArgs {
    /// Directory to initialize (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Force initialization even if directory is not empty
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the generate subcommand.
#[derive(Parser, Debug)]
struct GenerateCommandArgs {
    /// Path to the spec file
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// Directory holding code-emission templates
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Path the generated source is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target host language (rust, c)
    #[arg(short, long)]
    lang: Option<String>,
}

/// Arguments for the check subcommand.
#[derive(Parser, Debug)]
struct CheckCommandArgs {
    /// Path to the spec file to validate
    #[arg(short, long)]
    spec: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    let config = load_config(cli.config.as_deref())?;

    execute_command(cli.command, cli.verbose > 0, config)
}

/// Initialize the logging system.
fn init_logging(verbose: u8, no_color: bool) -> anyhow::Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Execute the selected command.
fn execute_command(command: Commands, verbose: bool, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => execute_init(args, verbose),
        Commands::Generate(args) => execute_generate(args, verbose, config),
        Commands::Check(args) => execute_check(args, verbose, config),
    }
}

fn execute_init(args: InitCommandArgs, verbose: bool) -> anyhow::Result<()> {
    let init_args = InitArgs { verbose, force: args.force, path: args.path };
    run_init(init_args).context("initializing project")?;
    Ok(())
}

fn execute_generate(args: GenerateCommandArgs, verbose: bool, config: Config) -> anyhow::Result<()> {
    let spec = args.spec.unwrap_or_else(|| PathBuf::from(&config.spec));
    let output = args.output.unwrap_or_else(|| PathBuf::from(&config.output));
    let lang = args.lang.unwrap_or(config.lang);
    let templates_dir = args
        .templates_dir
        .or_else(|| Some(PathBuf::from(&config.templates_dir)));

    let generate_args = GenerateArgs { verbose, spec, templates_dir, output, lang };
    run_generate(generate_args).context("generating lexer")?;
    Ok(())
}

fn execute_check(args: CheckCommandArgs, verbose: bool, config: Config) -> anyhow::Result<()> {
    let spec = args.spec.unwrap_or_else(|| PathBuf::from(&config.spec));
    let check_args = CheckArgs { verbose, spec };
    run_check(check_args).context("checking spec file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_init() {
        let cli = Cli::parse_from(["utf8lex", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn parses_init_with_path_and_force() {
        let cli = Cli::parse_from(["utf8lex", "init", "--path", "/tmp/test", "--force"]);
        if let Commands::Init(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("/tmp/test")));
            assert!(args.force);
        } else {
            panic!("expected Init command");
        }
    }

    #[test]
    fn parses_generate_with_all_options() {
        let cli = Cli::parse_from([
            "utf8lex",
            "generate",
            "--spec",
            "grammar.utf8lex",
            "--output",
            "out.rs",
            "--lang",
            "rust",
        ]);
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.spec, Some(PathBuf::from("grammar.utf8lex")));
            assert_eq!(args.output, Some(PathBuf::from("out.rs")));
            assert_eq!(args.lang, Some("rust".to_string()));
        } else {
            panic!("expected Generate command");
        }
    }

    #[test]
    fn parses_check() {
        let cli = Cli::parse_from(["utf8lex", "check", "--spec", "grammar.utf8lex"]);
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.spec, Some(PathBuf::from("grammar.utf8lex")));
        } else {
            panic!("expected Check command");
        }
    }

    #[test]
    fn repeated_verbose_flag_counts() {
        let cli = Cli::parse_from(["utf8lex", "-vv", "init"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parses_global_no_color() {
        let cli = Cli::parse_from(["utf8lex", "--no-color", "init"]);
        assert!(cli.no_color);
    }

    #[test]
    fn parses_global_config_path() {
        let cli = Cli::parse_from(["utf8lex", "--config", "/path/to/utf8lex.toml", "init"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/utf8lex.toml")));
    }
}
