//! CLI command definitions using Clap.
//!
//! - `config_cmd` - Configuration file commands
//! - `run` - Scenario runner

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config;
use crate::error::AppError;

pub mod config_cmd;
pub mod run;

pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sticky Windows CLI - pin regions to the edges of a window layout.
#[derive(Parser, Debug)]
#[command(name = "sticky")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments). `~` is expanded.
    #[arg(long, short, global = true, value_name = "PATH", env = "STICKY_WINDOWS_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run a layout scenario script.
    ///
    /// Replays the script's steps against an in-memory layout with sticky
    /// regions and prints the resulting regions.
    #[command(after_long_help = r#"Examples:
  sticky run demo.jsonc              # Print the final layout as a table
  sticky run demo.jsonc --trace      # Print every step as it runs
  sticky run demo.jsonc --json       # Print the full report as JSON
  cat demo.jsonc | sticky run -      # Read the script from stdin"#)]
    Run {
        /// Scenario script (JSONC). Use `-` to read from stdin.
        #[arg(value_name = "SCRIPT")]
        script: String,

        /// Print the report as JSON.
        #[arg(long, short)]
        json: bool,

        /// Print each step and the layout after it.
        #[arg(long, short)]
        trace: bool,

        /// Exit with an error if any step failed.
        #[arg(long)]
        strict: bool,
    },

    /// Configuration file management commands.
    ///
    /// Initialize, view, and locate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(sticky completions --shell zsh)"
    ///   sticky completions --shell fish > ~/.config/fish/completions/sticky.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_deref().map(expand_path) }

    /// Returns the default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), AppError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(AppError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Run { script, json, trace, strict } => {
                run::execute(&run::RunOptions {
                    script: expand_path(script),
                    json: *json,
                    trace: *trace,
                    strict: *strict,
                })
            }
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Schema => {
                println!("{}", config::generate_schema_json());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "sticky", &mut io::stdout());
    }
}

/// Expands a leading `~` to the home directory.
fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    if path == "-" {
        return PathBuf::from(path);
    }
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
