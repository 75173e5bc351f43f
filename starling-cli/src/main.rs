//! Starling CLI - Command line interface for Starling
//!
//! Agent-driven code review powered by Claude Code.

mod commands;

use clap::{Parser, Subcommand};
use starling_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::ReviewArgs;

/// Starling: Agent-driven code review
#[derive(Parser, Debug)]
#[command(name = "starling")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to claude executable (overrides config and env)
    #[arg(long, global = true, env = "STARLING_CLAUDE_PATH")]
    claude_path: Option<String>,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "STARLING_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Review code for bugs, style issues, and improvements
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Show current configuration
    Config {
        /// Create a secrets file template with secure permissions
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the review output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.claude_path.clone(), cli.model.clone())?;

    if cli.verbose {
        tracing::info!(
            claude_path = %config.agent.claude_path,
            model = %config.agent.model,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("starling {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Review(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config { init: true }) => {
            let path = Secrets::create_template()?;
            println!("Created secrets template at {}", path.display());
            println!("Edit it to add your API key, or export ANTHROPIC_API_KEY instead.");
        }
        Some(Commands::Config { init: false }) => {
            println!("Starling Configuration");
            println!("======================");
            println!();
            println!("Agent Settings:");
            println!("  claude_path: {}", config.agent.claude_path);
            println!("  model: {}", config.agent.model);
            println!("  max_turns: {}", config.agent.max_turns);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            if let Some(path) = Secrets::default_secrets_path() {
                println!("Secrets file: {}", path.display());
            }
            // An unreadable secrets file still leaves the env var usable
            let key_present = Secrets::load().unwrap_or_default().api_key().is_some();
            if key_present {
                println!("API key: configured");
            } else {
                println!("API key: not set");
            }
        }
        None => {
            println!("Starling - Agent-driven code review");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
