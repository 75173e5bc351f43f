//! Review command - run a code review over a file or directory

use std::path::PathBuf;

use clap::Args;
use starling_core::review::{build_prompt, format_meta, render_report, validate_target};
use starling_core::{Config, Focus, Reviewer};

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// File or directory to review
    pub target: PathBuf,

    /// Review focus area (bugs, style, security, all)
    #[arg(long, default_value = "all", value_parser = parse_focus)]
    pub focus: Focus,

    /// Maximum agent turns (overrides config)
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Print the prompt that would be sent, without running the agent
    #[arg(long)]
    pub dry_run: bool,
}

/// Parse a focus area from string
fn parse_focus(s: &str) -> Result<Focus, String> {
    s.parse::<Focus>()
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if let Some(turns) = self.max_turns {
            config.agent.max_turns = turns;
        }

        if verbose {
            tracing::info!(
                path = %self.target.display(),
                focus = %self.focus,
                model = %config.agent.model,
                max_turns = config.agent.max_turns,
                "Review requested"
            );
        }

        if self.dry_run {
            let target = validate_target(&self.target)?;
            print!("{}", build_prompt(&target, self.focus));
            return Ok(());
        }

        // Progress goes to stderr; stdout carries only the report
        eprintln!("Reviewing {}", self.target.display());
        eprintln!("Focus: {} ({})", self.focus, self.focus.description());

        let reviewer = Reviewer::from_config(&config)?;
        let outcome = reviewer.review(&self.target, self.focus).await?;

        if let Some(meta) = format_meta(&outcome.agent) {
            eprintln!("{}", meta);
        }

        match outcome.report {
            Some(ref report) => println!("{}", render_report(&outcome.target, report)),
            // Structured parsing failed; show the agent's raw response
            None => println!("{}", outcome.agent.text),
        }

        Ok(())
    }
}
