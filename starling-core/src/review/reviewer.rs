//! Review orchestration
//!
//! [`Reviewer`] ties the pieces together: validate the target, build the
//! prompt, run the agent, and extract the structured result.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::agent::{run_agent, AgentResult, Backend, ClaudeBackend, QueryOptions};
use crate::config::Config;
use crate::secrets::Secrets;
use crate::{Error, Result};

use super::extract::extract_review;
use super::focus::Focus;
use super::prompt::build_prompt;
use super::report::CodeReviewResult;

/// System prompt establishing the reviewer role
const SYSTEM_PROMPT: &str = "You are a senior code reviewer. Be thorough but concise.";

/// Tools the review agent may use; read-only, no writes
const ALLOWED_TOOLS: &[&str] = &["Read", "Glob", "Grep"];

/// Outcome of one review run
#[derive(Debug)]
pub struct ReviewOutcome {
    /// Resolved path that was reviewed
    pub target: PathBuf,

    /// Aggregated agent output and run metadata
    pub agent: AgentResult,

    /// Validated structured result, when the agent produced one
    pub report: Option<CodeReviewResult>,
}

/// Drives code reviews through an agent backend
pub struct Reviewer {
    backend: Box<dyn Backend>,
    max_turns: u32,
}

impl Reviewer {
    /// Create a reviewer from configuration
    ///
    /// Resolves the Anthropic API key up front (failing with guidance when
    /// it is unset) and builds a Claude backend restricted to read-only
    /// tools.
    pub fn from_config(config: &Config) -> Result<Self> {
        let secrets = Secrets::load()?;
        let api_key = secrets.require_api_key()?;

        let backend = ClaudeBackend::new()
            .with_path(&config.agent.claude_path)
            .with_model(&config.agent.model)
            .with_allowed_tools(ALLOWED_TOOLS.iter().map(|t| (*t).to_string()).collect())
            .with_env("ANTHROPIC_API_KEY", api_key);

        Ok(Self {
            backend: Box::new(backend),
            max_turns: config.agent.max_turns,
        })
    }

    /// Create a reviewer over an explicit backend
    pub fn with_backend(backend: Box<dyn Backend>, max_turns: u32) -> Self {
        Self { backend, max_turns }
    }

    /// Review the target and extract a structured result
    ///
    /// The target must be a regular file or directory; anything else is
    /// rejected before the agent is spawned. A response the extractor
    /// cannot validate is not an error: the outcome carries `report: None`
    /// and the raw text.
    pub async fn review(&self, target: &Path, focus: Focus) -> Result<ReviewOutcome> {
        let target = validate_target(target)?;

        info!(path = %target.display(), focus = %focus, "Starting code review");

        let prompt = build_prompt(&target, focus);
        let options = QueryOptions {
            max_turns: self.max_turns,
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            cwd: None,
        };

        let agent = run_agent(self.backend.as_ref(), &prompt, &options).await?;

        let report = extract_review(&agent.text);
        if report.is_none() {
            debug!("Agent response did not contain a valid structured result");
        }

        Ok(ReviewOutcome {
            target,
            agent,
            report,
        })
    }
}

/// Check that a review target is a regular file or directory
///
/// Returns the canonicalized path. Special files (pipes, sockets,
/// devices) and missing paths are rejected here, before any agent is
/// spawned.
pub fn validate_target(target: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Target(format!("Target not found: {}", target.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let file_type = metadata.file_type();
    if file_type.is_file() || file_type.is_dir() {
        std::fs::canonicalize(target).map_err(Error::Io)
    } else {
        Err(Error::Target(format!(
            "Target {} is a {}, not a regular file or directory",
            target.display(),
            describe_file_type(&file_type)
        )))
    }
}

#[cfg(unix)]
fn describe_file_type(file_type: &std::fs::FileType) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_fifo() {
        "named pipe"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_char_device() {
        "character device"
    } else if file_type.is_block_device() {
        "block device"
    } else {
        "special file"
    }
}

#[cfg(not(unix))]
fn describe_file_type(_file_type: &std::fs::FileType) -> &'static str {
    "special file"
}
