//! Backend abstraction for AI coding agents

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::DEFAULT_MAX_TURNS;
use crate::{Error, Result};

use super::spawn::AgentHandle;

/// Per-query options passed to a backend
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Maximum number of agent turns before the backend stops
    pub max_turns: u32,

    /// System prompt establishing the agent's role
    pub system_prompt: Option<String>,

    /// Working directory for the agent process
    pub cwd: Option<PathBuf>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            system_prompt: None,
            cwd: None,
        }
    }
}

/// Trait for AI coding backends
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &'static str;

    /// Build the command to spawn this backend
    fn build_command(&self, options: &QueryOptions) -> Command;

    /// Spawn an agent with a prompt
    async fn spawn(&self, prompt: &str, options: &QueryOptions) -> Result<AgentHandle>;
}

/// Claude Code backend implementation
#[derive(Debug, Clone)]
pub struct ClaudeBackend {
    claude_path: String,
    model: Option<String>,
    allowed_tools: Vec<String>,
    env_vars: HashMap<String, String>,
}

impl ClaudeBackend {
    /// Create a new Claude backend with default settings
    pub fn new() -> Self {
        Self {
            claude_path: "claude".to_string(),
            model: None,
            allowed_tools: Vec::new(),
            env_vars: HashMap::new(),
        }
    }

    /// Create a Claude backend with custom path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.claude_path = path.into();
        self
    }

    /// Create a Claude backend with a specific model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add an allowed tool
    pub fn with_allowed_tool(mut self, tool: impl Into<String>) -> Self {
        self.allowed_tools.push(tool.into());
        self
    }

    /// Set allowed tools
    pub fn with_allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.allowed_tools = tools;
        self
    }

    /// Add an environment variable for the agent process
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

impl Default for ClaudeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for ClaudeBackend {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn build_command(&self, options: &QueryOptions) -> Command {
        let mut cmd = Command::new(&self.claude_path);
        cmd.arg("--print")
            .arg("--verbose")
            .arg("--output-format")
            .arg("stream-json")
            .arg("--dangerously-skip-permissions")
            .arg("--max-turns")
            .arg(options.max_turns.to_string());

        if let Some(ref model) = self.model {
            cmd.arg("--model").arg(model);
        }

        if let Some(ref system_prompt) = options.system_prompt {
            cmd.arg("--system-prompt").arg(system_prompt);
        }

        if !self.allowed_tools.is_empty() {
            cmd.arg("--allowedTools");
            for tool in &self.allowed_tools {
                cmd.arg(tool);
            }
        }

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = options.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd
    }

    async fn spawn(&self, prompt: &str, options: &QueryOptions) -> Result<AgentHandle> {
        if let Some(ref cwd) = options.cwd {
            if !cwd.exists() {
                return Err(Error::Agent(format!(
                    "Working directory does not exist: {}",
                    cwd.display()
                )));
            }
        }

        let mut cmd = self.build_command(options);
        // --allowedTools is variadic and would swallow the prompt without
        // an explicit end of options.
        cmd.arg("--").arg(prompt);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Agent(format!(
                    "Claude executable not found at '{}'. Is Claude Code installed?",
                    self.claude_path
                ))
            } else {
                Error::Io(e)
            }
        })?;

        Ok(AgentHandle::new(child, prompt.to_string()))
    }
}
