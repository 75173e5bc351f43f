//! Process handle for running Claude Code agents

use tokio::process::Child;

use crate::{Error, Result};

/// Handle to a running Claude Code agent process
pub struct AgentHandle {
    /// The child process (not Debug, so we skip it)
    child: Child,
    /// The prompt that was given to the agent
    prompt: String,
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandle")
            .field("prompt", &self.prompt)
            .field("child", &"<Child>")
            .finish()
    }
}

impl AgentHandle {
    /// Wrap a spawned child process
    pub fn new(child: Child, prompt: String) -> Self {
        Self { child, prompt }
    }

    /// Get mutable access to the child process for output streaming
    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    /// Wait for the process to complete and return the exit status
    pub async fn wait(&mut self) -> Result<std::process::ExitStatus> {
        self.child.wait().await.map_err(Error::Io)
    }

    /// Kill the agent process
    pub async fn kill(&mut self) -> Result<()> {
        self.child.kill().await.map_err(Error::Io)
    }
}
