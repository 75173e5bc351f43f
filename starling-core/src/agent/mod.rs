//! Agent module for spawning and managing Claude Code processes

mod backend;
mod collect;
mod output;
mod run;
mod spawn;

pub use backend::{Backend, ClaudeBackend, QueryOptions};
pub use collect::{AgentResult, ResponseCollector};
pub use output::{ContentBlock, OutputStreamer, StreamEvent, StreamHandler};
pub use run::run_agent;
pub use spawn::AgentHandle;
