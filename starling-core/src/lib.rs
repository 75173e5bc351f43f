//! Starling Core - Core library for agent-driven code review
//!
//! This crate spawns Claude Code as a subprocess, streams its JSON event
//! output, and turns noisy agent responses into validated review reports.

pub mod agent;
pub mod config;
pub mod error;
pub mod review;
pub mod secrets;

pub use agent::{
    AgentHandle, AgentResult, Backend, ClaudeBackend, QueryOptions, ResponseCollector,
};
pub use config::Config;
pub use error::{Error, Result};
pub use review::{
    Category, CodeReviewResult, Finding, Focus, ReviewOutcome, Reviewer, Severity,
};
pub use secrets::Secrets;
