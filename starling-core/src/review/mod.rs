//! Code review workflow
//!
//! This module drives a single review: build the prompt, run the agent,
//! extract the structured result from its response, and render findings.

mod extract;
mod focus;
mod prompt;
mod render;
mod report;
mod reviewer;

pub use extract::{extract_review, sanitize};
pub use focus::Focus;
pub use prompt::build_prompt;
pub use render::{format_meta, render_report};
pub use report::{Category, CodeReviewResult, Finding, Severity};
pub use reviewer::{validate_target, ReviewOutcome, Reviewer};
