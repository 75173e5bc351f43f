//! Review prompt construction
//!
//! The template is embedded at build time and uses `{{VARIABLE}}`
//! placeholders, filled in per review.

use std::path::Path;

use super::focus::Focus;

const REVIEW_TEMPLATE: &str = include_str!("prompts/review.md");

/// Build the full review prompt for a target path and focus
pub fn build_prompt(target: &Path, focus: Focus) -> String {
    REVIEW_TEMPLATE
        .replace("{{TARGET_PATH}}", &target.display().to_string())
        .replace("{{FOCUS_INSTRUCTIONS}}", focus.instruction())
}
