//! Terminal rendering of review results

use std::path::Path;

use crate::agent::AgentResult;

use super::report::CodeReviewResult;

/// Render a findings report for the terminal
///
/// The caller prints this to stdout in one piece. Findings appear in the
/// order the reviewer gave them.
pub fn render_report(target: &Path, result: &CodeReviewResult) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", rule));
    out.push_str(&format!("Code Review: {}\n", target.display()));
    out.push_str(&format!("Files reviewed: {}\n", result.files_reviewed));
    out.push_str(&format!("Findings: {}\n", result.findings.len()));
    out.push_str(&format!("{}\n\n", rule));

    for finding in &result.findings {
        out.push_str(&format!(
            "{} [{}] {}\n",
            finding.severity.icon(),
            finding.severity.name().to_uppercase(),
            finding.location()
        ));
        out.push_str(&format!("  {}\n", finding.message));
        if let Some(ref suggestion) = finding.suggestion {
            out.push_str(&format!("  → {}\n", suggestion));
        }
        out.push('\n');
    }

    out.push_str(&format!("Summary: {}", result.summary));
    out
}

/// Format the run metadata line shown on stderr
///
/// Returns `None` when the agent reported no metadata at all, so nothing
/// is printed for a run that died before its result event.
pub fn format_meta(agent: &AgentResult) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(cost) = agent.cost_usd {
        parts.push(format!("${:.4}", cost));
    }
    if let Some(ms) = agent.duration_ms {
        parts.push(format!("{:.1}s", ms as f64 / 1000.0));
    }
    if let Some(turns) = agent.num_turns {
        parts.push(format!("{} turns", turns));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("  [meta] {}", parts.join(" | ")))
    }
}
