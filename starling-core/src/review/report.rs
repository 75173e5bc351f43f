//! Structured review result types
//!
//! These mirror the JSON schema the reviewer agent is asked to produce.
//! Deserialization is the validation: unknown severities or categories,
//! missing required fields, and a zero line number all fail the parse.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must fix
    Error,
    /// Should fix
    Warning,
    /// Worth knowing
    Info,
}

impl Severity {
    /// Get the lowercase name, as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Get the icon shown in rendered reports
    ///
    /// Warning and info carry a trailing space to align with the wider
    /// error glyph.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Error => "❌",
            Severity::Warning => "⚠️ ",
            Severity::Info => "ℹ️ ",
        }
    }
}

/// What kind of issue a finding describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bug,
    Style,
    Security,
    Performance,
}

/// A single issue reported by the reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// File the issue was found in
    pub file: String,

    /// Line number, 1-based; absent when the issue is file-wide
    #[serde(default)]
    pub line: Option<NonZeroU32>,

    /// How serious the issue is
    pub severity: Severity,

    /// What kind of issue it is
    pub category: Category,

    /// Description of the issue
    pub message: String,

    /// How to fix it, when the reviewer has a concrete suggestion
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl Finding {
    /// Format the file and optional line as `file` or `file:line`
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file, line),
            None => self.file.clone(),
        }
    }
}

/// The structured result of one code review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeReviewResult {
    /// Issues found, possibly empty
    pub findings: Vec<Finding>,

    /// Brief overall assessment
    pub summary: String,

    /// How many files the reviewer looked at
    #[serde(alias = "filesReviewed")]
    pub files_reviewed: u32,
}
