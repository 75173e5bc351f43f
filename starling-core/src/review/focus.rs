//! Review focus areas
//!
//! A focus narrows what the reviewer agent looks for. The default is a
//! general pass over bugs, style, security, and performance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the review should concentrate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    /// Logic errors, edge cases, and crash risks
    Bugs,
    /// Naming, structure, and readability
    Style,
    /// Vulnerabilities and unsafe input handling
    Security,
    /// Everything: bugs, style, security, and performance
    #[default]
    All,
}

impl Focus {
    /// Get all available focus areas
    pub fn all() -> &'static [Focus] {
        &[Focus::Bugs, Focus::Style, Focus::Security, Focus::All]
    }

    /// Get the short name for this focus
    pub fn name(&self) -> &'static str {
        match self {
            Focus::Bugs => "bugs",
            Focus::Style => "style",
            Focus::Security => "security",
            Focus::All => "all",
        }
    }

    /// Get a description of what this focus covers
    pub fn description(&self) -> &'static str {
        match self {
            Focus::Bugs => "Logic errors, edge cases, and crash risks",
            Focus::Style => "Naming, structure, and readability",
            Focus::Security => "Vulnerabilities and unsafe input handling",
            Focus::All => "Bugs, style, security, and performance",
        }
    }

    /// Get the instruction paragraph injected into the review prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Focus::Bugs => {
                "Focus on logical errors, edge cases, null/undefined handling, \
                 and potential crashes."
            }
            Focus::Style => {
                "Focus on code style, naming, readability, and adherence to \
                 the language's best practices."
            }
            Focus::Security => {
                "Focus on security vulnerabilities: injection, secrets, input \
                 validation, auth issues."
            }
            Focus::All => "Review for bugs, style, security, and performance issues.",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Focus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bugs" | "bug" | "b" => Ok(Focus::Bugs),
            "style" | "s" => Ok(Focus::Style),
            "security" | "sec" => Ok(Focus::Security),
            "all" | "a" => Ok(Focus::All),
            _ => Err(format!(
                "Unknown focus '{}'. Valid values: bugs, style, security, all",
                s
            )),
        }
    }
}
