//! Detection rules for claude-toolguard
//!
//! Static secret/PII pattern tables, structural validators, the rule-set
//! builder, and allowlist handling.

pub mod allowlist;
pub mod builder;
pub mod catalog;
pub mod validators;

use crate::config::{Severity, SeverityAction};
use regex::Regex;

/// Structural check applied to a regex match before it is accepted
pub type Validator = fn(&str) -> bool;

/// Which rule family a detection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Secrets,
    Pii,
    Custom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Secrets => "secrets",
            Category::Pii => "pii",
            Category::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A static catalog entry
#[derive(Debug, Clone, Copy)]
pub struct PatternDef {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Sub-category toggle name this rule belongs to
    pub subcategory: &'static str,

    /// Regex pattern to match
    pub pattern: &'static str,

    /// Default severity of a match
    pub severity: Severity,

    /// Optional structural validator for candidate matches
    pub validator: Option<Validator>,
}

impl PatternDef {
    pub const fn new(
        id: &'static str,
        subcategory: &'static str,
        pattern: &'static str,
        severity: Severity,
        validator: Option<Validator>,
    ) -> Self {
        Self {
            id,
            subcategory,
            pattern,
            severity,
            validator,
        }
    }
}

/// A compiled rule in the active set. Immutable once built.
#[derive(Debug, Clone)]
pub struct ActiveRule {
    pub id: String,
    pub regex: Regex,
    pub validator: Option<Validator>,
    pub severity: Severity,
    pub category: Category,

    /// Custom patterns may carry an action that bypasses severity resolution
    pub action_override: Option<SeverityAction>,
}
