//! Configuration loading for claude-toolguard
//!
//! Supports TOML configuration with embedded defaults. The configuration is
//! built once at startup and passed by reference into every decision; the
//! core never mutates it.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Risk tier of a detection, independent of the action taken.
///
/// The derived order is `Low < Medium < High < Critical` and is used to pick
/// the worst match when several rules fire on the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy outcome applied to a detection. Not ordered: this is what happens,
/// not how risky it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityAction {
    /// Refuse the call outright
    Block,
    /// Rewrite parameters to mask the detected spans, then proceed
    Redact,
    /// Route through the host's own approval prompt (interactive tools)
    Confirm,
    /// Two-round handshake: block until resubmitted with the confirm flag
    AgentConfirm,
    /// Proceed, surfacing a warning
    Warn,
    /// Proceed, recording the detection only
    Log,
}

impl SeverityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityAction::Block => "block",
            SeverityAction::Redact => "redact",
            SeverityAction::Confirm => "confirm",
            SeverityAction::AgentConfirm => "agent-confirm",
            SeverityAction::Warn => "warn",
            SeverityAction::Log => "log",
        }
    }
}

impl std::fmt::Display for SeverityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-severity action overrides. Unset tiers fall back to the category's
/// default action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeverityActions {
    pub critical: Option<SeverityAction>,
    pub high: Option<SeverityAction>,
    pub medium: Option<SeverityAction>,
    pub low: Option<SeverityAction>,
}

impl SeverityActions {
    pub fn get(&self, severity: Severity) -> Option<SeverityAction> {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Configuration for one detection family (secrets, PII, destructive).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Whether this family runs at all
    pub enabled: bool,

    /// Default action when no severity-specific action is configured
    pub action: SeverityAction,

    /// Severity-specific action overrides
    pub severity_actions: SeverityActions,

    /// Sub-category toggles (e.g. "api_keys", "ssn", "git"); absent means on
    pub categories: HashMap<String, bool>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            action: SeverityAction::Redact,
            severity_actions: SeverityActions::default(),
            categories: HashMap::new(),
        }
    }
}

impl CategoryConfig {
    /// Resolve the action for a severity tier: severity-specific action if
    /// set, else the category default.
    pub fn action_for(&self, severity: Severity) -> SeverityAction {
        self.severity_actions.get(severity).unwrap_or(self.action)
    }

    /// Whether a sub-category is enabled (absent entries default to on).
    pub fn category_enabled(&self, name: &str) -> bool {
        self.categories.get(name).copied().unwrap_or(true)
    }

    pub(crate) fn secrets_default() -> Self {
        Self {
            action: SeverityAction::Redact,
            severity_actions: SeverityActions {
                critical: Some(SeverityAction::Block),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub(crate) fn pii_default() -> Self {
        Self {
            action: SeverityAction::Redact,
            ..Default::default()
        }
    }

    pub(crate) fn destructive_default() -> Self {
        Self {
            action: SeverityAction::AgentConfirm,
            severity_actions: SeverityActions {
                medium: Some(SeverityAction::Warn),
                low: Some(SeverityAction::Log),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// A user-supplied detection rule. An `action` override, if present,
/// bypasses severity-based resolution entirely for this pattern's matches.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomPattern {
    pub name: String,

    /// Regex source, compiled case-insensitively. An unparsable pattern is
    /// dropped, not an error.
    pub pattern: String,

    #[serde(default)]
    pub severity: Option<Severity>,

    #[serde(default)]
    pub action: Option<SeverityAction>,
}

/// Exemptions evaluated at different granularities: tool name and session
/// key exempt the whole call; match-text patterns exempt individual matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllowlistConfig {
    pub tools: Vec<String>,
    pub patterns: Vec<String>,
    pub sessions: Vec<String>,
}

/// Minimum level an audit entry must have to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

/// Audit logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Record detections to the audit log
    pub log_detections: bool,

    /// Verbosity threshold for audit entries
    pub log_level: LogLevel,

    /// Path to the JSONL audit log
    pub log_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_detections: true,
            log_level: LogLevel::Info,
            log_path: Some("~/.claude/toolguard/audit.jsonl".to_string()),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan tool-call parameters on the way in
    pub filter_inputs: bool,

    /// Scan outgoing message content
    pub filter_outputs: bool,

    #[serde(default = "CategoryConfig::secrets_default")]
    pub secrets: CategoryConfig,

    #[serde(default = "CategoryConfig::pii_default")]
    pub pii: CategoryConfig,

    #[serde(default = "CategoryConfig::destructive_default")]
    pub destructive: CategoryConfig,

    pub custom_patterns: Vec<CustomPattern>,

    pub allowlist: AllowlistConfig,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter_inputs: true,
            filter_outputs: true,
            secrets: CategoryConfig::secrets_default(),
            pii: CategoryConfig::pii_default(),
            destructive: CategoryConfig::destructive_default(),
            custom_patterns: Vec::new(),
            allowlist: AllowlistConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/toolguard/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/claude-toolguard/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if path.starts_with("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(&path[2..]);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded)
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.logging.log_path.as_ref().map(|p| Self::expand_path(p))
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
filter_inputs = true
filter_outputs = true

[secrets]
enabled = true
action = "redact"

[secrets.severity_actions]
critical = "block"

[pii]
enabled = true
action = "redact"

[destructive]
enabled = true
action = "agent-confirm"

[destructive.severity_actions]
medium = "warn"
low = "log"

[allowlist]
tools = []
patterns = []
sessions = []

[logging]
log_detections = true
log_level = "info"
log_path = "~/.claude/toolguard/audit.jsonl"
"#;
