//! JSONL audit logging
//!
//! Records decisions to a JSONL file for later analysis, honoring the
//! configured detection-logging switch and level threshold.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::{LogLevel, LoggingConfig};
use crate::input::HookInput;
use crate::resolver::Verdict;

/// Outcome tag for audit entries
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOutcome {
    Allowed,
    Redacted,
    Asked,
    Warned,
    Blocked,
    Disabled,
}

impl AuditOutcome {
    fn from_verdict(verdict: &Verdict) -> Self {
        match verdict {
            Verdict::Allow { .. } => AuditOutcome::Allowed,
            Verdict::AllowWith { .. } => AuditOutcome::Redacted,
            Verdict::Ask { .. } => AuditOutcome::Asked,
            Verdict::Warn { .. } => AuditOutcome::Warned,
            Verdict::Block { .. } | Verdict::BlockPendingConfirm { .. } => AuditOutcome::Blocked,
        }
    }

    /// The verbosity level this outcome is written at
    fn level(&self) -> LogLevel {
        match self {
            AuditOutcome::Allowed => LogLevel::Debug,
            AuditOutcome::Redacted | AuditOutcome::Asked | AuditOutcome::Disabled => LogLevel::Info,
            AuditOutcome::Warned => LogLevel::Warn,
            AuditOutcome::Blocked => LogLevel::Error,
        }
    }
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the decision
    pub timestamp: DateTime<Utc>,

    /// Outcome tag (ALLOWED, REDACTED, ASKED, WARNED, BLOCKED, DISABLED)
    pub outcome: AuditOutcome,

    /// Tool that was invoked
    pub tool: String,

    /// Rule or pattern label that matched (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Summary of the input
    pub input_summary: String,

    /// Reason for the decision
    pub reason: String,

    /// Session ID (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from input and verdict
    pub fn new(input: &HookInput, verdict: &Verdict, disabled: bool) -> Self {
        let (outcome, rule, reason) = if disabled {
            (
                AuditOutcome::Disabled,
                None,
                "TOOLGUARD_DISABLED".to_string(),
            )
        } else {
            (
                AuditOutcome::from_verdict(verdict),
                verdict.rule().map(String::from),
                verdict.reason().to_string(),
            )
        };

        Self {
            timestamp: Utc::now(),
            outcome,
            tool: input.tool_name.clone(),
            rule,
            input_summary: input.summary(),
            reason,
            session_id: input.session_id.clone(),
        }
    }
}

/// Audit logger
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
    threshold: LogLevel,
}

impl AuditLogger {
    /// Create a logger from the logging configuration and a resolved path.
    /// Returns a disabled logger when detection logging is off or no path
    /// is configured.
    pub fn from_config(config: &LoggingConfig, path: Option<&Path>) -> Self {
        if !config.log_detections {
            return Self::disabled();
        }
        Self::new(path, config.log_level)
    }

    /// Create a new audit logger writing to `path`
    pub fn new(path: Option<&Path>, threshold: LogLevel) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .ok()
                .map(BufWriter::new)
        });

        Self { writer, threshold }
    }

    /// A logger that drops everything
    pub fn disabled() -> Self {
        Self {
            writer: None,
            threshold: LogLevel::Info,
        }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if entry.outcome.level() > self.threshold {
            return Ok(());
        }
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a decision
    pub fn log_decision(
        &mut self,
        input: &HookInput,
        verdict: &Verdict,
        disabled: bool,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(input, verdict, disabled);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
