//! Destructive command classification
//!
//! An independent rule family from the regex scanner: sub-detectors inspect
//! a normalized command name and its argument vector. Tokenization is
//! best-effort whitespace splitting with no quoting awareness; that is a
//! documented precision limit, not a defect.

pub mod files;
pub mod git;
pub mod privilege;
pub mod sql;
pub mod system;

use crate::config::Severity;
use serde_json::Value;

/// Closed set of destructive command categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveCategory {
    FileDelete,
    GitDestructive,
    SqlDestructive,
    SystemDestructive,
    ProcessKill,
    NetworkDestructive,
    PrivilegeEscalation,
    DangerousPath,
    RemoteExecution,
    FileTruncation,
}

impl DestructiveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestructiveCategory::FileDelete => "file_delete",
            DestructiveCategory::GitDestructive => "git_destructive",
            DestructiveCategory::SqlDestructive => "sql_destructive",
            DestructiveCategory::SystemDestructive => "system_destructive",
            DestructiveCategory::ProcessKill => "process_kill",
            DestructiveCategory::NetworkDestructive => "network_destructive",
            DestructiveCategory::PrivilegeEscalation => "privilege_escalation",
            DestructiveCategory::DangerousPath => "dangerous_path",
            DestructiveCategory::RemoteExecution => "remote_execution",
            DestructiveCategory::FileTruncation => "file_truncation",
        }
    }
}

impl std::fmt::Display for DestructiveCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destructive classification, keyed by command semantics rather than a
/// text offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructiveMatch {
    pub category: DestructiveCategory,
    pub reason: String,
    pub severity: Severity,
    /// Label of the matched pattern, e.g. "rm -rf" or "git push --force"
    pub pattern: String,
}

impl DestructiveMatch {
    pub fn new(
        category: DestructiveCategory,
        severity: Severity,
        pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            category,
            reason: reason.into(),
            severity,
            pattern: pattern.into(),
        }
    }
}

/// Best-effort whitespace tokenization (no quoting grammar)
pub fn tokenize(command: &str) -> Vec<&str> {
    command.split_whitespace().collect()
}

/// Strip any directory prefix so `/bin/rm` dispatches like `rm`
pub fn normalize_command_name(token: &str) -> &str {
    token.rsplit(&['/', '\\'][..]).next().unwrap_or(token)
}

/// Pull a command string out of the conventional parameter shapes: a
/// `command`/`cmd` string or an `args` list. An `input` parameter has no
/// command semantics and is only seen by the SQL sweep.
fn extract_command(params: &Value) -> Option<String> {
    let obj = params.as_object()?;

    if let Some(cmd) = obj
        .get("command")
        .or_else(|| obj.get("cmd"))
        .and_then(Value::as_str)
    {
        return Some(cmd.to_string());
    }

    if let Some(args) = obj.get("args").and_then(Value::as_array) {
        let joined: Vec<&str> = args.iter().filter_map(Value::as_str).collect();
        if !joined.is_empty() {
            return Some(joined.join(" "));
        }
    }

    None
}

/// Classify a tool call's parameters. Returns the first match in a fixed
/// priority order: remote-execution/truncation on the whole command string,
/// then privilege-escalation unwrap, per-command sub-detectors, the generic
/// system check, the dangerous-path check, and finally an SQL sweep over
/// every string-valued parameter.
pub fn detect_destructive(_tool_name: &str, params: &Value) -> Option<DestructiveMatch> {
    if let Some(command) = extract_command(params) {
        if let Some(m) = check_command(&command) {
            return Some(m);
        }
    }

    // SQL hazards can arrive in any string parameter, not just `command`
    if let Some(obj) = params.as_object() {
        for value in obj.values() {
            if let Some(text) = value.as_str() {
                if let Some(m) = sql::check_sql(text) {
                    return Some(m);
                }
            }
        }
    }

    None
}

/// True if the call would be classified destructive
pub fn might_be_destructive(tool_name: &str, params: &Value) -> bool {
    detect_destructive(tool_name, params).is_some()
}

/// Run the full pipeline over one command string.
pub(crate) fn check_command(command: &str) -> Option<DestructiveMatch> {
    if let Some(m) = files::check_remote_execution(command) {
        return Some(m);
    }
    if let Some(m) = files::check_truncation(command) {
        return Some(m);
    }

    let tokens = tokenize(command);
    if tokens.is_empty() {
        return None;
    }

    if let Some(m) = privilege::check_privilege_escalation(&tokens) {
        return Some(m);
    }

    check_unwrapped(&tokens)
}

/// Sub-detectors applied to an argv that is known not to be (or has already
/// been stripped of) a privilege-escalation wrapper.
pub(crate) fn check_unwrapped(tokens: &[&str]) -> Option<DestructiveMatch> {
    let name = normalize_command_name(tokens[0]);
    let args = &tokens[1..];

    let per_command = match name {
        "rm" => files::is_destructive_rm(args),
        "find" => files::check_find(args),
        "git" => git::check_git(args),
        _ => None,
    };
    if let Some(m) = per_command {
        return Some(m);
    }

    // xargs can sit behind a pipe, so it scans the whole vector
    if let Some(m) = files::check_xargs(tokens) {
        return Some(m);
    }

    if let Some(m) = system::check_system(name, args) {
        return Some(m);
    }

    if let Some(m) = files::check_dangerous_paths(args) {
        return Some(m);
    }

    None
}
