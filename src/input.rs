//! Input parsing for the Claude Code hook JSON format
//!
//! Parses the JSON that the host sends on stdin for each intercepted tool
//! call. Parameters are kept as a raw JSON tree; the detectors know which
//! conventional shapes to look for.

use serde::Deserialize;
use serde_json::Value;

/// One intercepted tool call
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g. "Bash", "Read", "Write")
    pub tool_name: String,

    /// Tool parameters, untyped
    #[serde(default)]
    pub tool_input: Value,

    /// Session identifier, when the host supplies one
    #[serde(default)]
    pub session_id: Option<String>,

    /// Hook event name (e.g. "PreToolUse")
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

impl HookInput {
    /// Parse input from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A short description of the call for audit entries
    pub fn summary(&self) -> String {
        let detail = self
            .tool_input
            .as_object()
            .and_then(|obj| {
                obj.get("command")
                    .or_else(|| obj.get("cmd"))
                    .or_else(|| obj.get("file_path"))
                    .and_then(Value::as_str)
            })
            .unwrap_or("");

        let truncated = if detail.len() > 100 {
            let cut = detail
                .char_indices()
                .take_while(|(i, _)| *i <= 100)
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            format!("{}...", &detail[..cut])
        } else {
            detail.to_string()
        };

        if truncated.is_empty() {
            self.tool_name.clone()
        } else {
            format!("{}: {}", self.tool_name, truncated)
        }
    }
}
