//! Output formatting for Claude Code hook responses
//!
//! Shapes a verdict into the JSON the host expects: a permission decision
//! of allow/deny/ask, optionally rewritten tool parameters, and an
//! optional message for the user.

use crate::resolver::Verdict;
use serde::Serialize;
use serde_json::Value;

/// Main output structure for Claude Code hooks
#[derive(Debug, Serialize)]
pub struct HookOutput {
    /// Hook-specific output containing the permission decision
    #[serde(rename = "hookSpecificOutput", skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,

    /// Optional system message to show the user
    #[serde(rename = "systemMessage", skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

/// Hook-specific output with the permission decision
#[derive(Debug, Serialize)]
pub struct HookSpecificOutput {
    /// The hook event name (typically "PreToolUse")
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,

    /// Permission decision: "allow", "deny", or "ask"
    #[serde(rename = "permissionDecision")]
    pub permission_decision: String,

    /// Reason shown alongside the decision
    #[serde(rename = "permissionDecisionReason", skip_serializing_if = "Option::is_none")]
    pub permission_decision_reason: Option<String>,

    /// Rewritten tool parameters, when the call proceeds modified
    #[serde(rename = "updatedInput", skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<Value>,
}

impl HookSpecificOutput {
    fn new(decision: &str, reason: Option<String>, updated_input: Option<Value>) -> Self {
        Self {
            hook_event_name: "PreToolUse".to_string(),
            permission_decision: decision.to_string(),
            permission_decision_reason: reason,
            updated_input,
        }
    }
}

impl HookOutput {
    /// An allow response (empty output = allow)
    pub fn allow() -> Self {
        HookOutput {
            hook_specific_output: None,
            system_message: None,
        }
    }

    /// A deny response with rule id and reason
    pub fn deny(rule: &str, reason: &str) -> Self {
        HookOutput {
            hook_specific_output: Some(HookSpecificOutput::new(
                "deny",
                Some(reason.to_string()),
                None,
            )),
            system_message: Some(format!("[toolguard:{}] Blocked: {}", rule, reason)),
        }
    }

    /// Map a verdict to the hook response
    pub fn from_verdict(verdict: &Verdict) -> Self {
        match verdict {
            Verdict::Allow { .. } => HookOutput::allow(),

            Verdict::AllowWith { params, reason } => HookOutput {
                hook_specific_output: Some(HookSpecificOutput::new(
                    "allow",
                    Some(reason.clone()),
                    Some(params.clone()),
                )),
                system_message: Some(format!("[toolguard] {}", reason)),
            },

            Verdict::Ask { rule, reason } => HookOutput {
                hook_specific_output: Some(HookSpecificOutput::new(
                    "ask",
                    Some(reason.clone()),
                    None,
                )),
                system_message: Some(format!("[toolguard:{}] Approval requested: {}", rule, reason)),
            },

            Verdict::Warn { rule, reason } => HookOutput {
                hook_specific_output: None,
                system_message: Some(format!("[toolguard:{}] Warning: {}", rule, reason)),
            },

            Verdict::Block { rule, reason } | Verdict::BlockPendingConfirm { rule, reason } => {
                HookOutput::deny(rule, reason)
            }
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allow_output_is_empty() {
        let output = HookOutput::allow();
        assert_eq!(output.to_json(), "{}");
    }

    #[test]
    fn test_deny_output() {
        let output = HookOutput::deny("rm-rf", "Recursive force deletion");
        let json = output.to_json();
        assert!(json.contains("deny"));
        assert!(json.contains("rm-rf"));
        assert!(json.contains("Blocked"));
    }

    #[test]
    fn test_from_verdict_allow() {
        let output = HookOutput::from_verdict(&Verdict::allow("passed"));
        assert!(output.hook_specific_output.is_none());
        assert!(output.system_message.is_none());
    }

    #[test]
    fn test_from_verdict_allow_with_params() {
        let verdict = Verdict::AllowWith {
            params: json!({"text": "[REDACTED:email]"}),
            reason: "redacted".to_string(),
        };
        let output = HookOutput::from_verdict(&verdict);
        let specific = output.hook_specific_output.unwrap();
        assert_eq!(specific.permission_decision, "allow");
        assert_eq!(specific.updated_input, Some(json!({"text": "[REDACTED:email]"})));
    }

    #[test]
    fn test_from_verdict_ask() {
        let verdict = Verdict::Ask {
            rule: "rm-rf".to_string(),
            reason: "Recursive force deletion".to_string(),
        };
        let output = HookOutput::from_verdict(&verdict);
        assert_eq!(
            output.hook_specific_output.unwrap().permission_decision,
            "ask"
        );
    }

    #[test]
    fn test_from_verdict_warn_allows_with_message() {
        let verdict = Verdict::Warn {
            rule: "branch-delete".to_string(),
            reason: "Branch deletion".to_string(),
        };
        let output = HookOutput::from_verdict(&verdict);
        assert!(output.hook_specific_output.is_none());
        assert!(output.system_message.unwrap().contains("Warning"));
    }

    #[test]
    fn test_from_verdict_block_variants_deny() {
        for verdict in [
            Verdict::Block {
                rule: "r".to_string(),
                reason: "x".to_string(),
            },
            Verdict::BlockPendingConfirm {
                rule: "r".to_string(),
                reason: "x".to_string(),
            },
        ] {
            let output = HookOutput::from_verdict(&verdict);
            assert_eq!(
                output.hook_specific_output.unwrap().permission_decision,
                "deny"
            );
        }
    }
}
