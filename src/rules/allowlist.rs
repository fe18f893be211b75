//! Allowlist handling for bypassing detections
//!
//! Two granularities: tool/session exemptions skip the whole call;
//! match-text patterns drop individual matches during selection.

use crate::config::AllowlistConfig;
use regex::Regex;

/// Whole-call exemption: the tool name or the session key is allowlisted.
pub fn is_allowlisted(allowlist: &AllowlistConfig, tool_name: &str, session_key: Option<&str>) -> bool {
    if allowlist.tools.iter().any(|t| t == tool_name) {
        return true;
    }

    if let Some(session) = session_key {
        if allowlist.sessions.iter().any(|s| s == session) {
            return true;
        }
    }

    false
}

/// Match-level exemption: the matched text itself matches an allowlist
/// pattern. An invalid pattern is treated as non-matching, never an error.
pub fn is_match_allowlisted(match_text: &str, patterns: &[String]) -> bool {
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(match_text) {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist() -> AllowlistConfig {
        AllowlistConfig {
            tools: vec!["Glob".to_string(), "WebSearch".to_string()],
            patterns: vec![r"sk-test-.*".to_string()],
            sessions: vec!["trusted-session".to_string()],
        }
    }

    #[test]
    fn test_tool_allowlisted() {
        let list = allowlist();
        assert!(is_allowlisted(&list, "Glob", None));
        assert!(!is_allowlisted(&list, "Bash", None));
    }

    #[test]
    fn test_session_allowlisted() {
        let list = allowlist();
        assert!(is_allowlisted(&list, "Bash", Some("trusted-session")));
        assert!(!is_allowlisted(&list, "Bash", Some("other-session")));
        assert!(!is_allowlisted(&list, "Bash", None));
    }

    #[test]
    fn test_match_text_allowlisted() {
        let list = allowlist();
        assert!(is_match_allowlisted("sk-test-allowlisted-value", &list.patterns));
        assert!(!is_match_allowlisted("sk-live-real-key-material", &list.patterns));
    }

    #[test]
    fn test_invalid_pattern_is_non_matching() {
        let patterns = vec!["[unclosed".to_string(), "valid-.*".to_string()];
        assert!(!is_match_allowlisted("[unclosed", &patterns));
        assert!(is_match_allowlisted("valid-thing", &patterns));
    }

    #[test]
    fn test_empty_allowlist() {
        let list = AllowlistConfig::default();
        assert!(!is_allowlisted(&list, "Bash", Some("any")));
        assert!(!is_match_allowlisted("anything", &list.patterns));
    }
}
