//! Privilege-escalation unwrapping
//!
//! `sudo`, `doas`, `pkexec`, and `su` re-execute an inner command with
//! elevated rights. The inner command is recovered (flag-aware for
//! sudo/doas/pkexec, `-c` extraction for su) and re-run through every other
//! sub-detector; a destructive inner command escalates to critical with the
//! wrapper recorded in the reason and pattern. Unwrapping is exactly one
//! level deep: a wrapper inside a wrapper is not unwrapped again.

use crate::config::Severity;
use crate::destructive::{check_unwrapped, files, normalize_command_name, tokenize, DestructiveCategory, DestructiveMatch};

/// sudo options that consume a following value
const SUDO_FLAGS_WITH_VALUE: &[&str] = &[
    "-u", "--user", "-g", "--group", "-C", "--close-from", "-h", "--host", "-p", "--prompt",
];

/// Classify a privilege-escalation wrapper, or return none if `tokens`
/// doesn't start with one.
pub fn check_privilege_escalation(tokens: &[&str]) -> Option<DestructiveMatch> {
    let wrapper = normalize_command_name(tokens[0]);

    let inner = match wrapper {
        "sudo" | "doas" | "pkexec" => skip_wrapper_flags(&tokens[1..]),
        "su" => extract_su_command(&tokens[1..]),
        _ => return None,
    };

    let inner_tokens = match inner {
        Some(tokens) if !tokens.is_empty() => tokens,
        // No inner command recovered: flag the wrapper itself
        _ => return Some(bare_escalation(wrapper)),
    };

    let refs: Vec<&str> = inner_tokens.iter().map(String::as_str).collect();
    let joined = refs.join(" ");

    let inner_match = files::check_remote_execution(&joined)
        .or_else(|| files::check_truncation(&joined))
        .or_else(|| check_unwrapped(&refs));

    match inner_match {
        Some(m) => Some(DestructiveMatch {
            category: m.category,
            severity: Severity::Critical,
            pattern: format!("{} {}", wrapper, m.pattern),
            reason: format!("{} escalates: {}", wrapper, m.reason),
        }),
        None => Some(bare_escalation(wrapper)),
    }
}

fn bare_escalation(wrapper: &str) -> DestructiveMatch {
    DestructiveMatch::new(
        DestructiveCategory::PrivilegeEscalation,
        Severity::High,
        wrapper.to_string(),
        "Command runs with elevated privileges",
    )
}

/// Skip wrapper options to find the wrapped command (sudo/doas/pkexec)
fn skip_wrapper_flags(args: &[&str]) -> Option<Vec<String>> {
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx];
        if arg.starts_with('-') {
            if SUDO_FLAGS_WITH_VALUE.contains(&arg) {
                idx += 2;
            } else {
                idx += 1;
            }
        } else {
            return Some(args[idx..].iter().map(|s| s.to_string()).collect());
        }
    }
    None
}

/// Recover the command from `su [user] -c "command"`.
///
/// Whitespace tokenization has already split the quoted command; everything
/// after `-c` is rejoined and the outer quotes stripped.
fn extract_su_command(args: &[&str]) -> Option<Vec<String>> {
    let c_pos = args.iter().position(|a| *a == "-c" || *a == "--command")?;
    let rest = &args[c_pos + 1..];
    if rest.is_empty() {
        return None;
    }

    let joined = rest.join(" ");
    let stripped = joined
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    Some(tokenize(&stripped).iter().map(|s| s.to_string()).collect())
}
