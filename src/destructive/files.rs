//! File deletion, dangerous paths, bulk-delete vectors, remote execution,
//! and truncation checks

use crate::config::Severity;
use crate::destructive::{normalize_command_name, DestructiveCategory, DestructiveMatch};

use once_cell::sync::Lazy;
use regex::Regex;

/// Paths and identifiers whose destruction is never routine
const DANGEROUS_PATHS: &[(&str, Severity)] = &[
    ("/", Severity::Critical),
    ("/*", Severity::Critical),
    ("*", Severity::High),
    ("~", Severity::Critical),
    ("$HOME", Severity::Critical),
    ("/etc", Severity::Critical),
    ("/usr", Severity::Critical),
    ("/bin", Severity::Critical),
    ("/sbin", Severity::Critical),
    ("/boot", Severity::Critical),
    ("/var", Severity::High),
    ("/root", Severity::Critical),
    (r"C:\Windows", Severity::Critical),
    (r"C:\Program Files", Severity::Critical),
    (r"C:\Users", Severity::High),
];

/// Prefixes that mark a path as belonging to the OS itself
const SYSTEM_PATH_PREFIXES: &[&str] = &[
    "/etc", "/usr", "/bin", "/sbin", "/boot", "/var", "/lib", "/dev", "/proc", "/sys",
];

static REMOTE_PIPE_SHELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:curl|wget)\b[^|]*\|\s*(?:sudo\s+)?(?:ba|z|da|fi)?sh\b").unwrap()
});

static REMOTE_PIPE_INTERPRETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:curl|wget)\b[^|]*\|\s*(?:python[0-9.]*|perl|ruby|node)\b").unwrap()
});

static EVAL_REMOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\beval\s+["'`]?\$\(\s*(?:curl|wget)\b"#).unwrap());

// A `>` preceded by start/whitespace/separator, so `>>` (append) and `2>`
// (fd redirect) don't trip it
static TRUNCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s|;&])>\s*(/[^\s>]+)").unwrap());

/// Recursive+force deletion: `-rf`, `-fr`, combined short-flag clusters, or
/// the long forms together.
pub fn is_destructive_rm(args: &[&str]) -> Option<DestructiveMatch> {
    let mut recursive = false;
    let mut force = false;

    for arg in args {
        match *arg {
            "--recursive" => recursive = true,
            "--force" => force = true,
            _ => {
                if arg.starts_with('-') && !arg.starts_with("--") {
                    let cluster = &arg[1..];
                    if cluster.contains('r') || cluster.contains('R') {
                        recursive = true;
                    }
                    if cluster.contains('f') {
                        force = true;
                    }
                }
            }
        }
    }

    if recursive && force {
        return Some(DestructiveMatch::new(
            DestructiveCategory::FileDelete,
            Severity::Critical,
            "rm -rf",
            "Recursive force deletion",
        ));
    }

    None
}

/// `find ... -delete` and `find ... -exec rm` are bulk-deletion vectors
pub fn check_find(args: &[&str]) -> Option<DestructiveMatch> {
    let deletes = args.iter().any(|a| *a == "-delete");
    let exec_rm = args
        .windows(2)
        .any(|w| w[0] == "-exec" && normalize_command_name(w[1]) == "rm");

    if !deletes && !exec_rm {
        return None;
    }

    // The starting path is the first non-flag argument
    let start_path = args.iter().find(|a| !a.starts_with('-'));
    let severity = match start_path {
        Some(path) if dangerous_path_severity(path).is_some() => Severity::Critical,
        _ => Severity::High,
    };

    let pattern = if deletes { "find -delete" } else { "find -exec rm" };
    Some(DestructiveMatch::new(
        DestructiveCategory::FileDelete,
        severity,
        pattern,
        "Bulk deletion via find",
    ))
}

/// `xargs ... rm` fans a deletion out over piped input. Scans the whole
/// token vector because xargs usually sits behind a pipe.
pub fn check_xargs(tokens: &[&str]) -> Option<DestructiveMatch> {
    let pos = tokens
        .iter()
        .position(|t| normalize_command_name(t) == "xargs")?;
    let after = &tokens[pos + 1..];

    let runs_rm = after.iter().any(|a| normalize_command_name(a) == "rm");
    if !runs_rm {
        return None;
    }

    let severity = if after.iter().any(|a| dangerous_path_severity(a).is_some()) {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(DestructiveMatch::new(
        DestructiveCategory::FileDelete,
        severity,
        "xargs rm",
        "Bulk deletion via xargs",
    ))
}

/// Argument-level denylist check, independent of which command issued it
pub fn check_dangerous_paths(args: &[&str]) -> Option<DestructiveMatch> {
    for arg in args {
        if let Some(severity) = dangerous_path_severity(arg) {
            return Some(DestructiveMatch::new(
                DestructiveCategory::DangerousPath,
                severity,
                arg.to_string(),
                format!("Operation targets protected path {}", arg),
            ));
        }
    }

    None
}

fn dangerous_path_severity(arg: &str) -> Option<Severity> {
    let trimmed = if arg.len() > 1 {
        arg.trim_end_matches('/')
    } else {
        arg
    };

    for (path, severity) in DANGEROUS_PATHS {
        if trimmed == *path {
            return Some(*severity);
        }
    }

    // SSH and GPG config directories, wherever the home directory lives
    if trimmed.ends_with("/.ssh") || trimmed.ends_with("/.gnupg") || trimmed == "~/.ssh" || trimmed == "~/.gnupg" {
        return Some(Severity::High);
    }

    // A bare home directory like /home/alice
    static HOME_DIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/home/[^/]+$").unwrap());
    if HOME_DIR.is_match(trimmed) {
        return Some(Severity::Critical);
    }

    None
}

/// True for paths owned by the operating system
pub fn is_system_path(path: &str) -> bool {
    path == "/" || SYSTEM_PATH_PREFIXES.iter().any(|p| path == *p || path.starts_with(&format!("{}/", p)))
}

/// Remote content piped straight into an interpreter, or eval of a fetch
pub fn check_remote_execution(command: &str) -> Option<DestructiveMatch> {
    if REMOTE_PIPE_SHELL.is_match(command)
        || REMOTE_PIPE_INTERPRETER.is_match(command)
        || EVAL_REMOTE.is_match(command)
    {
        return Some(DestructiveMatch::new(
            DestructiveCategory::RemoteExecution,
            Severity::Critical,
            "curl | sh",
            "Remote content piped into an interpreter",
        ));
    }

    None
}

/// Bare `>` redirection truncating an absolute path
pub fn check_truncation(command: &str) -> Option<DestructiveMatch> {
    let captures = TRUNCATION.captures(command)?;
    let target = captures.get(1).map(|m| m.as_str())?;

    let severity = if is_system_path(target) {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(DestructiveMatch::new(
        DestructiveCategory::FileTruncation,
        severity,
        format!("> {}", target),
        format!("Redirection truncates {}", target),
    ))
}
