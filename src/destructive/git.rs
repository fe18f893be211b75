//! Version-control destructive operation checks
//!
//! Subcommand-aware: global flags before the subcommand are skipped so
//! `git -C /repo push --force` still resolves to `push`.

use crate::config::Severity;
use crate::destructive::{DestructiveCategory, DestructiveMatch};

/// Global git options that consume a following value
const GLOBAL_FLAGS_WITH_VALUE: &[&str] = &["-C", "-c", "--git-dir", "--work-tree", "--namespace", "--exec-path"];

/// Locate the real subcommand, returning it and the arguments after it
fn split_subcommand<'a>(args: &[&'a str]) -> Option<(&'a str, Vec<&'a str>)> {
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx];
        if arg.starts_with('-') {
            if GLOBAL_FLAGS_WITH_VALUE.contains(&arg) {
                idx += 2;
            } else {
                // Handles --git-dir=/path style and boolean globals
                idx += 1;
            }
        } else {
            return Some((arg, args[idx + 1..].to_vec()));
        }
    }
    None
}

fn cluster_contains(args: &[&str], short: char, long: &str) -> bool {
    args.iter().any(|a| {
        *a == long
            || (a.starts_with('-') && !a.starts_with("--") && a[1..].contains(short))
    })
}

/// Classify a git invocation (arguments after the `git` token).
pub fn check_git(args: &[&str]) -> Option<DestructiveMatch> {
    let (subcommand, rest) = split_subcommand(args)?;

    match subcommand {
        "reset" | "revert" | "checkout" | "restore" => {
            let hard = rest.iter().any(|a| *a == "--hard");
            let severity = if hard { Severity::Critical } else { Severity::High };
            let pattern = if hard {
                format!("git {} --hard", subcommand)
            } else {
                format!("git {}", subcommand)
            };
            Some(DestructiveMatch::new(
                DestructiveCategory::GitDestructive,
                severity,
                pattern,
                "History or working-tree rewind can discard work",
            ))
        }
        "clean" => {
            if cluster_contains(&rest, 'f', "--force") {
                Some(DestructiveMatch::new(
                    DestructiveCategory::GitDestructive,
                    Severity::High,
                    "git clean -f",
                    "Force clean deletes untracked files",
                ))
            } else {
                None
            }
        }
        "switch" => {
            let forced = rest
                .iter()
                .any(|a| *a == "-f" || *a == "--force" || *a == "--discard-changes");
            if forced {
                Some(DestructiveMatch::new(
                    DestructiveCategory::GitDestructive,
                    Severity::High,
                    "git switch --force",
                    "Forced switch discards local changes",
                ))
            } else {
                None
            }
        }
        "stash" => match rest.first().copied() {
            Some("drop") | Some("pop") => Some(DestructiveMatch::new(
                DestructiveCategory::GitDestructive,
                Severity::High,
                format!("git stash {}", rest[0]),
                "Stash entry is removed",
            )),
            Some("clear") => Some(DestructiveMatch::new(
                DestructiveCategory::GitDestructive,
                Severity::Critical,
                "git stash clear",
                "All stash entries are removed",
            )),
            _ => None,
        },
        "push" => {
            let forced = rest.iter().any(|a| *a == "-f" || *a == "--force");
            if forced {
                Some(DestructiveMatch::new(
                    DestructiveCategory::GitDestructive,
                    Severity::Critical,
                    "git push --force",
                    "Force push rewrites remote history",
                ))
            } else {
                None
            }
        }
        "branch" => {
            let deletes = rest
                .iter()
                .any(|a| *a == "-d" || *a == "-D" || *a == "--delete");
            if deletes {
                Some(DestructiveMatch::new(
                    DestructiveCategory::GitDestructive,
                    Severity::Medium,
                    "git branch -d",
                    "Branch deletion",
                ))
            } else {
                None
            }
        }
        "reflog" => match rest.first().copied() {
            Some("expire") | Some("delete") => Some(DestructiveMatch::new(
                DestructiveCategory::GitDestructive,
                Severity::Critical,
                format!("git reflog {}", rest[0]),
                "Reflog pruning destroys recovery points",
            )),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_flagged() {
        let m = check_git(&["reset", "HEAD~1"]).unwrap();
        assert_eq!(m.severity, Severity::High);

        let m = check_git(&["reset", "--hard", "HEAD~1"]).unwrap();
        assert_eq!(m.severity, Severity::Critical);
        assert_eq!(m.pattern, "git reset --hard");
    }

    #[test]
    fn test_checkout_restore_revert_flagged() {
        assert!(check_git(&["checkout", "main"]).is_some());
        assert!(check_git(&["restore", "src/lib.rs"]).is_some());
        assert!(check_git(&["revert", "HEAD"]).is_some());
    }

    #[test]
    fn test_global_flags_skipped() {
        let m = check_git(&["-C", "/repo", "push", "--force", "origin", "main"]).unwrap();
        assert_eq!(m.severity, Severity::Critical);

        let m = check_git(&["--git-dir=/repo/.git", "reset", "--hard"]).unwrap();
        assert_eq!(m.severity, Severity::Critical);
    }

    #[test]
    fn test_clean_only_when_forced() {
        assert!(check_git(&["clean", "-n"]).is_none());
        assert!(check_git(&["clean", "-f"]).is_some());
        assert!(check_git(&["clean", "-fdx"]).is_some());
        assert!(check_git(&["clean", "--force"]).is_some());
    }

    #[test]
    fn test_switch_only_when_forced() {
        assert!(check_git(&["switch", "main"]).is_none());
        assert!(check_git(&["switch", "-f", "main"]).is_some());
        assert!(check_git(&["switch", "--discard-changes", "main"]).is_some());
    }

    #[test]
    fn test_stash_variants() {
        assert!(check_git(&["stash"]).is_none());
        assert!(check_git(&["stash", "push"]).is_none());

        let m = check_git(&["stash", "drop"]).unwrap();
        assert_eq!(m.severity, Severity::High);
        let m = check_git(&["stash", "pop"]).unwrap();
        assert_eq!(m.severity, Severity::High);
        let m = check_git(&["stash", "clear"]).unwrap();
        assert_eq!(m.severity, Severity::Critical);
    }

    #[test]
    fn test_push_only_when_forced() {
        assert!(check_git(&["push", "origin", "main"]).is_none());
        assert!(check_git(&["push", "-f", "origin", "main"]).is_some());
        assert!(check_git(&["push", "origin", "main", "--force"]).is_some());
    }

    #[test]
    fn test_branch_delete() {
        assert!(check_git(&["branch", "feature"]).is_none());
        let m = check_git(&["branch", "-D", "feature"]).unwrap();
        assert_eq!(m.severity, Severity::Medium);
    }

    #[test]
    fn test_reflog() {
        assert!(check_git(&["reflog"]).is_none());
        assert!(check_git(&["reflog", "show"]).is_none());
        assert!(check_git(&["reflog", "expire", "--all"]).is_some());
        assert!(check_git(&["reflog", "delete", "HEAD@{1}"]).is_some());
    }

    #[test]
    fn test_benign_subcommands() {
        assert!(check_git(&["status"]).is_none());
        assert!(check_git(&["log", "--oneline"]).is_none());
        assert!(check_git(&["diff"]).is_none());
        assert!(check_git(&[]).is_none());
    }
}
