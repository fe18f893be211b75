//! System-level destructive command checks: power state, disk tools,
//! process kills, firewalls, and recursive permission changes

use crate::config::Severity;
use crate::destructive::files::is_system_path;
use crate::destructive::{DestructiveCategory, DestructiveMatch};

const SHUTDOWN_COMMANDS: &[&str] = &["shutdown", "reboot", "halt", "poweroff"];

const DISK_COMMANDS: &[&str] = &["fdisk", "parted", "wipefs", "mkswap", "shred"];

const KILL_COMMANDS: &[&str] = &["kill", "pkill", "killall"];

const FIREWALL_COMMANDS: &[&str] = &["iptables", "ip6tables", "ufw", "firewall-cmd", "nft"];

/// Classify a command against the generic system hazards. `name` is the
/// normalized executable, `args` everything after it.
pub fn check_system(name: &str, args: &[&str]) -> Option<DestructiveMatch> {
    if SHUTDOWN_COMMANDS.contains(&name) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SystemDestructive,
            Severity::Critical,
            name.to_string(),
            "Host power-state change",
        ));
    }

    if name == "init" && args.first().map_or(false, |a| *a == "0" || *a == "6") {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SystemDestructive,
            Severity::Critical,
            "init 0",
            "Host power-state change",
        ));
    }

    if name.starts_with("mkfs") || DISK_COMMANDS.contains(&name) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SystemDestructive,
            Severity::Critical,
            name.to_string(),
            "Disk formatting or destruction tool",
        ));
    }

    if name == "dd" && args.iter().any(|a| a.starts_with("of=/dev/")) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::SystemDestructive,
            Severity::Critical,
            "dd of=/dev/",
            "Raw write to a block device",
        ));
    }

    if KILL_COMMANDS.contains(&name) {
        let severity = if kill_signal_is_fatal(args) {
            Severity::High
        } else {
            Severity::Medium
        };
        return Some(DestructiveMatch::new(
            DestructiveCategory::ProcessKill,
            severity,
            name.to_string(),
            "Process termination",
        ));
    }

    if FIREWALL_COMMANDS.contains(&name) {
        return Some(DestructiveMatch::new(
            DestructiveCategory::NetworkDestructive,
            Severity::High,
            name.to_string(),
            "Firewall rule change",
        ));
    }

    if name == "chmod" {
        let recursive = args.iter().any(|a| {
            *a == "--recursive" || (a.starts_with('-') && !a.starts_with("--") && a[1..].contains('R'))
        });
        let on_system = args
            .iter()
            .any(|a| !a.starts_with('-') && is_system_path(a));
        if recursive && on_system {
            return Some(DestructiveMatch::new(
                DestructiveCategory::SystemDestructive,
                Severity::Critical,
                "chmod -R",
                "Recursive permission change on a system path",
            ));
        }
    }

    None
}

fn kill_signal_is_fatal(args: &[&str]) -> bool {
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx];
        match arg {
            "-9" | "-KILL" | "-SIGKILL" => return true,
            "-s" | "--signal" => {
                if let Some(sig) = args.get(idx + 1) {
                    if *sig == "9" || sig.eq_ignore_ascii_case("KILL")
                        || sig.eq_ignore_ascii_case("SIGKILL")
                    {
                        return true;
                    }
                }
                idx += 1;
            }
            _ => {}
        }
        idx += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_family() {
        for cmd in ["shutdown", "reboot", "halt", "poweroff"] {
            let m = check_system(cmd, &[]).unwrap();
            assert_eq!(m.severity, Severity::Critical);
            assert_eq!(m.category, DestructiveCategory::SystemDestructive);
        }
    }

    #[test]
    fn test_init_runlevels() {
        assert!(check_system("init", &["0"]).is_some());
        assert!(check_system("init", &["6"]).is_some());
        assert!(check_system("init", &["3"]).is_none());
    }

    #[test]
    fn test_disk_tools() {
        assert!(check_system("mkfs.ext4", &["/dev/sda1"]).is_some());
        assert!(check_system("fdisk", &["/dev/sda"]).is_some());
        assert!(check_system("wipefs", &["-a", "/dev/sdb"]).is_some());
    }

    #[test]
    fn test_dd_to_device() {
        assert!(check_system("dd", &["if=/dev/zero", "of=/dev/sda"]).is_some());
        assert!(check_system("dd", &["if=/dev/zero", "of=image.bin"]).is_none());
    }

    #[test]
    fn test_kill_severity_by_signal() {
        let m = check_system("kill", &["-9", "1234"]).unwrap();
        assert_eq!(m.severity, Severity::High);

        let m = check_system("kill", &["-s", "KILL", "1234"]).unwrap();
        assert_eq!(m.severity, Severity::High);

        let m = check_system("pkill", &["-9", "node"]).unwrap();
        assert_eq!(m.severity, Severity::High);

        let m = check_system("kill", &["1234"]).unwrap();
        assert_eq!(m.severity, Severity::Medium);

        let m = check_system("killall", &["node"]).unwrap();
        assert_eq!(m.severity, Severity::Medium);
    }

    #[test]
    fn test_firewall_tools() {
        let m = check_system("iptables", &["-F"]).unwrap();
        assert_eq!(m.category, DestructiveCategory::NetworkDestructive);
        assert_eq!(m.severity, Severity::High);
        assert!(check_system("ufw", &["disable"]).is_some());
    }

    #[test]
    fn test_chmod_recursive_on_system_path() {
        let m = check_system("chmod", &["-R", "777", "/etc"]).unwrap();
        assert_eq!(m.severity, Severity::Critical);

        assert!(check_system("chmod", &["-R", "755", "./build"]).is_none());
        assert!(check_system("chmod", &["644", "/etc/hosts"]).is_none());
    }

    #[test]
    fn test_benign_commands() {
        assert!(check_system("ls", &["-la"]).is_none());
        assert!(check_system("cargo", &["build"]).is_none());
    }
}
