//! claude-toolguard - Tool-call filter hook for Claude Code
//!
//! Reads one hook event as JSON from stdin, decides it, and writes the
//! hook response JSON to stdout.
//!
//! # Usage
//!
//! ```bash
//! # As a Claude Code hook (reads JSON from stdin, writes JSON to stdout)
//! echo '{"tool_name":"Bash","tool_input":{"command":"rm -rf /"}}' | claude-toolguard
//!
//! # Print the confirmation-protocol notice for context injection
//! claude-toolguard --print-notice
//! ```

use std::env;
use std::io::{self, BufRead, Write};

use claude_toolguard::{
    audit::AuditLogger,
    config::Config,
    engine::GuardEngine,
    input::HookInput,
    output::HookOutput,
    resolver,
};

/// Print version information
fn print_version() {
    println!("claude-toolguard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"claude-toolguard - Tool-call filter hook for Claude Code

USAGE:
    claude-toolguard [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to config file
        --print-notice      Print the confirmation-protocol notice and exit

ENVIRONMENT:
    TOOLGUARD_DISABLED=1    Disable all checks (still logs)
    TOOLGUARD_WARN_ONLY=1   Warn but don't block

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "type": "command",
          "command": "~/.claude/toolguard/claude-toolguard",
          "timeout": 5000
        }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    print_notice: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            print_notice: false,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "--print-notice" => result.print_notice = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn main() {
    let args = Args::parse();

    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    if args.print_notice {
        println!("{}", resolver::confirmation_notice());
        return;
    }

    // Load configuration
    let config = if let Some(ref path) = args.config_path {
        Config::load_from(std::path::Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path, e);
            Config::default()
        })
    } else {
        Config::load()
    };

    // Create audit logger
    let audit_path = config.audit_path();
    let mut logger = AuditLogger::from_config(&config.logging, audit_path.as_deref());

    // Create the engine
    let engine = GuardEngine::new(config);

    // Read JSON from stdin
    let stdin = io::stdin();
    let mut input_json = String::new();

    for line in stdin.lock().lines() {
        match line {
            Ok(line) => input_json.push_str(&line),
            Err(_) => break,
        }
    }

    // Handle empty input
    if input_json.trim().is_empty() {
        // No input = nothing to check, allow
        let output = HookOutput::allow();
        println!("{}", output.to_json());
        return;
    }

    // Parse input
    let input = match HookInput::from_json(&input_json) {
        Ok(input) => input,
        Err(e) => {
            // SECURITY: Fail closed on parse errors
            // Malformed input could be an evasion attempt
            eprintln!("Error: Failed to parse input (denying): {}", e);
            let output =
                HookOutput::deny("parse-error", &format!("Failed to parse hook input: {}", e));
            println!("{}", output.to_json());
            return;
        }
    };

    let disabled = engine.is_disabled();

    // Run the decision
    let verdict = engine.check(&input);

    // Log the decision
    if let Err(e) = logger.log_decision(&input, &verdict, disabled) {
        eprintln!("Warning: Failed to write audit log: {}", e);
    }

    // Write the response
    let output = HookOutput::from_verdict(&verdict);
    let json = output.to_json();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", json);
    let _ = handle.flush();
}
