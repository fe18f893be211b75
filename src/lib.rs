//! claude-toolguard - Tool-call filter hook for Claude Code
//!
//! This library screens tool invocations from an autonomous agent before
//! they execute, protecting against three independent hazards: leaked
//! secrets and credentials, personally identifiable information, and
//! destructive system commands.
//!
//! # Features
//!
//! - **Secret detection**: API keys, cloud credentials, tokens, private
//!   key blocks, with per-severity policy actions
//! - **PII detection**: credit cards (Luhn-checked), SSNs, emails, phone
//!   numbers, each gated by a structural validator
//! - **Destructive command classification**: file deletion, git, SQL,
//!   system, process, network, and privilege-escalation unwrapping
//! - **Redaction**: masks detected spans in text and parameter trees
//! - **Confirm handshake**: blocked calls can be retried with an explicit
//!   acknowledgment flag
//! - **Allowlists**: exemptions by tool, session, or matched text
//! - **Audit logging**: JSONL log of all decisions
//!
//! # Example
//!
//! ```
//! use claude_toolguard::{Config, GuardEngine, HookInput};
//!
//! let config = Config::default();
//! let engine = GuardEngine::new(config);
//!
//! let input = r#"{"tool_name":"Bash","tool_input":{"command":"rm -rf /"}}"#;
//! let hook_input = HookInput::from_json(input).unwrap();
//!
//! let verdict = engine.check(&hook_input);
//! assert!(verdict.is_block());
//! ```

pub mod audit;
pub mod config;
pub mod destructive;
pub mod engine;
pub mod input;
pub mod output;
pub mod redactor;
pub mod resolver;
pub mod rules;
pub mod scanner;

// Re-exports for convenience
pub use config::{Config, Severity, SeverityAction};
pub use engine::{GuardEngine, OutputVerdict};
pub use input::HookInput;
pub use output::HookOutput;
pub use resolver::{Verdict, CONFIRM_FLAG};
