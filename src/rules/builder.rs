//! Rule-set assembly
//!
//! Builds the active rule list for one decision: enabled built-in
//! sub-categories plus compiled custom patterns. The set is recomputed on
//! every call so it always reflects the configuration it was handed;
//! built-in regexes compile once behind `Lazy` and are cheaply cloned
//! (`Regex` is reference-counted internally).

use crate::config::{Config, Severity};
use crate::rules::catalog;
use crate::rules::{ActiveRule, Category, PatternDef};

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Custom patterns without an explicit severity default to medium
const DEFAULT_CUSTOM_SEVERITY: Severity = Severity::Medium;

struct CompiledDef {
    category: Category,
    def: &'static PatternDef,
    regex: Regex,
}

static COMPILED_BUILTINS: Lazy<Vec<CompiledDef>> = Lazy::new(|| {
    let mut compiled = Vec::new();
    for (category, table) in catalog::registration_order() {
        for def in table {
            compiled.push(CompiledDef {
                category,
                def,
                // Catalog patterns are covered by a compile-all test
                regex: Regex::new(def.pattern).unwrap(),
            });
        }
    }
    compiled
});

/// Build the active rule set for a configuration.
///
/// Registration order is preserved: API keys, cloud credentials, tokens,
/// private keys, PII, then custom patterns. A custom pattern whose source
/// fails to compile is dropped silently; detection proceeds without it.
pub fn build_patterns(config: &Config) -> Vec<ActiveRule> {
    let mut rules = Vec::new();

    for entry in COMPILED_BUILTINS.iter() {
        let family = match entry.category {
            Category::Secrets => &config.secrets,
            Category::Pii => &config.pii,
            Category::Custom => continue,
        };

        if !family.enabled || !family.category_enabled(entry.def.subcategory) {
            continue;
        }

        rules.push(ActiveRule {
            id: entry.def.id.to_string(),
            regex: entry.regex.clone(),
            validator: entry.def.validator,
            severity: entry.def.severity,
            category: entry.category,
            action_override: None,
        });
    }

    for custom in &config.custom_patterns {
        let compiled = RegexBuilder::new(&custom.pattern)
            .case_insensitive(true)
            .build();

        let regex = match compiled {
            Ok(regex) => regex,
            // Invalid custom pattern: degrade, don't fail the engine
            Err(_) => continue,
        };

        rules.push(ActiveRule {
            id: custom.name.clone(),
            regex,
            validator: None,
            severity: custom.severity.unwrap_or(DEFAULT_CUSTOM_SEVERITY),
            category: Category::Custom,
            action_override: custom.action,
        });
    }

    rules
}

/// Look up the validator fn for a built-in rule id (used by tests)
#[cfg(test)]
pub fn builtin_validator(id: &str) -> Option<crate::rules::Validator> {
    COMPILED_BUILTINS
        .iter()
        .find(|e| e.def.id == id)
        .and_then(|e| e.def.validator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomPattern, SeverityAction};

    #[test]
    fn test_build_default_includes_all_families() {
        let config = Config::default();
        let rules = build_patterns(&config);

        assert!(rules.iter().any(|r| r.id == "aws-access-key-id"));
        assert!(rules.iter().any(|r| r.id == "private-key-block"));
        assert!(rules.iter().any(|r| r.id == "ssn"));
    }

    #[test]
    fn test_registration_order_preserved() {
        let config = Config::default();
        let rules = build_patterns(&config);

        let pos = |id: &str| rules.iter().position(|r| r.id == id).unwrap();
        assert!(pos("anthropic-api-key") < pos("aws-access-key-id"));
        assert!(pos("aws-access-key-id") < pos("jwt"));
        assert!(pos("jwt") < pos("private-key-block"));
        assert!(pos("private-key-block") < pos("ssn"));
    }

    #[test]
    fn test_disabled_family_excluded() {
        let mut config = Config::default();
        config.pii.enabled = false;
        let rules = build_patterns(&config);

        assert!(rules.iter().all(|r| r.category != Category::Pii));
        assert!(rules.iter().any(|r| r.category == Category::Secrets));
    }

    #[test]
    fn test_disabled_subcategory_excluded() {
        let mut config = Config::default();
        config
            .secrets
            .categories
            .insert("cloud_credentials".to_string(), false);
        let rules = build_patterns(&config);

        assert!(!rules.iter().any(|r| r.id == "aws-access-key-id"));
        assert!(rules.iter().any(|r| r.id == "anthropic-api-key"));
    }

    #[test]
    fn test_custom_patterns_appended_last() {
        let mut config = Config::default();
        config.custom_patterns.push(CustomPattern {
            name: "employee-id".to_string(),
            pattern: r"EMP-\d{6}".to_string(),
            severity: Some(Severity::High),
            action: Some(SeverityAction::Block),
        });

        let rules = build_patterns(&config);
        let last = rules.last().unwrap();
        assert_eq!(last.id, "employee-id");
        assert_eq!(last.category, Category::Custom);
        assert_eq!(last.action_override, Some(SeverityAction::Block));
    }

    #[test]
    fn test_custom_patterns_case_insensitive() {
        let mut config = Config::default();
        config.custom_patterns.push(CustomPattern {
            name: "project-code".to_string(),
            pattern: r"proj-[a-z]{4}".to_string(),
            severity: None,
            action: None,
        });

        let rules = build_patterns(&config);
        let rule = rules.iter().find(|r| r.id == "project-code").unwrap();
        assert!(rule.regex.is_match("PROJ-DEMO"));
        assert_eq!(rule.severity, Severity::Medium);
    }

    #[test]
    fn test_invalid_custom_pattern_dropped() {
        let mut config = Config::default();
        config.custom_patterns.push(CustomPattern {
            name: "broken".to_string(),
            pattern: r"[unclosed".to_string(),
            severity: None,
            action: None,
        });
        config.custom_patterns.push(CustomPattern {
            name: "working".to_string(),
            pattern: r"ok-\d+".to_string(),
            severity: None,
            action: None,
        });

        let rules = build_patterns(&config);
        assert!(!rules.iter().any(|r| r.id == "broken"));
        assert!(rules.iter().any(|r| r.id == "working"));
    }

    #[test]
    fn test_builtin_validators_wired() {
        assert!(builtin_validator("credit-card").is_some());
        assert!(builtin_validator("ssn").is_some());
        assert!(builtin_validator("aws-access-key-id").is_none());
    }
}
