//! Rule table mapping naming roles to case-style rules
//!
//! CDD Principle: Repository Pattern - The rule table is the single source of naming policy
//! - One row per role, looked up by dense role index
//! - The standard table is built once per process and shared read-only
//! - Overridden tables are built once at engine construction and never mutated

use crate::domain::{CaseStyle, NamingError, NamingResult, Role, Severity};
use crate::matchers::MatchPolicy;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

lazy_static! {
    static ref STANDARD_RULES: RuleTable = RuleTable { rows: standard_rows().map(Some) };
}

/// The naming rule for one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub role: Role,
    pub allowed_style: CaseStyle,
    /// Minimum number of segmented words
    pub min_words: usize,
    /// Whether acronym runs like `XML` are allowed
    pub allow_acronym_run: bool,
    pub severity: Severity,
    pub enabled: bool,
}

impl Rule {
    pub fn new(role: Role, allowed_style: CaseStyle, severity: Severity) -> Self {
        Self { role, allowed_style, min_words: 1, allow_acronym_run: true, severity, enabled: true }
    }

    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    pub fn with_acronym_runs(mut self, allow: bool) -> Self {
        self.allow_acronym_run = allow;
        self
    }

    pub fn rule_id(&self) -> &'static str {
        self.role.rule_id()
    }

    /// Build the matcher policy for this rule
    pub fn policy<'a>(
        &self,
        known_acronyms: Option<&'a BTreeSet<String>>,
        max_unsegmented_length: Option<usize>,
    ) -> MatchPolicy<'a> {
        MatchPolicy {
            min_words: self.min_words,
            allow_acronym_run: self.allow_acronym_run,
            known_acronyms,
            max_unsegmented_length,
        }
    }

    /// One-paragraph description used by `explain`
    pub fn describe(&self) -> String {
        let acronyms = if self.allow_acronym_run { "allowed" } else { "not allowed" };
        format!(
            "{} ({}): {}s must be written in {}, with at least {} word(s); acronym runs {}. Severity: {}.{}",
            self.rule_id(),
            self.role.label(),
            self.role.label(),
            self.allowed_style,
            self.min_words,
            acronyms,
            self.severity.as_str(),
            if self.enabled { "" } else { " (disabled)" }
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<22} {:<17} min_words={} acronyms={} severity={}{}",
            self.rule_id(),
            self.allowed_style.as_str(),
            self.min_words,
            self.allow_acronym_run,
            self.severity.as_str(),
            if self.enabled { "" } else { " (disabled)" }
        )
    }
}

/// Partial rule settings loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_acronym_run: Option<bool>,
}

impl RuleOverride {
    fn apply(&self, rule: &mut Rule) {
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
        if let Some(severity) = self.severity {
            rule.severity = severity;
        }
        if let Some(min_words) = self.min_words {
            rule.min_words = min_words;
        }
        if let Some(allow) = self.allow_acronym_run {
            rule.allow_acronym_run = allow;
        }
    }
}

/// Role-indexed table of naming rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rows: [Option<Rule>; Role::COUNT],
}

impl RuleTable {
    /// The process-wide standard table
    pub fn standard() -> &'static RuleTable {
        &STANDARD_RULES
    }

    /// Build a table from explicit rows, rejecting duplicate roles
    ///
    /// The result may be partial; call [`RuleTable::ensure_total`] before validating with it.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> NamingResult<Self> {
        let mut rows = [None; Role::COUNT];
        for rule in rules {
            let slot = &mut rows[rule.role.index()];
            if slot.is_some() {
                return Err(NamingError::config(format!(
                    "Duplicate rule for role '{}'",
                    rule.role.rule_id()
                )));
            }
            *slot = Some(rule);
        }
        Ok(Self { rows })
    }

    /// Fail unless every role has a row
    pub fn ensure_total(&self) -> NamingResult<()> {
        let missing: Vec<&str> = Role::ALL
            .iter()
            .filter(|role| self.rows[role.index()].is_none())
            .map(|role| role.rule_id())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(NamingError::config(format!("No rule defined for role(s): {}", missing.join(", "))))
        }
    }

    /// Look up the rule for a role
    pub fn lookup(&self, role: Role) -> NamingResult<&Rule> {
        self.rows[role.index()].as_ref().ok_or_else(|| {
            NamingError::config(format!("No rule defined for role '{}'", role.rule_id()))
        })
    }

    /// Copy this table with configuration overrides applied
    pub fn with_overrides(&self, overrides: &BTreeMap<Role, RuleOverride>) -> NamingResult<Self> {
        let mut table = self.clone();
        for (role, settings) in overrides {
            if settings.min_words == Some(0) {
                return Err(NamingError::config(format!(
                    "min_words for '{}' must be at least 1",
                    role.rule_id()
                )));
            }
            let rule = table.rows[role.index()].as_mut().ok_or_else(|| {
                NamingError::config(format!("Cannot override missing rule '{}'", role.rule_id()))
            })?;
            settings.apply(rule);
            tracing::debug!("Rule {} overridden: {}", role.rule_id(), rule.describe());
        }
        tracing::debug!(
            "Rule table built with {} override(s), {} of {} rules enabled",
            overrides.len(),
            table.rules().filter(|r| r.enabled).count(),
            table.len()
        );
        Ok(table)
    }

    /// Rules in role order
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rows.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.rules().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        STANDARD_RULES.clone()
    }
}

fn standard_rows() -> [Rule; Role::COUNT] {
    [
        Rule::new(Role::TypeName, CaseStyle::PascalCase, Severity::Error),
        Rule::new(Role::InterfaceName, CaseStyle::PascalCase, Severity::Error),
        Rule::new(Role::ConstantName, CaseStyle::UpperSnakeCase, Severity::Warning)
            .with_acronym_runs(false),
        Rule::new(Role::FieldName, CaseStyle::CamelCase, Severity::Warning),
        Rule::new(Role::MethodName, CaseStyle::CamelCase, Severity::Warning),
        Rule::new(Role::LocalVariableName, CaseStyle::CamelCase, Severity::Warning),
        Rule::new(Role::ParameterName, CaseStyle::CamelCase, Severity::Warning),
        Rule::new(Role::PackageName, CaseStyle::LowerDotted, Severity::Warning)
            .with_acronym_runs(false),
    ]
}
