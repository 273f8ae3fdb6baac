//! Core domain models for naming violations and validation results
//!
//! Architecture: Rich Domain Models - Violations are entities with behavior, not just data
//! - A Violation carries the offending Declaration so reports never re-derive classification
//! - ValidationReport acts as an aggregate root managing collections of violations
//! - Malformed declarations are kept apart from violations; they are input errors, not findings

use crate::domain::declaration::{CaseStyle, Declaration, Role, SourceLocation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity levels for naming violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages and suggestions
    Info,
    /// Warnings that should be addressed but don't block builds
    Warning,
    /// Errors that block commits and fail CI/CD builds
    Error,
}

impl Severity {
    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// The specific structural rule an identifier broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolatedConstraint {
    /// Initial letter or overall letter case does not fit the style
    WrongCase,
    /// Underscore, hyphen or other non-identifier character where none is allowed
    IllegalSeparator,
    /// Word boundaries cannot be recovered from the casing
    AmbiguousWordBoundary,
    /// An uppercase run cannot be split into acronym and word unambiguously
    AmbiguousAcronymPlacement,
}

impl ViolatedConstraint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WrongCase => "wrong_case",
            Self::IllegalSeparator => "illegal_separator",
            Self::AmbiguousWordBoundary => "ambiguous_word_boundary",
            Self::AmbiguousAcronymPlacement => "ambiguous_acronym_placement",
        }
    }
}

impl fmt::Display for ViolatedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration whose identifier does not conform to its role's case style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that produced this violation
    pub rule_id: String,
    /// Role the declaration was classified into
    pub role: Role,
    /// The offending declaration, location included
    pub declaration: Declaration,
    /// Case style the role requires
    pub expected_style: CaseStyle,
    /// Which constraint was broken
    pub constraint: ViolatedConstraint,
    /// Severity level of this violation
    pub severity: Severity,
    /// Human-readable description of the violation
    pub message: String,
}

impl Violation {
    /// Create a new violation
    pub fn new(
        role: Role,
        declaration: Declaration,
        expected_style: CaseStyle,
        constraint: ViolatedConstraint,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: role.rule_id().to_string(),
            role,
            declaration,
            expected_style,
            constraint,
            severity,
            message: message.into(),
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.declaration.location
    }

    pub fn identifier(&self) -> &str {
        &self.declaration.identifier
    }

    /// Whether this violation is blocking (prevents commits/builds)
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format violation for display
    pub fn format_display(&self) -> String {
        format!(
            "{} [{}] {} ({})",
            self.location(),
            self.severity.as_str(),
            self.message,
            self.constraint
        )
    }
}

/// A declaration the engine refused to validate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedDeclaration {
    pub declaration: Declaration,
    pub reason: String,
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Total number of declarations seen in the pass
    pub total_declarations: usize,
    /// Number of violations by severity level
    pub violations_by_severity: ViolationCounts,
    /// Violations dropped as duplicates by the aggregator
    pub duplicates_removed: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add a violation to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Complete validation report containing all violations and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Deduplicated violations in stream order (or location order when sorted)
    pub violations: Vec<Violation>,
    /// Declarations rejected as malformed input
    pub rejected: Vec<RejectedDeclaration>,
    /// Summary statistics
    pub summary: ValidationSummary,
    /// Configuration used for this validation
    pub config_fingerprint: Option<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            rejected: Vec::new(),
            summary: ValidationSummary { validated_at: Utc::now(), ..Default::default() },
            config_fingerprint: None,
        }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    /// Record a declaration that could not be validated
    pub fn add_rejected(&mut self, rejected: RejectedDeclaration) {
        self.rejected.push(rejected);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations (errors)
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    /// Get violations of a specific severity
    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    /// Set the number of declarations seen
    pub fn set_declarations_seen(&mut self, count: usize) {
        self.summary.total_declarations = count;
    }

    pub fn set_duplicates_removed(&mut self, count: usize) {
        self.summary.duplicates_removed = count;
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Set the configuration fingerprint
    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Sort violations by file, line and column for location-ordered output
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location().cmp(b.location()).then_with(|| a.constraint.cmp(&b.constraint))
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur during validation
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// Engine or configuration file is inconsistent; aborts the pass
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Identifier cannot be validated at all (e.g. empty)
    #[error("Malformed identifier: {reason}")]
    MalformedIdentifier { reason: String },

    /// A declaration source could not be loaded
    #[error("Source error in {file}: {message}")]
    Source { file: String, message: String },

    /// Path pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Validation gate failed
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl NamingError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a malformed identifier error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier { reason: reason.into() }
    }

    /// Create a source loading error
    pub fn source(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source { file: file.into(), message: message.into() }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Whether this error must abort a validation pass
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedIdentifier { .. })
    }
}

/// Result type for naming operations
pub type NamingResult<T> = Result<T, NamingError>;
