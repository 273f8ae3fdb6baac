//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Formatters never re-derive roles or styles; they read them off the Violation

use crate::domain::{NamingError, NamingResult, Severity, ValidationReport, Violation};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with colors, grouped by file
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// SARIF 2.1.0 for code-scanning tools
    Sarif,
    /// GitHub Actions workflow commands
    GitHub,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "sarif", "github"]
    }
}

impl FromStr for OutputFormat {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "sarif" => Ok(Self::Sarif),
            "github" => Ok(Self::GitHub),
            other => Err(NamingError::config(format!(
                "Unknown output format '{}'. Available: {}",
                other,
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to print the expected style under each violation
    pub show_expected_style: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, show_expected_style: true, max_violations: None, min_severity: None }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a validation report in the specified format
    pub fn format_report(&self, report: &ValidationReport, format: OutputFormat) -> NamingResult<String> {
        let violations = self.filter_violations(&report.violations);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &violations)),
            OutputFormat::Json => self.format_json(report, &violations),
            OutputFormat::Sarif => self.format_sarif(&violations),
            OutputFormat::GitHub => Ok(self.format_github(&violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> NamingResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn filter_violations<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        let mut filtered: Vec<&Violation> = violations
            .iter()
            .filter(|v| self.options.min_severity.map_or(true, |min| v.severity >= min))
            .collect();

        if let Some(max) = self.options.max_violations {
            filtered.truncate(max);
        }

        filtered
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn format_human(&self, report: &ValidationReport, violations: &[&Violation]) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            output.push_str(&format!("✅ {}\n", self.paint("32", "No naming violations found")));
        } else {
            let (icon, color) = if report.has_errors() { ("❌", "31") } else { ("⚠️", "33") };
            output.push_str(&format!("{} {}\n\n", icon, self.paint(color, "Naming Violations Found")));

            // Group by file, keeping each file's violations in report order
            let mut by_file: BTreeMap<&Path, Vec<&Violation>> = BTreeMap::new();
            for violation in violations {
                by_file.entry(violation.location().file.as_path()).or_default().push(violation);
            }

            for (file, file_violations) in by_file {
                output.push_str(&format!("📁 {}\n", file.display()));

                for violation in file_violations {
                    let location = violation.location();
                    let position = match location.column {
                        Some(column) => format!("{}:{}", location.line, column),
                        None => location.line.to_string(),
                    };

                    output.push_str(&format!(
                        "  {} [{}] {}\n",
                        self.paint("2", &format!("{}:{}", position, violation.rule_id)),
                        self.paint(severity_color(violation.severity), violation.severity.as_str()),
                        violation.message
                    ));

                    if self.options.show_expected_style {
                        output.push_str(&format!(
                            "    {}\n",
                            self.paint(
                                "32",
                                &format!("expected {} ({})", violation.expected_style, violation.constraint)
                            )
                        ));
                    }
                }
                output.push('\n');
            }
        }

        if !report.rejected.is_empty() {
            output.push_str(&format!(
                "{}\n",
                self.paint("33", &format!("{} declaration(s) could not be validated:", report.rejected.len()))
            ));
            for rejected in &report.rejected {
                output.push_str(&format!("  {} {}\n", rejected.declaration.location, rejected.reason));
            }
            output.push('\n');
        }

        output.push_str(&self.format_summary(report));
        output
    }

    fn format_json(&self, report: &ValidationReport, violations: &[&Violation]) -> NamingResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule_id": v.rule_id,
                    "role": v.role,
                    "identifier": v.identifier(),
                    "kind": v.declaration.kind,
                    "expected_style": v.expected_style.as_str(),
                    "constraint": v.constraint,
                    "severity": v.severity.as_str(),
                    "file": v.location().file.display().to_string(),
                    "line": v.location().line,
                    "column": v.location().column,
                    "message": v.message
                })
            })
            .collect();

        let rejected: Vec<JsonValue> = report
            .rejected
            .iter()
            .map(|r| {
                serde_json::json!({
                    "identifier": r.declaration.identifier,
                    "file": r.declaration.location.file.display().to_string(),
                    "line": r.declaration.location.line,
                    "reason": r.reason
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "rejected": rejected,
            "summary": {
                "total_declarations": report.summary.total_declarations,
                "violations_by_severity": {
                    "error": report.summary.violations_by_severity.error,
                    "warning": report.summary.violations_by_severity.warning,
                    "info": report.summary.violations_by_severity.info
                },
                "duplicates_removed": report.summary.duplicates_removed,
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| NamingError::config(format!("JSON serialization failed: {e}")))
    }

    fn format_sarif(&self, violations: &[&Violation]) -> NamingResult<String> {
        let results: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                let level = match v.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "note",
                };

                serde_json::json!({
                    "ruleId": v.rule_id,
                    "level": level,
                    "message": { "text": v.message },
                    "properties": { "constraint": v.constraint },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": { "uri": v.location().file.display().to_string() },
                            "region": {
                                "startLine": v.location().line,
                                "startColumn": v.location().column.unwrap_or(1)
                            }
                        }
                    }]
                })
            })
            .collect();

        let sarif_report = serde_json::json!({
            "version": "2.1.0",
            "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "naming-guardian",
                        "version": env!("CARGO_PKG_VERSION"),
                        "informationUri": "https://github.com/cloudfunnels/naming-guardian"
                    }
                },
                "results": results
            }]
        });

        serde_json::to_string_pretty(&sarif_report)
            .map_err(|e| NamingError::config(format!("SARIF serialization failed: {e}")))
    }

    fn format_github(&self, violations: &[&Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            let level = match violation.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "notice",
            };

            let location = violation.location();
            let position = match location.column {
                Some(column) => format!("line={},col={}", location.line, column),
                None => format!("line={}", location.line),
            };

            output.push_str(&format!(
                "::{} file={},{},title={}::{}\n",
                level,
                escape_property(&location.file.display().to_string()),
                position,
                escape_property(&violation.rule_id),
                escape_data(&violation.message)
            ));
        }

        output
    }

    fn format_summary(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.violations_by_severity;
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;
        let mut summary = format!("📊 {} ", self.paint("1", "Summary:"));

        if counts.total() == 0 {
            summary.push_str(&self.paint("32", "0 violations"));
        } else {
            let mut parts = Vec::new();
            if counts.error > 0 {
                parts.push(self.paint("31", &plural(counts.error, "error")));
            }
            if counts.warning > 0 {
                parts.push(self.paint("33", &plural(counts.warning, "warning")));
            }
            if counts.info > 0 {
                parts.push(self.paint("36", &format!("{} info", counts.info)));
            }
            summary.push_str(&parts.join(", "));
        }

        summary.push_str(&format!(
            " in {} declarations ({:.1}s)\n",
            report.summary.total_declarations, execution_time
        ));
        summary
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "31",
        Severity::Warning => "33",
        Severity::Info => "36",
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Workflow-command message escaping
fn escape_data(text: &str) -> String {
    text.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Workflow-command property escaping; `:` and `,` delimit properties
fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CaseStyle, Declaration, DeclarationKind, RejectedDeclaration, Role, SourceLocation,
        ViolatedConstraint,
    };

    fn create_test_report() -> ValidationReport {
        let mut report = ValidationReport::new();

        report.add_violation(Violation::new(
            Role::TypeName,
            Declaration::new(
                "dataProcessor",
                DeclarationKind::Class,
                SourceLocation::new("src/DataProcessor.java", 42).with_column(14),
            ),
            CaseStyle::PascalCase,
            ViolatedConstraint::WrongCase,
            Severity::Error,
            "Class name 'dataProcessor' must start with an uppercase letter",
        ));
        report.add_violation(Violation::new(
            Role::FieldName,
            Declaration::new("max_count", DeclarationKind::Field, SourceLocation::new("src/User.java", 7)),
            CaseStyle::CamelCase,
            ViolatedConstraint::IllegalSeparator,
            Severity::Warning,
            "Field name 'max_count' must not contain underscores",
        ));

        report.set_declarations_seen(10);
        report.set_execution_time(1200);
        report
    }

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions { use_colors: false, ..Default::default() })
    }

    #[test]
    fn test_human_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Human).unwrap();

        assert!(output.contains("Naming Violations Found"));
        assert!(output.contains("src/DataProcessor.java"));
        assert!(output.contains("42:14:type_name [error]"));
        assert!(output.contains("expected PascalCase (wrong_case)"));
        assert!(output.contains("1 error, 1 warning in 10 declarations"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_json_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Json).unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["violations"][0]["rule_id"], "type_name");
        assert_eq!(json["violations"][0]["constraint"], "wrong_case");
        assert_eq!(json["violations"][1]["expected_style"], "camelCase");
        assert_eq!(json["summary"]["total_declarations"], 10);
    }

    #[test]
    fn test_sarif_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Sarif).unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["version"], "2.1.0");
        let results = json["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results[1]["level"], "warning");
        assert_eq!(results[0]["locations"][0]["physicalLocation"]["region"]["startColumn"], 14);
    }

    #[test]
    fn test_github_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::GitHub).unwrap();

        assert!(output.contains("::error file=src/DataProcessor.java,line=42,col=14,title=type_name::"));
        assert!(output.contains("::warning file=src/User.java,line=7,title=field_name::"));
    }

    #[test]
    fn test_github_format_escapes_workflow_commands() {
        let mut report = ValidationReport::new();
        report.add_violation(Violation::new(
            Role::PackageName,
            Declaration::new("com,acme", DeclarationKind::Package, SourceLocation::new("a,b:c.java", 1)),
            CaseStyle::LowerDotted,
            ViolatedConstraint::IllegalSeparator,
            Severity::Warning,
            "Package name 'com,acme' must not contain ','\n100% wrong",
        ));

        let output = plain().format_report(&report, OutputFormat::GitHub).unwrap();

        assert_eq!(
            output,
            "::warning file=a%2Cb%3Ac.java,line=1,title=package_name::Package name 'com,acme' must not contain ','%0A100%25 wrong\n"
        );
    }

    #[test]
    fn test_empty_report_with_rejections() {
        let mut report = ValidationReport::new();
        report.add_rejected(RejectedDeclaration {
            declaration: Declaration::new("", DeclarationKind::Field, SourceLocation::new("A.java", 3)),
            reason: "Malformed identifier: identifier is empty".to_string(),
        });

        let output = plain().format_report(&report, OutputFormat::Human).unwrap();
        assert!(output.contains("No naming violations found"));
        assert!(output.contains("1 declaration(s) could not be validated"));
        assert!(output.contains("A.java:3"));
    }

    #[test]
    fn test_severity_filter_and_limit() {
        let formatter = ReportFormatter::new(ReportOptions {
            min_severity: Some(Severity::Error),
            ..Default::default()
        });
        let output = formatter.format_report(&create_test_report(), OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["violations"].as_array().unwrap().len(), 1);

        let formatter = ReportFormatter::new(ReportOptions { max_violations: Some(1), ..Default::default() });
        let output = formatter.format_report(&create_test_report(), OutputFormat::GitHub).unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("SARIF".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("junit".parse::<OutputFormat>().is_err());
    }
}
