//! Naming Guardian - Naming-convention enforcement for declaration streams
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Classification, rules and matching live in pure domain modules
//! - Manifest loading and report rendering are outer layers around the engine
//! - The validator facade wires configuration, engine, aggregation and reporting

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod engine;
pub mod matchers;
pub mod report;
pub mod rules;
pub mod source;

// Re-export main types for convenient access
pub use domain::{
    CaseStyle, Declaration, DeclarationKind, Modifier, NamingError, NamingResult,
    RejectedDeclaration, Role, Severity, SourceLocation, ValidationReport, ValidationSummary,
    ViolatedConstraint, Violation,
};

pub use aggregator::ViolationAggregator;
pub use classifier::{ClassifierOptions, RoleClassifier};
pub use config::{AcronymList, AcronymPreset, ConfigBuilder, NamingConfig};
pub use engine::{ValidationEngine, ValidationPass};
pub use matchers::{segment, CaseMatcher, MatchOutcome, MatchPolicy, COMMON_ACRONYMS};
pub use report::{OutputFormat, ReportFormatter, ReportOptions};
pub use rules::{Rule, RuleOverride, RuleTable};
pub use source::{DeclarationSource, ManifestLoader, PathFilter};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;

/// Channel capacity between manifest reading and validation
const STREAM_BUFFER: usize = 256;

/// Main validator providing high-level validation operations
pub struct NamingValidator {
    config: NamingConfig,
    engine: ValidationEngine,
    report_formatter: ReportFormatter,
}

/// Options for a validation run
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Validate on the rayon pool
    pub parallel: bool,
    /// Sort the report file-then-line instead of stream order
    pub sort_by_location: bool,
    /// Abort on the first unreadable manifest
    pub fail_fast: bool,
    /// Additional path patterns to exclude
    pub exclude_patterns: Vec<String>,
    /// Whether to ignore .namingignore files
    pub ignore_ignore_files: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            sort_by_location: false,
            fail_fast: false,
            exclude_patterns: Vec::new(),
            ignore_ignore_files: false,
        }
    }
}

/// Counts of enabled and disabled rules
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleStats {
    pub enabled_rules: usize,
    pub disabled_rules: usize,
    pub blocking_rules: usize,
}

impl NamingValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: NamingConfig) -> NamingResult<Self> {
        config.validate()?;
        let engine = ValidationEngine::from_config(&config)?;

        Ok(Self { config, engine, report_formatter: ReportFormatter::default() })
    }

    /// Create a validator with default configuration
    pub fn new() -> NamingResult<Self> {
        Self::new_with_config(NamingConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> NamingResult<Self> {
        Self::new_with_config(NamingConfig::load_from_file(path)?)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Validate declarations already in memory
    pub fn validate_declarations(
        &self,
        declarations: Vec<Declaration>,
        options: &ValidationOptions,
    ) -> NamingResult<ValidationReport> {
        let start_time = Instant::now();

        let pass = if options.parallel && declarations.len() > 1 {
            self.engine.validate_parallel(declarations)?
        } else {
            self.engine.validate(declarations)?
        };

        Ok(self.build_report(pass, start_time, options))
    }

    /// Discover manifests under `paths`, load them and validate
    pub fn validate_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &ValidationOptions,
    ) -> NamingResult<ValidationReport> {
        let loader = self.loader(options)?;
        let manifests = loader.discover(paths)?;
        let loaded = loader.load_all(&manifests, options.fail_fast)?;

        tracing::info!(
            "Loaded {} declarations from {} manifests",
            loaded.declarations.len(),
            loaded.manifests_loaded
        );

        self.validate_declarations(loaded.declarations, options)
    }

    /// Stream manifests through the engine as they are read
    ///
    /// Produces the same report as [`NamingValidator::validate_paths`] without holding every
    /// declaration in memory first.
    pub async fn validate_stream<P: AsRef<Path>>(
        &self,
        paths: Vec<P>,
        options: &ValidationOptions,
    ) -> NamingResult<ValidationReport> {
        let start_time = Instant::now();
        let loader = self.loader(options)?;
        let manifests: Vec<PathBuf> = loader.discover(&paths)?;

        let (sender, receiver) = mpsc::channel(STREAM_BUFFER);
        let (sent, pass) = tokio::join!(
            loader.stream(&manifests, sender, options.fail_fast),
            self.engine.validate_channel(receiver)
        );

        tracing::debug!("Streamed {} declarations", sent?);
        Ok(self.build_report(pass?, start_time, options))
    }

    /// Format a validation report for output
    pub fn format_report(&self, report: &ValidationReport, format: OutputFormat) -> NamingResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Statistics about the effective rule table
    pub fn rule_statistics(&self) -> RuleStats {
        let mut stats = RuleStats::default();
        for rule in self.engine.rules().rules() {
            if rule.enabled {
                stats.enabled_rules += 1;
                if rule.severity.is_blocking() {
                    stats.blocking_rules += 1;
                }
            } else {
                stats.disabled_rules += 1;
            }
        }
        stats
    }

    fn loader(&self, options: &ValidationOptions) -> NamingResult<ManifestLoader> {
        let ignore_file = if options.ignore_ignore_files { None } else { self.config.ignore_file() };
        let mut filter = PathFilter::new(self.config.paths.patterns.clone(), ignore_file)?;
        for pattern in &options.exclude_patterns {
            filter.add_pattern(pattern)?;
        }
        Ok(ManifestLoader::new(filter))
    }

    fn build_report(
        &self,
        pass: ValidationPass,
        start_time: Instant,
        options: &ValidationOptions,
    ) -> ValidationReport {
        let mut aggregator = ViolationAggregator::new();
        aggregator.extend(pass.violations);

        let mut report = ValidationReport::new();
        report.set_duplicates_removed(aggregator.duplicates_removed());
        for violation in aggregator.finish() {
            report.add_violation(violation);
        }
        for rejected in pass.rejected {
            report.add_rejected(rejected);
        }

        report.set_declarations_seen(pass.declarations_seen);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        if options.sort_by_location {
            report.sort_violations();
        }

        report
    }
}

/// Convenience function to create a validator with default settings
pub fn create_validator() -> NamingResult<NamingValidator> {
    NamingValidator::new()
}

/// Validate in-memory declarations with default settings
pub fn validate_declarations(declarations: Vec<Declaration>) -> NamingResult<ValidationReport> {
    NamingValidator::new()?.validate_declarations(declarations, &ValidationOptions::default())
}

/// Validate manifests under a directory with default settings
pub fn validate_directory<P: AsRef<Path>>(directory: P) -> NamingResult<ValidationReport> {
    NamingValidator::new()?.validate_paths(&[directory], &ValidationOptions::default())
}

/// Gate checks for commit hooks and CI
pub mod gate {
    use super::*;

    /// Pre-commit validation
    ///
    /// Fails if any error-severity violation is found in the given manifests.
    pub async fn pre_commit_check<P: AsRef<Path>>(manifests: Vec<P>) -> NamingResult<()> {
        let validator = NamingValidator::new()?;
        let report = validator.validate_stream(manifests, &ValidationOptions::default()).await?;

        if report.has_errors() {
            let error_count = report.summary.violations_by_severity.error;
            return Err(NamingError::validation(format!(
                "Pre-commit check failed: {} blocking violation{} found",
                error_count,
                if error_count == 1 { "" } else { "s" }
            )));
        }

        Ok(())
    }

    /// Strict validation for CI pipelines
    ///
    /// Fails on any violation or rejected declaration, whatever its severity.
    pub async fn strict_check<P: AsRef<Path>>(manifests: Vec<P>) -> NamingResult<ValidationReport> {
        let options = ValidationOptions { fail_fast: true, sort_by_location: true, ..Default::default() };

        let validator = NamingValidator::new()?;
        let report = validator.validate_stream(manifests, &options).await?;

        if report.has_violations() || !report.rejected.is_empty() {
            return Err(NamingError::validation(format!(
                "Strict validation failed: {} violations, {} rejected declarations",
                report.violations.len(),
                report.rejected.len()
            )));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const USER_MANIFEST: &str = r#"{
        "file": "src/UserManager.java",
        "declarations": [
            { "identifier": "UserManager", "kind": "class", "line": 3 },
            { "identifier": "max_count", "kind": "field", "modifiers": ["private"], "line": 9 },
            { "identifier": "ProcessData", "kind": "method", "modifiers": ["public"], "line": 14 }
        ]
    }"#;

    const BAD_CLASS_MANIFEST: &str = r#"{
        "file": "src/dataProcessor.java",
        "declarations": [ { "identifier": "dataProcessor", "kind": "class", "line": 1 } ]
    }"#;

    fn field(identifier: &str, file: &str, line: u32) -> Declaration {
        Declaration::new(identifier, DeclarationKind::Field, SourceLocation::new(file, line))
    }

    #[test]
    fn test_validator_creation() {
        let validator = NamingValidator::new().unwrap();
        let stats = validator.rule_statistics();

        assert_eq!(stats.enabled_rules, Role::COUNT);
        assert_eq!(stats.blocking_rules, 2);
    }

    #[test]
    fn test_duplicates_are_aggregated() {
        let validator = NamingValidator::new().unwrap();
        let declarations =
            vec![field("max_count", "A.java", 2), field("max_count", "A.java", 2), field("ok", "A.java", 3)];

        let report = validator
            .validate_declarations(declarations, &ValidationOptions::default())
            .unwrap();

        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.summary.duplicates_removed, 1);
        assert_eq!(report.summary.total_declarations, 3);
        assert!(report.config_fingerprint.is_some());
    }

    #[test]
    fn test_sort_by_location_option() {
        let validator = NamingValidator::new().unwrap();
        let declarations = vec![field("B_b", "B.java", 1), field("A_a", "A.java", 5)];

        let streamed = validator
            .validate_declarations(declarations.clone(), &ValidationOptions::default())
            .unwrap();
        assert_eq!(streamed.violations[0].identifier(), "B_b");

        let options = ValidationOptions { sort_by_location: true, ..Default::default() };
        let sorted = validator.validate_declarations(declarations, &options).unwrap();
        assert_eq!(sorted.violations[0].identifier(), "A_a");
    }

    #[test]
    fn test_validate_paths() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("user.json"), USER_MANIFEST).unwrap();

        let report = validate_directory(temp_dir.path()).unwrap();
        let identifiers: Vec<_> = report.violations.iter().map(|v| v.identifier()).collect();
        assert_eq!(identifiers, vec!["max_count", "ProcessData"]);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_exclude_patterns() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("user.json"), USER_MANIFEST).unwrap();

        let validator = NamingValidator::new().unwrap();
        let options = ValidationOptions { exclude_patterns: vec!["user.json".to_string()], ..Default::default() };
        let report = validator.validate_paths(&[temp_dir.path()], &options).unwrap();
        assert_eq!(report.summary.total_declarations, 0);
    }

    #[tokio::test]
    async fn test_stream_matches_batch() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.json"), USER_MANIFEST).unwrap();
        fs::write(temp_dir.path().join("b.json"), BAD_CLASS_MANIFEST).unwrap();

        let validator = NamingValidator::new().unwrap();
        let options = ValidationOptions::default();
        let batch = validator.validate_paths(&[temp_dir.path()], &options).unwrap();
        let streamed = validator.validate_stream(vec![temp_dir.path()], &options).await.unwrap();

        assert_eq!(batch.violations, streamed.violations);
        assert_eq!(streamed.summary.total_declarations, 4);
    }

    #[tokio::test]
    async fn test_pre_commit_check() {
        let temp_dir = TempDir::new().unwrap();
        let warnings_only = temp_dir.path().join("user.json");
        let blocking = temp_dir.path().join("bad.json");
        fs::write(&warnings_only, USER_MANIFEST).unwrap();
        fs::write(&blocking, BAD_CLASS_MANIFEST).unwrap();

        assert!(gate::pre_commit_check(vec![&warnings_only]).await.is_ok());
        assert!(matches!(
            gate::pre_commit_check(vec![&blocking]).await,
            Err(NamingError::Validation { .. })
        ));
        assert!(gate::strict_check(vec![&warnings_only]).await.is_err());
    }

    #[test]
    fn test_report_formatting() {
        let validator = NamingValidator::new().unwrap().with_report_formatter(ReportFormatter::new(
            ReportOptions { use_colors: false, ..Default::default() },
        ));
        let report = validator
            .validate_declarations(vec![field("UserEmail", "User.java", 4)], &ValidationOptions::default())
            .unwrap();

        let human = validator.format_report(&report, OutputFormat::Human).unwrap();
        assert!(human.contains("Field name 'UserEmail' must start with a lowercase letter"));

        let json = validator.format_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["violations"][0]["rule_id"], "field_name");
    }
}
