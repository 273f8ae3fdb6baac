//! Naming Guardian CLI - Command-line interface for naming-convention enforcement
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to validator operations
//! - Handles external concerns like config discovery, process exit codes, and terminal output
//! - Never classifies or matches identifiers itself

use clap::{Args, Parser, Subcommand, ValueEnum};
use naming_guardian::{
    segment, NamingConfig, NamingError, NamingResult, NamingValidator, OutputFormat,
    ReportFormatter, ReportOptions, Role, Severity, ValidationOptions,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Naming Guardian - Naming-convention enforcement
#[derive(Parser)]
#[command(name = "naming-guardian")]
#[command(version)]
#[command(about = "Validates declaration names against role-specific case conventions")]
#[command(
    long_about = "Naming Guardian reads declaration manifests produced by a source parser, classifies each declaration into a naming role and checks its identifier against that role's case style."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check declaration manifests for naming violations
    Check(CheckArgs),

    /// Show how an identifier is split into words
    Segment {
        /// Identifier to segment
        identifier: String,
    },

    /// List the effective rule table
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain, e.g. constant_name
        rule_id: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CheckArgs {
    /// Manifest files or directories (defaults to the current directory)
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Minimum severity level to report
    #[arg(short, long, value_enum)]
    severity: Option<SeverityArg>,

    /// Maximum number of violations to report
    #[arg(long)]
    max_violations: Option<usize>,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Ignore .namingignore files
    #[arg(long)]
    no_ignore: bool,

    /// Stream manifests through a single task instead of validating on all cores
    #[arg(long)]
    no_parallel: bool,

    /// Fail on the first unreadable manifest
    #[arg(long)]
    fail_fast: bool,

    /// Sort violations by file and line instead of input order
    #[arg(long)]
    sort: bool,

    /// Treat final local variables as constants
    #[arg(long)]
    final_locals_as_constants: bool,
}

#[derive(Copy, Clone, ValueEnum, PartialEq, Eq)]
enum OutputFormatArg {
    Human,
    Json,
    Sarif,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Sarif => OutputFormat::Sarif,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> NamingResult<i32> {
    match cli.command {
        Commands::Check(args) => run_check(cli.config, args, !cli.no_color).await,
        Commands::Segment { identifier } => run_segment(&identifier),
        Commands::Rules { enabled_only } => run_list_rules(cli.config, enabled_only),
        Commands::Explain { rule_id } => run_explain(cli.config, &rule_id),
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
    }
}

/// Explicit config, else one discovered in the working directory, else defaults
fn load_config(config_path: Option<PathBuf>) -> NamingResult<NamingConfig> {
    if let Some(path) = config_path {
        return NamingConfig::load_from_file(path);
    }

    match NamingConfig::discover(".") {
        Some(path) => {
            tracing::debug!("Using configuration {}", path.display());
            NamingConfig::load_from_file(path)
        }
        None => Ok(NamingConfig::default()),
    }
}

async fn run_check(config_path: Option<PathBuf>, args: CheckArgs, use_colors: bool) -> NamingResult<i32> {
    let mut config = load_config(config_path)?;
    if args.final_locals_as_constants {
        config.classification.final_locals_as_constants = true;
    }

    let validator = NamingValidator::new_with_config(config)?.with_report_formatter(ReportFormatter::new(
        ReportOptions {
            use_colors,
            max_violations: args.max_violations,
            min_severity: args.severity.map(Into::into),
            ..Default::default()
        },
    ));

    let paths = if args.paths.is_empty() { vec![PathBuf::from(".")] } else { args.paths };

    let options = ValidationOptions {
        parallel: !args.no_parallel,
        sort_by_location: args.sort,
        fail_fast: args.fail_fast,
        exclude_patterns: args.exclude,
        ignore_ignore_files: args.no_ignore,
    };

    let report = if options.parallel {
        validator.validate_paths(&paths, &options)?
    } else {
        validator.validate_stream(paths, &options).await?
    };

    let formatted = validator.format_report(&report, args.format.into())?;
    println!("{formatted}");

    Ok(if report.has_errors() { 1 } else { 0 })
}

fn run_segment(identifier: &str) -> NamingResult<i32> {
    if identifier.is_empty() {
        return Err(NamingError::malformed("identifier is empty"));
    }

    let segmentation = segment(identifier);
    println!("{identifier}");
    for word in &segmentation.words {
        println!("  {:<4} {:<16} {:?}", word.start, word.text, word.shape);
    }
    if let Some(run) = segmentation.ambiguous_run {
        println!("⚠️  ambiguous acronym placement at '{run}'");
    }

    Ok(0)
}

fn run_list_rules(config_path: Option<PathBuf>, enabled_only: bool) -> NamingResult<i32> {
    let table = load_config(config_path)?.rule_table()?;

    println!("📋 Naming Rules\n");
    for rule in table.rules() {
        if enabled_only && !rule.enabled {
            continue;
        }
        let status = if rule.enabled { "✅" } else { "❌" };
        println!("{status} {rule}");
    }

    Ok(0)
}

fn run_explain(config_path: Option<PathBuf>, rule_id: &str) -> NamingResult<i32> {
    let Some(role) = Role::from_rule_id(rule_id) else {
        eprintln!("❌ Rule '{rule_id}' not found");
        println!();
        println!("Available rules:");
        for role in Role::ALL {
            println!("  - {}", role.rule_id());
        }
        return Ok(1);
    };

    let table = load_config(config_path)?.rule_table()?;
    let rule = table.lookup(role)?;

    println!("📖 Rule: {}", rule.rule_id());
    println!("🔍 Style: {}", rule.allowed_style);
    println!("⚠️ Severity: {}", rule.severity.as_str());
    println!("✅ Enabled: {}", rule.enabled);
    println!();
    println!("📝 Description:");
    println!("   {}", rule.describe());

    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>) -> NamingResult<i32> {
    let config_path = config_path
        .or_else(|| NamingConfig::discover("."))
        .unwrap_or_else(|| PathBuf::from("naming_guardian.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match NamingConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("📊 Configuration summary:");
            println!("  Role overrides: {}", config.roles.len());
            println!("  Path patterns: {}", config.paths.patterns.len());
            println!(
                "  Final locals as constants: {}",
                config.classification.final_locals_as_constants
            );
            println!("  Fingerprint: {}", config.fingerprint());
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn check_args(paths: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            paths,
            format: OutputFormatArg::Json,
            severity: None,
            max_violations: None,
            exclude: vec![],
            no_ignore: false,
            no_parallel: false,
            fail_fast: false,
            sort: false,
            final_locals_as_constants: false,
        }
    }

    #[tokio::test]
    async fn test_check_command() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("types.json");
        fs::write(
            &manifest,
            r#"{ "declarations": [ { "identifier": "userService", "kind": "class", "line": 1 } ] }"#,
        )
        .unwrap();

        let config = temp_dir.path().join("naming_guardian.yaml");
        fs::write(&config, "version: \"1.0\"\n").unwrap();

        // Error-severity violation: exit code 1
        let result = run_check(Some(config.clone()), check_args(vec![manifest.clone()]), false).await;
        assert_eq!(result.unwrap(), 1);

        let streamed = CheckArgs { no_parallel: true, ..check_args(vec![manifest]) };
        assert_eq!(run_check(Some(config), streamed, false).await.unwrap(), 1);
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("naming_guardian.yaml");

        fs::write(&config_file, NamingConfig::default().to_yaml().unwrap()).unwrap();
        assert_eq!(run_validate_config(Some(config_file.clone())).unwrap(), 0);

        fs::write(&config_file, "version: \"9\"\n").unwrap();
        assert_eq!(run_validate_config(Some(config_file)).unwrap(), 1);
    }

    #[test]
    fn test_explain_rule() {
        assert_eq!(run_explain(None, "constant_name").unwrap(), 0);
        assert_eq!(run_explain(None, "nonexistent_rule").unwrap(), 1);
    }

    #[test]
    fn test_list_rules_and_segment() {
        assert_eq!(run_list_rules(None, false).unwrap(), 0);
        assert_eq!(run_segment("XMLParser").unwrap(), 0);
        assert!(run_segment("").is_err());
    }
}
