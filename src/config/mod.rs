//! Configuration loading and management for Naming Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to rule overrides and classifier options
//! - The standard rule table lives in the domain, configuration only adjusts it
//! - Configuration is validated once, then frozen into the engine

use crate::classifier::ClassifierOptions;
use crate::domain::{NamingError, NamingResult, Role, Severity};
use crate::matchers::COMMON_ACRONYMS;
use crate::rules::{RuleOverride, RuleTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file names searched for, in order
pub const CONFIG_FILE_NAMES: [&str; 3] =
    ["naming_guardian.yaml", "naming_guardian.yml", ".naming_guardian.yaml"];

/// Default per-directory ignore file
pub const DEFAULT_IGNORE_FILE: &str = ".namingignore";

/// Main configuration structure for Naming Guardian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Configuration format version
    pub version: String,
    /// Path filtering configuration
    #[serde(default)]
    pub paths: PathConfig,
    /// Role classification knobs
    #[serde(default)]
    pub classification: ClassifierOptions,
    /// Word segmentation knobs
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    /// Per-role adjustments of the standard rule table, keyed by rule id
    #[serde(default)]
    pub roles: BTreeMap<Role, RuleOverride>,
}

/// Path filtering configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathConfig {
    /// Include/exclude patterns (gitignore-style)
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Optional .namingignore file name
    pub ignore_file: Option<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "**/target/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
            ],
            ignore_file: Some(DEFAULT_IGNORE_FILE.to_string()),
        }
    }
}

/// Segmentation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// When set, only these acronyms may appear as uppercase runs
    #[serde(default)]
    pub known_acronyms: Option<AcronymList>,
    /// When set, single-word identifiers longer than this are ambiguous
    #[serde(default)]
    pub max_unsegmented_length: Option<usize>,
}

/// Built-in acronym sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcronymPreset {
    /// HTTP, XML, JSON, URL, API, ID and other everyday abbreviations
    Common,
}

/// `known_acronyms: common` or `known_acronyms: [XML, HTTP]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AcronymList {
    Preset(AcronymPreset),
    Explicit(Vec<String>),
}

impl AcronymList {
    pub fn to_set(&self) -> BTreeSet<String> {
        match self {
            Self::Preset(AcronymPreset::Common) => {
                COMMON_ACRONYMS.iter().map(|a| a.to_string()).collect()
            }
            Self::Explicit(acronyms) => acronyms.iter().cloned().collect(),
        }
    }
}

impl NamingConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NamingResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            NamingError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            NamingError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> NamingResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| NamingError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Find the first config file in `dir`
    pub fn discover<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        CONFIG_FILE_NAMES.iter().map(|name| dir.as_ref().join(name)).find(|path| path.is_file())
    }

    /// Default configuration: standard rules, no segmentation extras
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig::default(),
            classification: ClassifierOptions::default(),
            segmentation: SegmentationConfig::default(),
            roles: BTreeMap::new(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> NamingResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(NamingError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        if let Some(AcronymList::Explicit(acronyms)) = &self.segmentation.known_acronyms {
            for acronym in acronyms {
                let well_formed = acronym.chars().count() >= 2
                    && acronym.chars().all(|c| c.is_uppercase() || c.is_numeric())
                    && acronym.chars().any(char::is_uppercase);
                if !well_formed {
                    return Err(NamingError::config(format!(
                        "Invalid acronym '{acronym}': acronyms are two or more uppercase letters"
                    )));
                }
            }
        }

        if let Some(limit) = self.segmentation.max_unsegmented_length {
            if limit < 2 {
                return Err(NamingError::config(format!(
                    "max_unsegmented_length must be at least 2, got {limit}"
                )));
            }
        }

        for pattern in &self.paths.patterns {
            let glob_source = pattern.strip_prefix('!').unwrap_or(pattern);
            glob::Pattern::new(glob_source).map_err(|e| {
                NamingError::config(format!("Invalid path pattern '{pattern}': {e}"))
            })?;
        }

        self.rule_table()?;
        Ok(())
    }

    /// The standard rule table with this configuration's overrides applied
    pub fn rule_table(&self) -> NamingResult<RuleTable> {
        RuleTable::standard().with_overrides(&self.roles)
    }

    /// Known acronyms as a lookup set
    pub fn known_acronyms(&self) -> Option<BTreeSet<String>> {
        self.segmentation.known_acronyms.as_ref().map(AcronymList::to_set)
    }

    /// Ignore file name, `None` when disabled or empty
    pub fn ignore_file(&self) -> Option<String> {
        self.paths.ignore_file.clone().filter(|name| !name.is_empty())
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> NamingResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NamingError::config(format!("Failed to serialize config: {e}")))
    }

    /// Convert to YAML in the on-disk format
    pub fn to_yaml(&self) -> NamingResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| NamingError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration, stamped on reports
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.paths.hash(&mut hasher);
        self.classification.hash(&mut hasher);

        // Acronym order in the file does not matter
        self.known_acronyms().hash(&mut hasher);
        self.segmentation.max_unsegmented_length.hash(&mut hasher);

        // BTreeMap iterates in role order
        for (role, settings) in &self.roles {
            role.hash(&mut hasher);
            settings.hash(&mut hasher);
        }

        format!("{:x}", hasher.finish())
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: NamingConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: NamingConfig::default() }
    }

    /// Add a path pattern
    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    /// Set the ignore file name
    pub fn ignore_file(mut self, filename: impl Into<String>) -> Self {
        self.config.paths.ignore_file = Some(filename.into());
        self
    }

    pub fn final_locals_as_constants(mut self, enabled: bool) -> Self {
        self.config.classification.final_locals_as_constants = enabled;
        self
    }

    pub fn known_acronyms<I, S>(mut self, acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.segmentation.known_acronyms =
            Some(AcronymList::Explicit(acronyms.into_iter().map(Into::into).collect()));
        self
    }

    /// Accept the built-in common abbreviations (HTTP, XML, JSON, ID, ...)
    pub fn common_acronyms(mut self) -> Self {
        self.config.segmentation.known_acronyms = Some(AcronymList::Preset(AcronymPreset::Common));
        self
    }

    pub fn max_unsegmented_length(mut self, limit: usize) -> Self {
        self.config.segmentation.max_unsegmented_length = Some(limit);
        self
    }

    /// Override settings for one role
    pub fn role(mut self, role: Role, settings: RuleOverride) -> Self {
        self.config.roles.insert(role, settings);
        self
    }

    /// Change only the severity of one role
    pub fn severity(mut self, role: Role, severity: Severity) -> Self {
        self.config.roles.entry(role).or_default().severity = Some(severity);
        self
    }

    /// Turn one role's rule off
    pub fn disable(mut self, role: Role) -> Self {
        self.config.roles.entry(role).or_default().enabled = Some(false);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> NamingResult<NamingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
