//! Validation engine
//!
//! CDD Principle: Domain Services - The engine orchestrates classify, lookup and match
//! - Each declaration is validated independently and in stream order
//! - Malformed identifiers are rejected individually; only misconfiguration aborts a pass
//! - Sequential, parallel and channel-fed front ends share one per-declaration step

use crate::classifier::RoleClassifier;
use crate::config::NamingConfig;
use crate::domain::{
    Declaration, NamingResult, RejectedDeclaration, Role, ViolatedConstraint, Violation,
};
use crate::matchers::{self, MatchOutcome};
use crate::rules::{Rule, RuleTable};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Result of one pass over a declaration stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationPass {
    /// Violations in stream order
    pub violations: Vec<Violation>,
    /// Declarations that could not be validated
    pub rejected: Vec<RejectedDeclaration>,
    pub declarations_seen: usize,
    /// Declarations whose role rule is disabled
    pub skipped: usize,
}

impl ValidationPass {
    fn record(&mut self, finding: Finding) {
        self.declarations_seen += 1;
        match finding {
            Finding::Clean => {}
            Finding::Skipped => self.skipped += 1,
            Finding::Violation(violation) => self.violations.push(violation),
            Finding::Rejected(rejected) => self.rejected.push(rejected),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.rejected.is_empty()
    }
}

enum Finding {
    Clean,
    Skipped,
    Violation(Violation),
    Rejected(RejectedDeclaration),
}

/// Validates declarations against a total rule table
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    rules: RuleTable,
    classifier: RoleClassifier,
    known_acronyms: Option<BTreeSet<String>>,
    max_unsegmented_length: Option<usize>,
}

impl ValidationEngine {
    /// Create an engine; fails unless the table covers every role
    pub fn new(rules: RuleTable, classifier: RoleClassifier) -> NamingResult<Self> {
        rules.ensure_total()?;
        tracing::debug!("Validation engine ready with {} rules", rules.len());

        Ok(Self { rules, classifier, known_acronyms: None, max_unsegmented_length: None })
    }

    /// Engine over the standard table and default classification
    pub fn with_defaults() -> Self {
        Self {
            rules: RuleTable::default(),
            classifier: RoleClassifier::default(),
            known_acronyms: None,
            max_unsegmented_length: None,
        }
    }

    /// Build an engine from configuration, applying role overrides once
    pub fn from_config(config: &NamingConfig) -> NamingResult<Self> {
        let rules = config.rule_table()?;
        let engine = Self::new(rules, RoleClassifier::new(config.classification))?;

        Ok(engine
            .with_known_acronyms(config.known_acronyms())
            .with_max_unsegmented_length(config.segmentation.max_unsegmented_length))
    }

    /// Restrict acronym words to this set
    pub fn with_known_acronyms(mut self, acronyms: Option<BTreeSet<String>>) -> Self {
        self.known_acronyms = acronyms;
        self
    }

    /// Flag single-word identifiers longer than `limit`
    pub fn with_max_unsegmented_length(mut self, limit: Option<usize>) -> Self {
        self.max_unsegmented_length = limit;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn classifier(&self) -> &RoleClassifier {
        &self.classifier
    }

    /// Validate a single declaration
    ///
    /// Returns `Ok(None)` when the identifier conforms or its rule is disabled.
    pub fn validate_declaration(&self, declaration: &Declaration) -> NamingResult<Option<Violation>> {
        let role = self.classifier.classify(declaration);
        let rule = self.rules.lookup(role)?;
        if !rule.enabled {
            return Ok(None);
        }

        Ok(self
            .match_rule(rule, &declaration.identifier)?
            .map(|(constraint, detail)| self.violation(role, rule, declaration.clone(), constraint, detail)))
    }

    /// Validate a declaration stream sequentially
    pub fn validate<I>(&self, declarations: I) -> NamingResult<ValidationPass>
    where
        I: IntoIterator<Item = Declaration>,
    {
        let mut pass = ValidationPass::default();
        for declaration in declarations {
            pass.record(self.assess(declaration)?);
        }

        log_pass(&pass);
        Ok(pass)
    }

    /// Validate on the rayon pool, one partition per source file
    ///
    /// Output order matches input order.
    pub fn validate_parallel(&self, declarations: Vec<Declaration>) -> NamingResult<ValidationPass> {
        let mut partitions: HashMap<PathBuf, Vec<(usize, Declaration)>> = HashMap::new();
        for (index, declaration) in declarations.into_iter().enumerate() {
            partitions
                .entry(declaration.location.file.clone())
                .or_default()
                .push((index, declaration));
        }

        tracing::debug!("Validating {} file partitions in parallel", partitions.len());

        let assessed: Vec<Vec<(usize, Finding)>> = partitions
            .into_par_iter()
            .map(|(_, partition)| {
                partition
                    .into_iter()
                    .map(|(index, declaration)| Ok((index, self.assess(declaration)?)))
                    .collect::<NamingResult<Vec<_>>>()
            })
            .collect::<NamingResult<Vec<_>>>()?;

        let mut findings: Vec<(usize, Finding)> = assessed.into_iter().flatten().collect();
        findings.sort_by_key(|(index, _)| *index);

        let mut pass = ValidationPass::default();
        for (_, finding) in findings {
            pass.record(finding);
        }

        log_pass(&pass);
        Ok(pass)
    }

    /// Validate declarations as they arrive on a channel
    ///
    /// The pass ends when every sender has been dropped.
    pub async fn validate_channel(
        &self,
        mut receiver: mpsc::Receiver<Declaration>,
    ) -> NamingResult<ValidationPass> {
        let mut pass = ValidationPass::default();
        while let Some(declaration) = receiver.recv().await {
            pass.record(self.assess(declaration)?);
        }

        log_pass(&pass);
        Ok(pass)
    }

    fn assess(&self, declaration: Declaration) -> NamingResult<Finding> {
        let role = self.classifier.classify(&declaration);
        let rule = self.rules.lookup(role)?;
        if !rule.enabled {
            return Ok(Finding::Skipped);
        }

        match self.match_rule(rule, &declaration.identifier) {
            Ok(None) => Ok(Finding::Clean),
            Ok(Some((constraint, detail))) => {
                Ok(Finding::Violation(self.violation(role, rule, declaration, constraint, detail)))
            }
            Err(e) if !e.is_fatal() => {
                tracing::warn!("Skipping declaration at {}: {}", declaration.location, e);
                Ok(Finding::Rejected(RejectedDeclaration { declaration, reason: e.to_string() }))
            }
            Err(e) => Err(e),
        }
    }

    fn match_rule(
        &self,
        rule: &Rule,
        identifier: &str,
    ) -> NamingResult<Option<(ViolatedConstraint, String)>> {
        let policy = rule.policy(self.known_acronyms.as_ref(), self.max_unsegmented_length);
        match matchers::check(rule.allowed_style, identifier, &policy)? {
            MatchOutcome::Conformant => Ok(None),
            MatchOutcome::Violation { constraint, detail } => Ok(Some((constraint, detail))),
        }
    }

    fn violation(
        &self,
        role: Role,
        rule: &Rule,
        declaration: Declaration,
        constraint: ViolatedConstraint,
        detail: String,
    ) -> Violation {
        let message = format!("{} '{}' {}", role.label(), declaration.identifier, detail);
        tracing::debug!("{}: {} ({})", declaration.location, message, constraint);

        Violation::new(role, declaration, rule.allowed_style, constraint, rule.severity, message)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn log_pass(pass: &ValidationPass) {
    tracing::info!(
        "Validated {} declarations: {} violations, {} rejected, {} skipped",
        pass.declarations_seen,
        pass.violations.len(),
        pass.rejected.len(),
        pass.skipped
    );
}
