//! Case-style matchers for identifiers
//!
//! Architectural Principle: Service Layer - One matcher per case style behind a common trait
//! - Matchers are pure functions of the identifier text and a match policy
//! - Each failure names exactly one violated constraint, checked in a fixed order
//! - Empty identifiers are malformed input, never a violation

pub mod segmenter;

use crate::domain::{CaseStyle, NamingError, NamingResult, ViolatedConstraint};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

pub use segmenter::{segment, CharClass, Segmentation, Word, WordShape};

/// Abbreviations accepted by the `common` acronym preset
pub const COMMON_ACRONYMS: [&str; 17] = [
    "HTTP", "XML", "JSON", "URL", "API", "DAO", "DTO", "IO", "UI", "DB", "SQL", "JPA", "REST",
    "JWT", "CSS", "HTML", "ID",
];

lazy_static! {
    static ref PACKAGE_SEGMENT: Regex =
        Regex::new(r"^[a-z][a-z0-9]*$").expect("package segment pattern is valid");
}

/// Outcome of matching one identifier against one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Conformant,
    Violation {
        constraint: ViolatedConstraint,
        /// Completes the sentence "<Role> '<identifier>' ..."
        detail: String,
    },
}

impl MatchOutcome {
    fn violation(constraint: ViolatedConstraint, detail: impl Into<String>) -> Self {
        Self::Violation { constraint, detail: detail.into() }
    }

    pub fn is_conformant(&self) -> bool {
        matches!(self, Self::Conformant)
    }

    pub fn constraint(&self) -> Option<ViolatedConstraint> {
        match self {
            Self::Conformant => None,
            Self::Violation { constraint, .. } => Some(*constraint),
        }
    }
}

/// Rule-derived constraints applied on top of a style's base grammar
#[derive(Debug, Clone, Copy)]
pub struct MatchPolicy<'a> {
    /// Minimum number of segmented words
    pub min_words: usize,
    /// Whether multi-capital acronym words are accepted at all
    pub allow_acronym_run: bool,
    /// When set, every acronym word must be one of these
    pub known_acronyms: Option<&'a BTreeSet<String>>,
    /// When set, single-word identifiers longer than this are flagged
    pub max_unsegmented_length: Option<usize>,
}

impl Default for MatchPolicy<'_> {
    fn default() -> Self {
        Self {
            min_words: 1,
            allow_acronym_run: true,
            known_acronyms: None,
            max_unsegmented_length: None,
        }
    }
}

/// A recognizer for one case style
pub trait CaseMatcher: Send + Sync {
    /// The style this matcher recognizes
    fn style(&self) -> CaseStyle;

    /// Decide conformance of `identifier`
    fn check(&self, identifier: &str, policy: &MatchPolicy<'_>) -> NamingResult<MatchOutcome>;
}

/// `XmlParser`, `XMLParser`, `OAuth2Client`
#[derive(Debug, Default, Clone, Copy)]
pub struct PascalCaseMatcher;

/// `userName`, `x`, `parseXML`
#[derive(Debug, Default, Clone, Copy)]
pub struct CamelCaseMatcher;

/// `DATABASE_URL`, `MAX_RETRY`
#[derive(Debug, Default, Clone, Copy)]
pub struct UpperSnakeCaseMatcher;

/// `com.example.naming`
#[derive(Debug, Default, Clone, Copy)]
pub struct LowerDottedMatcher;

/// Get the matcher for a style
pub fn matcher_for(style: CaseStyle) -> &'static dyn CaseMatcher {
    match style {
        CaseStyle::PascalCase => &PascalCaseMatcher,
        CaseStyle::CamelCase => &CamelCaseMatcher,
        CaseStyle::UpperSnakeCase => &UpperSnakeCaseMatcher,
        CaseStyle::LowerDotted => &LowerDottedMatcher,
    }
}

/// Check an identifier against a style
pub fn check(
    style: CaseStyle,
    identifier: &str,
    policy: &MatchPolicy<'_>,
) -> NamingResult<MatchOutcome> {
    matcher_for(style).check(identifier, policy)
}

impl CaseMatcher for PascalCaseMatcher {
    fn style(&self) -> CaseStyle {
        CaseStyle::PascalCase
    }

    fn check(&self, identifier: &str, policy: &MatchPolicy<'_>) -> NamingResult<MatchOutcome> {
        ensure_not_empty(identifier)?;

        if let Some(c) = identifier.chars().find(|c| !c.is_alphanumeric()) {
            return Ok(separator_violation(c));
        }

        let letters = identifier.chars().filter(|c| c.is_alphabetic()).count();
        let uppercase = identifier.chars().filter(|c| c.is_uppercase()).count();

        if uppercase == 0 && letters > 1 {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::AmbiguousWordBoundary,
                "has no word boundaries; start every word with an uppercase letter",
            ));
        }

        let has_lowercase = identifier.chars().any(char::is_lowercase);
        let has_digit = identifier.chars().any(char::is_numeric);
        if !has_lowercase && !has_digit && uppercase > 1 {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::AmbiguousWordBoundary,
                "is a single uppercase run and cannot be told apart from a constant",
            ));
        }

        let segmentation = segment(identifier);
        if let Some(outcome) = acronym_violation(&segmentation, policy) {
            return Ok(outcome);
        }

        if !starts_with(identifier, char::is_uppercase) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::WrongCase,
                "must start with an uppercase letter",
            ));
        }

        Ok(word_count_outcome(identifier, &segmentation, policy))
    }
}

impl CaseMatcher for CamelCaseMatcher {
    fn style(&self) -> CaseStyle {
        CaseStyle::CamelCase
    }

    fn check(&self, identifier: &str, policy: &MatchPolicy<'_>) -> NamingResult<MatchOutcome> {
        ensure_not_empty(identifier)?;

        if let Some(c) = identifier.chars().find(|c| !c.is_alphanumeric()) {
            return Ok(separator_violation(c));
        }

        let segmentation = segment(identifier);
        if let Some(outcome) = acronym_violation(&segmentation, policy) {
            return Ok(outcome);
        }

        if !starts_with(identifier, char::is_lowercase) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::WrongCase,
                "must start with a lowercase letter",
            ));
        }

        Ok(word_count_outcome(identifier, &segmentation, policy))
    }
}

impl CaseMatcher for UpperSnakeCaseMatcher {
    fn style(&self) -> CaseStyle {
        CaseStyle::UpperSnakeCase
    }

    fn check(&self, identifier: &str, policy: &MatchPolicy<'_>) -> NamingResult<MatchOutcome> {
        ensure_not_empty(identifier)?;

        if let Some(c) = identifier.chars().find(|&c| !(c.is_alphanumeric() || c == '_')) {
            return Ok(separator_violation(c));
        }

        if identifier.chars().any(char::is_lowercase) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::WrongCase,
                "must be all uppercase with words separated by underscores",
            ));
        }

        if !identifier.chars().any(char::is_alphabetic) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::WrongCase,
                "must contain at least one letter",
            ));
        }

        if identifier.starts_with('_') || identifier.ends_with('_') {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::IllegalSeparator,
                "must not start or end with an underscore",
            ));
        }

        if identifier.contains("__") {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::IllegalSeparator,
                "must not contain consecutive underscores",
            ));
        }

        let words = identifier.split('_').count();
        if words < policy.min_words {
            return Ok(too_few_words(words, policy.min_words));
        }

        Ok(MatchOutcome::Conformant)
    }
}

impl CaseMatcher for LowerDottedMatcher {
    fn style(&self) -> CaseStyle {
        CaseStyle::LowerDotted
    }

    fn check(&self, identifier: &str, policy: &MatchPolicy<'_>) -> NamingResult<MatchOutcome> {
        ensure_not_empty(identifier)?;

        if let Some(c) = identifier.chars().find(|&c| !(c.is_alphanumeric() || c == '.')) {
            return Ok(separator_violation(c));
        }

        let segments: Vec<&str> = identifier.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::IllegalSeparator,
                "must not contain empty segments",
            ));
        }

        if identifier.chars().any(char::is_uppercase) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::WrongCase,
                "must be all lowercase",
            ));
        }

        if let Some(bad) = segments.iter().find(|s| !PACKAGE_SEGMENT.is_match(s)) {
            return Ok(MatchOutcome::violation(
                ViolatedConstraint::WrongCase,
                format!("has segment '{bad}' that does not start with a lowercase ASCII letter"),
            ));
        }

        if segments.len() < policy.min_words {
            return Ok(too_few_words(segments.len(), policy.min_words));
        }

        Ok(MatchOutcome::Conformant)
    }
}

fn ensure_not_empty(identifier: &str) -> NamingResult<()> {
    if identifier.is_empty() {
        return Err(NamingError::malformed("identifier is empty"));
    }
    Ok(())
}

fn starts_with(identifier: &str, predicate: fn(char) -> bool) -> bool {
    identifier.chars().next().is_some_and(predicate)
}

fn separator_violation(c: char) -> MatchOutcome {
    let detail = match c {
        '_' => "must not contain underscores".to_string(),
        '-' => "must not contain hyphens".to_string(),
        other => format!("must not contain '{other}'"),
    };
    MatchOutcome::violation(ViolatedConstraint::IllegalSeparator, detail)
}

fn acronym_violation(segmentation: &Segmentation<'_>, policy: &MatchPolicy<'_>) -> Option<MatchOutcome> {
    if let Some(run) = segmentation.ambiguous_run {
        return Some(MatchOutcome::violation(
            ViolatedConstraint::AmbiguousAcronymPlacement,
            format!("has ambiguous acronym placement at '{run}'; the acronym and the next word cannot be told apart"),
        ));
    }

    for word in segmentation.acronyms() {
        if !policy.allow_acronym_run {
            return Some(MatchOutcome::violation(
                ViolatedConstraint::AmbiguousAcronymPlacement,
                format!("must not contain the uppercase run '{}'", word.text),
            ));
        }

        if let Some(known) = policy.known_acronyms {
            if !known.contains(word.letters()) {
                return Some(MatchOutcome::violation(
                    ViolatedConstraint::AmbiguousAcronymPlacement,
                    format!("uses '{}', which is not a known acronym", word.letters()),
                ));
            }
        }
    }

    None
}

fn word_count_outcome(
    identifier: &str,
    segmentation: &Segmentation<'_>,
    policy: &MatchPolicy<'_>,
) -> MatchOutcome {
    let words = segmentation.words.len();
    if words < policy.min_words {
        return too_few_words(words, policy.min_words);
    }

    if let Some(limit) = policy.max_unsegmented_length {
        let length = identifier.chars().count();
        if words == 1 && length > limit {
            return MatchOutcome::violation(
                ViolatedConstraint::AmbiguousWordBoundary,
                format!("is {length} characters long with no word boundary (limit {limit})"),
            );
        }
    }

    MatchOutcome::Conformant
}

fn too_few_words(found: usize, required: usize) -> MatchOutcome {
    MatchOutcome::violation(
        ViolatedConstraint::AmbiguousWordBoundary,
        format!("has {found} word(s) but at least {required} are required"),
    )
}
