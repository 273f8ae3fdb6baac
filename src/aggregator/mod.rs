//! Violation aggregation
//!
//! CDD Principle: Aggregate - Collects violations from one or more passes into a single list
//! - First-seen order is preserved
//! - Two violations at the same location for the same constraint are one finding

use crate::domain::{SourceLocation, ViolatedConstraint, Violation};
use std::collections::HashSet;

/// Incremental, order-preserving deduplicating collector
#[derive(Debug, Default)]
pub struct ViolationAggregator {
    seen: HashSet<(SourceLocation, ViolatedConstraint)>,
    violations: Vec<Violation>,
    duplicates: usize,
}

impl ViolationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one violation; returns false when it duplicates an earlier one
    pub fn push(&mut self, violation: Violation) -> bool {
        let key = (violation.location().clone(), violation.constraint);
        if self.seen.insert(key) {
            self.violations.push(violation);
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        for violation in violations {
            self.push(violation);
        }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicates
    }

    pub fn finish(self) -> Vec<Violation> {
        self.violations
    }
}

/// Deduplicate a violation stream, keeping first-seen order
pub fn collect(violations: impl IntoIterator<Item = Violation>) -> Vec<Violation> {
    let mut aggregator = ViolationAggregator::new();
    aggregator.extend(violations);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseStyle, Declaration, DeclarationKind, Role, Severity};

    fn violation(identifier: &str, line: u32, constraint: ViolatedConstraint) -> Violation {
        Violation::new(
            Role::FieldName,
            Declaration::new(identifier, DeclarationKind::Field, SourceLocation::new("A.java", line)),
            CaseStyle::CamelCase,
            constraint,
            Severity::Warning,
            "message",
        )
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let collected = collect(vec![
            violation("b", 9, ViolatedConstraint::WrongCase),
            violation("a", 1, ViolatedConstraint::WrongCase),
            violation("c", 5, ViolatedConstraint::IllegalSeparator),
        ]);

        let lines: Vec<_> = collected.iter().map(|v| v.location().line).collect();
        assert_eq!(lines, vec![9, 1, 5]);
    }

    #[test]
    fn test_duplicates_dropped() {
        let mut aggregator = ViolationAggregator::new();
        assert!(aggregator.push(violation("max_count", 3, ViolatedConstraint::IllegalSeparator)));
        assert!(!aggregator.push(violation("max_count", 3, ViolatedConstraint::IllegalSeparator)));
        // same place, different constraint
        assert!(aggregator.push(violation("max_count", 3, ViolatedConstraint::WrongCase)));

        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.duplicates_removed(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(Vec::new()).is_empty());
        assert!(ViolationAggregator::new().is_empty());
    }
}
