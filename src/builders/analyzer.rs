use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::builders::rules::Rule;
use crate::builders::scope::Scope;

/// The kind of relationship detected between two rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    /// Same rule, same action, listed twice.
    Duplicate,
    /// Opposite actions where the later rule fully overrides the earlier one.
    Contradiction,
    /// One rule's scope already includes the other's under the same action.
    Redundant,
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::Duplicate => write!(f, "DUPLICATE"),
            ConflictType::Contradiction => write!(f, "CONTRADICTION"),
            ConflictType::Redundant => write!(f, "REDUNDANT"),
        }
    }
}

/// Which rule of a conflicting pair has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// A detected conflict between the rules at `left_index < right_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub left: Rule,
    pub right: Rule,
    pub left_index: usize,
    pub right_index: usize,
    pub conflict_type: ConflictType,
    pub superfluous: Side,
}

impl Conflict {
    /// The rule that can be removed without changing what gets ignored.
    pub fn superfluous_rule(&self) -> &Rule {
        match self.superfluous {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// The rule that stays once the conflict is resolved.
    pub fn kept_rule(&self) -> &Rule {
        match self.superfluous {
            Side::Left => &self.right,
            Side::Right => &self.left,
        }
    }

    pub fn superfluous_index(&self) -> usize {
        match self.superfluous {
            Side::Left => self.left_index,
            Side::Right => self.right_index,
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Left: {}, Right: {}, Type: {}",
            self.left.render(),
            self.right.render(),
            self.conflict_type
        )
    }
}

/// The `ConflictDetector` trait defines how an ordered rule list is checked
/// for rules that shadow, repeat or contradict each other.
///
/// Implementations must be read-only and deterministic: the same input always
/// yields the same conflicts in the same order.
pub trait ConflictDetector {
    fn analyze(&self, rules: &[Rule]) -> Vec<Conflict>;
}

/// Compares every pair of rules `(i, j)` with `i < j` in store order and
/// reports at most one conflict per pair, in ascending `(i, j)` order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PairwiseAnalyzer;

impl PairwiseAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classifies a single pair. `scopes` holds the precomputed scope of every
    /// rule so the intervening-rule check can look between the two positions.
    fn classify(rules: &[Rule], scopes: &[Scope], i: usize, j: usize) -> Option<(ConflictType, Side)> {
        let (left, right) = (&rules[i], &rules[j]);
        let same_text = left.pattern() == right.pattern();

        if left.action != right.action {
            // The later rule wins for every path it matches, so an earlier
            // rule it fully covers can never take effect.
            return (same_text || scopes[j].covers(&scopes[i]))
                .then_some((ConflictType::Contradiction, Side::Left));
        }

        if same_text && left.kind == right.kind {
            return Some((ConflictType::Duplicate, Side::Left));
        }

        if scopes[i].covers(&scopes[j]) && !Self::reversed_between(rules, scopes, i, j) {
            return Some((ConflictType::Redundant, Side::Right));
        }

        if scopes[j].covers(&scopes[i]) {
            return Some((ConflictType::Redundant, Side::Left));
        }

        None
    }

    /// Whether a rule strictly between `i` and `j` flips the action for some
    /// path that rule `j` matches. Rule `j` then restores the original action
    /// and is not redundant.
    fn reversed_between(rules: &[Rule], scopes: &[Scope], i: usize, j: usize) -> bool {
        let flipped = rules[j].action.opposite();
        (i + 1..j).any(|k| rules[k].action == flipped && scopes[k].overlaps(&scopes[j]))
    }
}

impl ConflictDetector for PairwiseAnalyzer {
    fn analyze(&self, rules: &[Rule]) -> Vec<Conflict> {
        let scopes: Vec<Scope> = rules.iter().map(Scope::of).collect();
        let mut conflicts = Vec::new();

        for i in 0..rules.len() {
            for j in i + 1..rules.len() {
                if let Some((conflict_type, superfluous)) = Self::classify(rules, &scopes, i, j) {
                    conflicts.push(Conflict {
                        left: rules[i].clone(),
                        right: rules[j].clone(),
                        left_index: i,
                        right_index: j,
                        conflict_type,
                        superfluous,
                    });
                }
            }
        }

        debug!(rules = rules.len(), conflicts = conflicts.len(), "analyzed rules");
        conflicts
    }
}
