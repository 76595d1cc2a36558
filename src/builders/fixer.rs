use serde::Serialize;
use tracing::{debug, info, warn};

use crate::builders::analyzer::{Conflict, ConflictDetector, ConflictType};
use crate::builders::store::{ActionResult, RuleStore};

/// Attempts the autofixer makes when the caller does not say otherwise.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

/// How an autofix run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixStatus {
    /// No conflicts remain.
    Resolved,
    /// The attempt bound was reached with conflicts still present.
    PartialFix,
}

/// Everything an autofix run did, and what it could not do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixReport {
    pub status: FixStatus,
    /// One entry per applied edit, in the order the edits were made.
    pub edits: Vec<ActionResult>,
    /// Conflicts still present when the run stopped; empty when resolved.
    pub remaining: Vec<Conflict>,
}

impl FixReport {
    pub fn is_resolved(&self) -> bool {
        self.status == FixStatus::Resolved
    }

    /// The edits followed by a closing summary, ready to be logged.
    pub fn results(&self) -> Vec<ActionResult> {
        let mut results = self.edits.clone();
        results.push(match self.status {
            FixStatus::Resolved => ActionResult::applied(format!(
                "All conflicts resolved after {} edit(s)",
                self.edits.len()
            )),
            FixStatus::PartialFix => ActionResult::skipped(format!(
                "Stopped after {} edit(s); {} conflict(s) remain",
                self.edits.len(),
                self.remaining.len()
            )),
        });
        results
    }
}

/// Removes conflicting rules one at a time until none remain or the
/// attempt bound is hit.
///
/// Each iteration re-analyzes the whole store, resolves only the first
/// conflict in canonical order, and then starts over. The loop is driven by
/// an explicit counter, so at most `max_attempts` edits are ever made.
pub struct AutoFixer<'a, D: ConflictDetector> {
    detector: &'a D,
    max_attempts: usize,
}

impl<'a, D: ConflictDetector> AutoFixer<'a, D> {
    pub fn new(detector: &'a D, max_attempts: usize) -> Self {
        Self {
            detector,
            max_attempts,
        }
    }

    pub fn run(&self, store: &mut RuleStore) -> FixReport {
        let mut edits = Vec::new();
        let mut attempts = 0;

        loop {
            let conflicts = self.detector.analyze(store.rules());
            let Some(conflict) = conflicts.first() else {
                debug!(edits = edits.len(), "no conflicts left");
                return FixReport {
                    status: FixStatus::Resolved,
                    edits,
                    remaining: Vec::new(),
                };
            };

            if attempts >= self.max_attempts {
                warn!(
                    attempts,
                    remaining = conflicts.len(),
                    "autofix bound reached with conflicts remaining"
                );
                return FixReport {
                    status: FixStatus::PartialFix,
                    edits,
                    remaining: conflicts,
                };
            }

            attempts += 1;
            if let Some(result) = Self::resolve(store, conflict) {
                info!(attempt = attempts, "{}", result.message);
                edits.push(result);
            }
        }
    }

    /// Applies the single edit that resolves `conflict`: the superfluous rule
    /// is removed from its recorded position.
    fn resolve(store: &mut RuleStore, conflict: &Conflict) -> Option<ActionResult> {
        let removed = store.remove_at(conflict.superfluous_index())?;
        let removed = removed.render();
        let kept = conflict.kept_rule().render();

        let message = match conflict.conflict_type {
            ConflictType::Duplicate => {
                format!("Removed duplicate rule '{removed}' (kept the later copy)")
            }
            ConflictType::Contradiction => {
                format!("Removed rule '{removed}', it is always overridden by '{kept}'")
            }
            ConflictType::Redundant => {
                format!("Removed redundant rule '{removed}', already covered by '{kept}'")
            }
        };
        Some(ActionResult::applied(message))
    }
}
