use tracing::debug;

use crate::builders::rules::MoveDirection;
use crate::builders::store::{ActionResult, RuleStore};
use crate::core::error::Result;

/// Relocates a rule next to another rule, both named by rendered pattern.
///
/// Lookup, validation and the actual reinsertion live in
/// `RuleStore::move_rule`; the mover adds the check for a rule that already
/// sits where it was asked to go, so that case is reported instead of
/// silently rewriting the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mover;

impl Mover {
    pub fn new() -> Self {
        Self
    }

    /// # Arguments
    /// * `store`: The rules to reorder.
    /// * `source`: Rendered pattern of the rule to move, e.g. `!keep.log`.
    /// * `destination`: Rendered pattern of the rule to move next to.
    /// * `direction`: Whether `source` should end up before or after `destination`.
    ///
    /// # Returns
    /// An `ActionResult` describing the move, or `RuleError::NotFound` /
    /// `RuleError::SameRule` when the request cannot be satisfied.
    pub fn move_rule(
        &self,
        store: &mut RuleStore,
        source: &str,
        destination: &str,
        direction: MoveDirection,
    ) -> Result<ActionResult> {
        if source != destination {
            if let (Some(from), Some(to)) = (store.position(source), store.position(destination)) {
                let in_place = match direction {
                    MoveDirection::Before => from + 1 == to,
                    MoveDirection::After => to + 1 == from,
                };
                if in_place {
                    debug!(rule = source, position = from, "rule already in place");
                    return Ok(ActionResult::skipped(format!(
                        "Rule '{source}' is already {direction} '{destination}'"
                    )));
                }
            }
        }

        store.move_rule(source, destination, direction)
    }
}
