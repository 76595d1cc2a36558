use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::builders::rules::{parse_line, MoveDirection, Rule};
use crate::core::error::{Result, RuleError};

/// The report produced by every mutating operation.
///
/// It exists purely for reporting: a no-op (such as adding a rule that is
/// already present) is still a successful call, with `success` set to
/// `false` and a message explaining what did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn applied(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// The human-readable line a front end should print.
    pub fn log(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The ordered rules backing one ignore file.
///
/// Order matters: later rules override earlier ones, mirroring the
/// last-match-wins semantics of ignore files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Position of the first rule whose rendered text equals `identity`.
    pub fn position(&self, identity: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.render() == identity)
    }

    /// Appends a rule unless an identical one is already stored.
    ///
    /// Identical means same kind, same value and same action, either as
    /// given or as the rule reads back from its own rendered line: a glob
    /// `*.log` reloaded from disk is an extension rule, and adding the glob
    /// again must still be caught. A duplicate is reported through the
    /// returned `ActionResult`, never as an error, so repeated adds are safe.
    pub fn add(&mut self, rule: Rule) -> ActionResult {
        let rendered = rule.render();
        let reloaded = parse_line(&rendered).ok();
        let duplicate = self
            .rules
            .iter()
            .any(|existing| *existing == rule || reloaded.as_ref() == Some(existing));
        if duplicate {
            debug!(rule = %rendered, "skipping duplicate rule");
            return ActionResult::skipped(format!(
                "Rule '{rendered}' already exists, skipping"
            ));
        }

        self.rules.push(rule);
        debug!(rule = %rendered, position = self.rules.len() - 1, "appended rule");
        ActionResult::applied(format!("Added rule '{rendered}'"))
    }

    /// Removes the first rule whose rendered text equals `identity`.
    pub fn delete(&mut self, identity: &str) -> Result<ActionResult> {
        let index = self.position(identity).ok_or_else(|| RuleError::NotFound {
            pattern: identity.to_string(),
        })?;

        self.rules.remove(index);
        debug!(rule = identity, position = index, "deleted rule");
        Ok(ActionResult::applied(format!("Deleted rule '{identity}'")))
    }

    /// Removes the rule at `index`, returning it. Used by the autofixer,
    /// which already knows the position from the conflict it is resolving.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Rule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Moves `source` immediately before or after `destination`.
    ///
    /// Both are located by rendered identity. The destination index is looked
    /// up again after the source has been taken out, because every rule after
    /// the source shifts down by one.
    pub fn move_rule(
        &mut self,
        source: &str,
        destination: &str,
        direction: MoveDirection,
    ) -> Result<ActionResult> {
        let source_index = self.position(source).ok_or_else(|| RuleError::NotFound {
            pattern: source.to_string(),
        })?;
        if self.position(destination).is_none() {
            return Err(RuleError::NotFound {
                pattern: destination.to_string(),
            });
        }
        if source == destination {
            return Err(RuleError::SameRule {
                pattern: source.to_string(),
            });
        }

        let rule = self.rules.remove(source_index);
        let destination_index = self.position(destination).ok_or_else(|| RuleError::NotFound {
            pattern: destination.to_string(),
        })?;
        let target = match direction {
            MoveDirection::Before => destination_index,
            MoveDirection::After => destination_index + 1,
        };
        self.rules.insert(target, rule);

        debug!(rule = source, from = source_index, to = target, "moved rule");
        Ok(ActionResult::applied(format!(
            "Moved rule '{source}' {direction} '{destination}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::rules::Action;

    fn store(lines: &[&str]) -> RuleStore {
        let mut store = RuleStore::new();
        for line in lines {
            store.add(Rule::file(line, Action::Include).unwrap());
        }
        store
    }

    fn rendered(store: &RuleStore) -> Vec<String> {
        store.rules().iter().map(Rule::render).collect()
    }

    #[test]
    fn test_add_appends_in_order() {
        let store = store(&["a", "b", "c"]);
        assert_eq!(rendered(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_duplicate_is_reported_not_stored() {
        let mut store = store(&["a"]);
        let result = store.add(Rule::file("a", Action::Include).unwrap());
        assert!(!result.success);
        assert!(result.log().contains("already exists"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_glob_matching_reloaded_rule_is_duplicate() {
        let mut store = RuleStore::from_rules(vec![
            parse_line("*.log").unwrap(),
            parse_line("Makefile.local").unwrap(),
        ]);

        let glob = store.add(Rule::glob("*.log", Action::Include).unwrap());
        let plain = store.add(Rule::glob("Makefile.local", Action::Include).unwrap());

        assert!(!glob.success);
        assert!(!plain.success);
        assert_eq!(rendered(&store), vec!["*.log", "Makefile.local"]);
    }

    #[test]
    fn test_add_extension_after_same_glob_is_kept() {
        let mut store = RuleStore::new();
        store.add(Rule::glob("*.log", Action::Include).unwrap());
        let result = store.add(Rule::extension("log", Action::Include).unwrap());
        assert!(result.success);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_same_path_other_action_is_new_rule() {
        let mut store = store(&["a"]);
        let result = store.add(Rule::file("a", Action::Exclude).unwrap());
        assert!(result.success);
        assert_eq!(rendered(&store), vec!["a", "!a"]);
    }

    #[test]
    fn test_delete_first_match() {
        let mut store = store(&["a", "b"]);
        let result = store.delete("a").unwrap();
        assert!(result.success);
        assert_eq!(rendered(&store), vec!["b"]);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = store(&["a"]);
        assert!(matches!(store.delete("!a"), Err(RuleError::NotFound { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_move_after_later_destination() {
        let mut store = store(&["a", "b", "c", "d"]);
        store.move_rule("a", "c", MoveDirection::After).unwrap();
        assert_eq!(rendered(&store), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_before_later_destination() {
        let mut store = store(&["a", "b", "c", "d"]);
        store.move_rule("a", "c", MoveDirection::Before).unwrap();
        assert_eq!(rendered(&store), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_move_before_earlier_destination() {
        let mut store = store(&["a", "b", "c", "d"]);
        store.move_rule("d", "b", MoveDirection::Before).unwrap();
        assert_eq!(rendered(&store), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_move_after_last_rule() {
        let mut store = store(&["a", "b", "c"]);
        store.move_rule("a", "c", MoveDirection::After).unwrap();
        assert_eq!(rendered(&store), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_errors() {
        let mut store = store(&["a", "b"]);
        assert!(matches!(
            store.move_rule("x", "b", MoveDirection::After),
            Err(RuleError::NotFound { .. })
        ));
        assert!(matches!(
            store.move_rule("a", "x", MoveDirection::After),
            Err(RuleError::NotFound { .. })
        ));
        assert!(matches!(
            store.move_rule("a", "a", MoveDirection::Before),
            Err(RuleError::SameRule { .. })
        ));
        assert_eq!(rendered(&store), vec!["a", "b"]);
    }
}
