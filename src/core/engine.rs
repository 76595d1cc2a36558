use std::path::Path;
use tracing::{debug, info};

use crate::builders::analyzer::{Conflict, ConflictDetector, PairwiseAnalyzer};
use crate::builders::fixer::{AutoFixer, FixReport};
use crate::builders::mover::Mover;
use crate::builders::rules::{Action, DirectoryMode, MoveDirection, Rule};
use crate::builders::storage::RuleRepository;
use crate::builders::store::{ActionResult, RuleStore};
use crate::core::error::{Result, RuleError};

/// The operations front ends call. Every call loads the ignore file through
/// the repository, applies one transformation to the whole rule list and
/// writes it back only if something changed.
///
/// Callers sharing one service across threads must serialize access per
/// ignore file; the service takes no locks.
pub struct IgnoreService<R: RuleRepository> {
    repository: R,
    analyzer: PairwiseAnalyzer,
    mover: Mover,
}

impl<R: RuleRepository> IgnoreService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            analyzer: PairwiseAnalyzer::new(),
            mover: Mover::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates an empty ignore file; fails if one already exists.
    pub fn init(&mut self, path: &Path) -> Result<()> {
        if self.repository.exists(path) {
            return Err(RuleError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        self.repository.save(path, &RuleStore::new())?;
        info!(path = %path.display(), "created ignore file");
        Ok(())
    }

    /// Adds each rule in order. Duplicates produce a non-success result and
    /// are not stored twice.
    pub fn add_rules(&mut self, path: &Path, rules: Vec<Rule>) -> Result<Vec<ActionResult>> {
        let mut store = self.repository.load(path)?;
        let results: Vec<ActionResult> = rules.into_iter().map(|rule| store.add(rule)).collect();

        if results.iter().any(|r| r.success) {
            self.repository.save(path, &store)?;
        }
        Ok(results)
    }

    pub fn add_file_rule(&mut self, path: &Path, files: &[String], action: Action) -> Result<Vec<ActionResult>> {
        let rules = files
            .iter()
            .map(|file| Rule::file(file, action))
            .collect::<Result<Vec<_>>>()?;
        self.add_rules(path, rules)
    }

    pub fn add_directory_rule(
        &mut self,
        path: &Path,
        names: &[String],
        mode: DirectoryMode,
        action: Action,
    ) -> Result<Vec<ActionResult>> {
        let rules = names
            .iter()
            .map(|name| Rule::directory(name, mode, action))
            .collect::<Result<Vec<_>>>()?;
        self.add_rules(path, rules)
    }

    pub fn add_extension_rule(
        &mut self,
        path: &Path,
        extensions: &[String],
        action: Action,
    ) -> Result<Vec<ActionResult>> {
        let rules = extensions
            .iter()
            .map(|ext| Rule::extension(ext, action))
            .collect::<Result<Vec<_>>>()?;
        self.add_rules(path, rules)
    }

    pub fn add_glob_rule(&mut self, path: &Path, patterns: &[String], action: Action) -> Result<Vec<ActionResult>> {
        let rules = patterns
            .iter()
            .map(|pattern| Rule::glob(pattern, action))
            .collect::<Result<Vec<_>>>()?;
        self.add_rules(path, rules)
    }

    /// Deletes the first rule that renders exactly like `rule`.
    pub fn delete_rule(&mut self, path: &Path, rule: &Rule) -> Result<ActionResult> {
        let mut store = self.repository.load(path)?;
        let result = store.delete(&rule.render())?;
        self.repository.save(path, &store)?;
        Ok(result)
    }

    pub fn delete_file_rule(&mut self, path: &Path, file: &str, action: Action) -> Result<ActionResult> {
        self.delete_rule(path, &Rule::file(file, action)?)
    }

    pub fn delete_directory_rule(
        &mut self,
        path: &Path,
        name: &str,
        mode: DirectoryMode,
        action: Action,
    ) -> Result<ActionResult> {
        self.delete_rule(path, &Rule::directory(name, mode, action)?)
    }

    pub fn delete_extension_rule(&mut self, path: &Path, extension: &str, action: Action) -> Result<ActionResult> {
        self.delete_rule(path, &Rule::extension(extension, action)?)
    }

    pub fn delete_glob_rule(&mut self, path: &Path, pattern: &str, action: Action) -> Result<ActionResult> {
        self.delete_rule(path, &Rule::glob(pattern, action)?)
    }

    /// Moves the rule rendered as `source` before or after the rule rendered
    /// as `destination`.
    pub fn move_rule(
        &mut self,
        path: &Path,
        source: &str,
        destination: &str,
        direction: MoveDirection,
    ) -> Result<ActionResult> {
        let mut store = self.repository.load(path)?;
        let result = self
            .mover
            .move_rule(&mut store, source.trim(), destination.trim(), direction)?;
        if result.success {
            self.repository.save(path, &store)?;
        }
        Ok(result)
    }

    /// Read-only: returns the current conflicts in canonical order.
    pub fn analyze_conflicts(&self, path: &Path) -> Result<Vec<Conflict>> {
        let store = self.repository.load(path)?;
        let conflicts = self.analyzer.analyze(store.rules());
        debug!(path = %path.display(), conflicts = conflicts.len(), "analysis complete");
        Ok(conflicts)
    }

    /// Runs the autofixer with at most `max_attempts` edits and persists the
    /// result. Running out of attempts is reported in the `FixReport`, not
    /// as an error.
    pub fn auto_fix(&mut self, path: &Path, max_attempts: usize) -> Result<FixReport> {
        let mut store = self.repository.load(path)?;
        let report = AutoFixer::new(&self.analyzer, max_attempts).run(&mut store);
        if !report.edits.is_empty() {
            self.repository.save(path, &store)?;
        }
        Ok(report)
    }

    pub fn list_rules(&self, path: &Path) -> Result<Vec<Rule>> {
        Ok(self.repository.load(path)?.rules().to_vec())
    }
}
