// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. Together they make up the rule engine; nothing in here parses
// command lines or decides where files live.

// `rules` module:
// The rule data model. Defines `Action`, `DirectoryMode`, `MoveDirection`,
// `RuleKind` and `Rule`, and converts rules to and from their one-line
// ignore-file text (`Rule::render` and `parse_line`).
pub mod rules;

// `scope` module:
// Structural scope analysis. Turns a rule's pattern into tokens and decides
// whether one pattern covers or overlaps another without touching the disk.
pub mod scope;

// `store` module:
// The ordered `RuleStore` behind one ignore file, with the add, delete and
// move primitives, and the `ActionResult` report every mutation returns.
pub mod store;

// `analyzer` module:
// The `ConflictDetector` trait and its `PairwiseAnalyzer` implementation,
// which reports duplicate, contradicting and redundant rules.
pub mod analyzer;

// `fixer` module:
// The bounded `AutoFixer` loop that removes one superfluous rule per
// iteration until the analyzer is satisfied or the attempt bound is hit.
pub mod fixer;

// `mover` module:
// Relocates a rule before or after another rule, both named by pattern.
pub mod mover;

// `storage` module:
// The text codec for whole ignore files and the `RuleRepository` seam, with
// `FileRepository` for disk and `MemoryRepository` for tests and embedding.
pub mod storage;

// `reporter` module:
// The `Reporter` trait and `ConsoleReporter`, which prints results,
// conflicts and rule listings for the CLI.
pub mod reporter;
