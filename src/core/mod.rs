// This file is the module declaration file for the `core` module.
// It wires the engine building blocks into the pieces a front end uses.

// `config` module:
// Loads and writes the optional `.git-ignore-rules.toml` settings file
// (`Settings`, `ConfigManager`, `ConfigProvider`).
pub mod config;

// `engine` module:
// `IgnoreService`, the facade exposing init, add, delete, move, analyze and
// autofix over a `RuleRepository`.
pub mod engine;

// `error` module:
// `RuleError`, the typed error returned by every engine operation.
pub mod error;
