use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::builders::rules::{parse_line, Rule};
use crate::builders::store::RuleStore;
use crate::core::error::{Result, RuleError};

pub const DEFAULT_HEADER: &str = "This file was automatically generated, do not make manual edits";

/// Controls how a rule store is written back to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// End the file with a newline.
    pub trailing_newline: bool,
    /// Written as `# <header>` on the first line; `None` or empty disables it.
    pub header_comment: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            trailing_newline: true,
            header_comment: Some(DEFAULT_HEADER.to_string()),
        }
    }
}

/// What to do with a persisted line that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Abort the load with `RuleError::MalformedLine`.
    #[default]
    Strict,
    /// Log a warning and drop the line.
    Skip,
}

/// Parses ignore-file text into a rule store.
///
/// Blank lines and `#` comments are dropped; every other line becomes one
/// rule, in file order.
pub fn parse_rules(content: &str, policy: ParsePolicy) -> Result<RuleStore> {
    let mut rules = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                let reason = match e {
                    RuleError::InvalidPattern { reason, .. } => reason,
                    other => other.to_string(),
                };
                match policy {
                    ParsePolicy::Strict => {
                        return Err(RuleError::MalformedLine {
                            line_number: index + 1,
                            line: line.to_string(),
                            reason,
                        });
                    }
                    ParsePolicy::Skip => {
                        warn!(line_number = index + 1, line, %reason, "skipping malformed line");
                    }
                }
            }
        }
    }

    Ok(RuleStore::from_rules(rules))
}

/// Renders a rule store into ignore-file text.
pub fn render_rules(store: &RuleStore, options: &RenderOptions) -> String {
    let mut lines = Vec::with_capacity(store.len() + 1);
    if let Some(header) = options.header_comment.as_deref().filter(|h| !h.trim().is_empty()) {
        lines.push(format!("# {}", header.trim()));
    }
    lines.extend(store.rules().iter().map(Rule::render));

    let mut content = lines.join("\n");
    if options.trailing_newline && !content.is_empty() {
        content.push('\n');
    }
    content
}

/// The persistence seam: loads the ordered rules of an ignore file and
/// writes them back. The engine never touches files directly.
pub trait RuleRepository {
    fn exists(&self, path: &Path) -> bool;
    /// Loads the rules at `path`; a missing file is an empty store.
    fn load(&self, path: &Path) -> Result<RuleStore>;
    fn save(&mut self, path: &Path, store: &RuleStore) -> Result<()>;
}

/// Reads and writes ignore files on disk.
pub struct FileRepository {
    options: RenderOptions,
    policy: ParsePolicy,
}

impl FileRepository {
    pub fn new(options: RenderOptions, policy: ParsePolicy) -> Self {
        Self { options, policy }
    }
}

impl RuleRepository for FileRepository {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load(&self, path: &Path) -> Result<RuleStore> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "ignore file missing, starting empty");
                return Ok(RuleStore::new());
            }
            Err(source) => {
                return Err(RuleError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        parse_rules(&content, self.policy)
    }

    fn save(&mut self, path: &Path, store: &RuleStore) -> Result<()> {
        let content = render_rules(store, &self.options);
        fs::write(path, content).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), rules = store.len(), "saved ignore file");
        Ok(())
    }
}

/// Keeps rule stores in memory, structurally.
///
/// Unlike a file on disk, a stored rule keeps its kind: a glob `*.log` and an
/// extension rule for `log` stay distinguishable across load and save. Text
/// only goes through the codec on the way in (`insert`) and out (`content`).
pub struct MemoryRepository {
    files: HashMap<PathBuf, RuleStore>,
    options: RenderOptions,
    policy: ParsePolicy,
}

impl MemoryRepository {
    pub fn new(options: RenderOptions, policy: ParsePolicy) -> Self {
        Self {
            files: HashMap::new(),
            options,
            policy,
        }
    }

    /// Seeds a file from raw ignore-file text, as if it had been written by hand.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: &str) -> Result<()> {
        let store = parse_rules(content, self.policy)?;
        self.files.insert(path.into(), store);
        Ok(())
    }

    /// The text a `FileRepository` with the same options would have written.
    pub fn content(&self, path: &Path) -> Option<String> {
        self.files
            .get(path)
            .map(|store| render_rules(store, &self.options))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new(RenderOptions::default(), ParsePolicy::default())
    }
}

impl RuleRepository for MemoryRepository {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn load(&self, path: &Path) -> Result<RuleStore> {
        Ok(self.files.get(path).cloned().unwrap_or_default())
    }

    fn save(&mut self, path: &Path, store: &RuleStore) -> Result<()> {
        self.files.insert(path.to_path_buf(), store.clone());
        Ok(())
    }
}
