use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::core::error::{Result, RuleError};

/// Marker that turns a line into a negation (an `Exclude` rule).
pub const NEGATION_PREFIX: char = '!';

/// Characters that make a pattern a glob rather than a plain path.
const WILDCARD_CHARS: [char; 4] = ['*', '?', '[', '\\'];

// A directory name: no wildcards, no surrounding slashes.
const NAME: &str = r"[^*?\[\\/](?:[^*?\[\\]*[^*?\[\\/])?";

/// The line shapes `parse_line` recognizes, tried in declaration order.
struct LineShapes {
    anywhere: Regex,
    root: Regex,
    recursive: Regex,
    children: Regex,
    directory: Regex,
    extension: Regex,
}

impl LineShapes {
    fn compile() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            anywhere: anchored(&format!(r"\*\*/({NAME})/"))?,
            root: anchored(&format!(r"/({NAME})/"))?,
            recursive: anchored(&format!(r"({NAME})/\*\*"))?,
            children: anchored(&format!(r"({NAME})/\*"))?,
            directory: anchored(&format!(r"({NAME})/"))?,
            extension: anchored(r"\*\.([^*?\[\\/]+)")?,
        })
    }
}

static LINE_SHAPES: LazyLock<std::result::Result<LineShapes, regex::Error>> =
    LazyLock::new(LineShapes::compile);

fn anchored(body: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^{body}$"))
}

/// Whether a rule ignores its matches or re-includes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The pattern is ignored.
    Include,
    /// The pattern is explicitly un-ignored (rendered with a leading `!`).
    Exclude,
}

impl Action {
    pub fn opposite(self) -> Self {
        match self {
            Action::Include => Action::Exclude,
            Action::Exclude => Action::Include,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Include => write!(f, "include"),
            Action::Exclude => write!(f, "exclude"),
        }
    }
}

/// Parsing is case-sensitive: only `include` and `exclude` are accepted.
impl FromStr for Action {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "include" => Ok(Action::Include),
            "exclude" => Ok(Action::Exclude),
            other => Err(RuleError::InvalidAction(other.to_string())),
        }
    }
}

/// How a directory name is anchored and expanded when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMode {
    /// `name/` - the directory itself (and therefore its contents).
    Directory,
    /// `name/**` - everything below the directory, at any depth.
    Recursive,
    /// `name/*` - only the immediate children of the directory.
    Children,
    /// `**/name/` - a directory with this name at any depth.
    Anywhere,
    /// `/name/` - the directory anchored at the repository root.
    Root,
}

impl fmt::Display for DirectoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            DirectoryMode::Directory => "directory",
            DirectoryMode::Recursive => "recursive",
            DirectoryMode::Children => "children",
            DirectoryMode::Anywhere => "anywhere",
            DirectoryMode::Root => "root",
        };
        f.write_str(token)
    }
}

impl FromStr for DirectoryMode {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "directory" => Ok(DirectoryMode::Directory),
            "recursive" => Ok(DirectoryMode::Recursive),
            "children" => Ok(DirectoryMode::Children),
            "anywhere" => Ok(DirectoryMode::Anywhere),
            "root" => Ok(DirectoryMode::Root),
            other => Err(RuleError::InvalidMode(other.to_string())),
        }
    }
}

/// Where a moved rule lands relative to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Before,
    After,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Before => write!(f, "before"),
            MoveDirection::After => write!(f, "after"),
        }
    }
}

impl FromStr for MoveDirection {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "before" => Ok(MoveDirection::Before),
            "after" => Ok(MoveDirection::After),
            other => Err(RuleError::InvalidDirection(other.to_string())),
        }
    }
}

/// The kind-specific payload of a rule.
///
/// This is a closed set: rendering dispatches over it with an exhaustive
/// `match`, so adding a kind forces the renderer and the parser to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    File { path: String },
    Directory { name: String, mode: DirectoryMode },
    Extension { extension: String },
    Glob { pattern: String },
}

impl RuleKind {
    /// Short label used in listings and reports.
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::File { .. } => "file",
            RuleKind::Directory { .. } => "directory",
            RuleKind::Extension { .. } => "extension",
            RuleKind::Glob { .. } => "glob",
        }
    }

    fn render_body(&self) -> String {
        match self {
            RuleKind::File { path } => path.clone(),
            RuleKind::Extension { extension } => format!("*.{extension}"),
            RuleKind::Glob { pattern } => pattern.clone(),
            RuleKind::Directory { name, mode } => match mode {
                DirectoryMode::Directory => format!("{name}/"),
                DirectoryMode::Recursive => format!("{name}/**"),
                DirectoryMode::Children => format!("{name}/*"),
                DirectoryMode::Anywhere => format!("**/{name}/"),
                DirectoryMode::Root => format!("/{name}/"),
            },
        }
    }
}

/// One entry of an ignore file: what it matches and what it does with it.
///
/// Two rules are "the same rule" for delete and move purposes when their
/// rendered text is equal; the rendered text already carries the action
/// through the negation prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub action: Action,
    pub kind: RuleKind,
}

impl Rule {
    /// Creates a rule for a single path, e.g. `build/out` or `/Cargo.lock`.
    pub fn file(path: &str, action: Action) -> Result<Self> {
        let path = clean_path(path)?;
        Ok(Self {
            kind: RuleKind::File { path },
            action,
        })
    }

    /// Creates a directory rule. Surrounding slashes and spaces on `name`
    /// are dropped, the mode decides where the slashes are put back.
    pub fn directory(name: &str, mode: DirectoryMode, action: Action) -> Result<Self> {
        let name = clean_value(name)?
            .trim_matches(|c: char| c == '/' || c.is_whitespace())
            .to_string();
        if name.is_empty() {
            return Err(invalid(name, "directory name is empty"));
        }
        if name.contains(WILDCARD_CHARS) {
            return Err(invalid(name, "directory names cannot contain wildcards; use a glob rule"));
        }
        Ok(Self {
            kind: RuleKind::Directory { name, mode },
            action,
        })
    }

    /// Creates an extension rule. Accepts both `log` and `.log`.
    pub fn extension(extension: &str, action: Action) -> Result<Self> {
        let cleaned = clean_value(extension)?;
        let extension = cleaned
            .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
            .to_string();
        if extension.is_empty() {
            return Err(invalid(cleaned, "extension is empty"));
        }
        if extension.contains(WILDCARD_CHARS) || extension.contains('/') {
            return Err(invalid(extension, "extensions cannot contain wildcards or separators"));
        }
        Ok(Self {
            kind: RuleKind::Extension { extension },
            action,
        })
    }

    /// Creates a rule from a raw glob such as `.coverage.*`.
    pub fn glob(pattern: &str, action: Action) -> Result<Self> {
        let pattern = clean_path(pattern)?;
        Ok(Self {
            kind: RuleKind::Glob { pattern },
            action,
        })
    }

    /// Renders the rule into its canonical ignore-file line.
    ///
    /// This is total and deterministic; it is also the rule's identity for
    /// lookups, so it is always recomputed rather than cached.
    pub fn render(&self) -> String {
        let body = self.kind.render_body();
        match self.action {
            Action::Include => body,
            Action::Exclude => format!("{NEGATION_PREFIX}{body}"),
        }
    }

    /// The rendered pattern without the negation prefix.
    pub fn pattern(&self) -> String {
        self.kind.render_body()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Parses one ignore-file line back into a rule.
///
/// The caller is expected to have dropped blank lines and comments. The
/// rule kind is recovered from the line's shape, so `*.log` comes back as an
/// extension rule even if it was originally added as a glob; the rendered
/// text is stable either way.
///
/// # Arguments
/// * `line`: A single line of an ignore file, without its line terminator.
///
/// # Returns
/// The parsed `Rule`, or `RuleError::InvalidPattern` when the line has no
/// usable body.
pub fn parse_line(line: &str) -> Result<Rule> {
    let line = line.trim();
    let (action, body) = match line.strip_prefix(NEGATION_PREFIX) {
        Some(rest) => (Action::Exclude, rest),
        None => (Action::Include, line),
    };

    let shapes = LINE_SHAPES
        .as_ref()
        .map_err(|e| invalid(line.to_string(), &e.to_string()))?;

    if let Some(caps) = shapes.anywhere.captures(body) {
        return Rule::directory(&caps[1], DirectoryMode::Anywhere, action);
    }
    if let Some(caps) = shapes.root.captures(body) {
        return Rule::directory(&caps[1], DirectoryMode::Root, action);
    }
    if let Some(caps) = shapes.recursive.captures(body) {
        return Rule::directory(&caps[1], DirectoryMode::Recursive, action);
    }
    if let Some(caps) = shapes.children.captures(body) {
        return Rule::directory(&caps[1], DirectoryMode::Children, action);
    }
    if let Some(caps) = shapes.directory.captures(body) {
        return Rule::directory(&caps[1], DirectoryMode::Directory, action);
    }
    if let Some(caps) = shapes.extension.captures(body) {
        return Rule::extension(&caps[1], action);
    }
    if body.contains(WILDCARD_CHARS) {
        return Rule::glob(body, action);
    }
    Rule::file(body, action)
}

fn clean_value(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(trimmed.to_string(), "pattern is empty"));
    }
    if trimmed.contains(['\n', '\r']) {
        return Err(invalid(trimmed.to_string(), "pattern spans multiple lines"));
    }
    if trimmed.starts_with(NEGATION_PREFIX) {
        return Err(invalid(
            trimmed.to_string(),
            "leading '!' is reserved for negation; use the exclude action",
        ));
    }
    if trimmed.starts_with('#') {
        return Err(invalid(
            trimmed.to_string(),
            "leading '#' would turn the line into a comment",
        ));
    }
    Ok(trimmed.to_string())
}

/// `clean_value` for file and glob values. Whitespace next to a separator
/// is rejected: `a /` would read back as the directory `a/`.
fn clean_path(value: &str) -> Result<String> {
    let cleaned = clean_value(value)?;
    // `cleaned` is trimmed, so padding can only sit against a separator.
    let padded = cleaned
        .split('/')
        .any(|segment| segment.starts_with(char::is_whitespace) || segment.ends_with(char::is_whitespace));
    if padded {
        return Err(invalid(cleaned, "whitespace next to '/' is ambiguous"));
    }
    Ok(cleaned)
}

fn invalid(value: String, reason: &str) -> RuleError {
    RuleError::InvalidPattern {
        value,
        reason: reason.to_string(),
    }
}
