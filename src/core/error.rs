use std::path::PathBuf;
use thiserror::Error;

/// Every failure the rule engine can surface to its callers.
///
/// Reporting-style outcomes (a duplicate add, a partial autofix) are not
/// errors; they come back as successful calls carrying an `ActionResult`.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid action '{0}', expected 'include' or 'exclude'")]
    InvalidAction(String),

    #[error(
        "invalid directory mode '{0}', expected one of: directory, recursive, children, anywhere, root"
    )]
    InvalidMode(String),

    #[error("invalid move direction '{0}', expected 'before' or 'after'")]
    InvalidDirection(String),

    #[error("invalid rule value '{value}': {reason}")]
    InvalidPattern { value: String, reason: String },

    #[error("malformed line {line_number} '{line}': {reason}")]
    MalformedLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("no rule matching '{pattern}'")]
    NotFound { pattern: String },

    #[error("cannot move rule '{pattern}' relative to itself")]
    SameRule { pattern: String },

    #[error("ignore file already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_action_message() {
        let err = RuleError::InvalidAction("Include".into());
        assert_eq!(
            err.to_string(),
            "invalid action 'Include', expected 'include' or 'exclude'"
        );
    }

    #[test]
    fn not_found_message() {
        let err = RuleError::NotFound {
            pattern: "!*.log".into(),
        };
        assert_eq!(err.to_string(), "no rule matching '!*.log'");
    }

    #[test]
    fn malformed_line_message() {
        let err = RuleError::MalformedLine {
            line_number: 3,
            line: "!".into(),
            reason: "empty pattern".into(),
        };
        assert_eq!(err.to_string(), "malformed line 3 '!': empty pattern");
    }

    #[test]
    fn already_exists_message() {
        let err = RuleError::AlreadyExists {
            path: PathBuf::from(".gitignore"),
        };
        assert_eq!(err.to_string(), "ignore file already exists at .gitignore");
    }
}
