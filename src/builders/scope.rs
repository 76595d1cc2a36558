//! Structural scope analysis for ignore patterns.
//!
//! Patterns are compared symbolically: a pattern is broken into tokens and
//! containment is decided by matching one token sequence against the other,
//! with wildcards in the covered pattern treated as the sets of names they
//! stand for. Nothing here touches the filesystem.

use crate::builders::rules::Rule;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Lit(char),
    Sep,
    /// `?`
    Any,
    /// `*`
    Star,
    /// `**` as a whole path segment
    Globstar,
    /// `[...]`, stored without the brackets
    Class(String),
}

/// The normalized match scope of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    tokens: Vec<Token>,
    dir_only: bool,
}

impl Scope {
    /// Builds the scope of a rule from its pattern, ignoring its action.
    ///
    /// A pattern with no inner separator floats and is rewritten to
    /// `**/pattern`; a leading separator only anchors and is dropped; a
    /// trailing separator restricts matches to directories.
    pub fn of(rule: &Rule) -> Self {
        let pattern = rule.pattern();
        let mut body = pattern.as_str();

        let dir_only = body.len() > 1 && body.ends_with('/');
        if dir_only {
            body = &body[..body.len() - 1];
        }

        let tokens = match body.strip_prefix('/') {
            Some(rest) => tokenize(rest),
            None if body.contains('/') => tokenize(body),
            None => {
                let mut tokens = vec![Token::Globstar, Token::Sep];
                tokens.extend(tokenize(body));
                tokens
            }
        };

        Self { tokens, dir_only }
    }

    /// Tokens extended with `/**`: the contents of whatever this scope matches.
    fn contents(&self) -> Vec<Token> {
        let mut tokens = self.tokens.clone();
        tokens.push(Token::Sep);
        tokens.push(Token::Globstar);
        tokens
    }

    /// Returns `true` when every path `other` can match is matched by `self`.
    ///
    /// A pattern also ignores everything below the directories it matches, so
    /// `build` covers `build/out` and `build/` covers `build/*`.
    pub fn covers(&self, other: &Scope) -> bool {
        let direct = (!self.dir_only || other.dir_only) && contains(&self.tokens, &other.tokens);
        direct || contains(&self.contents(), &other.tokens)
    }

    /// Conservative intersection test: `false` only when the two scopes can
    /// never match a common path.
    pub fn overlaps(&self, other: &Scope) -> bool {
        let ours = [self.tokens.clone(), self.contents()];
        let theirs = [other.tokens.clone(), other.contents()];
        ours.iter().any(|a| theirs.iter().any(|b| intersects(a, b)))
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                tokens.push(Token::Lit(chars[i + 1]));
                i += 2;
            }
            '/' => {
                tokens.push(Token::Sep);
                i += 1;
            }
            '?' => {
                tokens.push(Token::Any);
                i += 1;
            }
            '*' => {
                let mut run = i;
                while run < chars.len() && chars[run] == '*' {
                    run += 1;
                }
                let segment_start = i == 0 || chars[i - 1] == '/';
                let segment_end = run == chars.len() || chars[run] == '/';
                if run - i >= 2 && segment_start && segment_end {
                    tokens.push(Token::Globstar);
                } else {
                    tokens.push(Token::Star);
                }
                i = run;
            }
            '[' => match chars[i + 1..].iter().position(|c| *c == ']') {
                // `[]...]` puts a literal `]` first in the class
                Some(0) | None => {
                    tokens.push(Token::Lit('['));
                    i += 1;
                }
                Some(len) => {
                    tokens.push(Token::Class(chars[i + 1..i + 1 + len].iter().collect()));
                    i += len + 2;
                }
            },
            c => {
                tokens.push(Token::Lit(c));
                i += 1;
            }
        }
    }

    tokens
}

fn class_matches(class: &str, c: char) -> bool {
    let (negated, body) = match class.strip_prefix(['!', '^']) {
        Some(rest) => (true, rest),
        None => (false, class),
    };
    let chars: Vec<char> = body.chars().collect();
    let mut hit = false;
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            if chars[i] <= c && c <= chars[i + 2] {
                hit = true;
            }
            i += 3;
        } else {
            if chars[i] == c {
                hit = true;
            }
            i += 1;
        }
    }
    hit != negated
}

/// Does token `a` (from the covering pattern) match everything token `b` can?
fn single_covers(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (Token::Sep, Token::Sep) => true,
        (Token::Lit(x), Token::Lit(y)) => x == y,
        (Token::Any, Token::Lit(_) | Token::Any | Token::Class(_)) => true,
        (Token::Class(x), Token::Class(y)) => x == y,
        (Token::Class(x), Token::Lit(y)) => class_matches(x, *y),
        _ => false,
    }
}

/// Could token `a` and token `b` ever match the same character?
fn single_intersects(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (Token::Sep, Token::Sep) => true,
        (Token::Sep, _) | (_, Token::Sep) => false,
        (Token::Lit(x), Token::Lit(y)) => x == y,
        (Token::Class(x), Token::Lit(y)) | (Token::Lit(y), Token::Class(x)) => class_matches(x, *y),
        _ => true,
    }
}

/// Token-level containment: is every string matched by `b` matched by `a`?
///
/// `dp[i][j]` answers the question for the suffixes `a[i..]` and `b[j..]`.
fn contains(a: &[Token], b: &[Token]) -> bool {
    let (n, m) = (a.len(), b.len());
    let mut dp = vec![vec![false; m + 1]; n + 1];
    dp[n][m] = true;

    for i in (0..n).rev() {
        for j in (0..=m).rev() {
            dp[i][j] = match &a[i] {
                Token::Globstar => {
                    let zero_segments = a.get(i + 1) == Some(&Token::Sep) && dp[i + 2][j];
                    zero_segments || dp[i + 1][j] || (j < m && dp[i][j + 1])
                }
                Token::Star => {
                    let consumes = j < m && !matches!(b[j], Token::Sep | Token::Globstar);
                    dp[i + 1][j] || (consumes && dp[i][j + 1])
                }
                token => j < m && single_covers(token, &b[j]) && dp[i + 1][j + 1],
            };
        }
    }

    dp[0][0]
}

/// Token-level intersection: can some string be matched by both `a` and `b`?
fn intersects(a: &[Token], b: &[Token]) -> bool {
    let (n, m) = (a.len(), b.len());
    let mut dp = vec![vec![false; m + 1]; n + 1];

    for i in (0..=n).rev() {
        for j in (0..=m).rev() {
            dp[i][j] = if i == n && j == m {
                true
            } else if i < n && matches!(a[i], Token::Globstar | Token::Star) {
                let skip_sep = a[i] == Token::Globstar && a.get(i + 1) == Some(&Token::Sep) && dp[i + 2][j];
                let eats = j < m && (a[i] == Token::Globstar || b[j] != Token::Sep) && dp[i][j + 1];
                skip_sep || dp[i + 1][j] || eats
            } else if j < m && matches!(b[j], Token::Globstar | Token::Star) {
                let skip_sep = b[j] == Token::Globstar && b.get(j + 1) == Some(&Token::Sep) && dp[i][j + 2];
                let eats = i < n && (b[j] == Token::Globstar || a[i] != Token::Sep) && dp[i + 1][j];
                skip_sep || dp[i][j + 1] || eats
            } else {
                i < n && j < m && single_intersects(&a[i], &b[j]) && dp[i + 1][j + 1]
            };
        }
    }

    dp[0][0]
}
