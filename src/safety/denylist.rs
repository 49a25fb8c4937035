//! The ordered, lowercase trigger terms both filter stages use.
//!
//! Built once at startup and shared read-only afterwards. Construction
//! rejects terms that could interact with the redaction marker, which keeps
//! `redact` idempotent for every list that makes it through here.

use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Terms used when no denylist file is configured.
pub const DEFAULT_TERMS: &[&str] = &["kill", "hack", "bomb", "exploit", "violence"];

/// Lowercased marker body; terms inside it would re-match redacted text.
const MARKER_BODY: &str = "redacted";

#[derive(Debug, Error)]
pub enum DenylistError {
    #[error("denylist term is empty")]
    EmptyTerm,

    #[error("denylist term '{0}' contains a bracket")]
    BracketInTerm(String),

    #[error("denylist term '{0}' overlaps the redaction marker")]
    OverlapsMarker(String),

    #[error("denylist is empty")]
    NoTerms,

    #[error("denylist term '{term}' did not compile: {source}")]
    Pattern { term: String, source: regex::Error },

    #[error("failed to read denylist file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Ordered set of lowercase trigger terms.
///
/// Each term carries a precompiled case-insensitive literal pattern used by
/// the redactor, in the same order as `terms`.
#[derive(Debug, Clone)]
pub struct Denylist {
    terms: Vec<String>,
    patterns: Vec<Regex>,
}

impl PartialEq for Denylist {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for Denylist {}

impl Denylist {
    /// Build a denylist from raw terms, keeping first-seen order.
    ///
    /// Terms are trimmed and lowercased; repeats are dropped.
    pub fn new<I, S>(terms: I) -> Result<Self, DenylistError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for raw in terms {
            let term = raw.as_ref().trim().to_lowercase();
            if term.is_empty() {
                return Err(DenylistError::EmptyTerm);
            }
            if term.contains('[') || term.contains(']') {
                return Err(DenylistError::BracketInTerm(term));
            }
            if MARKER_BODY.contains(term.as_str()) {
                return Err(DenylistError::OverlapsMarker(term));
            }
            if !out.contains(&term) {
                out.push(term);
            }
        }
        if out.is_empty() {
            return Err(DenylistError::NoTerms);
        }
        let patterns = out
            .iter()
            .map(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| DenylistError::Pattern {
                        term: term.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            terms: out,
            patterns,
        })
    }

    /// Parse newline-separated terms. Blank lines and `#` comments are skipped.
    pub fn parse(contents: &str) -> Result<Self, DenylistError> {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_file(path: &Path) -> Result<Self, DenylistError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DenylistError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&contents)?;
        log::info!(
            "[SAFETY] Loaded {} denylist terms from {}",
            list.len(),
            path.display()
        );
        Ok(list)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms paired with their compiled patterns, in denylist order.
    pub(crate) fn patterns(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.terms
            .iter()
            .map(String::as_str)
            .zip(self.patterns.iter())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_TERMS).expect("built-in denylist terms are valid")
    }
}

/// Per-user denylist location under the platform config directory.
pub fn default_denylist_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("moderated-chat").join("denylist.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_is_valid() {
        let list = Denylist::default();
        assert_eq!(list.len(), DEFAULT_TERMS.len());
        assert_eq!(list.terms()[0], "kill");
        assert_eq!(list.patterns().count(), list.len());
    }

    #[test]
    fn terms_are_lowercased_trimmed_and_deduplicated() {
        let list = Denylist::new(["  Bomb ", "HACK", "bomb"]).unwrap();
        assert_eq!(list.terms(), &["bomb".to_string(), "hack".to_string()]);
    }

    #[test]
    fn rejects_terms_that_collide_with_marker() {
        assert!(matches!(
            Denylist::new(["act"]),
            Err(DenylistError::OverlapsMarker(_))
        ));
        assert!(matches!(
            Denylist::new(["Redacted"]),
            Err(DenylistError::OverlapsMarker(_))
        ));
        assert!(matches!(
            Denylist::new(["x]"]),
            Err(DenylistError::BracketInTerm(_))
        ));
    }

    #[test]
    fn rejects_empty_terms_and_lists() {
        assert!(matches!(Denylist::new(["  "]), Err(DenylistError::EmptyTerm)));
        assert!(matches!(
            Denylist::new(Vec::<String>::new()),
            Err(DenylistError::NoTerms)
        ));
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let list = Denylist::parse("# weapons\nbomb\n\n  # hacking\nhack\n").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.terms()[1], "hack");
    }

    #[test]
    fn default_path_lives_under_app_dir() {
        if let Some(path) = default_denylist_path() {
            let s = path.to_string_lossy();
            assert!(s.contains("moderated-chat"));
            assert!(s.ends_with("denylist.txt"));
        }
    }
}
