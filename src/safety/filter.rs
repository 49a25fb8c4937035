//! Denylist scanning and redaction.
//!
//! `scan` guards user input before it reaches the provider. `redact` rewrites
//! model output before it reaches the user.
//!
//! Matching is plain substring matching, not word-boundary matching, so a term
//! embedded in a longer word still counts ("killer" and "skillset" both match
//! "kill"). Known false-positive source; callers rely on this behavior.

use super::denylist::Denylist;
use regex::Captures;

/// Literal that replaces every denylisted occurrence in model output.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Result of running text through one filter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationOutcome {
    pub flagged: bool,
    pub text: String,
}

/// True iff any denylist term occurs in `text`, ignoring case.
pub fn scan(text: &str, denylist: &Denylist) -> bool {
    if text.is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    denylist.terms().iter().any(|term| lowered.contains(term.as_str()))
}

/// Input-side guard. Never rewrites; `text` is handed back untouched.
pub fn check_input(text: &str, denylist: &Denylist) -> ModerationOutcome {
    let flagged = scan(text, denylist);
    if flagged {
        // Never log the text itself.
        log::info!("[SAFETY] Input matched denylist ({} chars)", text.len());
    }
    ModerationOutcome {
        flagged,
        text: text.to_string(),
    }
}

/// Replace every case-insensitive occurrence of every term with
/// [`REDACTION_MARKER`], applying terms in denylist order.
pub fn redact(text: &str, denylist: &Denylist) -> ModerationOutcome {
    let mut cleaned = text.to_string();
    let mut hits: Vec<(&str, usize)> = Vec::new();

    for (term, pattern) in denylist.patterns() {
        // The regex folds case more loosely than `to_lowercase`; keep only the
        // matches `scan` would also see.
        let mut count = 0;
        let replaced = pattern
            .replace_all(&cleaned, |caps: &Captures<'_>| {
                let found = &caps[0];
                if found.to_lowercase() == term {
                    count += 1;
                    REDACTION_MARKER.to_string()
                } else {
                    found.to_string()
                }
            })
            .into_owned();
        if count > 0 {
            hits.push((term, count));
            cleaned = replaced;
        }
    }

    let flagged = !hits.is_empty();
    if flagged {
        let summary: Vec<String> = hits
            .iter()
            .map(|(term, count)| format!("{} x{}", term, count))
            .collect();
        log::info!("[SAFETY] Redacted {}", summary.join(", "));
    }

    ModerationOutcome {
        flagged,
        text: cleaned,
    }
}
