//! Include/exclude keyword matching over description text.
//!
//! Matching is plain substring containment on the (optionally lower-cased)
//! text. It is not tokenized: `"java"` matches inside `"javascript"`.
use sift_common::{KeywordPolicy, MatchMode};
use std::borrow::Cow;

/// Outcome of applying a [`KeywordPolicy`] to one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// An excluded term was found; carries the term as configured.
    Excluded(String),
    /// No exclusion hit, but the required terms were not satisfied.
    NoMatch,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

fn normalize<'a>(text: &'a str, policy: &KeywordPolicy) -> Cow<'a, str> {
    if policy.case_insensitive {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// Apply `policy` to `description`.
///
/// Exclusion is checked first and always wins. With an empty `required`
/// list, [`MatchMode::Any`] rejects and [`MatchMode::All`] accepts.
pub fn evaluate(description: &str, policy: &KeywordPolicy) -> Verdict {
    let desc = normalize(description, policy);

    for term in &policy.excluded {
        let needle = normalize(term, policy);
        if !needle.is_empty() && desc.contains(&*needle) {
            return Verdict::Excluded(term.clone());
        }
    }

    let mut required = policy
        .required
        .iter()
        .map(|term| normalize(term, policy));
    let satisfied = match policy.mode {
        MatchMode::All => required.all(|k| desc.contains(&*k)),
        MatchMode::Any => required.any(|k| desc.contains(&*k)),
    };

    if satisfied {
        Verdict::Accepted
    } else {
        Verdict::NoMatch
    }
}

/// Whether `description` satisfies `policy`.
pub fn matches(description: &str, policy: &KeywordPolicy) -> bool {
    evaluate(description, policy).is_accepted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(required: &[&str], mode: MatchMode, excluded: &[&str]) -> KeywordPolicy {
        KeywordPolicy {
            required: required.iter().map(|s| s.to_string()).collect(),
            mode,
            excluded: excluded.iter().map(|s| s.to_string()).collect(),
            case_insensitive: true,
        }
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        let p = policy(&["typescript"], MatchMode::Any, &["senior"]);
        assert_eq!(
            evaluate("Senior TypeScript engineer", &p),
            Verdict::Excluded("senior".to_string())
        );

        let p = policy(&["typescript"], MatchMode::All, &["senior"]);
        assert!(!matches("Senior TypeScript engineer", &p));
    }

    #[test]
    fn blank_exclusions_are_ignored() {
        let p = policy(&["rust"], MatchMode::Any, &["", "php"]);
        assert!(matches("Rust services team", &p));
    }

    #[test]
    fn any_mode_needs_one_term() {
        let p = policy(&["react.js", "typescript"], MatchMode::Any, &[]);
        assert!(matches("We need a React.js dev", &p));
        assert_eq!(evaluate("Backend only, Java", &p), Verdict::NoMatch);
    }

    #[test]
    fn all_mode_needs_every_term() {
        let p = policy(&["react.js", "typescript"], MatchMode::All, &[]);
        assert!(!matches("We need a React.js dev", &p));
        assert!(matches("React.js with TypeScript", &p));
    }

    #[test]
    fn empty_required_list_is_asymmetric() {
        assert!(!matches("anything", &policy(&[], MatchMode::Any, &[])));
        assert!(matches("anything", &policy(&[], MatchMode::All, &[])));
        // exclusion still applies to the vacuous case
        assert!(!matches("anything", &policy(&[], MatchMode::All, &["thing"])));
    }

    #[test]
    fn case_insensitive_ignores_case_on_both_sides() {
        let p = policy(&["TypeScript"], MatchMode::Any, &["LEAD"]);
        assert!(matches("typescript developer", &p));
        assert!(!matches("Tech lead, typescript", &p));
    }

    #[test]
    fn case_sensitive_requires_exact_case() {
        let mut p = policy(&["TypeScript"], MatchMode::Any, &["Senior"]);
        p.case_insensitive = false;
        assert!(!matches("typescript developer", &p));
        assert!(matches("TypeScript developer", &p));
        // lower-case "senior" does not trip the exact-case exclusion
        assert!(matches("senior TypeScript developer", &p));
    }

    #[test]
    fn substring_matching_is_not_word_aware() {
        let p = policy(&["java"], MatchMode::Any, &[]);
        assert!(matches("Modern JavaScript stack", &p));
    }
}
