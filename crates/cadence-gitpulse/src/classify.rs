//! Commit message style classification.

use cadence_core::MessagePattern;

/// Share of conventional messages needed for [`MessagePattern::Conventional`].
const CONVENTIONAL_SHARE: f64 = 0.6;

/// Share of generic messages needed for [`MessagePattern::ShortGeneric`].
const GENERIC_SHARE: f64 = 0.5;

/// Messages shorter than this many words count as generic.
const MIN_DESCRIPTIVE_WORDS: usize = 3;

const CONVENTIONAL_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

const GENERIC_MESSAGES: &[&str] = &[
    "update",
    "updates",
    "updated",
    "fix",
    "fixes",
    "fixed",
    "wip",
    "changes",
    "change",
    "commit",
    "misc",
    "stuff",
    "minor changes",
    "small fix",
    "update readme",
    "initial commit",
    "first commit",
    "save",
    "test",
];

/// Classify a window's commit subjects into a [`MessagePattern`].
///
/// Conventional commits win when they make up at least 60% of the window;
/// otherwise the window is generic when at least half of the messages are
/// terse or boilerplate. Everything else, including an empty window, is
/// [`MessagePattern::Varied`].
///
/// # Examples
///
/// ```
/// use cadence_core::MessagePattern;
/// use cadence_gitpulse::classify::classify_messages;
///
/// let pattern = classify_messages(&["feat(api): add paging", "fix: handle empty body"]);
/// assert_eq!(pattern, MessagePattern::Conventional);
///
/// let pattern = classify_messages(&["update", "wip", "Refactor the config loader"]);
/// assert_eq!(pattern, MessagePattern::ShortGeneric);
/// ```
pub fn classify_messages<S: AsRef<str>>(messages: &[S]) -> MessagePattern {
    if messages.is_empty() {
        return MessagePattern::Varied;
    }

    let total = messages.len() as f64;
    let conventional = messages
        .iter()
        .filter(|m| is_conventional(m.as_ref()))
        .count() as f64;
    if conventional / total >= CONVENTIONAL_SHARE {
        return MessagePattern::Conventional;
    }

    let generic = messages.iter().filter(|m| is_generic(m.as_ref())).count() as f64;
    if generic / total >= GENERIC_SHARE {
        return MessagePattern::ShortGeneric;
    }

    MessagePattern::Varied
}

/// Whether `message` has the form `type(scope)!: description`.
///
/// # Examples
///
/// ```
/// use cadence_gitpulse::classify::is_conventional;
///
/// assert!(is_conventional("feat(cli)!: drop legacy flags"));
/// assert!(!is_conventional("Added a feature"));
/// ```
pub fn is_conventional(message: &str) -> bool {
    let Some((head, description)) = message.split_once(':') else {
        return false;
    };
    if description.trim().is_empty() {
        return false;
    }

    let head = head.strip_suffix('!').unwrap_or(head);
    let kind = match head.split_once('(') {
        Some((kind, scope)) => {
            if !scope.ends_with(')') || scope.len() < 2 {
                return false;
            }
            kind
        }
        None => head,
    };

    CONVENTIONAL_TYPES.contains(&kind.to_ascii_lowercase().as_str())
}

/// Whether `message` is too terse or boilerplate to describe a change.
///
/// # Examples
///
/// ```
/// use cadence_gitpulse::classify::is_generic;
///
/// assert!(is_generic("Update."));
/// assert!(is_generic("small fix"));
/// assert!(!is_generic("Cache parsed manifests between runs"));
/// ```
pub fn is_generic(message: &str) -> bool {
    let normalized = message
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase();

    if normalized.split_whitespace().count() < MIN_DESCRIPTIVE_WORDS {
        return true;
    }
    GENERIC_MESSAGES.contains(&normalized.as_str())
}
