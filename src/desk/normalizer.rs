//! Text normalization shared by the qualification rules and the matcher.
//!
//! Two primitives live here and they are deliberately different:
//! [`tokenize`] builds the word set used for similarity scoring, while
//! [`contains_any`] is a raw substring test used by the policy rules, so
//! that keywords also hit compound words ("keychain" contains "key").

use std::collections::BTreeSet;

/// Normalized, stopword-filtered words of a piece of text.
pub type TokenSet = BTreeSet<String>;

pub(crate) const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "to", "for", "with", "and", "or", "is", "are", "was",
    "were", "be", "been", "by", "from", "that", "this", "these", "those", "it", "its", "my",
    "your", "our", "their", "as", "but", "not", "so", "if", "then", "into", "about", "over",
    "under", "near", "between", "among", "per", "each",
];

/// Lowercase `text`, blank out everything except ASCII letters, digits and
/// whitespace, and collect the remaining non-stopword words.
pub fn tokenize(text: &str) -> TokenSet {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring test against each keyword.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// The `name + " " + description` text both the rules and token cache read.
pub fn combined_text(name: &str, description: &str) -> String {
    format!("{name} {description}")
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}
