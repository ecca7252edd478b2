use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::domain::{Category, Item};
use super::normalizer::{tokenize, TokenSet};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.25;

/// Active item paired with its similarity to a query.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub item: &'a Item,
    pub score: f64,
    pub matched_terms: TokenSet,
}

impl Match<'_> {
    pub fn view(&self) -> MatchView {
        let details = self.item.details();
        MatchView {
            id: self.item.id().to_string(),
            name: details.name.clone(),
            category: details.category,
            location: details.location.clone(),
            estimated_value: details.estimated_value,
            score: self.score,
            matched_terms: self.matched_terms.iter().cloned().collect(),
        }
    }
}

/// Owned, serializable form of a [`Match`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub location: String,
    pub estimated_value: f64,
    pub score: f64,
    pub matched_terms: Vec<String>,
}

/// Ranks active items against lost-item text by Jaccard similarity.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    threshold: f64,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl SimilarityMatcher {
    /// Matcher starting at `threshold`, or the default when out of range.
    pub fn with_threshold(threshold: f64) -> Self {
        let mut matcher = Self::default();
        matcher.set_threshold(threshold);
        matcher
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Accepts values in `[0, 1]`; anything else keeps the current threshold.
    /// Returns whether the value was applied.
    pub fn set_threshold(&mut self, threshold: f64) -> bool {
        if (0.0..=1.0).contains(&threshold) {
            self.threshold = threshold;
            true
        } else {
            debug!(
                requested = threshold,
                current = self.threshold,
                "ignoring out-of-range similarity threshold"
            );
            false
        }
    }

    /// Score every active item against `query_text`, keep those at or above
    /// the threshold, best first. Equal scores are ordered by ascending id.
    pub fn search<'a, I>(&self, query_text: &str, items: I) -> Vec<Match<'a>>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let query_tokens = tokenize(query_text);

        let mut matches: Vec<Match<'a>> = items
            .into_iter()
            .filter(|item| item.is_active())
            .filter_map(|item| {
                let item_tokens = item.token_set();
                let score = jaccard(&query_tokens, item_tokens);
                (score >= self.threshold).then(|| Match {
                    item,
                    score,
                    matched_terms: query_tokens.intersection(item_tokens).cloned().collect(),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.id().cmp(b.item.id()))
        });
        matches
    }
}

/// `|a ∩ b| / |a ∪ b|`, defined as 0.0 when both sets are empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
