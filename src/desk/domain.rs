use std::fmt;
use std::sync::OnceLock;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::normalizer::{combined_text, tokenize, TokenSet};

/// Identifier wrapper for stored items.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, the short form shown in listings.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of item categories offered to reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Wallet,
    Bag,
    Electronics,
    Documents,
    Clothing,
    Keys,
    #[default]
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Wallet,
        Category::Bag,
        Category::Electronics,
        Category::Documents,
        Category::Clothing,
        Category::Keys,
        Category::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Wallet => "Wallet",
            Category::Bag => "Bag",
            Category::Electronics => "Electronics",
            Category::Documents => "Documents",
            Category::Clothing => "Clothing",
            Category::Keys => "Keys",
            Category::Others => "Others",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
    }

    /// Lenient lookup for user input: unknown or blank values become `Others`.
    pub fn parse_or_default(value: &str) -> Self {
        match Self::parse(value) {
            Some(category) => category,
            None => {
                if !value.trim().is_empty() {
                    warn!(category = value, "unrecognized category, defaulting to Others");
                }
                Category::Others
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a stored item. Removal is one-way and never deletes the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Removed,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Active => "ACTIVE",
            ItemStatus::Removed => "REMOVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("active") {
            Some(ItemStatus::Active)
        } else if trimmed.eq_ignore_ascii_case("removed") {
            Some(ItemStatus::Removed)
        } else {
            None
        }
    }
}

/// Reporter-supplied description of a found item, evaluated before storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: Category,
    pub date_found: NaiveDate,
    pub location: String,
    pub contact: String,
    #[serde(default)]
    pub estimated_value: f64,
    #[serde(default)]
    pub perishable: bool,
}

impl ItemDetails {
    /// Text scanned by the keyword rules and tokenized for matching.
    pub fn keyword_text(&self) -> String {
        combined_text(&self.name, &self.description)
    }
}

/// Stored found item. Only the status can change after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    id: ItemId,
    #[serde(flatten)]
    details: ItemDetails,
    status: ItemStatus,
    created_at: NaiveDateTime,
    #[serde(skip)]
    tokens: OnceLock<TokenSet>,
}

impl Item {
    /// Mint a fresh active item from accepted details.
    pub fn create(details: ItemDetails) -> Self {
        Self::restore(
            ItemId::generate(),
            details,
            ItemStatus::Active,
            Local::now().naive_local(),
        )
    }

    /// Rebuild an item from persisted fields.
    pub fn restore(
        id: ItemId,
        details: ItemDetails,
        status: ItemStatus,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            details,
            status,
            created_at,
            tokens: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn category(&self) -> Category {
        self.details.category
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Token set of name and description, computed on first use.
    pub fn token_set(&self) -> &TokenSet {
        self.tokens
            .get_or_init(|| tokenize(&self.details.keyword_text()))
    }

    /// Returns `false` when the item was already removed.
    pub(crate) fn mark_removed(&mut self) -> bool {
        match self.status {
            ItemStatus::Active => {
                self.status = ItemStatus::Removed;
                true
            }
            ItemStatus::Removed => false,
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.details == other.details
            && self.status == other.status
            && self.created_at == other.created_at
    }
}

/// Lost-item report used to build a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostItemQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

impl LostItemQuery {
    /// Space-joined non-blank parts: the single string the matcher scores.
    pub fn combined_text(&self) -> String {
        [&self.name, &self.description, &self.location]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse a user-entered value. Bad input falls back to 0.0 so the reporter
/// can correct it upstream instead of losing the whole report.
pub fn parse_estimated_value(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        Ok(value) => {
            warn!(value, "estimated value must be a non-negative number, defaulting to 0");
            0.0
        }
        Err(_) => {
            warn!(input = raw, "invalid estimated value, defaulting to 0");
            0.0
        }
    }
}
