//! Lost-and-found desk: qualification of found-item reports, the persistent
//! item store, and lexical matching of lost-item queries against it.

pub mod audit;
pub mod domain;
pub mod export;
pub mod matcher;
pub mod normalizer;
pub mod qualification;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use audit::{AuditAction, AuditError, AuditLog, FileAuditLog};
pub use domain::{
    parse_estimated_value, Category, Item, ItemDetails, ItemId, ItemStatus, LostItemQuery,
};
pub use matcher::{jaccard, Match, MatchView, SimilarityMatcher, DEFAULT_SIMILARITY_THRESHOLD};
pub use normalizer::{contains_any, tokenize, TokenSet};
pub use qualification::{
    QualificationCriteria, QualificationDecision, QualificationEngine, QualificationRule,
    RejectionReason, RequiredField, RuleCheck, RuleOutcome,
};
pub use router::{desk_router, FoundItemRequest, SharedDesk};
pub use service::{
    DeskError, LostFoundDesk, RemovalReceipt, StorePaths, SubmissionOutcome, SubmissionView,
};
pub use store::{ItemStore, LoadReport, RemovalOutcome, StoreError, StoreStatistics};
