use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::audit::{item_summary, truncate, AuditAction, AuditLog};
use super::domain::{Item, ItemDetails, LostItemQuery};
use super::matcher::{Match, SimilarityMatcher};
use super::qualification::{
    QualificationCriteria, QualificationDecision, QualificationEngine, RejectionReason, RuleCheck,
};
use super::store::{ItemStore, LoadReport, RemovalOutcome, StoreError, StoreStatistics};
use crate::config::DeskConfig;

const QUERY_AUDIT_CHARS: usize = 200;

/// Where the desk snapshots its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub store: PathBuf,
    pub backup: PathBuf,
}

/// Result of submitting a found-item report.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Stored; `persisted` is false when the snapshot could not be written.
    Accepted { item: Item, persisted: bool },
    Rejected { reason: RejectionReason },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    pub fn decision(&self) -> QualificationDecision {
        match self {
            SubmissionOutcome::Accepted { .. } => QualificationDecision::Accepted,
            SubmissionOutcome::Rejected { reason } => QualificationDecision::Rejected {
                reason: reason.clone(),
            },
        }
    }

    pub fn view(&self) -> SubmissionView<'_> {
        match self {
            SubmissionOutcome::Accepted { item, persisted } => SubmissionView {
                accepted: true,
                item: Some(item),
                persisted: Some(*persisted),
                reason: None,
                detail: None,
            },
            SubmissionOutcome::Rejected { reason } => SubmissionView {
                accepted: false,
                item: None,
                persisted: None,
                reason: Some(reason.summary()),
                detail: Some(reason.detail()),
            },
        }
    }
}

/// Result of a removal request that found its item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReceipt {
    pub outcome: RemovalOutcome,
    /// True when the change was written to the store file.
    pub persisted: bool,
}

/// Error raised by the desk service.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("search query is blank")]
    EmptyQuery,
}

/// Service composing the item store, qualification engine, matcher and
/// audit trail behind the desk's operations.
pub struct LostFoundDesk<A> {
    store: ItemStore,
    engine: QualificationEngine,
    matcher: SimilarityMatcher,
    paths: Option<StorePaths>,
    audit: Arc<A>,
}

impl<A> LostFoundDesk<A>
where
    A: AuditLog + 'static,
{
    /// Load the store file named by `config` and start auditing.
    pub fn open(config: &DeskConfig, audit: Arc<A>) -> Result<Self, DeskError> {
        let (store, report) = ItemStore::load(&config.store_path)?;
        let mut matcher = SimilarityMatcher::default();
        if !matcher.set_threshold(config.similarity_threshold) {
            warn!(
                requested = config.similarity_threshold,
                threshold = matcher.threshold(),
                "configured similarity threshold out of range, using default"
            );
        }
        let desk = Self {
            store,
            engine: QualificationEngine::standard(),
            matcher,
            paths: Some(StorePaths {
                store: config.store_path.clone(),
                backup: config.backup_path.clone(),
            }),
            audit,
        };
        desk.audit_opened(&report);
        Ok(desk)
    }

    /// Desk without a backing file, used by tests and dry runs.
    pub fn in_memory(audit: Arc<A>) -> Self {
        Self {
            store: ItemStore::new(),
            engine: QualificationEngine::standard(),
            matcher: SimilarityMatcher::default(),
            paths: None,
            audit,
        }
    }

    /// Qualify a report and store it when every rule passes.
    pub fn submit(&mut self, details: ItemDetails) -> Result<SubmissionOutcome, DeskError> {
        if let QualificationDecision::Rejected { reason } = self.engine.evaluate(&details) {
            info!(name = %details.name, reason = %reason, "found item rejected");
            self.audit(
                AuditAction::Rejected,
                &format!(
                    "Name={} Reason={} ({})",
                    truncate(&details.name, 80),
                    reason,
                    reason.detail()
                ),
            );
            return Ok(SubmissionOutcome::Rejected { reason });
        }

        let item = self.store.append(Item::create(details))?.clone();
        let persisted = self.persist();
        info!(item = %item.id(), category = %item.category(), "found item accepted");
        self.audit(AuditAction::Accepted, &item_summary(&item));

        Ok(SubmissionOutcome::Accepted { item, persisted })
    }

    /// Rank active items against a lost-item report.
    pub fn search(&self, query: &LostItemQuery) -> Result<Vec<Match<'_>>, DeskError> {
        self.search_text(&query.combined_text())
    }

    pub fn search_text(&self, text: &str) -> Result<Vec<Match<'_>>, DeskError> {
        if text.trim().is_empty() {
            return Err(DeskError::EmptyQuery);
        }

        let matches = self.matcher.search(text, self.store.all_items());
        let top_score = matches.first().map_or(0.0, |found| found.score);
        debug!(
            matches = matches.len(),
            top_score,
            threshold = self.matcher.threshold(),
            "search completed"
        );
        self.audit(
            AuditAction::Search,
            &format!(
                "Query: {} -> {} matches (top score: {:.4})",
                truncate(text, QUERY_AUDIT_CHARS),
                matches.len(),
                top_score
            ),
        );
        Ok(matches)
    }

    /// Soft-remove by id or id prefix. Only an actual change is saved and
    /// audited.
    pub fn remove(&mut self, id_or_prefix: &str) -> Result<RemovalReceipt, DeskError> {
        let outcome = self.store.mark_removed(id_or_prefix)?;
        if !outcome.changed() {
            debug!(item = %outcome.id(), "item already removed");
            return Ok(RemovalReceipt {
                outcome,
                persisted: false,
            });
        }

        let persisted = self.persist();
        if let Some(item) = self.store.get(outcome.id().as_str()) {
            info!(item = %item.id(), "found item removed");
            self.audit(AuditAction::Removed, &item_summary(item));
        }
        Ok(RemovalReceipt { outcome, persisted })
    }

    /// Items in insertion order, active only unless `include_removed`.
    pub fn items(&self, include_removed: bool) -> Vec<&Item> {
        if include_removed {
            self.store.all_items().iter().collect()
        } else {
            self.store.active_items().collect()
        }
    }

    pub fn get(&self, id_or_prefix: &str) -> Option<&Item> {
        self.store.get(id_or_prefix)
    }

    pub fn statistics(&self, today: NaiveDate) -> StoreStatistics {
        self.store.statistics(today)
    }

    pub fn threshold(&self) -> f64 {
        self.matcher.threshold()
    }

    /// Returns whether the new threshold was applied.
    pub fn set_threshold(&mut self, threshold: f64) -> bool {
        let previous = self.matcher.threshold();
        let applied = self.matcher.set_threshold(threshold);
        if applied {
            info!(previous, threshold, "similarity threshold updated");
            self.audit(
                AuditAction::Config,
                &format!("Similarity threshold {previous:.2} -> {threshold:.2}"),
            );
        } else {
            warn!(
                requested = threshold,
                current = previous,
                "similarity threshold must be between 0 and 1, keeping current value"
            );
        }
        applied
    }

    pub fn evaluate_all(&self, details: &ItemDetails) -> Vec<RuleCheck> {
        self.engine.evaluate_all(details)
    }

    pub fn criteria(&self) -> QualificationCriteria {
        self.engine.criteria()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn paths(&self) -> Option<&StorePaths> {
        self.paths.as_ref()
    }

    fn persist(&self) -> bool {
        let Some(paths) = &self.paths else {
            return false;
        };
        match self.store.save(&paths.store, &paths.backup) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to save items, keeping in-memory state");
                false
            }
        }
    }

    fn audit_opened(&self, report: &LoadReport) {
        self.audit(
            AuditAction::System,
            &format!(
                "Desk opened: {} loaded, {} migrated, {} skipped",
                report.loaded, report.migrated, report.skipped
            ),
        );
    }

    fn audit(&self, action: AuditAction, summary: &str) {
        if let Err(err) = self.audit.record(action, summary) {
            warn!(
                action = action.label(),
                summary,
                error = %err,
                "LOG-ERR: audit entry not written"
            );
        }
    }
}

/// Serializable view of a submission for API and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView<'a> {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<&'a Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
