use std::sync::{Arc, Mutex, PoisonError};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::desk::audit::{AuditAction, AuditError, AuditLog};
use crate::desk::domain::{Category, Item, ItemDetails, ItemId, ItemStatus};
use crate::desk::router::{desk_router, SharedDesk};
use crate::desk::service::LostFoundDesk;

pub(super) fn found_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

pub(super) fn created_at() -> NaiveDateTime {
    found_on().and_hms_opt(9, 30, 0).expect("valid time")
}

/// Report that passes every rule.
pub(super) fn wallet_report() -> ItemDetails {
    ItemDetails {
        name: "Black Wallet".to_string(),
        description: "leather wallet found near library".to_string(),
        category: Category::Wallet,
        date_found: found_on(),
        location: "Library 3F".to_string(),
        contact: "09171234567".to_string(),
        estimated_value: 60.0,
        perishable: false,
    }
}

/// Report with valid location and contact, no value and the given text.
pub(super) fn report(name: &str, description: &str) -> ItemDetails {
    ItemDetails {
        name: name.to_string(),
        description: description.to_string(),
        category: Category::Others,
        date_found: found_on(),
        location: "Cafeteria".to_string(),
        contact: "guard@campus.edu".to_string(),
        estimated_value: 0.0,
        perishable: false,
    }
}

pub(super) fn banana_report() -> ItemDetails {
    let mut details = report("Banana", "half-eaten banana");
    details.estimated_value = 10.0;
    details
}

pub(super) fn stored_item(id: &str, details: ItemDetails, status: ItemStatus) -> Item {
    Item::restore(ItemId(id.to_string()), details, status, created_at())
}

#[derive(Debug, Default)]
pub(super) struct MemoryAuditLog {
    entries: Mutex<Vec<(AuditAction, String)>>,
}

impl MemoryAuditLog {
    pub(super) fn entries(&self) -> Vec<(AuditAction, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn actions(&self) -> Vec<AuditAction> {
        self.entries().into_iter().map(|(action, _)| action).collect()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, action: AuditAction, summary: &str) -> Result<(), AuditError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((action, summary.to_string()));
        Ok(())
    }
}

pub(super) struct FailingAuditLog;

impl AuditLog for FailingAuditLog {
    fn record(&self, _action: AuditAction, _summary: &str) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn memory_desk() -> (LostFoundDesk<MemoryAuditLog>, Arc<MemoryAuditLog>) {
    let audit = Arc::new(MemoryAuditLog::default());
    (LostFoundDesk::in_memory(audit.clone()), audit)
}

pub(super) fn shared_desk() -> (SharedDesk<MemoryAuditLog>, Arc<MemoryAuditLog>) {
    let (desk, audit) = memory_desk();
    (Arc::new(Mutex::new(desk)), audit)
}

pub(super) fn router_with_desk(desk: SharedDesk<MemoryAuditLog>) -> axum::Router {
    desk_router(desk)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
