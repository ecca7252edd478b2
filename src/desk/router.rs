use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::audit::AuditLog;
use super::domain::{parse_estimated_value, Category, ItemDetails, LostItemQuery};
use super::matcher::MatchView;
use super::service::LostFoundDesk;
use crate::error::AppError;

/// Desk shared between request handlers. The core is single-threaded, so
/// every request takes the lock for its whole duration.
pub type SharedDesk<A> = Arc<Mutex<LostFoundDesk<A>>>;

/// Router builder exposing HTTP endpoints for intake, search and removal.
pub fn desk_router<A>(desk: SharedDesk<A>) -> Router
where
    A: AuditLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/items",
            post(submit_handler::<A>).get(list_handler::<A>),
        )
        .route(
            "/api/v1/items/:item_id",
            get(item_handler::<A>).delete(remove_handler::<A>),
        )
        .route("/api/v1/search", post(search_handler::<A>))
        .route(
            "/api/v1/settings/threshold",
            get(threshold_handler::<A>).put(update_threshold_handler::<A>),
        )
        .route("/api/v1/stats", get(stats_handler::<A>))
        .route("/api/v1/criteria", get(criteria_handler::<A>))
        .route("/api/v1/categories", get(categories_handler))
        .with_state(desk)
}

fn lock_desk<A>(desk: &Mutex<LostFoundDesk<A>>) -> MutexGuard<'_, LostFoundDesk<A>> {
    desk.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Found-item report as posted by the intake form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FoundItemRequest {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub date_found: Option<NaiveDate>,
    pub location: String,
    pub contact: String,
    pub estimated_value: Option<EstimatedValueInput>,
    pub perishable: bool,
}

/// Forms send the value either as a number or as the raw text field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EstimatedValueInput {
    Number(f64),
    Text(String),
}

impl EstimatedValueInput {
    pub fn resolve(&self) -> f64 {
        match self {
            EstimatedValueInput::Number(value) if value.is_finite() && *value >= 0.0 => *value,
            EstimatedValueInput::Number(value) => {
                warn!(value, "estimated value must be a non-negative number, defaulting to 0");
                0.0
            }
            EstimatedValueInput::Text(raw) => parse_estimated_value(raw),
        }
    }
}

impl FoundItemRequest {
    /// Fill in defaults: category `Others`, value 0, found `today`.
    pub fn into_details(self, today: NaiveDate) -> ItemDetails {
        ItemDetails {
            category: self
                .category
                .as_deref()
                .map(Category::parse_or_default)
                .unwrap_or_default(),
            date_found: self.date_found.unwrap_or(today),
            estimated_value: self
                .estimated_value
                .as_ref()
                .map_or(0.0, EstimatedValueInput::resolve),
            name: self.name,
            description: self.description,
            location: self.location,
            contact: self.contact,
            perishable: self.perishable,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdRequest {
    pub threshold: f64,
}

pub(crate) async fn submit_handler<A>(
    State(desk): State<SharedDesk<A>>,
    axum::Json(request): axum::Json<FoundItemRequest>,
) -> Response
where
    A: AuditLog + 'static,
{
    let details = request.into_details(Local::now().date_naive());
    let mut desk = lock_desk(&desk);
    match desk.submit(details) {
        Ok(outcome) => {
            let status = if outcome.is_accepted() {
                StatusCode::CREATED
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, axum::Json(outcome.view())).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn list_handler<A>(
    State(desk): State<SharedDesk<A>>,
    Query(params): Query<ListParams>,
) -> Response
where
    A: AuditLog + 'static,
{
    let desk = lock_desk(&desk);
    let items = desk.items(params.include_removed);
    let payload = json!({
        "count": items.len(),
        "items": items,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn item_handler<A>(
    State(desk): State<SharedDesk<A>>,
    Path(item_id): Path<String>,
) -> Response
where
    A: AuditLog + 'static,
{
    let desk = lock_desk(&desk);
    match desk.get(&item_id) {
        Some(item) => (StatusCode::OK, axum::Json(item)).into_response(),
        None => {
            let payload = json!({
                "error": format!("item not found: {item_id}"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn remove_handler<A>(
    State(desk): State<SharedDesk<A>>,
    Path(item_id): Path<String>,
) -> Response
where
    A: AuditLog + 'static,
{
    let mut desk = lock_desk(&desk);
    match desk.remove(&item_id) {
        Ok(receipt) => {
            let payload = json!({
                "id": receipt.outcome.id(),
                "status": "REMOVED",
                "already_removed": !receipt.outcome.changed(),
                "persisted": receipt.persisted,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn search_handler<A>(
    State(desk): State<SharedDesk<A>>,
    axum::Json(query): axum::Json<LostItemQuery>,
) -> Response
where
    A: AuditLog + 'static,
{
    let desk = lock_desk(&desk);
    match desk.search(&query) {
        Ok(matches) => {
            let views: Vec<MatchView> = matches.iter().map(|found| found.view()).collect();
            let payload = json!({
                "query": query.combined_text(),
                "threshold": desk.threshold(),
                "count": views.len(),
                "matches": views,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn threshold_handler<A>(State(desk): State<SharedDesk<A>>) -> Response
where
    A: AuditLog + 'static,
{
    let desk = lock_desk(&desk);
    let payload = json!({ "threshold": desk.threshold() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn update_threshold_handler<A>(
    State(desk): State<SharedDesk<A>>,
    axum::Json(request): axum::Json<ThresholdRequest>,
) -> Response
where
    A: AuditLog + 'static,
{
    let mut desk = lock_desk(&desk);
    let applied = desk.set_threshold(request.threshold);
    let payload = json!({
        "threshold": desk.threshold(),
        "applied": applied,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn stats_handler<A>(State(desk): State<SharedDesk<A>>) -> Response
where
    A: AuditLog + 'static,
{
    let desk = lock_desk(&desk);
    let stats = desk.statistics(Local::now().date_naive());
    let payload = json!({
        "total": stats.total,
        "active": stats.active,
        "removed": stats.removed,
        "found_today": stats.found_today,
        "threshold": desk.threshold(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn criteria_handler<A>(State(desk): State<SharedDesk<A>>) -> Response
where
    A: AuditLog + 'static,
{
    let desk = lock_desk(&desk);
    (StatusCode::OK, axum::Json(desk.criteria())).into_response()
}

pub(crate) async fn categories_handler() -> Response {
    let labels: Vec<&'static str> = Category::ALL.iter().map(Category::label).collect();
    (StatusCode::OK, axum::Json(json!({ "categories": labels }))).into_response()
}
