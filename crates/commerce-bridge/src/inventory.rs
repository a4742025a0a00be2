//! Stock levels and reservations.
//!
//! A reservation holds stock for a cart, order or quote until it is
//! confirmed into a deduction or released. Expiry is enforced by Bridge.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use commerce_core::{ApiError, Result};
use commerce_http::Response;
use commerce_types::catalog::InventoryLevel;
use commerce_types::params::ListParams;
use commerce_types::response::PaginatedResponse;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::api::{segment, BridgeApi};
use crate::sync::SyncJob;
use crate::wire::{id_string, opt_id_string, Envelope};

// === Stock ===

/// Stock record for one SKU as Bridge reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeInventoryItem {
    pub sku: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub variant_id: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub reserved: Option<i64>,
    /// Sellable quantity. Authoritative; never recomputed locally.
    pub available: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub warehouse_id: Option<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub is_low_stock: Option<bool>,
    #[serde(default)]
    pub reorder_point: Option<i64>,
    #[serde(default)]
    pub expected_restock_date: Option<String>,
}

impl BridgeInventoryItem {
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.available >= quantity
    }
}

impl From<BridgeInventoryItem> for InventoryLevel {
    fn from(item: BridgeInventoryItem) -> Self {
        let reserved = item
            .reserved
            .unwrap_or_else(|| (item.quantity - item.available).max(0));
        InventoryLevel {
            sku: item.sku,
            quantity: item.quantity,
            reserved,
            available: item.available,
            location: item.location,
            low_stock_threshold: item.low_stock_threshold,
        }
    }
}

/// One line of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCheck {
    pub sku: String,
    pub quantity: i64,
}

impl AvailabilityCheck {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub sku: String,
    pub requested: i64,
    pub available: i64,
    pub is_available: bool,
}

/// Filters for the low stock report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LowStockParams {
    /// Override the per-SKU threshold.
    pub threshold: Option<i64>,
    pub warehouse_id: Option<String>,
    pub paging: ListParams,
}

impl LowStockParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.paging.to_query();
        if let Some(threshold) = self.threshold {
            query.push(("threshold".to_string(), threshold.to_string()));
        }
        if let Some(warehouse_id) = &self.warehouse_id {
            query.push(("warehouse_id".to_string(), warehouse_id.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub sku: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InventoryUpdate {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            quantity,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Outcome of one line of [`BridgeInventoryService::update_many`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub sku: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<BridgeInventoryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reconciliation state of the stock feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySyncStatus {
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_syncing: bool,
    #[serde(default)]
    pub total_skus: i64,
    #[serde(default)]
    pub out_of_sync: i64,
    #[serde(default)]
    pub last_error: Option<String>,
}

// === Reservations ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Cart,
    Order,
    Quote,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Cart => "cart",
            ReferenceType::Order => "order",
            ReferenceType::Quote => "quote",
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to hold stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReservation {
    pub sku: String,
    pub quantity: i64,
    pub reference_type: ReferenceType,
    pub reference_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl InventoryReservation {
    pub fn new(
        sku: impl Into<String>,
        quantity: i64,
        reference_type: ReferenceType,
        reference_id: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            quantity,
            reference_type,
            reference_id: reference_id.into(),
            expires_at: None,
        }
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Confirmed,
    Released,
    Expired,
}

impl ReservationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }
}

/// A hold as stored by Bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub sku: String,
    pub quantity: i64,
    pub reference_type: ReferenceType,
    #[serde(deserialize_with = "id_string")]
    pub reference_id: String,
    pub status: ReservationStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of one line of [`BridgeInventoryService::reserve_many`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationResult {
    pub sku: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SkuList<'a> {
    skus: &'a [String],
}

#[derive(Debug, Serialize)]
struct StockChange<'a> {
    quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ReferenceBody<'a> {
    reference_type: ReferenceType,
    reference_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct Released {
    released: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// === Service ===

/// Inventory operations beyond the normalized product surface.
#[derive(Debug, Clone)]
pub struct BridgeInventoryService {
    api: BridgeApi,
}

impl BridgeInventoryService {
    pub(crate) fn new(api: BridgeApi) -> Self {
        Self { api }
    }

    pub async fn get(&self, sku: &str) -> Result<BridgeInventoryItem> {
        self.api.get(&format!("/inventory/{}", segment(sku))).await
    }

    /// Stock records for the given SKUs. Unknown SKUs are absent.
    pub async fn check_stock(&self, skus: &[String]) -> Result<Vec<BridgeInventoryItem>> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }
        self.api.post("/inventory/check", &SkuList { skus }).await
    }

    /// Compare requested quantities against reported availability.
    ///
    /// A SKU Bridge does not report counts as zero available.
    pub async fn check_availability(
        &self,
        lines: &[AvailabilityCheck],
    ) -> Result<Vec<AvailabilityResult>> {
        let skus: Vec<String> = lines.iter().map(|l| l.sku.clone()).collect();
        let stock: HashMap<String, i64> = self
            .check_stock(&skus)
            .await?
            .into_iter()
            .map(|item| (item.sku, item.available))
            .collect();

        Ok(lines
            .iter()
            .map(|line| {
                let available = stock.get(&line.sku).copied().unwrap_or(0);
                AvailabilityResult {
                    sku: line.sku.clone(),
                    requested: line.quantity,
                    available,
                    is_available: available >= line.quantity,
                }
            })
            .collect())
    }

    pub async fn reserve(&self, reservation: &InventoryReservation) -> Result<Reservation> {
        self.api.post("/inventory/reservations", reservation).await
    }

    /// Reserve every line independently, one result per line in input order.
    #[instrument(skip_all, fields(count = reservations.len()))]
    pub async fn reserve_many(&self, reservations: &[InventoryReservation]) -> Vec<ReservationResult> {
        join_all(reservations.iter().map(|reservation| async move {
            match self.reserve(reservation).await {
                Ok(held) => ReservationResult {
                    sku: reservation.sku.clone(),
                    success: true,
                    reservation_id: Some(held.id),
                    expires_at: held.expires_at,
                    error: None,
                },
                Err(e) => {
                    warn!(sku = %reservation.sku, error = %e, "reservation failed");
                    ReservationResult {
                        sku: reservation.sku.clone(),
                        success: false,
                        reservation_id: None,
                        expires_at: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        }))
        .await
    }

    /// Turn a hold into a stock deduction.
    ///
    /// Fails with [`ApiError::ReservationState`] when the reservation was
    /// already confirmed, released or expired.
    pub async fn confirm_reservation(&self, id: &str) -> Result<Reservation> {
        self.transition(id, "confirm", "confirmed").await
    }

    /// Return held stock. Terminal reservations are rejected like confirm.
    pub async fn release_reservation(&self, id: &str) -> Result<Reservation> {
        self.transition(id, "release", "released").await
    }

    /// Release every reservation held for a cart, order or quote.
    /// Returns how many were released.
    pub async fn release_by_reference(
        &self,
        reference_type: ReferenceType,
        reference_id: &str,
    ) -> Result<u64> {
        let body = ReferenceBody {
            reference_type,
            reference_id,
        };
        let released: Released = self
            .api
            .post("/inventory/reservations/release-by-reference", &body)
            .await?;
        Ok(released.released)
    }

    pub async fn get_low_stock(
        &self,
        params: &LowStockParams,
    ) -> Result<PaginatedResponse<BridgeInventoryItem>> {
        self.api
            .get_page_mapped("/inventory/low-stock", params.to_query(), Ok)
            .await
    }

    /// Set the on-hand quantity of a SKU.
    pub async fn update(
        &self,
        sku: &str,
        quantity: i64,
        reason: Option<&str>,
    ) -> Result<BridgeInventoryItem> {
        self.api
            .put(
                &format!("/inventory/{}", segment(sku)),
                &StockChange { quantity, reason },
            )
            .await
    }

    /// Apply every update independently, one result per line in input order.
    #[instrument(skip_all, fields(count = updates.len()))]
    pub async fn update_many(&self, updates: &[InventoryUpdate]) -> Vec<UpdateResult> {
        join_all(updates.iter().map(|update| async move {
            match self
                .update(&update.sku, update.quantity, update.reason.as_deref())
                .await
            {
                Ok(item) => UpdateResult {
                    sku: update.sku.clone(),
                    success: true,
                    item: Some(item),
                    error: None,
                },
                Err(e) => {
                    warn!(sku = %update.sku, error = %e, "stock update failed");
                    UpdateResult {
                        sku: update.sku.clone(),
                        success: false,
                        item: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        }))
        .await
    }

    pub async fn get_sync_status(&self) -> Result<InventorySyncStatus> {
        self.api.get("/inventory/sync-status").await
    }

    /// Start a stock sync with the ERP.
    pub async fn trigger_sync(&self) -> Result<SyncJob> {
        self.api.post("/inventory/sync", &serde_json::json!({})).await
    }

    async fn transition(&self, id: &str, verb: &str, action: &str) -> Result<Reservation> {
        let path = format!("/inventory/reservations/{}/{}", segment(id), verb);
        let response = self.api.post_raw(&path, &serde_json::json!({})).await?;

        if matches!(response.status, 409 | 422) {
            let reason = conflict_reason(&response);
            warn!(reservation_id = %id, action, reason = %reason, "reservation state conflict");
            return Err(ApiError::ReservationState {
                reservation_id: id.to_string(),
                action: action.to_string(),
                reason,
            });
        }

        let envelope: Envelope<Reservation> = response.error_for_status()?.json()?;
        Ok(envelope.data)
    }
}

fn conflict_reason(response: &Response) -> String {
    response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.message)
        .or_else(|| response.text().ok().filter(|t| !t.is_empty()))
        .unwrap_or_else(|| format!("status {}", response.status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: serde_json::Value) -> BridgeInventoryItem {
        serde_json::from_value(json).unwrap()
    }

    // === Conversion Tests ===

    #[test]
    fn test_inventory_level_trusts_available() {
        let stock = item(serde_json::json!({
            "sku": "RING-001",
            "product_id": 9,
            "quantity": 10,
            "reserved": 1,
            "available": 4,
            "last_updated": "2024-03-01T12:00:00Z"
        }));
        assert_eq!(stock.product_id.as_deref(), Some("9"));

        let level = InventoryLevel::from(stock);
        assert_eq!(level.available, 4);
        assert_eq!(level.reserved, 1);
    }

    #[test]
    fn test_inventory_level_derives_missing_reserved() {
        let level = InventoryLevel::from(item(serde_json::json!({
            "sku": "RING-001",
            "quantity": 10,
            "available": 7,
            "last_updated": "2024-03-01T12:00:00Z"
        })));
        assert_eq!(level.reserved, 3);
    }

    // === Request Shape Tests ===

    #[test]
    fn test_reservation_serializes_reference() {
        let reservation = InventoryReservation::new("A", 5, ReferenceType::Cart, "cart_1");
        assert_eq!(
            serde_json::to_value(&reservation).unwrap(),
            serde_json::json!({
                "sku": "A",
                "quantity": 5,
                "reference_type": "cart",
                "reference_id": "cart_1"
            })
        );
    }

    #[test]
    fn test_low_stock_query() {
        let params = LowStockParams {
            threshold: Some(5),
            warehouse_id: Some("wh-2".to_string()),
            paging: ListParams::default(),
        };
        let query = params.to_query();
        assert!(query.contains(&("threshold".to_string(), "5".to_string())));
        assert!(query.contains(&("warehouse_id".to_string(), "wh-2".to_string())));
    }

    #[test]
    fn test_reservation_status_terminal() {
        assert!(!ReservationStatus::Active.is_terminal());
        assert!(ReservationStatus::Confirmed.is_terminal());
        assert!(ReservationStatus::Expired.is_terminal());
    }

    #[test]
    fn test_conflict_reason_prefers_message() {
        let response =
            Response::from_json(409, &serde_json::json!({ "message": "already confirmed" }))
                .unwrap();
        assert_eq!(conflict_reason(&response), "already confirmed");

        let empty = Response::new(422, HashMap::new(), Vec::new());
        assert_eq!(conflict_reason(&empty), "status 422");
    }
}
