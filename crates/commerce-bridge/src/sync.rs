//! ERP sync jobs.
//!
//! A job reconciles one entity type between the storefront and the ERP and
//! moves through `pending -> running -> completed | failed | cancelled`.

use std::fmt;

use chrono::{DateTime, Utc};
use commerce_core::{ApiError, Result};
use commerce_types::params::ListParams;
use commerce_types::response::PaginatedResponse;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::{segment, BridgeApi};
use crate::webhook::WebhookEvent;
use crate::wire::{default_true, id_string};

// === Enums ===

/// Entity types Bridge can sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Products,
    Inventory,
    Prices,
    Customers,
    Orders,
    Categories,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Products,
        EntityType::Inventory,
        EntityType::Prices,
        EntityType::Customers,
        EntityType::Orders,
        EntityType::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Products => "products",
            EntityType::Inventory => "inventory",
            EntityType::Prices => "prices",
            EntityType::Customers => "customers",
            EntityType::Orders => "orders",
            EntityType::Categories => "categories",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    #[default]
    Import,
    Export,
    Bidirectional,
}

/// Job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncJobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl SyncJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncJobStatus::Pending => "pending",
            SyncJobStatus::Running => "running",
            SyncJobStatus::Completed => "completed",
            SyncJobStatus::Failed => "failed",
            SyncJobStatus::Cancelled => "cancelled",
        }
    }

    /// Only queued or in-flight jobs can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, SyncJobStatus::Pending | SyncJobStatus::Running)
    }

    /// Only failed jobs can be retried.
    pub fn can_retry(&self) -> bool {
        matches!(self, SyncJobStatus::Failed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncJobStatus::Completed | SyncJobStatus::Failed | SyncJobStatus::Cancelled
        )
    }
}

impl fmt::Display for SyncJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Which side wins when both changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    #[default]
    SourceWins,
    TargetWins,
    Newest,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    #[default]
    Week,
    Month,
}

impl StatsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Day => "day",
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
        }
    }
}

// === Resources ===

/// A sync job as reported by Bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJob {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub entity_type: EntityType,
    pub direction: SyncDirection,
    pub status: SyncJobStatus,
    /// Percent complete, when the server reports it.
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub processed_items: i64,
    #[serde(default)]
    pub failed_items: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl SyncJob {
    /// Percent complete, derived from the counters when `progress` is absent.
    pub fn progress_percent(&self) -> f64 {
        if let Some(progress) = self.progress {
            return progress.clamp(0.0, 100.0);
        }
        if self.total_items > 0 {
            let done = self.processed_items.min(self.total_items);
            return done as f64 * 100.0 / self.total_items as f64;
        }
        if self.status == SyncJobStatus::Completed {
            100.0
        } else {
            0.0
        }
    }

    pub fn succeeded_items(&self) -> i64 {
        (self.processed_items - self.failed_items).max(0)
    }

    /// Wall time between start and completion.
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.completed_at? - self.started_at?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLog {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub job_id: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Per entity type sync settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub entity_type: EntityType,
    pub enabled: bool,
    #[serde(default)]
    pub direction: SyncDirection,
    /// Cron expression.
    #[serde(default)]
    pub schedule: Option<String>,
    pub batch_size: u32,
    #[serde(default)]
    pub conflict_resolution: ConflictResolution,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Partial update of a [`SyncConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SyncDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_resolution: Option<ConflictResolution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySyncHealth {
    pub entity_type: EntityType,
    pub status: HealthStatus,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_job_status: Option<SyncJobStatus>,
    #[serde(default)]
    pub pending_items: i64,
    #[serde(default)]
    pub failed_items: i64,
}

/// Sync status across every entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncHealth {
    pub status: HealthStatus,
    #[serde(default)]
    pub entities: Vec<EntitySyncHealth>,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
}

impl SyncHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    pub fn entity(&self, entity_type: EntityType) -> Option<&EntitySyncHealth> {
        self.entities.iter().find(|e| e.entity_type == entity_type)
    }

    /// Entity types not reporting healthy.
    pub fn degraded_entities(&self) -> Vec<EntityType> {
        self.entities
            .iter()
            .filter(|e| e.status != HealthStatus::Healthy)
            .map(|e| e.entity_type)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySyncStats {
    pub entity_type: EntityType,
    pub total_jobs: i64,
    pub failed_jobs: i64,
}

/// Historical job outcomes for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStats {
    pub period: StatsPeriod,
    pub total_jobs: i64,
    #[serde(default)]
    pub completed_jobs: i64,
    #[serde(default)]
    pub failed_jobs: i64,
    #[serde(default)]
    pub cancelled_jobs: i64,
    #[serde(default)]
    pub items_processed: i64,
    #[serde(default)]
    pub items_failed: i64,
    #[serde(default)]
    pub average_duration_seconds: Option<f64>,
    #[serde(default)]
    pub by_entity: Vec<EntitySyncStats>,
}

impl SyncStats {
    /// Completed jobs as a fraction of finished ones.
    pub fn success_rate(&self) -> Option<f64> {
        let finished = self.completed_jobs + self.failed_jobs;
        (finished > 0).then(|| self.completed_jobs as f64 / finished as f64)
    }
}

// === Requests ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSyncJob {
    pub entity_type: EntityType,
    pub direction: SyncDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CreateSyncJob {
    pub fn new(entity_type: EntityType, direction: SyncDirection) -> Self {
        Self {
            entity_type,
            direction,
            filters: None,
            metadata: None,
        }
    }

    pub fn with_filters(mut self, filters: serde_json::Value) -> Self {
        self.filters = Some(filters);
        self
    }
}

/// Filters for listing jobs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobListParams {
    pub entity_type: Option<EntityType>,
    pub status: Option<SyncJobStatus>,
    pub paging: ListParams,
}

impl JobListParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.paging.to_query();
        if let Some(entity_type) = self.entity_type {
            query.push(("entity_type".to_string(), entity_type.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.to_string()));
        }
        query
    }
}

/// Outcome of syncing one identifier in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSyncResult {
    pub identifier: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterWebhook {
    pub url: String,
    pub events: Vec<WebhookEvent>,
    /// Shared secret used to sign deliveries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub url: String,
    pub events: Vec<WebhookEvent>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct SkuBody<'a> {
    skus: &'a [String],
}

// === Service ===

/// Sync job management for Bridge.
#[derive(Debug, Clone)]
pub struct BridgeSyncService {
    api: BridgeApi,
}

impl BridgeSyncService {
    pub(crate) fn new(api: BridgeApi) -> Self {
        Self { api }
    }

    pub async fn list_jobs(&self, params: &JobListParams) -> Result<PaginatedResponse<SyncJob>> {
        self.api
            .get_page_mapped("/sync/jobs", params.to_query(), Ok)
            .await
    }

    pub async fn get_job(&self, id: &str) -> Result<SyncJob> {
        self.api.get(&format!("/sync/jobs/{}", segment(id))).await
    }

    pub async fn create_job(&self, job: &CreateSyncJob) -> Result<SyncJob> {
        let created: SyncJob = self.api.post("/sync/jobs", job).await?;
        info!(job_id = %created.id, entity_type = %created.entity_type, "sync job created");
        Ok(created)
    }

    /// Ask the server to cancel a job. The server decides if it still can.
    pub async fn cancel_job(&self, id: &str) -> Result<SyncJob> {
        self.api
            .post(&format!("/sync/jobs/{}/cancel", segment(id)), &serde_json::json!({}))
            .await
    }

    /// Ask the server to retry a job. The server decides if it still can.
    pub async fn retry_job(&self, id: &str) -> Result<SyncJob> {
        self.api
            .post(&format!("/sync/jobs/{}/retry", segment(id)), &serde_json::json!({}))
            .await
    }

    /// Cancel a job, rejecting locally if its known status forbids it.
    pub async fn cancel(&self, job: &SyncJob) -> Result<SyncJob> {
        if !job.status.can_cancel() {
            return Err(job_state(job, "cancelled"));
        }
        self.cancel_job(&job.id).await
    }

    /// Retry a job, rejecting locally unless it failed.
    pub async fn retry(&self, job: &SyncJob) -> Result<SyncJob> {
        if !job.status.can_retry() {
            return Err(job_state(job, "retried"));
        }
        self.retry_job(&job.id).await
    }

    /// Log lines of a job, optionally filtered by level.
    pub async fn get_job_logs(
        &self,
        id: &str,
        level: Option<LogLevel>,
        paging: &ListParams,
    ) -> Result<PaginatedResponse<SyncLog>> {
        let mut query = paging.to_query();
        if let Some(level) = level {
            query.push(("level".to_string(), level.as_str().to_string()));
        }
        self.api
            .get_page_mapped(&format!("/sync/jobs/{}/logs", segment(id)), query, Ok)
            .await
    }

    pub async fn get_config(&self, entity_type: EntityType) -> Result<SyncConfig> {
        self.api.get(&format!("/sync/config/{}", entity_type)).await
    }

    pub async fn list_configs(&self) -> Result<Vec<SyncConfig>> {
        self.api.get("/sync/config").await
    }

    pub async fn update_config(
        &self,
        entity_type: EntityType,
        update: &SyncConfigUpdate,
    ) -> Result<SyncConfig> {
        self.api
            .put(&format!("/sync/config/{}", entity_type), update)
            .await
    }

    /// Sync one product by SKU or id.
    pub async fn sync_product(&self, identifier: &str) -> Result<SyncJob> {
        self.api
            .post(&format!("/sync/products/{}", segment(identifier)), &serde_json::json!({}))
            .await
    }

    /// Sync several products, one result per identifier in input order.
    #[instrument(skip_all, fields(count = identifiers.len()))]
    pub async fn sync_products(&self, identifiers: &[String]) -> Vec<ItemSyncResult> {
        join_all(identifiers.iter().map(|identifier| async move {
            match self.sync_product(identifier).await {
                Ok(job) => ItemSyncResult {
                    identifier: identifier.clone(),
                    success: true,
                    job_id: Some(job.id),
                    error: None,
                },
                Err(e) => {
                    warn!(identifier = %identifier, error = %e, "product sync failed");
                    ItemSyncResult {
                        identifier: identifier.clone(),
                        success: false,
                        job_id: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        }))
        .await
    }

    /// Sync stock for the given SKUs, or everything when empty.
    pub async fn sync_inventory(&self, skus: &[String]) -> Result<SyncJob> {
        self.api.post("/sync/inventory", &SkuBody { skus }).await
    }

    /// Sync prices for the given SKUs, or everything when empty.
    pub async fn sync_prices(&self, skus: &[String]) -> Result<SyncJob> {
        self.api.post("/sync/prices", &SkuBody { skus }).await
    }

    pub async fn register_webhook(&self, webhook: &RegisterWebhook) -> Result<WebhookRegistration> {
        self.api.post("/sync/webhooks", webhook).await
    }

    pub async fn list_webhooks(&self) -> Result<Vec<WebhookRegistration>> {
        self.api.get("/sync/webhooks").await
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<()> {
        self.api
            .delete_empty(&format!("/sync/webhooks/{}", segment(id)))
            .await
    }

    pub async fn get_health(&self) -> Result<SyncHealth> {
        self.api.get("/sync/health").await
    }

    pub async fn get_stats(&self, period: StatsPeriod) -> Result<SyncStats> {
        self.api
            .get_query(
                "/sync/stats",
                vec![("period".to_string(), period.as_str().to_string())],
            )
            .await
    }
}

fn job_state(job: &SyncJob, action: &str) -> ApiError {
    ApiError::JobState {
        job_id: job.id.clone(),
        action: action.to_string(),
        status: job.status.to_string(),
    }
}
