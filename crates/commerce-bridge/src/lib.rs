//! Bridge provider adapter.
//!
//! Bridge is the Laravel service that syncs the storefront with the ERP. The
//! adapter implements the normalized [`CommerceClient`] surface and adds two
//! Bridge-only services:
//!
//! - [`BridgeInventoryService`]: stock checks, reservations, low stock
//!   reports and manual adjustments
//! - [`BridgeSyncService`]: ERP sync jobs, logs, per-entity configuration,
//!   webhooks, health and statistics
//!
//! Webhook deliveries are verified with [`parse_webhook`].
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_bridge::BridgeClient;
//! use commerce_core::prelude::*;
//!
//! commerce_bridge::register_global();
//!
//! let client = api_client()
//!     .provider(ProviderKind::Bridge)
//!     .base_url("https://erp.example.com")
//!     .build()?;
//!
//! let bridge = BridgeClient::from_client(client.as_ref()).unwrap();
//! let stock = bridge.inventory().check_stock(&["RING-001".into()]).await?;
//! ```

mod api;
pub mod client;
pub mod inventory;
mod mappers;
mod services;
pub mod sync;
pub mod webhook;
mod wire;

use std::sync::Arc;

use commerce_core::{CommerceClient, ProviderKind, ProviderRegistry};

pub use api::DEFAULT_API_PREFIX;
pub use client::{BridgeClient, OPTION_API_PREFIX, OPTION_CURRENCY};
pub use inventory::{
    AvailabilityCheck, AvailabilityResult, BridgeInventoryItem, BridgeInventoryService,
    InventoryReservation, InventorySyncStatus, InventoryUpdate, LowStockParams, ReferenceType,
    Reservation, ReservationResult, ReservationStatus, UpdateResult,
};
pub use sync::{
    BridgeSyncService, ConflictResolution, CreateSyncJob, EntitySyncHealth, EntitySyncStats,
    EntityType, HealthStatus, ItemSyncResult, JobListParams, LogLevel, RegisterWebhook,
    StatsPeriod, SyncConfig, SyncConfigUpdate, SyncDirection, SyncHealth, SyncJob,
    SyncJobStatus, SyncLog, SyncStats, WebhookRegistration,
};
pub use webhook::{
    parse_webhook, sign, verify_signature, WebhookError, WebhookEvent, WebhookPayload,
    SIGNATURE_HEADER,
};

/// Install the Bridge factory into `registry`.
pub fn register(registry: &ProviderRegistry) {
    registry.register(ProviderKind::Bridge, |config| {
        let client: Arc<dyn CommerceClient> = Arc::new(BridgeClient::new(config)?);
        Ok(client)
    });
}

/// Install the Bridge factory into the process-wide registry.
pub fn register_global() {
    register(ProviderRegistry::global());
}
