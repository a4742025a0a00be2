//! Sync lifecycle webhooks.
//!
//! Bridge signs each delivery with HMAC-SHA256 over the raw body using the
//! secret given at registration, hex encoded in [`SIGNATURE_HEADER`].

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::sync::EntityType;
use crate::wire::id_string;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "X-Bridge-Signature";

/// Sync job lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "sync.started")]
    SyncStarted,
    #[serde(rename = "sync.completed")]
    SyncCompleted,
    #[serde(rename = "sync.failed")]
    SyncFailed,
    #[serde(rename = "sync.progress")]
    SyncProgress,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 4] = [
        WebhookEvent::SyncStarted,
        WebhookEvent::SyncCompleted,
        WebhookEvent::SyncFailed,
        WebhookEvent::SyncProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::SyncStarted => "sync.started",
            WebhookEvent::SyncCompleted => "sync.completed",
            WebhookEvent::SyncFailed => "sync.failed",
            WebhookEvent::SyncProgress => "sync.progress",
        }
    }

    /// Whether the job is finished once this event fires.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WebhookEvent::SyncCompleted | WebhookEvent::SyncFailed)
    }
}

/// Body of a webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    #[serde(deserialize_with = "id_string")]
    pub job_id: String,
    pub entity_type: EntityType,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Webhook secret is not a usable HMAC key")]
    InvalidKey,

    #[error("Webhook signature is not valid hex")]
    MalformedSignature,

    #[error("Webhook signature mismatch")]
    InvalidSignature,

    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a hex signature against the body in constant time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> Result<(), WebhookError> {
    let signature = signature.trim();
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let expected = hex::decode(signature).map_err(|_| WebhookError::MalformedSignature)?;

    let mut mac = new_mac(secret)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}

/// Verify and decode a delivery.
pub fn parse_webhook(
    secret: &str,
    body: &[u8],
    signature: &str,
) -> Result<WebhookPayload, WebhookError> {
    verify_signature(secret, body, signature)?;
    Ok(serde_json::from_slice(body)?)
}

fn new_mac(secret: &str) -> Result<HmacSha256, WebhookError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::InvalidKey)
}
