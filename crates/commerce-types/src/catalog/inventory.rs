//! Normalized stock levels.

use serde::{Deserialize, Serialize};

/// Stock level for one SKU as reported by a backend.
///
/// `available` is the backend's sellable quantity and is never recomputed
/// from `quantity` and `reserved` on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InventoryLevel {
    pub sku: String,
    /// Total quantity on hand.
    pub quantity: i64,
    /// Quantity held by reservations.
    pub reserved: i64,
    /// Sellable quantity.
    pub available: i64,
    pub location: Option<String>,
    pub low_stock_threshold: Option<i64>,
}

impl InventoryLevel {
    /// Check if any stock can be sold.
    pub fn in_stock(&self) -> bool {
        self.available > 0
    }

    /// Check if a specific quantity can be sold.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.available >= quantity
    }

    /// Check if stock is at or below the low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.low_stock_threshold
            .map(|threshold| self.available <= threshold)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_trusts_reported_available() {
        // quantity - reserved would be 7, the backend says 4
        let level = InventoryLevel {
            sku: "PEND-01".to_string(),
            quantity: 10,
            reserved: 3,
            available: 4,
            ..Default::default()
        };

        assert!(level.in_stock());
        assert!(level.can_fulfill(4));
        assert!(!level.can_fulfill(5));
    }

    #[test]
    fn test_low_stock() {
        let mut level = InventoryLevel {
            sku: "EAR-02".to_string(),
            available: 2,
            low_stock_threshold: Some(3),
            ..Default::default()
        };
        assert!(level.is_low_stock());

        level.available = 10;
        assert!(!level.is_low_stock());
    }
}
