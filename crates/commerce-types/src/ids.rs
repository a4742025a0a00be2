//! Newtype IDs for type-safe identifiers.
//!
//! Backends disagree on id formats (Medusa uses prefixed strings, Bridge
//! uses integers), so every id is normalized to an opaque string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// An opaque backend identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog
define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);

// Cart and orders
define_id!(CartId);
define_id!(LineItemId);
define_id!(OrderId);

// Customers
define_id!(CustomerId);
define_id!(AddressId);

// B2B
define_id!(CompanyId);
define_id!(EmployeeId);
define_id!(QuoteId);
define_id!(ApprovalId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: CompanyId = "comp_1".into();
        assert_eq!(id.to_string(), "comp_1");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = OrderId::new("ord_9");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ord_9\"");
        let back: OrderId = serde_json::from_str("\"ord_9\"").unwrap();
        assert_eq!(back, id);
    }
}
