//! Product catalog module.
//!
//! Contains normalized products, variants, categories, and stock levels.

mod category;
mod inventory;
mod product;

pub use category::Category;
pub use inventory::InventoryLevel;
pub use product::{Product, ProductImage, ProductStatus, ProductVariant};
