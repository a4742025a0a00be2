use std::collections::HashMap;

use async_trait::async_trait;
use commerce_core::{ProductService, Result};
use commerce_types::catalog::{InventoryLevel, Product};
use commerce_types::params::{ListParams, ProductListParams, SearchParams};
use commerce_types::response::PaginatedResponse;
use commerce_types::{CategoryId, ProductId};
use serde::Serialize;

use super::map_all;
use crate::api::{query, segment, BridgeApi};
use crate::inventory::BridgeInventoryService;
use crate::mappers::Mapper;
use crate::wire::WireProduct;

#[derive(Debug, Serialize)]
struct BatchIds<'a> {
    ids: &'a [ProductId],
}

pub(crate) struct BridgeProductService {
    api: BridgeApi,
    mapper: Mapper,
    inventory: BridgeInventoryService,
}

impl BridgeProductService {
    pub fn new(api: BridgeApi, mapper: Mapper, inventory: BridgeInventoryService) -> Self {
        Self {
            api,
            mapper,
            inventory,
        }
    }

    async fn fetch(&self, path: &str) -> Result<Product> {
        let wire: WireProduct = self.api.get(path).await?;
        self.mapper.product(wire)
    }

    async fn page(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<PaginatedResponse<Product>> {
        let mapper = self.mapper;
        self.api
            .get_page_mapped(path, query, move |w| mapper.product(w))
            .await
    }

    async fn limited(&self, path: &str, limit: u32) -> Result<Vec<Product>> {
        let wire: Vec<WireProduct> = self
            .api
            .get_query(path, query(&[("limit", limit.to_string())]))
            .await?;
        map_all(wire, |w| self.mapper.product(w))
    }
}

#[async_trait]
impl ProductService for BridgeProductService {
    async fn list(&self, params: &ProductListParams) -> Result<PaginatedResponse<Product>> {
        self.page("/products", params.to_query()).await
    }

    async fn get(&self, id: &ProductId) -> Result<Product> {
        self.fetch(&format!("/products/{}", segment(id.as_str()))).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Product> {
        self.fetch(&format!("/products/slug/{}", segment(slug))).await
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Product> {
        self.fetch(&format!("/products/sku/{}", segment(sku))).await
    }

    /// Results follow the order of `ids`; ids Bridge does not know are skipped.
    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wire: Vec<WireProduct> = self.api.post("/products/batch", &BatchIds { ids }).await?;
        let by_id: HashMap<ProductId, Product> = map_all(wire, |w| self.mapper.product(w))?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.get(id).cloned()).collect())
    }

    async fn search(&self, params: &SearchParams) -> Result<PaginatedResponse<Product>> {
        self.page("/products/search", params.to_query()).await
    }

    async fn get_by_category(
        &self,
        category_id: &CategoryId,
        params: &ListParams,
    ) -> Result<PaginatedResponse<Product>> {
        let path = format!("/categories/{}/products", segment(category_id.as_str()));
        self.page(&path, params.to_query()).await
    }

    async fn get_featured(&self, limit: u32) -> Result<Vec<Product>> {
        self.limited("/products/featured", limit).await
    }

    async fn get_new(&self, limit: u32) -> Result<Vec<Product>> {
        self.limited("/products/new", limit).await
    }

    async fn get_inventory(&self, sku: &str) -> Result<InventoryLevel> {
        Ok(self.inventory.get(sku).await?.into())
    }

    async fn get_inventory_bulk(&self, skus: &[String]) -> Result<Vec<InventoryLevel>> {
        let items = self.inventory.check_stock(skus).await?;
        Ok(items.into_iter().map(InventoryLevel::from).collect())
    }
}
