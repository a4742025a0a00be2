use async_trait::async_trait;
use commerce_core::{CategoryService, Result};
use commerce_types::catalog::Category;
use commerce_types::params::ListParams;
use commerce_types::response::PaginatedResponse;
use commerce_types::CategoryId;

use crate::api::{segment, BridgeApi};
use crate::mappers::Mapper;
use crate::wire::WireCategory;

pub(crate) struct BridgeCategoryService {
    api: BridgeApi,
    mapper: Mapper,
}

impl BridgeCategoryService {
    pub fn new(api: BridgeApi, mapper: Mapper) -> Self {
        Self { api, mapper }
    }

    async fn fetch(&self, path: &str) -> Result<Category> {
        let wire: WireCategory = self.api.get(path).await?;
        Ok(self.mapper.category(wire))
    }

    async fn fetch_all(&self, path: &str) -> Result<Vec<Category>> {
        let wire: Vec<WireCategory> = self.api.get(path).await?;
        Ok(wire.into_iter().map(|c| self.mapper.category(c)).collect())
    }
}

#[async_trait]
impl CategoryService for BridgeCategoryService {
    async fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Category>> {
        let mapper = self.mapper;
        self.api
            .get_page_mapped("/categories", params.to_query(), move |w| {
                Ok(mapper.category(w))
            })
            .await
    }

    async fn get(&self, id: &CategoryId) -> Result<Category> {
        self.fetch(&format!("/categories/{}", segment(id.as_str()))).await
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Category> {
        self.fetch(&format!("/categories/slug/{}", segment(slug))).await
    }

    /// Bridge nests children itself; a flat answer is assembled by `parent_id`.
    async fn tree(&self) -> Result<Vec<Category>> {
        let categories = self.fetch_all("/categories/tree").await?;
        if categories.iter().any(|c| c.parent_id.is_some()) {
            return Ok(Category::build_tree(categories));
        }
        Ok(categories)
    }

    async fn children(&self, id: &CategoryId) -> Result<Vec<Category>> {
        self.fetch_all(&format!("/categories/{}/children", segment(id.as_str())))
            .await
    }
}
